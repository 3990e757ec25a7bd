//! 响应信封与错误映射

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, error::InternalError};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::PortfolioError;
use crate::storage::Page;
use crate::storage::models::TS_EXPORT_PATH;

/// API 错误码
///
/// 序列化为数字。按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
/// - 3000-3099: 内容错误
/// - 4000-4099: 上游服务错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    RateLimitExceeded = 2004,

    ContentConflict = 3001,
    ContentDatabaseError = 3005,

    UpstreamFailed = 4000,
    UpstreamRejected = 4001,
    UpstreamNotConfigured = 4002,
}

impl From<&PortfolioError> for ErrorCode {
    fn from(err: &PortfolioError) -> Self {
        match err {
            PortfolioError::Validation(_) => ErrorCode::BadRequest,
            PortfolioError::DateParse(_) => ErrorCode::InvalidDateFormat,
            PortfolioError::NotFound(_) => ErrorCode::NotFound,
            PortfolioError::Conflict(_) => ErrorCode::ContentConflict,
            PortfolioError::DatabaseConfig(_)
            | PortfolioError::DatabaseConnection(_)
            | PortfolioError::DatabaseOperation(_) => ErrorCode::ContentDatabaseError,
            PortfolioError::Upstream(_) => ErrorCode::UpstreamFailed,
            PortfolioError::UpstreamRejected(_) => ErrorCode::UpstreamRejected,
            PortfolioError::NotConfigured(_) => ErrorCode::UpstreamNotConfigured,
            PortfolioError::FileOperation(_) | PortfolioError::Serialization(_) => {
                ErrorCode::InternalServerError
            }
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PaginationInfo {
    #[ts(type = "number")]
    pub page: u64,
    #[ts(type = "number")]
    pub page_size: u64,
    #[ts(type = "number")]
    pub total: u64,
    #[ts(type = "number")]
    pub total_pages: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PaginatedResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, code, message, None)
}

pub fn error_from_portfolio(err: &PortfolioError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
        // 内部错误不向客户端暴露细节
        return error_response(status, ErrorCode::from(err), err.error_type());
    }
    error_response(status, ErrorCode::from(err), err.message())
}

pub fn api_result<T: Serialize>(result: Result<T, PortfolioError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_portfolio(&e),
    }
}

pub fn paginated_response<T: Serialize>(page: Page<T>) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(PaginatedResponse {
            code: ErrorCode::Success as i32,
            message: "OK".to_string(),
            pagination: PaginationInfo {
                page: page.page,
                page_size: page.page_size,
                total: page.total,
                total_pages: page.total_pages,
            },
            data: page.items,
        })
}

pub fn paginated_result<T: Serialize>(result: Result<Page<T>, PortfolioError>) -> HttpResponse {
    match result {
        Ok(page) => paginated_response(page),
        Err(e) => error_from_portfolio(&e),
    }
}

/// JSON/Query 解析失败时返回信封格式的 400
pub fn envelope_payload_error<E>(err: E, _req: &HttpRequest) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    let message = format!("Invalid request: {}", err);
    let response = error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &message);
    InternalError::from_response(err, response).into()
}
