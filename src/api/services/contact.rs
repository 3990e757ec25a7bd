//! `POST /api/contact`

use actix_governor::{
    GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError,
};
use actix_web::dev::ServiceRequest;
use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder, error::JsonPayloadError, web};
use governor::NotUntil;
use governor::clock::{Clock, DefaultClock, QuantaInstant};
use governor::middleware::NoOpMiddleware;
use serde::Serialize;
use tracing::debug;

use crate::config::ContactConfig;
use crate::errors::{PortfolioError, Result};
use crate::services::{ContactRequest, ContactService};
use crate::utils::ip::resolve_client_ip;

#[derive(Debug, Serialize)]
pub struct ContactReply {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

fn reply(status: StatusCode, success: bool, message: &str, id: Option<String>) -> HttpResponse {
    HttpResponse::build(status).json(ContactReply {
        success,
        message: message.to_string(),
        id,
    })
}

pub async fn submit_contact(
    service: web::Data<ContactService>,
    body: web::Json<ContactRequest>,
) -> HttpResponse {
    match service.submit(&body).await {
        Ok(receipt) => reply(
            StatusCode::OK,
            true,
            "Message sent successfully",
            Some(receipt.id),
        ),
        Err(PortfolioError::Validation(msg)) => reply(StatusCode::BAD_REQUEST, false, &msg, None),
        Err(PortfolioError::UpstreamRejected(_)) => reply(
            StatusCode::FORBIDDEN,
            false,
            "Email could not be sent: the sender domain is not verified",
            None,
        ),
        Err(_) => reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            false,
            "Failed to send message. Please try again later.",
            None,
        ),
    }
}

/// 请求体无法解析时同样返回 `{success:false, message}`
pub fn contact_json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = reply(StatusCode::BAD_REQUEST, false, "Invalid request body", None);
    InternalError::from_response(err, response).into()
}

/// 按客户端 IP 限流；只有可信代理的转发头才会被采信
#[derive(Clone)]
pub struct ContactKeyExtractor {
    trusted_proxies: Vec<String>,
}

impl ContactKeyExtractor {
    pub fn new(trusted_proxies: Vec<String>) -> Self {
        Self { trusted_proxies }
    }
}

impl KeyExtractor for ContactKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(
        &self,
        req: &ServiceRequest,
    ) -> std::result::Result<Self::Key, Self::KeyExtractionError> {
        let conn_info = req.connection_info();
        resolve_client_ip(conn_info.peer_addr(), req.headers(), &self.trusted_proxies)
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to determine client IP"))
    }

    /// 429 与其它分支保持同一 `{success, message}` 结构
    fn exceed_rate_limit_response(
        &self,
        negative: &NotUntil<QuantaInstant>,
        mut response: HttpResponseBuilder,
    ) -> HttpResponse {
        let wait_time = negative
            .wait_time_from(DefaultClock::default().now())
            .as_secs();
        response.json(ContactReply {
            success: false,
            message: format!("Too many requests, retry in {}s", wait_time),
            id: None,
        })
    }
}

pub type ContactRateLimit = GovernorConfig<ContactKeyExtractor, NoOpMiddleware>;

pub fn contact_rate_limit(
    config: &ContactConfig,
    trusted_proxies: Vec<String>,
) -> Result<ContactRateLimit> {
    let limit = GovernorConfigBuilder::default()
        .seconds_per_request(config.seconds_per_request.max(1))
        .burst_size(config.burst_size.max(1))
        .key_extractor(ContactKeyExtractor::new(trusted_proxies))
        .finish()
        .ok_or_else(|| PortfolioError::validation("invalid contact rate limit settings"))?;

    debug!(
        "Contact rate limiter: 1 request per {}s, burst {}",
        config.seconds_per_request.max(1),
        config.burst_size.max(1)
    );
    Ok(limit)
}
