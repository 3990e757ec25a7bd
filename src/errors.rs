use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum PortfolioError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Serialization(String),
    DateParse(String),
    Upstream(String),
    UpstreamRejected(String),
    NotConfigured(String),
}

impl PortfolioError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            PortfolioError::DatabaseConfig(_) => "E001",
            PortfolioError::DatabaseConnection(_) => "E002",
            PortfolioError::DatabaseOperation(_) => "E003",
            PortfolioError::FileOperation(_) => "E004",
            PortfolioError::Validation(_) => "E005",
            PortfolioError::NotFound(_) => "E006",
            PortfolioError::Conflict(_) => "E007",
            PortfolioError::Serialization(_) => "E008",
            PortfolioError::DateParse(_) => "E009",
            PortfolioError::Upstream(_) => "E010",
            PortfolioError::UpstreamRejected(_) => "E011",
            PortfolioError::NotConfigured(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            PortfolioError::DatabaseConfig(_) => "Database Configuration Error",
            PortfolioError::DatabaseConnection(_) => "Database Connection Error",
            PortfolioError::DatabaseOperation(_) => "Database Operation Error",
            PortfolioError::FileOperation(_) => "File Operation Error",
            PortfolioError::Validation(_) => "Validation Error",
            PortfolioError::NotFound(_) => "Resource Not Found",
            PortfolioError::Conflict(_) => "Resource Conflict",
            PortfolioError::Serialization(_) => "Serialization Error",
            PortfolioError::DateParse(_) => "Date Parse Error",
            PortfolioError::Upstream(_) => "Upstream Service Error",
            PortfolioError::UpstreamRejected(_) => "Upstream Service Rejected Request",
            PortfolioError::NotConfigured(_) => "Service Not Configured",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            PortfolioError::DatabaseConfig(msg)
            | PortfolioError::DatabaseConnection(msg)
            | PortfolioError::DatabaseOperation(msg)
            | PortfolioError::FileOperation(msg)
            | PortfolioError::Validation(msg)
            | PortfolioError::NotFound(msg)
            | PortfolioError::Conflict(msg)
            | PortfolioError::Serialization(msg)
            | PortfolioError::DateParse(msg)
            | PortfolioError::Upstream(msg)
            | PortfolioError::UpstreamRejected(msg)
            | PortfolioError::NotConfigured(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    ///
    /// 上游拒绝（如发件域名未验证）对应 403，其余上游和内部错误均为 500。
    pub fn http_status(&self) -> StatusCode {
        match self {
            PortfolioError::Validation(_) | PortfolioError::DateParse(_) => {
                StatusCode::BAD_REQUEST
            }
            PortfolioError::NotFound(_) => StatusCode::NOT_FOUND,
            PortfolioError::Conflict(_) => StatusCode::CONFLICT,
            PortfolioError::UpstreamRejected(_) => StatusCode::FORBIDDEN,
            PortfolioError::DatabaseConfig(_)
            | PortfolioError::DatabaseConnection(_)
            | PortfolioError::DatabaseOperation(_)
            | PortfolioError::FileOperation(_)
            | PortfolioError::Serialization(_)
            | PortfolioError::Upstream(_)
            | PortfolioError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于启动失败时的终端提示）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于日志与 CLI）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for PortfolioError {}

// 便捷的构造函数
impl PortfolioError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        PortfolioError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Conflict(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        PortfolioError::DateParse(msg.into())
    }

    pub fn upstream<T: Into<String>>(msg: T) -> Self {
        PortfolioError::Upstream(msg.into())
    }

    pub fn upstream_rejected<T: Into<String>>(msg: T) -> Self {
        PortfolioError::UpstreamRejected(msg.into())
    }

    pub fn not_configured<T: Into<String>>(msg: T) -> Self {
        PortfolioError::NotConfigured(msg.into())
    }
}

impl From<sea_orm::DbErr> for PortfolioError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::RecordNotFound(msg) => PortfolioError::NotFound(msg),
            other => PortfolioError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<std::io::Error> for PortfolioError {
    fn from(err: std::io::Error) -> Self {
        PortfolioError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for PortfolioError {
    fn from(err: serde_json::Error) -> Self {
        PortfolioError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for PortfolioError {
    fn from(err: chrono::ParseError) -> Self {
        PortfolioError::DateParse(err.to_string())
    }
}

impl From<ureq::Error> for PortfolioError {
    fn from(err: ureq::Error) -> Self {
        PortfolioError::Upstream(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;
