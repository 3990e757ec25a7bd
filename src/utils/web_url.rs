//! 链接字段校验
//!
//! CMS 中保存的链接会直接渲染到前端，只接受 http/https。

use url::Url;

use crate::errors::{PortfolioError, Result};

pub fn validate_http_url(field: &str, value: &str) -> Result<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortfolioError::validation(format!("{} cannot be empty", field)));
    }

    let parsed = Url::parse(value)
        .map_err(|e| PortfolioError::validation(format!("{} is not a valid URL: {}", field, e)))?;

    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(PortfolioError::validation(format!(
            "{} must include a host",
            field
        ))),
        other => Err(PortfolioError::validation(format!(
            "{} must use http or https, got {}",
            field, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_http_url("cta_url", "https://example.com/contact").is_ok());
        assert!(validate_http_url("cta_url", " http://localhost:3000 ").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(validate_http_url("cta_url", "javascript:alert(1)").is_err());
        assert!(validate_http_url("cta_url", "data:text/html,hi").is_err());
        assert!(validate_http_url("cta_url", "ftp://example.com").is_err());
        assert!(validate_http_url("cta_url", "example.com").is_err());
        assert!(validate_http_url("cta_url", "").is_err());
    }
}
