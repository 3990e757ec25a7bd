use actix_web::http::StatusCode;
use portfolio::api::services::ErrorCode;
use portfolio::errors::{PortfolioError, Result};
use std::error::Error;

#[cfg(test)]
mod error_creation_tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = PortfolioError::validation("rating must be between 1 and 5");

        assert!(matches!(error, PortfolioError::Validation(_)));
        assert!(error.to_string().contains("Validation Error"));
        assert!(error.to_string().contains("rating must be between 1 and 5"));
        assert_eq!(error.code(), "E005");
    }

    #[test]
    fn test_conflict_error() {
        let error = PortfolioError::conflict("skill year 2024 already exists");

        assert!(matches!(error, PortfolioError::Conflict(_)));
        assert_eq!(error.message(), "skill year 2024 already exists");
    }

    #[test]
    fn test_upstream_errors_are_distinct() {
        let rejected = PortfolioError::upstream_rejected("sender domain is not verified");
        let failed = PortfolioError::upstream("email API returned status 502");
        let missing = PortfolioError::not_configured("GitHub token is not configured");

        assert_ne!(rejected.code(), failed.code());
        assert_ne!(failed.code(), missing.code());
    }

    #[test]
    fn test_error_is_std_error() {
        let error = PortfolioError::file_operation("config.toml: permission denied");
        let as_dyn: &dyn Error = &error;
        assert!(as_dyn.source().is_none());
    }
}

#[cfg(test)]
mod status_mapping_tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert_eq!(
            PortfolioError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PortfolioError::date_parse("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            PortfolioError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            PortfolioError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            PortfolioError::upstream_rejected("x").http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_server_errors() {
        for error in [
            PortfolioError::database_operation("x"),
            PortfolioError::database_connection("x"),
            PortfolioError::upstream("x"),
            PortfolioError::not_configured("x"),
            PortfolioError::serialization("x"),
        ] {
            assert_eq!(error.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_api_error_codes() {
        assert_eq!(
            ErrorCode::from(&PortfolioError::not_found("x")),
            ErrorCode::NotFound
        );
        assert_eq!(
            ErrorCode::from(&PortfolioError::database_connection("x")),
            ErrorCode::ContentDatabaseError
        );
        assert_eq!(
            ErrorCode::from(&PortfolioError::not_configured("x")),
            ErrorCode::UpstreamNotConfigured
        );
    }
}

#[cfg(test)]
mod conversion_tests {
    use super::*;

    #[test]
    fn test_from_db_err() {
        let error: PortfolioError =
            sea_orm::DbErr::RecordNotFound("skill 3".to_string()).into();
        assert!(matches!(error, PortfolioError::NotFound(_)));

        let error: PortfolioError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert!(matches!(error, PortfolioError::DatabaseOperation(_)));
    }

    #[test]
    fn test_from_serde_json() {
        fn parse() -> Result<serde_json::Value> {
            Ok(serde_json::from_str("{nope")?)
        }
        assert!(matches!(parse(), Err(PortfolioError::Serialization(_))));
    }

    #[test]
    fn test_from_chrono() {
        fn parse() -> Result<chrono::NaiveDate> {
            Ok(chrono::NaiveDate::parse_from_str("2024-13-40", "%Y-%m-%d")?)
        }
        assert!(matches!(parse(), Err(PortfolioError::DateParse(_))));
    }
}
