use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, trace};

use super::helpers::{ErrorCode, json_response};
use crate::storage::SeaOrmStorage;
use crate::utils::format_duration_human;

#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub uptime_human: String,
    pub storage: StorageCheck,
    pub response_time_ms: u64,
}

pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let started = Instant::now();
        trace!("Received health check request");

        let backend = storage.backend_name().to_string();
        let storage_check = match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await
        {
            Ok(Ok(())) => StorageCheck {
                status: "healthy".to_string(),
                backend,
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                StorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some(e.message().to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timed out");
                StorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    error: Some("timeout".to_string()),
                }
            }
        };

        let now = Utc::now();
        let healthy = storage_check.error.is_none();
        let uptime_human = format_duration_human(app_start_time.start_datetime, now);

        let data = HealthResponse {
            status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            uptime_human: uptime_human.clone(),
            storage: storage_check,
            response_time_ms: started.elapsed().as_millis() as u64,
        };

        info!(
            "Health check completed in {:?}, status: {}, uptime: {}",
            started.elapsed(),
            data.status,
            uptime_human
        );

        if healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(data),
            )
        }
    }

    /// 就绪：数据库可达
    pub async fn readiness_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
        trace!("Received readiness check request");
        match storage.ping().await {
            Ok(()) => HttpResponse::Ok().content_type("text/plain").body("OK"),
            Err(_) => HttpResponse::ServiceUnavailable()
                .content_type("text/plain")
                .body("NOT READY"),
        }
    }

    pub async fn liveness_check() -> impl Responder {
        HttpResponse::NoContent().finish()
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
