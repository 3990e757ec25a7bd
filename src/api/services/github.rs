//! `GET /api/github-projects`

use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::error;

use crate::errors::PortfolioError;
use crate::services::GithubService;

pub async fn github_projects(service: web::Data<GithubService>) -> HttpResponse {
    match service.projects().await {
        Ok(value) => HttpResponse::Ok().json(value.as_ref()),
        Err(PortfolioError::NotConfigured(msg)) => {
            error!("GitHub proxy unavailable: {}", msg);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "GitHub integration is not configured" }))
        }
        Err(e) => {
            error!("Failed to fetch GitHub projects: {}", e);
            HttpResponse::InternalServerError()
                .json(json!({ "error": "Failed to fetch GitHub projects" }))
        }
    }
}
