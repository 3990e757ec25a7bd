//! `GET|POST /api/visitor`
//!
//! Thin wrapper over the CMS visitor counter returning only `{count}`.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::error;

use crate::errors::Result;
use crate::storage::SeaOrmStorage;
use crate::storage::models::VisitorCount;

fn count_response(result: Result<VisitorCount>, failure: &str) -> HttpResponse {
    match result {
        Ok(visitor) => HttpResponse::Ok().json(json!({ "count": visitor.count })),
        Err(e) => {
            error!("Visitor counter failed: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": failure }))
        }
    }
}

pub async fn get_visitor_count(storage: web::Data<Arc<SeaOrmStorage>>) -> HttpResponse {
    count_response(
        storage.get_visitor_count().await,
        "Failed to fetch visitor count",
    )
}

pub async fn record_visit(storage: web::Data<Arc<SeaOrmStorage>>) -> HttpResponse {
    count_response(
        storage.increment_visitor_count().await,
        "Failed to update visitor count",
    )
}
