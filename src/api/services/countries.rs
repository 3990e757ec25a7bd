//! `GET /api/countries`

use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::error;

use crate::services::CountriesService;

pub async fn list_countries(service: web::Data<CountriesService>) -> HttpResponse {
    match service.list().await {
        Ok(countries) => HttpResponse::Ok().json(countries.as_ref()),
        Err(e) => {
            error!("Failed to fetch countries: {}", e);
            HttpResponse::InternalServerError().json(json!({ "error": "Failed to fetch countries" }))
        }
    }
}
