//! Hero, about and experience handlers

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde_json::json;

use super::{CmsSettings, PreviewQuery};
use crate::api::services::helpers::{
    api_result, created_response, error_from_portfolio, paginated_result, success_response,
};
use crate::errors::PortfolioError;
use crate::storage::models::{AboutSectionInput, ExperienceInput, HeroSectionInput};
use crate::storage::{PageQuery, SeaOrmStorage};

type Storage = web::Data<Arc<SeaOrmStorage>>;

pub async fn get_hero_section(storage: Storage) -> HttpResponse {
    api_result(storage.get_hero_section().await.and_then(|hero| {
        hero.ok_or_else(|| PortfolioError::not_found("hero section has not been created"))
    }))
}

pub async fn put_hero_section(storage: Storage, body: web::Json<HeroSectionInput>) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(storage.put_hero_section(input).await)
}

pub async fn get_about_section(storage: Storage) -> HttpResponse {
    api_result(storage.get_about_section().await.and_then(|about| {
        about.ok_or_else(|| PortfolioError::not_found("about section has not been created"))
    }))
}

pub async fn put_about_section(
    storage: Storage,
    body: web::Json<AboutSectionInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(storage.put_about_section(input).await)
}

pub async fn list_experiences(
    storage: Storage,
    settings: web::Data<CmsSettings>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let (page, page_size) = settings.page(&query);
    paginated_result(
        storage
            .list_experiences(page, page_size, query.include_drafts())
            .await,
    )
}

pub async fn get_experience(
    storage: Storage,
    id: web::Path<i32>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse {
    api_result(
        storage
            .get_experience(id.into_inner(), query.include_drafts())
            .await,
    )
}

pub async fn create_experience(
    storage: Storage,
    body: web::Json<ExperienceInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    match storage.create_experience(input).await {
        Ok(experience) => created_response(experience),
        Err(e) => error_from_portfolio(&e),
    }
}

pub async fn update_experience(
    storage: Storage,
    id: web::Path<i32>,
    body: web::Json<ExperienceInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(storage.update_experience(id.into_inner(), input).await)
}

pub async fn delete_experience(storage: Storage, id: web::Path<i32>) -> HttpResponse {
    let id = id.into_inner();
    match storage.delete_experience(id).await {
        Ok(()) => success_response(json!({ "id": id })),
        Err(e) => error_from_portfolio(&e),
    }
}
