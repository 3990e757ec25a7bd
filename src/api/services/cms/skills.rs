//! Skill years, skills and wakatime stats

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use super::{CmsSettings, PreviewQuery};
use crate::api::services::helpers::{
    api_result, created_response, error_from_portfolio, paginated_result, success_response,
};
use crate::storage::models::{SkillInput, SkillYearInput, UpdateHoursInput, WakatimeStatInput};
use crate::storage::{PageQuery, SeaOrmStorage};

type Storage = web::Data<Arc<SeaOrmStorage>>;

// ============ skill years ============

pub async fn list_skill_years(
    storage: Storage,
    settings: web::Data<CmsSettings>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let (page, page_size) = settings.page(&query);
    paginated_result(
        storage
            .list_skill_years(page, page_size, query.include_drafts())
            .await,
    )
}

pub async fn get_skill_year(
    storage: Storage,
    id: web::Path<i32>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse {
    api_result(
        storage
            .get_skill_year(id.into_inner(), query.include_drafts())
            .await,
    )
}

pub async fn create_skill_year(storage: Storage, body: web::Json<SkillYearInput>) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    match storage.create_skill_year(input).await {
        Ok(year) => created_response(year),
        Err(e) => error_from_portfolio(&e),
    }
}

pub async fn update_skill_year(
    storage: Storage,
    id: web::Path<i32>,
    body: web::Json<SkillYearInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(storage.update_skill_year(id.into_inner(), input).await)
}

pub async fn delete_skill_year(storage: Storage, id: web::Path<i32>) -> HttpResponse {
    let id = id.into_inner();
    match storage.delete_skill_year(id).await {
        Ok(()) => success_response(json!({ "id": id })),
        Err(e) => error_from_portfolio(&e),
    }
}

// ============ skills ============

pub async fn list_skills(
    storage: Storage,
    settings: web::Data<CmsSettings>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let (page, page_size) = settings.page(&query);
    paginated_result(
        storage
            .list_skills(page, page_size, query.include_drafts())
            .await,
    )
}

pub async fn get_skill(
    storage: Storage,
    id: web::Path<i32>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse {
    api_result(
        storage
            .get_skill(id.into_inner(), query.include_drafts())
            .await,
    )
}

pub async fn create_skill(storage: Storage, body: web::Json<SkillInput>) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    match storage.create_skill(input).await {
        Ok(skill) => created_response(skill),
        Err(e) => error_from_portfolio(&e),
    }
}

pub async fn update_skill(
    storage: Storage,
    id: web::Path<i32>,
    body: web::Json<SkillInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(storage.update_skill(id.into_inner(), input).await)
}

pub async fn delete_skill(storage: Storage, id: web::Path<i32>) -> HttpResponse {
    let id = id.into_inner();
    match storage.delete_skill(id).await {
        Ok(()) => success_response(json!({ "id": id })),
        Err(e) => error_from_portfolio(&e),
    }
}

/// `PUT /skills/{id}/update-hours`
pub async fn update_skill_hours(
    storage: Storage,
    id: web::Path<i32>,
    body: web::Json<UpdateHoursInput>,
) -> HttpResponse {
    let body = body.into_inner();
    let input = WakatimeStatInput {
        skill_id: id.into_inner(),
        date: body.date,
        seconds: body.seconds,
    };
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(
        storage
            .upsert_wakatime_stat(input.skill_id, input.date, input.seconds)
            .await,
    )
}

// ============ wakatime stats ============

#[derive(Debug, Default, Deserialize)]
pub struct WakatimeQuery {
    pub skill_id: Option<i32>,
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

pub async fn list_wakatime_stats(
    storage: Storage,
    settings: web::Data<CmsSettings>,
    query: web::Query<WakatimeQuery>,
) -> HttpResponse {
    let paging = PageQuery {
        page: query.page,
        page_size: query.page_size,
        preview: None,
    };
    let (page, page_size) = settings.page(&paging);
    paginated_result(
        storage
            .list_wakatime_stats(query.skill_id, page, page_size)
            .await,
    )
}

pub async fn create_wakatime_stat(
    storage: Storage,
    body: web::Json<WakatimeStatInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(
        storage
            .upsert_wakatime_stat(input.skill_id, input.date, input.seconds)
            .await,
    )
}
