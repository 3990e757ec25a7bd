//! Feedback and visitor count handlers

use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use super::{CmsSettings, PreviewQuery};
use crate::api::middleware::CmsAuthorized;
use crate::api::services::helpers::{
    api_result, created_response, error_from_portfolio, paginated_result, success_response,
};
use crate::storage::models::FeedbackInput;
use crate::storage::{PageQuery, SeaOrmStorage};

type Storage = web::Data<Arc<SeaOrmStorage>>;

const DEFAULT_HISTORY_LIMIT: usize = 30;
const MAX_HISTORY_LIMIT: usize = 1000;

pub async fn list_feedbacks(
    storage: Storage,
    settings: web::Data<CmsSettings>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let (page, page_size) = settings.page(&query);
    paginated_result(
        storage
            .list_feedbacks(page, page_size, query.include_drafts())
            .await,
    )
}

pub async fn get_feedback(
    storage: Storage,
    id: web::Path<i32>,
    query: web::Query<PreviewQuery>,
) -> HttpResponse {
    api_result(
        storage
            .get_feedback(id.into_inner(), query.include_drafts())
            .await,
    )
}

/// 访客提交，无需鉴权；匿名提交一律存为草稿，由站长审核后发布
pub async fn create_feedback(
    req: HttpRequest,
    storage: Storage,
    body: web::Json<FeedbackInput>,
) -> HttpResponse {
    let mut input = body.into_inner();
    if !req.extensions().contains::<CmsAuthorized>() {
        input.publish = Some(false);
    }
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    match storage.create_feedback(input).await {
        Ok(feedback) => created_response(feedback),
        Err(e) => error_from_portfolio(&e),
    }
}

pub async fn update_feedback(
    storage: Storage,
    id: web::Path<i32>,
    body: web::Json<FeedbackInput>,
) -> HttpResponse {
    let input = body.into_inner();
    if let Err(e) = input.validate() {
        return error_from_portfolio(&e);
    }
    api_result(storage.update_feedback(id.into_inner(), input).await)
}

pub async fn delete_feedback(storage: Storage, id: web::Path<i32>) -> HttpResponse {
    let id = id.into_inner();
    match storage.delete_feedback(id).await {
        Ok(()) => success_response(json!({ "id": id })),
        Err(e) => error_from_portfolio(&e),
    }
}

pub async fn feedback_stats(storage: Storage) -> HttpResponse {
    api_result(storage.feedback_stats().await)
}

pub async fn get_visitor_count(storage: Storage) -> HttpResponse {
    api_result(storage.get_visitor_count().await)
}

pub async fn increment_visitor_count(storage: Storage) -> HttpResponse {
    api_result(storage.increment_visitor_count().await)
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn visitor_history(storage: Storage, query: web::Query<HistoryQuery>) -> HttpResponse {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);
    api_result(storage.visitor_history(limit).await)
}
