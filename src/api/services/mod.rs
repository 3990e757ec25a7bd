pub mod cms;
pub mod contact;
pub mod countries;
pub mod github;
pub mod health;
pub mod helpers;
pub mod visitor;

use actix_governor::Governor;
use actix_web::web;

pub use cms::{CmsSettings, cms_routes};
pub use contact::{ContactRateLimit, contact_rate_limit};
pub use health::{AppStartTime, HealthService, health_routes};
pub use helpers::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo};

/// 前端直接调用的代理接口，挂载在 `/api`
pub fn public_api_routes(
    contact_limit: &ContactRateLimit,
    json_limit: usize,
) -> actix_web::Scope {
    web::scope("/api")
        .service(
            web::resource("/contact")
                .app_data(
                    web::JsonConfig::default()
                        .limit(json_limit)
                        .error_handler(contact::contact_json_error),
                )
                .wrap(Governor::new(contact_limit))
                .route(web::post().to(contact::submit_contact)),
        )
        .service(web::resource("/countries").route(web::get().to(countries::list_countries)))
        .service(
            web::resource("/github-projects").route(web::get().to(github::github_projects)),
        )
        .service(
            web::resource("/visitor")
                .route(web::get().to(visitor::get_visitor_count))
                .route(web::post().to(visitor::record_visit)),
        )
}
