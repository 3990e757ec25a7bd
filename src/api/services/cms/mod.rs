//! CMS REST routes
//!
//! Mounted under `cms.prefix`. Reads are public and only return published
//! entries unless `preview=true`; writes pass through [`CmsWriteGuard`].
//!
//! [`CmsWriteGuard`]: crate::api::middleware::CmsWriteGuard

mod content;
mod engagement;
mod skills;

use actix_web::web;
use serde::Deserialize;

use crate::storage::PageQuery;

#[derive(Debug, Clone)]
pub struct CmsSettings {
    pub default_page_size: u64,
}

impl CmsSettings {
    pub fn page(&self, query: &PageQuery) -> (u64, u64) {
        query.resolve(self.default_page_size)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub preview: Option<bool>,
}

impl PreviewQuery {
    pub fn include_drafts(&self) -> bool {
        self.preview.unwrap_or(false)
    }
}

pub fn cms_routes(prefix: &str) -> actix_web::Scope {
    web::scope(prefix)
        // single types
        .service(
            web::resource("/hero-section")
                .route(web::get().to(content::get_hero_section))
                .route(web::put().to(content::put_hero_section)),
        )
        .service(
            web::resource("/about-section")
                .route(web::get().to(content::get_about_section))
                .route(web::put().to(content::put_about_section)),
        )
        // skills
        .service(
            web::resource("/skill-years")
                .route(web::get().to(skills::list_skill_years))
                .route(web::post().to(skills::create_skill_year)),
        )
        .service(
            web::resource("/skill-years/{id}")
                .route(web::get().to(skills::get_skill_year))
                .route(web::put().to(skills::update_skill_year))
                .route(web::delete().to(skills::delete_skill_year)),
        )
        .service(
            web::resource("/skills")
                .route(web::get().to(skills::list_skills))
                .route(web::post().to(skills::create_skill)),
        )
        .service(
            web::resource("/skills/{id}/update-hours")
                .route(web::put().to(skills::update_skill_hours)),
        )
        .service(
            web::resource("/skills/{id}")
                .route(web::get().to(skills::get_skill))
                .route(web::put().to(skills::update_skill))
                .route(web::delete().to(skills::delete_skill)),
        )
        .service(
            web::resource("/wakatime-stats")
                .route(web::get().to(skills::list_wakatime_stats))
                .route(web::post().to(skills::create_wakatime_stat)),
        )
        // experience
        .service(
            web::resource("/experiences")
                .route(web::get().to(content::list_experiences))
                .route(web::post().to(content::create_experience)),
        )
        .service(
            web::resource("/experiences/{id}")
                .route(web::get().to(content::get_experience))
                .route(web::put().to(content::update_experience))
                .route(web::delete().to(content::delete_experience)),
        )
        // feedback（stats 必须先于 {id} 注册）
        .service(
            web::resource("/feedbacks")
                .route(web::get().to(engagement::list_feedbacks))
                .route(web::post().to(engagement::create_feedback)),
        )
        .service(web::resource("/feedbacks/stats").route(web::get().to(engagement::feedback_stats)))
        .service(
            web::resource("/feedbacks/{id}")
                .route(web::get().to(engagement::get_feedback))
                .route(web::put().to(engagement::update_feedback))
                .route(web::delete().to(engagement::delete_feedback)),
        )
        // visitor count
        .service(
            web::resource("/visitor-count").route(web::get().to(engagement::get_visitor_count)),
        )
        .service(
            web::resource("/visitor-count/increment")
                .route(web::post().to(engagement::increment_visitor_count)),
        )
        .service(
            web::resource("/visitor-count/history")
                .route(web::get().to(engagement::visitor_history)),
        )
}
