//! 内容类型的请求/响应模型
//!
//! 响应模型通过 ts-rs 导出给前端使用。

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{PortfolioError, Result};
use crate::utils::validate_http_url;
use migration::entities::{
    about_section, experience, feedback, hero_section, skill, skill_year, wakatime_stat,
};

/// 输出目录常量
pub const TS_EXPORT_PATH: &str = "../web/src/types/api.generated.ts";

const MAX_TEXT_LEN: usize = 10_000;
const MAX_FEEDBACK_LEN: usize = 2_000;

fn require_non_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PortfolioError::validation(format!("{} is required", field)));
    }
    Ok(())
}

fn require_max_len(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(PortfolioError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

/// 可选链接：空串视为未填写
fn optional_url(field: &str, value: Option<&str>) -> Result<()> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => validate_http_url(field, v),
        None => Ok(()),
    }
}

// ============ 分页 ============

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// 包含草稿（未发布）内容
    pub preview: Option<bool>,
}

impl PageQuery {
    /// 返回 (page, page_size)，page 从 1 开始，page_size 限制在 1..=100
    pub fn resolve(&self, default_page_size: u64) -> (u64, u64) {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.unwrap_or(default_page_size).clamp(1, 100);
        (page, page_size)
    }

    pub fn include_drafts(&self) -> bool {
        self.preview.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u64, page_size: u64, total: u64) -> Self {
        Self {
            items,
            page,
            page_size,
            total,
            total_pages: total.div_ceil(page_size.max(1)),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total: self.total,
            total_pages: self.total_pages,
        }
    }
}

// ============ Single types ============

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HeroSectionInput {
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub avatar_url: Option<String>,
}

impl HeroSectionInput {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("title", &self.title)?;
        if let Some(description) = &self.description {
            require_max_len("description", description, MAX_TEXT_LEN)?;
        }
        optional_url("cta_url", self.cta_url.as_deref())?;
        optional_url("avatar_url", self.avatar_url.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct HeroSection {
    pub id: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub avatar_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<hero_section::Model> for HeroSection {
    fn from(m: hero_section::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            subtitle: m.subtitle,
            description: m.description,
            cta_label: m.cta_label,
            cta_url: m.cta_url,
            avatar_url: m.avatar_url,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AboutSectionInput {
    pub heading: String,
    pub body: String,
    pub resume_url: Option<String>,
    pub location: Option<String>,
}

impl AboutSectionInput {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("heading", &self.heading)?;
        require_non_blank("body", &self.body)?;
        require_max_len("body", &self.body, MAX_TEXT_LEN)?;
        optional_url("resume_url", self.resume_url.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct AboutSection {
    pub id: i32,
    pub heading: String,
    pub body: String,
    pub resume_url: Option<String>,
    pub location: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<about_section::Model> for AboutSection {
    fn from(m: about_section::Model) -> Self {
        Self {
            id: m.id,
            heading: m.heading,
            body: m.body,
            resume_url: m.resume_url,
            location: m.location,
            updated_at: m.updated_at,
        }
    }
}

// ============ Skills ============

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SkillYearInput {
    pub year: i32,
    pub label: Option<String>,
    pub publish: Option<bool>,
}

impl SkillYearInput {
    pub fn validate(&self) -> Result<()> {
        if !(1970..=2100).contains(&self.year) {
            return Err(PortfolioError::validation(format!(
                "year {} is out of range",
                self.year
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SkillYear {
    pub id: i32,
    pub year: i32,
    pub label: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<skill_year::Model> for SkillYear {
    fn from(m: skill_year::Model) -> Self {
        Self {
            id: m.id,
            year: m.year,
            label: m.label,
            published_at: m.published_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct SkillInput {
    pub name: String,
    pub category: Option<String>,
    pub level: Option<i32>,
    pub icon: Option<String>,
    pub skill_year_id: Option<i32>,
    pub publish: Option<bool>,
}

impl SkillInput {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("name", &self.name)?;
        if let Some(level) = self.level
            && !(0..=100).contains(&level)
        {
            return Err(PortfolioError::validation("level must be between 0 and 100"));
        }
        Ok(())
    }
}

/// Skill with its `skill_year` relation populated
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub level: i32,
    pub icon: Option<String>,
    pub hours: i64,
    pub minutes: i32,
    pub skill_year: Option<SkillYear>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl Skill {
    pub fn from_parts(m: skill::Model, year: Option<skill_year::Model>) -> Self {
        Self {
            id: m.id,
            name: m.name,
            category: m.category,
            level: m.level,
            icon: m.icon,
            hours: m.hours,
            minutes: m.minutes,
            skill_year: year.map(SkillYear::from),
            published_at: m.published_at,
            updated_at: m.updated_at,
        }
    }
}

/// Body of `PUT /skills/{id}/update-hours`
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct UpdateHoursInput {
    pub date: NaiveDate,
    pub seconds: i64,
}

/// Body of `POST /wakatime-stats`
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct WakatimeStatInput {
    pub skill_id: i32,
    pub date: NaiveDate,
    pub seconds: i64,
}

impl WakatimeStatInput {
    pub fn validate(&self) -> Result<()> {
        // 一天最多 86400 秒
        if !(0..=86_400).contains(&self.seconds) {
            return Err(PortfolioError::validation(
                "seconds must be between 0 and 86400",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct WakatimeStat {
    pub id: i32,
    pub skill_id: i32,
    pub date: NaiveDate,
    pub seconds: i64,
    pub updated_at: DateTime<Utc>,
}

impl From<wakatime_stat::Model> for WakatimeStat {
    fn from(m: wakatime_stat::Model) -> Self {
        Self {
            id: m.id,
            skill_id: m.skill_id,
            date: m.date,
            seconds: m.seconds,
            updated_at: m.updated_at,
        }
    }
}

/// 由总秒数推导 (hours, minutes)
pub fn split_seconds(total_seconds: i64) -> (i64, i32) {
    let total = total_seconds.max(0);
    let hours = total / 3600;
    let minutes = ((total % 3600) / 60) as i32;
    (hours, minutes)
}

// ============ Experience ============

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ExperienceInput {
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub publish: Option<bool>,
}

impl ExperienceInput {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("company", &self.company)?;
        require_non_blank("role", &self.role)?;
        if let Some(end) = self.end_date
            && end < self.start_date
        {
            return Err(PortfolioError::validation(
                "end_date must not be before start_date",
            ));
        }
        if let Some(description) = &self.description {
            require_max_len("description", description, MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Experience {
    pub id: i32,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub description: Option<String>,
    pub sort_order: i32,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<experience::Model> for Experience {
    fn from(m: experience::Model) -> Self {
        Self {
            id: m.id,
            company: m.company,
            role: m.role,
            location: m.location,
            start_date: m.start_date,
            current: m.end_date.is_none(),
            end_date: m.end_date,
            description: m.description,
            sort_order: m.sort_order,
            published_at: m.published_at,
        }
    }
}

// ============ Feedback ============

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FeedbackInput {
    pub name: String,
    pub email: Option<String>,
    pub message: String,
    pub rating: i32,
    pub publish: Option<bool>,
}

impl FeedbackInput {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("name", &self.name)?;
        require_non_blank("message", &self.message)?;
        require_max_len("message", &self.message, MAX_FEEDBACK_LEN)?;
        if !(1..=5).contains(&self.rating) {
            return Err(PortfolioError::validation("rating must be between 1 and 5"));
        }
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty())
            && !crate::utils::is_valid_email(email)
        {
            return Err(PortfolioError::validation("email is not valid"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct Feedback {
    pub id: i32,
    pub name: String,
    pub message: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<feedback::Model> for Feedback {
    // email 不对外返回
    fn from(m: feedback::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            message: m.message,
            rating: m.rating,
            created_at: m.created_at,
            published_at: m.published_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct FeedbackStats {
    pub total: u64,
    pub average_rating: f64,
    /// rating (1-5) → count
    pub distribution: BTreeMap<u8, u64>,
}

impl FeedbackStats {
    pub fn from_ratings(ratings: &[i32]) -> Self {
        let mut distribution: BTreeMap<u8, u64> = (1..=5).map(|r| (r, 0)).collect();
        let mut sum = 0i64;
        let mut total = 0u64;

        for &rating in ratings {
            if let Ok(r) = u8::try_from(rating)
                && let Some(slot) = distribution.get_mut(&r)
            {
                *slot += 1;
                sum += rating as i64;
                total += 1;
            }
        }

        let average_rating = if total == 0 {
            0.0
        } else {
            ((sum as f64 / total as f64) * 100.0).round() / 100.0
        };

        Self {
            total,
            average_rating,
            distribution,
        }
    }
}

// ============ Visitor count ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct VisitorHistoryEntry {
    pub count: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct VisitorCount {
    pub count: i64,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_seconds() {
        assert_eq!(split_seconds(0), (0, 0));
        assert_eq!(split_seconds(59), (0, 0));
        assert_eq!(split_seconds(3661), (1, 1));
        assert_eq!(split_seconds(7200 + 45 * 60 + 30), (2, 45));
        assert_eq!(split_seconds(-10), (0, 0));
    }

    #[test]
    fn test_feedback_stats_empty() {
        let stats = FeedbackStats::from_ratings(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.distribution.len(), 5);
        assert!(stats.distribution.values().all(|&c| c == 0));
    }

    #[test]
    fn test_feedback_stats_average_and_distribution() {
        let stats = FeedbackStats::from_ratings(&[5, 4, 4, 2]);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.average_rating, 3.75);
        assert_eq!(stats.distribution[&4], 2);
        assert_eq!(stats.distribution[&3], 0);
    }

    #[test]
    fn test_feedback_stats_rounds_to_two_decimals() {
        let stats = FeedbackStats::from_ratings(&[5, 4, 4]);
        assert_eq!(stats.average_rating, 4.33);
    }

    #[test]
    fn test_page_query_resolve_clamps() {
        let q = PageQuery {
            page: Some(0),
            page_size: Some(500),
            preview: None,
        };
        assert_eq!(q.resolve(25), (1, 100));
        assert_eq!(PageQuery::default().resolve(25), (1, 25));
        assert!(!PageQuery::default().include_drafts());
    }

    #[test]
    fn test_page_total_pages() {
        let page = Page::new(vec![1, 2, 3], 1, 2, 5);
        assert_eq!(page.total_pages, 3);
        let mapped = page.map(|x| x * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
    }

    #[test]
    fn test_feedback_validation() {
        let mut input = FeedbackInput {
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            message: "Great work".to_string(),
            rating: 5,
            publish: None,
        };
        assert!(input.validate().is_ok());

        input.rating = 6;
        assert!(matches!(
            input.validate(),
            Err(PortfolioError::Validation(_))
        ));

        input.rating = 3;
        input.email = Some("not-an-email".to_string());
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_experience_rejects_inverted_dates() {
        let input = ExperienceInput {
            company: "Acme".to_string(),
            role: "Engineer".to_string(),
            location: None,
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1),
            description: None,
            sort_order: None,
            publish: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_hero_rejects_script_links() {
        let mut input = HeroSectionInput {
            title: "Hi".to_string(),
            subtitle: None,
            description: None,
            cta_label: Some("Contact".to_string()),
            cta_url: Some("javascript:void(0)".to_string()),
            avatar_url: Some(String::new()),
        };
        assert!(input.validate().is_err());

        input.cta_url = Some("https://example.com/#contact".to_string());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_wakatime_seconds_bounds() {
        let input = WakatimeStatInput {
            skill_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            seconds: 90_000,
        };
        assert!(input.validate().is_err());
    }
}
