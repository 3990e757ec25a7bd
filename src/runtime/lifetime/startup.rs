use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::services::{AppStartTime, CmsSettings, ContactRateLimit, contact_rate_limit};
use crate::config::StaticConfig;
use crate::services::{ContactService, CountriesService, GithubService, HttpMailer, http};
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器运行所需的全部共享状态
///
/// 每个 worker 从这里克隆 `Arc`，上游客户端在进程内只构建一次。
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub contact_service: Arc<ContactService>,
    pub countries_service: Arc<CountriesService>,
    pub github_service: Arc<GithubService>,
    pub contact_limit: ContactRateLimit,
    pub cms_settings: CmsSettings,
    pub route_config: RouteConfig,
    pub app_start_time: AppStartTime,
    pub json_limit_bytes: usize,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub cms_prefix: String,
    pub cms_api_token: String,
}

/// 准备服务器启动的上下文：连接数据库、执行迁移、构建上游客户端
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = crate::config::get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = build_context(&config, storage)?;

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}

/// 在已有存储之上组装上下文，测试中直接传入临时数据库
pub fn build_context(config: &StaticConfig, storage: Arc<SeaOrmStorage>) -> Result<StartupContext> {
    let agent = http::build_agent(config.upstream.timeout_secs);
    let cache_ttl = config.upstream.cache_ttl_secs;

    if config.contact.api_key.is_empty() {
        warn!("contact.api_key is empty, POST /api/contact will fail until it is configured");
    }
    let mailer = HttpMailer::new(
        agent.clone(),
        config.contact.api_url.clone(),
        config.contact.api_key.clone(),
    );
    let contact_service = ContactService::new(
        Arc::new(mailer),
        config.contact.from.clone(),
        config.contact.to.clone(),
        config.contact.subject_prefix.clone(),
    );

    let countries_service =
        CountriesService::new(agent.clone(), config.countries.api_url.clone(), cache_ttl);

    if config.github.token.is_empty() {
        warn!("github.token is empty, GET /api/github-projects will report an error");
    }
    let github_service = GithubService::new(
        agent,
        config.github.api_url.clone(),
        config.github.token.clone(),
        config.github.username.clone(),
        config.github.repo_count,
        cache_ttl,
    );

    let contact_limit =
        contact_rate_limit(&config.contact, config.server.trusted_proxies.clone())
            .context("Failed to build contact rate limiter")?;

    if config.cms.api_token.is_empty() {
        warn!("cms.api_token is empty, CMS writes are disabled");
    }

    Ok(StartupContext {
        storage,
        contact_service: Arc::new(contact_service),
        countries_service: Arc::new(countries_service),
        github_service: Arc::new(github_service),
        contact_limit,
        cms_settings: CmsSettings {
            default_page_size: config.cms.default_page_size,
        },
        route_config: RouteConfig {
            cms_prefix: config.cms.prefix.clone(),
            cms_api_token: config.cms.api_token.clone(),
        },
        app_start_time: AppStartTime {
            start_datetime: chrono::Utc::now(),
        },
        json_limit_bytes: config.server.json_limit_kb.max(1) * 1024,
    })
}
