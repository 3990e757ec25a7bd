//! Server mode
//!
//! Builds the actix application from a [`StartupContext`] and runs it until a
//! shutdown signal arrives.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::warn;

use crate::api::middleware::{CmsWriteGuard, RequestIdMiddleware};
use crate::api::services::helpers::envelope_payload_error;
use crate::api::services::{cms_routes, health_routes, public_api_routes};
use crate::config::CorsConfig;
use crate::runtime::lifetime::{self, startup::StartupContext};

/// 允许的跨域请求头
const ALLOWED_HEADERS: &[&str] = &["Content-Type", "Authorization", "Accept", "X-Request-ID"];

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(cors_config: &CorsConfig) {
    if !cors_config.enabled {
        return;
    }

    if cors_config.allowed_origins.is_empty() {
        warn!(
            "CORS enabled but allowed_origins is empty. \
            The portfolio frontend will not be able to call this API cross-origin."
        );
    }

    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");
    if is_any_origin && cors_config.allow_credentials {
        tracing::error!(
            "allow_any_origin + allow_credentials is not allowed, credentials disabled"
        );
    }
}

/// Build CORS middleware from configuration
pub fn build_cors_middleware(cors_config: &CorsConfig) -> Cors {
    // 关闭时退回浏览器默认的同源策略
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = Cors::default();
    let is_any_origin = cors_config.allowed_origins.iter().any(|o| o == "*");

    if is_any_origin {
        cors = cors.allow_any_origin();
    } else {
        for origin in &cors_config.allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors = cors.allowed_methods(vec!["GET", "HEAD", "POST", "PUT", "DELETE", "OPTIONS"]);
    for header in ALLOWED_HEADERS {
        cors = cors.allowed_header(*header);
    }
    cors = cors
        .expose_headers(vec!["X-Request-ID"])
        .max_age(cors_config.max_age as usize);

    if cors_config.allow_credentials && !is_any_origin {
        cors = cors.supports_credentials();
    }

    cors
}

/// 注册共享状态与全部路由
///
/// 测试通过 `App::new().configure(|cfg| configure_app(cfg, &ctx))` 获得与线上一致的路由表。
pub fn configure_app(cfg: &mut web::ServiceConfig, ctx: &StartupContext) {
    let route = &ctx.route_config;

    cfg.app_data(web::Data::new(ctx.storage.clone()))
        .app_data(web::Data::from(ctx.contact_service.clone()))
        .app_data(web::Data::from(ctx.countries_service.clone()))
        .app_data(web::Data::from(ctx.github_service.clone()))
        .app_data(web::Data::new(ctx.cms_settings.clone()))
        .app_data(web::Data::new(ctx.app_start_time.clone()))
        .app_data(
            web::JsonConfig::default()
                .limit(ctx.json_limit_bytes)
                .error_handler(envelope_payload_error),
        )
        .app_data(web::QueryConfig::default().error_handler(envelope_payload_error))
        .app_data(web::PathConfig::default().error_handler(envelope_payload_error))
        .service(health_routes())
        .service(public_api_routes(&ctx.contact_limit, ctx.json_limit_bytes))
        .service(
            cms_routes(&route.cms_prefix)
                .wrap(CmsWriteGuard::new(&route.cms_prefix, &route.cms_api_token)),
        );
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let config = crate::config::get_config();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    let cors_config = config.cors.clone();
    validate_cors_config(&cors_config);

    if config.server.trusted_proxies.is_empty() {
        warn!(
            "Contact rate limiting: no trusted proxies configured. \
             Connections from private IPs will use X-Forwarded-For."
        );
    } else {
        warn!(
            "Contact rate limiting: trusted proxies {:?}",
            config.server.trusted_proxies
        );
    }

    let storage_for_shutdown = startup.storage.clone();
    let context = startup.clone();

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(cors)
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(|cfg| configure_app(cfg, &context))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(&bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&storage_for_shutdown) => {
            warn!("Graceful shutdown: database closed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpResponse, http::header, test};

    fn cors(origins: &[&str], credentials: bool) -> CorsConfig {
        CorsConfig {
            enabled: true,
            allowed_origins: origins.iter().map(|s| s.to_string()).collect(),
            max_age: 600,
            allow_credentials: credentials,
        }
    }

    #[actix_web::test]
    async fn test_cors_allows_configured_origin() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&cors(&["https://me.dev"], false)))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://me.dev"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://me.dev"
        );
    }

    #[actix_web::test]
    async fn test_cors_wildcard_never_sends_credentials() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&cors(&["*"], true)))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://anywhere.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .is_none()
        );
    }
}
