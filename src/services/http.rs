//! 上游 HTTP 调用
//!
//! ureq 是阻塞客户端，所有请求都放到 `spawn_blocking` 中执行。Agent 关闭了
//! `http_status_as_error`，调用方可以读取 4xx/5xx 的响应体。

use std::time::Duration;

use serde::Serialize;
use tracing::warn;
use ureq::Agent;

use crate::errors::{PortfolioError, Result};

pub fn build_agent(timeout_secs: u64) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs.max(1))))
        .http_status_as_error(false)
        .build()
        .into()
}

#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 响应体的前 200 个字符，用于日志
    pub fn body_excerpt(&self) -> String {
        self.body.chars().take(200).collect()
    }
}

async fn run_blocking<T, F>(label: &'static str, f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap_or_else(|e| {
        warn!("{} request task failed: {}", label, e);
        Err(PortfolioError::upstream(format!("{} request aborted", label)))
    })
}

pub async fn get(agent: &Agent, label: &'static str, url: &str) -> Result<UpstreamResponse> {
    let agent = agent.clone();
    let url = url.to_string();
    run_blocking(label, move || {
        let resp = agent.get(&url).call()?;
        let status = resp.status().as_u16();
        let body = resp.into_body().read_to_string()?;
        Ok(UpstreamResponse { status, body })
    })
    .await
}

pub async fn post_json<B>(
    agent: &Agent,
    label: &'static str,
    url: &str,
    bearer: &str,
    body: B,
) -> Result<UpstreamResponse>
where
    B: Serialize + Send + 'static,
{
    let agent = agent.clone();
    let url = url.to_string();
    let auth = format!("Bearer {}", bearer);
    run_blocking(label, move || {
        let resp = agent
            .post(&url)
            .header("Authorization", &auth)
            .header("Accept", "application/json")
            .send_json(&body)?;
        let status = resp.status().as_u16();
        let body = resp.into_body().read_to_string()?;
        Ok(UpstreamResponse { status, body })
    })
    .await
}
