//! GitHub GraphQL proxy for the projects section

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde_json::{Value, json};
use tracing::{debug, error};
use ureq::Agent;

use super::http;
use crate::errors::{PortfolioError, Result};

/// 置顶仓库 + 最近更新的仓库
pub const PROJECTS_QUERY: &str = r#"
query PortfolioProjects($login: String!, $count: Int!) {
  user(login: $login) {
    pinnedItems(first: 6, types: REPOSITORY) {
      nodes {
        ... on Repository {
          name
          description
          url
          homepageUrl
          stargazerCount
          forkCount
          primaryLanguage { name color }
          repositoryTopics(first: 10) { nodes { topic { name } } }
          updatedAt
        }
      }
    }
    repositories(
      first: $count
      orderBy: { field: UPDATED_AT, direction: DESC }
      privacy: PUBLIC
      ownerAffiliations: OWNER
    ) {
      nodes {
        name
        description
        url
        homepageUrl
        stargazerCount
        forkCount
        primaryLanguage { name color }
        updatedAt
      }
    }
  }
}
"#;

pub struct GithubService {
    agent: Agent,
    api_url: String,
    token: String,
    username: String,
    repo_count: u32,
    cache: Option<Cache<&'static str, Arc<Value>>>,
}

impl GithubService {
    pub fn new(
        agent: Agent,
        api_url: impl Into<String>,
        token: impl Into<String>,
        username: impl Into<String>,
        repo_count: u32,
        cache_ttl_secs: u64,
    ) -> Self {
        let cache = (cache_ttl_secs > 0).then(|| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(cache_ttl_secs))
                .build()
        });
        Self {
            agent,
            api_url: api_url.into(),
            token: token.into(),
            username: username.into(),
            repo_count,
            cache,
        }
    }

    pub fn request_body(&self) -> Value {
        json!({
            "query": PROJECTS_QUERY,
            "variables": {
                "login": self.username,
                "count": self.repo_count,
            }
        })
    }

    /// 原样返回上游 JSON
    pub async fn projects(&self) -> Result<Arc<Value>> {
        if self.token.is_empty() {
            return Err(PortfolioError::not_configured("GitHub token is not configured"));
        }
        match &self.cache {
            Some(cache) => cache
                .try_get_with("projects", self.fetch())
                .await
                .map_err(|e| (*e).clone()),
            None => self.fetch().await,
        }
    }

    async fn fetch(&self) -> Result<Arc<Value>> {
        let resp = http::post_json(
            &self.agent,
            "github",
            &self.api_url,
            &self.token,
            self.request_body(),
        )
        .await?;

        if !resp.is_success() {
            error!(
                "GitHub API returned {}: {}",
                resp.status,
                resp.body_excerpt()
            );
            return Err(PortfolioError::upstream(format!(
                "GitHub API returned status {}",
                resp.status
            )));
        }

        let value: Value = serde_json::from_str(&resp.body)?;
        if let Some(message) = graphql_failure(&value) {
            error!("GitHub GraphQL query failed: {}", message);
            return Err(PortfolioError::upstream(format!(
                "GitHub GraphQL query failed: {}",
                message
            )));
        }
        debug!("GitHub projects fetched for {}", self.username);
        Ok(Arc::new(value))
    }
}

/// GraphQL 出错时仍返回 200：`errors` 非空且没有 `data`
fn graphql_failure(value: &Value) -> Option<String> {
    let errors = value.get("errors")?.as_array().filter(|e| !e.is_empty())?;
    if value.get("data").is_some_and(|d| !d.is_null()) {
        return None;
    }
    let message = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("; ");
    Some(if message.is_empty() {
        "unknown error".to_string()
    } else {
        message
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_carries_variables() {
        let service = GithubService::new(
            http::build_agent(5),
            "http://localhost/graphql",
            "t",
            "octocat",
            4,
            0,
        );
        let body = service.request_body();
        assert_eq!(body["variables"]["login"], "octocat");
        assert_eq!(body["variables"]["count"], 4);
        assert!(body["query"].as_str().unwrap().contains("pinnedItems"));
    }

    #[test]
    fn test_graphql_failure_detection() {
        let failed = json!({"errors": [{"message": "Could not resolve to a User"}], "data": null});
        assert_eq!(
            graphql_failure(&failed).as_deref(),
            Some("Could not resolve to a User")
        );
        assert!(graphql_failure(&json!({"errors": [{"type": "RATE_LIMITED"}]})).is_some());

        // 部分成功按成功透传
        let partial = json!({"errors": [{"message": "x"}], "data": {"user": {}}});
        assert!(graphql_failure(&partial).is_none());
        assert!(graphql_failure(&json!({"errors": [], "data": null})).is_none());
        assert!(graphql_failure(&json!({"data": {"user": null}})).is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_not_configured() {
        let service = GithubService::new(
            http::build_agent(5),
            "http://localhost/graphql",
            "",
            "octocat",
            6,
            0,
        );
        assert!(matches!(
            service.projects().await,
            Err(PortfolioError::NotConfigured(_))
        ));
    }
}
