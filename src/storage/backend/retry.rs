//! 数据库写入重试
//!
//! 连接抖动、SQLite busy、死锁等瞬时错误按指数退避重试，其余错误直接返回。

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

// MySQL 1213/1205, PostgreSQL 40001/40P01, SQLite 5/6
const RETRYABLE_SQL_CODES: &[&str] = &["1213", "1205", "40001", "40P01", "5", "6"];

const RETRYABLE_MESSAGES: &[&str] = &[
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "serialization failure",
];

#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

pub fn is_retryable_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => true,
        DbErr::Exec(runtime) | DbErr::Query(runtime) => is_transient(runtime),
        _ => false,
    }
}

fn is_transient(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            use std::ops::Deref;
            let code = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
            match code {
                Some(code) => RETRYABLE_SQL_CODES.contains(&code.as_str()),
                None => message_is_transient(&sqlx_err.to_string()),
            }
        }
        RuntimeErr::Internal(msg) => message_is_transient(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn message_is_transient(msg: &str) -> bool {
    let lower = msg.to_lowercase();
    RETRYABLE_MESSAGES.iter().any(|needle| lower.contains(needle))
}

/// 执行 `operation`，瞬时错误时按退避间隔重试至多 `max_retries` 次
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("'{}' succeeded after {} retries", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < config.max_retries && is_retryable_error(&e) => {
                attempt += 1;
                let delay = backoff_delay(attempt, config.base_delay_ms, config.max_delay_ms);
                warn!(
                    "'{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// base * 2^(attempt-1)，封顶 max，再加 0-25% 抖动
fn backoff_delay(attempt: u32, base_ms: u64, max_ms: u64) -> u64 {
    use rand::RngExt;
    let exp = base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp.min(max_ms);
    let jitter = rand::rng().random_range(0..=capped / 4);
    capped.saturating_add(jitter)
}
