use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 监听地址、端口、worker 数量、可信代理
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - cors: 跨域配置（前端站点与 API 通常不同源）
/// - cms: 内容 API 路由前缀与写入 token
/// - contact / github / countries: 第三方 API
/// - upstream: 外部 HTTP 调用的公共参数
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub cms: CmsConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub countries: CountriesConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：PF，分隔符：__
    /// 示例：PF__SERVER__PORT=9999
    pub fn load_from(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 PF，分隔符 __
            .add_source(
                Environment::with_prefix("PF")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("server.trusted_proxies")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
    /// 可信反向代理（IP 或 CIDR），来自这些地址的请求使用 X-Forwarded-For
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
    /// JSON 请求体上限（KB）
    #[serde(default = "default_json_limit_kb")]
    pub json_limit_kb: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_cors_enabled")]
    pub enabled: bool,
    /// `["*"]` 表示允许任意来源
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
    #[serde(default)]
    pub allow_credentials: bool,
}

/// 内容 API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    #[serde(default = "default_cms_prefix")]
    pub prefix: String,
    /// 写操作所需的 Bearer token；为空时只开放公开提交接口
    #[serde(default)]
    pub api_token: String,
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
}

/// 联系表单邮件投递配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    #[serde(default = "default_contact_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_contact_from")]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default = "default_contact_subject")]
    pub subject_prefix: String,
    /// 令牌补充间隔（秒）
    #[serde(default = "default_contact_seconds_per_request")]
    pub seconds_per_request: u64,
    #[serde(default = "default_contact_burst")]
    pub burst_size: u32,
}

/// GitHub GraphQL 代理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_github_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub username: String,
    #[serde(default = "default_github_repo_count")]
    pub repo_count: u32,
}

/// 国家数据代理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesConfig {
    #[serde(default = "default_countries_api_url")]
    pub api_url: String,
}

/// 外部 HTTP 调用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
    /// 0 表示不缓存
    #[serde(default)]
    pub cache_ttl_secs: u64,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_json_limit_kb() -> usize {
    64
}

fn default_database_url() -> String {
    "portfolio.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_cors_enabled() -> bool {
    true
}

fn default_cors_max_age() -> u64 {
    3600
}

fn default_cms_prefix() -> String {
    "/cms".to_string()
}

fn default_page_size() -> u64 {
    25
}

fn default_contact_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_contact_from() -> String {
    "Portfolio <onboarding@resend.dev>".to_string()
}

fn default_contact_subject() -> String {
    "New portfolio message".to_string()
}

fn default_contact_seconds_per_request() -> u64 {
    12
}

fn default_contact_burst() -> u32 {
    3
}

fn default_github_api_url() -> String {
    "https://api.github.com/graphql".to_string()
}

fn default_github_repo_count() -> u32 {
    6
}

fn default_countries_api_url() -> String {
    "https://restcountries.com/v3.1/all?fields=name,cca2,cca3,flags,idd,region,capital,population"
        .to_string()
}

fn default_upstream_timeout() -> u64 {
    10
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
            trusted_proxies: Vec::new(),
            json_limit_kb: default_json_limit_kb(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: default_cors_enabled(),
            allowed_origins: Vec::new(),
            max_age: default_cors_max_age(),
            allow_credentials: false,
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            prefix: default_cms_prefix(),
            api_token: String::new(),
            default_page_size: default_page_size(),
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            api_url: default_contact_api_url(),
            api_key: String::new(),
            from: default_contact_from(),
            to: String::new(),
            subject_prefix: default_contact_subject(),
            seconds_per_request: default_contact_seconds_per_request(),
            burst_size: default_contact_burst(),
        }
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: default_github_api_url(),
            token: String::new(),
            username: String::new(),
            repo_count: default_github_repo_count(),
        }
    }
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            api_url: default_countries_api_url(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_upstream_timeout(),
            cache_ttl_secs: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[server]"));
        assert!(sample.contains("[contact]"));

        let parsed: StaticConfig = toml::from_str(&sample).expect("sample config should parse");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.cms.prefix, "/cms");
        assert_eq!(parsed.upstream.cache_ttl_secs, 0);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [github]
            username = "octocat"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.server.port, 9000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.github.username, "octocat");
        assert_eq!(parsed.github.repo_count, 6);
        assert!(parsed.contact.api_key.is_empty());
    }

    #[test]
    fn test_save_to_file_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        StaticConfig::default().save_to_file(&path).unwrap();

        let loaded = StaticConfig::load_from(path.to_str());
        assert_eq!(loaded.database.database_url, "portfolio.db");
    }
}
