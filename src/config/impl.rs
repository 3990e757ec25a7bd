use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
        .load_full()
}

/// Like [`get_config`], but returns `None` before initialization.
pub fn try_get_config() -> Option<Arc<StaticConfig>> {
    CONFIG.get().map(|c| c.load_full())
}

/// Initialize the global configuration from `config.toml`
///
/// If the file doesn't exist, uses in-memory defaults plus `PF__*`
/// environment overrides.
///
/// # Examples
/// ```no_run
/// use portfolio::config::init_config;
/// init_config();
/// ```
pub fn init_config() {
    init_config_from(None);
}

/// Initialize the global configuration from an explicit file path
///
/// Only the first call has any effect; later calls keep the loaded config.
pub fn init_config_from(path: Option<&str>) {
    CONFIG.get_or_init(|| ArcSwap::from_pointee(StaticConfig::load_from(path)));
}
