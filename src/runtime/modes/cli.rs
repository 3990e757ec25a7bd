//! CLI mode
//!
//! One-shot maintenance commands. None of them start the HTTP server.

use std::path::Path;

use colored::Colorize;

use crate::cli::{Commands, ConfigCommands};
use crate::config::{StaticConfig, get_config};
use crate::errors::{PortfolioError, Result};
use crate::storage::StorageFactory;

const MASK: &str = "********";

pub async fn run_cli(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Serve => Err(PortfolioError::validation(
            "serve is handled by server mode",
        )),
        Commands::Migrate => migrate().await,
        Commands::Config { action } => match action {
            ConfigCommands::Generate { output_path, force } => config_generate(output_path, force),
            ConfigCommands::Show => config_show(),
        },
    }
}

/// 建立连接即会执行全部待定迁移
async fn migrate() -> Result<()> {
    let config = get_config();
    println!(
        "{} {}",
        "Running migrations against".yellow(),
        config.database.database_url.blue()
    );
    let storage = StorageFactory::create_with(&config.database).await?;
    storage.close().await?;
    println!("  {}", "Database schema is up to date".green());
    Ok(())
}

fn config_generate(output_path: Option<String>, force: bool) -> Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if !force && Path::new(&path).exists() {
        return Err(PortfolioError::file_operation(format!(
            "{} already exists, pass --force to overwrite",
            path
        )));
    }

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| PortfolioError::file_operation(format!("{}: {}", path, e)))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Secrets can also be supplied as PF__SECTION__KEY environment variables".dimmed()
    );
    Ok(())
}

fn config_show() -> Result<()> {
    let masked = redact(&get_config());
    let content = toml::to_string_pretty(&masked)
        .map_err(|e| PortfolioError::serialization(e.to_string()))?;
    println!("{}", content);
    Ok(())
}

fn mask(value: &mut String) {
    if !value.is_empty() {
        *value = MASK.to_string();
    }
}

/// 复制一份配置并遮蔽所有密钥
fn redact(config: &StaticConfig) -> StaticConfig {
    let mut copy = config.clone();
    mask(&mut copy.cms.api_token);
    mask(&mut copy.contact.api_key);
    mask(&mut copy.github.token);
    copy
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_masks_only_set_secrets() {
        let mut config = StaticConfig::default();
        config.cms.api_token = "cms-secret".to_string();
        config.github.token = "ghp_abc".to_string();

        let masked = redact(&config);
        assert_eq!(masked.cms.api_token, MASK);
        assert_eq!(masked.github.token, MASK);
        assert!(masked.contact.api_key.is_empty());
        assert_eq!(config.cms.api_token, "cms-secret");
    }

    #[test]
    fn test_generate_refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "existing").unwrap();
        let path = path.to_string_lossy().to_string();

        assert!(config_generate(Some(path.clone()), false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");

        config_generate(Some(path.clone()), true).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[server]"));
    }
}
