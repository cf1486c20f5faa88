//! Configuration I/O - loading configuration from files and environment.

use std::path::Path;

use super::types::Config;
use crate::error::{Error, Result};

/// A snapshot of the configuration file, used by diagnostics tooling.
#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub path: std::path::PathBuf,
    pub exists: bool,
    pub raw: Option<String>,
    pub config: Option<Config>,
    pub issues: Vec<String>,
}

/// Load configuration from the default path, falling back to environment
/// variables when no file is present.
pub fn load_config() -> Result<Config> {
    let config_path = super::paths::config_path();

    if config_path.exists() {
        load_config_from_path(&config_path)
    } else {
        load_config_from_env()
    }
}

/// Load configuration from a specific path.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;

    let config: Config = if path.extension().map_or(false, |ext| ext == "json") {
        json5::from_str(&content).map_err(|e| Error::Config(format!("Invalid JSON config: {}", e)))?
    } else if path.extension().map_or(false, |ext| ext == "toml") {
        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid TOML config: {}", e)))?
    } else {
        json5::from_str(&content)
            .or_else(|_| toml::from_str(&content).map_err(|e| Error::Config(e.to_string())))
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?
    };

    Ok(apply_env_overrides(config))
}

/// Load configuration purely from environment variables (and `.env`, if present).
pub fn load_config_from_env() -> Result<Config> {
    dotenvy::dotenv().ok();
    Ok(apply_env_overrides(Config::default()))
}

/// Overlay environment-variable values on top of a base configuration.
/// File-based config wins only where the environment variable is unset,
/// matching this crate's "env overrides file defaults, file overrides
/// built-in defaults" precedence.
pub fn apply_env_overrides(mut config: Config) -> Config {
    use secrecy::SecretString;

    if let Ok(v) = std::env::var("INTERCOM_API_KEY") {
        config.platform.api_key = SecretString::from(v);
    }
    if let Ok(v) = std::env::var("MELVIN_ADMIN_ID") {
        config.platform.admin_id = v;
    }

    if let Ok(v) = std::env::var("MCP_BASE_URL") {
        config.toolserver.base_url = v;
    }
    if let Ok(v) = std::env::var("MCP_AUTH_TOKEN") {
        config.toolserver.auth_token = SecretString::from(v);
    }

    if let Ok(v) = std::env::var("VALIDATION_ENDPOINT") {
        config.validation_service.endpoint = v;
    }
    if let Ok(v) = std::env::var("VALIDATION_API_KEY") {
        config.validation_service.api_key = SecretString::from(v);
    }

    if let Ok(v) = std::env::var("MODEL_NAME") {
        config.llm.model_name = v;
    }
    if let Ok(v) = std::env::var("OPENROUTER_API_KEY") {
        config.llm.api_key = SecretString::from(v);
    }
    if let Ok(v) = std::env::var("DRY_RUN") {
        config.llm.dry_run = v == "1" || v.eq_ignore_ascii_case("true");
    }

    if let Ok(v) = std::env::var("LANGSMITH_API_KEY") {
        config.prompts.api_key = SecretString::from(v);
    }
    if let Ok(v) = std::env::var("LANGSMITH_PROJECT") {
        config.prompts.project = Some(v);
    }
    if let Ok(v) = std::env::var("USE_LOCAL_COVERAGE_PROMPT") {
        if v == "1" || v.eq_ignore_ascii_case("true") {
            config.prompts.local_coverage_prompt_path =
                Some(std::env::var("LOCAL_COVERAGE_PROMPT_PATH")
                    .map(std::path::PathBuf::from)
                    .unwrap_or_else(|_| std::path::PathBuf::from("prompts/coverage.local.txt")));
        }
    }

    if let Ok(v) = std::env::var("EVAL_CONCURRENCY") {
        if let Ok(n) = v.parse() {
            config.orchestrator.eval_concurrency = n;
        }
    }
    if let Ok(v) = std::env::var("MAX_HOPS") {
        if let Ok(n) = v.parse() {
            config.orchestrator.max_hops = n;
        }
    }
    if let Ok(v) = std::env::var("MAX_ACTIONS") {
        if let Ok(n) = v.parse() {
            config.orchestrator.max_actions = n;
        }
    }

    config
}

/// Save configuration to a file.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    let content = if path.extension().map_or(false, |ext| ext == "toml") {
        toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?
    } else {
        serde_json::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_config.toml");

        let config = Config::default();
        save_config(&config, &path).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        assert_eq!(loaded.llm.model_name, config.llm.model_name);
    }

    #[test]
    fn test_env_override_dry_run() {
        std::env::set_var("DRY_RUN", "true");
        let config = apply_env_overrides(Config::default());
        assert!(config.llm.dry_run);
        std::env::remove_var("DRY_RUN");
    }
}
