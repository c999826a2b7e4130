// Configuration loader
// Loads settings from ~/.promptgan/config.toml, then applies environment overrides

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::settings::Config;

/// Environment variables that override file settings.
const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_BASE_URL: &str = "PROMPTGAN_BASE_URL";
const ENV_MODEL: &str = "PROMPTGAN_MODEL";
const ENV_BIND: &str = "PROMPTGAN_BIND";
const ENV_MAX_ATTEMPTS: &str = "PROMPTGAN_MAX_ATTEMPTS";
const ENV_MATCH_MODE: &str = "PROMPTGAN_MATCH_MODE";

/// `~/.promptgan/config.toml`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".promptgan").join("config.toml"))
}

/// Load configuration from the default location and the process environment.
pub fn load_config() -> Result<Config> {
    load_config_from(None)
}

/// Load configuration from `path` (or the default location when `None`).
///
/// A missing file is not an error: defaults plus environment may be enough.
/// The result is validated, so a missing API key fails here with
/// `RefineError::ConfigurationMissing`.
pub fn load_config_from(path: Option<&Path>) -> Result<Config> {
    let path = path.map(Path::to_path_buf).or_else(default_config_path);

    let mut config = match path {
        Some(ref p) if p.exists() => read_config_file(p)?,
        Some(ref p) => {
            tracing::debug!("No config file at {}, using defaults", p.display());
            Config::default()
        }
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config
        .validate()
        .context("Configuration validation failed")?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    tracing::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Apply environment overrides using `lookup` (usually `std::env::var`).
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// a key configured in the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(ENV_API_KEY) {
        config.agent.api_key = key;
    }
    if let Some(url) = get(ENV_BASE_URL) {
        config.agent.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(model) = get(ENV_MODEL) {
        config.agent.model = model;
    }
    if let Some(bind) = get(ENV_BIND) {
        config.server.bind_address = bind;
    }
    if let Some(max) = get(ENV_MAX_ATTEMPTS) {
        config.refinement.max_attempts = max.trim().parse().with_context(|| {
            format!(
                "{} must be a non-negative integer, got '{}'",
                ENV_MAX_ATTEMPTS, max
            )
        })?;
    }
    if let Some(mode) = get(ENV_MATCH_MODE) {
        config.refinement.match_mode = mode
            .parse()
            .with_context(|| format!("Invalid {}", ENV_MATCH_MODE))?;
    }

    Ok(())
}
