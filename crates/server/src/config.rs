use std::path::Path;

use anyhow::Context;
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_SETTINGS_FILE: &str = "server.toml";
const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub body_limit_bytes: u64,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".into(),
            body_limit_bytes: 16 * 1024 * 1024,
            log_filter: "info".into(),
        }
    }
}

/// Defaults, then `server.toml` if present, then `APP__*` variables, then the
/// bare `SERVER_BIND` override.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = load_settings_with(Path::new(DEFAULT_SETTINGS_FILE), ENV_PREFIX)?;
    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.bind_addr = v;
    }
    Ok(settings)
}

pub(crate) fn load_settings_with(file: &Path, env_prefix: &str) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let file_name = file.to_string_lossy();
    let raw = Config::builder()
        .set_default("bind_addr", defaults.bind_addr)?
        .set_default("body_limit_bytes", defaults.body_limit_bytes)?
        .set_default("log_filter", defaults.log_filter)?
        .add_source(File::new(&file_name, FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix(env_prefix)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .with_context(|| format!("failed to read settings from '{file_name}'"))?;

    let settings: Settings = raw
        .try_deserialize()
        .context("server settings are malformed")?;
    if settings.body_limit_bytes == 0 {
        anyhow::bail!("body_limit_bytes must be greater than zero");
    }
    Ok(settings)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
