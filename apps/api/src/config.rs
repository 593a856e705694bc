use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory holding the external generator scripts.
    pub script_dir: PathBuf,
    /// Directory holding the per-agency PDF templates.
    pub template_dir: PathBuf,
    pub python_bin: String,
    pub certificate_script: PathBuf,
    pub test_script: PathBuf,
    /// Budget for rendering the training log.
    pub log_timeout: Duration,
    /// Budget for each external generator run.
    pub generator_timeout: Duration,
    pub body_limit_bytes: usize,
    /// Optional deployment tag surfaced by `/health`.
    pub build_tag: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let script_dir = PathBuf::from(get("SCRIPT_DIR").unwrap_or_else(|| ".".to_string()));
        let template_dir = get("TEMPLATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| script_dir.join("templates"));
        let certificate_script = script_dir.join(
            get("CERTIFICATE_SCRIPT").unwrap_or_else(|| "generate_certs.py".to_string()),
        );
        let test_script =
            script_dir.join(get("TEST_SCRIPT").unwrap_or_else(|| "generate_tests.py".to_string()));

        Ok(Config {
            port: parse_or(&get, "PORT", 3000)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            script_dir,
            template_dir,
            python_bin: get("PYTHON_BIN").unwrap_or_else(|| "python3".to_string()),
            certificate_script,
            test_script,
            log_timeout: Duration::from_secs(parse_or(&get, "LOG_TIMEOUT_SECS", 30)?),
            generator_timeout: Duration::from_secs(parse_or(&get, "GENERATOR_TIMEOUT_SECS", 60)?),
            body_limit_bytes: parse_or(&get, "BODY_LIMIT_BYTES", 50 * 1024 * 1024)?,
            build_tag: get("BUILD_TAG"),
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
