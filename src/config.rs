//! Shell configuration.
//!
//! Each setting is resolved in priority order:
//! 1. Explicit value (command line)
//! 2. Environment variable (`PUSH_SHELL_CONFIG_DIR`, `PUSH_SHELL_JS_GLOBAL`)
//! 3. `shell.json` in the config directory
//! 4. Built-in default

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::sdk::PUSH_SDK_NAME;

pub const CONFIG_DIR_ENV: &str = "PUSH_SHELL_CONFIG_DIR";
pub const JS_GLOBAL_ENV: &str = "PUSH_SHELL_JS_GLOBAL";

/// Optional settings file inside the config directory
pub const SETTINGS_FILE: &str = "shell.json";

/// Global the web runtime reads availability from
pub const DEFAULT_JS_GLOBAL: &str = "__optionalSdkAvailable";

/// Contents of `shell.json`; every field is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    pub sdk: Option<String>,
    pub js_global: Option<String>,
}

/// Resolved shell configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShellConfig {
    /// Directory holding `shell.json` and SDK configuration artifacts
    pub config_dir: PathBuf,
    /// Registry name of the optional SDK to probe
    pub sdk_name: String,
    /// JavaScript global receiving the availability flag
    pub js_global: String,
}

impl ShellConfig {
    /// Resolve configuration from explicit overrides, the environment and
    /// `shell.json`.
    pub fn resolve(
        config_dir: Option<PathBuf>,
        js_global: Option<String>,
    ) -> Result<Self, ConfigError> {
        let config_dir = config_dir.or_else(|| env_non_empty(CONFIG_DIR_ENV).map(PathBuf::from));
        let config_dir = match config_dir {
            Some(dir) => dir,
            None => dirs::config_dir()
                .ok_or(ConfigError::NoConfigDir)?
                .join("push-shell"),
        };

        let settings = load_settings(&config_dir)?;

        let js_global = js_global
            .or_else(|| env_non_empty(JS_GLOBAL_ENV))
            .or(settings.js_global)
            .unwrap_or_else(|| DEFAULT_JS_GLOBAL.to_string());
        validate_js_global(&js_global)?;

        let sdk_name = settings.sdk.unwrap_or_else(|| PUSH_SDK_NAME.to_string());

        debug!(
            "Resolved config: dir={:?}, sdk={}, js_global={}",
            config_dir, sdk_name, js_global
        );

        Ok(Self {
            config_dir,
            sdk_name,
            js_global,
        })
    }

    /// Configuration rooted at `config_dir` with defaults for everything else.
    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            sdk_name: PUSH_SDK_NAME.to_string(),
            js_global: DEFAULT_JS_GLOBAL.to_string(),
        }
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILE)
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Read `shell.json` from `config_dir`. A missing file yields defaults.
pub fn load_settings(config_dir: &Path) -> Result<SettingsFile, ConfigError> {
    let path = config_dir.join(SETTINGS_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(SettingsFile::default());
        }
        Err(source) => return Err(ConfigError::Read { path, source }),
    };

    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse { path, source })
}

fn js_identifier() -> &'static Regex {
    static IDENT: OnceLock<Regex> = OnceLock::new();
    IDENT.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("identifier pattern is valid")
    })
}

/// Check that `name` can be used as `window.<name>`.
pub fn validate_js_global(name: &str) -> Result<(), ConfigError> {
    if js_identifier().is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidGlobal(name.to_string()))
    }
}
