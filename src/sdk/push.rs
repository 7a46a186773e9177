//! Built-in push notification SDK driver.
//!
//! Reads `push-services.json` from the config directory and keeps the set of
//! initialized instances for the process. Its use-before-init guard emits
//! [`UNCONFIGURED_MARKER`], which is the signature the fault classifier
//! recognizes.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use tracing::{debug, info};

use super::{OptionalSdk, ProcessContext, SdkInstance, DEFAULT_INSTANCE_NAME};
use crate::error::SdkError;
use crate::fault::UNCONFIGURED_MARKER;

/// File name of the push configuration artifact.
pub const CONFIG_ARTIFACT: &str = "push-services.json";

/// Contents of `push-services.json`
#[derive(Debug, Clone, Deserialize)]
pub struct PushServicesConfig {
    pub project_id: String,
    pub app_id: String,
    pub api_key: String,
    #[serde(default)]
    pub sender_id: Option<String>,
}

impl PushServicesConfig {
    /// Parse and validate the artifact contents
    pub fn parse(raw: &str) -> Result<Self, SdkError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| SdkError::InvalidConfig(e.to_string()))?;

        for (field, value) in [
            ("project_id", &config.project_id),
            ("app_id", &config.app_id),
            ("api_key", &config.api_key),
        ] {
            if value.trim().is_empty() {
                return Err(SdkError::InvalidConfig(format!("{} must not be empty", field)));
            }
        }

        Ok(config)
    }
}

/// Push SDK driver
pub struct PushSdk {
    artifact_path: PathBuf,
    instances: Mutex<Vec<SdkInstance>>,
}

impl PushSdk {
    pub fn new(config_dir: &Path) -> Self {
        Self {
            artifact_path: config_dir.join(CONFIG_ARTIFACT),
            instances: Mutex::new(Vec::new()),
        }
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    fn instances(&self) -> Result<MutexGuard<'_, Vec<SdkInstance>>, SdkError> {
        self.instances.lock().map_err(|_| SdkError::Poisoned)
    }

    fn load_config(&self) -> Result<PushServicesConfig, SdkError> {
        let raw = match std::fs::read_to_string(&self.artifact_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SdkError::ConfigMissing {
                    path: self.artifact_path.clone(),
                });
            }
            Err(source) => {
                return Err(SdkError::Io {
                    path: self.artifact_path.clone(),
                    source,
                });
            }
        };

        PushServicesConfig::parse(&raw)
    }
}

impl OptionalSdk for PushSdk {
    fn list_initialized_instances(
        &self,
        _ctx: &ProcessContext,
    ) -> Result<Vec<SdkInstance>, SdkError> {
        Ok(self.instances()?.clone())
    }

    fn initialize(&self, ctx: &ProcessContext) -> Result<SdkInstance, SdkError> {
        let mut instances = self.instances()?;
        if instances.iter().any(|i| i.name == DEFAULT_INSTANCE_NAME) {
            return Err(SdkError::illegal_state(format!(
                "PushApp name {} already exists!",
                DEFAULT_INSTANCE_NAME
            )));
        }

        let config = self.load_config()?;
        debug!(
            "Loaded {} for project {} (session {})",
            CONFIG_ARTIFACT, config.project_id, ctx.session_id
        );

        let instance = SdkInstance {
            name: DEFAULT_INSTANCE_NAME.to_string(),
            project_id: config.project_id,
        };
        instances.push(instance.clone());
        info!("PushApp initialization successful");

        Ok(instance)
    }

    fn default_instance(&self) -> Result<SdkInstance, SdkError> {
        self.instances()?
            .iter()
            .find(|i| i.name == DEFAULT_INSTANCE_NAME)
            .cloned()
            .ok_or_else(|| {
                SdkError::illegal_state(format!(
                    "{} in this process {}. Make sure to call PushSdk::initialize(context) first.",
                    UNCONFIGURED_MARKER,
                    std::process::id()
                ))
            })
    }
}
