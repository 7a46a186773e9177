//! Optional SDK drivers and the registry they are discovered through.
//!
//! The shell never links against a particular SDK. Drivers register under a
//! name at startup and the probe looks them up by that name; a name nobody
//! registered is the normal "SDK not in this build" state.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::error::SdkError;

#[cfg(feature = "push-sdk")]
pub mod push;

/// Name the built-in push driver registers under.
pub const PUSH_SDK_NAME: &str = "push";

/// Name of the default instance an SDK hands back after initialization.
pub const DEFAULT_INSTANCE_NAME: &str = "[DEFAULT]";

/// Process-level context handed to drivers, the way a mobile SDK receives
/// the application context.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessContext {
    /// Random id for this process run, used to correlate diagnostics
    pub session_id: Uuid,
    pub pid: u32,
    /// Directory holding configuration artifacts
    pub config_dir: PathBuf,
}

impl ProcessContext {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            pid: std::process::id(),
            config_dir: config_dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

/// Handle to an initialized SDK instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdkInstance {
    pub name: String,
    pub project_id: String,
}

/// Operations the shell needs from an optional SDK.
pub trait OptionalSdk: Send + Sync {
    /// Instances already initialized in this process.
    fn list_initialized_instances(
        &self,
        ctx: &ProcessContext,
    ) -> Result<Vec<SdkInstance>, SdkError>;

    /// Initialize the default instance from the process context.
    fn initialize(&self, ctx: &ProcessContext) -> Result<SdkInstance, SdkError>;

    /// The default instance, or an illegal-state error if there is none.
    fn default_instance(&self) -> Result<SdkInstance, SdkError>;
}

/// Runtime registry of optional SDK drivers.
#[derive(Default, Clone)]
pub struct SdkRegistry {
    drivers: HashMap<String, Arc<dyn OptionalSdk>>,
}

impl SdkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with every driver compiled into this build.
    pub fn discover(ctx: &ProcessContext) -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "push-sdk")]
        registry.register(PUSH_SDK_NAME, Arc::new(push::PushSdk::new(ctx.config_dir())));

        debug!(
            "Discovered {} optional SDK driver(s) for {:?}",
            registry.len(),
            ctx.config_dir()
        );
        registry
    }

    /// Register a driver, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn OptionalSdk>) {
        self.drivers.insert(name.into(), driver);
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<dyn OptionalSdk>> {
        self.drivers.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl fmt::Debug for SdkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.drivers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("SdkRegistry").field("drivers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullSdk;

    impl OptionalSdk for NullSdk {
        fn list_initialized_instances(
            &self,
            _ctx: &ProcessContext,
        ) -> Result<Vec<SdkInstance>, SdkError> {
            Ok(Vec::new())
        }

        fn initialize(&self, _ctx: &ProcessContext) -> Result<SdkInstance, SdkError> {
            Err(SdkError::InvalidConfig("null".to_string()))
        }

        fn default_instance(&self) -> Result<SdkInstance, SdkError> {
            Err(SdkError::illegal_state("null"))
        }
    }

    #[test]
    fn test_resolve_unregistered_is_none() {
        let registry = SdkRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve("push").is_none());
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = SdkRegistry::new();
        registry.register("null", Arc::new(NullSdk));
        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("null").is_some());
        assert!(registry.resolve("push").is_none());
        assert_eq!(format!("{:?}", registry), "SdkRegistry { drivers: [\"null\"] }");
    }

    #[cfg(feature = "push-sdk")]
    #[test]
    fn test_discover_registers_push_driver() {
        let ctx = ProcessContext::new("/nonexistent");
        let registry = SdkRegistry::discover(&ctx);
        assert!(registry.resolve(PUSH_SDK_NAME).is_some());
    }
}
