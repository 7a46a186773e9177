//! Process-wide fault containment installed on the panic hook.
//!
//! Arming takes whatever hook is registered at that instant (the default
//! crash reporter unless someone replaced it) and installs a hook that runs a
//! [`HandlerChain`] in front of it. There is no way back to `Unarmed`.

use std::panic::{self, PanicHookInfo};
use std::sync::OnceLock;

use serde::Serialize;
use tracing::{info, warn};

use super::chain::{FaultInterceptor, HandlerChain};
use super::FaultRecord;

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Containment policy state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyState {
    Unarmed,
    Armed,
}

static ARMED: OnceLock<()> = OnceLock::new();

/// Current state of the process-wide policy.
pub fn policy_state() -> PolicyState {
    if ARMED.get().is_some() {
        PolicyState::Armed
    } else {
        PolicyState::Unarmed
    }
}

/// What a call to [`arm`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arming {
    /// This call installed the chain
    Installed,
    /// An earlier call already did; this call's interceptor was dropped
    AlreadyArmed,
}

impl Arming {
    pub fn installed(self) -> bool {
        matches!(self, Arming::Installed)
    }
}

/// Install `interceptor` at the head of a chain wrapping the current panic
/// hook.
///
/// Only the first call in a process installs anything; later calls log a
/// warning, drop their interceptor and return [`Arming::AlreadyArmed`].
/// Either way the policy is [`PolicyState::Armed`] afterwards.
pub fn arm(interceptor: impl FaultInterceptor + 'static) -> Arming {
    let mut installed = false;

    ARMED.get_or_init(|| {
        let previous: PanicHook = panic::take_hook();
        let chain = HandlerChain::new(Some(previous)).with_interceptor(Box::new(interceptor));
        info!("Fault containment armed: {:?}", chain);

        panic::set_hook(Box::new(move |panic_info| {
            let record = FaultRecord::from_panic(panic_info);
            chain.dispatch(&record, |previous| previous(panic_info));
        }));
        installed = true;
    });

    if installed {
        Arming::Installed
    } else {
        warn!("Fault containment is already armed. Keeping existing handler chain.");
        Arming::AlreadyArmed
    }
}
