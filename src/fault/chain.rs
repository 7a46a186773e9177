use std::fmt;

use tracing::debug;

use super::FaultRecord;

/// What an interceptor decided about a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The fault is handled; nothing further down the chain sees it
    Claimed,
    Pass,
}

/// How a dispatched fault ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Suppressed { by: String },
    Delegated,
    /// Nobody claimed it and there is no delegate
    Unhandled,
}

/// A link in the handler chain that may claim a fault.
///
/// Interceptors run on whichever thread raised the fault, possibly several
/// at once, so they must not hold mutable state.
pub trait FaultInterceptor: Send + Sync {
    fn name(&self) -> &str;

    fn intercept(&self, fault: &FaultRecord) -> Disposition;
}

/// Ordered interceptors in front of the handler that was registered before
/// the chain was installed.
///
/// `D` is the delegate's type; for the process panic hook it is the boxed
/// previous hook. The chain never mutates after construction.
pub struct HandlerChain<D> {
    interceptors: Vec<Box<dyn FaultInterceptor>>,
    delegate: Option<D>,
}

impl<D> HandlerChain<D> {
    pub fn new(delegate: Option<D>) -> Self {
        Self {
            interceptors: Vec::new(),
            delegate,
        }
    }

    /// Insert an interceptor at the head of the chain.
    pub fn push_front(&mut self, interceptor: Box<dyn FaultInterceptor>) {
        self.interceptors.insert(0, interceptor);
    }

    pub fn with_interceptor(mut self, interceptor: Box<dyn FaultInterceptor>) -> Self {
        self.push_front(interceptor);
        self
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Offer `fault` to each interceptor in order. If none claims it,
    /// `forward` is called once with the delegate.
    pub fn dispatch(&self, fault: &FaultRecord, forward: impl FnOnce(&D)) -> Outcome {
        for interceptor in &self.interceptors {
            if interceptor.intercept(fault) == Disposition::Claimed {
                return Outcome::Suppressed {
                    by: interceptor.name().to_string(),
                };
            }
        }

        match &self.delegate {
            Some(delegate) => {
                forward(delegate);
                Outcome::Delegated
            }
            None => {
                debug!("No delegate fault handler; leaving fault unhandled: {}", fault);
                Outcome::Unhandled
            }
        }
    }
}

impl<D> fmt::Debug for HandlerChain<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.interceptors.iter().map(|i| i.name()).collect();
        f.debug_struct("HandlerChain")
            .field("interceptors", &names)
            .field("has_delegate", &self.has_delegate())
            .finish()
    }
}
