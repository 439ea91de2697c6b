//! Impressions: reports of values served from a live targeting decision

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::panic_message;
use crate::model::{Context, ExperimentModel};

/// A value served from a targeting decision
#[derive(Debug, Clone)]
pub struct Impression {
    /// Name the flag is registered under
    pub flag_name: String,
    /// Served value, stringified
    pub value: String,
    /// Whether the value came from a bound condition rather than the default
    pub targeted: bool,
    /// Experiment that drove the value
    pub experiment: Option<Arc<ExperimentModel>>,
    /// Merged context the condition was evaluated against
    pub context: Context,
}

/// Receiver of impressions
///
/// Called synchronously on the evaluating thread. Closures taking `&Impression`
/// implement this trait.
pub trait ImpressionInvoker: Send + Sync {
    /// Handle one impression
    fn invoke(&self, impression: &Impression);
}

impl<F> ImpressionInvoker for F
where
    F: Fn(&Impression) + Send + Sync,
{
    fn invoke(&self, impression: &Impression) {
        self(impression)
    }
}

/// Deliver an impression; a panicking invoker is logged and does not affect the served value
pub(crate) fn dispatch(invoker: &dyn ImpressionInvoker, impression: &Impression) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| invoker.invoke(impression))) {
        log::error!(
            "Impression invoker panicked for flag '{}': {}",
            impression.flag_name,
            panic_message(payload.as_ref())
        );
    }
}
