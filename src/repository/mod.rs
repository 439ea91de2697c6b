//! Thread-safe stores for flags, experiments, target groups and custom properties
//!
//! Every repository guards its map with a `parking_lot::RwLock` held only for the
//! map access itself. Flag and custom property repositories also keep an ordered
//! list of change handlers, invoked synchronously after the insert, outside the
//! lock. A panicking handler is logged and skipped; the insert and the remaining
//! handlers are unaffected.

mod custom_property;
mod experiment;
mod flag;
mod target_group;

pub use custom_property::{CustomPropertyRepository, PropertyAddedHandler};
pub use experiment::ExperimentRepository;
pub use flag::{FlagAddedHandler, FlagRepository};
pub use target_group::TargetGroupRepository;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::error::panic_message;

/// Call every handler through `call`, isolating panics
pub(crate) fn notify_handlers<H: ?Sized>(
    event: &str,
    handlers: &[Arc<H>],
    call: impl Fn(&H),
) {
    for (index, handler) in handlers.iter().enumerate() {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| call(&**handler))) {
            log::error!(
                "{event} handler #{index} panicked: {}",
                panic_message(payload.as_ref())
            );
        }
    }
}
