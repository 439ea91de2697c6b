//! Built-in extensions bridging ROXX to flag state
//!
//! Each extension implements [`RoxxExtension`](crate::registry::RoxxExtension) and is
//! installed by [`ParserBuilder`](crate::ParserBuilder) in a fixed order.

mod property;
mod targeting;

pub use property::PropertyExtension;
pub use targeting::{TargetingExtension, bucket};
