//! Flag model: variants, typed front-ends, impressions and the flag setter

mod impression;
mod setter;
mod typed;
mod variant;

pub use impression::{Impression, ImpressionInvoker};
pub use setter::{FlagSetter, FlagSetterBuilder};
pub use typed::{RoxDouble, RoxFlag, RoxInt, RoxString};
pub use variant::{Variant, VariantBinding, VariantKind, VariantValue};
