//! Value and data model for the ROXX engine

pub mod context;
pub mod experiment;
pub mod property;
pub mod result;
pub mod value;

pub use context::{Context, ContextBuilder};
pub use experiment::{ExperimentModel, TargetGroupModel};
pub use property::{
    CustomProperty, CustomPropertyType, DynamicPropertyRule, PropertyValueFn, context_value_rule,
};
pub use result::EvaluationResult;
pub use value::RoxxValue;
