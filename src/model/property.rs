//! Custom properties and the dynamic property rule

use std::fmt;
use std::sync::Arc;

use super::context::Context;
use super::value::RoxxValue;

/// Declared type of a custom property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomPropertyType {
    /// Free text
    String,
    /// Boolean
    Boolean,
    /// 64-bit integer
    Integer,
    /// Floating point
    Double,
    /// Dotted version string, compared with the `semver*` operators
    Semver,
    /// Timestamp, converted with `tsToNum`
    DateTime,
}

impl CustomPropertyType {
    /// Wire name of the type
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "bool",
            Self::Integer => "int",
            Self::Double => "double",
            Self::Semver => "semver",
            Self::DateTime => "dateTime",
        }
    }
}

impl fmt::Display for CustomPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Value function of a custom property
pub type PropertyValueFn = Arc<dyn Fn(&Context) -> RoxxValue + Send + Sync>;

/// Host fallback consulted by `property(name)` when no custom property is registered
pub type DynamicPropertyRule = Arc<dyn Fn(&str, &Context) -> Option<RoxxValue> + Send + Sync>;

/// A named value resolved against the current context
#[derive(Clone)]
pub struct CustomProperty {
    name: String,
    property_type: CustomPropertyType,
    value_fn: PropertyValueFn,
}

impl CustomProperty {
    /// Property computed from the context on every evaluation
    pub fn computed<F>(name: impl Into<String>, property_type: CustomPropertyType, value_fn: F) -> Self
    where
        F: Fn(&Context) -> RoxxValue + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            property_type,
            value_fn: Arc::new(value_fn),
        }
    }

    /// Property with a fixed value
    pub fn constant(
        name: impl Into<String>,
        property_type: CustomPropertyType,
        value: impl Into<RoxxValue>,
    ) -> Self {
        let value = value.into();
        Self::computed(name, property_type, move |_| value.clone())
    }

    /// Constant string property
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        Self::constant(name, CustomPropertyType::String, value)
    }

    /// Constant boolean property
    pub fn boolean(name: impl Into<String>, value: bool) -> Self {
        Self::constant(name, CustomPropertyType::Boolean, value)
    }

    /// Constant integer property
    pub fn integer(name: impl Into<String>, value: i64) -> Self {
        Self::constant(name, CustomPropertyType::Integer, value)
    }

    /// Constant floating point property
    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Self::constant(name, CustomPropertyType::Double, value)
    }

    /// Constant version property
    pub fn semver(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version: String = version.into();
        Self::constant(name, CustomPropertyType::Semver, version)
    }

    /// Constant timestamp property
    pub fn date_time(name: impl Into<String>, value: chrono::DateTime<chrono::Utc>) -> Self {
        Self::constant(name, CustomPropertyType::DateTime, value)
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn property_type(&self) -> CustomPropertyType {
        self.property_type
    }

    /// Resolve the value against a context
    pub fn value(&self, context: &Context) -> RoxxValue {
        (self.value_fn)(context)
    }
}

impl fmt::Debug for CustomProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomProperty")
            .field("name", &self.name)
            .field("property_type", &self.property_type)
            .finish_non_exhaustive()
    }
}

/// Dynamic rule that reads the property name straight from the context
pub fn context_value_rule() -> DynamicPropertyRule {
    Arc::new(|name, context| context.get(name).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_property_reads_context() {
        let property = CustomProperty::computed("tier", CustomPropertyType::String, |ctx| {
            ctx.get("plan").cloned().unwrap_or_else(|| "free".into())
        });
        let context = Context::builder().with("plan", "pro").build();

        assert_eq!(property.value(&context), RoxxValue::from("pro"));
        assert_eq!(property.value(&Context::empty()), RoxxValue::from("free"));
        assert_eq!(property.property_type().to_string(), "string");
    }

    #[test]
    fn test_context_value_rule() {
        let rule = context_value_rule();
        let context = Context::builder().with("country", "NL").build();
        assert_eq!(rule("country", &context), Some(RoxxValue::from("NL")));
        assert_eq!(rule("city", &context), None);
    }
}
