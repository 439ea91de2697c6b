//! Typed front-ends over [`Variant`]

use std::sync::Arc;

use super::variant::{Variant, VariantValue};
use crate::model::Context;

/// Boolean feature flag
#[derive(Debug, Clone)]
pub struct RoxFlag {
    variant: Arc<Variant>,
}

impl RoxFlag {
    /// Flag defaulting to `default`
    pub fn new(default: bool) -> Self {
        Self {
            variant: Arc::new(Variant::flag(default)),
        }
    }

    /// Underlying variant, to register with a [`FlagRepository`](crate::repository::FlagRepository)
    pub fn variant(&self) -> &Arc<Variant> {
        &self.variant
    }

    /// Registered name
    pub fn name(&self) -> &str {
        self.variant.name()
    }

    /// Default value
    pub fn default_value(&self) -> bool {
        self.variant.default_value().as_bool().unwrap_or(false)
    }

    /// Whether the flag is on for this context
    pub fn is_enabled(&self, context: &Context) -> bool {
        self.variant
            .value(context)
            .as_bool()
            .unwrap_or_else(|| self.default_value())
    }

    /// Run `action` if the flag is on
    pub fn enabled(&self, context: &Context, action: impl FnOnce()) {
        if self.is_enabled(context) {
            action();
        }
    }

    /// Run `action` if the flag is off
    pub fn disabled(&self, context: &Context, action: impl FnOnce()) {
        if !self.is_enabled(context) {
            action();
        }
    }
}

/// String-valued flag
#[derive(Debug, Clone)]
pub struct RoxString {
    variant: Arc<Variant>,
}

impl RoxString {
    /// String flag with a default and the other values it may take
    pub fn new(default: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            variant: Arc::new(Variant::string(default, options)),
        }
    }

    /// Underlying variant
    pub fn variant(&self) -> &Arc<Variant> {
        &self.variant
    }

    /// Registered name
    pub fn name(&self) -> &str {
        self.variant.name()
    }

    /// Value for this context
    pub fn value(&self, context: &Context) -> String {
        self.variant.value_as_string(context)
    }
}

/// Integer-valued flag
#[derive(Debug, Clone)]
pub struct RoxInt {
    variant: Arc<Variant>,
}

impl RoxInt {
    /// Integer flag with a default and the other values it may take
    pub fn new(default: i64, options: impl IntoIterator<Item = i64>) -> Self {
        Self {
            variant: Arc::new(Variant::int(default, options)),
        }
    }

    /// Underlying variant
    pub fn variant(&self) -> &Arc<Variant> {
        &self.variant
    }

    /// Registered name
    pub fn name(&self) -> &str {
        self.variant.name()
    }

    /// Value for this context
    pub fn value(&self, context: &Context) -> i64 {
        match self.variant.value(context) {
            VariantValue::Int(value) => value,
            _ => self.variant.default_value().as_int().unwrap_or_default(),
        }
    }
}

/// Floating point flag
#[derive(Debug, Clone)]
pub struct RoxDouble {
    variant: Arc<Variant>,
}

impl RoxDouble {
    /// Double flag with a default and the other values it may take
    pub fn new(default: f64, options: impl IntoIterator<Item = f64>) -> Self {
        Self {
            variant: Arc::new(Variant::double(default, options)),
        }
    }

    /// Underlying variant
    pub fn variant(&self) -> &Arc<Variant> {
        &self.variant
    }

    /// Registered name
    pub fn name(&self) -> &str {
        self.variant.name()
    }

    /// Value for this context
    pub fn value(&self, context: &Context) -> f64 {
        match self.variant.value(context) {
            VariantValue::Double(value) => value,
            _ => self.variant.default_value().as_double().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Parser;
    use crate::flags::VariantBinding;

    #[test]
    fn test_defaults() {
        let ctx = Context::empty();
        assert!(RoxFlag::new(true).is_enabled(&ctx));
        assert_eq!(RoxString::new("a", ["b"]).value(&ctx), "a");
        assert_eq!(RoxInt::new(3, [4]).value(&ctx), 3);
        assert_eq!(RoxDouble::new(0.5, [1.5]).value(&ctx), 0.5);
    }

    #[test]
    fn test_enabled_and_disabled_callbacks() {
        let parser = Arc::new(Parser::new());
        let flag = RoxFlag::new(false);
        flag.variant().bind(VariantBinding::new(r#""true""#, &parser));

        let mut ran = Vec::new();
        flag.enabled(&Context::empty(), || ran.push("enabled"));
        flag.disabled(&Context::empty(), || ran.push("disabled"));
        assert_eq!(ran, vec!["enabled"]);
    }

    #[test]
    fn test_numeric_flags_follow_condition() {
        let parser = Arc::new(Parser::new());
        let int = RoxInt::new(1, [1, 2, 3]);
        int.variant().bind(VariantBinding::new("ifThen(true, 3, 1)", &parser));
        let double = RoxDouble::new(1.0, [2.5]);
        double.variant().bind(VariantBinding::new("2.5", &parser));

        assert_eq!(int.value(&Context::empty()), 3);
        assert_eq!(double.value(&Context::empty()), 2.5);
    }
}
