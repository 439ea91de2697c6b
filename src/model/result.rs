//! Evaluation result with fixed, non-throwing coercions

use super::value::RoxxValue;

/// Outcome of evaluating one ROXX expression
///
/// The typed accessors apply a one-way coercion: a missing value or a value of the
/// wrong type yields `false`, the empty string or `None`, and never panics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationResult {
    value: RoxxValue,
}

impl EvaluationResult {
    /// Wrap a value
    pub fn new(value: impl Into<RoxxValue>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The "no value" result
    pub fn undefined() -> Self {
        Self::default()
    }

    /// Whether the evaluation produced no value
    pub fn is_undefined(&self) -> bool {
        self.value.is_undefined()
    }

    /// The raw value, `None` for `Undefined`
    pub fn value(&self) -> Option<&RoxxValue> {
        (!self.value.is_undefined()).then_some(&self.value)
    }

    /// Consume the result and return the raw value
    pub fn into_value(self) -> RoxxValue {
        self.value
    }

    /// Boolean view: only a boolean `true` is true
    pub fn as_bool(&self) -> bool {
        self.value.as_bool().unwrap_or(false)
    }

    /// String view: strings as-is, booleans as `"true"`/`"false"`, anything else empty
    pub fn as_string(&self) -> String {
        match &self.value {
            RoxxValue::String(s) => s.to_string(),
            RoxxValue::Boolean(b) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Integer view: integers, and floats without a fractional part
    pub fn as_integer(&self) -> Option<i64> {
        match self.value {
            RoxxValue::Integer(i) => Some(i),
            RoxxValue::Float(f)
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 =>
            {
                Some(f as i64)
            }
            _ => None,
        }
    }

    /// Floating point view of numeric results
    pub fn as_double(&self) -> Option<f64> {
        self.value.as_number()
    }
}

impl From<RoxxValue> for EvaluationResult {
    fn from(value: RoxxValue) -> Self {
        Self { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(RoxxValue::Boolean(true), true, "true")]
    #[case(RoxxValue::Boolean(false), false, "false")]
    #[case(RoxxValue::from("on"), false, "on")]
    #[case(RoxxValue::Integer(5), false, "")]
    #[case(RoxxValue::Undefined, false, "")]
    fn test_coercions(#[case] value: RoxxValue, #[case] as_bool: bool, #[case] as_string: &str) {
        let result = EvaluationResult::new(value);
        assert_eq!(result.as_bool(), as_bool);
        assert_eq!(result.as_string(), as_string);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(EvaluationResult::new(3.0).as_integer(), Some(3));
        assert_eq!(EvaluationResult::new(3.5).as_integer(), None);
        assert_eq!(EvaluationResult::new(RoxxValue::Integer(4)).as_double(), Some(4.0));
        assert_eq!(EvaluationResult::new("4").as_double(), None);
        assert!(EvaluationResult::undefined().value().is_none());
    }
}
