//! Operand stack of the ROXX stack machine

use std::sync::Arc;

use crate::error::{Result, RoxxError};
use crate::model::RoxxValue;

/// Operand stack
///
/// Operators pop their own operands, in argument order, and push exactly one result.
/// The typed pop helpers return errors instead of panicking so a malformed expression
/// unwinds cleanly to the evaluation boundary.
#[derive(Debug, Default)]
pub struct EvalStack {
    values: Vec<RoxxValue>,
}

impl EvalStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty stack sized for a token stream
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Push a value
    #[inline]
    pub fn push(&mut self, value: impl Into<RoxxValue>) {
        self.values.push(value.into());
    }

    /// Pop any value
    #[inline]
    pub fn pop(&mut self, operator: &str) -> Result<RoxxValue> {
        self.values
            .pop()
            .ok_or_else(|| RoxxError::stack_underflow(operator))
    }

    /// Pop a boolean; `Undefined` counts as `false`
    pub fn pop_bool(&mut self, operator: &str) -> Result<bool> {
        match self.pop(operator)? {
            RoxxValue::Boolean(b) => Ok(b),
            RoxxValue::Undefined => Ok(false),
            other => Err(RoxxError::type_mismatch(operator, "boolean", other.type_name())),
        }
    }

    /// Pop a string
    pub fn pop_string(&mut self, operator: &str) -> Result<Arc<str>> {
        match self.pop(operator)? {
            RoxxValue::String(s) => Ok(s),
            other => Err(RoxxError::type_mismatch(operator, "string", other.type_name())),
        }
    }

    /// Pop an integer or float
    pub fn pop_number(&mut self, operator: &str) -> Result<f64> {
        let value = self.pop(operator)?;
        value
            .as_number()
            .ok_or_else(|| RoxxError::type_mismatch(operator, "number", value.type_name()))
    }

    /// Number of values on the stack
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Final result: the top of the stack, or `Undefined` when nothing was pushed
    pub fn into_result(mut self) -> RoxxValue {
        self.values.pop().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_pops() {
        let mut stack = EvalStack::new();
        stack.push(RoxxValue::Undefined);
        stack.push("s");
        stack.push(2.5);
        stack.push(true);

        assert!(stack.pop_bool("and").unwrap());
        assert_eq!(stack.pop_number("lt").unwrap(), 2.5);
        assert_eq!(stack.pop_string("md5").unwrap().as_ref(), "s");
        assert!(!stack.pop_bool("or").unwrap());
        assert!(stack.is_empty());
    }

    #[test]
    fn test_underflow_and_mismatch_are_errors() {
        let mut stack = EvalStack::new();
        assert_eq!(
            stack.pop("not").unwrap_err(),
            RoxxError::stack_underflow("not")
        );

        stack.push("x");
        assert!(matches!(
            stack.pop_bool("not"),
            Err(RoxxError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_into_result_takes_top() {
        let mut stack = EvalStack::with_capacity(2);
        stack.push(1);
        stack.push("top");
        assert_eq!(stack.into_result(), RoxxValue::from("top"));
        assert_eq!(EvalStack::new().into_result(), RoxxValue::Undefined);
    }
}
