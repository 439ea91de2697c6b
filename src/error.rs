// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Error types for ROXX lexing and evaluation
//!
//! None of these errors ever escape [`Parser::evaluate_expression`](crate::Parser::evaluate_expression):
//! they are produced inside the tokenizer and the stack machine and downgraded to an
//! `Undefined` result at the evaluation boundary. They are public so tooling can call
//! the tokenizer or the stack machine directly and surface what went wrong.

use thiserror::Error;

/// Result type alias for ROXX operations
pub type Result<T> = std::result::Result<T, RoxxError>;

/// Comprehensive error type for ROXX operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoxxError {
    /// A bare token looked like a number but parsed as neither integer nor float
    #[error("Malformed numeric literal: '{token}'")]
    MalformedNumber {
        /// The offending token text
        token: String,
    },

    /// A string literal was opened but never closed
    #[error("Unterminated string literal starting at position {position}")]
    UnterminatedString {
        /// Offset of the opening quote
        position: usize,
    },

    /// A closing bracket without an opener, or an opener left unclosed
    #[error("Unbalanced '{bracket}' at position {position}")]
    UnbalancedBracket {
        /// Offset of the bracket
        position: usize,
        /// The bracket character
        bracket: char,
    },

    /// An operator name appeared inside an array or dict literal
    #[error("Operator '{operator}' is not allowed inside a composite literal")]
    OperatorInLiteral {
        /// Operator name
        operator: String,
    },

    /// An operator tried to pop more operands than the stack holds
    #[error("Stack underflow while executing '{operator}'")]
    StackUnderflow {
        /// Operator that popped
        operator: String,
    },

    /// An operand had a type the operator cannot accept
    #[error("Operator '{operator}' expected {expected}, got {actual}")]
    TypeMismatch {
        /// Operator that popped the operand
        operator: String,
        /// Expected operand type
        expected: String,
        /// Actual operand type
        actual: String,
    },

    /// Nested target-group / flag evaluation exceeded the configured depth
    #[error("Recursion limit of {depth} exceeded")]
    RecursionLimit {
        /// Configured maximum depth
        depth: usize,
    },

    /// An operator implementation panicked
    #[error("Operator '{operator}' panicked")]
    OperatorPanic {
        /// Name the operator is registered under
        operator: String,
    },
}

impl RoxxError {
    /// Create a type mismatch error
    pub fn type_mismatch(
        operator: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            operator: operator.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a stack underflow error
    pub fn stack_underflow(operator: impl Into<String>) -> Self {
        Self::StackUnderflow {
            operator: operator.into(),
        }
    }

    /// Whether this error was raised while tokenizing rather than while executing
    pub fn is_lex_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedNumber { .. }
                | Self::UnterminatedString { .. }
                | Self::UnbalancedBracket { .. }
                | Self::OperatorInLiteral { .. }
        )
    }
}

/// Best-effort text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("<non-string panic payload>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RoxxError::type_mismatch("and", "boolean", "string");
        assert_eq!(err.to_string(), "Operator 'and' expected boolean, got string");

        let err = RoxxError::MalformedNumber {
            token: "-.".to_string(),
        };
        assert_eq!(err.to_string(), "Malformed numeric literal: '-.'");
    }

    #[test]
    fn test_lex_error_classification() {
        assert!(RoxxError::UnterminatedString { position: 3 }.is_lex_error());
        assert!(!RoxxError::stack_underflow("eq").is_lex_error());
        assert!(!RoxxError::RecursionLimit { depth: 4 }.is_lex_error());
    }

    #[test]
    fn test_panic_message() {
        let payload = std::panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 1");
        let payload = std::panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "static");
    }
}
