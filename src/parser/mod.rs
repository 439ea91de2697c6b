//! ROXX condition tokenizer
//!
//! ROXX conditions are written operator-first in function-call syntax, e.g.
//! `ifThen(and(true, isInPercentage("seed", 0.5)), "B", "A")`. The stack machine
//! consumes the flat token stream directly, so there is no syntax tree.

#![warn(missing_docs)]

pub mod token;
pub mod tokenizer;

pub use token::{Token, TokenKind};
pub use tokenizer::{OperatorLookup, Tokenizer, tokenize};
