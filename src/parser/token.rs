//! Token types produced by the ROXX tokenizer

use crate::model::RoxxValue;

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A literal value, including folded array/dict literals
    Literal,
    /// The name of a registered operator
    Operator,
    /// A bare word that is neither a literal nor a registered operator
    Unknown,
}

/// A single ROXX token
///
/// Bracket and brace tokens never appear here: composite literals are folded into
/// one [`Token::Literal`] while tokenizing.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal value
    Literal(RoxxValue),
    /// Registered operator name
    Operator(String),
    /// Unrecognized bare word, ignored by the evaluator
    Unknown(String),
}

impl Token {
    /// Classification of this token
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Literal(_) => TokenKind::Literal,
            Token::Operator(_) => TokenKind::Operator,
            Token::Unknown(_) => TokenKind::Unknown,
        }
    }
}
