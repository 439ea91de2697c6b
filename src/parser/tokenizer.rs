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

//! ROXX tokenizer
//!
//! Single pass over the character stream with an explicit in-string / out-of-string
//! state. Outside strings the delimiters `{ } [ ] ( ) , space tab CR LF "` end the
//! current bare word; inside strings only an unescaped `"` does. Bare words are
//! classified in order: reserved words (`true`, `false`, `undefined`, any case),
//! registered operator names, numbers, and otherwise unknown.
//!
//! Composite literals are accumulated on a stack of open brackets, one accumulator
//! per nesting depth, and folded into a single literal when the bracket closes.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::hash::BuildHasher;
use std::iter::Peekable;
use std::str::CharIndices;

use super::token::Token;
use crate::error::{Result, RoxxError};
use crate::model::RoxxValue;

/// Optional leading minus, digits with at most one decimal point
static NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?[0-9]*\.?[0-9]*$").expect("number pattern is a valid regex")
});

/// Source of registered operator names consulted while classifying bare words
pub trait OperatorLookup {
    /// Whether `name` is a registered operator
    fn is_operator(&self, name: &str) -> bool;
}

impl OperatorLookup for [&str] {
    fn is_operator(&self, name: &str) -> bool {
        self.iter().any(|operator| *operator == name)
    }
}

impl<const N: usize> OperatorLookup for [&str; N] {
    fn is_operator(&self, name: &str) -> bool {
        self.iter().any(|operator| *operator == name)
    }
}

impl<S: BuildHasher> OperatorLookup for HashSet<String, S> {
    fn is_operator(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Open composite literal
enum Composite {
    Array(Vec<RoxxValue>),
    Dict {
        entries: IndexMap<String, RoxxValue>,
        pending_key: Option<String>,
    },
}

impl Composite {
    fn accept(&mut self, value: RoxxValue) {
        match self {
            Composite::Array(items) => items.push(value),
            Composite::Dict {
                entries,
                pending_key,
            } => match pending_key.take() {
                Some(key) => {
                    entries.insert(key, value);
                }
                None => {
                    let key = match value {
                        RoxxValue::String(s) => s.to_string(),
                        other => other.to_string(),
                    };
                    *pending_key = Some(key);
                }
            },
        }
    }

    fn close(self) -> RoxxValue {
        match self {
            Composite::Array(items) => RoxxValue::from(items),
            // a dangling key without a value is dropped
            Composite::Dict { entries, .. } => RoxxValue::Dict(std::sync::Arc::new(entries)),
        }
    }

    fn closing_bracket(&self) -> char {
        match self {
            Composite::Array(_) => ']',
            Composite::Dict { .. } => '}',
        }
    }
}

/// Tokenizer for one condition string
pub struct Tokenizer<'input, 'ops, L: OperatorLookup + ?Sized> {
    input: &'input str,
    chars: Peekable<CharIndices<'input>>,
    operators: &'ops L,
    tokens: Vec<Token>,
    open: Vec<(Composite, usize)>,
    bare_start: Option<usize>,
}

impl<'input, 'ops, L: OperatorLookup + ?Sized> Tokenizer<'input, 'ops, L> {
    /// Create a tokenizer recognizing the given operator names
    pub fn new(input: &'input str, operators: &'ops L) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            operators,
            tokens: Vec::new(),
            open: Vec::new(),
            bare_start: None,
        }
    }

    /// Tokenize the whole input, left to right as authored
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        while let Some((pos, ch)) = self.chars.next() {
            match ch {
                '"' => {
                    self.flush_bare(pos)?;
                    let value = self.read_string(pos)?;
                    self.emit(Token::Literal(RoxxValue::from(value)))?;
                }
                '[' => {
                    self.flush_bare(pos)?;
                    self.open.push((Composite::Array(Vec::new()), pos));
                }
                '{' => {
                    self.flush_bare(pos)?;
                    self.open.push((
                        Composite::Dict {
                            entries: IndexMap::new(),
                            pending_key: None,
                        },
                        pos,
                    ));
                }
                ']' | '}' => {
                    self.flush_bare(pos)?;
                    self.close_composite(pos, ch)?;
                }
                '(' | ')' | ',' | ' ' | '\t' | '\r' | '\n' => self.flush_bare(pos)?,
                _ => {
                    if self.bare_start.is_none() {
                        self.bare_start = Some(pos);
                    }
                }
            }
        }

        self.flush_bare(self.input.len())?;
        if let Some((composite, position)) = self.open.last() {
            let bracket = if composite.closing_bracket() == ']' { '[' } else { '{' };
            return Err(RoxxError::UnbalancedBracket { position: *position, bracket });
        }
        Ok(self.tokens)
    }

    /// Read a string body after its opening quote; `\"` is an escaped quote
    fn read_string(&mut self, start: usize) -> Result<String> {
        let mut value = String::new();
        while let Some((_, ch)) = self.chars.next() {
            match ch {
                '\\' if matches!(self.chars.peek(), Some((_, '"'))) => {
                    self.chars.next();
                    value.push('"');
                }
                '"' => return Ok(value),
                other => value.push(other),
            }
        }
        Err(RoxxError::UnterminatedString { position: start })
    }

    fn close_composite(&mut self, pos: usize, bracket: char) -> Result<()> {
        match self.open.pop() {
            Some((composite, _)) if composite.closing_bracket() == bracket => {
                self.emit(Token::Literal(composite.close()))
            }
            _ => Err(RoxxError::UnbalancedBracket { position: pos, bracket }),
        }
    }

    fn flush_bare(&mut self, end: usize) -> Result<()> {
        let Some(start) = self.bare_start.take() else {
            return Ok(());
        };
        let word = &self.input[start..end];
        let token = self.classify(word)?;
        self.emit(token)
    }

    fn classify(&self, word: &str) -> Result<Token> {
        if word.eq_ignore_ascii_case("true") {
            return Ok(Token::Literal(RoxxValue::Boolean(true)));
        }
        if word.eq_ignore_ascii_case("false") {
            return Ok(Token::Literal(RoxxValue::Boolean(false)));
        }
        if word.eq_ignore_ascii_case("undefined") {
            return Ok(Token::Literal(RoxxValue::Undefined));
        }
        if self.operators.is_operator(word) {
            return Ok(Token::Operator(word.to_string()));
        }
        if NUMBER_PATTERN.is_match(word) {
            return parse_number(word).map(Token::Literal);
        }
        Ok(Token::Unknown(word.to_string()))
    }

    fn emit(&mut self, token: Token) -> Result<()> {
        let Some((composite, _)) = self.open.last_mut() else {
            if let Token::Unknown(word) = &token {
                log::trace!("Ignoring unknown token '{word}'");
            }
            self.tokens.push(token);
            return Ok(());
        };

        match token {
            Token::Literal(value) => {
                composite.accept(value);
                Ok(())
            }
            Token::Operator(operator) => Err(RoxxError::OperatorInLiteral { operator }),
            Token::Unknown(word) => {
                log::trace!("Dropping unknown token '{word}' inside composite literal");
                Ok(())
            }
        }
    }
}

/// Parse a word that matched the number pattern
fn parse_number(word: &str) -> Result<RoxxValue> {
    if !word.contains('.') {
        if let Ok(i) = word.parse::<i64>() {
            return Ok(RoxxValue::Integer(i));
        }
    }
    word.parse::<f64>()
        .map(RoxxValue::Float)
        .map_err(|_| RoxxError::MalformedNumber {
            token: word.to_string(),
        })
}

/// Tokenize a condition against a set of operator names
pub fn tokenize<L: OperatorLookup + ?Sized>(input: &str, operators: &L) -> Result<Vec<Token>> {
    Tokenizer::new(input, operators).tokenize()
}
