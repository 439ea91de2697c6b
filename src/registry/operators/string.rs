//! String operators: `md5`, `concat`, `b64d`, `match`

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use dashmap::DashMap;
use md5::{Digest, Md5};
use regex::{Regex, RegexBuilder};

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope};
use crate::model::RoxxValue;
use crate::registry::Operator;

/// Lowercase hex MD5 digest of a string
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// `md5(s)`: `Undefined` for non-string input
pub fn md5(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let value = stack.pop("md5")?;
    stack.push(value.as_str().map(md5_hex));
    Ok(())
}

/// `concat(a, b)`: `Undefined` unless both operands are strings
pub fn concat(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let left = stack.pop("concat")?;
    let right = stack.pop("concat")?;
    let joined = match (left.as_str(), right.as_str()) {
        (Some(l), Some(r)) => RoxxValue::from(format!("{l}{r}")),
        _ => RoxxValue::Undefined,
    };
    stack.push(joined);
    Ok(())
}

/// `b64d(s)`: standard-alphabet base64 decode, `Undefined` on invalid input
pub fn b64d(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let value = stack.pop("b64d")?;
    let decoded = value
        .as_str()
        .and_then(|encoded| BASE64.decode(encoded).ok())
        .and_then(|bytes| String::from_utf8(bytes).ok());
    stack.push(decoded);
    Ok(())
}

/// `match(subject, pattern, flags)`: regex search
///
/// Supported flags: `i` case-insensitive, `s` dot matches newline, `m` multi-line,
/// `x` ignore whitespace. Unknown flags are ignored. Non-string operands and invalid
/// patterns yield `false`.
pub struct MatchOperator {
    cache: DashMap<(String, String), Regex>,
    capacity: usize,
}

impl MatchOperator {
    /// Create the operator with a compiled-pattern cache of the given size
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: DashMap::new(),
            capacity,
        }
    }

    fn compile(&self, pattern: &str, flags: &str) -> Option<Regex> {
        let key = (pattern.to_string(), flags.to_string());
        if let Some(regex) = self.cache.get(&key) {
            return Some(regex.clone());
        }

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.contains('i'))
            .dot_matches_new_line(flags.contains('s'))
            .multi_line(flags.contains('m'))
            .ignore_whitespace(flags.contains('x'))
            .build()
            .map_err(|err| log::debug!("Invalid match pattern '{pattern}': {err}"))
            .ok()?;

        if self.capacity > 0 {
            if self.cache.len() >= self.capacity {
                self.cache.clear();
            }
            self.cache.insert(key, regex.clone());
        }
        Some(regex)
    }
}

impl Operator for MatchOperator {
    fn execute(&self, stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
        let subject = stack.pop("match")?;
        let pattern = stack.pop("match")?;
        let flags = stack.pop("match")?;

        let matched = match (subject.as_str(), pattern.as_str()) {
            (Some(subject), Some(pattern)) => self
                .compile(pattern, flags.as_str().unwrap_or_default())
                .is_some_and(|regex| regex.is_match(subject)),
            _ => false,
        };
        stack.push(matched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, EngineConfig, Parser};
    use rstest::rstest;

    fn eval(expression: &str) -> RoxxValue {
        Parser::new()
            .evaluate_expression(expression, &Context::empty())
            .into_value()
    }

    #[test]
    fn test_md5_of_concat() {
        assert_eq!(
            eval(r#"md5(concat("st", "am"))"#),
            RoxxValue::from("07915255d64730d06d2349d11ac3bfd8")
        );
        assert_eq!(eval("md5(5)"), RoxxValue::Undefined);
    }

    #[test]
    fn test_concat_requires_strings() {
        assert_eq!(eval(r#"concat("a", "")"#), RoxxValue::from("a"));
        assert_eq!(eval(r#"concat("a", 1)"#), RoxxValue::Undefined);
        assert_eq!(eval(r#"concat(undefined, "b")"#), RoxxValue::Undefined);
    }

    #[test]
    fn test_b64d() {
        assert_eq!(eval(r#"b64d("aGVsbG8gcm94eA==")"#), RoxxValue::from("hello roxx"));
        assert_eq!(eval(r#"b64d("not base64!")"#), RoxxValue::Undefined);
    }

    #[rstest]
    #[case(r#"match("Hello World", "hello", "i")"#, true)]
    #[case(r#"match("Hello World", "hello", "")"#, false)]
    #[case(r#"match("a\nb", "a.b", "s")"#, false)]
    #[case(r#"match("line1
line2", "line1.line2", "s")"#, true)]
    #[case(r#"match("user@example.com", "@example\.com$", "")"#, true)]
    #[case(r#"match("abc", "(", "")"#, false)]
    #[case(r#"match(5, "5", "")"#, false)]
    #[case(r#"match("abc", "b", undefined)"#, true)]
    fn test_match(#[case] expression: &str, #[case] expected: bool) {
        assert_eq!(eval(expression), RoxxValue::Boolean(expected), "{expression}");
    }

    #[test]
    fn test_match_cache_respects_capacity() {
        let operator = MatchOperator::new(2);
        for pattern in ["a", "b", "c"] {
            assert!(operator.compile(pattern, "").is_some());
        }
        assert!(operator.cache.len() <= 2);

        let uncached = MatchOperator::new(0);
        assert!(uncached.compile("a", "i").is_some());
        assert!(uncached.cache.is_empty());

        let parser = Parser::builder()
            .with_config(EngineConfig::new().with_regex_cache_capacity(0))
            .build();
        assert!(
            parser
                .evaluate_expression(r#"match("ABC", "b", "i")"#, &Context::empty())
                .as_bool()
        );
    }
}
