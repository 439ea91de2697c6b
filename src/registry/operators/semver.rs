//! Version comparison operators: `semverLt`, `semverLte`, `semverGt`, `semverGte`,
//! `semverEq`, `semverNe`
//!
//! Versions are one to four dot-separated numeric segments. When the two sides have
//! a different number of segments they are padded before comparing: the shorter side
//! gets `.0` segments up to the longer length plus one extra `.0`, and the longer
//! side gets one extra `.1`. The effect is that a version with more segments always
//! sorts after its own prefix, so `1.1 < 1.1.0` rather than equal.

use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

use super::super::OperatorTableBuilder;
use crate::error::Result;
use crate::evaluator::EvalStack;
use crate::model::RoxxValue;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+(\.[0-9]+){0,3}$").expect("version pattern is a valid regex")
});

const COMPARISONS: [(&str, fn(Ordering) -> bool); 6] = [
    ("semverLt", Ordering::is_lt),
    ("semverLte", Ordering::is_le),
    ("semverGt", Ordering::is_gt),
    ("semverGte", Ordering::is_ge),
    ("semverEq", Ordering::is_eq),
    ("semverNe", Ordering::is_ne),
];

/// Install the six version operators
pub fn register(builder: &mut OperatorTableBuilder) {
    for (name, accept) in COMPARISONS {
        builder.register_fn(name, move |stack, _| compare(stack, name, accept));
    }
}

fn compare(stack: &mut EvalStack, operator: &str, accept: fn(Ordering) -> bool) -> Result<()> {
    let left = stack.pop(operator)?;
    let right = stack.pop(operator)?;
    let outcome = match (parse_version(&left), parse_version(&right)) {
        (Some(l), Some(r)) => accept(compare_versions(l, r)),
        _ => false,
    };
    stack.push(outcome);
    Ok(())
}

fn parse_version(value: &RoxxValue) -> Option<Vec<u64>> {
    let text = value.as_str()?;
    if !VERSION_PATTERN.is_match(text) {
        return None;
    }
    text.split('.').map(|segment| segment.parse().ok()).collect()
}

/// Compare two versions after segment padding
pub fn compare_versions(mut left: Vec<u64>, mut right: Vec<u64>) -> Ordering {
    match left.len().cmp(&right.len()) {
        Ordering::Equal => {}
        Ordering::Less => pad(&mut left, &mut right),
        Ordering::Greater => pad(&mut right, &mut left),
    }
    left.cmp(&right)
}

fn pad(shorter: &mut Vec<u64>, longer: &mut Vec<u64>) {
    shorter.resize(longer.len() + 1, 0);
    longer.push(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Parser};
    use rstest::rstest;

    #[rstest]
    #[case(r#"semverLt("1.1.0", "1.1")"#, false)]
    #[case(r#"semverGte("1.1.0", "1.1")"#, true)]
    #[case(r#"semverLt("1.1", "1.1.0")"#, true)]
    #[case(r#"semverEq("1.1", "1.1.0")"#, false)]
    #[case(r#"semverNe("1.1", "1.1.0")"#, true)]
    #[case(r#"semverEq("2.10.3", "2.10.3")"#, true)]
    #[case(r#"semverGt("2.10.3", "2.9.12")"#, true)]
    #[case(r#"semverLte("1.0.0.1", "1.0.0.1")"#, true)]
    #[case(r#"semverLt("1.1.1", "1.2")"#, true)]
    #[case(r#"semverGt("3", "2.99.99")"#, true)]
    #[case(r#"semverLt("1.a", "2")"#, false)]
    #[case(r#"semverGte("1.a", "2")"#, false)]
    #[case(r#"semverEq("1.2.3.4.5", "1.2.3.4.5")"#, false)]
    #[case(r#"semverLt(undefined, "2")"#, false)]
    #[case(r#"semverLt(1, "2")"#, false)]
    fn test_semver_operators(#[case] expression: &str, #[case] expected: bool) {
        let result = Parser::new().evaluate_expression(expression, &Context::empty());
        assert_eq!(result.as_bool(), expected, "{expression}");
    }

    #[test]
    fn test_padding_rule() {
        assert_eq!(compare_versions(vec![1, 1], vec![1, 1, 0]), Ordering::Less);
        assert_eq!(compare_versions(vec![1, 1, 0], vec![1, 1]), Ordering::Greater);
        assert_eq!(compare_versions(vec![1, 2], vec![1, 2]), Ordering::Equal);
        assert_eq!(compare_versions(vec![2], vec![1, 9, 9]), Ordering::Greater);
    }
}
