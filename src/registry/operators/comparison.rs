//! Equality, ordering and membership operators

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope};

/// `eq(a, b)`: structural equality, `Undefined` treated as `false`
pub fn eq(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let left = stack.pop("eq")?.undefined_as_false();
    let right = stack.pop("eq")?.undefined_as_false();
    stack.push(left.structural_eq(&right));
    Ok(())
}

/// `ne(a, b)`
pub fn ne(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let left = stack.pop("ne")?.undefined_as_false();
    let right = stack.pop("ne")?.undefined_as_false();
    stack.push(!left.structural_eq(&right));
    Ok(())
}

/// Pop two operands and compare them numerically; `false` unless both coerce
fn numeric(stack: &mut EvalStack, operator: &str, compare: fn(f64, f64) -> bool) -> Result<()> {
    let left = stack.pop(operator)?.coerce_number();
    let right = stack.pop(operator)?.coerce_number();
    let outcome = match (left, right) {
        (Some(l), Some(r)) => compare(l, r),
        _ => false,
    };
    stack.push(outcome);
    Ok(())
}

/// `lt(a, b)`
pub fn lt(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    numeric(stack, "lt", |l, r| l < r)
}

/// `lte(a, b)`
pub fn lte(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    numeric(stack, "lte", |l, r| l <= r)
}

/// `gt(a, b)`
pub fn gt(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    numeric(stack, "gt", |l, r| l > r)
}

/// `gte(a, b)`
pub fn gte(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    numeric(stack, "gte", |l, r| l >= r)
}

/// `numeq(a, b)`
pub fn numeq(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    numeric(stack, "numeq", |l, r| l == r)
}

/// `numneq(a, b)`
pub fn numneq(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    numeric(stack, "numneq", |l, r| l != r)
}

/// `inArray(needle, haystack)`: linear scan, `false` when `haystack` is not an array
pub fn in_array(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let needle = stack.pop("inArray")?;
    let haystack = stack.pop("inArray")?;
    let found = haystack
        .as_array()
        .is_some_and(|items| items.iter().any(|item| item.structural_eq(&needle)));
    stack.push(found);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{Context, Parser};
    use rstest::rstest;

    fn eval(expression: &str) -> bool {
        let context = Context::builder()
            .with("age", 30)
            .with("ageText", "30")
            .with("tags", crate::RoxxValue::array(["beta".into(), "staff".into()]))
            .build();
        let parser = Parser::builder()
            .add_operator("ctx", |stack, scope| {
                let key = stack.pop_string("ctx")?;
                let value = scope.context().get(&key).cloned().unwrap_or_default();
                stack.push(value);
                Ok(())
            })
            .build();
        parser.evaluate_expression(expression, &context).as_bool()
    }

    #[rstest]
    #[case(r#"eq("a", "a")"#, true)]
    #[case(r#"eq(3, "3")"#, false)]
    #[case("eq(3, 3.0)", true)]
    #[case("eq(undefined, false)", true)]
    #[case("eq(undefined, undefined)", true)]
    #[case(r#"eq(undefined, "")"#, false)]
    #[case(r#"ne("a", "b")"#, true)]
    #[case(r#"ne(3, "3")"#, true)]
    #[case(r#"eq(["a", 1], ["a", 1])"#, true)]
    #[case(r#"eq({"k": "v"}, {"k": "v"})"#, true)]
    fn test_equality(#[case] expression: &str, #[case] expected: bool) {
        assert_eq!(eval(expression), expected, "{expression}");
    }

    #[rstest]
    #[case("lt(1, 2)", true)]
    #[case("lt(2, 2)", false)]
    #[case("lte(2, 2)", true)]
    #[case("gt(2.5, 2)", true)]
    #[case(r#"gte("10", 9)"#, true)]
    #[case(r#"lt("abc", 9)"#, false)]
    #[case(r#"gt("abc", 9)"#, false)]
    #[case("lt(undefined, 9)", false)]
    #[case(r#"numeq("5", 5.0)"#, true)]
    #[case("numneq(5, 6)", true)]
    #[case(r#"numneq("x", 6)"#, false)]
    #[case(r#"numeq(ctx("ageText"), ctx("age"))"#, true)]
    #[case(r#"gte(ctx("age"), 18)"#, true)]
    fn test_numeric(#[case] expression: &str, #[case] expected: bool) {
        assert_eq!(eval(expression), expected, "{expression}");
    }

    #[rstest]
    #[case(r#"inArray("b", ["a", "b"])"#, true)]
    #[case(r#"inArray("c", ["a", "b"])"#, false)]
    #[case("inArray(2, [1, 2, 3])", true)]
    #[case(r#"inArray("2", [1, 2, 3])"#, false)]
    #[case(r#"inArray("a", "abc")"#, false)]
    #[case(r#"inArray("staff", ctx("tags"))"#, true)]
    #[case(r#"inArray("a", ctx("missing"))"#, false)]
    fn test_in_array(#[case] expression: &str, #[case] expected: bool) {
        assert_eq!(eval(expression), expected, "{expression}");
    }
}
