//! Logical operators: `and`, `or`, `not`, `ifThen`, `isUndefined`
//!
//! `Undefined` boolean operands count as `false`; any other non-boolean operand is a
//! type error.

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope};

/// `and(a, b)`
pub fn and(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let left = stack.pop_bool("and")?;
    let right = stack.pop_bool("and")?;
    stack.push(left && right);
    Ok(())
}

/// `or(a, b)`
pub fn or(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let left = stack.pop_bool("or")?;
    let right = stack.pop_bool("or")?;
    stack.push(left || right);
    Ok(())
}

/// `not(a)`
pub fn not(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let value = stack.pop_bool("not")?;
    stack.push(!value);
    Ok(())
}

/// `ifThen(condition, whenTrue, whenFalse)`
///
/// Both branches have already been evaluated by the time this runs.
pub fn if_then(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let condition = stack.pop_bool("ifThen")?;
    let when_true = stack.pop("ifThen")?;
    let when_false = stack.pop("ifThen")?;
    stack.push(if condition { when_true } else { when_false });
    Ok(())
}

/// `isUndefined(x)`
pub fn is_undefined(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let value = stack.pop("isUndefined")?;
    stack.push(value.is_undefined());
    Ok(())
}
