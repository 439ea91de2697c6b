//! Time operators: `now`, `tsToNum`

use chrono::Utc;

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope};
use crate::model::RoxxValue;

/// `now()`: current epoch milliseconds
pub fn now(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    stack.push(Utc::now().timestamp_millis());
    Ok(())
}

/// `tsToNum(ts)`: epoch seconds with fractional part, `Undefined` for non-timestamps
pub fn ts_to_num(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let value = stack.pop("tsToNum")?;
    let seconds = match value {
        RoxxValue::Timestamp(ts) => {
            RoxxValue::Float(ts.timestamp() as f64 + f64::from(ts.timestamp_subsec_nanos()) / 1e9)
        }
        _ => RoxxValue::Undefined,
    };
    stack.push(seconds);
    Ok(())
}
