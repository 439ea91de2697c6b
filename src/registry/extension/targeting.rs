//! Targeting extension: percentage rollout, target groups and flag dependencies

use md5::{Digest, Md5};
use std::sync::Arc;

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope, ReferenceKind};
use crate::model::RoxxValue;
use crate::registry::{Operator, OperatorTableBuilder, RoxxExtension};
use crate::repository::{ExperimentRepository, FlagRepository, TargetGroupRepository};

/// Deterministic bucket in `[0, 1)` for a seed
///
/// The first four bytes of the seed's MD5 digest, read as a little-endian `u32`,
/// divided by `u32::MAX`. An exact `1.0` snaps to `0.0`. Every SDK computes the same
/// bucket for the same seed, which keeps percentage rollouts consistent across them.
pub fn bucket(seed: &str) -> f64 {
    let digest = Md5::digest(seed.as_bytes());
    let word = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let bucket = f64::from(word) / f64::from(u32::MAX);
    if bucket == 1.0 { 0.0 } else { bucket }
}

/// Operators bridging ROXX to targeting data
///
/// - `isInPercentage(seed, fraction)`: `bucket(seed) < fraction`
/// - `isInPercentageRange(seed, low, high)`: `low <= bucket(seed) < high`
/// - `isInTargetGroup(id)`: evaluates the group's condition, `false` when unknown
/// - `flagValue(name)`: the current string value of another flag
#[derive(Clone)]
pub struct TargetingExtension {
    target_groups: Arc<TargetGroupRepository>,
    flags: Arc<FlagRepository>,
    experiments: Arc<ExperimentRepository>,
}

impl TargetingExtension {
    /// Create the extension over the given repositories
    pub fn new(
        target_groups: Arc<TargetGroupRepository>,
        flags: Arc<FlagRepository>,
        experiments: Arc<ExperimentRepository>,
    ) -> Self {
        Self {
            target_groups,
            flags,
            experiments,
        }
    }
}

impl RoxxExtension for TargetingExtension {
    fn name(&self) -> &'static str {
        "targeting"
    }

    fn register_operators(&self, builder: &mut OperatorTableBuilder) {
        builder
            .register_fn("isInPercentage", is_in_percentage)
            .register_fn("isInPercentageRange", is_in_percentage_range)
            .register(
                "isInTargetGroup",
                Arc::new(IsInTargetGroup {
                    target_groups: Arc::clone(&self.target_groups),
                }),
            )
            .register(
                "flagValue",
                Arc::new(FlagValue {
                    flags: Arc::clone(&self.flags),
                    experiments: Arc::clone(&self.experiments),
                }),
            );
    }
}

fn is_in_percentage(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let seed = stack.pop("isInPercentage")?;
    let fraction = stack.pop("isInPercentage")?;
    let inside = match (seed.as_str(), fraction.as_number()) {
        (Some(seed), Some(fraction)) => bucket(seed) < fraction,
        _ => false,
    };
    stack.push(inside);
    Ok(())
}

fn is_in_percentage_range(stack: &mut EvalStack, _: &mut EvaluationScope<'_>) -> Result<()> {
    let seed = stack.pop("isInPercentageRange")?;
    let low = stack.pop("isInPercentageRange")?;
    let high = stack.pop("isInPercentageRange")?;
    let inside = match (seed.as_str(), low.as_number(), high.as_number()) {
        (Some(seed), Some(low), Some(high)) => {
            let bucket = bucket(seed);
            low <= bucket && bucket < high
        }
        _ => false,
    };
    stack.push(inside);
    Ok(())
}

struct IsInTargetGroup {
    target_groups: Arc<TargetGroupRepository>,
}

impl Operator for IsInTargetGroup {
    fn execute(&self, stack: &mut EvalStack, scope: &mut EvaluationScope<'_>) -> Result<()> {
        let id = stack.pop("isInTargetGroup")?;
        let group = id
            .as_str()
            .and_then(|id| self.target_groups.get_target_group(id));
        let Some(group) = group else {
            stack.push(false);
            return Ok(());
        };

        let member = scope
            .with_reference(ReferenceKind::TargetGroup, &group.id, |scope| {
                scope.evaluate_nested(&group.condition).as_bool()
            })?
            .unwrap_or(false);
        stack.push(member);
        Ok(())
    }
}

struct FlagValue {
    flags: Arc<FlagRepository>,
    experiments: Arc<ExperimentRepository>,
}

impl FlagValue {
    fn resolve(&self, name: &str, scope: &mut EvaluationScope<'_>) -> String {
        if let Some(variant) = self.flags.get_flag(name) {
            let (context, frame) = scope.split();
            return variant.evaluate_nested(context, frame);
        }

        if let Some(experiment) = self.experiments.get_experiment_by_flag(name) {
            let value = scope.evaluate_nested(&experiment.condition).as_string();
            if !value.is_empty() {
                return value;
            }
        }

        "false".to_string()
    }
}

impl Operator for FlagValue {
    fn execute(&self, stack: &mut EvalStack, scope: &mut EvaluationScope<'_>) -> Result<()> {
        let name = stack.pop("flagValue")?;
        let Some(name) = name.as_str() else {
            stack.push(RoxxValue::Undefined);
            return Ok(());
        };

        let value = scope.with_reference(ReferenceKind::Flag, name, |scope| {
            self.resolve(name, scope)
        })?;
        stack.push(value);
        Ok(())
    }
}
