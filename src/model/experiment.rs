//! Experiment and target group models
//!
//! Both are produced by the configuration pipeline and are read-only to the engine.

use serde::{Deserialize, Serialize};

/// An experiment binds a targeting condition to one or more flag names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentModel {
    /// Experiment identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// ROXX condition deciding the served value
    pub condition: String,
    /// Archived experiments are still served until the control plane drops them
    #[serde(default)]
    pub is_archived: bool,
    /// Names of the flags this experiment drives
    #[serde(default)]
    pub flags: Vec<String>,
    /// Free-form labels
    #[serde(default)]
    pub labels: Vec<String>,
}

impl ExperimentModel {
    /// Create an unarchived experiment without labels
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        condition: impl Into<String>,
        flags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            condition: condition.into(),
            is_archived: false,
            flags: flags.into_iter().map(Into::into).collect(),
            labels: Vec::new(),
        }
    }

    /// Whether this experiment drives the named flag
    pub fn targets_flag(&self, flag_name: &str) -> bool {
        self.flags.iter().any(|flag| flag == flag_name)
    }
}

/// A reusable named condition referenced through `isInTargetGroup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetGroupModel {
    /// Group identifier
    pub id: String,
    /// ROXX condition deciding membership
    pub condition: String,
}

impl TargetGroupModel {
    /// Create a target group
    pub fn new(id: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            condition: condition.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experiment_deserializes_with_defaults() {
        let experiment: ExperimentModel = serde_json::from_value(serde_json::json!({
            "id": "exp-1",
            "name": "checkout",
            "condition": "ifThen(true, \"B\", \"A\")",
            "flags": ["app.checkout"]
        }))
        .unwrap();

        assert!(!experiment.is_archived);
        assert!(experiment.labels.is_empty());
        assert!(experiment.targets_flag("app.checkout"));
        assert!(!experiment.targets_flag("app.other"));
    }
}
