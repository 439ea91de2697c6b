//! Experiments from the latest configuration

use parking_lot::RwLock;
use std::sync::Arc;

use crate::model::ExperimentModel;

/// Current experiment set, replaced wholesale on every configuration refresh
#[derive(Debug, Default)]
pub struct ExperimentRepository {
    experiments: RwLock<Vec<Arc<ExperimentModel>>>,
}

impl ExperimentRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the experiment set
    pub fn set_experiments(&self, experiments: impl IntoIterator<Item = ExperimentModel>) {
        let experiments: Vec<_> = experiments.into_iter().map(Arc::new).collect();
        log::debug!("Storing {} experiments", experiments.len());
        *self.experiments.write() = experiments;
    }

    /// First experiment, in configuration order, that drives `flag_name`
    pub fn get_experiment_by_flag(&self, flag_name: &str) -> Option<Arc<ExperimentModel>> {
        self.experiments
            .read()
            .iter()
            .find(|experiment| experiment.targets_flag(flag_name))
            .cloned()
    }

    /// Experiment by id
    pub fn get_experiment(&self, id: &str) -> Option<Arc<ExperimentModel>> {
        self.experiments
            .read()
            .iter()
            .find(|experiment| experiment.id == id)
            .cloned()
    }

    /// All experiments, in configuration order
    pub fn get_all_experiments(&self) -> Vec<Arc<ExperimentModel>> {
        self.experiments.read().clone()
    }
}
