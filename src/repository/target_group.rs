//! Target groups from the latest configuration

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::model::TargetGroupModel;

/// Target groups by id
#[derive(Debug, Default)]
pub struct TargetGroupRepository {
    groups: RwLock<FxHashMap<String, Arc<TargetGroupModel>>>,
}

impl TargetGroupRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all target groups
    pub fn set_target_groups(&self, groups: impl IntoIterator<Item = TargetGroupModel>) {
        let groups: FxHashMap<_, _> = groups
            .into_iter()
            .map(|group| (group.id.clone(), Arc::new(group)))
            .collect();
        log::debug!("Storing {} target groups", groups.len());
        *self.groups.write() = groups;
    }

    /// Add or replace one target group
    pub fn add_target_group(&self, group: TargetGroupModel) {
        self.groups.write().insert(group.id.clone(), Arc::new(group));
    }

    /// Target group by id
    pub fn get_target_group(&self, id: &str) -> Option<Arc<TargetGroupModel>> {
        self.groups.read().get(id).cloned()
    }

    /// All target groups, in no particular order
    pub fn all_target_groups(&self) -> Vec<Arc<TargetGroupModel>> {
        self.groups.read().values().cloned().collect()
    }
}
