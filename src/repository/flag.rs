//! Registered flags

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use super::notify_handlers;
use crate::flags::Variant;

/// Called after a flag is added, with the name it was registered under
pub type FlagAddedHandler = Arc<dyn Fn(&str, &Arc<Variant>) + Send + Sync>;

/// Flags by name, in registration order
#[derive(Default)]
pub struct FlagRepository {
    flags: RwLock<IndexMap<String, Arc<Variant>>>,
    handlers: RwLock<Vec<FlagAddedHandler>>,
}

impl FlagRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a variant under `name` and notify the flag-added handlers
    ///
    /// The variant takes `name` as its own name unless it was already registered under
    /// another one. Re-adding a name replaces the previous variant.
    pub fn add_flag(&self, variant: Arc<Variant>, name: impl Into<String>) {
        let name = name.into();
        if !variant.assign_name(&name) {
            log::warn!(
                "Flag '{}' registered again under '{name}'; it keeps its first name",
                variant.name()
            );
        }

        if self
            .flags
            .write()
            .insert(name.clone(), Arc::clone(&variant))
            .is_some()
        {
            log::debug!("Flag '{name}' replaced");
        }

        let handlers = self.handlers.read().clone();
        notify_handlers("Flag-added", &handlers, |handler| handler(&name, &variant));
    }

    /// Variant registered under `name`
    pub fn get_flag(&self, name: &str) -> Option<Arc<Variant>> {
        self.flags.read().get(name).cloned()
    }

    /// All registered variants, in registration order
    pub fn all_flags(&self) -> Vec<Arc<Variant>> {
        self.flags.read().values().cloned().collect()
    }

    /// Registered `(name, variant)` pairs, in registration order
    ///
    /// A variant registered under several names appears once per name.
    pub fn entries(&self) -> Vec<(String, Arc<Variant>)> {
        self.flags
            .read()
            .iter()
            .map(|(name, variant)| (name.clone(), Arc::clone(variant)))
            .collect()
    }

    /// Number of registered flags
    pub fn len(&self) -> usize {
        self.flags.read().len()
    }

    /// Whether no flag is registered
    pub fn is_empty(&self) -> bool {
        self.flags.read().is_empty()
    }

    /// Append a handler called after every `add_flag`
    pub fn register_flag_added_handler<F>(&self, handler: F)
    where
        F: Fn(&str, &Arc<Variant>) + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }
}

impl std::fmt::Debug for FlagRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagRepository")
            .field("flags", &self.flags.read().keys().collect::<Vec<_>>())
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
