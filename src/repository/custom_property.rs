//! Registered custom properties

use indexmap::IndexMap;
use indexmap::map::Entry;
use parking_lot::RwLock;
use std::sync::Arc;

use super::notify_handlers;
use crate::model::CustomProperty;

/// Called after a custom property is added
pub type PropertyAddedHandler = Arc<dyn Fn(&CustomProperty) + Send + Sync>;

/// Custom properties by name, in registration order
#[derive(Default)]
pub struct CustomPropertyRepository {
    properties: RwLock<IndexMap<String, CustomProperty>>,
    handlers: RwLock<Vec<PropertyAddedHandler>>,
}

impl CustomPropertyRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a property and notify the property-added handlers
    pub fn add_custom_property(&self, property: CustomProperty) {
        self.properties
            .write()
            .insert(property.name().to_string(), property.clone());
        self.notify(&property);
    }

    /// Add a property unless one with the same name exists
    ///
    /// Returns whether the property was added. Handlers only run when it was.
    pub fn add_custom_property_if_not_exists(&self, property: CustomProperty) -> bool {
        let added = match self.properties.write().entry(property.name().to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(property.clone());
                true
            }
        };
        if added {
            self.notify(&property);
        }
        added
    }

    /// Property registered under `name`
    pub fn get_custom_property(&self, name: &str) -> Option<CustomProperty> {
        self.properties.read().get(name).cloned()
    }

    /// All properties, in registration order
    pub fn all_custom_properties(&self) -> Vec<CustomProperty> {
        self.properties.read().values().cloned().collect()
    }

    /// Append a handler called after every successful add
    pub fn register_property_added_handler<F>(&self, handler: F)
    where
        F: Fn(&CustomProperty) + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }

    fn notify(&self, property: &CustomProperty) {
        let handlers = self.handlers.read().clone();
        notify_handlers("Property-added", &handlers, |handler| handler(property));
    }
}

impl std::fmt::Debug for CustomPropertyRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomPropertyRepository")
            .field("properties", &self.properties.read().keys().collect::<Vec<_>>())
            .field("handlers", &self.handlers.read().len())
            .finish()
    }
}
