//! Evaluation context
//!
//! A [`Context`] is an immutable bag of named values supplied by the host on each flag
//! check. Merging never mutates either input: it produces a new layered view whose
//! lookups consult the local layer before the global one.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use super::value::RoxxValue;

type ContextMap = FxHashMap<String, RoxxValue>;

/// Immutable, cheaply clonable evaluation context
#[derive(Clone, Default)]
pub struct Context {
    /// Highest precedence first
    layers: SmallVec<[Arc<ContextMap>; 2]>,
}

impl Context {
    /// Context without any values
    pub fn empty() -> Self {
        Self::default()
    }

    /// Start building a single-layer context
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Merge a global and a call-site context; local values win on key collision
    pub fn merge(global: &Context, local: &Context) -> Context {
        let mut layers = SmallVec::with_capacity(local.layers.len() + global.layers.len());
        layers.extend(local.layers.iter().cloned());
        layers.extend(global.layers.iter().cloned());
        Context { layers }
    }

    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&RoxxValue> {
        self.layers.iter().find_map(|layer| layer.get(key))
    }

    /// Whether the key is present in any layer
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// True when no layer holds any value
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|layer| layer.is_empty())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        let mut seen = rustc_hash::FxHashSet::default();
        for layer in &self.layers {
            for (key, value) in layer.iter() {
                if seen.insert(key.as_str()) {
                    map.entry(key, value);
                }
            }
        }
        map.finish()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for Context {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter()
            .fold(Context::builder(), |builder, (key, value)| {
                builder.with(key, value)
            })
            .build()
    }
}

impl<K: Into<String>, V: Into<RoxxValue>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Context::builder(), |builder, (key, value)| {
                builder.with(key, value)
            })
            .build()
    }
}

/// Builder for [`Context`]
#[derive(Debug, Default)]
pub struct ContextBuilder {
    values: ContextMap,
}

impl ContextBuilder {
    /// Add or replace a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RoxxValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Finish the context
    pub fn build(self) -> Context {
        if self.values.is_empty() {
            return Context::empty();
        }
        let mut layers = SmallVec::new();
        layers.push(Arc::new(self.values));
        Context { layers }
    }
}
