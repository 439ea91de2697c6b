// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Operator registry for ROXX expressions
//!
//! The registry is assembled once, by [`ParserBuilder`](crate::ParserBuilder), and
//! then frozen into an [`OperatorTable`]. After that it is read-only and shared by
//! every evaluation without synchronization.
//!
//! # Override semantics
//!
//! [`OperatorTableBuilder::register`] replaces any operator already registered under
//! the same name: the last writer wins. The builder installs built-ins first so that
//! extensions and host operators can deliberately shadow them.

pub mod extension;
pub mod operators;

pub use extension::{PropertyExtension, TargetingExtension};

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope};
use crate::parser::OperatorLookup;

/// A ROXX operator
///
/// Implementations pop their own operands from the stack, in argument order, and
/// push exactly one result. Closures with the matching signature implement this
/// trait automatically.
pub trait Operator: Send + Sync {
    /// Execute the operator against the stack
    fn execute(&self, stack: &mut EvalStack, scope: &mut EvaluationScope<'_>) -> Result<()>;
}

impl<F> Operator for F
where
    F: Fn(&mut EvalStack, &mut EvaluationScope<'_>) -> Result<()> + Send + Sync,
{
    fn execute(&self, stack: &mut EvalStack, scope: &mut EvaluationScope<'_>) -> Result<()> {
        self(stack, scope)
    }
}

/// A module contributing a group of operators
pub trait RoxxExtension: Send + Sync {
    /// Extension name, used in logs
    fn name(&self) -> &'static str;

    /// Register this extension's operators
    fn register_operators(&self, builder: &mut OperatorTableBuilder);
}

/// Mutable operator table used while a parser is being assembled
#[derive(Default)]
pub struct OperatorTableBuilder {
    operators: FxHashMap<String, Arc<dyn Operator>>,
}

impl OperatorTableBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an operator, replacing any previous one with the same name
    pub fn register(&mut self, name: impl Into<String>, operator: Arc<dyn Operator>) -> &mut Self {
        let name = name.into();
        if self.operators.insert(name.clone(), operator).is_some() {
            log::trace!("Operator '{name}' replaced by a later registration");
        }
        self
    }

    /// Register a plain function or closure as an operator
    pub fn register_fn<F>(&mut self, name: impl Into<String>, operator: F) -> &mut Self
    where
        F: Fn(&mut EvalStack, &mut EvaluationScope<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(operator))
    }

    /// Whether an operator is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Freeze the table
    pub fn build(self) -> OperatorTable {
        OperatorTable {
            operators: self.operators,
        }
    }
}

/// Frozen operator table
#[derive(Clone, Default)]
pub struct OperatorTable {
    operators: FxHashMap<String, Arc<dyn Operator>>,
}

impl OperatorTable {
    /// Look up an operator by name
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Operator>> {
        self.operators.get(name)
    }

    /// Whether an operator is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// Registered operator names, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }

    /// Number of registered operators
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl OperatorLookup for OperatorTable {
    fn is_operator(&self, name: &str) -> bool {
        self.contains(name)
    }
}
