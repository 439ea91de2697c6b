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

//! ROXX targeting rules and flag evaluation
//!
//! ROXX is the operator-first expression language feature-flag SDKs use to encode
//! targeting conditions, e.g. `ifThen(isInPercentage("user-1.seed", 0.5), "B", "A")`.
//! This crate contains the tokenizer, the stack-machine evaluator with its built-in
//! operators, the targeting and property extensions, the variant model and the
//! thread-safe repositories that tie them together.
//!
//! # Example
//! ```rust
//! use std::sync::Arc;
//! use roxx_engine::{
//!     Context, CustomPropertyRepository, ExperimentModel, ExperimentRepository, FlagRepository,
//!     FlagSetter, Parser, PropertyExtension, RoxString, TargetGroupRepository, TargetingExtension,
//! };
//!
//! let flags = Arc::new(FlagRepository::new());
//! let experiments = Arc::new(ExperimentRepository::new());
//! let parser = Arc::new(
//!     Parser::builder()
//!         .with_targeting(TargetingExtension::new(
//!             Arc::new(TargetGroupRepository::new()),
//!             Arc::clone(&flags),
//!             Arc::clone(&experiments),
//!         ))
//!         .with_properties(PropertyExtension::new(Arc::new(CustomPropertyRepository::new())))
//!         .build(),
//! );
//! let setter = FlagSetter::builder(Arc::clone(&flags), Arc::clone(&experiments), parser).build();
//!
//! let layout = RoxString::new("classic", ["compact"]);
//! flags.add_flag(Arc::clone(layout.variant()), "app.layout");
//!
//! experiments.set_experiments(vec![ExperimentModel::new(
//!     "exp-1",
//!     "layout",
//!     r#"ifThen(eq("a", "a"), "compact", "classic")"#,
//!     ["app.layout"],
//! )]);
//! setter.set_experiments();
//!
//! assert_eq!(layout.value(&Context::empty()), "compact");
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod flags;
pub mod model;
pub mod parser;
pub mod registry;
pub mod repository;

// Re-export main types
pub use config::EngineConfig;
pub use error::{Result, RoxxError};
pub use evaluator::{EvalStack, EvaluationFrame, EvaluationScope, Parser, ParserBuilder, ReferenceKind};
pub use flags::{
    FlagSetter, Impression, ImpressionInvoker, RoxDouble, RoxFlag, RoxInt, RoxString, Variant,
    VariantBinding, VariantKind, VariantValue,
};
pub use model::{
    Context, CustomProperty, CustomPropertyType, EvaluationResult, ExperimentModel,
    TargetGroupModel, RoxxValue, context_value_rule,
};
pub use parser::{Token, TokenKind, tokenize};
pub use registry::{Operator, OperatorTable, PropertyExtension, RoxxExtension, TargetingExtension};
pub use repository::{
    CustomPropertyRepository, ExperimentRepository, FlagRepository, TargetGroupRepository,
};
