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

//! The `Parser` facade: tokenizer plus stack machine over a frozen operator table

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::frame::EvaluationFrame;
use super::scope::EvaluationScope;
use super::stack::EvalStack;
use crate::config::EngineConfig;
use crate::error::{Result, RoxxError};
use crate::model::{Context, EvaluationResult, RoxxValue};
use crate::parser::{Token, tokenize};
use crate::registry::extension::{PropertyExtension, TargetingExtension};
use crate::registry::{Operator, OperatorTable, OperatorTableBuilder, RoxxExtension, operators};

/// ROXX expression evaluator
///
/// A `Parser` owns an immutable operator table assembled once by [`ParserBuilder`].
/// It is `Send + Sync`; any number of threads may evaluate concurrently.
///
/// # Example
/// ```rust
/// use roxx_engine::{Context, Parser};
///
/// let parser = Parser::new();
/// let context = Context::builder().with("plan", "pro").build();
/// let result = parser.evaluate_expression(r#"ifThen(eq("a", "a"), "B", "A")"#, &context);
/// assert_eq!(result.as_string(), "B");
/// ```
pub struct Parser {
    operators: OperatorTable,
    config: EngineConfig,
}

impl Parser {
    /// Parser with the built-in operators only
    pub fn new() -> Self {
        ParserBuilder::new().build()
    }

    /// Start assembling a parser
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Evaluate an expression; never fails, faults collapse to an undefined result
    pub fn evaluate_expression(&self, expression: &str, context: &Context) -> EvaluationResult {
        let mut frame = EvaluationFrame::new(self.config.max_recursion_depth);
        self.evaluate_in_frame(expression, context, &mut frame)
    }

    /// Evaluate an expression as part of an enclosing evaluation
    pub fn evaluate_in_frame(
        &self,
        expression: &str,
        context: &Context,
        frame: &mut EvaluationFrame,
    ) -> EvaluationResult {
        match self.try_evaluate(expression, context, frame) {
            Ok(value) => EvaluationResult::from(value),
            Err(err) => {
                if self.config.log_evaluation_failures {
                    log::debug!("Evaluation of '{expression}' failed: {err}");
                }
                EvaluationResult::undefined()
            }
        }
    }

    /// Run the stack machine and report faults instead of swallowing them
    pub fn try_evaluate(
        &self,
        expression: &str,
        context: &Context,
        frame: &mut EvaluationFrame,
    ) -> Result<RoxxValue> {
        let tokens = self.tokenize(expression)?;
        let mut stack = EvalStack::with_capacity(tokens.len());
        let mut scope = EvaluationScope::new(self, context, frame);

        // operands must be on the stack before their operator runs
        for token in tokens.into_iter().rev() {
            match token {
                Token::Literal(value) => stack.push(value),
                Token::Operator(name) => {
                    let Some(operator) = self.operators.get(&name) else {
                        continue;
                    };
                    panic::catch_unwind(AssertUnwindSafe(|| {
                        operator.execute(&mut stack, &mut scope)
                    }))
                    .map_err(|_| RoxxError::OperatorPanic { operator: name })??;
                }
                Token::Unknown(_) => {}
            }
        }

        Ok(stack.into_result())
    }

    /// Tokenize against this parser's operator names
    pub fn tokenize(&self, expression: &str) -> Result<Vec<Token>> {
        tokenize(expression, &self.operators)
    }

    /// The frozen operator table
    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    /// Names of all registered operators
    pub fn operator_names(&self) -> Vec<&str> {
        self.operators.names().collect()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("operators", &self.operators.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Assembles the operator table of a [`Parser`]
///
/// Installation order is fixed regardless of the order of builder calls: built-ins,
/// then the targeting extension, then the property extension, then other extensions
/// in the order they were added, then host operators in the order they were added.
/// A later registration under an existing name replaces the earlier one.
#[derive(Default)]
pub struct ParserBuilder {
    config: EngineConfig,
    targeting: Option<TargetingExtension>,
    properties: Option<PropertyExtension>,
    extensions: Vec<Box<dyn RoxxExtension>>,
    operators: Vec<(String, Arc<dyn Operator>)>,
}

impl ParserBuilder {
    /// Builder with default configuration and no extensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the engine configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Install `isInPercentage`, `isInPercentageRange`, `isInTargetGroup` and `flagValue`
    pub fn with_targeting(mut self, extension: TargetingExtension) -> Self {
        self.targeting = Some(extension);
        self
    }

    /// Install `property`
    pub fn with_properties(mut self, extension: PropertyExtension) -> Self {
        self.properties = Some(extension);
        self
    }

    /// Install an additional extension
    pub fn with_extension(mut self, extension: impl RoxxExtension + 'static) -> Self {
        self.extensions.push(Box::new(extension));
        self
    }

    /// Register a host operator from a closure
    pub fn add_operator<F>(self, name: impl Into<String>, operator: F) -> Self
    where
        F: Fn(&mut EvalStack, &mut EvaluationScope<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.add_operator_impl(name, Arc::new(operator))
    }

    /// Register a host operator implementation
    pub fn add_operator_impl(mut self, name: impl Into<String>, operator: Arc<dyn Operator>) -> Self {
        self.operators.push((name.into(), operator));
        self
    }

    /// Freeze the table and create the parser
    pub fn build(self) -> Parser {
        let mut table = OperatorTableBuilder::new();
        operators::register_builtins(&mut table, &self.config);

        if let Some(targeting) = &self.targeting {
            targeting.register_operators(&mut table);
        }
        if let Some(properties) = &self.properties {
            properties.register_operators(&mut table);
        }
        for extension in &self.extensions {
            log::debug!("Registering ROXX extension '{}'", extension.name());
            extension.register_operators(&mut table);
        }
        for (name, operator) in self.operators {
            table.register(name, operator);
        }

        Parser {
            operators: table.build(),
            config: self.config,
        }
    }
}
