//! Scope handed to operators while the stack machine runs

use super::engine::Parser;
use super::frame::{EvaluationFrame, ReferenceKind};
use crate::error::Result;
use crate::model::{Context, EvaluationResult};

/// Everything an operator may need besides its operands
pub struct EvaluationScope<'a> {
    parser: &'a Parser,
    context: &'a Context,
    frame: &'a mut EvaluationFrame,
}

impl<'a> EvaluationScope<'a> {
    pub(crate) fn new(parser: &'a Parser, context: &'a Context, frame: &'a mut EvaluationFrame) -> Self {
        Self {
            parser,
            context,
            frame,
        }
    }

    /// Parser running this evaluation
    pub fn parser(&self) -> &Parser {
        self.parser
    }

    /// Context of this evaluation
    pub fn context(&self) -> &Context {
        self.context
    }

    /// Context and frame together, for re-entering another evaluator
    pub fn split(&mut self) -> (&Context, &mut EvaluationFrame) {
        (self.context, &mut *self.frame)
    }

    /// Evaluate another expression with the same parser, context and frame
    pub fn evaluate_nested(&mut self, expression: &str) -> EvaluationResult {
        self.parser
            .evaluate_in_frame(expression, self.context, self.frame)
    }

    /// Run `f` with `(kind, id)` marked active
    ///
    /// Returns `Ok(None)` without running `f` when the reference is already active.
    pub fn with_reference<T>(
        &mut self,
        kind: ReferenceKind,
        id: &str,
        f: impl FnOnce(&mut Self) -> T,
    ) -> Result<Option<T>> {
        if !self.frame.enter(kind, id)? {
            log::trace!("Cycle detected on {kind:?} '{id}'");
            return Ok(None);
        }
        let output = f(self);
        self.frame.exit(kind, id);
        Ok(Some(output))
    }
}
