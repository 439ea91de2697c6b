//! ROXX stack-machine evaluator

mod engine;
mod frame;
mod scope;
mod stack;

pub use engine::{Parser, ParserBuilder};
pub use frame::{EvaluationFrame, ReferenceKind};
pub use scope::EvaluationScope;
pub use stack::EvalStack;
