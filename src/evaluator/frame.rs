//! Per-evaluation recursion frame
//!
//! `isInTargetGroup` and `flagValue` re-enter the evaluator. The frame records which
//! references are currently being evaluated so that a cycle fails soft instead of
//! overflowing the stack.

use rustc_hash::FxHashSet;

use crate::error::{Result, RoxxError};

/// Kind of reference that re-enters the evaluator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// `isInTargetGroup(id)`
    TargetGroup,
    /// `flagValue(name)`
    Flag,
}

/// References active in one top-level evaluation
#[derive(Debug)]
pub struct EvaluationFrame {
    active: FxHashSet<(ReferenceKind, String)>,
    max_depth: usize,
}

impl EvaluationFrame {
    /// Create a frame allowing at most `max_depth` nested references
    pub fn new(max_depth: usize) -> Self {
        Self {
            active: FxHashSet::default(),
            max_depth,
        }
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.active.len()
    }

    /// Whether the reference is being evaluated further up the stack
    pub fn is_active(&self, kind: ReferenceKind, id: &str) -> bool {
        self.active.contains(&(kind, id.to_string()))
    }

    /// Mark a reference as active
    ///
    /// Returns `Ok(false)` when the reference is already active (a cycle), and an
    /// error when the depth limit is reached.
    pub fn enter(&mut self, kind: ReferenceKind, id: &str) -> Result<bool> {
        if self.is_active(kind, id) {
            return Ok(false);
        }
        if self.active.len() >= self.max_depth {
            return Err(RoxxError::RecursionLimit {
                depth: self.max_depth,
            });
        }
        self.active.insert((kind, id.to_string()));
        Ok(true)
    }

    /// Release a reference entered with [`enter`](Self::enter)
    pub fn exit(&mut self, kind: ReferenceKind, id: &str) {
        self.active.remove(&(kind, id.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_detection() {
        let mut frame = EvaluationFrame::new(8);
        assert!(frame.enter(ReferenceKind::TargetGroup, "g1").unwrap());
        assert!(!frame.enter(ReferenceKind::TargetGroup, "g1").unwrap());
        // same id under another kind is a different reference
        assert!(frame.enter(ReferenceKind::Flag, "g1").unwrap());
        assert_eq!(frame.depth(), 2);

        frame.exit(ReferenceKind::TargetGroup, "g1");
        assert!(!frame.is_active(ReferenceKind::TargetGroup, "g1"));
        assert!(frame.enter(ReferenceKind::TargetGroup, "g1").unwrap());
    }

    #[test]
    fn test_depth_limit() {
        let mut frame = EvaluationFrame::new(1);
        assert!(frame.enter(ReferenceKind::Flag, "a").unwrap());
        assert_eq!(
            frame.enter(ReferenceKind::Flag, "b").unwrap_err(),
            RoxxError::RecursionLimit { depth: 1 }
        );
    }
}
