//! results of applying directive effects

use thiserror::Error;

use crate::conditions::EvalError;
use crate::directives::{DirectiveError, DirectiveKind};
use crate::dom::{DomError, NodeId};

/// why a single directive could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EffectError {
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error(transparent)]
    Dom(#[from] DomError),
}

/// a directive whose update was skipped, siblings are unaffected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveFailure {
    pub node: NodeId,
    pub kind: DirectiveKind,
    pub error: EffectError,
}

impl std::fmt::Display for DirectiveFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} on {}: {}", self.kind.attribute(), self.node, self.error)
    }
}

/// last evaluation of a condition-driven directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    /// condition evaluated true
    Active,
    /// condition evaluated false
    Inactive,
}

impl From<bool> for EffectState {
    fn from(value: bool) -> Self {
        if value {
            EffectState::Active
        } else {
            EffectState::Inactive
        }
    }
}

/// outcome of one init, change or toggle pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// directives whose effect was applied
    pub applied: usize,
    pub failures: Vec<DirectiveFailure>,
}

impl UpdateReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn merge(&mut self, other: UpdateReport) {
        self.applied += other.applied;
        self.failures.extend(other.failures);
    }
}
