//! Errors raised by the heap, the graph and the search.

use thiserror::Error;

/// Errors produced by the shortest-path core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("heap is empty")]
    EmptyHeap,

    #[error("node reference {0} does not name a node of this graph")]
    InvalidNodeReference(usize),

    #[error("precondition violated: {0}")]
    PreconditionViolation(#[from] Violation),
}

/// The preconditions the core checks before mutating anything.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    #[error("edge {from} -> {to} has weight {weight}, weights must be finite and non-negative")]
    InvalidWeight { from: usize, to: usize, weight: f64 },

    #[error("heap position {position} is out of range (len {len})")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("identity {0} appears more than once in the heap")]
    DuplicateIdentity(usize),

    #[error("identity {0} is too large to index the order mapping")]
    IdentityOutOfRange(usize),
}

pub type PathResult<T> = Result<T, PathError>;
