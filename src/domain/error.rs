//! Domain-level errors

use std::path::PathBuf;
use thiserror::Error;

/// Result type for path-tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Precondition violations and flows-file failures.
///
/// None of these are transient; they are logic errors in the caller or in
/// the flows file, reported instead of silently producing a structurally
/// invalid tree.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("tree has no root")]
    EmptyTree,

    #[error("stale node handle: node is not part of this tree")]
    StaleNode,

    #[error("node is already attached to this tree")]
    AlreadyAttached,

    #[error("node is not reachable from the root")]
    Detached,

    #[error("cycle detected in route at hop: {0}")]
    CycleDetected(String),

    #[error("route source mismatch: expected {expected}, found {found}")]
    SourceMismatch { expected: String, found: String },

    #[error("flow has no routes: {0}")]
    EmptyFlow(String),

    #[error("route has no hops in flow: {0}")]
    EmptyRoute(String),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read file: {0}")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("tree invariant violated: {0}")]
    Internal(String),
}
