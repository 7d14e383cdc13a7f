//! Partitioning errors for mesh-dofmap

use crate::mesh_error::MeshDofError;
use thiserror::Error;

/// Errors from partition requests and reordering.
///
/// All variants are recoverable: a failed request leaves the caller's graph,
/// matrix and vectors untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PartitionError {
    /// The configured backend was not compiled into this build.
    #[error("partition backend `{0}` is not available in this build")]
    BackendUnavailable(&'static str),
    /// The backend itself failed (e.g. METIS wrapper failures).
    #[error("Partitioner error: {0}")]
    Backend(String),
    /// The request was malformed (zero parts, bad graph, ...).
    #[error("Invalid partition request: {0}")]
    InvalidRequest(String),
    /// Reordering was requested before a partition was computed.
    #[error("no partition computed yet; call `partition()` first")]
    NotPartitioned,
    /// Operand size does not match the partitioned system.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Mesh(#[from] MeshDofError),
}
