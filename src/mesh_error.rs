//! MeshDofError: Unified error type for mesh-dofmap public APIs
//!
//! Topology inconsistencies are reported when a [`DofManager`](crate::data::dof_manager::DofManager)
//! is constructed; query misuse (out-of-range cell, field or entity ids) is
//! reported by the accessor that received the bad index. Nothing in the
//! public API answers a bad index with a sentinel value.

use crate::topology::cell_type::CellType;
use crate::topology::entity::EntityKind;
use thiserror::Error;

/// Unified error type for mesh-dofmap operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshDofError {
    /// An incidence table does not have the arity of the mesh's cell type.
    #[error("{table} has arity {found}, but {cell_type:?} cells expect {expected}")]
    ArityMismatch {
        table: &'static str,
        cell_type: CellType,
        expected: usize,
        found: usize,
    },
    /// An incidence table has a different number of rows than the mesh has cells.
    #[error("{table} has {found} rows, expected one per cell ({expected})")]
    RowCountMismatch {
        table: &'static str,
        expected: usize,
        found: usize,
    },
    /// A cell references an entity outside `[0, count)`.
    #[error("cell {cell} references {kind} {index}, but the mesh has only {count}")]
    EntityOutOfRange {
        kind: EntityKind,
        cell: usize,
        index: usize,
        count: usize,
    },
    /// A field requests DOFs on an entity kind the mesh provides no connectivity for.
    #[error("field `{field}` places DOFs on {kind}s, but the mesh has no {kind} connectivity")]
    MissingConnectivity { field: String, kind: EntityKind },
    /// A field is bound to a different reference cell than the mesh.
    #[error("field `{field}` is defined on {expected:?} cells, but the mesh has {found:?} cells")]
    CellTypeMismatch {
        field: String,
        expected: CellType,
        found: CellType,
    },
    /// A field's native DOF tags disagree with its cardinalities.
    #[error("invalid DOF tags for field `{field}`: {reason}")]
    InvalidDofTags { field: String, reason: String },
    /// No basis preset exists for this cell type and degree.
    #[error("no Lagrange basis of degree {degree} on {cell_type:?} cells")]
    UnsupportedBasis { cell_type: CellType, degree: u8 },
    /// A query received an index outside its valid range.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    /// An entity that no cell references was queried for its DOFs.
    #[error("{kind} {index} is not referenced by any cell and carries no DOFs")]
    UnnumberedEntity { kind: EntityKind, index: usize },
    /// Generator or coordinate input was malformed.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    /// A permutation is not a bijection on `0..n`.
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),
    /// An internal invariant failed validation.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl MeshDofError {
    /// Shorthand for [`MeshDofError::IndexOutOfRange`].
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        MeshDofError::IndexOutOfRange { what, index, len }
    }
}

/// Check `index < len`, producing [`MeshDofError::IndexOutOfRange`] otherwise.
#[inline]
pub(crate) fn check_index(what: &'static str, index: usize, len: usize) -> Result<(), MeshDofError> {
    if index < len {
        Ok(())
    } else {
        Err(MeshDofError::out_of_range(what, index, len))
    }
}
