#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-dofmap
//!
//! mesh-dofmap assigns globally consistent degree-of-freedom (DOF) numbers to
//! finite-element meshes. Given a mesh topology (cells, nodes, edges, faces and
//! their incidence) and an ordered list of fields, it numbers every DOF once,
//! shares DOFs on shared entities, and exposes the per-cell tables an assembly
//! loop needs. Sparse coupling graphs derived from the numbering can be
//! partitioned and used to reorder matrices and vectors.
//!
//! ## Features
//! - Mesh topology contract plus an in-memory provider and structured generators
//! - Deterministic node/edge/face/interior DOF numbering for any number of fields
//! - Field patterns, per-field cell rows, side patterns and boundary DOFs
//! - DOF and cell graphs as CSR triples or `nalgebra-sparse` patterns
//! - Block, RCM and (with `metis-support`) METIS partitioning
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-dofmap = "0.3"
//! # Optional features:
//! # features = ["metis-support"]
//! ```
//!
//! ## Determinism
//!
//! Numbering is a pure function of the topology and the field list. Building
//! twice from equal inputs gives equal managers.

// Re-export our major subsystems:
pub mod algs;
pub mod config;
pub mod data;
pub mod debug_invariants;
pub mod mesh_error;
pub mod partitioning;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::meshgen::{structured_hex_box, structured_quad_box};
    pub use crate::algs::sparsity::{CsrGraph, build_dof_graph};
    pub use crate::config::{EntityOrder, NumberingOptions};
    pub use crate::data::dof_manager::DofManager;
    pub use crate::data::dof_table::{DofId, DofTable};
    pub use crate::data::field::{DofTag, EntityDofCounts, FieldDescriptor};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::mesh_error::MeshDofError;
    pub use crate::partitioning::{
        Partition, PartitionBackend, PartitionError, PartitionInterface, PartitionerConfig,
        Permutation, partition_graph,
    };
    pub use crate::topology::{
        CellTable, CellType, EntityKind, InMemoryTopology, MeshTopology, PerKind, SideSets,
    };
}
