//! Top-level module for mesh topology abstractions.
//!
//! This module provides the read-only topology contract the DOF manager
//! consumes. It includes:
//! - Entity kinds and per-kind containers
//! - Reference cell types with their local edge/face tables
//! - Fixed-arity incidence tables and side sets
//! - The [`MeshTopology`] trait and an in-memory implementation
//!
//! Most users will build an [`InMemoryTopology`] with
//! [`InMemoryTopology::from_cells`] or one of the structured generators in
//! [`crate::algs::meshgen`].

pub mod cell_table;
pub mod cell_type;
pub mod entity;
pub mod in_memory;
pub mod mesh_topology;
pub mod side_sets;

pub use cell_table::CellTable;
pub use cell_type::{CellType, SideClosure};
pub use entity::{EntityKind, PerKind};
pub use in_memory::InMemoryTopology;
pub use mesh_topology::{Coordinates, MeshTopology, validate_incidence};
pub use side_sets::SideSets;
