//! Re-export public algorithms.

pub mod meshgen;
pub mod metis_partition;
pub mod rcm;
pub mod side_set_dump;
pub mod sparsity;

pub use meshgen::{structured_hex_box, structured_quad_box};
pub use rcm::reverse_cuthill_mckee;
pub use side_set_dump::write_side_sets;
pub use sparsity::{CsrGraph, build_cell_graph, build_dof_graph};
