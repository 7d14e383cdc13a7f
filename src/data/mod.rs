//! Data module: field descriptors, global DOF tables and the DOF manager

pub mod dof_manager;
pub mod dof_table;
pub mod field;

pub use dof_manager::DofManager;
pub use dof_table::{DofId, DofTable};
pub use field::{DofTag, EntityDofCounts, FieldDescriptor};
