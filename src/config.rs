//! Structured configuration for a DOF setup.
//!
//! Every struct derives `serde` so any format can load it; the library never
//! parses files itself. Missing optional sections fall back to `Default`.
//!
//! ```rust
//! # fn try_main() -> Result<(), mesh_dofmap::mesh_error::MeshDofError> {
//! use mesh_dofmap::config::{DofSetup, FieldSpec, MeshSpec};
//!
//! let setup = DofSetup {
//!     mesh: MeshSpec::HexBox { cells: [2, 1, 1], min: [0.0; 3], max: [2.0, 1.0, 1.0] },
//!     fields: vec![FieldSpec::Lagrange { name: "u".into(), degree: 2 }],
//!     numbering: Default::default(),
//!     partitioner: Default::default(),
//! };
//! let (_mesh, dofs) = setup.build()?;
//! assert_eq!(dofs.local_field_size(0)?, 27);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```

use crate::algs::meshgen::{StructuredCellType, structured_box_2d, structured_box_3d};
use crate::data::dof_manager::DofManager;
use crate::data::field::{EntityDofCounts, FieldDescriptor};
use crate::mesh_error::MeshDofError;
use crate::partitioning::PartitionerConfig;
use crate::topology::in_memory::InMemoryTopology;
use crate::topology::mesh_topology::MeshTopology;

/// Order in which entities of one kind receive their DOF blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityOrder {
    /// Walk cells ascending and each cell's entities in local order.
    #[default]
    FirstVisit,
    /// Ascending global entity index.
    EntityIndex,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NumberingOptions {
    pub order: EntityOrder,
}

/// Structured mesh to generate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshSpec {
    QuadBox {
        cells: [usize; 2],
        min: [f64; 2],
        max: [f64; 2],
    },
    TriangleBox {
        cells: [usize; 2],
        min: [f64; 2],
        max: [f64; 2],
    },
    HexBox {
        cells: [usize; 3],
        min: [f64; 3],
        max: [f64; 3],
    },
}

impl MeshSpec {
    pub fn build(&self) -> Result<InMemoryTopology, MeshDofError> {
        match *self {
            MeshSpec::QuadBox { cells, min, max } => {
                structured_box_2d(cells[0], cells[1], min, max, StructuredCellType::Quadrilateral)
            }
            MeshSpec::TriangleBox { cells, min, max } => {
                structured_box_2d(cells[0], cells[1], min, max, StructuredCellType::Triangle)
            }
            MeshSpec::HexBox { cells, min, max } => {
                structured_box_3d(cells[0], cells[1], cells[2], min, max, StructuredCellType::Hexahedron)
            }
        }
    }
}

/// One field of the setup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldSpec {
    /// Continuous Lagrange field on the mesh's cell type.
    Lagrange { name: String, degree: u8 },
    /// Explicit DOFs per entity of each kind.
    Counts { name: String, counts: EntityDofCounts },
}

impl FieldSpec {
    pub fn to_descriptor(&self, mesh: &impl MeshTopology) -> Result<FieldDescriptor, MeshDofError> {
        match self {
            FieldSpec::Lagrange { name, degree } => {
                FieldDescriptor::lagrange(name.clone(), mesh.cell_type(), *degree)
            }
            FieldSpec::Counts { name, counts } => Ok(FieldDescriptor::new(name.clone(), *counts)),
        }
    }
}

/// Mesh, fields and numbering options in one loadable document.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DofSetup {
    pub mesh: MeshSpec,
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub numbering: NumberingOptions,
    #[serde(default)]
    pub partitioner: PartitionerConfig,
}

impl DofSetup {
    /// Generate the mesh and number the fields on it.
    pub fn build(&self) -> Result<(InMemoryTopology, DofManager), MeshDofError> {
        let mesh = self.mesh.build()?;
        let fields = self
            .fields
            .iter()
            .map(|f| f.to_descriptor(&mesh))
            .collect::<Result<Vec<_>, _>>()?;
        let dofs = DofManager::with_options(&mesh, fields, &self.numbering)?;
        Ok((mesh, dofs))
    }
}
