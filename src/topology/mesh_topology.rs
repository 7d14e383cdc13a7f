//! The mesh-topology contract consumed by the DOF manager.

use crate::mesh_error::{MeshDofError, check_index};
use crate::topology::cell_table::CellTable;
use crate::topology::cell_type::CellType;
use crate::topology::entity::EntityKind;
use crate::topology::side_sets::SideSets;

/// Node coordinates stored row-major with a fixed spatial dimension.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Coordinates {
    dimension: usize,
    values: Vec<f64>,
}

impl Coordinates {
    pub fn new(dimension: usize, values: Vec<f64>) -> Result<Self, MeshDofError> {
        if dimension == 0 {
            return Err(MeshDofError::InvalidGeometry(
                "dimension must be non-zero".into(),
            ));
        }
        if values.len() % dimension != 0 {
            return Err(MeshDofError::InvalidGeometry(format!(
                "{} coordinate values do not split into {dimension}-vectors",
                values.len()
            )));
        }
        Ok(Self { dimension, values })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn num_nodes(&self) -> usize {
        self.values.len() / self.dimension.max(1)
    }

    /// Coordinates of `node`.
    pub fn node(&self, node: usize) -> Result<&[f64], MeshDofError> {
        check_index("node", node, self.num_nodes())?;
        let d = self.dimension;
        Ok(&self.values[node * d..(node + 1) * d])
    }
}

/// Read-only topology queries a DOF manager needs.
///
/// Implementors guarantee that an edge or face shared by several cells has
/// one global index; the DOF manager never reconciles duplicates itself.
pub trait MeshTopology {
    /// Reference cell of every cell in the mesh.
    fn cell_type(&self) -> CellType;

    fn num_nodes(&self) -> usize;
    fn num_cells(&self) -> usize;
    /// Zero when the provider has no edge connectivity.
    fn num_edges(&self) -> usize;
    /// Zero when the provider has no face connectivity.
    fn num_faces(&self) -> usize;

    /// Cell → node incidence, one row per cell in reference-vertex order.
    fn cell_to_node(&self) -> &CellTable<usize>;
    /// Cell → edge incidence in reference-edge order, if available.
    fn cell_to_edge(&self) -> Option<&CellTable<usize>>;
    /// Cell → face incidence in reference-face order, if available.
    fn cell_to_face(&self) -> Option<&CellTable<usize>>;

    /// Boundary side groupings.
    fn side_sets(&self) -> &SideSets;

    /// Node coordinates, if the provider carries geometry.
    fn coordinates(&self) -> Option<&Coordinates> {
        None
    }

    /// Global entity count for `kind`; for [`EntityKind::Void`] this is the
    /// cell count.
    fn num_entities(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Node => self.num_nodes(),
            EntityKind::Edge => self.num_edges(),
            EntityKind::Face => self.num_faces(),
            EntityKind::Void => self.num_cells(),
        }
    }

    /// Incidence table for a shared kind; `None` for [`EntityKind::Void`] or
    /// missing connectivity.
    fn incidence(&self, kind: EntityKind) -> Option<&CellTable<usize>> {
        match kind {
            EntityKind::Node => Some(self.cell_to_node()),
            EntityKind::Edge => self.cell_to_edge(),
            EntityKind::Face => self.cell_to_face(),
            EntityKind::Void => None,
        }
    }
}

/// Check one incidence table of `mesh` against its cell type and entity count.
///
/// Missing connectivity is not an error here; callers decide whether a kind
/// is required. [`EntityKind::Void`] has no table and always passes.
pub fn validate_incidence<M>(mesh: &M, kind: EntityKind) -> Result<(), MeshDofError>
where
    M: MeshTopology + ?Sized,
{
    let Some(table) = mesh.incidence(kind) else {
        return Ok(());
    };
    let name = match kind {
        EntityKind::Node => "cell_to_node",
        EntityKind::Edge => "cell_to_edge",
        EntityKind::Face => "cell_to_face",
        EntityKind::Void => return Ok(()),
    };
    let cell_type = mesh.cell_type();
    let expected = cell_type.num_sub_entities(kind);
    if table.arity() != expected {
        return Err(MeshDofError::ArityMismatch {
            table: name,
            cell_type,
            expected,
            found: table.arity(),
        });
    }
    if table.num_rows() != mesh.num_cells() {
        return Err(MeshDofError::RowCountMismatch {
            table: name,
            expected: mesh.num_cells(),
            found: table.num_rows(),
        });
    }
    let count = mesh.num_entities(kind);
    for (cell, row) in table.rows().enumerate() {
        if let Some(&index) = row.iter().find(|&&e| e >= count) {
            return Err(MeshDofError::EntityOutOfRange {
                kind,
                cell,
                index,
                count,
            });
        }
    }
    Ok(())
}
