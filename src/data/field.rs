//! Field descriptors: how many DOFs a field places on each entity kind.
//!
//! A field describes one physical unknown (a velocity component, pressure,
//! ...). The DOF manager only needs its cardinality per entity kind, i.e. the
//! number of basis functions attached to *each* node, edge, face and cell
//! interior of the reference cell. Optionally a field carries the native DOF
//! tags of its basis so cell-local arrays can be permuted to and from the
//! basis library's ordering.

use crate::mesh_error::MeshDofError;
use crate::topology::cell_type::CellType;
use crate::topology::entity::{EntityKind, PerKind};

/// DOFs per single entity of each kind.
pub type EntityDofCounts = PerKind<usize>;

/// Native basis DOF tag: the sub-entity a basis function is attached to and
/// its ordinal among the functions on that sub-entity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct DofTag {
    pub kind: EntityKind,
    /// Local index of the sub-entity in the reference cell (0 for the interior).
    pub sub_entity: usize,
    /// Ordinal among the DOFs on that sub-entity.
    pub ordinal: usize,
}

impl DofTag {
    pub const fn new(kind: EntityKind, sub_entity: usize, ordinal: usize) -> Self {
        Self {
            kind,
            sub_entity,
            ordinal,
        }
    }
}

/// One field of the discretization.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FieldDescriptor {
    name: String,
    cell_type: Option<CellType>,
    counts: EntityDofCounts,
    tags: Option<Vec<DofTag>>,
}

impl FieldDescriptor {
    /// A field with explicit per-entity cardinalities that fits any cell type.
    pub fn new(name: impl Into<String>, counts: EntityDofCounts) -> Self {
        Self {
            name: name.into(),
            cell_type: None,
            counts,
            tags: None,
        }
    }

    /// Continuous Lagrange (`H(grad)`) field of `degree` on `cell_type`:
    /// `Q_k` on quadrilaterals/hexahedra, `P_k` on simplices.
    pub fn lagrange(
        name: impl Into<String>,
        cell_type: CellType,
        degree: u8,
    ) -> Result<Self, MeshDofError> {
        let counts = lagrange_counts(cell_type, degree)?;
        Ok(Self {
            name: name.into(),
            cell_type: Some(cell_type),
            counts,
            tags: None,
        })
    }

    /// Second-order hexahedral Lagrange field using the common 27-function
    /// native ordering: vertices, edges, the cell center, then the faces in
    /// the order bottom, top, x-, x+, y-, y+ (reference faces 4, 5, 3, 1, 0, 2).
    pub fn hex_c2(name: impl Into<String>) -> Self {
        let mut tags = Vec::with_capacity(27);
        tags.extend((0..8).map(|v| DofTag::new(EntityKind::Node, v, 0)));
        tags.extend((0..12).map(|e| DofTag::new(EntityKind::Edge, e, 0)));
        tags.push(DofTag::new(EntityKind::Void, 0, 0));
        tags.extend([4, 5, 3, 1, 0, 2].map(|f| DofTag::new(EntityKind::Face, f, 0)));
        Self {
            name: name.into(),
            cell_type: Some(CellType::Hexahedron),
            counts: EntityDofCounts::new(1, 1, 1, 1),
            tags: Some(tags),
        }
    }

    /// First-order hexahedral Lagrange field (vertex DOFs only).
    pub fn hex_c1(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cell_type: Some(CellType::Hexahedron),
            counts: EntityDofCounts::new(1, 0, 0, 0),
            tags: Some((0..8).map(|v| DofTag::new(EntityKind::Node, v, 0)).collect()),
        }
    }

    /// Bind the field to a reference cell; the DOF manager rejects meshes of
    /// another cell type.
    pub fn on_cell_type(mut self, cell_type: CellType) -> Self {
        self.cell_type = Some(cell_type);
        self
    }

    /// Attach native basis DOF tags, one per basis function in native order.
    pub fn with_tags(mut self, tags: Vec<DofTag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell_type(&self) -> Option<CellType> {
        self.cell_type
    }

    pub fn counts(&self) -> &EntityDofCounts {
        &self.counts
    }

    /// DOFs this field places on one entity of `kind`.
    #[inline]
    pub fn count(&self, kind: EntityKind) -> usize {
        *self.counts.get(kind)
    }

    pub fn tags(&self) -> Option<&[DofTag]> {
        self.tags.as_deref()
    }

    /// Number of this field's DOFs on one cell of `cell_type`.
    pub fn local_size(&self, cell_type: CellType) -> usize {
        EntityKind::ALL
            .iter()
            .map(|&k| self.count(k) * cell_type.num_sub_entities(k))
            .sum()
    }

    /// Check the descriptor against a mesh cell type.
    pub(crate) fn check_cell_type(&self, mesh_cell: CellType) -> Result<(), MeshDofError> {
        if let Some(expected) = self.cell_type {
            if expected != mesh_cell {
                return Err(MeshDofError::CellTypeMismatch {
                    field: self.name.clone(),
                    expected,
                    found: mesh_cell,
                });
            }
        }
        for kind in [EntityKind::Edge, EntityKind::Face] {
            if self.count(kind) > 0 && mesh_cell.num_sub_entities(kind) == 0 {
                return Err(MeshDofError::MissingConnectivity {
                    field: self.name.clone(),
                    kind,
                });
            }
        }
        Ok(())
    }

    /// Check that the native tags enumerate every DOF exactly once.
    pub(crate) fn check_tags(&self, cell_type: CellType) -> Result<(), MeshDofError> {
        let Some(tags) = &self.tags else {
            return Ok(());
        };
        let invalid = |reason: String| MeshDofError::InvalidDofTags {
            field: self.name.clone(),
            reason,
        };
        let expected = self.local_size(cell_type);
        if tags.len() != expected {
            return Err(invalid(format!(
                "{} tags for {expected} local DOFs",
                tags.len()
            )));
        }
        let mut seen = hashbrown::HashSet::with_capacity(tags.len());
        for tag in tags {
            if tag.sub_entity >= cell_type.num_sub_entities(tag.kind)
                || tag.ordinal >= self.count(tag.kind)
            {
                return Err(invalid(format!("tag {tag:?} does not exist on {cell_type:?}")));
            }
            if !seen.insert(*tag) {
                return Err(invalid(format!("tag {tag:?} appears twice")));
            }
        }
        Ok(())
    }
}

/// Per-entity cardinalities of the continuous Lagrange family.
pub fn lagrange_counts(cell_type: CellType, degree: u8) -> Result<EntityDofCounts, MeshDofError> {
    if degree == 0 {
        return Err(MeshDofError::UnsupportedBasis { cell_type, degree });
    }
    let k = degree as usize - 1;
    let counts = match cell_type {
        CellType::Segment => EntityDofCounts::new(1, 0, 0, k),
        CellType::Quadrilateral => EntityDofCounts::new(1, k, 0, k * k),
        CellType::Hexahedron => EntityDofCounts::new(1, k, k * k, k * k * k),
        CellType::Triangle => {
            // interior points of a P_k triangle: (k-1)(k-2)/2 with k = degree
            let interior = k * k.saturating_sub(1) / 2;
            EntityDofCounts::new(1, k, 0, interior)
        }
        CellType::Tetrahedron => {
            let face = k * k.saturating_sub(1) / 2;
            let interior = k * k.saturating_sub(1) * k.saturating_sub(2) / 6;
            EntityDofCounts::new(1, k, face, interior)
        }
    };
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lagrange_local_sizes() {
        let size = |c, d| FieldDescriptor::lagrange("u", c, d).unwrap().local_size(c);
        assert_eq!(size(CellType::Hexahedron, 1), 8);
        assert_eq!(size(CellType::Hexahedron, 2), 27);
        assert_eq!(size(CellType::Hexahedron, 3), 64);
        assert_eq!(size(CellType::Quadrilateral, 2), 9);
        assert_eq!(size(CellType::Triangle, 2), 6);
        assert_eq!(size(CellType::Triangle, 3), 10);
        assert_eq!(size(CellType::Tetrahedron, 2), 10);
        assert_eq!(size(CellType::Tetrahedron, 3), 20);
        assert_eq!(size(CellType::Tetrahedron, 4), 35);
        assert_eq!(size(CellType::Segment, 3), 4);
    }

    #[test]
    fn degree_zero_is_unsupported() {
        assert!(matches!(
            FieldDescriptor::lagrange("p", CellType::Triangle, 0),
            Err(MeshDofError::UnsupportedBasis { degree: 0, .. })
        ));
    }

    #[test]
    fn presets_have_consistent_tags() {
        let q2 = FieldDescriptor::hex_c2("u");
        q2.check_tags(CellType::Hexahedron).unwrap();
        assert_eq!(q2.tags().unwrap()[20].kind, EntityKind::Void);
        FieldDescriptor::hex_c1("p").check_tags(CellType::Hexahedron).unwrap();
    }

    #[test]
    fn bad_tags_rejected() {
        let mut tags: Vec<_> = (0..8).map(|v| DofTag::new(EntityKind::Node, v, 0)).collect();
        tags[7] = tags[0];
        let f = FieldDescriptor::new("p", EntityDofCounts::new(1, 0, 0, 0)).with_tags(tags);
        assert!(matches!(
            f.check_tags(CellType::Hexahedron),
            Err(MeshDofError::InvalidDofTags { .. })
        ));
    }

    #[test]
    fn face_dofs_need_a_3d_cell() {
        let f = FieldDescriptor::new("q", EntityDofCounts::new(0, 0, 1, 0));
        assert_eq!(
            f.check_cell_type(CellType::Quadrilateral),
            Err(MeshDofError::MissingConnectivity {
                field: "q".into(),
                kind: EntityKind::Face
            })
        );
        assert!(f.check_cell_type(CellType::Tetrahedron).is_ok());
    }
}
