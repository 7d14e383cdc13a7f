//! In-memory mesh topology provider.
//!
//! [`InMemoryTopology::from_cells`] takes a cell→node table and derives the
//! cell→edge and cell→face tables by walking cells in ascending order and each
//! cell's reference edges/faces in local order. The first time a sub-entity
//! (identified by its sorted vertex set) is seen it receives the next global
//! index, so entity numbering matches first-visit order.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::{MeshDofError, check_index};
use crate::topology::cell_table::CellTable;
use crate::topology::cell_type::CellType;
use crate::topology::entity::EntityKind;
use crate::topology::mesh_topology::{Coordinates, MeshTopology, validate_incidence};
use crate::topology::side_sets::SideSets;
use hashbrown::HashMap;

/// Sorted vertex set of a sub-entity, padded with `usize::MAX`.
type EntityKey = [usize; 4];

/// Mesh topology held entirely in memory.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct InMemoryTopology {
    cell_type: CellType,
    num_nodes: usize,
    num_edges: usize,
    num_faces: usize,
    cell_to_node: CellTable<usize>,
    cell_to_edge: Option<CellTable<usize>>,
    cell_to_face: Option<CellTable<usize>>,
    side_sets: SideSets,
    coordinates: Option<Coordinates>,
}

impl InMemoryTopology {
    /// Build a topology from a cell→node table, deriving edges and faces.
    ///
    /// # Errors
    /// - [`MeshDofError::ArityMismatch`] if rows do not have `cell_type.num_nodes()` entries.
    /// - [`MeshDofError::EntityOutOfRange`] if a node index is `>= num_nodes`.
    pub fn from_cells(
        cell_type: CellType,
        num_nodes: usize,
        cell_to_node: CellTable<usize>,
    ) -> Result<Self, MeshDofError> {
        let mut topo = Self {
            cell_type,
            num_nodes,
            num_edges: 0,
            num_faces: 0,
            cell_to_edge: None,
            cell_to_face: None,
            side_sets: SideSets::new(),
            coordinates: None,
            cell_to_node,
        };
        validate_incidence(&topo, EntityKind::Node)?;

        if cell_type.num_edges() > 0 {
            let (table, count) = topo.derive_entities(EntityKind::Edge)?;
            topo.cell_to_edge = Some(table);
            topo.num_edges = count;
        }
        if cell_type.num_faces() > 0 {
            let (table, count) = topo.derive_entities(EntityKind::Face)?;
            topo.cell_to_face = Some(table);
            topo.num_faces = count;
        }
        log::debug!(
            "derived topology: {} {:?} cells, {} nodes, {} edges, {} faces",
            topo.num_cells(),
            cell_type,
            num_nodes,
            topo.num_edges,
            topo.num_faces
        );
        Ok(topo)
    }

    /// Assemble a topology from precomputed tables without deriving anything.
    ///
    /// Only node incidence is checked here; the DOF manager validates the
    /// remaining tables when it is built on this topology.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        cell_type: CellType,
        num_nodes: usize,
        num_edges: usize,
        num_faces: usize,
        cell_to_node: CellTable<usize>,
        cell_to_edge: Option<CellTable<usize>>,
        cell_to_face: Option<CellTable<usize>>,
    ) -> Result<Self, MeshDofError> {
        let topo = Self {
            cell_type,
            num_nodes,
            num_edges,
            num_faces,
            cell_to_node,
            cell_to_edge,
            cell_to_face,
            side_sets: SideSets::new(),
            coordinates: None,
        };
        validate_incidence(&topo, EntityKind::Node)?;
        Ok(topo)
    }

    /// Attach node coordinates; the node count must match.
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Result<Self, MeshDofError> {
        if coordinates.num_nodes() != self.num_nodes {
            return Err(MeshDofError::InvalidGeometry(format!(
                "{} coordinate rows for {} nodes",
                coordinates.num_nodes(),
                self.num_nodes
            )));
        }
        self.coordinates = Some(coordinates);
        Ok(self)
    }

    /// Attach side sets; every populated cell slot must be a cell of this mesh
    /// and every side a valid local side of the cell type.
    pub fn with_side_sets(mut self, side_sets: SideSets) -> Result<Self, MeshDofError> {
        let num_sides = self.cell_type.num_sides();
        for (_, cell, sides) in side_sets.iter() {
            check_index("cell", cell, self.num_cells())?;
            for &side in sides {
                check_index("local side", side, num_sides)?;
            }
        }
        self.side_sets = side_sets;
        Ok(self)
    }

    fn derive_entities(&self, kind: EntityKind) -> Result<(CellTable<usize>, usize), MeshDofError> {
        let arity = self.cell_type.num_sub_entities(kind);
        let mut ids: HashMap<EntityKey, usize> = HashMap::new();
        let mut data = Vec::with_capacity(self.num_cells() * arity);
        for nodes in self.cell_to_node.rows() {
            for local in 0..arity {
                let key = self.entity_key(kind, nodes, local)?;
                let next = ids.len();
                data.push(*ids.entry(key).or_insert(next));
            }
        }
        let count = ids.len();
        Ok((CellTable::from_flat(arity, data)?, count))
    }

    fn entity_key(&self, kind: EntityKind, nodes: &[usize], local: usize) -> Result<EntityKey, MeshDofError> {
        let mut key = [usize::MAX; 4];
        match kind {
            EntityKind::Edge => {
                for (slot, &l) in self.cell_type.edge_nodes(local)?.iter().enumerate() {
                    key[slot] = nodes[l];
                }
            }
            EntityKind::Face => {
                for (slot, &l) in self.cell_type.face_nodes(local)?.iter().enumerate() {
                    key[slot] = nodes[l];
                }
            }
            EntityKind::Node | EntityKind::Void => {
                return Err(MeshDofError::InvariantViolation(format!(
                    "{kind} entities are not derived"
                )));
            }
        }
        key.sort_unstable();
        Ok(key)
    }
}

impl MeshTopology for InMemoryTopology {
    fn cell_type(&self) -> CellType {
        self.cell_type
    }
    fn num_nodes(&self) -> usize {
        self.num_nodes
    }
    fn num_cells(&self) -> usize {
        self.cell_to_node.num_rows()
    }
    fn num_edges(&self) -> usize {
        self.num_edges
    }
    fn num_faces(&self) -> usize {
        self.num_faces
    }
    fn cell_to_node(&self) -> &CellTable<usize> {
        &self.cell_to_node
    }
    fn cell_to_edge(&self) -> Option<&CellTable<usize>> {
        self.cell_to_edge.as_ref()
    }
    fn cell_to_face(&self) -> Option<&CellTable<usize>> {
        self.cell_to_face.as_ref()
    }
    fn side_sets(&self) -> &SideSets {
        &self.side_sets
    }
    fn coordinates(&self) -> Option<&Coordinates> {
        self.coordinates.as_ref()
    }
}

impl DebugInvariants for InMemoryTopology {
    fn validate_invariants(&self) -> Result<(), MeshDofError> {
        for kind in [EntityKind::Node, EntityKind::Edge, EntityKind::Face] {
            validate_incidence(self, kind)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_quads() -> InMemoryTopology {
        // 3---4---5
        // |   |   |
        // 0---1---2
        let c2n = CellTable::from_rows(4, [[0, 1, 4, 3], [1, 2, 5, 4]]).unwrap();
        InMemoryTopology::from_cells(CellType::Quadrilateral, 6, c2n).unwrap()
    }

    #[test]
    fn shared_edge_gets_one_index() {
        let t = two_quads();
        assert_eq!(t.num_edges(), 7);
        assert_eq!(t.num_faces(), 0);
        assert!(t.cell_to_face().is_none());
        let c2e = t.cell_to_edge().unwrap();
        assert_eq!(c2e.row(0).unwrap(), &[0, 1, 2, 3]);
        // cell 1 local edge 3 is (4, 1), the same as cell 0 local edge 1.
        assert_eq!(c2e.row(1).unwrap(), &[4, 5, 6, 1]);
        t.validate_invariants().unwrap();
    }

    #[test]
    fn node_out_of_range_rejected() {
        let c2n = CellTable::from_rows(3, [[0, 1, 7]]).unwrap();
        let err = InMemoryTopology::from_cells(CellType::Triangle, 3, c2n).unwrap_err();
        assert_eq!(
            err,
            MeshDofError::EntityOutOfRange {
                kind: EntityKind::Node,
                cell: 0,
                index: 7,
                count: 3
            }
        );
    }

    #[test]
    fn wrong_arity_rejected() {
        let c2n = CellTable::from_rows(3, [[0, 1, 2]]).unwrap();
        let err = InMemoryTopology::from_cells(CellType::Quadrilateral, 3, c2n).unwrap_err();
        assert!(matches!(err, MeshDofError::ArityMismatch { expected: 4, found: 3, .. }));
    }

    #[test]
    fn side_sets_are_checked() {
        let mut s = SideSets::new();
        let set = s.add_set(2);
        s.insert(set, 1, 4).unwrap();
        assert!(two_quads().with_side_sets(s).is_err());

        let mut s = SideSets::new();
        let set = s.add_set(2);
        s.insert(set, 1, 1).unwrap();
        let t = two_quads().with_side_sets(s).unwrap();
        assert_eq!(t.side_sets().sides(0, 1).unwrap(), &[1]);
    }

    #[test]
    fn coordinates_must_match_node_count() {
        let coords = Coordinates::new(2, vec![0.0; 10]).unwrap();
        assert!(two_quads().with_coordinates(coords).is_err());
        let coords = Coordinates::new(2, vec![0.0; 12]).unwrap();
        let t = two_quads().with_coordinates(coords).unwrap();
        assert_eq!(t.coordinates().unwrap().node(5).unwrap(), &[0.0, 0.0]);
    }
}
