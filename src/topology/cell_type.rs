//! Cell type metadata and reference-cell sub-entity tables.
//!
//! Local vertex, edge and face numbering follows the widely used
//! "Shards" conventions, e.g. for a hexahedron the bottom face is
//! `0-1-2-3`, the top face `4-5-6-7`, edges `0..4` run around the bottom,
//! `4..8` around the top and `8..12` are the vertical edges.

use crate::mesh_error::{MeshDofError, check_index};
use crate::topology::entity::EntityKind;

/// Cell types a DOF layout can be built on.
#[derive(
    Clone, Copy, Debug, Eq, Hash, PartialEq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    /// 1D segment.
    Segment,
    /// 2D simplex (triangle).
    Triangle,
    /// 2D tensor-product cell (quad).
    Quadrilateral,
    /// 3D simplex (tet).
    Tetrahedron,
    /// 3D tensor-product cell (hex).
    Hexahedron,
}

const SEGMENT_EDGES: [[usize; 2]; 0] = [];
const TRIANGLE_EDGES: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
const QUAD_EDGES: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
const TET_EDGES: [[usize; 2]; 6] = [[0, 1], [1, 2], [2, 0], [0, 3], [1, 3], [2, 3]];
const HEX_EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

const TET_FACES: [&[usize]; 4] = [&[0, 1, 3], &[1, 2, 3], &[0, 3, 2], &[0, 2, 1]];
const HEX_FACES: [&[usize]; 6] = [
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[0, 4, 7, 3],
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
];

/// Local sub-entities in the closure of one side of a reference cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SideClosure {
    pub nodes: Vec<usize>,
    pub edges: Vec<usize>,
    pub faces: Vec<usize>,
}

impl SideClosure {
    /// Local sub-entities of `kind` in this closure. The cell interior never
    /// lies on a side.
    pub fn entities(&self, kind: EntityKind) -> &[usize] {
        match kind {
            EntityKind::Node => &self.nodes,
            EntityKind::Edge => &self.edges,
            EntityKind::Face => &self.faces,
            EntityKind::Void => &[],
        }
    }
}

impl CellType {
    /// Returns the topological dimension of the cell.
    pub fn dimension(self) -> u8 {
        match self {
            CellType::Segment => 1,
            CellType::Triangle | CellType::Quadrilateral => 2,
            CellType::Tetrahedron | CellType::Hexahedron => 3,
        }
    }

    pub fn num_nodes(self) -> usize {
        match self {
            CellType::Segment => 2,
            CellType::Triangle => 3,
            CellType::Quadrilateral => 4,
            CellType::Tetrahedron => 4,
            CellType::Hexahedron => 8,
        }
    }

    /// Number of shared edges. A segment is its own interior, so it has none.
    pub fn num_edges(self) -> usize {
        self.edge_table().len()
    }

    /// Number of shared faces. 2D cells are their own interior, so they have none.
    pub fn num_faces(self) -> usize {
        self.face_table().len()
    }

    /// Number of local sub-entities of `kind`; the interior counts as one.
    pub fn num_sub_entities(self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Node => self.num_nodes(),
            EntityKind::Edge => self.num_edges(),
            EntityKind::Face => self.num_faces(),
            EntityKind::Void => 1,
        }
    }

    fn edge_table(self) -> &'static [[usize; 2]] {
        match self {
            CellType::Segment => &SEGMENT_EDGES,
            CellType::Triangle => &TRIANGLE_EDGES,
            CellType::Quadrilateral => &QUAD_EDGES,
            CellType::Tetrahedron => &TET_EDGES,
            CellType::Hexahedron => &HEX_EDGES,
        }
    }

    fn face_table(self) -> &'static [&'static [usize]] {
        match self {
            CellType::Tetrahedron => &TET_FACES,
            CellType::Hexahedron => &HEX_FACES,
            _ => &[],
        }
    }

    /// Local vertices of local edge `edge`.
    pub fn edge_nodes(self, edge: usize) -> Result<[usize; 2], MeshDofError> {
        let table = self.edge_table();
        check_index("local edge", edge, table.len())?;
        Ok(table[edge])
    }

    /// Local vertices of local face `face`, counter-clockwise seen from outside.
    pub fn face_nodes(self, face: usize) -> Result<&'static [usize], MeshDofError> {
        let table = self.face_table();
        check_index("local face", face, table.len())?;
        Ok(table[face])
    }

    /// Number of sides: faces in 3D, edges in 2D, vertices in 1D.
    pub fn num_sides(self) -> usize {
        match self.dimension() {
            1 => self.num_nodes(),
            2 => self.num_edges(),
            _ => self.num_faces(),
        }
    }

    /// Local nodes, edges and faces lying on local side `side`.
    pub fn side_closure(self, side: usize) -> Result<SideClosure, MeshDofError> {
        check_index("local side", side, self.num_sides())?;
        let closure = match self.dimension() {
            1 => SideClosure {
                nodes: vec![side],
                ..Default::default()
            },
            2 => SideClosure {
                nodes: self.edge_nodes(side)?.to_vec(),
                edges: vec![side],
                faces: Vec::new(),
            },
            _ => {
                let nodes = self.face_nodes(side)?;
                let edges = self
                    .edge_table()
                    .iter()
                    .enumerate()
                    .filter(|(_, [a, b])| nodes.contains(a) && nodes.contains(b))
                    .map(|(e, _)| e)
                    .collect();
                SideClosure {
                    nodes: nodes.to_vec(),
                    edges,
                    faces: vec![side],
                }
            }
        };
        Ok(closure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_counts() {
        assert_eq!(CellType::Hexahedron.num_nodes(), 8);
        assert_eq!(CellType::Hexahedron.num_edges(), 12);
        assert_eq!(CellType::Hexahedron.num_faces(), 6);
        assert_eq!(CellType::Tetrahedron.num_edges(), 6);
        assert_eq!(CellType::Tetrahedron.num_faces(), 4);
        assert_eq!(CellType::Quadrilateral.num_faces(), 0);
        assert_eq!(CellType::Segment.num_edges(), 0);
        assert_eq!(CellType::Triangle.num_sides(), 3);
    }

    #[test]
    fn hex_side_closure_collects_bounding_edges() {
        let c = CellType::Hexahedron.side_closure(4).unwrap();
        assert_eq!(c.nodes, vec![0, 3, 2, 1]);
        assert_eq!(c.edges, vec![0, 1, 2, 3]);
        assert_eq!(c.faces, vec![4]);

        let c = CellType::Hexahedron.side_closure(1).unwrap();
        assert_eq!(c.edges, vec![1, 5, 9, 10]);
    }

    #[test]
    fn tet_faces_have_three_edges() {
        for f in 0..4 {
            let c = CellType::Tetrahedron.side_closure(f).unwrap();
            assert_eq!(c.nodes.len(), 3);
            assert_eq!(c.edges.len(), 3);
        }
    }

    #[test]
    fn quad_side_is_an_edge() {
        let c = CellType::Quadrilateral.side_closure(3).unwrap();
        assert_eq!(c.nodes, vec![3, 0]);
        assert_eq!(c.edges, vec![3]);
        assert!(c.faces.is_empty());
    }

    #[test]
    fn out_of_range_side_is_an_error() {
        assert!(matches!(
            CellType::Quadrilateral.side_closure(4),
            Err(MeshDofError::IndexOutOfRange { what: "local side", index: 4, len: 4 })
        ));
    }
}
