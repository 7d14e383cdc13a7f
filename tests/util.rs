#![allow(dead_code)]
use mesh_dofmap::{
    data::field::FieldDescriptor,
    topology::{CellTable, CellType, InMemoryTopology, SideSets},
};

/// Three hexahedra: cells 0 and 1 share a face along x, cells 0 and 2 along y,
/// and cells 1 and 2 share the edge (2, 6).
pub fn three_hex_mesh() -> InMemoryTopology {
    let c2n = CellTable::from_rows(
        8,
        [
            [0, 1, 2, 3, 4, 5, 6, 7],
            [1, 8, 9, 2, 5, 10, 11, 6],
            [3, 2, 12, 13, 7, 6, 14, 15],
        ],
    )
    .unwrap();
    let mut sides = SideSets::new();
    let bottom = sides.add_set(3);
    for cell in 0..3 {
        sides.insert(bottom, cell, 4).unwrap();
    }
    let right = sides.add_set(3);
    sides.insert(right, 1, 1).unwrap();
    InMemoryTopology::from_cells(CellType::Hexahedron, 16, c2n)
        .unwrap()
        .with_side_sets(sides)
        .unwrap()
}

/// Fields {Q2, Q1, Q2} on hexahedra.
pub fn q2_q1_q2() -> Vec<FieldDescriptor> {
    [2, 1, 2]
        .into_iter()
        .enumerate()
        .map(|(i, d)| FieldDescriptor::lagrange(format!("f{i}"), CellType::Hexahedron, d).unwrap())
        .collect()
}

/// Assert vec is a permutation of another vec (order-agnostic).
pub fn assert_permutation<T: Ord + Copy + std::fmt::Debug>(got: &[T], want: &[T]) {
    let mut a = got.to_vec();
    a.sort_unstable();
    let mut b = want.to_vec();
    b.sort_unstable();
    assert_eq!(a, b, "not a permutation\n got={:?}\nwant={:?}", got, want);
}
