mod util;
use util::*;

use mesh_dofmap::algs::meshgen::structured_quad_box;
use mesh_dofmap::algs::sparsity::{build_cell_graph, build_dof_graph, zero_dof_matrix};
use mesh_dofmap::data::dof_manager::DofManager;
use mesh_dofmap::data::field::FieldDescriptor;
use mesh_dofmap::partitioning::metrics::edge_cut;
use mesh_dofmap::partitioning::{
    PartitionBackend, PartitionError, PartitionInterface, PartitionerConfig, partition_graph,
};
use mesh_dofmap::topology::CellType;
use nalgebra::{DMatrix, DVector};

fn q2_box(nx: usize, ny: usize) -> DofManager {
    let mesh = structured_quad_box(nx, ny, [0.0, 0.0], [1.0, 1.0]).unwrap();
    let q2 = FieldDescriptor::lagrange("u", CellType::Quadrilateral, 2).unwrap();
    DofManager::new(&mesh, vec![q2]).unwrap()
}

#[test]
fn every_vertex_lands_in_exactly_one_part() {
    let dm = q2_box(4, 3);
    let graph = build_dof_graph(&dm);
    for backend in [PartitionBackend::Block, PartitionBackend::Rcm] {
        let cfg = PartitionerConfig { backend, n_parts: 4 };
        let p = partition_graph(&graph, &cfg).unwrap();
        assert_eq!(p.num_vertices(), dm.num_dofs());
        assert!(p.parts().iter().all(|&q| q < 4));
        assert_eq!(p.part_sizes().iter().sum::<usize>(), dm.num_dofs());
        let all: Vec<usize> = (0..dm.num_dofs()).collect();
        assert_permutation(p.permutation().perm(), &all);
        let ranges = p.part_ranges();
        for (new, &old) in p.permutation().perm().iter().enumerate() {
            assert!(ranges[p.parts()[old]].contains(&new));
        }
    }
}

#[test]
fn cell_strip_splits_with_one_cut() {
    let dm = q2_box(6, 1);
    let cells = build_cell_graph(&dm);
    let cfg = PartitionerConfig {
        backend: PartitionBackend::Rcm,
        n_parts: 2,
    };
    let p = partition_graph(&cells, &cfg).unwrap();
    // a strip of 6 cells splits with a single cut edge
    assert_eq!(edge_cut(&cells, p.parts()), 1);
}

#[cfg(not(feature = "metis-support"))]
#[test]
fn metis_request_fails_recoverably() {
    let dm = q2_box(2, 2);
    let cfg = PartitionerConfig {
        backend: PartitionBackend::Metis,
        n_parts: 2,
    };
    let err = partition_graph(&build_dof_graph(&dm), &cfg).unwrap_err();
    assert_eq!(err, PartitionError::BackendUnavailable("metis"));
}

#[test]
fn interface_reorders_matrix_and_vector() {
    let dm = q2_box(3, 2);
    let mut a = zero_dof_matrix(&dm).unwrap();
    // distinguishable entries: a[i, j] = 1000 i + j
    let pattern = a.pattern().clone();
    let mut k = 0;
    let values = a.values_mut();
    for i in 0..pattern.major_dim() {
        for &j in pattern.lane(i) {
            values[k] = (1000 * i + j) as f64;
            k += 1;
        }
    }
    let n = a.nrows();
    let cfg = PartitionerConfig {
        backend: PartitionBackend::Rcm,
        n_parts: 3,
    };
    let mut iface = PartitionInterface::new(a.clone(), cfg).unwrap();
    assert_eq!(iface.reorder_matrix().unwrap_err(), PartitionError::NotPartitioned);

    let perm = iface.partition().unwrap().permutation().clone();
    let b = DMatrix::from(&iface.reorder_matrix().unwrap());
    let dense = DMatrix::from(&a);
    for i in 0..n {
        for j in 0..n {
            assert_eq!(b[(i, j)], dense[(perm.perm()[i], perm.perm()[j])]);
        }
    }

    let x = DVector::from_iterator(n, (0..n).map(|i| i as f64));
    let y = iface.reorder_vector(&x).unwrap();
    for i in 0..n {
        assert_eq!(y[i], perm.perm()[i] as f64);
    }
    assert_eq!(iface.restore_vector(&y).unwrap(), x);
    assert!(matches!(
        iface.reorder_vector(&DVector::zeros(n + 1)),
        Err(PartitionError::DimensionMismatch { .. })
    ));
}
