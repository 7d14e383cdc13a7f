use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use mesh_dofmap::algs::meshgen::structured_hex_box;
use mesh_dofmap::algs::rcm::reverse_cuthill_mckee;
use mesh_dofmap::algs::sparsity::build_dof_graph;
use mesh_dofmap::data::dof_manager::DofManager;
use mesh_dofmap::data::field::FieldDescriptor;
use mesh_dofmap::partitioning::{PartitionBackend, PartitionerConfig, partition_graph};
use mesh_dofmap::topology::CellType;

fn taylor_hood() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::lagrange("velocity", CellType::Hexahedron, 2).unwrap(),
        FieldDescriptor::lagrange("pressure", CellType::Hexahedron, 1).unwrap(),
    ]
}

fn bench_numbering(c: &mut Criterion) {
    let mut group = c.benchmark_group("dof_numbering");
    for &n in &[4usize, 8, 16] {
        let mesh = structured_hex_box(n, n, n, [0.0; 3], [1.0; 3]).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &mesh, |b, mesh| {
            b.iter(|| DofManager::new(mesh, taylor_hood()).unwrap())
        });
    }
    group.finish();
}

fn bench_reordering(c: &mut Criterion) {
    let mut group = c.benchmark_group("dof_graph_reordering");
    for &n in &[4usize, 8] {
        let mesh = structured_hex_box(n, n, n, [0.0; 3], [1.0; 3]).unwrap();
        let dofs = DofManager::new(&mesh, taylor_hood()).unwrap();
        let graph = build_dof_graph(&dofs);
        group.bench_with_input(BenchmarkId::new("rcm", n), &graph, |b, g| {
            b.iter(|| reverse_cuthill_mckee(g))
        });
        let cfg = PartitionerConfig {
            backend: PartitionBackend::Rcm,
            n_parts: 8,
        };
        group.bench_with_input(BenchmarkId::new("partition", n), &graph, |b, g| {
            b.iter(|| partition_graph(g, &cfg).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_numbering, bench_reordering);
criterion_main!(benches);
