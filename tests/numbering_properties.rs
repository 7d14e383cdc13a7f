//! Property tests for DOF numbering on structured boxes.

use mesh_dofmap::algs::meshgen::{StructuredCellType, structured_box_2d, structured_hex_box};
use mesh_dofmap::data::dof_manager::DofManager;
use mesh_dofmap::data::field::FieldDescriptor;
use mesh_dofmap::debug_invariants::DebugInvariants;
use mesh_dofmap::topology::{EntityKind, InMemoryTopology, MeshTopology};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn mesh_strategy() -> impl Strategy<Value = InMemoryTopology> {
    prop_oneof![
        (1usize..5, 1usize..5).prop_map(|(nx, ny)| {
            structured_box_2d(nx, ny, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Quadrilateral)
                .unwrap()
        }),
        (1usize..4, 1usize..4).prop_map(|(nx, ny)| {
            structured_box_2d(nx, ny, [0.0, 0.0], [1.0, 1.0], StructuredCellType::Triangle).unwrap()
        }),
        (1usize..3, 1usize..3, 1usize..3)
            .prop_map(|(nx, ny, nz)| structured_hex_box(nx, ny, nz, [0.0; 3], [1.0; 3]).unwrap()),
    ]
}

fn setup_strategy() -> impl Strategy<Value = (InMemoryTopology, Vec<u8>)> {
    (mesh_strategy(), prop::collection::vec(1u8..4, 0..4))
}

fn fields_for(mesh: &InMemoryTopology, degrees: &[u8]) -> Vec<FieldDescriptor> {
    degrees
        .iter()
        .enumerate()
        .map(|(i, &d)| FieldDescriptor::lagrange(format!("f{i}"), mesh.cell_type(), d).unwrap())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn numbering_is_deterministic((mesh, degrees) in setup_strategy()) {
        let a = DofManager::new(&mesh, fields_for(&mesh, &degrees)).unwrap();
        let b = DofManager::new(&mesh, fields_for(&mesh, &degrees)).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn shared_entities_resolve_to_one_block((mesh, degrees) in setup_strategy()) {
        let dm = DofManager::new(&mesh, fields_for(&mesh, &degrees)).unwrap();
        let cell_type = mesh.cell_type();
        for kind in [EntityKind::Node, EntityKind::Edge, EntityKind::Face] {
            let Some(incidence) = mesh.incidence(kind) else { continue };
            let width = dm.dofs_of(kind).width();
            // offset of this kind's block in the flattened row
            let offset: usize = EntityKind::ALL
                .iter()
                .take_while(|&&k| k != kind)
                .map(|&k| dm.dofs_of(k).width() * cell_type.num_sub_entities(k))
                .sum();
            for (cell, entities) in incidence.rows().enumerate() {
                let row = dm.cell_dofs(cell).unwrap();
                for (local, &e) in entities.iter().enumerate() {
                    let start = offset + local * width;
                    prop_assert_eq!(&row[start..start + width], dm.entity_dofs(kind, e).unwrap());
                }
            }
        }
    }

    #[test]
    fn every_dof_is_covered_once((mesh, degrees) in setup_strategy()) {
        let dm = DofManager::new(&mesh, fields_for(&mesh, &degrees)).unwrap();
        let mut seen = vec![false; dm.num_dofs()];
        for kind in EntityKind::ALL {
            for (_, ids) in dm.dofs_of(kind).iter() {
                for &id in ids {
                    prop_assert!(!seen[id], "dof {} assigned twice", id);
                    seen[id] = true;
                }
            }
        }
        prop_assert!(seen.iter().all(|&s| s));
        let used: BTreeSet<usize> = dm.cell_dofs_table().as_flat().iter().copied().collect();
        prop_assert_eq!(used.len(), dm.num_dofs());
    }

    #[test]
    fn field_patterns_round_trip((mesh, degrees) in setup_strategy()) {
        let dm = DofManager::new(&mesh, fields_for(&mesh, &degrees)).unwrap();
        let mut positions = Vec::new();
        for f in 0..dm.num_fields() {
            let pattern = dm.field_pattern(f).unwrap();
            prop_assert_eq!(pattern.len(), dm.field(f).unwrap().local_size(mesh.cell_type()));
            positions.extend_from_slice(pattern);
            let table = dm.field_dofs(f).unwrap();
            for cell in 0..mesh.num_cells() {
                let row = dm.cell_dofs(cell).unwrap();
                let projected: Vec<usize> = pattern.iter().map(|&p| row[p]).collect();
                prop_assert_eq!(table.row(cell).unwrap(), projected.as_slice());
            }
        }
        positions.sort_unstable();
        prop_assert_eq!(positions, (0..dm.local_size()).collect::<Vec<_>>());
    }

    #[test]
    fn counts_are_consistent((mesh, degrees) in setup_strategy()) {
        let dm = DofManager::new(&mesh, fields_for(&mesh, &degrees)).unwrap();
        let sum: usize = EntityKind::ALL.iter().map(|&k| dm.num_dofs_of(k)).sum();
        prop_assert_eq!(sum, dm.num_dofs());
        for kind in EntityKind::ALL {
            let table = dm.dofs_of(kind);
            let per_entity: usize = dm.fields().iter().map(|f| f.count(kind)).sum();
            prop_assert_eq!(table.width(), per_entity);
            prop_assert_eq!(table.num_dofs(), table.num_numbered() * per_entity);
            // structured boxes reference every entity
            prop_assert_eq!(table.num_numbered(), mesh.num_entities(kind));
        }
        dm.validate_invariants().unwrap();
    }
}
