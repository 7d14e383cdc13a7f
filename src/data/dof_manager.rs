//! DofManager: global degree-of-freedom numbering over a mesh.
//!
//! Given a [`MeshTopology`] and an ordered list of [`FieldDescriptor`]s the
//! manager assigns every DOF a global id. Ids form four contiguous ranges,
//! node DOFs first, then edge, face and cell-interior ("void") DOFs. Within a
//! range every entity receives one consecutive block holding the slots of all
//! fields active on that kind, field by field.
//!
//! Shared entities are numbered once: a visited marker per entity records the
//! first cell that reached it, and every later cell looks the ids up instead of
//! creating new ones. The numbering is a pure function of the topology and the
//! field list, so two managers built from the same inputs are identical.
//!
//! # Local ordering
//! Each cell's flattened DOF row lists its nodes, then edges, then faces, then
//! interior, each in reference-cell order and sub-ordered by field. A field's
//! own compact local numbering follows the same nesting restricted to that
//! field; [`DofManager::field_pattern`] maps it into the flattened row.
//!
//! # Example
//! ```rust
//! # fn try_main() -> Result<(), mesh_dofmap::mesh_error::MeshDofError> {
//! use mesh_dofmap::algs::meshgen::structured_quad_box;
//! use mesh_dofmap::data::dof_manager::DofManager;
//! use mesh_dofmap::data::field::FieldDescriptor;
//! use mesh_dofmap::topology::cell_type::CellType;
//!
//! let mesh = structured_quad_box(2, 1, [0.0, 0.0], [2.0, 1.0])?;
//! let fields = vec![
//!     FieldDescriptor::lagrange("u", CellType::Quadrilateral, 2)?,
//!     FieldDescriptor::lagrange("p", CellType::Quadrilateral, 1)?,
//! ];
//! let dofs = DofManager::new(&mesh, fields)?;
//! assert_eq!(dofs.num_node_dofs(), 6 * 2);
//! assert_eq!(dofs.local_field_size(0)?, 9);
//! # Ok(())
//! # }
//! # try_main().unwrap();
//! ```

use crate::config::{EntityOrder, NumberingOptions};
use crate::data::dof_table::{DofId, DofTable};
use crate::data::field::FieldDescriptor;
use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::{MeshDofError, check_index};
use crate::topology::cell_table::CellTable;
use crate::topology::cell_type::CellType;
use crate::topology::entity::{EntityKind, PerKind};
use crate::topology::mesh_topology::{MeshTopology, validate_incidence};
use crate::topology::side_sets::SideSets;
use std::collections::BTreeSet;
use std::ops::Range;

/// Immutable DOF numbering of one mesh and field list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DofManager {
    cell_type: CellType,
    num_cells: usize,
    fields: Vec<FieldDescriptor>,
    tables: PerKind<DofTable>,
    cell_dofs: CellTable<DofId>,
    field_pattern: Vec<Vec<usize>>,
    num_dofs: usize,
}

static_assertions::assert_impl_all!(DofManager: Send, Sync);

impl DofManager {
    /// Number `fields` over `mesh` in first-visit order.
    ///
    /// # Errors
    /// Any topology inconsistency between the mesh and the fields, see
    /// [`DofManager::with_options`].
    pub fn new<M>(mesh: &M, fields: Vec<FieldDescriptor>) -> Result<Self, MeshDofError>
    where
        M: MeshTopology + ?Sized,
    {
        Self::with_options(mesh, fields, &NumberingOptions::default())
    }

    /// Number `fields` over `mesh`.
    ///
    /// # Errors
    /// - [`MeshDofError::CellTypeMismatch`] if a field is bound to another cell type.
    /// - [`MeshDofError::MissingConnectivity`] if a field needs edge or face DOFs
    ///   and the mesh has no such incidence table.
    /// - [`MeshDofError::ArityMismatch`], [`MeshDofError::RowCountMismatch`] or
    ///   [`MeshDofError::EntityOutOfRange`] for malformed incidence tables.
    /// - [`MeshDofError::InvalidDofTags`] if a field's native tags are inconsistent.
    pub fn with_options<M>(
        mesh: &M,
        fields: Vec<FieldDescriptor>,
        options: &NumberingOptions,
    ) -> Result<Self, MeshDofError>
    where
        M: MeshTopology + ?Sized,
    {
        let cell_type = mesh.cell_type();
        let num_cells = mesh.num_cells();
        check_mesh_and_fields(mesh, &fields)?;
        if fields.is_empty() {
            log::warn!("DofManager built without fields; every cell has zero DOFs");
        }

        // 1. Number each entity kind in turn.
        let mut next: DofId = 0;
        let mut number = |kind: EntityKind| -> DofTable {
            let counts: Vec<usize> = fields.iter().map(|f| f.count(kind)).collect();
            let mut table = DofTable::new(kind, mesh.num_entities(kind), &counts, next);
            match mesh.incidence(kind) {
                None if kind == EntityKind::Void => {
                    for cell in 0..num_cells {
                        next = table.assign(cell, next);
                    }
                }
                None => {}
                Some(incidence) => match options.order {
                    EntityOrder::FirstVisit => {
                        for row in incidence.rows() {
                            for &e in row {
                                if table.mark(e) {
                                    next = table.assign(e, next);
                                }
                            }
                        }
                    }
                    EntityOrder::EntityIndex => {
                        for row in incidence.rows() {
                            for &e in row {
                                table.mark(e);
                            }
                        }
                        for e in 0..table.num_entities() {
                            if table.is_numbered_unchecked(e) {
                                next = table.assign(e, next);
                            }
                        }
                    }
                },
            }
            let unreferenced = table.num_entities() - table.num_numbered();
            if unreferenced > 0 && kind.is_shared() {
                log::warn!("{unreferenced} {kind}(s) are not referenced by any cell and get no DOFs");
            }
            log::debug!(
                "numbered {} {kind}(s) x {} slot(s): dofs {:?}",
                table.num_numbered(),
                table.width(),
                table.dof_range()
            );
            table
        };
        let node = number(EntityKind::Node);
        let edge = number(EntityKind::Edge);
        let face = number(EntityKind::Face);
        let void = number(EntityKind::Void);
        let tables = PerKind::new(node, edge, face, void);
        let num_dofs = tables.void.dof_range().end;

        // 2. Flatten per-cell rows: nodes, edges, faces, interior.
        let local_size: usize = EntityKind::ALL
            .iter()
            .map(|&k| tables.get(k).width() * cell_type.num_sub_entities(k))
            .sum();
        let cell_dofs = if local_size == 0 {
            CellTable::with_empty_rows(num_cells)
        } else {
            let mut data = Vec::with_capacity(num_cells * local_size);
            for cell in 0..num_cells {
                for kind in [EntityKind::Node, EntityKind::Edge, EntityKind::Face] {
                    let table = tables.get(kind);
                    if table.width() == 0 {
                        continue;
                    }
                    if let Some(incidence) = mesh.incidence(kind) {
                        for &e in incidence.row_unchecked(cell) {
                            data.extend_from_slice(table.row_unchecked(e));
                        }
                    }
                }
                data.extend_from_slice(tables.void.row_unchecked(cell));
            }
            CellTable::from_flat(local_size, data)?
        };

        // 3. Field patterns: positions of each field's slots in the flattened row.
        let mut field_pattern = vec![Vec::new(); fields.len()];
        let mut base = 0;
        for kind in EntityKind::ALL {
            let table = tables.get(kind);
            for _ in 0..cell_type.num_sub_entities(kind) {
                for (f, pattern) in field_pattern.iter_mut().enumerate() {
                    pattern.extend(table.field_columns(f)?.map(|col| base + col));
                }
                base += table.width();
            }
        }

        let manager = Self {
            cell_type,
            num_cells,
            fields,
            tables,
            cell_dofs,
            field_pattern,
            num_dofs,
        };
        log::info!(
            "numbered {} DOFs over {} cells ({} node, {} edge, {} face, {} void)",
            manager.num_dofs,
            num_cells,
            manager.num_node_dofs(),
            manager.num_edge_dofs(),
            manager.num_face_dofs(),
            manager.num_void_dofs()
        );
        manager.debug_assert_invariants();
        Ok(manager)
    }

    // ----------------------------------------------------------------------
    // Counts and ranges
    // ----------------------------------------------------------------------

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, field: usize) -> Result<&FieldDescriptor, MeshDofError> {
        check_index("field", field, self.fields.len())?;
        Ok(&self.fields[field])
    }

    /// Total number of DOFs.
    pub fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    /// Number of DOFs attached to entities of `kind`.
    pub fn num_dofs_of(&self, kind: EntityKind) -> usize {
        self.tables.get(kind).num_dofs()
    }

    pub fn num_node_dofs(&self) -> usize {
        self.num_dofs_of(EntityKind::Node)
    }

    pub fn num_edge_dofs(&self) -> usize {
        self.num_dofs_of(EntityKind::Edge)
    }

    pub fn num_face_dofs(&self) -> usize {
        self.num_dofs_of(EntityKind::Face)
    }

    pub fn num_void_dofs(&self) -> usize {
        self.num_dofs_of(EntityKind::Void)
    }

    /// Contiguous id range of the DOFs of `kind`.
    pub fn dof_range(&self, kind: EntityKind) -> Range<DofId> {
        self.tables.get(kind).dof_range()
    }

    // ----------------------------------------------------------------------
    // Global tables
    // ----------------------------------------------------------------------

    /// Global DOF table of `kind`.
    pub fn dofs_of(&self, kind: EntityKind) -> &DofTable {
        self.tables.get(kind)
    }

    pub fn node_dofs(&self) -> &DofTable {
        &self.tables.node
    }

    pub fn edge_dofs(&self) -> &DofTable {
        &self.tables.edge
    }

    pub fn face_dofs(&self) -> &DofTable {
        &self.tables.face
    }

    /// Cell-interior DOFs, one row per cell.
    pub fn void_dofs(&self) -> &DofTable {
        &self.tables.void
    }

    /// DOF ids of entity `entity` of `kind`, grouped by field.
    pub fn entity_dofs(&self, kind: EntityKind, entity: usize) -> Result<&[DofId], MeshDofError> {
        self.tables.get(kind).row(entity)
    }

    /// DOF ids of `field` on entity `entity` of `kind`.
    pub fn entity_field_dofs(
        &self,
        kind: EntityKind,
        entity: usize,
        field: usize,
    ) -> Result<&[DofId], MeshDofError> {
        self.tables.get(kind).field_row(entity, field)
    }

    // ----------------------------------------------------------------------
    // Cell-local views
    // ----------------------------------------------------------------------

    /// Flattened global DOF table, one row per cell.
    pub fn cell_dofs_table(&self) -> &CellTable<DofId> {
        &self.cell_dofs
    }

    /// Flattened global DOF row of `cell`.
    pub fn cell_dofs(&self, cell: usize) -> Result<&[DofId], MeshDofError> {
        check_index("cell", cell, self.num_cells)?;
        Ok(self.cell_dofs.row_unchecked(cell))
    }

    /// Length of each flattened cell row.
    pub fn local_size(&self) -> usize {
        self.cell_dofs.arity()
    }

    /// Field patterns of all fields.
    pub fn field_patterns(&self) -> &[Vec<usize>] {
        &self.field_pattern
    }

    /// Position of each of `field`'s local DOFs in the flattened cell row.
    pub fn field_pattern(&self, field: usize) -> Result<&[usize], MeshDofError> {
        check_index("field", field, self.field_pattern.len())?;
        Ok(&self.field_pattern[field])
    }

    /// Number of local DOFs of `field` on one cell.
    pub fn local_field_size(&self, field: usize) -> Result<usize, MeshDofError> {
        Ok(self.field_pattern(field)?.len())
    }

    /// Global DOF ids of `field` on `cell`, in the field's local order.
    pub fn cell_field_dofs(&self, cell: usize, field: usize) -> Result<Vec<DofId>, MeshDofError> {
        let pattern = self.field_pattern(field)?;
        let row = self.cell_dofs(cell)?;
        Ok(pattern.iter().map(|&p| row[p]).collect())
    }

    /// Global DOF rows of `field` for every cell.
    pub fn field_dofs(&self, field: usize) -> Result<CellTable<DofId>, MeshDofError> {
        let pattern = self.field_pattern(field)?;
        if pattern.is_empty() {
            return Ok(CellTable::with_empty_rows(self.num_cells));
        }
        let data = self
            .cell_dofs
            .rows()
            .flat_map(|row| pattern.iter().map(move |&p| row[p]))
            .collect();
        CellTable::from_flat(pattern.len(), data)
    }

    // ----------------------------------------------------------------------
    // Sides and boundaries
    // ----------------------------------------------------------------------

    /// Field-local indices of `field`'s DOFs on the closure of local side
    /// `side`, ascending.
    pub fn field_side_pattern(&self, field: usize, side: usize) -> Result<Vec<usize>, MeshDofError> {
        let descriptor = self.field(field)?;
        let closure = self.cell_type.side_closure(side)?;
        let mut out = Vec::new();
        let mut local = 0;
        for kind in EntityKind::ALL {
            let count = descriptor.count(kind);
            let on_side = closure.entities(kind);
            for sub in 0..self.cell_type.num_sub_entities(kind) {
                if on_side.contains(&sub) {
                    out.extend(local..local + count);
                }
                local += count;
            }
        }
        Ok(out)
    }

    /// Sorted global ids of `field` on every side recorded in side set `set`.
    pub fn boundary_dofs(
        &self,
        side_sets: &SideSets,
        set: usize,
        field: usize,
    ) -> Result<Vec<DofId>, MeshDofError> {
        let side_patterns = (0..self.cell_type.num_sides())
            .map(|s| self.field_side_pattern(field, s))
            .collect::<Result<Vec<_>, _>>()?;
        let mut out = BTreeSet::new();
        for (cell, sides) in side_sets.set_entries(set)? {
            let row = self.cell_field_dofs(cell, field)?;
            for &side in sides {
                check_index("local side", side, side_patterns.len())?;
                out.extend(side_patterns[side].iter().map(|&i| row[i]));
            }
        }
        Ok(out.into_iter().collect())
    }

    // ----------------------------------------------------------------------
    // Native basis ordering
    // ----------------------------------------------------------------------

    /// For each native basis function of `field`, its field-local index.
    ///
    /// Fields without tags use the canonical ordering, giving the identity.
    pub fn basis_to_field_order(&self, field: usize) -> Result<Vec<usize>, MeshDofError> {
        let descriptor = self.field(field)?;
        let size = self.local_field_size(field)?;
        let Some(tags) = descriptor.tags() else {
            return Ok((0..size).collect());
        };
        let mut kind_offset = PerKind::default();
        let mut offset = 0;
        for kind in EntityKind::ALL {
            *kind_offset.get_mut(kind) = offset;
            offset += descriptor.count(kind) * self.cell_type.num_sub_entities(kind);
        }
        Ok(tags
            .iter()
            .map(|t| kind_offset.get(t.kind) + t.sub_entity * descriptor.count(t.kind) + t.ordinal)
            .collect())
    }

    /// Permute a field-local array into the native basis order of `field`.
    pub fn to_basis_order<T: Clone>(&self, field: usize, values: &[T]) -> Result<Vec<T>, MeshDofError> {
        let map = self.basis_to_field_order(field)?;
        if values.len() != map.len() {
            return Err(MeshDofError::out_of_range("local value", values.len(), map.len()));
        }
        Ok(map.iter().map(|&i| values[i].clone()).collect())
    }

    /// Permute a native-basis-ordered array into the field-local order.
    pub fn from_basis_order<T: Clone>(&self, field: usize, values: &[T]) -> Result<Vec<T>, MeshDofError> {
        let map = self.basis_to_field_order(field)?;
        if values.len() != map.len() {
            return Err(MeshDofError::out_of_range("local value", values.len(), map.len()));
        }
        let mut out = values.to_vec();
        for (b, &i) in map.iter().enumerate() {
            out[i] = values[b].clone();
        }
        Ok(out)
    }
}

/// Construction-time consistency checks between mesh and fields.
fn check_mesh_and_fields<M>(mesh: &M, fields: &[FieldDescriptor]) -> Result<(), MeshDofError>
where
    M: MeshTopology + ?Sized,
{
    let cell_type = mesh.cell_type();
    for field in fields {
        field.check_cell_type(cell_type)?;
        field.check_tags(cell_type)?;
    }
    for kind in [EntityKind::Edge, EntityKind::Face] {
        if mesh.incidence(kind).is_none() {
            if let Some(field) = fields.iter().find(|f| f.count(kind) > 0) {
                return Err(MeshDofError::MissingConnectivity {
                    field: field.name().to_string(),
                    kind,
                });
            }
        }
    }
    for kind in [EntityKind::Node, EntityKind::Edge, EntityKind::Face] {
        validate_incidence(mesh, kind)?;
    }
    Ok(())
}

impl DebugInvariants for DofManager {
    fn validate_invariants(&self) -> Result<(), MeshDofError> {
        let broken = |msg: String| Err(MeshDofError::InvariantViolation(msg));

        // Ranges are disjoint, ordered and cover [0, num_dofs).
        let mut expected_start = 0;
        for kind in EntityKind::ALL {
            let table = self.tables.get(kind);
            let range = table.dof_range();
            if range.start != expected_start {
                return broken(format!("{kind} range {range:?} does not start at {expected_start}"));
            }
            if range.len() != table.num_numbered() * table.width() {
                return broken(format!(
                    "{kind} range {range:?} does not match {} entities x {} slots",
                    table.num_numbered(),
                    table.width()
                ));
            }
            expected_start = range.end;
        }
        if expected_start != self.num_dofs {
            return broken(format!("ranges end at {expected_start}, total is {}", self.num_dofs));
        }

        // Field patterns partition the flattened cell row.
        let local = self.local_size();
        let mut hit = vec![false; local];
        for (f, pattern) in self.field_pattern.iter().enumerate() {
            if pattern.len() != self.fields[f].local_size(self.cell_type) {
                return broken(format!("field {f} pattern has {} entries", pattern.len()));
            }
            for &p in pattern {
                if p >= local || std::mem::replace(&mut hit[p], true) {
                    return broken(format!("field {f} pattern position {p} invalid or repeated"));
                }
            }
        }
        if hit.iter().any(|h| !h) {
            return broken("field patterns do not cover the cell row".into());
        }

        if let Some(&bad) = self.cell_dofs.as_flat().iter().find(|&&d| d >= self.num_dofs) {
            return broken(format!("cell DOF {bad} outside [0, {})", self.num_dofs));
        }
        Ok(())
    }
}
