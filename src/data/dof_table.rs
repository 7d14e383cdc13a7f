//! Global DOF table for one entity kind.
//!
//! Row `e` holds the global ids of entity `e`, one per active field slot.
//! Columns are grouped by field in field order; a field with cardinality `k`
//! on this kind owns `k` consecutive columns and a field with cardinality 0
//! owns none. Entities no cell references stay unnumbered.

use crate::mesh_error::{MeshDofError, check_index};
use crate::topology::entity::EntityKind;
use std::ops::Range;

/// Global DOF id.
pub type DofId = usize;

/// Per-entity DOF ids of one [`EntityKind`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DofTable {
    kind: EntityKind,
    /// Column range of each field.
    field_columns: Vec<Range<usize>>,
    width: usize,
    ids: Vec<DofId>,
    /// Visited marker per entity.
    numbered: Vec<bool>,
    num_numbered: usize,
    range: Range<DofId>,
}

impl DofTable {
    /// Empty table for `num_entities` entities; `counts[f]` is the
    /// cardinality of field `f` on this kind.
    pub(crate) fn new(kind: EntityKind, num_entities: usize, counts: &[usize], first: DofId) -> Self {
        let mut field_columns = Vec::with_capacity(counts.len());
        let mut width = 0;
        for &c in counts {
            field_columns.push(width..width + c);
            width += c;
        }
        Self {
            kind,
            field_columns,
            width,
            ids: vec![0; num_entities * width],
            numbered: vec![false; num_entities],
            num_numbered: 0,
            range: first..first,
        }
    }

    #[inline]
    pub(crate) fn is_numbered_unchecked(&self, entity: usize) -> bool {
        self.numbered[entity]
    }

    /// Mark `entity` visited without assigning ids yet.
    #[inline]
    pub(crate) fn mark(&mut self, entity: usize) -> bool {
        !std::mem::replace(&mut self.numbered[entity], true)
    }

    /// Give `entity` the block `next..next + width` and return the next free id.
    ///
    /// The caller walks entities so that consecutive calls receive
    /// consecutive blocks; `range` grows accordingly.
    pub(crate) fn assign(&mut self, entity: usize, next: DofId) -> DofId {
        self.numbered[entity] = true;
        let row = &mut self.ids[entity * self.width..(entity + 1) * self.width];
        for (slot, id) in row.iter_mut().enumerate() {
            *id = next + slot;
        }
        self.num_numbered += 1;
        self.range.end = next + self.width;
        next + self.width
    }

    #[inline]
    pub(crate) fn row_unchecked(&self, entity: usize) -> &[DofId] {
        &self.ids[entity * self.width..(entity + 1) * self.width]
    }

    /// Entity kind of this table.
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Number of entities of this kind in the mesh (numbered or not).
    pub fn num_entities(&self) -> usize {
        self.numbered.len()
    }

    /// Number of entities that received DOFs.
    pub fn num_numbered(&self) -> usize {
        self.num_numbered
    }

    /// DOFs per numbered entity, summed over fields.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total DOFs in this table.
    pub fn num_dofs(&self) -> usize {
        self.range.len()
    }

    /// Contiguous global id range covered by this table.
    pub fn dof_range(&self) -> Range<DofId> {
        self.range.clone()
    }

    /// Columns of field `field` within each row.
    pub fn field_columns(&self, field: usize) -> Result<Range<usize>, MeshDofError> {
        check_index("field", field, self.field_columns.len())?;
        Ok(self.field_columns[field].clone())
    }

    /// Whether `entity` received DOFs.
    pub fn is_numbered(&self, entity: usize) -> Result<bool, MeshDofError> {
        check_index("entity", entity, self.numbered.len())?;
        Ok(self.numbered[entity])
    }

    /// All DOF ids of `entity`, grouped by field.
    pub fn row(&self, entity: usize) -> Result<&[DofId], MeshDofError> {
        if !self.is_numbered(entity)? {
            return Err(MeshDofError::UnnumberedEntity {
                kind: self.kind,
                index: entity,
            });
        }
        Ok(self.row_unchecked(entity))
    }

    /// DOF ids of `field` on `entity`; empty when the field has no DOFs on
    /// this kind.
    pub fn field_row(&self, entity: usize, field: usize) -> Result<&[DofId], MeshDofError> {
        let cols = self.field_columns(field)?;
        Ok(&self.row(entity)?[cols])
    }

    /// Numbered `(entity, ids)` pairs in ascending entity order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[DofId])> + '_ {
        (0..self.num_entities())
            .filter(|&e| self.numbered[e])
            .map(|e| (e, self.row_unchecked(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_group_by_field() {
        let t = DofTable::new(EntityKind::Edge, 3, &[1, 0, 2], 10);
        assert_eq!(t.width(), 3);
        assert_eq!(t.field_columns(0).unwrap(), 0..1);
        assert_eq!(t.field_columns(1).unwrap(), 1..1);
        assert_eq!(t.field_columns(2).unwrap(), 1..3);
        assert!(t.field_columns(3).is_err());
    }

    #[test]
    fn assign_and_query() {
        let mut t = DofTable::new(EntityKind::Node, 3, &[1, 1], 0);
        let next = t.assign(2, 0);
        let next = t.assign(0, next);
        assert_eq!(next, 4);
        assert_eq!(t.row(2).unwrap(), &[0, 1]);
        assert_eq!(t.field_row(0, 1).unwrap(), &[3]);
        assert_eq!(t.dof_range(), 0..4);
        assert_eq!(t.num_numbered(), 2);
        assert_eq!(
            t.row(1),
            Err(MeshDofError::UnnumberedEntity {
                kind: EntityKind::Node,
                index: 1
            })
        );
        assert!(t.row(3).is_err());
        let order: Vec<_> = t.iter().map(|(e, _)| e).collect();
        assert_eq!(order, vec![0, 2]);
    }
}
