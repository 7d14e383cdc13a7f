//! Side sets: boundary groupings of cell sides.
//!
//! A side set `s` has an *extent* (number of cell slots it spans, usually the
//! number of cells) and, for each populated `(s, cell)` pair, the list of local
//! side indices of that cell belonging to the set. Storage is a flat ordered
//! map keyed by `(set, cell)` so iteration is always ascending in set, then
//! cell, then list position.

use crate::mesh_error::{MeshDofError, check_index};
use std::collections::BTreeMap;

/// Flat side-set table keyed by `(set, cell)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SideSets {
    extents: Vec<usize>,
    entries: BTreeMap<(usize, usize), Vec<usize>>,
}

impl SideSets {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new, empty side set spanning `extent` cell slots and return
    /// its index.
    pub fn add_set(&mut self, extent: usize) -> usize {
        self.extents.push(extent);
        self.extents.len() - 1
    }

    /// Record `side` for `cell` in `set`. Duplicate sides are kept once.
    pub fn insert(&mut self, set: usize, cell: usize, side: usize) -> Result<(), MeshDofError> {
        check_index("side set", set, self.extents.len())?;
        check_index("side-set cell slot", cell, self.extents[set])?;
        let sides = self.entries.entry((set, cell)).or_default();
        if !sides.contains(&side) {
            sides.push(side);
        }
        Ok(())
    }

    /// Build from the nested `set → cell → sides` layout.
    pub fn from_nested(nested: &[Vec<Vec<usize>>]) -> Self {
        let mut out = SideSets::new();
        for cells in nested {
            let set = out.add_set(cells.len());
            for (cell, sides) in cells.iter().enumerate() {
                if !sides.is_empty() {
                    out.entries.insert((set, cell), sides.clone());
                }
            }
        }
        out
    }

    /// Number of side sets.
    pub fn num_sets(&self) -> usize {
        self.extents.len()
    }

    /// Number of cell slots spanned by `set`.
    pub fn extent(&self, set: usize) -> Result<usize, MeshDofError> {
        check_index("side set", set, self.extents.len())?;
        Ok(self.extents[set])
    }

    /// Sides of `cell` in `set`; empty if the cell has none.
    pub fn sides(&self, set: usize, cell: usize) -> Result<&[usize], MeshDofError> {
        check_index("side set", set, self.extents.len())?;
        check_index("side-set cell slot", cell, self.extents[set])?;
        Ok(self
            .entries
            .get(&(set, cell))
            .map(Vec::as_slice)
            .unwrap_or(&[]))
    }

    /// Populated `(cell, sides)` pairs of `set`, ascending by cell.
    pub fn set_entries(
        &self,
        set: usize,
    ) -> Result<impl Iterator<Item = (usize, &[usize])> + '_, MeshDofError> {
        check_index("side set", set, self.extents.len())?;
        Ok(self
            .entries
            .range((set, 0)..(set + 1, 0))
            .map(|(&(_, cell), sides)| (cell, sides.as_slice())))
    }

    /// All populated `(set, cell, sides)` triples in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &[usize])> + '_ {
        self.entries
            .iter()
            .map(|(&(set, cell), sides)| (set, cell, sides.as_slice()))
    }

    /// Total number of recorded sides across all sets.
    pub fn num_sides(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
