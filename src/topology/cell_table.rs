//! Fixed-arity row tables.
//!
//! `CellTable` stores `num_rows × arity` entries in one flat buffer. It backs
//! the cell→node/edge/face incidence maps as well as the per-cell DOF tables
//! produced by the DOF manager.

use crate::mesh_error::{MeshDofError, check_index};
use std::fmt;

/// Flat, row-major table with a fixed number of entries per row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CellTable<T> {
    arity: usize,
    num_rows: usize,
    data: Vec<T>,
}

impl<T> CellTable<T> {
    /// Wrap a flat buffer whose length must be a multiple of `arity`.
    ///
    /// A zero arity is allowed only with an empty buffer; such a table has no
    /// rows (see [`CellTable::with_empty_rows`]).
    pub fn from_flat(arity: usize, data: Vec<T>) -> Result<Self, MeshDofError> {
        let ragged = if arity == 0 {
            !data.is_empty()
        } else {
            data.len() % arity != 0
        };
        if ragged {
            return Err(MeshDofError::InvalidGeometry(format!(
                "flat table of length {} is not divisible into rows of {arity}",
                data.len()
            )));
        }
        let num_rows = if arity == 0 { 0 } else { data.len() / arity };
        Ok(Self {
            arity,
            num_rows,
            data,
        })
    }

    /// A zero-arity table with `num_rows` empty rows.
    pub fn with_empty_rows(num_rows: usize) -> Self {
        Self {
            arity: 0,
            num_rows,
            data: Vec::new(),
        }
    }

    /// Entries per row.
    #[inline]
    pub fn arity(&self) -> usize {
        self.arity
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// Row `row`, or [`MeshDofError::IndexOutOfRange`].
    pub fn row(&self, row: usize) -> Result<&[T], MeshDofError> {
        check_index("row", row, self.num_rows())?;
        Ok(self.row_unchecked(row))
    }

    /// Row accessor for callers that already validated `row`.
    #[inline]
    pub(crate) fn row_unchecked(&self, row: usize) -> &[T] {
        &self.data[row * self.arity..(row + 1) * self.arity]
    }

    /// Entry `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Result<&T, MeshDofError> {
        let r = self.row(row)?;
        check_index("column", col, self.arity)?;
        Ok(&r[col])
    }

    /// Iterate over rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.num_rows).map(move |r| self.row_unchecked(r))
    }

    /// The underlying row-major buffer.
    pub fn as_flat(&self) -> &[T] {
        &self.data
    }
}

impl<T: Clone> CellTable<T> {
    /// Build from nested rows, all of which must have length `arity`.
    pub fn from_rows<R>(arity: usize, rows: impl IntoIterator<Item = R>) -> Result<Self, MeshDofError>
    where
        R: AsRef<[T]>,
    {
        let mut data = Vec::new();
        let mut num_rows = 0;
        for (i, r) in rows.into_iter().enumerate() {
            let r = r.as_ref();
            if r.len() != arity {
                return Err(MeshDofError::InvalidGeometry(format!(
                    "row {i} has {} entries, expected {arity}",
                    r.len()
                )));
            }
            data.extend_from_slice(r);
            num_rows += 1;
        }
        Ok(Self {
            arity,
            num_rows,
            data,
        })
    }
}

impl<T: fmt::Display> fmt::Display for CellTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            write!(f, "{i:>6}:")?;
            for v in row {
                write!(f, " {v}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
