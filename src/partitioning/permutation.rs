//! Index permutations and their action on vectors and sparse matrices.

use crate::mesh_error::{MeshDofError, check_index};
use nalgebra::{DVector, Scalar};
use nalgebra_sparse::csr::CsrMatrix;

/// A validated permutation of `0..n`.
///
/// The permutation stores, for each *new* index `i`, the *old* index it takes
/// its value from:
///
/// ```text
/// target[i] = source[perm[i]]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Permutation {
    perm: Vec<usize>,
}

impl Permutation {
    /// Validate a new-to-old map.
    pub fn from_vec(perm: Vec<usize>) -> Result<Self, MeshDofError> {
        let mut visited = vec![false; perm.len()];
        for &index in &perm {
            if index >= perm.len() {
                return Err(MeshDofError::InvalidPermutation(format!(
                    "index {index} outside 0..{}",
                    perm.len()
                )));
            }
            if std::mem::replace(&mut visited[index], true) {
                return Err(MeshDofError::InvalidPermutation(format!(
                    "index {index} appears twice"
                )));
            }
        }
        Ok(Self { perm })
    }

    pub(crate) fn from_vec_unchecked(perm: Vec<usize>) -> Self {
        debug_assert!(Self::from_vec(perm.clone()).is_ok());
        Self { perm }
    }

    pub fn identity(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.perm.len()
    }

    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// New-to-old map.
    pub fn perm(&self) -> &[usize] {
        &self.perm
    }

    pub fn reverse(&mut self) {
        self.perm.reverse()
    }

    /// Old index of new position `target_index`.
    pub fn source_index(&self, target_index: usize) -> Result<usize, MeshDofError> {
        check_index("permutation target", target_index, self.len())?;
        Ok(self.perm[target_index])
    }

    /// The old-to-new map as a permutation.
    pub fn inverse(&self) -> Permutation {
        let mut inverse_perm = vec![0; self.len()];
        for (target_idx, &source_idx) in self.perm.iter().enumerate() {
            inverse_perm[source_idx] = target_idx;
        }
        Self { perm: inverse_perm }
    }

    fn check_len(&self, what: &'static str, len: usize) -> Result<(), MeshDofError> {
        if len != self.len() {
            return Err(MeshDofError::InvalidPermutation(format!(
                "{what} of length {len} for a permutation of length {}",
                self.len()
            )));
        }
        Ok(())
    }

    pub fn apply_to_slice<T: Clone>(&self, slice: &[T]) -> Result<Vec<T>, MeshDofError> {
        self.check_len("slice", slice.len())?;
        Ok(self.perm.iter().map(|&source_idx| slice[source_idx].clone()).collect())
    }

    pub fn apply_to_vector<T: Scalar>(&self, v: &DVector<T>) -> Result<DVector<T>, MeshDofError> {
        self.check_len("vector", v.len())?;
        Ok(DVector::from_iterator(
            self.len(),
            self.perm.iter().map(|&source_idx| v[source_idx].clone()),
        ))
    }

    /// Symmetric permutation `B = P A Pᵀ`, i.e. `B[i, j] = A[perm[i], perm[j]]`.
    pub fn apply_to_csr<T: Scalar>(&self, a: &CsrMatrix<T>) -> Result<CsrMatrix<T>, MeshDofError> {
        self.check_len("matrix rows", a.nrows())?;
        self.check_len("matrix columns", a.ncols())?;
        let inverse = self.inverse();
        let mut offsets = Vec::with_capacity(self.len() + 1);
        let mut indices = Vec::with_capacity(a.nnz());
        let mut values = Vec::with_capacity(a.nnz());
        let mut row_buf: Vec<(usize, T)> = Vec::new();
        offsets.push(0);
        for &old_row in &self.perm {
            let row = a.row(old_row);
            row_buf.clear();
            row_buf.extend(
                row.col_indices()
                    .iter()
                    .zip(row.values())
                    .map(|(&c, v)| (inverse.perm[c], v.clone())),
            );
            row_buf.sort_unstable_by_key(|&(c, _)| c);
            for (c, v) in row_buf.drain(..) {
                indices.push(c);
                values.push(v);
            }
            offsets.push(indices.len());
        }
        CsrMatrix::try_from_csr_data(a.nrows(), a.ncols(), offsets, indices, values)
            .map_err(|e| MeshDofError::InvariantViolation(format!("permuted matrix: {e}")))
    }
}

impl TryFrom<Vec<usize>> for Permutation {
    type Error = MeshDofError;

    fn try_from(perm: Vec<usize>) -> Result<Self, Self::Error> {
        Self::from_vec(perm)
    }
}

impl From<Permutation> for Vec<usize> {
    fn from(p: Permutation) -> Self {
        p.perm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;
    use nalgebra_sparse::coo::CooMatrix;

    #[test]
    fn rejects_invalid() {
        assert!(Permutation::from_vec(vec![0, 0, 1]).is_err());
        assert!(Permutation::from_vec(vec![0, 3, 1]).is_err());
        assert!(Permutation::from_vec(vec![]).unwrap().is_empty());
    }

    #[test]
    fn inverse_and_slice() {
        let p = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        assert_eq!(p.apply_to_slice(&['a', 'b', 'c']).unwrap(), vec!['c', 'a', 'b']);
        assert_eq!(p.inverse().perm(), &[1, 2, 0]);
        assert!(p.apply_to_slice(&[1, 2]).is_err());
        assert_eq!(p.source_index(0).unwrap(), 2);
        assert!(p.source_index(3).is_err());
    }

    #[test]
    fn deserialization_validates() {
        let p = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[2,0,1]");
        assert_eq!(serde_json::from_str::<Permutation>(&json).unwrap(), p);
        assert!(serde_json::from_str::<Permutation>("[0,0,5]").is_err());
    }

    #[test]
    fn csr_matches_dense() {
        let mut coo = CooMatrix::new(3, 3);
        coo.push(0, 0, 1.0);
        coo.push(0, 2, 2.0);
        coo.push(1, 1, 3.0);
        coo.push(2, 0, 4.0);
        coo.push(2, 2, 5.0);
        let a = CsrMatrix::from(&coo);
        let p = Permutation::from_vec(vec![2, 0, 1]).unwrap();
        let b = DMatrix::from(&p.apply_to_csr(&a).unwrap());
        let dense = DMatrix::from(&a);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(b[(i, j)], dense[(p.perm()[i], p.perm()[j])]);
            }
        }
    }
}
