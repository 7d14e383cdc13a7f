//! Entry-point for graph partitioning and reordering.
//!
//! A [`PartitionerConfig`] selects a backend and a part count. Partitioning a
//! [`CsrGraph`] yields a [`Partition`]: one part per vertex plus a permutation
//! that lists the vertices part by part. [`PartitionInterface`] wraps the same
//! request around a sparse matrix and applies the permutation to the matrix
//! and to vectors of matching size.

pub mod error;
pub mod graph_traits;
pub mod metrics;
pub mod permutation;

pub use error::PartitionError;
pub use graph_traits::PartitionableGraph;
pub use permutation::Permutation;

use crate::algs::metis_partition::metis_partition;
use crate::algs::rcm::reverse_cuthill_mckee;
use crate::algs::sparsity::CsrGraph;
use crate::mesh_error::check_index;
use nalgebra::DVector;
use nalgebra_sparse::csr::CsrMatrix;
use std::ops::Range;

pub type PartitionId = usize;

/// Partitioning algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartitionBackend {
    /// Contiguous, balanced index ranges.
    #[default]
    Block,
    /// Reverse Cuthill-McKee ordering split into balanced ranges.
    Rcm,
    /// METIS k-way (feature `metis-support`).
    Metis,
}

impl PartitionBackend {
    pub fn name(self) -> &'static str {
        match self {
            PartitionBackend::Block => "block",
            PartitionBackend::Rcm => "rcm",
            PartitionBackend::Metis => "metis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PartitionerConfig {
    pub backend: PartitionBackend,
    pub n_parts: usize,
}

impl Default for PartitionerConfig {
    fn default() -> Self {
        Self {
            backend: PartitionBackend::Block,
            n_parts: 2,
        }
    }
}

/// Result of a partition request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "PartitionData")]
pub struct Partition {
    parts: Vec<PartitionId>,
    n_parts: usize,
    permutation: Permutation,
}

impl Partition {
    /// Build from a part assignment, ordering vertices part by part and by
    /// `order` within a part.
    fn from_parts(parts: Vec<PartitionId>, n_parts: usize, order: &[usize]) -> Self {
        let mut perm = order.to_vec();
        perm.sort_by_key(|&v| parts[v]);
        Self {
            parts,
            n_parts,
            permutation: Permutation::from_vec_unchecked(perm),
        }
    }

    /// Part of every vertex.
    pub fn parts(&self) -> &[PartitionId] {
        &self.parts
    }

    pub fn n_parts(&self) -> usize {
        self.n_parts
    }

    pub fn num_vertices(&self) -> usize {
        self.parts.len()
    }

    pub fn part_of(&self, v: usize) -> Result<PartitionId, PartitionError> {
        check_index("vertex", v, self.parts.len())?;
        Ok(self.parts[v])
    }

    /// New-to-old vertex permutation grouping vertices by part.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    pub fn part_sizes(&self) -> Vec<usize> {
        metrics::part_sizes(&self.parts, self.n_parts)
    }

    /// Range of new indices occupied by each part after reordering.
    pub fn part_ranges(&self) -> Vec<Range<usize>> {
        let mut start = 0;
        self.part_sizes()
            .into_iter()
            .map(|s| {
                let r = start..start + s;
                start += s;
                r
            })
            .collect()
    }
}

/// Serialized form of a [`Partition`], checked on the way in.
#[derive(serde::Deserialize)]
struct PartitionData {
    parts: Vec<PartitionId>,
    n_parts: usize,
    permutation: Permutation,
}

impl TryFrom<PartitionData> for Partition {
    type Error = PartitionError;

    fn try_from(data: PartitionData) -> Result<Self, Self::Error> {
        let PartitionData {
            parts,
            n_parts,
            permutation,
        } = data;
        if permutation.len() != parts.len() {
            return Err(PartitionError::DimensionMismatch {
                expected: parts.len(),
                found: permutation.len(),
            });
        }
        if let Some(&p) = parts.iter().find(|&&p| p >= n_parts) {
            return Err(PartitionError::InvalidRequest(format!(
                "part {p} outside 0..{n_parts}"
            )));
        }
        let grouped = permutation
            .perm()
            .windows(2)
            .all(|w| parts[w[0]] <= parts[w[1]]);
        if !grouped {
            return Err(PartitionError::InvalidRequest(
                "permutation does not list vertices part by part".into(),
            ));
        }
        Ok(Self {
            parts,
            n_parts,
            permutation,
        })
    }
}

/// Balanced contiguous split: position `i` of `n` goes to part `i * n_parts / n`.
fn block_part(i: usize, n: usize, n_parts: usize) -> PartitionId {
    i * n_parts / n
}

/// Partition `graph` according to `cfg`.
///
/// # Errors
/// - [`PartitionError::InvalidRequest`] if `cfg.n_parts == 0`.
/// - [`PartitionError::BackendUnavailable`] if the backend is not compiled in.
/// - [`PartitionError::Backend`] if the backend fails.
pub fn partition_graph(graph: &CsrGraph, cfg: &PartitionerConfig) -> Result<Partition, PartitionError> {
    let n = graph.num_vertices();
    let n_parts = cfg.n_parts;
    if n_parts == 0 {
        return Err(PartitionError::InvalidRequest("n_parts must be positive".into()));
    }
    if n_parts > n {
        log::warn!("{n_parts} parts requested for {n} vertices; some parts will be empty");
    }
    let partition = match cfg.backend {
        PartitionBackend::Block => {
            let parts = (0..n).map(|v| block_part(v, n, n_parts)).collect();
            Partition {
                parts,
                n_parts,
                permutation: Permutation::identity(n),
            }
        }
        PartitionBackend::Rcm => {
            let order = reverse_cuthill_mckee(graph);
            let mut parts = vec![0; n];
            for (new, &old) in order.perm().iter().enumerate() {
                parts[old] = block_part(new, n, n_parts);
            }
            Partition {
                parts,
                n_parts,
                permutation: order,
            }
        }
        PartitionBackend::Metis => {
            let parts = metis_partition(graph, n_parts)?;
            let order: Vec<usize> = (0..n).collect();
            Partition::from_parts(parts, n_parts, &order)
        }
    };
    log::info!(
        "{} partition: {n} vertices into {n_parts} parts, edge cut {}, imbalance {:.3}",
        cfg.backend.name(),
        metrics::edge_cut(graph, &partition.parts),
        metrics::imbalance(&partition.parts, n_parts)
    );
    Ok(partition)
}

/// Partition-and-reorder front end for a square sparse matrix.
///
/// The matrix graph (off-diagonal structure, symmetrised) is partitioned on
/// [`PartitionInterface::partition`]; afterwards the matrix and vectors of the
/// same size can be reordered so each part occupies a contiguous index range.
#[derive(Debug, Clone)]
pub struct PartitionInterface {
    matrix: CsrMatrix<f64>,
    config: PartitionerConfig,
    partition: Option<Partition>,
}

impl PartitionInterface {
    pub fn new(matrix: CsrMatrix<f64>, config: PartitionerConfig) -> Result<Self, PartitionError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(PartitionError::DimensionMismatch {
                expected: matrix.nrows(),
                found: matrix.ncols(),
            });
        }
        Ok(Self {
            matrix,
            config,
            partition: None,
        })
    }

    pub fn matrix(&self) -> &CsrMatrix<f64> {
        &self.matrix
    }

    pub fn config(&self) -> &PartitionerConfig {
        &self.config
    }

    /// Compute (or recompute) the partition of the matrix graph.
    pub fn partition(&mut self) -> Result<&Partition, PartitionError> {
        let graph = CsrGraph::from_pattern(self.matrix.pattern())?;
        let partition = partition_graph(&graph, &self.config)?;
        Ok(self.partition.insert(partition))
    }

    /// The computed partition, if any.
    pub fn partition_result(&self) -> Option<&Partition> {
        self.partition.as_ref()
    }

    fn permutation(&self) -> Result<&Permutation, PartitionError> {
        self.partition
            .as_ref()
            .map(Partition::permutation)
            .ok_or(PartitionError::NotPartitioned)
    }

    /// The matrix with rows and columns permuted part by part.
    pub fn reorder_matrix(&self) -> Result<CsrMatrix<f64>, PartitionError> {
        Ok(self.permutation()?.apply_to_csr(&self.matrix)?)
    }

    /// `x` permuted into the partitioned ordering.
    pub fn reorder_vector(&self, x: &DVector<f64>) -> Result<DVector<f64>, PartitionError> {
        let perm = self.permutation()?;
        self.check_len(x)?;
        Ok(perm.apply_to_vector(x)?)
    }

    /// Inverse of [`PartitionInterface::reorder_vector`].
    pub fn restore_vector(&self, x: &DVector<f64>) -> Result<DVector<f64>, PartitionError> {
        let perm = self.permutation()?;
        self.check_len(x)?;
        Ok(perm.inverse().apply_to_vector(x)?)
    }

    fn check_len(&self, x: &DVector<f64>) -> Result<(), PartitionError> {
        if x.len() != self.matrix.nrows() {
            return Err(PartitionError::DimensionMismatch {
                expected: self.matrix.nrows(),
                found: x.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh_error::MeshDofError;

    fn path(n: usize) -> CsrGraph {
        CsrGraph::from_adjacency(
            (0..n)
                .map(|i| [i.checked_sub(1), (i + 1 < n).then_some(i + 1)].into_iter().flatten().collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn block_split_is_balanced() {
        let p = partition_graph(&path(7), &PartitionerConfig::default()).unwrap();
        assert_eq!(p.parts(), &[0, 0, 0, 0, 1, 1, 1]);
        assert_eq!(p.part_ranges(), vec![0..4, 4..7]);
        assert_eq!(p.permutation(), &Permutation::identity(7));
    }

    #[test]
    fn rcm_parts_are_contiguous_in_new_order() {
        let cfg = PartitionerConfig {
            backend: PartitionBackend::Rcm,
            n_parts: 3,
        };
        let p = partition_graph(&path(9), &cfg).unwrap();
        let new_parts: Vec<_> = p.permutation().perm().iter().map(|&v| p.parts()[v]).collect();
        assert!(new_parts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(p.part_sizes(), vec![3, 3, 3]);
    }

    #[test]
    fn zero_parts_rejected() {
        let cfg = PartitionerConfig {
            n_parts: 0,
            ..Default::default()
        };
        assert!(matches!(
            partition_graph(&path(3), &cfg),
            Err(PartitionError::InvalidRequest(_))
        ));
    }

    #[test]
    fn metis_from_parts_groups_by_part() {
        let p = Partition::from_parts(vec![1, 0, 1, 0], 2, &[0, 1, 2, 3]);
        assert_eq!(p.permutation().perm(), &[1, 3, 0, 2]);
        assert_eq!(p.part_of(2).unwrap(), 1);
        assert!(p.part_of(4).is_err());
    }

    #[test]
    fn malformed_csr_never_reaches_a_backend() {
        let partition_csr = |xadj, adjncy, cfg: &PartitionerConfig| -> Result<Partition, PartitionError> {
            let graph = CsrGraph::try_from_csr(xadj, adjncy, vec![1])?;
            partition_graph(&graph, cfg)
        };
        for backend in [PartitionBackend::Block, PartitionBackend::Rcm] {
            let cfg = PartitionerConfig { backend, n_parts: 1 };
            assert!(matches!(
                partition_csr(vec![0, 1], vec![5], &cfg),
                Err(PartitionError::Mesh(MeshDofError::InvalidGeometry(_)))
            ));
            assert_eq!(partition_csr(vec![0, 0], vec![], &cfg).unwrap().parts(), &[0]);
        }
    }

    #[test]
    fn deserialized_partition_is_checked() {
        let cfg = PartitionerConfig {
            backend: PartitionBackend::Rcm,
            n_parts: 2,
        };
        let p = partition_graph(&path(5), &cfg).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(serde_json::from_str::<Partition>(&json).unwrap(), p);

        let bad_part = r#"{"parts":[0,3],"n_parts":2,"permutation":[0,1]}"#;
        assert!(serde_json::from_str::<Partition>(bad_part).is_err());
        let short_perm = r#"{"parts":[0,1],"n_parts":2,"permutation":[0]}"#;
        assert!(serde_json::from_str::<Partition>(short_perm).is_err());
        let ungrouped = r#"{"parts":[1,0],"n_parts":2,"permutation":[0,1]}"#;
        assert!(serde_json::from_str::<Partition>(ungrouped).is_err());
    }
}
