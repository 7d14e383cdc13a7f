//! Partitioning metrics utilities.
//!
//! Functions for evaluating the quality of a part assignment: edge cut, part
//! sizes and load imbalance. Intended for logging, testing and CI validation.

use super::PartitionId;
use super::graph_traits::PartitionableGraph;
use rayon::iter::ParallelIterator;

/// Computes the edge cut of a partitioning (O(E)).
///
/// The edge cut is the number of undirected edges whose endpoints lie in
/// different parts. `parts[v]` is the part of vertex `v`.
pub fn edge_cut<G>(g: &G, parts: &[PartitionId]) -> usize
where
    G: PartitionableGraph<VertexId = usize>,
{
    g.edges().filter(|&(u, v)| parts[u] != parts[v]).count()
}

/// Number of vertices in each of `n_parts` parts.
pub fn part_sizes(parts: &[PartitionId], n_parts: usize) -> Vec<usize> {
    let mut sizes = vec![0; n_parts];
    for &p in parts {
        if let Some(s) = sizes.get_mut(p) {
            *s += 1;
        }
    }
    sizes
}

/// Largest part size over the average part size; 1.0 is perfectly balanced.
pub fn imbalance(parts: &[PartitionId], n_parts: usize) -> f64 {
    if parts.is_empty() || n_parts == 0 {
        return 1.0;
    }
    let max = part_sizes(parts, n_parts).into_iter().max().unwrap_or(0);
    max as f64 * n_parts as f64 / parts.len() as f64
}
