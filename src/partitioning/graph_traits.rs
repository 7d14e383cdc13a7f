// Graph trait abstraction for partitioning
use crate::algs::sparsity::CsrGraph;
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};
use std::hash::Hash;

/// Trait for graphs that can be partitioned in parallel.
//
/// All methods are read-only, thread-safe, and require no interior mutability.
/// Implementors must guarantee that all returned iterators are safe for concurrent use and do not mutate the graph.
pub trait PartitionableGraph: Sync {
    /// Vertex identifier type (must be copyable, hashable, and thread-safe).
    type VertexId: Copy + Hash + Eq + Send + Sync;
    /// Parallel iterator over all vertices.
    type VertexParIter<'a>: IndexedParallelIterator<Item = Self::VertexId> + 'a
    where
        Self: 'a;
    /// Parallel iterator over neighbors.
    type NeighParIter<'a>: ParallelIterator<Item = Self::VertexId> + 'a
    where
        Self: 'a;

    /// Returns a parallel, indexable iterator over all vertices.
    fn vertices(&self) -> Self::VertexParIter<'_>;

    /// Returns a parallel iterator over neighbours of `v`.
    fn neighbors(&self, v: Self::VertexId) -> Self::NeighParIter<'_>;

    /// Degree of a vertex (number of neighbors).
    fn degree(&self, v: Self::VertexId) -> usize;

    /// Returns a parallel iterator over all undirected edges (u, v) with u < v.
    fn edges(&self) -> impl ParallelIterator<Item = (Self::VertexId, Self::VertexId)> + '_
    where
        Self::VertexId: PartialOrd,
    {
        self.vertices().flat_map_iter(move |u| {
            self.neighbors(u)
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
                .collect::<Vec<_>>()
                .into_iter()
        })
    }
}

impl PartitionableGraph for CsrGraph {
    type VertexId = usize;
    type VertexParIter<'a> = rayon::range::Iter<usize>;
    type NeighParIter<'a> = rayon::iter::Copied<rayon::slice::Iter<'a, usize>>;

    fn vertices(&self) -> Self::VertexParIter<'_> {
        (0..self.num_vertices()).into_par_iter()
    }

    fn neighbors(&self, v: usize) -> Self::NeighParIter<'_> {
        self.neighbors_unchecked(v).par_iter().copied()
    }

    fn degree(&self, v: usize) -> usize {
        self.degree_unchecked(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertices_and_neighbors_cycle() {
        // 5-node cycle: 0-1-2-3-4-0
        let g = CsrGraph::from_adjacency(vec![vec![1, 4], vec![0, 2], vec![1, 3], vec![2, 4], vec![3, 0]]).unwrap();
        let vs: Vec<_> = g.vertices().collect();
        assert_eq!(vs, vec![0, 1, 2, 3, 4]);
        let ns: Vec<_> = PartitionableGraph::neighbors(&g, 0).collect();
        assert_eq!(ns, vec![1, 4]);
        assert_eq!(PartitionableGraph::degree(&g, 3), 2);
    }

    #[test]
    fn test_edges_path() {
        // 4-node path: 0-1-2-3
        let g = CsrGraph::from_adjacency(vec![vec![1], vec![0, 2], vec![1, 3], vec![2]]).unwrap();
        let mut edges: Vec<_> = g.edges().collect();
        edges.sort();
        assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3)]);
    }
}
