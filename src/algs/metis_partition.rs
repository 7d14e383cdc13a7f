//! k-way graph partitioning through METIS.
//!
//! Available with the `metis-support` feature. Without it the request fails
//! with [`PartitionError::BackendUnavailable`] instead of panicking, so callers
//! can fall back to another backend.

use crate::algs::sparsity::CsrGraph;
use crate::partitioning::PartitionId;
use crate::partitioning::error::PartitionError;

/// Partition `graph` into `n_parts` parts with METIS k-way.
///
/// Returns `part[v]` for every vertex. Vertices are unit-weighted.
#[cfg(feature = "metis-support")]
pub fn metis_partition(graph: &CsrGraph, n_parts: usize) -> Result<Vec<PartitionId>, PartitionError> {
    use metis::Idx;

    let to_idx = |x: usize| {
        Idx::try_from(x).map_err(|_| PartitionError::InvalidRequest(format!("{x} exceeds the METIS index range")))
    };
    let n = graph.num_vertices();
    if n == 0 {
        return Ok(Vec::new());
    }
    let xadj: Vec<Idx> = graph.xadj().iter().map(|&u| to_idx(u)).collect::<Result<_, _>>()?;
    let adjncy: Vec<Idx> = graph.adjncy().iter().map(|&v| to_idx(v)).collect::<Result<_, _>>()?;
    let mut part: Vec<Idx> = vec![0; n];

    let backend = |e: metis::Error| PartitionError::Backend(format!("METIS failed: {e:?}"));
    let objval = metis::Graph::new(1, to_idx(n_parts)?, &xadj, &adjncy)
        .map_err(|e| PartitionError::Backend(format!("METIS rejected the graph: {e:?}")))?
        .part_kway(&mut part)
        .map_err(backend)?;
    log::debug!("METIS k-way: {n} vertices into {n_parts} parts, edge cut {objval}");

    part.into_iter()
        .map(|p| {
            usize::try_from(p).map_err(|_| PartitionError::Backend(format!("METIS returned part {p}")))
        })
        .collect()
}

/// Fallback when METIS is not compiled in.
#[cfg(not(feature = "metis-support"))]
pub fn metis_partition(_graph: &CsrGraph, _n_parts: usize) -> Result<Vec<PartitionId>, PartitionError> {
    Err(PartitionError::BackendUnavailable("metis"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "metis-support"))]
    #[test]
    fn unavailable_without_feature() {
        let g = CsrGraph::from_adjacency(vec![vec![1], vec![0]]).unwrap();
        assert_eq!(metis_partition(&g, 2), Err(PartitionError::BackendUnavailable("metis")));
    }

    #[cfg(feature = "metis-support")]
    #[test]
    fn two_cliques_split_cleanly() {
        // two triangles joined by the edge 2-3
        let g = CsrGraph::from_adjacency(vec![
            vec![1, 2],
            vec![0, 2],
            vec![0, 1, 3],
            vec![2, 4, 5],
            vec![3, 5],
            vec![3, 4],
        ])
        .unwrap();
        let part = metis_partition(&g, 2).unwrap();
        assert_eq!(part.len(), 6);
        assert!(part.iter().all(|&p| p < 2));
        assert_eq!(crate::partitioning::metrics::edge_cut(&g, &part), 1);
    }
}
