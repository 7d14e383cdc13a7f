//! Reverse Cuthill-McKee (RCM) reordering of a CSR graph.
//!
//! Each connected component is ordered breadth-first from a pseudo-peripheral
//! root (George-Liu level-structure heuristic). Every BFS level is sorted by
//! `(parent label, degree, vertex)`, so the result is deterministic. The final
//! ordering is reversed.

use crate::algs::sparsity::CsrGraph;
use crate::mesh_error::MeshDofError;
use crate::partitioning::permutation::Permutation;

/// RCM permutation of `graph`: `perm[new] = old`.
pub fn reverse_cuthill_mckee(graph: &CsrGraph) -> Permutation {
    let mut order = cuthill_mckee_order(graph);
    order.reverse();
    permutation_from_order(order)
}

/// Cuthill-McKee permutation (not reversed).
pub fn cuthill_mckee(graph: &CsrGraph) -> Permutation {
    permutation_from_order(cuthill_mckee_order(graph))
}

// Every vertex is labelled exactly once.
fn permutation_from_order(order: Vec<usize>) -> Permutation {
    Permutation::from_vec_unchecked(order)
}

fn cuthill_mckee_order(graph: &CsrGraph) -> Vec<usize> {
    let n = graph.num_vertices();
    // label[v] = position of v in the ordering, None while unvisited
    let mut label: Vec<Option<usize>> = vec![None; n];
    let mut order = Vec::with_capacity(n);
    let mut scratch = vec![false; n];

    // Components are started in order of their minimum-degree unvisited vertex.
    let mut by_degree: Vec<usize> = (0..n).collect();
    by_degree.sort_by_key(|&v| (graph.degree_unchecked(v), v));

    for &seed in &by_degree {
        if label[seed].is_some() {
            continue;
        }
        let root = find_pseudo_peripheral_root(graph, seed, &mut scratch);
        label[root] = Some(order.len());
        order.push(root);
        let mut frontier = vec![root];
        while !frontier.is_empty() {
            // (parent label, degree, v) for all unvisited neighbours
            let mut next: Vec<(usize, usize, usize)> = Vec::new();
            for &u in &frontier {
                let lu = label[u].unwrap_or(usize::MAX);
                for &v in graph.neighbors_unchecked(u) {
                    if label[v].is_none() {
                        label[v] = Some(usize::MAX);
                        next.push((lu, graph.degree_unchecked(v), v));
                    }
                }
            }
            next.sort_unstable();
            frontier = next.into_iter().map(|(_, _, v)| v).collect();
            for &v in &frontier {
                label[v] = Some(order.len());
                order.push(v);
            }
        }
    }
    order
}

/// BFS level structure rooted at `root`; `visited` is scratch space of
/// length `n`, left cleared on return.
fn level_structure(graph: &CsrGraph, root: usize, visited: &mut [bool]) -> Vec<Vec<usize>> {
    let mut levels = vec![vec![root]];
    visited[root] = true;
    loop {
        let mut next = Vec::new();
        if let Some(last) = levels.last() {
            for &u in last {
                for &v in graph.neighbors_unchecked(u) {
                    if !visited[v] {
                        visited[v] = true;
                        next.push(v);
                    }
                }
            }
        }
        if next.is_empty() {
            break;
        }
        levels.push(next);
    }
    for &v in levels.iter().flatten() {
        visited[v] = false;
    }
    levels
}

/// Find a pseudo-peripheral vertex in the component of `start`.
///
/// Repeatedly re-roots at the minimum-degree vertex of the deepest level
/// until the eccentricity stops growing.
pub(crate) fn find_pseudo_peripheral_root(graph: &CsrGraph, start: usize, scratch: &mut [bool]) -> usize {
    let mut r = start;
    let mut last_depth = 0;
    loop {
        let levels = level_structure(graph, r, scratch);
        let depth = levels.len();
        if depth <= last_depth {
            return r;
        }
        last_depth = depth;
        let r_prime = levels
            .last()
            .and_then(|l| l.iter().copied().min_by_key(|&v| (graph.degree_unchecked(v), v)))
            .unwrap_or(r);
        if r_prime == r {
            return r;
        }
        r = r_prime;
    }
}

/// Bandwidth `max |i - j|` over edges after applying `perm`.
///
/// # Errors
/// [`MeshDofError::InvalidPermutation`] if `perm` does not have one entry per vertex.
pub fn bandwidth(graph: &CsrGraph, perm: &Permutation) -> Result<usize, MeshDofError> {
    if perm.len() != graph.num_vertices() {
        return Err(MeshDofError::InvalidPermutation(format!(
            "permutation of length {} for {} vertices",
            perm.len(),
            graph.num_vertices()
        )));
    }
    let new_of = perm.inverse();
    let new_of = new_of.perm();
    Ok((0..graph.num_vertices())
        .flat_map(|u| {
            graph
                .neighbors_unchecked(u)
                .iter()
                .map(move |&v| new_of[u].abs_diff(new_of[v]))
        })
        .max()
        .unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_graph(n: usize) -> CsrGraph {
        let adj = (0..n)
            .map(|i| {
                let mut nbrs = Vec::new();
                if i > 0 {
                    nbrs.push(i - 1);
                }
                if i + 1 < n {
                    nbrs.push(i + 1);
                }
                nbrs
            })
            .collect();
        CsrGraph::from_adjacency(adj).unwrap()
    }

    #[test]
    fn test_rcm_line_graph() {
        let g = line_graph(5);
        let p = reverse_cuthill_mckee(&g);
        // CM starts at the far end found from vertex 0, so the reversal is the identity
        assert_eq!(p.perm(), &[0, 1, 2, 3, 4]);
        assert_eq!(bandwidth(&g, &p).unwrap(), 1);
        assert!(bandwidth(&g, &Permutation::identity(4)).is_err());
    }

    #[test]
    fn test_rcm_empty_graph() {
        let p = reverse_cuthill_mckee(&CsrGraph::from_adjacency(Vec::new()).unwrap());
        assert!(p.is_empty());
    }

    #[test]
    fn test_find_pseudo_peripheral_root() {
        let g = line_graph(7);
        let mut scratch = vec![false; 7];
        let r = find_pseudo_peripheral_root(&g, 3, &mut scratch);
        assert!(r == 0 || r == 6);
        assert!(scratch.iter().all(|&v| !v));
    }

    #[test]
    fn test_rcm_star_graph() {
        // center 0 connected to 1..=4
        let mut adj = vec![vec![1, 2, 3, 4]];
        adj.extend((1..=4).map(|_| vec![0]));
        let g = CsrGraph::from_adjacency(adj).unwrap();
        let p = reverse_cuthill_mckee(&g);
        assert_eq!(p.len(), 5);
        let mut seen = p.perm().to_vec();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn scrambled_line_recovers_bandwidth_one() {
        // path 0-3-1-4-2
        let adj = vec![vec![3], vec![3, 4], vec![4], vec![0, 1], vec![1, 2]];
        let g = CsrGraph::from_adjacency(adj).unwrap();
        assert_eq!(bandwidth(&g, &Permutation::identity(5)).unwrap(), 3);
        assert_eq!(bandwidth(&g, &reverse_cuthill_mckee(&g)).unwrap(), 1);
    }

    #[test]
    fn disconnected_components_are_all_ordered() {
        let adj = vec![vec![1], vec![0], vec![], vec![4], vec![3]];
        let p = cuthill_mckee(&CsrGraph::from_adjacency(adj).unwrap());
        // isolated vertex 2 has minimum degree and starts
        assert_eq!(p.perm()[0], 2);
        assert_eq!(p.len(), 5);
    }
}
