//! Sparse coupling graphs derived from a [`DofManager`].
//
// Two graphs are built from the flattened cell DOF table:
//
// * the *DOF graph*: one vertex per DOF, an undirected edge between any two
//   DOFs that appear in a common cell (the off-diagonal pattern of an
//   assembled operator);
// * the *cell graph*: one vertex per cell, an edge between any two cells that
//   share at least one DOF (the dual graph seen through the DOF numbering).
//
// Both are returned as METIS-ready CSR triples:
//
// * `xadj[i] .. xadj[i+1]`   = neighbour list of vertex *i*, ascending
// * `adjncy`                 = concatenated neighbour vertices
// * `vwgt[i]`                = vertex weight, default = 1
//
// and are symmetric and self-free.

use crate::data::dof_manager::DofManager;
use crate::mesh_error::{MeshDofError, check_index};
use hashbrown::HashMap;
use itertools::Itertools;
use nalgebra_sparse::csr::CsrMatrix;
use nalgebra_sparse::pattern::SparsityPattern;
use rayon::prelude::*;

/// CSR triple; symmetric, self-free, neighbour lists ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrGraph {
    xadj: Vec<usize>,
    adjncy: Vec<usize>,
    vwgt: Vec<i32>,
}

impl CsrGraph {
    /// Wrap caller-built CSR arrays after checking them.
    ///
    /// # Errors
    /// [`MeshDofError::InvalidGeometry`] unless `xadj` starts at 0, is
    /// non-decreasing and ends at `adjncy.len()`, `vwgt` has one weight per
    /// vertex, and every neighbour list is strictly ascending, in range,
    /// free of self loops and mirrored by its neighbours.
    pub fn try_from_csr(xadj: Vec<usize>, adjncy: Vec<usize>, vwgt: Vec<i32>) -> Result<Self, MeshDofError> {
        let bad = |msg: String| Err(MeshDofError::InvalidGeometry(format!("CSR graph: {msg}")));
        if xadj.first() != Some(&0) {
            return bad("xadj must start with 0".into());
        }
        if xadj.last() != Some(&adjncy.len()) {
            return bad(format!("xadj ends at {:?}, adjncy has {} entries", xadj.last(), adjncy.len()));
        }
        if let Some(w) = xadj.windows(2).position(|w| w[0] > w[1]) {
            return bad(format!("xadj decreases after vertex {w}"));
        }
        let n = xadj.len() - 1;
        if vwgt.len() != n {
            return bad(format!("{} vertex weights for {n} vertices", vwgt.len()));
        }
        let graph = Self { xadj, adjncy, vwgt };
        for v in 0..n {
            let nbrs = graph.neighbors_unchecked(v);
            if let Some(&u) = nbrs.iter().find(|&&u| u >= n || u == v) {
                return bad(format!("vertex {v} has neighbour {u} (self loop or out of 0..{n})"));
            }
            if nbrs.windows(2).any(|w| w[0] >= w[1]) {
                return bad(format!("neighbours of vertex {v} are not strictly ascending"));
            }
        }
        for v in 0..n {
            for &u in graph.neighbors_unchecked(v) {
                if graph.neighbors_unchecked(u).binary_search(&v).is_err() {
                    return bad(format!("edge {v}-{u} has no mirror {u}-{v}"));
                }
            }
        }
        Ok(graph)
    }

    /// Assemble from per-vertex neighbour lists.
    ///
    /// One-sided edges are mirrored; lists are sorted, deduplicated and
    /// stripped of self loops.
    ///
    /// # Errors
    /// [`MeshDofError::InvalidGeometry`] if a neighbour is not a vertex.
    pub fn from_adjacency(mut adj: Vec<Vec<usize>>) -> Result<Self, MeshDofError> {
        let n = adj.len();
        let mut mirrored = Vec::new();
        for (v, nbrs) in adj.iter().enumerate() {
            for &u in nbrs {
                if u >= n {
                    return Err(MeshDofError::InvalidGeometry(format!(
                        "CSR graph: vertex {v} has neighbour {u} outside 0..{n}"
                    )));
                }
                mirrored.push((u, v));
            }
        }
        for (u, v) in mirrored {
            adj[u].push(v);
        }
        Ok(Self::from_symmetric_lists(adj))
    }

    /// Assemble from lists whose entries are in range and mirrored.
    pub(crate) fn from_symmetric_lists(adj: Vec<Vec<usize>>) -> Self {
        let n = adj.len();
        let mut xadj = Vec::with_capacity(n + 1);
        let mut adjncy = Vec::new();
        xadj.push(0);
        for (v, nbrs) in adj.into_iter().enumerate() {
            adjncy.extend(nbrs.into_iter().sorted_unstable().dedup().filter(|&u| u != v));
            xadj.push(adjncy.len());
        }
        Self {
            xadj,
            adjncy,
            vwgt: vec![1; n],
        }
    }

    /// Graph of a square sparsity pattern, ignoring the diagonal.
    ///
    /// Structurally unsymmetric patterns still give an undirected graph.
    pub fn from_pattern(pattern: &SparsityPattern) -> Result<Self, MeshDofError> {
        let n = pattern.major_dim();
        if pattern.minor_dim() != n {
            return Err(MeshDofError::InvalidGeometry(format!(
                "graph of a {}x{} pattern: matrix must be square",
                n,
                pattern.minor_dim()
            )));
        }
        Self::from_adjacency((0..n).map(|i| pattern.lane(i).to_vec()).collect())
    }

    pub fn num_vertices(&self) -> usize {
        self.xadj.len().saturating_sub(1)
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.adjncy.len() / 2
    }

    /// Neighbours of `v`, ascending.
    pub fn neighbors(&self, v: usize) -> Result<&[usize], MeshDofError> {
        check_index("vertex", v, self.num_vertices())?;
        Ok(self.neighbors_unchecked(v))
    }

    #[inline]
    pub(crate) fn neighbors_unchecked(&self, v: usize) -> &[usize] {
        &self.adjncy[self.xadj[v]..self.xadj[v + 1]]
    }

    /// Number of neighbours of `v`.
    pub fn degree(&self, v: usize) -> Result<usize, MeshDofError> {
        check_index("vertex", v, self.num_vertices())?;
        Ok(self.degree_unchecked(v))
    }

    #[inline]
    pub(crate) fn degree_unchecked(&self, v: usize) -> usize {
        self.xadj[v + 1] - self.xadj[v]
    }

    /// Row offsets into [`CsrGraph::adjncy`].
    pub fn xadj(&self) -> &[usize] {
        &self.xadj
    }

    /// Concatenated neighbour lists.
    pub fn adjncy(&self) -> &[usize] {
        &self.adjncy
    }

    /// Vertex weights.
    pub fn vwgt(&self) -> &[i32] {
        &self.vwgt
    }

    /// Sparsity pattern of this graph with the diagonal added.
    pub fn to_sparsity_pattern(&self) -> Result<SparsityPattern, MeshDofError> {
        let n = self.num_vertices();
        let mut offsets = Vec::with_capacity(n + 1);
        let mut indices = Vec::with_capacity(self.adjncy.len() + n);
        offsets.push(0);
        for v in 0..n {
            let nbrs = self.neighbors_unchecked(v);
            let split = nbrs.partition_point(|&u| u < v);
            indices.extend_from_slice(&nbrs[..split]);
            indices.push(v);
            indices.extend_from_slice(&nbrs[split..]);
            offsets.push(indices.len());
        }
        SparsityPattern::try_from_offsets_and_indices(n, n, offsets, indices)
            .map_err(|e| MeshDofError::InvariantViolation(format!("sparsity pattern: {e}")))
    }
}

/// DOF-to-DOF coupling graph: DOFs are adjacent when they share a cell.
pub fn build_dof_graph(dofs: &DofManager) -> CsrGraph {
    let n = dofs.num_dofs();
    // dof -> cells containing it
    let mut cells_of: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (cell, row) in dofs.cell_dofs_table().rows().enumerate() {
        for &d in row {
            if cells_of[d].last() != Some(&cell) {
                cells_of[d].push(cell);
            }
        }
    }
    let table = dofs.cell_dofs_table();
    let adj: Vec<Vec<usize>> = cells_of
        .par_iter()
        .map(|cells| {
            cells
                .iter()
                .flat_map(|&c| table.row_unchecked(c).iter().copied())
                .collect()
        })
        .collect();
    let graph = CsrGraph::from_symmetric_lists(adj);
    log::debug!(
        "DOF graph: {} vertices, {} edges",
        graph.num_vertices(),
        graph.num_edges()
    );
    graph
}

/// Cell graph: cells are adjacent when they share at least one DOF.
pub fn build_cell_graph(dofs: &DofManager) -> CsrGraph {
    let n = dofs.num_cells();
    // first-seen map: dof -> owning cell, plus every later cell that saw it
    let mut first_owner: HashMap<usize, usize> = HashMap::new();
    let mut adj: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sharers: HashMap<usize, Vec<usize>> = HashMap::new();
    for (cell, row) in dofs.cell_dofs_table().rows().enumerate() {
        for &d in row {
            match first_owner.get(&d) {
                Some(&owner) if owner != cell => {
                    sharers.entry(d).or_insert_with(|| vec![owner]).push(cell);
                }
                Some(_) => {}
                None => {
                    first_owner.insert(d, cell);
                }
            }
        }
    }
    for cells in sharers.values() {
        for (&a, &b) in cells.iter().tuple_combinations() {
            adj[a].push(b);
            adj[b].push(a);
        }
    }
    CsrGraph::from_symmetric_lists(adj)
}

/// Sparsity pattern of the assembled operator over all DOFs.
pub fn dof_sparsity_pattern(dofs: &DofManager) -> Result<SparsityPattern, MeshDofError> {
    build_dof_graph(dofs).to_sparsity_pattern()
}

/// Zero-valued CSR matrix with the operator's sparsity pattern.
pub fn zero_dof_matrix(dofs: &DofManager) -> Result<CsrMatrix<f64>, MeshDofError> {
    let pattern = dof_sparsity_pattern(dofs)?;
    let nnz = pattern.nnz();
    CsrMatrix::try_from_pattern_and_values(pattern, vec![0.0; nnz])
        .map_err(|e| MeshDofError::InvariantViolation(format!("zero matrix: {e}")))
}
