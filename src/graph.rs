use crate::solution::{UnsignedInt, Weight};
use anyhow::{anyhow as anyhow_error, ensure, Result};
use std::iter::{Copied, Enumerate, FilterMap};
use std::slice;

/// Traversal capability the matching engine depends on.
///
/// Vertices are dense ids `0..order()`. An undirected edge `(u, v)` must be reported from both
/// endpoints with the same weight.
pub trait Graph<I: UnsignedInt> {
    type Neighbors<'a>: Iterator<Item = (I, Weight)>
    where
        Self: 'a;

    /// Number of vertices
    fn order(&self) -> I;

    /// Lazily yields `(neighbor, weight)` for every edge incident to `v`.
    ///
    /// The order is arbitrary but must not change between calls.
    fn neighbors(&self, v: I) -> Self::Neighbors<'_>;

    /// Calls `f` for every edge incident to `v` until it returns `true`.
    ///
    /// Returns whether the visit was stopped early.
    #[inline]
    fn visit<F>(&self, v: I, mut f: F) -> bool
    where
        F: FnMut(I, Weight) -> bool,
    {
        for (w, c) in self.neighbors(v) {
            if f(w, c) {
                return true;
            }
        }
        false
    }
}

/// Incremental construction of an undirected weighted graph.
pub trait GraphBuilder<I: UnsignedInt>: Graph<I> + Sized {
    fn with_order(n: I) -> Result<Self, anyhow::Error>;

    fn add_edge(&mut self, u: I, v: I, weight: Weight) -> Result<(), anyhow::Error>;

    fn from_edges<T>(n: I, edges: T) -> Result<Self, anyhow::Error>
    where
        T: IntoIterator<Item = (I, I, Weight)>,
    {
        let mut graph = Self::with_order(n)?;
        for (u, v, weight) in edges {
            graph.add_edge(u, v, weight)?;
        }
        Ok(graph)
    }
}

#[inline]
fn check_order<I: UnsignedInt>(n: I) -> Result<(), anyhow::Error> {
    // MAX value marks missing vertices in solutions
    ensure!(
        n < I::max_value(),
        "graph order {} leaves no room for the sentinel id",
        n
    );
    Ok(())
}

#[inline]
fn check_edge<I: UnsignedInt>(n: I, u: I, v: I) -> Result<(), anyhow::Error> {
    ensure!(u < n && v < n, "edge ({}, {}) is out of range 0..{}", u, v, n);
    ensure!(u != v, "self-loop at vertex {}", u);
    Ok(())
}

/// Sparse undirected graph stored as adjacency lists.
#[derive(Debug, Clone)]
pub struct AdjacencyList<I: UnsignedInt> {
    adjs: Vec<Vec<(I, Weight)>>,
}

impl<I: UnsignedInt> AdjacencyList<I> {
    pub fn num_of_edges(&self) -> usize {
        self.adjs.iter().map(Vec::len).sum::<usize>() / 2
    }
}

impl<I: UnsignedInt> Graph<I> for AdjacencyList<I> {
    type Neighbors<'a> = Copied<slice::Iter<'a, (I, Weight)>> where Self: 'a;

    #[inline]
    fn order(&self) -> I {
        // bounded by check_order on construction
        I::from_usize(self.adjs.len()).unwrap_or_else(I::max_value)
    }

    #[inline]
    fn neighbors(&self, v: I) -> Self::Neighbors<'_> {
        self.adjs[v.as_()].iter().copied()
    }
}

impl<I: UnsignedInt> GraphBuilder<I> for AdjacencyList<I> {
    fn with_order(n: I) -> Result<Self, anyhow::Error> {
        check_order(n)?;
        Ok(Self {
            adjs: vec![Vec::new(); n.as_()],
        })
    }

    fn add_edge(&mut self, u: I, v: I, weight: Weight) -> Result<(), anyhow::Error> {
        check_edge(self.order(), u, v)?;
        self.adjs[u.as_()].push((v, weight));
        self.adjs[v.as_()].push((u, weight));
        Ok(())
    }
}

type MatrixRow<'a, I> = FilterMap<
    Enumerate<slice::Iter<'a, Option<Weight>>>,
    fn((usize, &Option<Weight>)) -> Option<(I, Weight)>,
>;

/// Dense undirected graph stored as an `n x n` matrix, absent edges are `None`.
#[derive(Debug, Clone)]
pub struct AdjacencyMatrix<I: UnsignedInt> {
    order: I,
    weights: Vec<Option<Weight>>,
}

impl<I: UnsignedInt> AdjacencyMatrix<I> {
    #[inline]
    pub fn weight(&self, u: I, v: I) -> Option<Weight> {
        let n: usize = self.order.as_();
        self.weights[u.as_() * n + v.as_()]
    }
}

impl<I: UnsignedInt> Graph<I> for AdjacencyMatrix<I> {
    type Neighbors<'a> = MatrixRow<'a, I> where Self: 'a;

    #[inline]
    fn order(&self) -> I {
        self.order
    }

    fn neighbors(&self, v: I) -> Self::Neighbors<'_> {
        let n: usize = self.order.as_();
        let start = v.as_() * n;
        let present: fn((usize, &Option<Weight>)) -> Option<(I, Weight)> =
            |(j, weight_ref)| Some((I::from_usize(j)?, (*weight_ref)?));
        self.weights[start..start + n]
            .iter()
            .enumerate()
            .filter_map(present)
    }
}

impl<I: UnsignedInt> GraphBuilder<I> for AdjacencyMatrix<I> {
    fn with_order(n: I) -> Result<Self, anyhow::Error> {
        check_order(n)?;
        let n_usize: usize = n.as_();
        let size = n_usize
            .checked_mul(n_usize)
            .ok_or_else(|| anyhow_error!("adjacency matrix of order {} is too large", n))?;
        Ok(Self {
            order: n,
            weights: vec![None; size],
        })
    }

    /// Adding an existing edge overwrites its weight.
    fn add_edge(&mut self, u: I, v: I, weight: Weight) -> Result<(), anyhow::Error> {
        check_edge(self.order, u, v)?;
        let n: usize = self.order.as_();
        self.weights[u.as_() * n + v.as_()] = Some(weight);
        self.weights[v.as_() * n + u.as_()] = Some(weight);
        Ok(())
    }
}
