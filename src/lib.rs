//! Maximum weight matching on bipartite graphs.
//!
//! The graph is supplied through the [`Graph`] traversal trait, split into two sides by
//! [`bipartition`] and matched with the Kuhn-Munkres (Hungarian) method of
//! [`KuhnMunkresSolver`]. [`matching`] wraps the whole pipeline and only reports perfect
//! matchings, i.e. matchings covering every vertex of both sides.
//!
//! ```
//! use bipartite_matching::{matching, AdjacencyList, GraphBuilder};
//!
//! let graph = AdjacencyList::<u32>::from_edges(4, [(0, 2, 1), (0, 3, 2), (1, 2, 3), (1, 3, 4)])?;
//! assert_eq!(matching(&graph), Some(vec![3, 2]));
//! # Ok::<(), anyhow::Error>(())
//! ```
pub mod bipartite;
pub mod csr;
pub mod graph;
pub mod hungarian;
pub mod set;
pub mod solution;

pub use crate::bipartite::{bipartition, Bipartition, Side};
pub use crate::graph::{AdjacencyList, AdjacencyMatrix, Graph, GraphBuilder};
pub use crate::hungarian::KuhnMunkresSolver;
pub use crate::set::IntSet;
pub use crate::solution::{Label, MatchingSolution, UnsignedInt, Weight};

use tracing::debug;

/// Maximum weight perfect matching of `graph`.
///
/// Returns the Y partner of every X vertex, X vertices taken in ascending id order. Returns `None`
/// if the graph is malformed, not bipartite, its sides differ in size or no matching covers every
/// vertex. The answer doesn't depend on which side ends up as X.
///
/// [`KuhnMunkresSolver`] keeps the partial matching for graphs rejected here.
pub fn matching<I, G>(graph: &G) -> Option<Vec<I>>
where
    I: UnsignedInt,
    G: Graph<I> + ?Sized,
{
    let n: usize = graph.order().as_();
    let (mut solver, mut solution) = KuhnMunkresSolver::new(n, n, n);
    if let Err(err) = solver.solve(graph, &mut solution, true) {
        debug!("no matching: {:#}", err);
        return None;
    }
    if solution.left.len() != solution.right.len() {
        debug!(
            "sides differ in size: {} and {}",
            solution.left.len(),
            solution.right.len()
        );
        return None;
    }
    if !solution.is_perfect() {
        debug!("{} vertices left unmatched", solution.num_unmatched);
        return None;
    }
    Some(solution.left_to_right)
}

#[cfg(test)]
mod tests {
    use super::matching;
    use crate::graph::{AdjacencyList, AdjacencyMatrix, GraphBuilder};
    use crate::solution::{Label, MatchingSolution, Weight};
    use crate::KuhnMunkresSolver;

    fn init() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();
    }

    fn total_weight<G: GraphBuilder<u32>>(graph: &G, solution: &MatchingSolution<u32>) -> Weight {
        solution
            .pairs()
            .map(|(x, y)| {
                graph
                    .neighbors(x)
                    .filter(|(v, _)| *v == y)
                    .map(|(_, w)| w)
                    .max()
                    .unwrap()
            })
            .sum()
    }

    #[generic_tests::define]
    mod scenarios {
        use super::*;

        #[test]
        fn test_empty_graph<G: GraphBuilder<u32>>() {
            init();
            let g = G::with_order(0).unwrap();
            assert_eq!(matching(&g), Some(vec![]));
        }

        #[test]
        fn test_single_edge<G: GraphBuilder<u32>>() {
            init();
            let g = G::from_edges(2, [(0, 1, 5)]).unwrap();
            assert_eq!(matching(&g), Some(vec![1]));
        }

        #[test]
        fn test_triangle<G: GraphBuilder<u32>>() {
            init();
            let g = G::from_edges(3, [(0, 1, 1), (1, 2, 1), (2, 0, 1)]).unwrap();
            assert_eq!(matching(&g), None);
        }

        #[test]
        fn test_complete_two_by_two<G: GraphBuilder<u32>>() {
            init();
            let g = G::from_edges(4, [(0, 2, 1), (0, 3, 2), (1, 2, 3), (1, 3, 4)]).unwrap();
            let (mut solver, mut solution) = KuhnMunkresSolver::new(4, 4, 4);
            solver.solve(&g, &mut solution, true).unwrap();
            assert!(solution.is_perfect());
            assert_eq!(total_weight(&g, &solution), 5);
            assert_eq!(solution.weight, 5);
            assert_eq!(solution.labels.iter().sum::<Label>(), 5);
        }

        #[test]
        fn test_unequal_sides<G: GraphBuilder<u32>>() {
            init();
            let g = G::from_edges(3, [(0, 2, 1), (1, 2, 1)]).unwrap();
            assert_eq!(matching(&g), None);
        }

        #[test]
        fn test_star_is_rejected_for_any_numbering<G: GraphBuilder<u32>>() {
            init();
            // center on the smaller side
            let g = G::from_edges(3, [(0, 1, 5), (0, 2, 3)]).unwrap();
            assert_eq!(matching(&g), None);
            let (mut solver, mut solution) = KuhnMunkresSolver::new(3, 3, 2);
            solver.solve(&g, &mut solution, true).unwrap();
            assert!(solution.is_perfect());
            assert_eq!(solution.left_to_right, [1]);
            assert_eq!(solution.right_to_left, [0, u32::MAX]);

            // center on the larger side
            let g = G::from_edges(3, [(2, 0, 5), (2, 1, 3)]).unwrap();
            assert_eq!(matching(&g), None);
        }

        #[test]
        fn test_idempotent<G: GraphBuilder<u32>>() {
            init();
            let g = G::from_edges(
                6,
                [(0, 3, 4), (0, 4, 4), (1, 3, 4), (1, 5, 2), (2, 4, 7), (2, 5, 7)],
            )
            .unwrap();
            let first = matching(&g);
            assert!(first.is_some());
            assert_eq!(first, matching(&g));
        }

        #[instantiate_tests(<AdjacencyList<u32>>)]
        mod adjacency_list {}

        #[instantiate_tests(<AdjacencyMatrix<u32>>)]
        mod adjacency_matrix {}
    }

    #[test]
    fn test_negative_weights_are_not_absent_edges() {
        init();
        let g = AdjacencyList::<u64>::from_edges(4, [(0, 2, -5), (1, 3, -7)]).unwrap();
        assert_eq!(matching(&g), Some(vec![2, 3]));

        // a missing edge can't be used even if every present edge is expensive
        let g = AdjacencyList::<u64>::from_edges(4, [(0, 2, -5), (1, 2, -7)]).unwrap();
        assert_eq!(matching(&g), None);
    }
}
