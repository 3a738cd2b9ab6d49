use crate::graph::Graph;
use crate::solution::UnsignedInt;
use std::collections::VecDeque;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// X side, rows of the assignment
    Left,
    /// Y side, columns of the assignment
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// 2-coloring of the vertex set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bipartition<I: UnsignedInt> {
    sides: Vec<Side>,
    left: Vec<I>,
    right: Vec<I>,
}

impl<I: UnsignedInt> Bipartition<I> {
    #[inline]
    pub fn side(&self, v: I) -> Side {
        self.sides[v.as_()]
    }

    /// X vertex ids in ascending order
    pub fn left(&self) -> &[I] {
        &self.left
    }

    /// Y vertex ids in ascending order
    pub fn right(&self) -> &[I] {
        &self.right
    }

    pub fn into_sides(self) -> (Vec<I>, Vec<I>) {
        (self.left, self.right)
    }
}

/// Splits the vertices of `graph` into two sides so that every edge crosses sides.
///
/// Components are colored by breadth-first search in ascending id order and the lowest id of
/// every component lands on the left side. Returns `None` if the graph has an odd cycle.
pub fn bipartition<I, G>(graph: &G) -> Option<Bipartition<I>>
where
    I: UnsignedInt,
    G: Graph<I> + ?Sized,
{
    let n: usize = graph.order().as_();
    let mut colors: Vec<Option<Side>> = vec![None; n];
    let mut queue = VecDeque::new();

    for root in num_iter::range(I::zero(), graph.order()) {
        if colors[root.as_()].is_some() {
            continue;
        }
        colors[root.as_()] = Some(Side::Left);
        queue.push_back(root);

        while let Some(u) = queue.pop_front() {
            let u_side = colors[u.as_()]?;
            let conflict = graph.visit(u, |v, _| match colors[v.as_()] {
                Some(v_side) => v_side == u_side,
                None => {
                    colors[v.as_()] = Some(u_side.opposite());
                    queue.push_back(v);
                    false
                }
            });
            if conflict {
                debug!("odd cycle through vertex {}", u);
                return None;
            }
        }
    }

    let mut sides = Vec::with_capacity(n);
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (v, color) in num_iter::range(I::zero(), graph.order()).zip(colors.into_iter()) {
        // every vertex was reached from some root
        let side = color?;
        match side {
            Side::Left => left.push(v),
            Side::Right => right.push(v),
        }
        sides.push(side);
    }
    trace!("left: {:?}, right: {:?}", left, right);
    Some(Bipartition { sides, left, right })
}
