use num_traits::{AsPrimitive, FromPrimitive, NumAssign, PrimInt, Unsigned};
use std::fmt::{Debug, Display};

/// Edge weight type
pub type Weight = i64;

/// Labels, slacks and sums of weights, wide enough for any `Weight` and its negation
pub type Label = i128;

pub trait UnsignedInt:
    PrimInt + Unsigned + Display + Debug + AsPrimitive<usize> + FromPrimitive + NumAssign
{
}

impl<T> UnsignedInt for T where
    T: PrimInt + Unsigned + Display + Debug + AsPrimitive<usize> + FromPrimitive + NumAssign
{
}

///
/// Solution of the bipartite matching problem
///
#[derive(Debug, Clone)]
pub struct MatchingSolution<I>
where
    I: UnsignedInt,
{
    /// vertex ids of the X side in ascending order
    pub left: Vec<I>,
    /// vertex ids of the Y side in ascending order
    pub right: Vec<I>,
    /// index i gives the Y vertex id matched to the X vertex left[i]
    ///
    /// Unmatched vertices are marked by MAX value of the integer type (u32::MAX for u32)
    pub left_to_right: Vec<I>,
    /// index j gives the X vertex id matched to the Y vertex right[j]
    ///
    /// Unmatched vertices are marked by MAX value of the integer type (u32::MAX for u32)
    pub right_to_left: Vec<I>,
    /// final vertex labels indexed by vertex id
    pub labels: Vec<Label>,
    /// number of unmatched X vertices in case perfect matching doesn't exist
    pub num_unmatched: I,
    /// total weight of matched edges
    pub weight: Label,
}

impl<I> MatchingSolution<I>
where
    I: UnsignedInt,
{
    pub fn new(row_capacity: usize, column_capacity: usize) -> MatchingSolution<I> {
        MatchingSolution::<I> {
            left: Vec::with_capacity(row_capacity),
            right: Vec::with_capacity(column_capacity),
            left_to_right: Vec::with_capacity(row_capacity),
            right_to_left: Vec::with_capacity(column_capacity),
            labels: Vec::with_capacity(row_capacity + column_capacity),
            num_unmatched: I::max_value(),
            weight: 0,
        }
    }

    /// Every X vertex is matched.
    #[inline]
    pub fn is_perfect(&self) -> bool {
        self.num_unmatched.is_zero()
    }

    /// Matched `(x, y)` vertex id pairs in ascending order of `x`.
    pub fn pairs(&self) -> impl Iterator<Item = (I, I)> + '_ {
        self.left
            .iter()
            .zip(self.left_to_right.iter())
            .filter(|(_, y_ref)| **y_ref != I::max_value())
            .map(|(x_ref, y_ref)| (*x_ref, *y_ref))
    }

    pub(crate) fn clear(&mut self) {
        self.left.clear();
        self.right.clear();
        self.left_to_right.clear();
        self.right_to_left.clear();
        self.labels.clear();
        self.num_unmatched = I::max_value();
        self.weight = 0;
    }
}
