use crate::solution::UnsignedInt;
use bit_set::BitSet;
use std::marker::PhantomData;

/// Mutable set of small non-negative integers.
///
/// Membership is stored in a bit vector indexed by the item itself, so items should be dense ids
/// such as vertex ids or side positions. Iteration order is not part of the contract.
#[derive(Debug, Clone, Default)]
pub struct IntSet<I: UnsignedInt> {
    bits: BitSet,
    // cached cardinality, BitSet::len counts bits
    len: usize,
    _item: PhantomData<I>,
}

impl<I: UnsignedInt> IntSet<I> {
    pub fn new() -> Self {
        Self {
            bits: BitSet::new(),
            len: 0,
            _item: PhantomData,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: BitSet::with_capacity(capacity),
            len: 0,
            _item: PhantomData,
        }
    }

    /// Insert item into the set.
    ///
    /// Returns true if the set was modified (item was not already present), false otherwise.
    #[inline]
    pub fn insert(&mut self, item: I) -> bool {
        let inserted = self.bits.insert(item.as_());
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Inserts each item.
    ///
    /// Returns true if the set was modified (at least one item was not already present).
    pub fn insert_all<T>(&mut self, items: T) -> bool
    where
        T: IntoIterator<Item = I>,
    {
        let mut modified = false;
        for item in items {
            modified |= self.insert(item);
        }
        modified
    }

    /// Remove item from the set.
    ///
    /// Returns true if the set was modified (item was present), false otherwise.
    #[inline]
    pub fn remove(&mut self, item: I) -> bool {
        let removed = self.bits.remove(item.as_());
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Removes each item.
    ///
    /// Returns true if the set was modified (any item was present).
    pub fn remove_all<T>(&mut self, items: T) -> bool
    where
        T: IntoIterator<Item = I>,
    {
        let mut modified = false;
        for item in items {
            modified |= self.remove(item);
        }
        modified
    }

    #[inline]
    pub fn contains(&self, item: I) -> bool {
        self.bits.contains(item.as_())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.bits.clear();
        self.len = 0;
    }

    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        // items were inserted as I, the conversion back can't fail
        self.bits.iter().filter_map(I::from_usize)
    }
}

impl<I: UnsignedInt> PartialEq for IntSet<I> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        self.iter().all(|item| other.contains(item))
    }
}

impl<I: UnsignedInt> Eq for IntSet<I> {}

impl<I: UnsignedInt> Extend<I> for IntSet<I> {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        self.insert_all(iter);
    }
}

impl<I: UnsignedInt> FromIterator<I> for IntSet<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut set = IntSet::new();
        set.insert_all(iter);
        set
    }
}
