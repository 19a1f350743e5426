//! Row reorderings that never move column data.
//!
//! A [`Permutation`] maps positions to original rows (`direct`) and original
//! rows back to positions (`inverse`). Both arrays are maintained eagerly so
//! each lookup is O(1). Rows may be absent from the mapping after a
//! [`filter`](Permutation::filter) or when built from a partial row list;
//! such rows report `None` from [`inverse`](Permutation::inverse).

use std::cmp::Ordering;
use std::fmt;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tabula_foundation::{Error, Result, RowId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::iter::{Direction, RowIterator};

const UNMAPPED: usize = usize::MAX;

/// A bijection between positions and original row ids.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Permutation {
    direct: Vec<RowId>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// The identity permutation over `0..size`.
    #[must_use]
    pub fn identity(size: usize) -> Self {
        Self {
            direct: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Builds a permutation whose positions hold `rows`, in order.
    ///
    /// # Errors
    ///
    /// Returns a structural mismatch error if a row appears twice, or an
    /// invalid argument error if the largest row is too big to index.
    pub fn from_rows(rows: impl IntoIterator<Item = RowId>) -> Result<Self> {
        let direct: Vec<RowId> = rows.into_iter().collect();
        let domain = match direct.iter().max() {
            None => 0,
            Some(&max) => max
                .checked_add(1)
                .ok_or_else(|| Error::invalid_argument(format!("row {max} cannot be indexed")))?,
        };
        let mut inverse = Vec::new();
        inverse.try_reserve_exact(domain).map_err(|_| {
            Error::invalid_argument(format!("cannot map rows up to {}", domain - 1))
        })?;
        inverse.resize(domain, UNMAPPED);
        for (position, &row) in direct.iter().enumerate() {
            if inverse[row] != UNMAPPED {
                return Err(Error::structural_mismatch(format!(
                    "row {row} appears at positions {} and {position}",
                    inverse[row]
                )));
            }
            inverse[row] = position;
        }
        Ok(Self { direct, inverse })
    }

    /// Builds a permutation from the rows an iterator yields.
    ///
    /// # Errors
    ///
    /// Returns a structural mismatch error if a row is yielded twice.
    pub fn from_iterator(rows: RowIterator) -> Result<Self> {
        Self::from_rows(rows)
    }

    /// The identity over `0..size`, keeping only rows accepted by `keep`.
    #[must_use]
    pub fn filtered(size: usize, keep: impl FnMut(RowId) -> bool) -> Self {
        let mut permutation = Self::identity(size);
        permutation.filter(keep);
        permutation
    }

    /// Selects positions of `parent` and renumbers them densely.
    ///
    /// Position `i` of the result holds `parent.direct(indices[i])`.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if an index lies outside the
    /// parent's positions, or a structural mismatch if an index repeats.
    pub fn select(parent: &Self, indices: &[usize]) -> Result<Self> {
        let rows = indices
            .iter()
            .map(|&index| {
                parent.direct(index).ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "index {index} outside parent permutation of size {}",
                        parent.size()
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_rows(rows)
    }

    /// Number of positions.
    #[must_use]
    pub fn size(&self) -> usize {
        self.direct.len()
    }

    /// Returns true if there are no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }

    /// The original row at `position`.
    #[must_use]
    pub fn direct(&self, position: usize) -> Option<RowId> {
        self.direct.get(position).copied()
    }

    /// The position of original row `row`, or `None` if it is not mapped.
    #[must_use]
    pub fn inverse(&self, row: RowId) -> Option<usize> {
        self.inverse
            .get(row)
            .copied()
            .filter(|&position| position != UNMAPPED)
    }

    /// Returns true if `row` is mapped to some position.
    #[must_use]
    pub fn contains(&self, row: RowId) -> bool {
        self.inverse(row).is_some()
    }

    /// Rows in position order.
    #[must_use]
    pub fn rows(&self) -> &[RowId] {
        &self.direct
    }

    /// Returns true if every position holds its own index.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.direct
            .iter()
            .enumerate()
            .all(|(position, &row)| position == row)
    }

    fn rebuild_inverse(&mut self) {
        self.inverse.fill(UNMAPPED);
        for (position, &row) in self.direct.iter().enumerate() {
            if row >= self.inverse.len() {
                self.inverse.resize(row + 1, UNMAPPED);
            }
            self.inverse[row] = position;
        }
    }

    /// Sorts positions by comparing their original rows, keeping equal
    /// rows in their current relative order.
    pub fn stable_sort(&mut self, mut compare: impl FnMut(RowId, RowId) -> Ordering) {
        self.direct.sort_by(|&a, &b| compare(a, b));
        self.rebuild_inverse();
    }

    /// Sorts positions by comparing their original rows. Equal rows may be
    /// reordered.
    pub fn sort(&mut self, mut compare: impl FnMut(RowId, RowId) -> Ordering) {
        self.direct.sort_unstable_by(|&a, &b| compare(a, b));
        self.rebuild_inverse();
    }

    /// Stable sort by a column's row ordering.
    pub fn sort_by_column(&mut self, column: &dyn Column) {
        self.stable_sort(|a, b| column.compare_rows(a, b));
    }

    /// Composes with `other`: position `i` now holds what position
    /// `other.direct(i)` held before.
    ///
    /// # Errors
    ///
    /// Returns a structural mismatch error if `other` refers to a position
    /// this permutation does not have.
    pub fn permute(&mut self, other: &Self) -> Result<()> {
        let size = self.size();
        if let Some(&bad) = other.direct.iter().find(|&&position| position >= size) {
            return Err(Error::structural_mismatch(format!(
                "composing permutation refers to position {bad}, size is {size}"
            )));
        }
        self.direct = other
            .direct
            .iter()
            .map(|&position| self.direct[position])
            .collect();
        self.rebuild_inverse();
        Ok(())
    }

    /// Exchanges two positions.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error if either position is out of range.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        let size = self.size();
        if i >= size || j >= size {
            return Err(Error::invalid_argument(format!(
                "cannot swap positions {i} and {j} in permutation of size {size}"
            )));
        }
        self.direct.swap(i, j);
        self.inverse[self.direct[i]] = i;
        self.inverse[self.direct[j]] = j;
        Ok(())
    }

    /// Reverses position order.
    pub fn reverse(&mut self) {
        self.direct.reverse();
        self.rebuild_inverse();
    }

    /// Shuffles positions with a deterministic generator seeded by `seed`.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.direct.shuffle(&mut rng);
        self.rebuild_inverse();
    }

    /// Drops rows rejected by `keep`. Returns how many were dropped.
    ///
    /// Remaining positions are renumbered densely; dropped rows become
    /// unmapped.
    pub fn filter(&mut self, mut keep: impl FnMut(RowId) -> bool) -> usize {
        let before = self.direct.len();
        self.direct.retain(|&row| keep(row));
        self.rebuild_inverse();
        before - self.direct.len()
    }

    /// Drops a single row. Returns false if it was not mapped.
    pub fn remove_row(&mut self, row: RowId) -> bool {
        match self.inverse(row) {
            Some(position) => {
                self.direct.remove(position);
                self.rebuild_inverse();
                true
            }
            None => false,
        }
    }

    /// Orders two original rows by their positions. Unmapped rows sort last.
    #[must_use]
    pub fn compare_rows(&self, a: RowId, b: RowId) -> Ordering {
        match (self.inverse(a), self.inverse(b)) {
            (Some(pa), Some(pb)) => pa.cmp(&pb),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(&b),
        }
    }

    /// Iterates original rows in position order.
    #[must_use]
    pub fn iter(&self) -> RowIterator {
        RowIterator::listed(self.direct.clone(), Direction::Ascending)
    }

    /// Iterates original rows in reverse position order.
    #[must_use]
    pub fn iter_rev(&self) -> RowIterator {
        RowIterator::listed(self.direct.clone(), Direction::Descending)
    }

    /// Gathers `values` into position order: element `i` of the result is
    /// `values[direct(i)]`.
    ///
    /// # Errors
    ///
    /// Returns a structural mismatch error if a mapped row has no value.
    pub fn apply_to<T: Clone>(&self, values: &[T]) -> Result<Vec<T>> {
        self.direct
            .iter()
            .map(|&row| {
                values.get(row).cloned().ok_or_else(|| {
                    Error::structural_mismatch(format!(
                        "row {row} has no value among {}",
                        values.len()
                    ))
                })
            })
            .collect()
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, row) in self.direct.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{row}")?;
        }
        f.write_str("]")
    }
}
