//! Single-pass row iteration over a snapshot of a row domain.
//!
//! A [`RowIterator`] never borrows its source. It captures the rows that were
//! valid when it was created, so the source may be mutated while it is live.
//! Removals made *through* the iterator via [`RowIterator::remove_from`] are
//! checked against the source's modification stamp, and any other structural
//! change is reported as a concurrent modification instead of being silently
//! ignored.

use std::marker::PhantomData;

use im::OrdSet;
use tabula_foundation::{Error, Result, RowId};

/// Iteration direction, fixed per iterator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Lowest row first.
    Ascending,
    /// Highest row first.
    Descending,
}

/// A source whose structural changes can be detected.
pub trait Stamped {
    /// Counter that changes on every structural mutation.
    fn modification_stamp(&self) -> u64;
}

/// A source that supports removing a row during iteration.
pub trait RowRemover: Stamped {
    /// Removes `row` from the source.
    ///
    /// # Errors
    ///
    /// Returns an error if the source rejects the row.
    fn remove_row(&mut self, row: RowId) -> Result<()>;
}

#[derive(Clone, Debug)]
enum Domain {
    /// Every position maps to itself.
    Dense,
    /// Positions map to themselves, skipping ids in the free set.
    Allocated(OrdSet<RowId>),
    /// Positions index an explicit row list.
    Listed(Vec<RowId>),
}

/// Lazy, single-pass sequence of row ids.
#[derive(Clone, Debug)]
pub struct RowIterator {
    domain: Domain,
    front: usize,
    back: usize,
    direction: Direction,
    last: Option<RowId>,
    stamp: u64,
}

impl RowIterator {
    fn with_domain(domain: Domain, len: usize, direction: Direction) -> Self {
        Self {
            domain,
            front: 0,
            back: len,
            direction,
            last: None,
            stamp: 0,
        }
    }

    /// Iterates rows `0..count`.
    #[must_use]
    pub fn dense(count: usize, direction: Direction) -> Self {
        Self::with_domain(Domain::Dense, count, direction)
    }

    /// Iterates the given rows in list order (reversed when descending).
    #[must_use]
    pub fn listed(rows: Vec<RowId>, direction: Direction) -> Self {
        let len = rows.len();
        Self::with_domain(Domain::Listed(rows), len, direction)
    }

    /// Iterates `0..end`, skipping ids present in `free`.
    #[must_use]
    pub(crate) fn allocated(free: OrdSet<RowId>, end: usize, direction: Direction) -> Self {
        Self::with_domain(Domain::Allocated(free), end, direction)
    }

    /// An iterator that yields nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::dense(0, Direction::Ascending)
    }

    /// Records the source stamp used for fail-fast checks.
    #[must_use]
    pub fn with_stamp(mut self, stamp: u64) -> Self {
        self.stamp = stamp;
        self
    }

    /// Direction of this iterator.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    fn row_at(&self, position: usize) -> Option<RowId> {
        match &self.domain {
            Domain::Dense => Some(position),
            Domain::Allocated(free) => (!free.contains(&position)).then_some(position),
            Domain::Listed(rows) => rows.get(position).copied(),
        }
    }

    /// Returns the next row without consuming it.
    #[must_use]
    pub fn peek_row(&self) -> Option<RowId> {
        match self.direction {
            Direction::Ascending => (self.front..self.back).find_map(|p| self.row_at(p)),
            Direction::Descending => (self.front..self.back).rev().find_map(|p| self.row_at(p)),
        }
    }

    /// Returns true if another row remains.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.peek_row().is_some()
    }

    /// Consumes and returns the next row.
    pub fn next_row(&mut self) -> Option<RowId> {
        while self.front < self.back {
            let position = match self.direction {
                Direction::Ascending => {
                    self.front += 1;
                    self.front - 1
                }
                Direction::Descending => {
                    self.back -= 1;
                    self.back
                }
            };
            if let Some(row) = self.row_at(position) {
                self.last = Some(row);
                return Some(row);
            }
        }
        None
    }

    /// The row most recently returned by [`next_row`](Self::next_row).
    #[must_use]
    pub const fn last_row(&self) -> Option<RowId> {
        self.last
    }

    /// Fails if `source` changed structurally since this iterator was
    /// created (or since its last successful removal).
    ///
    /// # Errors
    ///
    /// Returns a concurrent modification error on a stamp mismatch.
    pub fn check<S: Stamped + ?Sized>(&self, source: &S) -> Result<()> {
        let actual = source.modification_stamp();
        if actual == self.stamp {
            Ok(())
        } else {
            Err(Error::concurrent_modification(self.stamp, actual))
        }
    }

    /// Removes the last visited row from `target`.
    ///
    /// May be called once per visited row.
    ///
    /// # Errors
    ///
    /// Returns an invalid argument error when no row was visited since the
    /// last removal, a concurrent modification error when `target` changed
    /// behind the iterator, or whatever `target` reports for the row.
    pub fn remove_from<R: RowRemover + ?Sized>(&mut self, target: &mut R) -> Result<()> {
        self.check(target)?;
        let row = self.last.take().ok_or_else(|| {
            Error::invalid_argument("remove called without a preceding next_row")
        })?;
        target.remove_row(row)?;
        self.stamp = target.modification_stamp();
        Ok(())
    }
}

impl Iterator for RowIterator {
    type Item = RowId;

    fn next(&mut self) -> Option<RowId> {
        self.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let span = self.back.saturating_sub(self.front);
        match self.domain {
            Domain::Allocated(_) => (0, Some(span)),
            Domain::Dense | Domain::Listed(_) => (span, Some(span)),
        }
    }
}

/// Row iteration that borrows its source, so the source cannot change
/// while the iteration is live.
#[derive(Clone, Debug)]
pub struct Rows<'a> {
    inner: RowIterator,
    _source: PhantomData<&'a ()>,
}

impl Rows<'_> {
    pub(crate) fn new(inner: RowIterator) -> Self {
        Self {
            inner,
            _source: PhantomData,
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = RowId;

    fn next(&mut self) -> Option<RowId> {
        self.inner.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
