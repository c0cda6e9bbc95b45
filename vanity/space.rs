//! Bounded two-dimensional enumeration of (account, address index) pairs.

use std::ops::Range;

use crate::error::SearchError;

/// Exclusive upper bound of either index: one past the largest value a
/// 4-byte path segment can hold.
pub const INDEX_LIMIT: u64 = 1 << 32;

/// Half-open account range × half-open address range, walked outer-major:
/// every address of an account is visited before the account advances.
///
/// Pairs are addressed by a linear position in `0..len()`, so the walk ends
/// on a position comparison and never relies on an index wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpace {
    accounts: Range<u64>,
    addresses: Range<u64>,
}

impl IndexSpace {
    pub fn new(accounts: Range<u64>, addresses: Range<u64>) -> Result<Self, SearchError> {
        for (name, range) in [("account", &accounts), ("address", &addresses)] {
            if range.start > range.end || range.end > INDEX_LIMIT {
                return Err(SearchError::InvalidSpace(format!(
                    "{} range {}..{} must lie within 0..{}",
                    name, range.start, range.end, INDEX_LIMIT
                )));
            }
        }
        Ok(Self {
            accounts,
            addresses,
        })
    }

    /// Every representable pair.
    pub fn full() -> Self {
        Self {
            accounts: 0..INDEX_LIMIT,
            addresses: 0..INDEX_LIMIT,
        }
    }

    pub fn accounts(&self) -> Range<u64> {
        self.accounts.clone()
    }

    pub fn addresses(&self) -> Range<u64> {
        self.addresses.clone()
    }

    fn width(&self) -> u128 {
        (self.addresses.end - self.addresses.start) as u128
    }

    /// Number of pairs in the space. Up to 2^64, hence `u128`.
    pub fn len(&self) -> u128 {
        (self.accounts.end - self.accounts.start) as u128 * self.width()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The pair at a linear position, or `None` past the end.
    pub fn position(&self, position: u128) -> Option<(u64, u64)> {
        if position >= self.len() {
            return None;
        }
        let width = self.width();
        let account = self.accounts.start + (position / width) as u64;
        let address = self.addresses.start + (position % width) as u64;
        Some((account, address))
    }

    pub fn iter(&self) -> IndexPairs {
        self.iter_range(0..self.len())
    }

    /// Pairs whose linear positions fall in `positions`, clamped to the space.
    pub fn iter_range(&self, positions: Range<u128>) -> IndexPairs {
        let end = positions.end.min(self.len());
        IndexPairs {
            space: self.clone(),
            next: positions.start.min(end),
            end,
        }
    }
}

impl<'a> IntoIterator for &'a IndexSpace {
    type Item = (u64, u64);
    type IntoIter = IndexPairs;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct IndexPairs {
    space: IndexSpace,
    next: u128,
    end: u128,
}

impl Iterator for IndexPairs {
    type Item = (u64, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let pair = self.space.position(self.next);
        self.next += 1;
        pair
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}
