//! The one error this crate's public API can report: running out of sequence numbers.
//!
//! Ported from `anchored-leveldb::format::SequenceNumber`/`OutOfSequenceNumbers`, which reserve
//! the same 56-bit range that `tq_skiplist`'s entry tag packs a sequence number into.

use thiserror::Error;

/// A strictly-increasing 56-bit write identifier assigned by the outer database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    pub const ZERO: Self = Self(0);
    pub const MAX_USABLE_SEQUENCE_NUMBER: Self = Self(tq_skiplist::MAX_SEQUENCE_NUMBER - 1);
    pub const MAX_SEQUENCE_NUMBER: Self = Self(tq_skiplist::MAX_SEQUENCE_NUMBER);

    /// Returns `SequenceNumber(sequence_number)` if it would be usable as a normal sequence
    /// number (strictly less than the all-ones sentinel value).
    #[inline]
    #[must_use]
    pub const fn new_usable(sequence_number: u64) -> Option<Self> {
        if sequence_number <= Self::MAX_USABLE_SEQUENCE_NUMBER.0 {
            Some(Self(sequence_number))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn inner(self) -> u64 {
        self.0
    }

    /// Attempts to return `SequenceNumber(self.0 + additional)`, checking that overflow does not
    /// occur and that the result is a valid and usable sequence number.
    #[inline]
    pub fn checked_add(self, additional: u64) -> Result<Self, OutOfSequenceNumbers> {
        let new_sequence_number = self.0.checked_add(additional).ok_or(OutOfSequenceNumbers)?;

        if new_sequence_number <= Self::MAX_USABLE_SEQUENCE_NUMBER.0 {
            Ok(Self(new_sequence_number))
        } else {
            Err(OutOfSequenceNumbers)
        }
    }

    /// Attempts to return `SequenceNumber(self.0 + u64::from(additional))`.
    #[inline]
    pub fn checked_add_u32(self, additional: u32) -> Result<Self, OutOfSequenceNumbers> {
        self.checked_add(u64::from(additional))
    }
}

/// Raised by [`SequenceNumber::checked_add`] when assigning the next sequence number would
/// exceed the 56-bit range that `tq_skiplist`'s entry tag reserves for it.
#[derive(Error, Debug, Clone, Copy)]
#[error("somehow, the maximum sequence number - which is over 72 quadrillion - was reached")]
pub struct OutOfSequenceNumbers;
