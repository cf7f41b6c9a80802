//! A concurrent, arena-allocated two-queue ("2Q") skip list: an ordered map that doubles as an
//! insertion-order FIFO chain split into hot and cold regions, so that a caller can partition the
//! structure for flush while keeping recently-inserted ("hot") entries around for carry-over into
//! a successor structure.
//!
//! This crate implements only the data structure (C1-C5 of the write-buffer design it backs); the
//! entry-oriented memtable façade built on top of it lives in `tq-memtable`.

mod comparator;
mod entry;
mod height;
mod list;
mod maybe_loom;
mod node;

pub use crate::comparator::InternalKeyComparator;
pub use crate::entry::{
    encode_entry, encoded_len, parse_entry, parse_seq, parse_type, parse_user_key, parse_value,
    EntryType, EntryView, InvalidEntryType, MAX_SEQUENCE_NUMBER,
};
pub use crate::list::{Iter, TwoQueueSkipList, WriteAccess};
