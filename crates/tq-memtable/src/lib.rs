//! `TQMemTable`: the entry-oriented write-buffer façade (C6) over `tq_skiplist`'s concurrent
//! two-queue skip list (C1-C5).
//!
//! The outer database (WAL writer, compaction, version edits, SSTable I/O, snapshot sequence
//! assignment) is an external collaborator this crate does not implement -- see `spec.md` §1.

mod error;
mod memtable;
mod options;

pub use crate::error::{OutOfSequenceNumbers, SequenceNumber};
pub use crate::memtable::{HotCarryOver, Iter, LookupResult, TQMemTable, WriteAccess};
pub use crate::options::TQMemTableOptions;

pub use tq_skiplist::{EntryType, InternalKeyComparator};
