//! `TQMemTable` (C6): the entry-oriented write-buffer façade over `tq_skiplist`'s 2Q-skiplist.

use seekable_iterator::Comparator;

use tq_skiplist::{
    encode_entry, encoded_len, parse_entry, parse_user_key, EntryType, TwoQueueSkipList,
};

use crate::error::SequenceNumber;
use crate::options::TQMemTableOptions;


/// The entry-oriented write buffer (`spec.md` §4.5). Owns a single [`TwoQueueSkipList`] and its
/// arena; the whole thing is reclaimed as a unit when the last `Arc<TQMemTable<_>>` handed out by
/// the outer database drops (`spec.md`'s `Ref`/`Unref`, realized as ordinary `Arc` refcounting --
/// see `DESIGN.md`).
#[derive(Debug)]
pub struct TQMemTable<Cmp> {
    list: TwoQueueSkipList<Cmp>,
}

impl<Cmp> TQMemTable<Cmp> {
    /// Construct an empty write buffer over the given comparator and size budget.
    #[must_use]
    pub fn new(cmp: Cmp, options: TQMemTableOptions) -> Self {
        Self {
            list: TwoQueueSkipList::new(cmp, options.write_buffer_size, options.size_factor),
        }
    }

    /// A close lower bound on the arena bytes this memtable has allocated.
    #[must_use]
    pub fn approximate_memory_usage(&self) -> usize {
        self.list.allocated_bytes()
    }

    /// The current byte total of the cold FIFO region.
    #[must_use]
    pub fn approximate_cold_area(&self) -> usize {
        self.list.cold_area_size()
    }

    /// The current byte total of the hot FIFO region.
    #[must_use]
    pub fn approximate_normal_area(&self) -> usize {
        self.list.normal_area_size()
    }
}

impl<Cmp: Comparator<[u8]>> TQMemTable<Cmp> {
    /// Look up the newest version of `user_key` visible at `snapshot` (`spec.md` §4.5 `Get`).
    ///
    /// The sequence filter is inherent in the skip list's ordering: seeking with `snapshot` as
    /// the lookup tag lands on the newest version with sequence number `<= snapshot`.
    #[must_use]
    pub fn get(&self, user_key: &[u8], snapshot: SequenceNumber) -> LookupResult<'_> {
        let lookup_len = encoded_len(user_key, &[]);
        let mut lookup_entry = vec![0_u8; lookup_len];
        // `EntryType::Value` is the greatest type tag, so this lookup entry sorts at or before
        // every real entry for `user_key` with sequence number `<= snapshot`, and strictly after
        // every real entry with a greater sequence number.
        encode_entry(&mut lookup_entry, snapshot.inner(), EntryType::Value, user_key, &[]);

        let mut iter = self.list.iter();
        iter.seek(&lookup_entry);

        match iter.current() {
            Some(entry) if parse_user_key(entry) == user_key => {
                let view = parse_entry(entry);
                match view.entry_type {
                    EntryType::Value    => LookupResult::Found(view.value),
                    EntryType::Deletion => LookupResult::Deleted,
                }
            },
            _ => LookupResult::NotFound,
        }
    }

    /// An ordered cursor over every live entry, newest-to-oldest duplicates of a key together.
    #[must_use]
    pub fn new_iterator(&self) -> Iter<'_, Cmp> {
        Iter { inner: self.list.iter() }
    }

    /// Obtain write access to this memtable.
    ///
    /// # Safety
    /// The returned [`WriteAccess`] must be the only one in existence for this `TQMemTable`,
    /// across every thread, for its entire lifetime -- identical to the contract of
    /// [`TwoQueueSkipList::externally_synchronized`], which this forwards to.
    #[must_use]
    pub unsafe fn externally_synchronized(&self) -> WriteAccess<'_, Cmp> {
        WriteAccess {
            // SAFETY: forwarded to the caller's obligation.
            inner: unsafe { self.list.externally_synchronized() },
        }
    }
}

/// The outcome of [`TQMemTable::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResult<'a> {
    /// The newest visible version is a value.
    Found(&'a [u8]),
    /// The newest visible version is a tombstone; the caller should report `NotFound`, not keep
    /// searching older structures for a stale value.
    Deleted,
    /// No version of this user key is visible at the requested snapshot.
    NotFound,
}

/// Write access to a [`TQMemTable`], obtained through
/// [`TQMemTable::externally_synchronized`].
#[derive(Debug)]
pub struct WriteAccess<'a, Cmp> {
    inner: tq_skiplist::WriteAccess<'a, Cmp>,
}

impl<Cmp: Comparator<[u8]>> WriteAccess<'_, Cmp> {
    /// Encode and insert one entry (`spec.md` §4.5 `Add`).
    pub fn add(
        &mut self,
        seq:        SequenceNumber,
        entry_type: EntryType,
        user_key:   &[u8],
        value:      &[u8],
    ) {
        tracing::trace!(seq = seq.inner(), ?entry_type, key_len = user_key.len(), "memtable add");
        self.inner.insert(seq.inner(), entry_type, user_key, value);
    }

    /// Partition this memtable for flush (`spec.md` §4.5 `CreateNewAndImm`): drain the hot
    /// region into a [`HotCarryOver`] and leave this memtable holding only the cold remnant.
    ///
    /// Returns the carry-over set and whether any cold (flushable) data remains.
    pub fn create_new_and_imm(&mut self) -> (HotCarryOver, bool) {
        let (raw_entries, has_cold) = self.inner.seperate();
        tracing::debug!(
            hot_count = raw_entries.len(),
            has_cold,
            "memtable seperated for flush",
        );
        (HotCarryOver { raw_entries }, has_cold)
    }

    /// Re-insert every entry a prior [`WriteAccess::create_new_and_imm`] carried over, preserving
    /// each entry's original `(seq, type)` tag verbatim (`spec.md` §4.5 `Substitute`).
    pub fn substitute(&mut self, hot: &HotCarryOver) {
        for entry in &hot.raw_entries {
            self.inner.insert_encoded_copy(entry);
        }
    }
}

/// The hot entries carried out of a memtable by [`WriteAccess::create_new_and_imm`], destined to
/// be re-inserted into a successor memtable via [`WriteAccess::substitute`].
///
/// Each entry is a byte-identical copy of what was originally encoded by `Add` -- tag included --
/// so `Substitute` never re-derives a sequence number for carried-over data.
#[derive(Debug, Clone)]
pub struct HotCarryOver {
    raw_entries: Vec<Vec<u8>>,
}

impl HotCarryOver {
    /// Whether any entries were carried over.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_entries.is_empty()
    }

    /// The number of entries carried over.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw_entries.len()
    }

    /// Decode the carried-over set into `(user_key, value)` pairs, per `spec.md` §4.4 `Seperate`'s
    /// described contract. Tombstones are included with an empty value, matching how `Add`
    /// encodes a deletion.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&[u8], &[u8])> {
        self.raw_entries
            .iter()
            .map(|entry| {
                let view = parse_entry(entry);
                (view.user_key, view.value)
            })
            .collect()
    }
}

/// An ordered, seekable cursor over a [`TQMemTable`]'s entries.
#[derive(Debug)]
pub struct Iter<'a, Cmp> {
    inner: tq_skiplist::Iter<'a, Cmp>,
}

impl<'a, Cmp: Comparator<[u8]>> Iter<'a, Cmp> {
    #[must_use]
    pub fn valid(&self) -> bool {
        self.inner.valid()
    }

    /// The current entry's user key, or `None` if the cursor is not positioned on an entry.
    #[must_use]
    pub fn key(&self) -> Option<&'a [u8]> {
        self.inner.current().map(parse_user_key)
    }

    /// The current entry's value (`None` for a tombstone), or `None` if the cursor is invalid.
    #[must_use]
    pub fn value(&self) -> Option<Option<&'a [u8]>> {
        self.inner.current().map(|entry| {
            let view = parse_entry(entry);
            match view.entry_type {
                EntryType::Value    => Some(view.value),
                EntryType::Deletion => None,
            }
        })
    }

    pub fn next(&mut self) {
        self.inner.next();
    }

    pub fn prev(&mut self) {
        self.inner.prev();
    }

    /// Seek to the newest version of `user_key` visible at `snapshot`, or the next user key in
    /// order if none exists.
    pub fn seek(&mut self, user_key: &[u8], snapshot: SequenceNumber) {
        let lookup_len = encoded_len(user_key, &[]);
        let mut lookup_entry = vec![0_u8; lookup_len];
        encode_entry(&mut lookup_entry, snapshot.inner(), EntryType::Value, user_key, &[]);
        self.inner.seek(&lookup_entry);
    }

    pub fn seek_to_first(&mut self) {
        self.inner.seek_to_first();
    }

    pub fn seek_to_last(&mut self) {
        self.inner.seek_to_last();
    }
}
