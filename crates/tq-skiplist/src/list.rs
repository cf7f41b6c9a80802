#![expect(
    unsafe_code,
    reason = "reconstruct link lifetimes erased for atomic storage, and assert that the \
              self-referential arena handle outlives every reference handed out of it",
)]

//! The two-queue skip list itself (C5): an ordered, concurrent map plus an insertion-order FIFO
//! chain split into hot/cold/obsolete regions.

use std::sync::atomic::Ordering;
use std::sync::PoisonError;

use bumpalo_herd::{Herd, Member};
use oorandom::Rand32;
use seekable_iterator::Comparator;
use yoke::{Yoke, Yokeable};

use crate::entry::{parse_entry, parse_seq, parse_user_key, EntryType};
use crate::height::{random_height, DEFAULT_SEED, MAX_HEIGHT};
use crate::maybe_loom::{AtomicUsize, Mutex};
use crate::node::{Link, Node};


#[derive(Yokeable, Debug)]
struct MemberYokeable<'cart> {
    member: Member<'cart>,
}

/// A concurrent, arena-backed two-queue skip list.
///
/// Ordered search methods (`contains`, `iter`, `seek`) take `&self` and may run from any number
/// of threads concurrently with a single writer. Mutating operations, reached through
/// [`Self::externally_synchronized`], require the caller to guarantee writer exclusivity — this
/// type never acquires a lock to provide it itself, matching `spec.md` §5's single-writer,
/// multi-reader scheduling model.
#[derive(Debug)]
pub struct TwoQueueSkipList<Cmp> {
    cmp: Cmp,

    /// Self-referential: `arena`'s dependent value borrows from the boxed [`Herd`] that is its
    /// own cart. The `Herd` is heap-allocated via `Box` and is never moved again, so references
    /// into it (stored, lifetime-erased, in every [`crate::node::AtomicLink`] below) stay valid
    /// for as long as this `TwoQueueSkipList` exists.
    arena: Yoke<MemberYokeable<'static>, Box<Herd>>,

    /// The ordered skip-list's own sentinel forward pointers; `head[level]` is the first node at
    /// `level` in sorted order, or `None`.
    head: [crate::node::AtomicLink; MAX_HEIGHT],
    max_height: AtomicUsize,

    /// Doubles as the insertion write-lock: acquiring it briefly to draw a height also serializes
    /// concurrent misuse of the single-writer contract into a panic instead of silent corruption.
    rng: Mutex<Rand32>,

    /// Hot-region FIFO head (oldest still-hot node), or `None` if the hot region is empty.
    normal_head: crate::node::AtomicLink,
    /// Cold-region FIFO head (oldest cold node), or `None` if nothing has been frozen yet.
    cold_head: crate::node::AtomicLink,
    /// FIFO tail: the most recently inserted live node.
    cur_node: crate::node::AtomicLink,
    /// The most recently frozen node (the new boundary between hot and cold).
    cur_cold_node: crate::node::AtomicLink,
    /// LIFO head of retired (superseded) nodes, unreachable from the ordered chain until
    /// [`WriteAccess::seperate`] additionally unlinks them.
    obsolete: crate::node::AtomicLink,

    normal_area_size: AtomicUsize,
    cold_area_size: AtomicUsize,
    /// A close lower bound on total arena bytes allocated so far (node headers, skip arrays, and
    /// entry bytes). Bumpalo's own arenas don't expose a ready total, so this is tracked by hand,
    /// the same way `anchored-leveldb`'s memtable skiplists track `allocated_bytes`.
    allocated_bytes: AtomicUsize,

    option_normal_size: usize,
    size_factor: f32,
}

// SAFETY: every field either is `Sync` on its own (the atomics, the `Mutex`), or is the `Yoke`
// arena handle, whose dependent `Member` is itself `Sync` (bumpalo_herd's whole point), and whose
// cart (`Box<Herd>`) is `Sync` as `Herd` is designed to be shared across threads.
unsafe impl<Cmp: Sync> Sync for TwoQueueSkipList<Cmp> {}

impl<Cmp> TwoQueueSkipList<Cmp> {
    /// Construct an empty list with the LevelDB-traditional height seed.
    #[must_use]
    pub fn new(cmp: Cmp, write_buffer_size: usize, size_factor: f32) -> Self {
        Self::new_seeded(cmp, write_buffer_size, size_factor, DEFAULT_SEED)
    }

    #[must_use]
    pub fn new_seeded(cmp: Cmp, write_buffer_size: usize, size_factor: f32, seed: u64) -> Self {
        let cart = Box::new(Herd::new());
        let arena = Yoke::attach_to_cart(cart, |herd| MemberYokeable { member: herd.get() });

        Self {
            cmp,
            arena,
            head: Default::default(),
            max_height: AtomicUsize::new(1),
            rng: Mutex::new(Rand32::new(seed)),
            normal_head: Default::default(),
            cold_head: Default::default(),
            cur_node: Default::default(),
            cur_cold_node: Default::default(),
            obsolete: Default::default(),
            normal_area_size: AtomicUsize::new(0),
            cold_area_size: AtomicUsize::new(0),
            allocated_bytes: AtomicUsize::new(0),
            option_normal_size: write_buffer_size,
            size_factor,
        }
    }

    fn member(&self) -> &Member<'_> {
        &self.arena.get().member
    }

    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn normal_area_size(&self) -> usize {
        self.normal_area_size.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn cold_area_size(&self) -> usize {
        self.cold_area_size.load(Ordering::Relaxed)
    }

    fn max_height(&self) -> usize {
        self.max_height.load(Ordering::Relaxed)
    }

    fn head_skip(&self) -> impl Fn(usize) -> Link<'_> {
        move |level| {
            // SAFETY: the backing `Herd` is owned by `self.arena` and lives at least as long as
            // this `&self` borrow.
            unsafe { self.head[level].load(Ordering::Acquire) }
        }
    }

    fn set_head_skip(&self, level: usize, link: Link<'_>) {
        self.head[level].store(link, Ordering::Release);
    }

    /// Get the forward pointer at `level` from `x`, or from the ordered sentinel if `x` is `None`.
    fn skip_at<'s>(&'s self, x: Link<'s>, level: usize) -> Link<'s> {
        match x {
            None => (self.head_skip())(level),
            // SAFETY: `x`'s own `'s` lifetime already asserts the backing `Herd` outlives `'s`.
            Some(node) => unsafe { node.load_skip(level, Ordering::Acquire) },
        }
    }

    /// Standard skip-list descent. If `prev` is provided, `prev[i]` receives the last node at
    /// level `i` whose key is strictly less than `key` (or `None` for the sentinel).
    fn find_greater_or_equal<'s>(
        &'s self,
        key: &[u8],
        prev: &mut [Link<'s>; MAX_HEIGHT],
    ) -> Link<'s> {
        let mut x: Link<'s> = None;
        let mut level = self.max_height() - 1;
        loop {
            let next = self.skip_at(x, level);
            let is_after = next.is_some_and(|n| self.cmp.cmp(n.entry(), key) == std::cmp::Ordering::Less);
            if is_after {
                x = next;
            } else {
                prev[level] = x;
                if level == 0 {
                    return next;
                }
                level -= 1;
            }
        }
    }

    fn find_less_than<'s>(&'s self, key: &[u8]) -> Link<'s> {
        let mut x: Link<'s> = None;
        let mut level = self.max_height() - 1;
        loop {
            let next = self.skip_at(x, level);
            let keep_going = next.is_some_and(|n| {
                self.cmp.cmp(n.entry(), key) == std::cmp::Ordering::Less
            });
            if keep_going {
                x = next;
            } else if level == 0 {
                return x;
            } else {
                level -= 1;
            }
        }
    }

    fn find_last<'s>(&'s self) -> Link<'s> {
        let mut x: Link<'s> = None;
        let mut level = self.max_height() - 1;
        loop {
            match self.skip_at(x, level) {
                Some(n) => x = Some(n),
                None if level == 0 => return x,
                None => level -= 1,
            }
        }
    }

    /// Starting from `node`, walk `next[0]` while the successor shares `node`'s user key, and
    /// return the last such node — the oldest duplicate of that user key still in the ordered
    /// chain.
    fn find_no_smaller<'s>(&'s self, node: &'s Node<'s>) -> &'s Node<'s> {
        let user_key = parse_user_key(node.entry());
        let mut x = node;
        loop {
            // SAFETY: the backing `Herd` outlives `'s`, same as `node` itself.
            let next = unsafe { x.load_skip(0, Ordering::Acquire) };
            match next {
                Some(n) if parse_user_key(n.entry()) == user_key => x = n,
                _ => return x,
            }
        }
    }
}

impl<Cmp: Comparator<[u8]>> TwoQueueSkipList<Cmp> {
    /// Check whether an entry comparing equal to `entry` is present.
    #[must_use]
    pub fn contains(&self, entry: &[u8]) -> bool {
        let mut prev = [None; MAX_HEIGHT];
        self.find_greater_or_equal(entry, &mut prev)
            .is_some_and(|n| self.cmp.cmp(n.entry(), entry) == std::cmp::Ordering::Equal)
    }

    #[must_use]
    pub fn iter(&self) -> Iter<'_, Cmp> {
        Iter { list: self, current: None }
    }

    /// Obtain write access to this list.
    ///
    /// # Safety
    /// The returned [`WriteAccess`] must be the only one in existence for this
    /// `TwoQueueSkipList`, across every thread, for its entire lifetime. It suffices to never
    /// call this method again until the previously returned `WriteAccess` has been dropped, and
    /// to never call it from more than one thread at a time for the same `TwoQueueSkipList`.
    #[must_use]
    pub unsafe fn externally_synchronized(&self) -> WriteAccess<'_, Cmp> {
        WriteAccess { list: self }
    }

    fn node_overhead(height: usize) -> usize {
        size_of::<Node<'static>>() + height * size_of::<crate::node::AtomicLink>()
    }
}

/// A lock giving exclusive (writer) access to a [`TwoQueueSkipList`], obtained through
/// [`TwoQueueSkipList::externally_synchronized`].
#[derive(Debug)]
pub struct WriteAccess<'a, Cmp> {
    list: &'a TwoQueueSkipList<Cmp>,
}

impl<Cmp: Comparator<[u8]>> WriteAccess<'_, Cmp> {
    /// Encode `(seq, entry_type, user_key, value)` into the arena and insert it (`spec.md` §4.4
    /// `Insert`).
    pub fn insert(&mut self, seq: u64, entry_type: EntryType, user_key: &[u8], value: &[u8]) {
        let entry_len = crate::entry::encoded_len(user_key, value);
        let member = self.list.member();
        let entry: &mut [u8] = member.alloc_slice_fill_default(entry_len);
        crate::entry::encode_entry(entry, seq, entry_type, user_key, value);
        // Reborrow as immutable now that encoding is done; the arena never hands out a second
        // mutable view of these bytes.
        let entry: &[u8] = entry;
        self.insert_entry(entry);
    }

    /// Copy already-encoded entry bytes into this list's own arena and insert them, preserving
    /// their original `(seq, type)` tag. Used by a successor memtable's `Substitute` to carry
    /// hot entries forward without re-deriving sequence numbers.
    pub fn insert_encoded_copy(&mut self, entry: &[u8]) {
        let member = self.list.member();
        let copied: &[u8] = member.alloc_slice_copy(entry);
        self.insert_entry(copied);
    }

    fn insert_entry<'s>(&'s mut self, entry: &'s [u8])
    where
        Cmp: 's,
    {
        let list = self.list;

        let mut prev: [Link<'s>; MAX_HEIGHT] = [None; MAX_HEIGHT];
        let succ = list.find_greater_or_equal(entry, &mut prev);
        debug_assert!(
            succ.is_none_or(|s| !std::ptr::eq(s.entry(), entry)),
            "sequence numbers strictly increase, so two entries can never be byte-identical",
        );
        let is_duplicate = succ.is_some_and(|s| parse_user_key(s.entry()) == parse_user_key(entry));

        let height = {
            let mut rng = list.rng.lock().unwrap_or_else(PoisonError::into_inner);
            random_height(&mut rng)
        };

        let old_max_height = list.max_height();
        if height > old_max_height {
            for level in prev.iter_mut().take(height).skip(old_max_height) {
                *level = None;
            }
            list.max_height.store(height, Ordering::Relaxed);
        }

        let node_size = TwoQueueSkipList::<Cmp>::node_overhead(height) + entry.len();
        let member = list.member();
        let x = Node::new(member, height, entry, node_size);
        list.allocated_bytes.fetch_add(node_size, Ordering::Relaxed);

        let new_normal_size =
            list.normal_area_size.fetch_add(node_size, Ordering::Relaxed) + node_size;
        let hot_cap = f64::from(list.size_factor) * (list.option_normal_size as f64);
        if (new_normal_size as f64) > hot_cap {
            Self::freeze_nodes(list, node_size);
        }

        for level in 0..height {
            let prev_at_level = prev[level];
            let successor = list.skip_at(prev_at_level, level);
            x.store_skip(level, successor, Ordering::Relaxed);
            match prev_at_level {
                None => list.set_head_skip(level, Some(x)),
                Some(p) => p.store_skip(level, Some(x), Ordering::Release),
            }
        }

        // SAFETY: `cur_node`, if set, references a node allocated in this arena.
        let prev_tail = unsafe { list.cur_node.load::<'s>(Ordering::Acquire) };
        if let Some(cur) = prev_tail {
            cur.store_follow(Some(x), Ordering::Release);
        }
        x.store_precede(prev_tail, Ordering::Release);
        x.store_follow(None, Ordering::Release);

        let was_empty = list.normal_head.is_null(Ordering::Relaxed)
            && list.cold_head.is_null(Ordering::Relaxed);
        if was_empty {
            list.normal_head.store(Some(x), Ordering::Relaxed);
        }
        list.cur_node.store(Some(x), Ordering::Release);

        if is_duplicate {
            #[expect(clippy::expect_used, reason = "is_duplicate implies succ is Some")]
            let elder = succ.expect("is_duplicate implies succ is Some");
            Self::thaw_node(list, elder);
        }
    }

    /// Move nodes from the hot region to the cold region until the accumulated size of the
    /// moved window exceeds `incoming_size` (`spec.md` §4.4 `FreezeNodes`). Always moves at
    /// least one node.
    fn freeze_nodes(list: &TwoQueueSkipList<Cmp>, incoming_size: usize) {
        // SAFETY: the backing `Herd` outlives `&list`.
        let Some(mut selected) = (unsafe { list.normal_head.load::<'_>(Ordering::Relaxed) }) else {
            // Nothing hot to freeze yet (e.g. a single oversized first insert).
            return;
        };
        let mut total = selected.node_size();
        while total <= incoming_size {
            // SAFETY: `selected`'s own lifetime already asserts the backing `Herd` outlives it.
            let Some(next) = (unsafe { selected.load_follow(Ordering::Relaxed) }) else {
                // The entire hot region is lighter than the incoming node (e.g. one oversized
                // insert following a lightly-loaded hot region): freeze what there is rather than
                // walking past the FIFO tail.
                break;
            };
            selected = next;
            total += selected.node_size();
        }

        let moved = total;
        // SAFETY: `selected`'s own lifetime already asserts the backing `Herd` outlives it.
        let new_hot_head = unsafe { selected.load_follow(Ordering::Relaxed) };

        list.cur_cold_node.store(Some(selected), Ordering::Relaxed);
        list.normal_head.store(new_hot_head, Ordering::Relaxed);

        if list.cold_head.is_null(Ordering::Relaxed) {
            list.cold_head.store(Some(selected), Ordering::Relaxed);
        }

        list.normal_area_size.fetch_sub(moved, Ordering::Relaxed);
        list.cold_area_size.fetch_add(moved, Ordering::Relaxed);
    }

    /// Retire `elder` — the node that `superseding` (via `succ`) just superseded — onto the
    /// obsolete chain (`spec.md` §4.4 `ThawNode`). `elder` stays linked in the ordered chain;
    /// only [`Self::seperate`] removes it from there.
    fn thaw_node<'s>(list: &'s TwoQueueSkipList<Cmp>, elder: &'s Node<'s>) {
        let elder_seq = parse_seq(elder.entry());
        // SAFETY: `normal_head`, if set, references a node allocated in this arena.
        let hot_head_seq =
            unsafe { list.normal_head.load::<'s>(Ordering::Relaxed) }.map(|n| parse_seq(n.entry()));
        let elder_is_hot = hot_head_seq.is_some_and(|hot_seq| elder_seq >= hot_seq);

        // SAFETY: `precede`/`follow`, if set, reference nodes allocated in this arena.
        let prev = unsafe { elder.load_precede::<'s>(Ordering::Acquire) };
        // SAFETY: see above.
        let next = unsafe { elder.load_follow(Ordering::Acquire) };

        if elder_is_hot {
            list.normal_area_size.fetch_sub(elder.node_size(), Ordering::Relaxed);
        } else {
            list.cold_area_size.fetch_sub(elder.node_size(), Ordering::Relaxed);
        }

        match prev {
            None => {
                if elder_is_hot {
                    list.normal_head.store(next, Ordering::Relaxed);
                } else {
                    list.cold_head.store(next, Ordering::Relaxed);
                }
                if let Some(n) = next {
                    n.store_precede(None, Ordering::Relaxed);
                }
            },
            Some(p) => {
                p.store_follow(next, Ordering::Release);
                if let Some(n) = next {
                    n.store_precede(Some(p), Ordering::Release);
                }
            },
        }

        // SAFETY: `obsolete`, if set, references a node allocated in this arena.
        let old_obsolete = unsafe { list.obsolete.load::<'s>(Ordering::Relaxed) };
        elder.store_follow(old_obsolete, Ordering::Relaxed);
        list.obsolete.store(Some(elder), Ordering::Release);
    }

    /// Partition the list for flush (`spec.md` §4.4 `Seperate`): drain the hot region into a
    /// carry-over list of raw encoded-entry bytes (oldest-inserted-but-still-hot first), then
    /// unlink every hot and obsolete node from the ordered chain, leaving one live cold node per
    /// surviving user key.
    ///
    /// Each returned entry is a byte-identical copy of what `Insert` originally encoded, tag and
    /// all — callers that only need `(user_key, value)` pairs can recover them with
    /// [`crate::parse_entry`]; callers (like `tq-memtable`'s `Substitute`) that need to preserve
    /// the original `(seq, type)` tag when carrying an entry into a successor structure get that
    /// for free, since nothing here re-derives it.
    ///
    /// Returns the carry-over entries and whether any cold node remains.
    pub fn seperate(&mut self) -> (Vec<Vec<u8>>, bool) {
        let list = self.list;

        // SAFETY: `normal_head`, if set, references a node allocated in this arena.
        let Some(hot_head) = (unsafe { list.normal_head.load::<'_>(Ordering::Acquire) }) else {
            return (Vec::new(), (list.head_skip())(0).is_some());
        };
        let guard_seq = parse_seq(hot_head.entry());

        let mut hot_entries = Vec::new();
        let mut fifo_cursor = Some(hot_head);
        while let Some(node) = fifo_cursor {
            hot_entries.push(node.entry().to_vec());
            // SAFETY: `follow`, if set, references a node allocated in this arena.
            fifo_cursor = unsafe { node.load_follow(Ordering::Acquire) };
        }

        let mut cursor = (list.head_skip())(0);
        while let Some(node) = cursor {
            if parse_seq(node.entry()) < guard_seq {
                break;
            }
            let run_end = list.find_no_smaller(node);
            // SAFETY: next[0], if set, references a node allocated in this arena.
            cursor = unsafe { run_end.load_skip(0, Ordering::Acquire) };
        }
        list.set_head_skip(0, cursor);

        let Some(mut live) = cursor else {
            return (hot_entries, false);
        };

        loop {
            let run_end = list.find_no_smaller(live);
            // SAFETY: next[0], if set, references a node allocated in this arena.
            let mut candidate = unsafe { run_end.load_skip(0, Ordering::Acquire) };

            // A hot (or obsolete-of-a-hot) run can also occur *after* the first cold node, not
            // just as the chain's prefix the loop above stripped; skip every such run here too,
            // mirroring the C++ reference's `if (next_seq < guard_seq)` guard on this same walk.
            while let Some(next) = candidate {
                if parse_seq(next.entry()) < guard_seq {
                    break;
                }
                let next_run_end = list.find_no_smaller(next);
                // SAFETY: next[0], if set, references a node allocated in this arena.
                candidate = unsafe { next_run_end.load_skip(0, Ordering::Acquire) };
            }

            match candidate {
                Some(next) => {
                    live.store_skip(0, Some(next), Ordering::Release);
                    live = next;
                },
                None => {
                    live.store_skip(0, None, Ordering::Release);
                    break;
                },
            }
        }

        (hot_entries, true)
    }
}

/// An ordered, seekable cursor over the skip list's level-0 chain.
#[derive(Debug)]
pub struct Iter<'a, Cmp> {
    list: &'a TwoQueueSkipList<Cmp>,
    current: Link<'a>,
}

impl<'a, Cmp: Comparator<[u8]>> Iter<'a, Cmp> {
    #[must_use]
    pub fn valid(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&'a [u8]> {
        self.current.map(Node::entry)
    }

    pub fn next(&mut self) {
        if let Some(node) = self.current {
            // SAFETY: `node`'s own lifetime already asserts the backing `Herd` outlives it.
            self.current = unsafe { node.load_skip(0, Ordering::Acquire) };
        }
    }

    pub fn prev(&mut self) {
        self.current = self.current.and_then(|node| self.list.find_less_than(node.entry()));
    }

    pub fn seek(&mut self, target: &[u8]) {
        let mut prev = [None; MAX_HEIGHT];
        self.current = self.list.find_greater_or_equal(target, &mut prev);
    }

    pub fn seek_to_first(&mut self) {
        self.current = (self.list.head_skip())(0);
    }

    pub fn seek_to_last(&mut self) {
        self.current = self.list.find_last();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::InternalKeyComparator;

    fn new_list() -> TwoQueueSkipList<InternalKeyComparator> {
        TwoQueueSkipList::new(InternalKeyComparator, 1 << 20, 0.2)
    }

    fn collect_user_keys(list: &TwoQueueSkipList<InternalKeyComparator>) -> Vec<Vec<u8>> {
        let mut iter = list.iter();
        iter.seek_to_first();
        let mut out = Vec::new();
        while let Some(entry) = iter.current() {
            out.push(parse_user_key(entry).to_vec());
            iter.next();
        }
        out
    }

    #[test]
    fn insert_and_get_latest_version() {
        let list = new_list();
        // SAFETY: single-threaded test, one write-access borrow at a time.
        let mut write = unsafe { list.externally_synchronized() };
        write.insert(1, EntryType::Value, b"5", b"0");
        write.insert(2, EntryType::Value, b"5", b"1");
        write.insert(3, EntryType::Value, b"5", b"2");
        drop(write);

        let mut iter = list.iter();
        iter.seek_to_first();
        assert_eq!(parse_entry(iter.current().unwrap()).value, b"2");
    }

    #[test]
    fn fifo_chain_matches_insertion_then_thaw() {
        let list = new_list();
        // SAFETY: see above.
        let mut write = unsafe { list.externally_synchronized() };
        write.insert(1, EntryType::Value, b"a", b"x");
        write.insert(2, EntryType::Value, b"b", b"y");
        write.insert(3, EntryType::Value, b"a", b"z");
        drop(write);

        // Ordered chain: a@3, b@2, a@1 (older a still present until Seperate).
        let ordered = collect_user_keys(&list);
        assert_eq!(ordered, vec![b"a".to_vec(), b"b".to_vec(), b"a".to_vec()]);
    }

    #[test]
    fn many_versions_of_one_key_stay_in_ordered_chain() {
        let list = new_list();
        // SAFETY: see above.
        let mut write = unsafe { list.externally_synchronized() };
        for seq in 1..=500_u64 {
            write.insert(seq, EntryType::Value, b"1", format!("{seq}").as_bytes());
        }
        drop(write);

        assert_eq!(collect_user_keys(&list).len(), 500);

        let mut iter = list.iter();
        iter.seek_to_first();
        assert_eq!(parse_entry(iter.current().unwrap()).value, b"500");
    }

    #[test]
    fn hot_region_stays_near_its_cap() {
        let list = TwoQueueSkipList::new(InternalKeyComparator, 5000, 0.2);
        // SAFETY: see above.
        let mut write = unsafe { list.externally_synchronized() };
        for i in 0..100_u64 {
            let key = format!("key-{i:04}");
            write.insert(i + 1, EntryType::Value, key.as_bytes(), b"0123456789012345678901234567890123456789012345678901234567890123456789");
            assert!(list.normal_area_size() <= 1000 + 200, "hot region drifted far past its cap");
        }
        assert!(list.cold_area_size() > 0, "cold region should have accumulated overflow");
    }

    #[test]
    fn seperate_with_only_hot_data_returns_no_cold_remainder() {
        let list = TwoQueueSkipList::new(InternalKeyComparator, 1 << 20, 0.2);
        // SAFETY: see above.
        let mut write = unsafe { list.externally_synchronized() };
        write.insert(1, EntryType::Value, b"a", b"1");
        write.insert(2, EntryType::Value, b"b", b"2");
        write.insert(3, EntryType::Value, b"c", b"3");
        let (hot_entries, has_cold) = write.seperate();
        drop(write);

        assert!(!has_cold);
        let mut user_keys: Vec<_> = hot_entries.iter().map(|e| parse_user_key(e).to_vec()).collect();
        user_keys.sort();
        assert_eq!(user_keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
        assert!(collect_user_keys(&list).is_empty());
    }
}
