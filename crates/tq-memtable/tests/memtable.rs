//! Integration tests exercising `spec.md` §8's round-trip laws and scenarios at the
//! `TQMemTable` façade level.

use tq_memtable::{
    EntryType, InternalKeyComparator, LookupResult, SequenceNumber, TQMemTable, TQMemTableOptions,
};

fn seq(n: u64) -> SequenceNumber {
    SequenceNumber::new_usable(n).expect("test sequence numbers fit comfortably")
}

fn new_table() -> TQMemTable<InternalKeyComparator> {
    TQMemTable::new(InternalKeyComparator, TQMemTableOptions::default())
}

#[test]
fn add_then_get_returns_the_written_value() {
    let table = new_table();
    // SAFETY: single-threaded test, one write-access borrow at a time.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"u", b"v");
    drop(write);

    assert_eq!(table.get(b"u", seq(1)), LookupResult::Found(b"v"));
}

#[test]
fn newer_value_shadows_older_at_a_later_snapshot_but_not_an_earlier_one() {
    let table = new_table();
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"u", b"v1");
    write.add(seq(2), EntryType::Value, b"u", b"v2");
    drop(write);

    assert_eq!(table.get(b"u", seq(1)), LookupResult::Found(b"v1"));
    assert_eq!(table.get(b"u", seq(2)), LookupResult::Found(b"v2"));
    assert_eq!(table.get(b"u", seq(10)), LookupResult::Found(b"v2"));
}

#[test]
fn deletion_after_a_value_reports_deleted_at_or_after_its_sequence() {
    let table = new_table();
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"u", b"v1");
    write.add(seq(2), EntryType::Deletion, b"u", b"");
    drop(write);

    assert_eq!(table.get(b"u", seq(1)), LookupResult::Found(b"v1"));
    assert_eq!(table.get(b"u", seq(2)), LookupResult::Deleted);
    assert_eq!(table.get(b"u", seq(99)), LookupResult::Deleted);
}

#[test]
fn unknown_key_is_not_found() {
    let table = new_table();
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"present", b"v");
    drop(write);

    assert_eq!(table.get(b"absent", seq(1)), LookupResult::NotFound);
}

/// `spec.md` §8 scenario 1: three versions of one key, `Get` returns the latest.
#[test]
fn three_versions_of_one_key_returns_the_latest() {
    let table = new_table();
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"5", b"0");
    write.add(seq(2), EntryType::Value, b"5", b"1");
    write.add(seq(3), EntryType::Value, b"5", b"2");
    drop(write);

    assert_eq!(table.get(b"5", seq(3)), LookupResult::Found(b"2"));
}

#[test]
fn create_new_and_imm_carries_hot_entries_with_their_original_tags() {
    let table = new_table();
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"a", b"1");
    write.add(seq(2), EntryType::Value, b"b", b"2");

    let (hot, has_cold) = write.create_new_and_imm();
    drop(write);

    assert!(!has_cold);
    assert_eq!(hot.len(), 2);
    let mut pairs: Vec<_> = hot.pairs().into_iter().map(|(k, v)| (k.to_vec(), v.to_vec())).collect();
    pairs.sort();
    assert_eq!(pairs, vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())]);
}

#[test]
fn substitute_reinserts_hot_entries_into_a_successor_preserving_lookups() {
    let old_table = new_table();
    // SAFETY: see above.
    let mut old_write = unsafe { old_table.externally_synchronized() };
    old_write.add(seq(1), EntryType::Value, b"a", b"1");
    old_write.add(seq(2), EntryType::Value, b"b", b"2");
    let (hot, has_cold) = old_write.create_new_and_imm();
    drop(old_write);
    assert!(!has_cold);

    let new_table = new_table();
    // SAFETY: see above.
    let mut new_write = unsafe { new_table.externally_synchronized() };
    new_write.substitute(&hot);
    drop(new_write);

    assert_eq!(new_table.get(b"a", seq(1)), LookupResult::Found(b"1"));
    assert_eq!(new_table.get(b"b", seq(2)), LookupResult::Found(b"2"));
}

/// A hot key that sorts between two cold keys must end up in the hot carry-over set returned by
/// `create_new_and_imm`, and nowhere else -- not also still reachable through `Get` on the
/// now-cold-only remnant memtable.
#[test]
fn create_new_and_imm_strips_a_hot_key_sandwiched_between_cold_keys() {
    let table = TQMemTable::new(
        InternalKeyComparator,
        TQMemTableOptions { write_buffer_size: 5000, size_factor: 0.2 },
    );
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };

    let value = vec![b'v'; 80];
    write.add(seq(1), EntryType::Value, b"a", &value);
    write.add(seq(2), EntryType::Value, b"z", &value);
    for i in 0..20_u64 {
        let key = format!("filler-{i:04}");
        write.add(seq(i + 3), EntryType::Value, key.as_bytes(), &value);
    }
    write.add(seq(100), EntryType::Value, b"m", b"hot-m");

    let (hot, has_cold) = write.create_new_and_imm();
    drop(write);

    assert!(has_cold);
    let hot_keys: Vec<_> = hot.pairs().into_iter().map(|(k, _)| k.to_vec()).collect();
    assert!(hot_keys.contains(&b"m".to_vec()), "\"m\" was still hot and must be carried over");

    assert_eq!(table.get(b"m", seq(100)), LookupResult::NotFound);
    assert_eq!(table.get(b"a", seq(1)), LookupResult::Found(&value[..]));
    assert_eq!(table.get(b"z", seq(2)), LookupResult::Found(&value[..]));
}

#[test]
fn approximate_areas_track_insert_activity() {
    let table = TQMemTable::new(
        InternalKeyComparator,
        TQMemTableOptions { write_buffer_size: 5000, size_factor: 0.2 },
    );
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    let value = vec![b'v'; 60];
    for i in 0..100_u64 {
        let key = format!("key-{i:04}");
        write.add(seq(i + 1), EntryType::Value, key.as_bytes(), &value);
    }
    drop(write);

    assert!(table.approximate_normal_area() <= 1000 + 256);
    assert!(table.approximate_cold_area() > 0);
    assert!(table.approximate_memory_usage() >= table.approximate_normal_area() + table.approximate_cold_area());
}

#[test]
fn iterator_walks_entries_in_internal_key_order() {
    let table = new_table();
    // SAFETY: see above.
    let mut write = unsafe { table.externally_synchronized() };
    write.add(seq(1), EntryType::Value, b"a", b"x");
    write.add(seq(2), EntryType::Value, b"b", b"y");
    write.add(seq(3), EntryType::Value, b"a", b"z");
    drop(write);

    let mut iter = table.new_iterator();
    iter.seek_to_first();

    assert_eq!(iter.key(), Some(b"a".as_slice()));
    assert_eq!(iter.value(), Some(Some(b"z".as_slice())));
    iter.next();
    assert_eq!(iter.key(), Some(b"b".as_slice()));
    iter.next();
    assert_eq!(iter.key(), Some(b"a".as_slice()));
    assert_eq!(iter.value(), Some(Some(b"x".as_slice())));
    iter.next();
    assert!(!iter.valid());
}
