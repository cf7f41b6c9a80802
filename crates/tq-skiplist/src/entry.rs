//! The encoded-entry byte layout stored at each node, and the codec that packs/unpacks it.
//!
//! ```text
//! [ varint: ikey_len = user_key_len + 8 ]
//! [ user_key bytes, length = user_key_len ]
//! [ 8 bytes little-endian: (seq << 8) | type ]
//! [ varint: value_len ]
//! [ value bytes ]
//! ```

use integer_encoding::VarInt;

/// The largest sequence number the tag's 56 reserved bits can hold.
pub const MAX_SEQUENCE_NUMBER: u64 = (1 << 56) - 1;

/// Whether an entry records a value or a tombstone.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    Deletion = 0,
    Value    = 1,
}

impl TryFrom<u8> for EntryType {
    type Error = InvalidEntryType;

    #[inline]
    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Deletion),
            1 => Ok(Self::Value),
            other => Err(InvalidEntryType(other)),
        }
    }
}

/// The low byte of an entry's tag did not correspond to a known [`EntryType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidEntryType(pub u8);

#[inline]
fn tag(seq: u64, entry_type: EntryType) -> u64 {
    debug_assert!(seq <= MAX_SEQUENCE_NUMBER, "sequence number does not fit in 56 bits");
    (seq << 8) | entry_type as u64
}

/// The number of bytes [`encode_entry`] will write for the given `user_key` and `value`.
///
/// # Panics
/// Panics if `user_key.len() + 8` or `value.len()` does not fit in a `u32`.
#[must_use]
pub fn encoded_len(user_key: &[u8], value: &[u8]) -> usize {
    let ikey_len = u32::try_from(user_key.len() + 8).expect("internal key too long");
    let value_len = u32::try_from(value.len()).expect("value too long");
    ikey_len.required_space() + ikey_len as usize
        + value_len.required_space() + value_len as usize
}

/// Write an entry of exactly [`encoded_len(user_key, value)`](encoded_len) bytes into `buf`.
///
/// # Panics
/// Panics if `buf.len() != encoded_len(user_key, value)`.
pub fn encode_entry(
    buf:        &mut [u8],
    seq:        u64,
    entry_type: EntryType,
    user_key:   &[u8],
    value:      &[u8],
) {
    assert_eq!(buf.len(), encoded_len(user_key, value), "buf is not sized for this entry");

    let ikey_len = u32::try_from(user_key.len() + 8).expect("internal key too long");
    let mut offset = ikey_len.encode_var(&mut buf[..]);

    buf[offset..offset + user_key.len()].copy_from_slice(user_key);
    offset += user_key.len();

    buf[offset..offset + 8].copy_from_slice(&tag(seq, entry_type).to_le_bytes());
    offset += 8;

    let value_len = u32::try_from(value.len()).expect("value too long");
    offset += value_len.encode_var(&mut buf[offset..]);
    buf[offset..offset + value.len()].copy_from_slice(value);
}

/// Read the leading `ikey_len` varint and the `user_key` bytes that follow it.
///
/// Returns `(user_key, bytes_consumed)`, where `bytes_consumed` is the length of the varint plus
/// the user key plus the 8-byte tag — i.e. the offset of the value-length varint.
fn read_user_key(entry: &[u8]) -> (&[u8], usize) {
    let (ikey_len, varint_len): (u32, usize) =
        VarInt::decode_var(entry).expect("entry is not corrupted");
    let ikey_len = ikey_len as usize;
    let user_key_len = ikey_len - 8;
    let user_key = &entry[varint_len..varint_len + user_key_len];
    (user_key, varint_len + ikey_len)
}

/// Extract the user-key bytes from an encoded entry.
#[must_use]
pub fn parse_user_key(entry: &[u8]) -> &[u8] {
    read_user_key(entry).0
}

fn tag_bytes(entry: &[u8]) -> [u8; 8] {
    let (_user_key, after_user_key) = read_user_key(entry);
    let tag_start = after_user_key - 8;
    entry[tag_start..tag_start + 8]
        .try_into()
        .expect("8-byte tag slice")
}

/// Extract the sequence number from an encoded entry's tag.
#[must_use]
pub fn parse_seq(entry: &[u8]) -> u64 {
    u64::from_le_bytes(tag_bytes(entry)) >> 8
}

/// Extract the raw type byte from an encoded entry's tag.
///
/// # Panics
/// Panics if the low byte of the tag is not a recognized [`EntryType`] discriminant.
#[must_use]
pub fn parse_type(entry: &[u8]) -> EntryType {
    let raw = (u64::from_le_bytes(tag_bytes(entry)) & 0xff) as u8;
    EntryType::try_from(raw).expect("entry tag has a valid type byte")
}

/// Extract the value bytes from an encoded entry.
#[must_use]
pub fn parse_value(entry: &[u8]) -> &[u8] {
    let (_user_key, after_tag) = read_user_key(entry);
    let (value_len, varint_len): (u32, usize) =
        VarInt::decode_var(&entry[after_tag..]).expect("entry is not corrupted");
    let value_len = value_len as usize;
    let value_start = after_tag + varint_len;
    &entry[value_start..value_start + value_len]
}

/// A fully-decoded view of an encoded entry, per the redesign note in `spec.md` §9 asking for a
/// single `parse_entry` helper.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    pub user_key:   &'a [u8],
    pub seq:        u64,
    pub entry_type: EntryType,
    pub value:      &'a [u8],
}

/// Decode every field of an encoded entry in one pass.
#[must_use]
pub fn parse_entry(entry: &[u8]) -> EntryView<'_> {
    EntryView {
        user_key:   parse_user_key(entry),
        seq:        parse_seq(entry),
        entry_type: parse_type(entry),
        value:      parse_value(entry),
    }
}
