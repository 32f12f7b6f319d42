use std::fmt;

use bytemuck::{Pod, Zeroable};

/// Width of a text field in bytes, terminator included.
pub const FIELD_LEN: usize = 50;

/// Width of one serialized [`UserRecord`].
pub const RECORD_SIZE: usize = std::mem::size_of::<UserRecord>();

const _: () = assert!(RECORD_SIZE == 4 + 2 * FIELD_LEN);

/// A bounded, NUL terminated text field.
///
/// At most `FIELD_LEN - 1` bytes are kept, input is cut at the first NUL,
/// and every byte after the payload is zero. Because of the zero fill two
/// fields holding the same text compare equal byte for byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Zeroable, Pod)]
#[repr(transparent)]
pub struct FixedStr([u8; FIELD_LEN]);

impl FixedStr {
    /// Copies `text` into a field, truncating silently.
    pub fn new<T: AsRef<[u8]>>(text: T) -> Self {
        let bytes = text.as_ref();
        let len = payload_len(bytes);
        let mut buf = [0u8; FIELD_LEN];
        buf[..len].copy_from_slice(&bytes[..len]);
        Self(buf)
    }

    /// Rebuilds a field from a raw buffer read off disk, zeroing whatever
    /// follows the terminator.
    pub fn from_raw(raw: [u8; FIELD_LEN]) -> Self {
        Self::new(raw)
    }

    /// The payload bytes, terminator excluded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..self.len()]
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()).ok()
    }

    /// The whole buffer as it is laid out in a record.
    pub fn raw(&self) -> &[u8; FIELD_LEN] {
        &self.0
    }

    pub fn len(&self) -> usize {
        payload_len(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }
}

impl Default for FixedStr {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl fmt::Debug for FixedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl fmt::Display for FixedStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(self.as_bytes()))
    }
}

impl PartialEq<[u8]> for FixedStr {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_bytes() == other
    }
}

impl PartialEq<str> for FixedStr {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl PartialEq<&str> for FixedStr {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

fn payload_len(bytes: &[u8]) -> usize {
    let limit = bytes.len().min(FIELD_LEN - 1);
    bytes[..limit]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(limit)
}

/// One credential record, laid out exactly as it is persisted:
/// native endian id, then the username and password buffers.
#[derive(Clone, Copy, PartialEq, Eq, Zeroable, Pod)]
#[repr(C)]
pub struct UserRecord {
    id: i32,
    username: FixedStr,
    password: FixedStr,
}

impl UserRecord {
    pub fn new<U: AsRef<[u8]>, P: AsRef<[u8]>>(id: i32, username: U, password: P) -> Self {
        Self {
            id,
            username: FixedStr::new(username),
            password: FixedStr::new(password),
        }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn username(&self) -> &FixedStr {
        &self.username
    }

    /// Stored verbatim, there is no hashing.
    pub fn password(&self) -> &FixedStr {
        &self.password
    }

    /// Re-applies the field invariants to a record produced by a raw byte cast.
    pub(crate) fn normalized(self) -> Self {
        Self {
            id: self.id,
            username: FixedStr::from_raw(self.username.0),
            password: FixedStr::from_raw(self.password.0),
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_record_layout_has_no_padding() {
        assert_eq!(RECORD_SIZE, 104);
        assert_eq!(std::mem::align_of::<UserRecord>(), 4);
    }

    #[test]
    fn test_short_text_is_zero_filled() {
        let field = FixedStr::new("bob");
        assert_eq!(field.len(), 3);
        assert_eq!(field.as_bytes(), b"bob");
        assert!(field.raw()[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_long_text_is_truncated_with_terminator() {
        let long = "x".repeat(60);
        let field = FixedStr::new(&long);
        assert_eq!(field.len(), FIELD_LEN - 1);
        assert_eq!(field.as_bytes(), &long.as_bytes()[..FIELD_LEN - 1]);
        assert_eq!(field.raw()[FIELD_LEN - 1], 0);
    }

    #[test]
    fn test_embedded_nul_ends_text() {
        let field = FixedStr::new(b"ab\0cd");
        assert_eq!(field.as_bytes(), b"ab");
        assert_eq!(field, FixedStr::new("ab"));
    }

    #[test]
    fn test_from_raw_discards_bytes_after_terminator() {
        let mut raw = [0xAAu8; FIELD_LEN];
        raw[..5].copy_from_slice(b"alice");
        raw[5] = 0;
        let field = FixedStr::from_raw(raw);
        assert_eq!(field, FixedStr::new("alice"));

        // no terminator at all: keep the first FIELD_LEN - 1 bytes
        let field = FixedStr::from_raw([b'z'; FIELD_LEN]);
        assert_eq!(field.len(), FIELD_LEN - 1);
        assert_eq!(field.raw()[FIELD_LEN - 1], 0);
    }

    #[test]
    fn test_empty_field() {
        let field = FixedStr::default();
        assert!(field.is_empty());
        assert_eq!(field.as_str(), Some(""));
    }

    #[test]
    fn test_debug_hides_password() {
        let record = UserRecord::new(7, "alice", "hunter2");
        let printed = format!("{record:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("hunter2"));
    }

    proptest! {
        #[test]
        fn prop_truncation_keeps_prefix(text in "[a-zA-Z0-9]{0,80}") {
            let field = FixedStr::new(&text);
            let keep = text.len().min(FIELD_LEN - 1);
            prop_assert_eq!(field.as_bytes(), &text.as_bytes()[..keep]);
            prop_assert_eq!(FixedStr::new(field.as_bytes()), field);
        }
    }
}
