use log::{trace, warn};

use crate::error::{Result, TableError};
use crate::record::{FixedStr, UserRecord};

/// Number of slots in a [`FixedHashTable`].
pub const TABLE_SIZE: usize = 100;

/// Shift-and-add hash over a username, reduced to a bucket index.
///
/// Bytes past the first NUL are ignored. Each byte is folded as a signed
/// `char` would be in the C build that wrote existing record files, which
/// is only observable for bytes above 0x7f.
pub fn hash_key(key: &[u8]) -> usize {
    let mut acc: u32 = 0;
    for &byte in key.iter().take_while(|&&b| b != 0) {
        acc = (acc << 5).wrapping_add(byte as i8 as u32);
    }
    (acc % TABLE_SIZE as u32) as usize
}

/// A fixed size open address hash table of user records keyed by username.
///
/// Collisions are resolved by moving the occupant of the primary bucket
/// forward to the next free slot, so a new record always lands on its own
/// primary bucket. There is no deletion and no resizing, so an empty slot
/// reliably terminates a lookup chain.
///
/// Usernames are not checked for uniqueness on insert, callers are
/// expected to [`find`](Self::find) first.
pub struct FixedHashTable {
    slots: Box<[Option<UserRecord>]>,
    size: usize,
    fail_inserts: bool,
}

impl Default for FixedHashTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FixedHashTable {
    /// Creates a table with every slot empty
    pub fn new() -> Self {
        Self {
            slots: vec![None; TABLE_SIZE].into_boxed_slice(),
            size: 0,
            fail_inserts: false,
        }
    }

    /// Empties every slot
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.size = 0;
    }

    /// Returns the number of records in the table
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the table contains no records
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn capacity(&self) -> usize {
        TABLE_SIZE
    }

    /// Makes every following insert fail with [`TableError::InjectedFailure`].
    #[cfg(any(test, feature = "fault-injection"))]
    pub fn set_fail_inserts(&mut self, fail: bool) {
        self.fail_inserts = fail;
    }

    /// Inserts a record at the primary bucket of `username`, relocating the
    /// current occupant if there is one. Returns the slot index used.
    ///
    /// Text longer than the field width is truncated.
    pub fn insert<U, P>(&mut self, id: i32, username: U, password: P) -> Result<usize>
    where
        U: AsRef<[u8]>,
        P: AsRef<[u8]>,
    {
        if self.fail_inserts {
            return Err(TableError::InjectedFailure);
        }

        let record = UserRecord::new(id, username, password);
        let index = hash_key(record.username().as_bytes());

        if self.slots[index].is_some() {
            let Some(free) = self.relocation_target(index) else {
                warn!(
                    "no free slot to relocate bucket {index}, rejecting {}",
                    record.username()
                );
                return Err(TableError::TableFull);
            };
            trace!("relocating occupant of bucket {index} to {free}");
            self.slots[free] = self.slots[index].take();
        }

        self.slots[index] = Some(record);
        self.size += 1;
        Ok(index)
    }

    /// Looks one and two steps ahead per probe for a slot that can take the
    /// occupant of `index`.
    fn relocation_target(&self, index: usize) -> Option<usize> {
        for i in 1..TABLE_SIZE {
            let probe = (index + i) % TABLE_SIZE;
            if self.slots[probe].is_none() {
                return Some(probe);
            }
            let secondary = (probe + 1) % TABLE_SIZE;
            if self.slots[secondary].is_none() {
                return Some(secondary);
            }
        }
        None
    }

    /// Find the slot holding `username`
    fn find_slot(&self, username: &FixedStr) -> Option<usize> {
        let start = hash_key(username.as_bytes());

        // Linear probing
        for i in 0..TABLE_SIZE {
            let index = (start + i) % TABLE_SIZE;
            match &self.slots[index] {
                None => return None,
                Some(record) if record.username() == username => return Some(index),
                Some(_) => {}
            }
        }
        None
    }

    /// Get a record by username; the query is truncated like stored names are
    pub fn find<Q: AsRef<[u8]>>(&self, username: Q) -> Option<&UserRecord> {
        let key = FixedStr::new(username);
        self.find_slot(&key).and_then(|index| self.slots[index].as_ref())
    }

    pub fn contains<Q: AsRef<[u8]>>(&self, username: Q) -> bool {
        self.find(username).is_some()
    }

    /// Slot index currently holding `username`
    pub fn slot_of<Q: AsRef<[u8]>>(&self, username: Q) -> Option<usize> {
        self.find_slot(&FixedStr::new(username))
    }

    /// The record stored at `index`, `None` for empty or out of range slots
    pub fn slot(&self, index: usize) -> Option<&UserRecord> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Occupied records in slot order
    pub fn iter(&self) -> impl Iterator<Item = &UserRecord> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

impl<'a> IntoIterator for &'a FixedHashTable {
    type Item = &'a UserRecord;
    type IntoIter = Box<dyn Iterator<Item = &'a UserRecord> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
