/// Source of user identifiers.
///
/// Holds the next candidate id. Callers read [`current`](Self::current),
/// insert, and call [`advance`](Self::advance) only once the insert
/// succeeded. Loading a record file reseeds it past the largest stored id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: i32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub const FIRST_ID: i32 = 1;

    pub fn new() -> Self {
        Self {
            next: Self::FIRST_ID,
        }
    }

    /// The id the next registered user receives
    pub fn current(&self) -> i32 {
        self.next
    }

    /// Moves past the current id and returns the new one
    pub fn advance(&mut self) -> i32 {
        self.next = self.next.saturating_add(1);
        self.next
    }

    /// Continues numbering after `max_seen`
    pub fn reseed(&mut self, max_seen: i32) {
        self.next = max_seen.saturating_add(1);
    }

    pub fn reset(&mut self) {
        self.next = Self::FIRST_ID;
    }
}
