//! Document-wide sequential ids.

/// Monotonic id source, starting at 1.
///
/// Each assembler owns one counter for the whole document; it is never
/// reset between pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdCounter {
    next: u32,
}

impl IdCounter {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for IdCounter {
    fn default() -> Self {
        Self::new()
    }
}
