use crate::models::TaskId;

/// Hands out task ids: strictly increasing, starting at 1, never reused.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: TaskId,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next: 1 }
    }

    pub fn next_id(&mut self) -> TaskId {
        let id = self.next;
        self.next += 1;
        id
    }

    /// The id the next call to [`IdAllocator::next_id`] will return.
    pub fn peek(&self) -> TaskId {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
