use crate::domain::model::{ItemId, PersonId};
use std::sync::atomic::{AtomicU64, Ordering};

/// 單調遞增的 id 產生器，同一個 session 內不會重複
#[derive(Debug)]
pub struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    fn next_raw(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    pub fn next_item_id(&self) -> ItemId {
        ItemId(self.next_raw())
    }

    pub fn next_person_id(&self) -> PersonId {
        PersonId(self.next_raw())
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
