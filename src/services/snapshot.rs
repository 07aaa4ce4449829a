//! Snapshot store for the fetched task and staff collections.
//!
//! Each collection is an immutable shared value behind a lock. A fetch
//! replaces it wholesale; nothing ever patches it in place. Concurrent
//! independent refetches are not ordered against each other: whichever
//! resolves last is what readers see.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::domain::{StaffMember, Task};

/// A collection tagged with how many times it has been replaced.
#[derive(Debug)]
pub struct Versioned<T> {
    pub generation: u64,
    pub data: Arc<Vec<T>>,
}

impl<T> Clone for Versioned<T> {
    fn clone(&self) -> Self {
        Self {
            generation: self.generation,
            data: Arc::clone(&self.data),
        }
    }
}

impl<T> Default for Versioned<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            data: Arc::new(Vec::new()),
        }
    }
}

#[derive(Debug, Default)]
pub struct SnapshotStore {
    tasks: RwLock<Versioned<Task>>,
    staff: RwLock<Versioned<StaffMember>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> Arc<Vec<Task>> {
        Arc::clone(&self.tasks.read().data)
    }

    pub fn staff(&self) -> Arc<Vec<StaffMember>> {
        Arc::clone(&self.staff.read().data)
    }

    pub fn task_generation(&self) -> u64 {
        self.tasks.read().generation
    }

    pub fn staff_generation(&self) -> u64 {
        self.staff.read().generation
    }

    /// Replace the task snapshot, returning the new generation.
    pub fn replace_tasks(&self, tasks: Vec<Task>) -> u64 {
        replace(&self.tasks, tasks)
    }

    /// Replace the staff snapshot, returning the new generation.
    pub fn replace_staff(&self, staff: Vec<StaffMember>) -> u64 {
        replace(&self.staff, staff)
    }
}

fn replace<T>(slot: &RwLock<Versioned<T>>, data: Vec<T>) -> u64 {
    let mut slot = slot.write();
    slot.generation += 1;
    slot.data = Arc::new(data);
    slot.generation
}
