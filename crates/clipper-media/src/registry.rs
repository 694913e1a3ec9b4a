//! Concurrency-safe registry of task records.
//!
//! The registry owns every [`TaskRecord`] once inserted. Readers get clones,
//! so a snapshot never aliases the record the runner is writing to.
//!
//! Locking is two-level: an outer `RwLock` guards the id -> record map and is
//! only taken for writing on insert; each record sits behind its own `Mutex`.
//! Updates to different tasks therefore only share the outer read lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use clipper_models::{TaskId, TaskRecord, TaskStatus};

use crate::error::{MediaError, MediaResult};

type Slot = Arc<Mutex<TaskRecord>>;

/// Shared handle to the task registry. Clones refer to the same registry.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Arc<RwLock<HashMap<TaskId, Slot>>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. Fails if the id is already registered.
    pub fn insert(&self, record: TaskRecord) -> MediaResult<()> {
        let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
        if tasks.contains_key(&record.id) {
            return Err(MediaError::TaskExists(record.id));
        }
        tasks.insert(record.id, Arc::new(Mutex::new(record)));
        Ok(())
    }

    /// Check whether an id is registered.
    pub fn contains(&self, id: TaskId) -> bool {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&id)
    }

    /// Copy of the record for `id`.
    pub fn get(&self, id: TaskId) -> MediaResult<TaskRecord> {
        let slot = self.slot(id)?;
        let record = lock(&slot).clone();
        Ok(record)
    }

    /// Snapshot of all records, ordered by id.
    pub fn list(&self) -> Vec<TaskRecord> {
        let slots: Vec<Slot> = self
            .tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut records: Vec<TaskRecord> = slots.iter().map(|slot| lock(slot).clone()).collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Set the progress of a running task. Terminal records are left untouched.
    pub fn update_progress(&self, id: TaskId, progress: u8) -> MediaResult<()> {
        self.update(id, |record| record.set_progress(progress))
    }

    /// Set the status of a task. Completion forces progress to 100.
    pub fn update_status(&self, id: TaskId, status: TaskStatus) -> MediaResult<()> {
        self.update(id, |record| record.set_status(status))
    }

    /// Mark a task as failed and record why.
    pub fn fail(&self, id: TaskId, message: impl Into<String>) -> MediaResult<()> {
        let message = message.into();
        self.update(id, |record| record.fail(message))
    }

    /// Apply `f` to the record for `id` while holding its lock.
    pub fn update<F>(&self, id: TaskId, f: F) -> MediaResult<()>
    where
        F: FnOnce(&mut TaskRecord),
    {
        let slot = self.slot(id)?;
        let mut record = lock(&slot);
        f(&mut *record);
        Ok(())
    }

    fn slot(&self, id: TaskId) -> MediaResult<Slot> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
            .ok_or(MediaError::TaskNotFound(id))
    }
}

fn lock(slot: &Mutex<TaskRecord>) -> MutexGuard<'_, TaskRecord> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}
