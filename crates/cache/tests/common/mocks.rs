//! Call-counting mock checklist store for cache tests.

use async_trait::async_trait;
use checkwright_core::ModelCode;
use checkwright_store::models::ChecklistEntryRow;
use checkwright_store::repos::{ChecklistRepo, EntryPatch, SectionedEntries};
use checkwright_store::{StoreError, StoreResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// In-memory checklist store that counts view loads and can inject write
/// failures and per-part load latency.
#[derive(Default)]
pub struct MockChecklistStore {
    entries: Mutex<HashMap<Uuid, ChecklistEntryRow>>,
    loads: AtomicUsize,
    fail_writes: AtomicBool,
    slow_part: Mutex<Option<(Uuid, Duration)>>,
}

#[allow(dead_code)]
impl MockChecklistStore {
    /// Number of `sections_for_part` calls that reached the store.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Delay view loads for one part.
    pub fn set_slow_part(&self, part_id: Uuid, delay: Duration) {
        *self.slow_part.lock().unwrap() = Some((part_id, delay));
    }

    /// Seed an entry without going through the write path.
    pub fn seed(&self, entry: ChecklistEntryRow) {
        self.entries.lock().unwrap().insert(entry.entry_id, entry);
    }

    pub fn contains(&self, entry_id: Uuid) -> bool {
        self.entries.lock().unwrap().contains_key(&entry_id)
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(StoreError::Internal("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChecklistRepo for MockChecklistStore {
    async fn sections_for_part(
        &self,
        part_id: Uuid,
        _model: &ModelCode,
    ) -> StoreResult<SectionedEntries> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        let delay = *self.slow_part.lock().unwrap();
        if let Some((slow_id, delay)) = delay
            && slow_id == part_id
        {
            tokio::time::sleep(delay).await;
        }

        let entries = self.entries.lock().unwrap();
        let mut rows: Vec<ChecklistEntryRow> = entries
            .values()
            .filter(|e| e.part_id == part_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.entry_id).cmp(&(b.created_at, b.entry_id)));

        let mut sections = SectionedEntries::new();
        for row in rows {
            sections.entry(row.section.clone()).or_default().push(row);
        }
        Ok(sections)
    }

    async fn create_entry(&self, entry: &ChecklistEntryRow) -> StoreResult<()> {
        self.check_write()?;
        self.entries.lock().unwrap().insert(entry.entry_id, entry.clone());
        Ok(())
    }

    async fn get_entry(&self, entry_id: Uuid) -> StoreResult<Option<ChecklistEntryRow>> {
        Ok(self.entries.lock().unwrap().get(&entry_id).cloned())
    }

    async fn update_entry(
        &self,
        entry_id: Uuid,
        patch: &EntryPatch,
    ) -> StoreResult<ChecklistEntryRow> {
        self.check_write()?;
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .get_mut(&entry_id)
            .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id} not found")))?;
        patch.apply_to(entry);
        Ok(entry.clone())
    }

    async fn delete_entry(&self, entry_id: Uuid) -> StoreResult<()> {
        self.check_write()?;
        self.entries
            .lock()
            .unwrap()
            .remove(&entry_id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id} not found")))
    }
}
