//! Read-through, write-through checklist view cache.

use checkwright_core::ModelCode;
use checkwright_core::config::CacheConfig;
use checkwright_store::models::ChecklistEntryRow;
use checkwright_store::repos::{ChecklistRepo, EntryPatch, SectionedEntries};
use checkwright_store::{StoreError, StoreResult};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout};
use uuid::Uuid;

/// Cache tuning knobs.
#[derive(Clone, Copy, Debug)]
pub struct CacheSettings {
    /// Maximum age a cached view is served without a refresh.
    pub ttl: Duration,
    /// Upper bound on one refresh round-trip to the store.
    pub refresh_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            refresh_timeout: Duration::from_secs(2),
        }
    }
}

impl From<&CacheConfig> for CacheSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            ttl: Duration::from_secs(config.view_ttl_secs),
            refresh_timeout: Duration::from_millis(config.refresh_timeout_ms),
        }
    }
}

/// Cache key: one view per (part, model) pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ViewKey {
    part_id: Uuid,
    model: ModelCode,
}

/// A fetched view plus its freshness stamp.
#[derive(Clone)]
struct CachedView {
    sections: SectionedEntries,
    fetched_at: Instant,
}

#[derive(Default)]
struct Slot {
    view: Option<CachedView>,
}

/// Read-through, TTL-bounded cache of per-part checklist views.
///
/// Each key owns its own async mutex, so a refresh in flight for one part
/// never blocks another part, and two mutations of the same part
/// serialize. Mutations patch the cached copy optimistically around the
/// synchronous store write and restore it (value and freshness both)
/// when the write fails. The cache never writes to storage on its own
/// initiative.
pub struct ChecklistCache {
    source: Arc<dyn ChecklistRepo>,
    slots: DashMap<ViewKey, Arc<Mutex<Slot>>>,
    settings: CacheSettings,
}

impl ChecklistCache {
    /// Create a cache over the given checklist store.
    pub fn new(source: Arc<dyn ChecklistRepo>, settings: CacheSettings) -> Self {
        Self {
            source,
            slots: DashMap::new(),
            settings,
        }
    }

    fn slot(&self, key: &ViewKey) -> Arc<Mutex<Slot>> {
        self.slots
            .entry(key.clone())
            .or_insert_with(Default::default)
            .clone()
    }

    /// Grouped checklist view for a part.
    ///
    /// Serves the cached copy while it is fresh. Past the TTL, refreshes
    /// through the store under a bounded timeout; the stale copy is
    /// discarded only once a replacement exists, and an overrunning
    /// refresh falls back to it (at its original freshness). A timeout
    /// with no prior value is surfaced as `Internal`.
    pub async fn sections(
        &self,
        part_id: Uuid,
        model: &ModelCode,
    ) -> StoreResult<SectionedEntries> {
        let key = ViewKey { part_id, model: model.clone() };
        let slot = self.slot(&key);
        let mut slot = slot.lock().await;

        if let Some(view) = &slot.view
            && view.fetched_at.elapsed() <= self.settings.ttl
        {
            tracing::trace!(%part_id, model = %model, "checklist view served from cache");
            return Ok(view.sections.clone());
        }

        let refresh = self.source.sections_for_part(part_id, model);
        match timeout(self.settings.refresh_timeout, refresh).await {
            Ok(Ok(sections)) => {
                slot.view = Some(CachedView {
                    sections: sections.clone(),
                    fetched_at: Instant::now(),
                });
                Ok(sections)
            }
            Ok(Err(err)) => Err(err),
            Err(_) => match &slot.view {
                Some(view) => {
                    tracing::warn!(
                        %part_id,
                        model = %model,
                        "checklist refresh timed out, serving stale view"
                    );
                    Ok(view.sections.clone())
                }
                None => Err(StoreError::Internal(
                    "checklist view refresh timed out".to_string(),
                )),
            },
        }
    }

    /// Create an entry through the cache.
    ///
    /// The entry is inserted into the cached view (when one exists) and
    /// the store write runs under the same key lock; a failed write
    /// restores the pre-mutation view. On success the key's freshness is
    /// extended instead of forcing a refetch.
    pub async fn create(
        &self,
        model: &ModelCode,
        entry: ChecklistEntryRow,
    ) -> StoreResult<ChecklistEntryRow> {
        debug_assert_eq!(entry.model_code, model.as_str());
        let key = ViewKey { part_id: entry.part_id, model: model.clone() };
        let slot = self.slot(&key);
        let mut slot = slot.lock().await;

        let before = slot.view.clone();
        if let Some(view) = slot.view.as_mut() {
            view.sections
                .entry(entry.section.clone())
                .or_default()
                .push(entry.clone());
            view.fetched_at = Instant::now();
        }

        match self.source.create_entry(&entry).await {
            Ok(()) => Ok(entry),
            Err(err) => {
                slot.view = before;
                Err(err)
            }
        }
    }

    /// Update an entry through the cache.
    ///
    /// The entry must belong to the addressed (part, model) key; a
    /// mis-addressed update fails loudly before any write. The patch is
    /// applied to the cached copy optimistically; after the store write
    /// returns, the authoritative row replaces the patched copy.
    pub async fn update(
        &self,
        part_id: Uuid,
        model: &ModelCode,
        entry_id: Uuid,
        patch: &EntryPatch,
    ) -> StoreResult<ChecklistEntryRow> {
        let key = ViewKey { part_id, model: model.clone() };
        let slot = self.slot(&key);
        let mut slot = slot.lock().await;

        let existing = self
            .source
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id} not found")))?;
        if existing.part_id != part_id || existing.model_code != model.as_str() {
            return Err(StoreError::TenantMismatch {
                requested: model.to_string(),
                stored: existing.model_code,
            });
        }

        let before = slot.view.clone();
        if let Some(view) = slot.view.as_mut() {
            patch_in_view(&mut view.sections, entry_id, patch);
            view.fetched_at = Instant::now();
        }

        match self.source.update_entry(entry_id, patch).await {
            Ok(row) => {
                if let Some(view) = slot.view.as_mut() {
                    replace_in_view(&mut view.sections, &row);
                }
                Ok(row)
            }
            Err(err) => {
                slot.view = before;
                Err(err)
            }
        }
    }

    /// Delete an entry through the cache.
    pub async fn delete(
        &self,
        part_id: Uuid,
        model: &ModelCode,
        entry_id: Uuid,
    ) -> StoreResult<()> {
        let key = ViewKey { part_id, model: model.clone() };
        let slot = self.slot(&key);
        let mut slot = slot.lock().await;

        // Ownership check up front: deleting an entry through the wrong
        // key must fail loudly, not remove foreign data.
        let existing = self
            .source
            .get_entry(entry_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id} not found")))?;
        if existing.part_id != part_id || existing.model_code != model.as_str() {
            return Err(StoreError::TenantMismatch {
                requested: model.to_string(),
                stored: existing.model_code,
            });
        }

        let before = slot.view.clone();
        if let Some(view) = slot.view.as_mut() {
            remove_from_view(&mut view.sections, entry_id);
            view.fetched_at = Instant::now();
        }

        match self.source.delete_entry(entry_id).await {
            Ok(()) => Ok(()),
            Err(err) => {
                slot.view = before;
                Err(err)
            }
        }
    }

    /// Drop a key outright. Used when the owning part disappears; safe to
    /// call for keys that were never cached.
    pub fn invalidate(&self, part_id: Uuid, model: &ModelCode) {
        self.slots.remove(&ViewKey { part_id, model: model.clone() });
    }
}

/// Apply a patch to the cached copy of an entry, regrouping it when the
/// patch moves it to another section. Absent entries are left alone; the
/// authoritative row arrives after the store write.
fn patch_in_view(sections: &mut SectionedEntries, entry_id: Uuid, patch: &EntryPatch) {
    let Some((section, index)) = locate(sections, entry_id) else {
        return;
    };
    let Some(entries) = sections.get_mut(&section) else {
        return;
    };
    let mut entry = entries.remove(index);
    patch.apply_to(&mut entry);
    if entry.section == section {
        sections.entry(section).or_default().insert(index, entry);
    } else {
        // Re-slotted at the tail of its new section; the next refresh
        // restores creation order.
        prune_if_empty(sections, &section);
        sections.entry(entry.section.clone()).or_default().push(entry);
    }
}

/// Replace the cached copy of an entry with the authoritative row,
/// inserting it when absent.
fn replace_in_view(sections: &mut SectionedEntries, row: &ChecklistEntryRow) {
    if let Some((section, index)) = locate(sections, row.entry_id) {
        if section == row.section {
            if let Some(entries) = sections.get_mut(&section) {
                entries[index] = row.clone();
                return;
            }
        }
        if let Some(entries) = sections.get_mut(&section) {
            entries.remove(index);
        }
        prune_if_empty(sections, &section);
    }
    sections.entry(row.section.clone()).or_default().push(row.clone());
}

fn remove_from_view(sections: &mut SectionedEntries, entry_id: Uuid) {
    if let Some((section, index)) = locate(sections, entry_id) {
        if let Some(entries) = sections.get_mut(&section) {
            entries.remove(index);
        }
        prune_if_empty(sections, &section);
    }
}

fn locate(sections: &SectionedEntries, entry_id: Uuid) -> Option<(String, usize)> {
    for (section, entries) in sections {
        if let Some(index) = entries.iter().position(|e| e.entry_id == entry_id) {
            return Some((section.clone(), index));
        }
    }
    None
}

fn prune_if_empty(sections: &mut SectionedEntries, section: &str) {
    if sections.get(section).is_some_and(|entries| entries.is_empty()) {
        sections.remove(section);
    }
}
