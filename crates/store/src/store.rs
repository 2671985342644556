//! Tracker store trait and the SQLite implementation.

use crate::error::{StoreError, StoreResult};
use crate::models::{ChecklistEntryRow, ModelRow, NodeRow};
use crate::repos::{ChecklistRepo, ModelRepo, NodeRepo};
use async_trait::async_trait;
use checkwright_core::ModelCode;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Combined tracker store trait.
#[async_trait]
pub trait TrackerStore: ModelRepo + NodeRepo + ChecklistRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> StoreResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> StoreResult<()>;
}

/// SQLite-based tracker store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) a SQLite store at `path` and run
    /// migrations.
    pub async fn new(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Internal(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .foreign_keys(true)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // A single connection serializes writers: two concurrent moves on
            // the same parent can never interleave their renumbering writes.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn require_node(&self, node_id: Uuid) -> StoreResult<NodeRow> {
        self.get_node(node_id)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("node {node_id} not found")))
    }

    async fn require_model(&self, code: &str) -> StoreResult<ModelRow> {
        let row = sqlx::query_as::<_, ModelRow>("SELECT * FROM models WHERE model_code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        row.ok_or_else(|| StoreError::NotFound(format!("model '{code}' not found")))
    }

    /// Enforce that a request's model scope matches a node's stored scope.
    fn check_scope(node: &NodeRow, model: &ModelCode) -> StoreResult<()> {
        if node.model_code != model.as_str() {
            return Err(StoreError::TenantMismatch {
                requested: model.to_string(),
                stored: node.model_code.clone(),
            });
        }
        Ok(())
    }

    fn validate_node_name(name: &str) -> StoreResult<()> {
        if name.trim().is_empty() {
            return Err(StoreError::Validation("node name must not be blank".to_string()));
        }
        if name.len() > 120 {
            return Err(StoreError::Validation("node name exceeds 120 characters".to_string()));
        }
        Ok(())
    }

    /// Validate checklist entry fields against the owning model's
    /// configuration.
    fn validate_entry_fields(
        model: &ModelRow,
        section: &str,
        body: &str,
        priority: &str,
    ) -> StoreResult<()> {
        let sections = model
            .section_list()
            .map_err(|e| StoreError::Internal(format!("corrupt section list: {e}")))?;
        if !sections.iter().any(|s| s == section) {
            return Err(StoreError::Validation(format!(
                "section '{}' is not configured for model '{}'",
                section, model.model_code
            )));
        }
        if body.trim().is_empty() {
            return Err(StoreError::Validation("checklist text must not be blank".to_string()));
        }
        checkwright_core::Priority::parse(priority)
            .map_err(|e| StoreError::Validation(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl TrackerStore for SqliteStore {
    async fn migrate(&self) -> StoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

// Implement the repository traits for SqliteStore
mod sqlite_impl {
    use super::*;
    use crate::repos::{EntryPatch, SectionedEntries, SubtreeDelete};
    use crate::reorder;
    use checkwright_core::NodeKind;
    use time::OffsetDateTime;

    #[async_trait]
    impl ModelRepo for SqliteStore {
        async fn create_model(&self, model: &ModelRow) -> StoreResult<()> {
            let code = ModelCode::parse(&model.model_code)
                .map_err(|e| StoreError::Validation(e.to_string()))?;
            if model.display_name.trim().is_empty() {
                return Err(StoreError::Validation("display name must not be blank".to_string()));
            }

            let sections = model
                .section_list()
                .map_err(|_| StoreError::Validation("sections must be a JSON array".to_string()))?;
            if sections.is_empty() {
                return Err(StoreError::Validation(
                    "a model needs at least one checklist section".to_string(),
                ));
            }
            for section in &sections {
                checkwright_core::validate_section_name(section)
                    .map_err(|e| StoreError::Validation(e.to_string()))?;
            }
            let mut deduped = sections.clone();
            deduped.sort();
            deduped.dedup();
            if deduped.len() != sections.len() {
                return Err(StoreError::Validation("duplicate section names".to_string()));
            }

            if self.get_model(&code).await?.is_some() {
                return Err(StoreError::Conflict(format!(
                    "model '{}' already exists",
                    model.model_code
                )));
            }

            sqlx::query(
                "INSERT INTO models (model_code, display_name, sections, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&model.model_code)
            .bind(&model.display_name)
            .bind(&model.sections)
            .bind(model.created_at)
            .bind(model.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_model(&self, code: &ModelCode) -> StoreResult<Option<ModelRow>> {
            let row = sqlx::query_as::<_, ModelRow>("SELECT * FROM models WHERE model_code = ?")
                .bind(code.as_str())
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn list_models(&self) -> StoreResult<Vec<ModelRow>> {
            let rows = sqlx::query_as::<_, ModelRow>("SELECT * FROM models ORDER BY model_code")
                .fetch_all(&self.pool)
                .await?;
            Ok(rows)
        }
    }

    #[async_trait]
    impl NodeRepo for SqliteStore {
        async fn create_press(&self, model: &ModelCode, name: &str) -> StoreResult<NodeRow> {
            Self::validate_node_name(name)?;
            self.require_model(model.as_str()).await?;

            let next_order: i64 = sqlx::query_scalar(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM nodes
                 WHERE parent_id IS NULL AND model_code = ?",
            )
            .bind(model.as_str())
            .fetch_one(&self.pool)
            .await?;

            let now = OffsetDateTime::now_utc();
            let node = NodeRow {
                node_id: Uuid::new_v4(),
                model_code: model.to_string(),
                parent_id: None,
                kind: NodeKind::Press.as_str().to_string(),
                node_name: name.to_string(),
                sort_order: next_order,
                created_at: now,
                updated_at: now,
            };
            insert_node(&self.pool, &node).await?;
            Ok(node)
        }

        async fn create_child(
            &self,
            parent_id: Uuid,
            kind: NodeKind,
            name: &str,
        ) -> StoreResult<NodeRow> {
            Self::validate_node_name(name)?;
            let parent = self.require_node(parent_id).await?;
            let parent_kind = NodeKind::parse(&parent.kind)
                .map_err(|e| StoreError::Internal(format!("corrupt node kind: {e}")))?;
            if !kind.allowed_under(parent_kind) {
                return Err(StoreError::Validation(format!(
                    "a {kind} cannot be created under a {parent_kind}"
                )));
            }

            let next_order: i64 = sqlx::query_scalar(
                "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM nodes WHERE parent_id = ?",
            )
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await?;

            let now = OffsetDateTime::now_utc();
            let node = NodeRow {
                node_id: Uuid::new_v4(),
                // The scope is inherited, never supplied: a child cannot
                // land in a different model than its parent.
                model_code: parent.model_code,
                parent_id: Some(parent_id),
                kind: kind.as_str().to_string(),
                node_name: name.to_string(),
                sort_order: next_order,
                created_at: now,
                updated_at: now,
            };
            insert_node(&self.pool, &node).await?;
            Ok(node)
        }

        async fn get_node(&self, node_id: Uuid) -> StoreResult<Option<NodeRow>> {
            let row = sqlx::query_as::<_, NodeRow>("SELECT * FROM nodes WHERE node_id = ?")
                .bind(node_id)
                .fetch_optional(&self.pool)
                .await?;
            Ok(row)
        }

        async fn rename_node(&self, node_id: Uuid, name: &str) -> StoreResult<NodeRow> {
            Self::validate_node_name(name)?;
            let result = sqlx::query(
                "UPDATE nodes SET node_name = ?, updated_at = ? WHERE node_id = ?",
            )
            .bind(name)
            .bind(OffsetDateTime::now_utc())
            .bind(node_id)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!("node {node_id} not found")));
            }
            self.require_node(node_id).await
        }

        async fn delete_subtree(&self, node_id: Uuid) -> StoreResult<SubtreeDelete> {
            let node = self.require_node(node_id).await?;
            let mut tx = self.pool.begin().await?;

            let nodes_removed: i64 = sqlx::query_scalar(
                "WITH RECURSIVE subtree(node_id) AS (
                     SELECT node_id FROM nodes WHERE node_id = ?
                     UNION ALL
                     SELECT n.node_id FROM nodes n JOIN subtree s ON n.parent_id = s.node_id
                 )
                 SELECT COUNT(*) FROM subtree",
            )
            .bind(node_id)
            .fetch_one(&mut *tx)
            .await?;

            let removed_parts: Vec<Uuid> = sqlx::query_scalar(
                "WITH RECURSIVE subtree(node_id) AS (
                     SELECT node_id FROM nodes WHERE node_id = ?
                     UNION ALL
                     SELECT n.node_id FROM nodes n JOIN subtree s ON n.parent_id = s.node_id
                 )
                 SELECT node_id FROM nodes
                 WHERE node_id IN (SELECT node_id FROM subtree) AND kind = 'part'",
            )
            .bind(node_id)
            .fetch_all(&mut *tx)
            .await?;

            let entries_removed: i64 = sqlx::query_scalar(
                "WITH RECURSIVE subtree(node_id) AS (
                     SELECT node_id FROM nodes WHERE node_id = ?
                     UNION ALL
                     SELECT n.node_id FROM nodes n JOIN subtree s ON n.parent_id = s.node_id
                 )
                 SELECT COUNT(*) FROM checklist_entries
                 WHERE part_id IN (SELECT node_id FROM subtree)",
            )
            .bind(node_id)
            .fetch_one(&mut *tx)
            .await?;

            // ON DELETE CASCADE sweeps descendants and their entries.
            sqlx::query("DELETE FROM nodes WHERE node_id = ?")
                .bind(node_id)
                .execute(&mut *tx)
                .await?;

            // Close the order gap among the surviving siblings so the
            // sequence stays contiguous.
            let survivors: Vec<Uuid> = match node.parent_id {
                Some(parent_id) => {
                    sqlx::query_scalar(
                        "SELECT node_id FROM nodes WHERE parent_id = ? ORDER BY sort_order",
                    )
                    .bind(parent_id)
                    .fetch_all(&mut *tx)
                    .await?
                }
                None => {
                    sqlx::query_scalar(
                        "SELECT node_id FROM nodes
                         WHERE parent_id IS NULL AND model_code = ? ORDER BY sort_order",
                    )
                    .bind(&node.model_code)
                    .fetch_all(&mut *tx)
                    .await?
                }
            };
            let now = OffsetDateTime::now_utc();
            for (position, sibling_id) in survivors.iter().enumerate() {
                sqlx::query(
                    "UPDATE nodes SET sort_order = ?, updated_at = ?
                     WHERE node_id = ? AND sort_order <> ?",
                )
                .bind(position as i64)
                .bind(now)
                .bind(sibling_id)
                .bind(position as i64)
                .execute(&mut *tx)
                .await?;
            }

            tx.commit().await?;

            tracing::debug!(
                %node_id,
                nodes_removed,
                entries_removed,
                "subtree deleted"
            );
            Ok(SubtreeDelete {
                nodes_removed: nodes_removed as u64,
                entries_removed: entries_removed as u64,
                removed_parts,
            })
        }

        async fn list_presses(&self, model: &ModelCode) -> StoreResult<Vec<NodeRow>> {
            self.require_model(model.as_str()).await?;
            let rows = sqlx::query_as::<_, NodeRow>(
                "SELECT * FROM nodes
                 WHERE parent_id IS NULL AND model_code = ? ORDER BY sort_order",
            )
            .bind(model.as_str())
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn list_children(
            &self,
            parent_id: Uuid,
            model: &ModelCode,
        ) -> StoreResult<Vec<NodeRow>> {
            let parent = self.require_node(parent_id).await?;
            Self::check_scope(&parent, model)?;
            let rows = sqlx::query_as::<_, NodeRow>(
                "SELECT * FROM nodes WHERE parent_id = ? ORDER BY sort_order",
            )
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(rows)
        }

        async fn move_child(
            &self,
            parent_id: Uuid,
            model: &ModelCode,
            from_index: usize,
            to_index: usize,
        ) -> StoreResult<bool> {
            let parent = self.require_node(parent_id).await?;
            Self::check_scope(&parent, model)?;

            let mut tx = self.pool.begin().await?;
            let sibling_ids: Vec<Uuid> = sqlx::query_scalar(
                "SELECT node_id FROM nodes WHERE parent_id = ? ORDER BY sort_order",
            )
            .bind(parent_id)
            .fetch_all(&mut *tx)
            .await?;

            let plan = match reorder::plan_move(sibling_ids.len(), from_index, to_index)? {
                Some(plan) => plan,
                // No-op move: drop the transaction without writing a row.
                None => return Ok(false),
            };

            let now = OffsetDateTime::now_utc();
            let displaced: Vec<(usize, usize)> = plan.displaced().collect();
            for (old_position, new_order) in displaced {
                sqlx::query("UPDATE nodes SET sort_order = ?, updated_at = ? WHERE node_id = ?")
                    .bind(new_order as i64)
                    .bind(now)
                    .bind(sibling_ids[old_position])
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await?;
            Ok(true)
        }
    }

    async fn insert_node(pool: &Pool<Sqlite>, node: &NodeRow) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO nodes (node_id, model_code, parent_id, kind, node_name, sort_order,
                                created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(node.node_id)
        .bind(&node.model_code)
        .bind(node.parent_id)
        .bind(&node.kind)
        .bind(&node.node_name)
        .bind(node.sort_order)
        .bind(node.created_at)
        .bind(node.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    #[async_trait]
    impl ChecklistRepo for SqliteStore {
        async fn sections_for_part(
            &self,
            part_id: Uuid,
            model: &ModelCode,
        ) -> StoreResult<SectionedEntries> {
            let node = self.require_node(part_id).await?;
            Self::check_scope(&node, model)?;
            if node.kind != NodeKind::Part.as_str() {
                return Err(StoreError::Validation(format!(
                    "checklist entries attach to parts, not to a {}",
                    node.kind
                )));
            }

            let rows = sqlx::query_as::<_, ChecklistEntryRow>(
                "SELECT * FROM checklist_entries WHERE part_id = ? ORDER BY created_at, rowid",
            )
            .bind(part_id)
            .fetch_all(&self.pool)
            .await?;

            let mut sections = SectionedEntries::new();
            for row in rows {
                sections.entry(row.section.clone()).or_default().push(row);
            }
            Ok(sections)
        }

        async fn create_entry(&self, entry: &ChecklistEntryRow) -> StoreResult<()> {
            let node = self.require_node(entry.part_id).await?;
            if node.kind != NodeKind::Part.as_str() {
                return Err(StoreError::Validation(format!(
                    "checklist entries attach to parts, not to a {}",
                    node.kind
                )));
            }
            // An entry whose scope disagrees with its part is a data
            // integrity error, not a recoverable condition.
            if node.model_code != entry.model_code {
                return Err(StoreError::TenantMismatch {
                    requested: entry.model_code.clone(),
                    stored: node.model_code,
                });
            }
            let model = self.require_model(&entry.model_code).await?;
            Self::validate_entry_fields(&model, &entry.section, &entry.body, &entry.priority)?;

            sqlx::query(
                "INSERT INTO checklist_entries
                     (entry_id, part_id, model_code, section, option_tag, body, author,
                      due_date, category, priority, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(entry.entry_id)
            .bind(entry.part_id)
            .bind(&entry.model_code)
            .bind(&entry.section)
            .bind(&entry.option_tag)
            .bind(&entry.body)
            .bind(&entry.author)
            .bind(entry.due_date)
            .bind(&entry.category)
            .bind(&entry.priority)
            .bind(entry.created_at)
            .bind(entry.updated_at)
            .execute(&self.pool)
            .await?;
            Ok(())
        }

        async fn get_entry(&self, entry_id: Uuid) -> StoreResult<Option<ChecklistEntryRow>> {
            let row = sqlx::query_as::<_, ChecklistEntryRow>(
                "SELECT * FROM checklist_entries WHERE entry_id = ?",
            )
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(row)
        }

        async fn update_entry(
            &self,
            entry_id: Uuid,
            patch: &EntryPatch,
        ) -> StoreResult<ChecklistEntryRow> {
            let mut entry = self
                .get_entry(entry_id)
                .await?
                .ok_or_else(|| StoreError::NotFound(format!("entry {entry_id} not found")))?;
            patch.apply_to(&mut entry);

            let model = self.require_model(&entry.model_code).await?;
            Self::validate_entry_fields(&model, &entry.section, &entry.body, &entry.priority)?;
            entry.updated_at = OffsetDateTime::now_utc();

            let result = sqlx::query(
                "UPDATE checklist_entries
                 SET section = ?, option_tag = ?, body = ?, author = ?, due_date = ?,
                     category = ?, priority = ?, updated_at = ?
                 WHERE entry_id = ?",
            )
            .bind(&entry.section)
            .bind(&entry.option_tag)
            .bind(&entry.body)
            .bind(&entry.author)
            .bind(entry.due_date)
            .bind(&entry.category)
            .bind(&entry.priority)
            .bind(entry.updated_at)
            .bind(entry_id)
            .execute(&self.pool)
            .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!("entry {entry_id} not found")));
            }
            Ok(entry)
        }

        async fn delete_entry(&self, entry_id: Uuid) -> StoreResult<()> {
            let result = sqlx::query("DELETE FROM checklist_entries WHERE entry_id = ?")
                .bind(entry_id)
                .execute(&self.pool)
                .await?;
            if result.rows_affected() == 0 {
                return Err(StoreError::NotFound(format!("entry {entry_id} not found")));
            }
            Ok(())
        }
    }
}

const SCHEMA_SQL: &str = r#"
-- Models (product lines): the tenant boundary
CREATE TABLE IF NOT EXISTS models (
    model_code TEXT PRIMARY KEY,
    display_name TEXT NOT NULL,
    sections TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Hierarchy nodes: press (root) -> assembly -> part
CREATE TABLE IF NOT EXISTS nodes (
    node_id BLOB PRIMARY KEY,
    model_code TEXT NOT NULL REFERENCES models(model_code),
    parent_id BLOB REFERENCES nodes(node_id) ON DELETE CASCADE,
    kind TEXT NOT NULL,
    node_name TEXT NOT NULL,
    sort_order INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
-- Non-unique on purpose: renumbering rewrites the sequence inside one
-- transaction and may collide transiently; contiguity is the reorder
-- protocol's job, not the index's.
CREATE INDEX IF NOT EXISTS idx_nodes_parent_order ON nodes(parent_id, sort_order);
CREATE INDEX IF NOT EXISTS idx_nodes_model ON nodes(model_code);

-- Checklist entries attached to part nodes
CREATE TABLE IF NOT EXISTS checklist_entries (
    entry_id BLOB PRIMARY KEY,
    part_id BLOB NOT NULL REFERENCES nodes(node_id) ON DELETE CASCADE,
    model_code TEXT NOT NULL,
    section TEXT NOT NULL,
    option_tag TEXT,
    body TEXT NOT NULL,
    author TEXT NOT NULL,
    due_date TEXT,
    category TEXT,
    priority TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_checklist_part ON checklist_entries(part_id);
CREATE INDEX IF NOT EXISTS idx_checklist_model ON checklist_entries(model_code);
"#;
