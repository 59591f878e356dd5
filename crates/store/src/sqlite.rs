//! SQLite store with FTS5 full-text search.
//!
//! Uses a single SQLite database file with two tables:
//! - `documents` — stores the raw document versions
//! - `documents_fts` — FTS5 virtual table for ranked keyword search
//!
//! Triggers keep the FTS index in sync on insert/delete/update. Unlike the
//! file and in-memory stores, the FTS index also matches topic hints
//! against document *bodies*, widening recall — the candidate-fetch
//! algorithm is an external collaborator, so backends may differ here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use packloom_core::store::{DocumentStore, PackInfo, StoreError, matches_query};
use packloom_core::{Document, Query, tokenize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::info;

/// A SQLite-backed document store with FTS5 search.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite document store initialized at {path}");
        Ok(store)
    }

    /// Run schema migrations — creates tables, FTS5 virtual table, and triggers.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        // Main documents table with integer rowid alias for FTS5 sync
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                iid             INTEGER PRIMARY KEY AUTOINCREMENT,
                id              TEXT UNIQUE NOT NULL,
                pack            TEXT NOT NULL,
                topic           TEXT NOT NULL,
                slug            TEXT NOT NULL,
                confidence      INTEGER,
                sources_checked INTEGER NOT NULL DEFAULT 0,
                last_updated    TEXT NOT NULL,
                last_verified   TEXT NOT NULL,
                body            TEXT NOT NULL,
                tags            TEXT NOT NULL DEFAULT '[]'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("documents table: {e}")))?;

        // External-content FTS5 table synced via triggers
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE IF NOT EXISTS documents_fts USING fts5(
                topic,
                tags,
                body,
                content='documents',
                content_rowid='iid',
                tokenize='porter unicode61'
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("FTS5 table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS documents_ai AFTER INSERT ON documents BEGIN
                INSERT INTO documents_fts(rowid, topic, tags, body)
                VALUES (new.iid, new.topic, new.tags, new.body);
            END
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("insert trigger: {e}")))?;

        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS documents_ad AFTER DELETE ON documents BEGIN
                INSERT INTO documents_fts(documents_fts, rowid, topic, tags, body)
                VALUES ('delete', old.iid, old.topic, old.tags, old.body);
            END
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("delete trigger: {e}")))?;

        sqlx::query(
            r#"
            CREATE TRIGGER IF NOT EXISTS documents_au AFTER UPDATE ON documents BEGIN
                INSERT INTO documents_fts(documents_fts, rowid, topic, tags, body)
                VALUES ('delete', old.iid, old.topic, old.tags, old.body);
                INSERT INTO documents_fts(rowid, topic, tags, body)
                VALUES (new.iid, new.topic, new.tags, new.body);
            END
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("update trigger: {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_pack ON documents(pack)")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("pack index: {e}")))?;

        Ok(())
    }

    /// Insert a document version (ingestion path — used by tooling and tests).
    pub async fn insert(&self, doc: &Document) -> Result<(), StoreError> {
        let tags = serde_json::to_string(&doc.tags)
            .map_err(|e| StoreError::Storage(format!("tags encode: {e}")))?;
        sqlx::query(
            r#"
            INSERT INTO documents
                (id, pack, topic, slug, confidence, sources_checked,
                 last_updated, last_verified, body, tags)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&doc.id)
        .bind(&doc.pack)
        .bind(&doc.topic)
        .bind(&doc.slug)
        .bind(doc.confidence.map(|c| c as i64))
        .bind(doc.sources_checked as i64)
        .bind(doc.last_updated.to_rfc3339())
        .bind(doc.last_verified.to_rfc3339())
        .bind(&doc.body)
        .bind(tags)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("insert: {e}")))?;
        Ok(())
    }

    fn row_to_document(row: &SqliteRow) -> Result<Document, StoreError> {
        let parse_ts = |raw: String| -> Result<DateTime<Utc>, StoreError> {
            DateTime::parse_from_rfc3339(&raw)
                .map(|ts| ts.with_timezone(&Utc))
                .map_err(|e| StoreError::Storage(format!("bad timestamp '{raw}': {e}")))
        };
        let tags_raw: String = row.get("tags");
        let tags: Vec<String> = serde_json::from_str(&tags_raw)
            .map_err(|e| StoreError::Storage(format!("tags decode: {e}")))?;
        Ok(Document {
            id: row.get("id"),
            pack: row.get("pack"),
            topic: row.get("topic"),
            slug: row.get("slug"),
            confidence: row.get::<Option<i64>, _>("confidence").map(|c| c.clamp(0, 10) as u8),
            sources_checked: row.get::<i64, _>("sources_checked").max(0) as u32,
            last_updated: parse_ts(row.get("last_updated"))?,
            last_verified: parse_ts(row.get("last_verified"))?,
            body: row.get("body"),
            tags,
        })
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn fetch_candidates(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let pack_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE pack = ?")
                .bind(&query.pack)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        if pack_count == 0 {
            return Err(StoreError::PackNotFound(query.pack.clone()));
        }

        let rows = sqlx::query("SELECT * FROM documents WHERE pack = ? ORDER BY id")
            .bind(&query.pack)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        let mut candidates = Vec::new();
        for row in &rows {
            let doc = Self::row_to_document(row)?;
            if matches_query(&doc, query) {
                candidates.push(doc);
            }
        }

        // Widen recall through the FTS index: topic hints may match article
        // bodies even when the topic line doesn't mention them.
        if let Some(hint) = query.topic_hint.as_deref() {
            let terms = tokenize(hint);
            if !terms.is_empty() {
                let match_expr = terms
                    .iter()
                    .map(|t| format!("\"{t}\""))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                let fts_rows = sqlx::query(
                    r#"
                    SELECT d.* FROM documents d
                    JOIN documents_fts f ON f.rowid = d.iid
                    WHERE d.pack = ? AND documents_fts MATCH ?
                    ORDER BY d.id
                    "#,
                )
                .bind(&query.pack)
                .bind(&match_expr)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

                for row in &fts_rows {
                    let doc = Self::row_to_document(row)?;
                    if !candidates.iter().any(|c| c.id == doc.id) {
                        candidates.push(doc);
                    }
                }
            }
        }

        Ok(candidates)
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query("SELECT * FROM documents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        row.as_ref().map(Self::row_to_document).transpose()
    }

    async fn packs(&self) -> Result<Vec<PackInfo>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT pack, COUNT(DISTINCT slug) AS subjects, COUNT(*) AS versions
            FROM documents GROUP BY pack ORDER BY pack
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| PackInfo {
                name: row.get("pack"),
                subjects: row.get::<i64, _>("subjects") as usize,
                versions: row.get::<i64, _>("versions") as usize,
            })
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packloom_core::{derive_id, normalize_slug};

    fn doc(pack: &str, topic: &str, body: &str) -> Document {
        let slug = normalize_slug(topic);
        let now = Utc::now();
        Document {
            id: derive_id(pack, &slug, now),
            pack: pack.into(),
            topic: topic.into(),
            slug,
            confidence: Some(7),
            sources_checked: 5,
            last_updated: now,
            last_verified: now,
            body: body.into(),
            tags: vec!["solana".into()],
        }
    }

    fn query(pack: &str, hint: Option<&str>) -> Query {
        Query {
            pack: pack.into(),
            topic_hint: hint.map(Into::into),
            tags: vec![],
            budget_bytes: 4096,
        }
    }

    #[tokio::test]
    async fn insert_and_get_roundtrip() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        let d = doc("solana", "Bridge Integration", "Use wormhole.");
        let id = d.id.clone();
        store.insert(&d).await.unwrap();

        let found = store.get(&id).await.unwrap().unwrap();
        assert_eq!(found.topic, "Bridge Integration");
        assert_eq!(found.confidence, Some(7));
        assert_eq!(found.tags, vec!["solana"]);
    }

    #[tokio::test]
    async fn unknown_pack_is_not_found() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.insert(&doc("solana", "Bridge Integration", "x")).await.unwrap();

        let err = store.fetch_candidates(&query("anchor", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::PackNotFound(_)));
    }

    #[tokio::test]
    async fn fts_matches_topic_hint_in_body() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store
            .insert(&doc("solana", "Operations Notes", "Always retry wormhole transfers."))
            .await
            .unwrap();
        store
            .insert(&doc("solana", "Validator Economics", "Stake distribution details."))
            .await
            .unwrap();

        let results = store
            .fetch_candidates(&query("solana", Some("wormhole")))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].topic, "Operations Notes");
    }

    #[tokio::test]
    async fn fetch_without_filters_returns_whole_pack() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.insert(&doc("solana", "A", "a")).await.unwrap();
        store.insert(&doc("solana", "B", "b")).await.unwrap();

        let results = store.fetch_candidates(&query("solana", None)).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn packs_aggregates_counts() {
        let store = SqliteStore::new(":memory:").await.unwrap();
        store.insert(&doc("solana", "A", "a")).await.unwrap();
        store.insert(&doc("anchor", "B", "b")).await.unwrap();

        let packs = store.packs().await.unwrap();
        assert_eq!(packs.len(), 2);
        assert_eq!(packs[0].name, "anchor");
        assert_eq!(packs[1].name, "solana");
    }
}
