//! In-memory store — useful for testing and ephemeral corpora.

use async_trait::async_trait;
use packloom_core::store::{DocumentStore, PackInfo, StoreError, matches_query};
use packloom_core::{Document, Query};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// An in-memory store holding documents in a Vec.
/// Useful for tests and pipelines fed programmatically.
pub struct InMemoryStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Seed the store with a batch of documents.
    pub async fn insert_all(&self, docs: Vec<Document>) {
        self.documents.write().await.extend(docs);
    }

    /// Insert a single document version.
    pub async fn insert(&self, doc: Document) {
        self.documents.write().await.push(doc);
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn fetch_candidates(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;

        if !documents.iter().any(|d| d.pack == query.pack) {
            return Err(StoreError::PackNotFound(query.pack.clone()));
        }

        Ok(documents
            .iter()
            .filter(|d| d.pack == query.pack && matches_query(d, query))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| d.id == id).cloned())
    }

    async fn packs(&self) -> Result<Vec<PackInfo>, StoreError> {
        let documents = self.documents.read().await;
        // pack name → (subject slugs, version count)
        let mut by_pack: BTreeMap<String, (std::collections::BTreeSet<String>, usize)> =
            BTreeMap::new();
        for doc in documents.iter() {
            let entry = by_pack.entry(doc.pack.clone()).or_default();
            entry.0.insert(doc.slug.clone());
            entry.1 += 1;
        }
        Ok(by_pack
            .into_iter()
            .map(|(name, (subjects, versions))| PackInfo {
                name,
                subjects: subjects.len(),
                versions,
            })
            .collect())
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.documents.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use packloom_core::{derive_id, normalize_slug};

    fn doc(pack: &str, topic: &str, tags: &[&str]) -> Document {
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
            body: format!("Notes on {topic}."),
            tags: tags.iter().map(|t| t.to_string()).collect(),
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
    async fn unknown_pack_is_not_found() {
        let store = InMemoryStore::new();
        store.insert(doc("solana", "Bridge Integration", &[])).await;

        let err = store.fetch_candidates(&query("anchor", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::PackNotFound(p) if p == "anchor"));
    }

    #[tokio::test]
    async fn fetch_filters_by_topic_hint() {
        let store = InMemoryStore::new();
        store.insert(doc("solana", "Bridge Integration", &[])).await;
        store.insert(doc("solana", "Validator Economics", &[])).await;

        let results = store
            .fetch_candidates(&query("solana", Some("bridge")))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].topic, "Bridge Integration");
    }

    #[tokio::test]
    async fn fetch_without_filters_returns_whole_pack() {
        let store = InMemoryStore::new();
        store.insert(doc("solana", "Bridge Integration", &[])).await;
        store.insert(doc("solana", "Validator Economics", &[])).await;
        store.insert(doc("anchor", "IDL Layout", &[])).await;

        let results = store.fetch_candidates(&query("solana", None)).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn get_by_explicit_id() {
        let store = InMemoryStore::new();
        let d = doc("solana", "Bridge Integration", &[]);
        let id = d.id.clone();
        store.insert(d).await;

        let found = store.get(&id).await.unwrap();
        assert!(found.is_some());
        assert!(store.get("solana/missing#0000").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn packs_aggregates_subjects_and_versions() {
        let store = InMemoryStore::new();
        let mut v1 = doc("solana", "Bridge Integration", &[]);
        v1.id = "solana/bridge-integration#aaaa".into();
        let mut v2 = doc("solana", "Bridge Integration", &[]);
        v2.id = "solana/bridge-integration#bbbb".into();
        store.insert_all(vec![v1, v2, doc("solana", "Validator Economics", &[])]).await;

        let packs = store.packs().await.unwrap();
        assert_eq!(packs.len(), 1);
        assert_eq!(packs[0].name, "solana");
        assert_eq!(packs[0].subjects, 2);
        assert_eq!(packs[0].versions, 3);
    }
}
