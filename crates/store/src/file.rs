//! File store — reads a corpus directory of Markdown knowledge articles.
//!
//! Each `.md` file carries `---`-delimited frontmatter (`pack`, `topic`,
//! `confidence`, `sources_checked`, `last_updated`, `last_verified`,
//! `tags`) followed by the article body. Some files concatenate multiple
//! independent articles separated by the reserved separator literal; the
//! loader splits on it and parses each segment on its own.
//!
//! The corpus is loaded once at open and never mutated: ingestion is an
//! out-of-band concern, and a content update lands as a new file/version.
//! Malformed fields are defaulted and logged, never fatal — one bad
//! article must not take the whole pack offline.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use packloom_core::store::{DocumentStore, PackInfo, StoreError, matches_query};
use packloom_core::{Document, Query, derive_id, normalize_slug};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A read-only store over a directory tree of Markdown articles.
pub struct FileStore {
    documents: Vec<Document>,
    warnings: Vec<String>,
}

impl FileStore {
    /// Open a corpus directory, loading every `.md` file under it.
    ///
    /// `separator` is the reserved article-boundary literal used to split
    /// files that concatenate multiple articles.
    pub fn open(dir: &Path, separator: &str) -> Result<Self, StoreError> {
        if !dir.is_dir() {
            return Err(StoreError::Storage(format!(
                "corpus directory does not exist: {}",
                dir.display()
            )));
        }

        let mut files = Vec::new();
        collect_markdown_files(dir, &mut files)?;
        files.sort(); // deterministic load order

        let mut documents = Vec::new();
        let mut warnings = Vec::new();
        for path in &files {
            let content = std::fs::read_to_string(path).map_err(|e| {
                StoreError::Storage(format!("failed to read {}: {e}", path.display()))
            })?;
            let default_pack = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .unwrap_or("unsorted");

            for segment in content.split(separator) {
                if segment.trim().is_empty() {
                    continue;
                }
                match parse_article(segment, path, default_pack) {
                    Ok((doc, mut article_warnings)) => {
                        warnings.append(&mut article_warnings);
                        documents.push(doc);
                    }
                    Err(reason) => {
                        warn!(path = %path.display(), %reason, "Skipping unparseable article");
                        warnings.push(format!("{}: {reason}", path.display()));
                    }
                }
            }
        }

        debug!(
            files = files.len(),
            documents = documents.len(),
            warnings = warnings.len(),
            "File store loaded"
        );
        Ok(Self { documents, warnings })
    }

    /// Non-fatal anomalies encountered while loading the corpus.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

fn collect_markdown_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), StoreError> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| StoreError::Storage(format!("failed to list {}: {e}", dir.display())))?;
    for entry in entries {
        let entry = entry
            .map_err(|e| StoreError::Storage(format!("failed to list {}: {e}", dir.display())))?;
        let path = entry.path();
        if path.is_dir() {
            collect_markdown_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }
    Ok(())
}

/// Parse one article segment: frontmatter block + body.
fn parse_article(
    segment: &str,
    path: &Path,
    default_pack: &str,
) -> Result<(Document, Vec<String>), String> {
    let mut warnings = Vec::new();
    let trimmed = segment.trim_start_matches(['\n', '\r']);

    let (fields, body) = split_frontmatter(trimmed)
        .ok_or_else(|| "missing frontmatter block".to_string())?;

    let pack = fields.get("pack").cloned().unwrap_or_else(|| {
        warnings.push(format!(
            "{}: article missing 'pack'; defaulted to directory name '{default_pack}'",
            path.display()
        ));
        default_pack.to_string()
    });

    let topic = fields.get("topic").cloned().unwrap_or_else(|| {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();
        warnings.push(format!(
            "{}: article missing 'topic'; defaulted to file stem '{stem}'",
            path.display()
        ));
        stem
    });

    let slug = fields
        .get("slug")
        .map(|s| normalize_slug(s))
        .unwrap_or_else(|| normalize_slug(&topic));

    let confidence = match fields.get("confidence") {
        Some(raw) => match raw.parse::<u8>() {
            Ok(c) => Some(c.min(10)),
            Err(_) => {
                warnings.push(format!(
                    "{}: unparseable confidence '{raw}' for '{topic}'; treated as missing",
                    path.display()
                ));
                None
            }
        },
        None => None,
    };

    let sources_checked = fields
        .get("sources_checked")
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(0);

    let last_updated = match fields.get("last_updated") {
        Some(raw) => match parse_timestamp(raw) {
            Ok(ts) => ts,
            Err(_) => {
                warnings.push(format!(
                    "{}: unparseable last_updated '{raw}' for '{topic}'; defaulted to epoch",
                    path.display()
                ));
                DateTime::<Utc>::UNIX_EPOCH
            }
        },
        None => {
            warnings.push(format!(
                "{}: missing last_updated for '{topic}'; defaulted to epoch",
                path.display()
            ));
            DateTime::<Utc>::UNIX_EPOCH
        }
    };

    let last_verified = match fields.get("last_verified").map(|raw| parse_timestamp(raw)) {
        Some(Ok(ts)) => ts,
        _ => last_updated,
    };

    let tags: Vec<String> = fields
        .get("tags")
        .map(|raw| {
            raw.split(',')
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let doc = Document {
        id: derive_id(&pack, &slug, last_updated),
        pack,
        topic,
        slug,
        confidence,
        sources_checked,
        last_updated,
        last_verified,
        body: body.trim().to_string(),
        tags,
    };
    Ok((doc, warnings))
}

/// Split a `---`-delimited frontmatter block from the body.
/// Returns the key/value map and the remaining body text.
fn split_frontmatter(text: &str) -> Option<(BTreeMap<String, String>, &str)> {
    let rest = text.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    let block = &rest[..end];
    let body = rest[end + 4..].trim_start_matches(['-']);

    let mut fields = BTreeMap::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
    }
    Some((fields, body))
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc());
        }
    }
    Err(raw.to_string())
}

#[async_trait]
impl DocumentStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn fetch_candidates(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        if !self.documents.iter().any(|d| d.pack == query.pack) {
            return Err(StoreError::PackNotFound(query.pack.clone()));
        }
        Ok(self
            .documents
            .iter()
            .filter(|d| d.pack == query.pack && matches_query(d, query))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn packs(&self) -> Result<Vec<PackInfo>, StoreError> {
        let mut by_pack: BTreeMap<String, (std::collections::BTreeSet<String>, usize)> =
            BTreeMap::new();
        for doc in &self.documents {
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
        Ok(self.documents.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SEP: &str = "\n\n--8<-- pack-boundary-magic-5f3759df --8<--\n\n";

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        let mut f = std::fs::File::create(path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }

    fn article(pack: &str, topic: &str, confidence: &str, verified: &str, body: &str) -> String {
        format!(
            "---\npack: {pack}\ntopic: {topic}\nconfidence: {confidence}\nsources_checked: 4\nlast_updated: {verified}\nlast_verified: {verified}\ntags: solana, ops\n---\n{body}\n"
        )
    }

    #[tokio::test]
    async fn loads_single_article_file() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "solana/bridge.md",
            &article("solana", "Bridge Integration", "8", "2026-02-16", "Use wormhole."),
        );

        let store = FileStore::open(tmp.path(), SEP).unwrap();
        assert_eq!(store.count().await.unwrap(), 1);

        let query = Query {
            pack: "solana".into(),
            topic_hint: Some("bridge".into()),
            tags: vec![],
            budget_bytes: 4096,
        };
        let docs = store.fetch_candidates(&query).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].confidence, Some(8));
        assert_eq!(docs[0].sources_checked, 4);
        assert_eq!(docs[0].body, "Use wormhole.");
        assert_eq!(docs[0].tags, vec!["solana", "ops"]);
    }

    #[tokio::test]
    async fn splits_concatenated_articles() {
        let tmp = TempDir::new().unwrap();
        let content = format!(
            "{}{SEP}{}",
            article("solana", "Bridge Integration", "8", "2026-02-16", "Article one."),
            article("solana", "RPC Retries", "6", "2026-01-10", "Article two."),
        );
        write_file(tmp.path(), "solana/combined.md", &content);

        let store = FileStore::open(tmp.path(), SEP).unwrap();
        assert_eq!(store.count().await.unwrap(), 2);

        let packs = store.packs().await.unwrap();
        assert_eq!(packs[0].subjects, 2);
    }

    #[tokio::test]
    async fn missing_confidence_is_defaulted_and_warned() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "solana/odd.md",
            "---\npack: solana\ntopic: Fee Markets\nconfidence: high\nlast_updated: 2026-02-01\n---\nBody.\n",
        );

        let store = FileStore::open(tmp.path(), SEP).unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.warnings().iter().any(|w| w.contains("confidence")));

        let doc = store
            .fetch_candidates(&Query {
                pack: "solana".into(),
                topic_hint: None,
                tags: vec![],
                budget_bytes: 4096,
            })
            .await
            .unwrap()
            .remove(0);
        assert_eq!(doc.confidence, None);
        assert_eq!(doc.confidence_or_default(), 0);
    }

    #[tokio::test]
    async fn pack_defaults_to_directory_name() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "anchor/idl.md",
            "---\ntopic: IDL Layout\nconfidence: 5\nlast_updated: 2026-02-01\n---\nBody.\n",
        );

        let store = FileStore::open(tmp.path(), SEP).unwrap();
        let packs = store.packs().await.unwrap();
        assert_eq!(packs[0].name, "anchor");
        assert!(store.warnings().iter().any(|w| w.contains("pack")));
    }

    #[tokio::test]
    async fn article_without_frontmatter_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_file(tmp.path(), "solana/raw.md", "Just some prose, no frontmatter.\n");
        write_file(
            tmp.path(),
            "solana/good.md",
            &article("solana", "Bridge Integration", "8", "2026-02-16", "ok"),
        );

        let store = FileStore::open(tmp.path(), SEP).unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(!store.warnings().is_empty());
    }

    #[tokio::test]
    async fn unknown_pack_is_not_found() {
        let tmp = TempDir::new().unwrap();
        write_file(
            tmp.path(),
            "solana/bridge.md",
            &article("solana", "Bridge Integration", "8", "2026-02-16", "ok"),
        );

        let store = FileStore::open(tmp.path(), SEP).unwrap();
        let err = store
            .fetch_candidates(&Query {
                pack: "missing".into(),
                topic_hint: None,
                tags: vec![],
                budget_bytes: 4096,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::PackNotFound(_)));
    }

    #[test]
    fn timestamp_accepts_rfc3339_and_bare_date() {
        assert!(parse_timestamp("2026-02-16T10:30:00Z").is_ok());
        assert!(parse_timestamp("2026-02-16").is_ok());
        assert!(parse_timestamp("last tuesday").is_err());
    }

    #[test]
    fn missing_corpus_dir_is_an_error() {
        let result = FileStore::open(Path::new("/nonexistent/corpus"), SEP);
        assert!(result.is_err());
    }
}
