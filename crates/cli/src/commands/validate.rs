//! `packloom validate` — Scan the markdown corpus and report anomalies.
//!
//! Ingestion is tolerant: missing or malformed frontmatter fields are
//! absorbed with defaults and recorded as warnings rather than rejecting
//! the article. This command surfaces those warnings so corpus authors can
//! fix them at the source.

use packloom_config::AppConfig;
use packloom_core::DocumentStore;
use packloom_store::FileStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let corpus_dir = &config.store.corpus_dir;

    if !corpus_dir.exists() {
        return Err(format!(
            "Corpus directory {} does not exist — run `packloom init` first",
            corpus_dir.display()
        )
        .into());
    }

    println!("🔍 Validating corpus at {}", corpus_dir.display());
    let store = FileStore::open(corpus_dir, &config.packing.separator)?;

    let packs = store.packs().await?;
    let total = store.count().await?;
    println!(
        "  {} packs, {} subjects, {} document versions",
        packs.len(),
        packs.iter().map(|p| p.subjects).sum::<usize>(),
        total
    );

    let warnings = store.warnings();
    if warnings.is_empty() {
        println!("  ✅ No anomalies");
    } else {
        println!("  ⚠️  {} anomalies:", warnings.len());
        for warning in warnings {
            println!("    - {warning}");
        }
    }

    Ok(())
}
