//! `packloom query` — Assemble a context for one pack query.

use chrono::Utc;
use packloom_config::AppConfig;
use packloom_core::Query;
use packloom_engine::ContextEngine;

pub async fn run(
    pack: String,
    topic: Option<String>,
    tags: Vec<String>,
    budget: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_store(&config).await?;
    let engine = ContextEngine::new(store, &config);

    let query = Query {
        pack,
        topic_hint: topic,
        tags,
        budget_bytes: budget,
    };
    let context = engine.assemble(&query, Utc::now()).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(());
    }

    let meta = &context.metadata;
    println!(
        "📦 Context: {} / {} bytes ({} included, {} excluded)",
        meta.bytes_used,
        meta.budget_bytes,
        meta.included.len(),
        meta.excluded.len()
    );
    if let Some(reason) = &meta.reason {
        println!("  (empty: {reason})");
    }
    for doc in &meta.included {
        let mut flags = String::new();
        if doc.truncated {
            flags.push_str(" [truncated]");
        }
        if doc.stale {
            flags.push_str(" [stale]");
        }
        println!(
            "  + {:<44} score {:.3}  {} B{flags}",
            doc.id, doc.score, doc.bytes
        );
    }
    for exc in &meta.excluded {
        println!("  - {:<44} {}", exc.id, exc.reason.as_str());
    }
    for warning in &meta.warnings {
        println!("  ⚠️  {warning}");
    }

    if !context.body.is_empty() {
        println!("\n{}", context.body);
    }

    Ok(())
}
