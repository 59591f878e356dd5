//! `packloom packs` — List the packs the store knows about.

use packloom_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_store(&config).await?;

    let packs = store.packs().await?;
    if packs.is_empty() {
        println!("No packs found (backend: {})", store.name());
        return Ok(());
    }

    println!("📚 Packs ({})", store.name());
    println!("{:<24} {:>10} {:>10}", "NAME", "SUBJECTS", "VERSIONS");
    for pack in &packs {
        println!("{:<24} {:>10} {:>10}", pack.name, pack.subjects, pack.versions);
    }
    println!("\n{} document versions total", store.count().await?);

    Ok(())
}
