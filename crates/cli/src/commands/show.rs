//! `packloom show` — Print one stored document version.

use packloom_config::AppConfig;

pub async fn run(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = super::open_store(&config).await?;

    let Some(doc) = store.get(id).await? else {
        return Err(format!("No document with id '{id}'").into());
    };

    println!("id:              {}", doc.id);
    println!("pack:            {}", doc.pack);
    println!("topic:           {}", doc.topic);
    println!("slug:            {}", doc.slug);
    match doc.confidence {
        Some(c) => println!("confidence:      {c}/10"),
        None => println!("confidence:      (missing)"),
    }
    println!("sources_checked: {}", doc.sources_checked);
    println!("last_updated:    {}", doc.last_updated.to_rfc3339());
    println!("last_verified:   {}", doc.last_verified.to_rfc3339());
    if !doc.tags.is_empty() {
        println!("tags:            {}", doc.tags.join(", "));
    }
    println!("size:            {} bytes", doc.size_bytes());
    println!("\n{}", doc.body);

    Ok(())
}
