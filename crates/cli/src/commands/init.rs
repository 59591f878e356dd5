//! `packloom init` — First-time setup.

use packloom_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("📦 Packloom — First-Time Setup");
    println!("==============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config file exists: {}", config_path.display());
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config file: {}", config_path.display());
    }

    let config = AppConfig::load()?;
    let corpus_dir = &config.store.corpus_dir;
    if !corpus_dir.exists() {
        std::fs::create_dir_all(corpus_dir)?;
        println!("✅ Created corpus directory: {}", corpus_dir.display());
    } else {
        println!("  Corpus directory exists: {}", corpus_dir.display());
    }

    println!("\nDrop pack markdown files under {} and run:", corpus_dir.display());
    println!("  packloom validate");
    println!("  packloom query <pack> --topic \"...\"");

    Ok(())
}
