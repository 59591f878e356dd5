//! Packloom CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Initialize config & corpus directory
//! - `query`    — Assemble a context for a pack query
//! - `packs`    — List the packs the store knows about
//! - `show`     — Print one document version by id
//! - `validate` — Scan the corpus and report parse warnings

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "packloom",
    about = "Packloom — knowledge pack retrieval & context assembly",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration and the corpus directory
    Init,

    /// Assemble a context for a query against one pack
    Query {
        /// Pack to query (e.g. "solana")
        pack: String,

        /// Topic hint steering relevance (e.g. "bridge integration")
        #[arg(short, long)]
        topic: Option<String>,

        /// Tag filter; repeat for multiple tags
        #[arg(short = 'g', long = "tag")]
        tags: Vec<String>,

        /// Byte budget for the assembled context (0 = configured default)
        #[arg(short, long, default_value_t = 0)]
        budget: usize,

        /// Emit the full result (body + metadata) as JSON
        #[arg(long)]
        json: bool,
    },

    /// List packs with subject and version counts
    Packs,

    /// Show one stored document version by id
    Show {
        /// Document version id (e.g. "solana/bridge-integration#a1b2c3d4")
        id: String,
    },

    /// Validate the markdown corpus and report anomalies
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Query {
            pack,
            topic,
            tags,
            budget,
            json,
        } => commands::query::run(pack, topic, tags, budget, json).await?,
        Commands::Packs => commands::packs::run().await?,
        Commands::Show { id } => commands::show::run(&id).await?,
        Commands::Validate => commands::validate::run().await?,
    }

    Ok(())
}
