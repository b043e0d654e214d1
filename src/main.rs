mod error;
mod fetch;
mod parser;
mod schema;
mod settings;
mod validate;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use schema::Registry;
use settings::Settings;

#[derive(Parser)]
#[command(name = "botapi_scraper", about = "Telegram Bot API reference → JSON schema")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, extract, validate and write the schema
    Scrape {
        /// Read a saved HTML page instead of fetching
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Where to write the schema (default: BOTAPI_OUTPUT or api.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract and validate without writing anything
    Check {
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Print one extracted type or method
    Show {
        /// Type or method name, e.g. "Message" or "sendMessage"
        name: String,
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    let result = match cli.command {
        Commands::Scrape { input, output } => {
            let html = load_document(input.as_deref(), &settings).await?;
            let output = output.unwrap_or_else(|| PathBuf::from(&settings.output));
            let registry = run_scrape(&html, &settings, &output)?;
            println!(
                "Wrote {} types and {} methods to {}",
                registry.types.len(),
                registry.methods.len(),
                output.display()
            );
            Ok(())
        }
        Commands::Check { input } => {
            let html = load_document(input.as_deref(), &settings).await?;
            let registry = build_registry(&html, &settings)?;
            println!(
                "Schema OK: {} types, {} methods",
                registry.types.len(),
                registry.methods.len()
            );
            Ok(())
        }
        Commands::Show { name, input } => {
            let html = load_document(input.as_deref(), &settings).await?;
            let mut registry = parser::process_document(&html, &settings)?;
            // back-references are only known after validation
            validate::validate(&mut registry);
            match registry.record_json(&name)? {
                Some(json) => {
                    println!("{}", json);
                    Ok(())
                }
                None => bail!("No type or method named {}", name),
            }
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

async fn load_document(input: Option<&Path>, settings: &Settings) -> Result<String> {
    match input {
        Some(path) => fetch::read_document(path),
        None => fetch::fetch_document(&settings.api_url()).await,
    }
}

/// Extract and validate; any defect fails the whole run.
fn build_registry(html: &str, settings: &Settings) -> Result<Registry> {
    let mut registry = parser::process_document(html, settings)?;
    let report = validate::validate(&mut registry);
    if !report.is_ok() {
        bail!(
            "Failed to validate schema: {} defect(s), see log above",
            report.defects.len()
        );
    }
    Ok(registry)
}

/// The artifact is only written once the schema is known to be valid.
fn run_scrape(html: &str, settings: &Settings, output: &Path) -> Result<Registry> {
    let registry = build_registry(html, settings)?;
    let json = registry.to_json()?;
    std::fs::write(output, json + "\n")
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Schema written to {}", output.display());
    Ok(registry)
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
