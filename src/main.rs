//! Libretto CLI entry point.

use anyhow::Result;
use clap::Parser;
use libretto::cli::{commands, Cli, Commands};
use libretto::cli::commands::AnalyzeOptions;
use libretto::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("libretto={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match &cli.command {
        Commands::Init => {
            commands::run_init(&settings)?;
        }

        Commands::Analyze {
            title,
            author,
            image_out,
            narrate,
            audio_out,
            json,
        } => {
            let options = AnalyzeOptions {
                image_out: image_out.clone(),
                narrate: *narrate,
                audio_out: audio_out.clone(),
                json: *json,
            };
            commands::run_analyze(title, author, options, settings).await?;
        }

        Commands::Narrate { text, output } => {
            commands::run_narrate(text.as_deref(), output, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings)?;
        }
    }

    Ok(())
}
