//! Init command: write a default configuration file.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::Result;

/// Run the init command.
pub fn run_init(settings: &Settings) -> Result<()> {
    let config_path = Settings::default_config_path();

    if config_path.exists() {
        Output::info(&format!(
            "Configuration already exists at {}",
            config_path.display()
        ));
    } else {
        settings.save_to(&config_path)?;
        Output::success(&format!("Wrote {}", config_path.display()));
    }

    std::fs::create_dir_all(settings.data_dir())?;

    if std::env::var("GEMINI_API_KEY").is_err() {
        Output::warning("GEMINI_API_KEY is not set; generation commands will fail without it");
    }

    Ok(())
}
