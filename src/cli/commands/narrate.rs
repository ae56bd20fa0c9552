//! Narrate command: run the speech stage standalone.

use crate::backend::GeminiBackend;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{LibrettoError, Result};
use crate::pipeline::GenerationPipeline;
use std::io::Read;
use std::sync::Arc;

/// Run the narrate command. Text comes from the argument or stdin.
pub async fn run_narrate(text: Option<&str>, output: &str, settings: Settings) -> Result<()> {
    let text = match text {
        Some(t) => t.to_string(),
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    if text.trim().is_empty() {
        return Err(LibrettoError::InvalidInput(
            "Nothing to narrate: no text provided".to_string(),
        ));
    }

    let backend = Arc::new(GeminiBackend::new(&settings)?);
    let pipeline = GenerationPipeline::new(backend, settings);

    let spinner = Output::spinner("Synthesizing narration...");
    let buffer = pipeline.run_audio_narration(&text).await?;
    spinner.finish_and_clear();

    let mut file = std::fs::File::create(output)?;
    buffer.write_wav(&mut file)?;

    Output::success(&format!(
        "Narration saved to {} ({:.1}s at {} Hz)",
        output,
        buffer.duration_seconds(),
        buffer.sample_rate()
    ));

    Ok(())
}
