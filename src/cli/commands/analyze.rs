//! Analyze command: drive a full generation session and render the outcome.

use crate::backend::GeminiBackend;
use crate::cli::Output;
use crate::codec::decode_base64;
use crate::config::Settings;
use crate::error::{LibrettoError, Result};
use crate::pipeline::{BookRequest, GenerationPipeline};
use crate::session::Session;
use std::sync::Arc;

/// Options for the analyze command.
pub struct AnalyzeOptions {
    pub image_out: Option<String>,
    pub narrate: bool,
    pub audio_out: Option<String>,
    pub json: bool,
}

/// Run the analyze command.
pub async fn run_analyze(
    title: &str,
    author: &str,
    options: AnalyzeOptions,
    settings: Settings,
) -> Result<()> {
    let backend = Arc::new(GeminiBackend::new(&settings)?);
    let pipeline = GenerationPipeline::new(backend, settings);
    let mut session = Session::new(pipeline);

    let request = BookRequest::new(title, author);

    let spinner = Output::spinner("Deconstructing narratives...");
    let result = session.submit(request).await;
    spinner.finish_and_clear();

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            Output::error(&format!("Generation failed: {}", e));
            return Err(e);
        }
    };

    if options.json {
        println!("{}", serde_json::to_string_pretty(outcome).map_err(|e| {
            LibrettoError::Backend(format!("Failed to serialize outcome: {}", e))
        })?);
    } else {
        Output::outcome(outcome);
    }

    if let Some(path) = &options.image_out {
        save_image(&outcome.image_uri, path)?;
        Output::success(&format!("Illustration saved to {}", path));
    }

    if options.narrate || options.audio_out.is_some() {
        let path = options.audio_out.as_deref().unwrap_or("brief.wav");
        let spinner = Output::spinner("Synthesizing narration...");
        let narration = session.narrate().await?;
        spinner.finish_and_clear();

        match narration {
            Some(buffer) => {
                let mut file = std::fs::File::create(path)?;
                buffer.write_wav(&mut file)?;
                session.finish_narration();
                Output::success(&format!(
                    "Narrated brief saved to {} ({:.1}s)",
                    path,
                    buffer.duration_seconds()
                ));
            }
            None => Output::warning("Narration unavailable, continuing without audio"),
        }
    }

    Ok(())
}

/// Decode a `data:image/png;base64,` URI and write the bytes to a file.
fn save_image(image_uri: &str, path: &str) -> Result<()> {
    let payload = image_uri
        .split_once("base64,")
        .map(|(_, p)| p)
        .ok_or_else(|| LibrettoError::Format("Image URI is not a base64 data URI".to_string()))?;

    let bytes = decode_base64(payload)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_image_rejects_plain_uri() {
        assert!(matches!(
            save_image("https://example.com/cover.png", "/tmp/out.png"),
            Err(LibrettoError::Format(_))
        ));
    }
}
