//! Libretto - Professional Book Analysis
//!
//! A CLI client that turns a (title, author) pair into a multi-modal
//! "pro version" analysis of a book: a structured executive digest with
//! web-grounded citations, a derived concept-art illustration, and an
//! optional narrated audio brief.
//!
//! # Overview
//!
//! Libretto allows you to:
//! - Generate a schema-validated professional analysis of any book
//! - Derive a 16:9 concept-art illustration from the analysis itself
//! - Synthesize a calm spoken narration of the executive summary
//! - Inspect the grounding sources the backend cited
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `codec` - Base64 and PCM16 transcoding
//! - `audio` - Assembled, time-addressable audio buffers
//! - `backend` - Generative backend abstraction (Gemini, scripted)
//! - `pipeline` - The ordered generation pipeline (analysis, image, audio)
//! - `session` - Session lifecycle state machine
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use libretto::backend::GeminiBackend;
//! use libretto::config::Settings;
//! use libretto::pipeline::{BookRequest, GenerationPipeline};
//! use libretto::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let backend = Arc::new(GeminiBackend::new(&settings)?);
//!     let pipeline = GenerationPipeline::new(backend, settings);
//!     let mut session = Session::new(pipeline);
//!
//!     let request = BookRequest::new("Thinking, Fast and Slow", "Daniel Kahneman");
//!     let outcome = session.submit(request).await?;
//!     println!("{}", outcome.analysis.executive_summary);
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod backend;
pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;

pub use error::{LibrettoError, Result};
