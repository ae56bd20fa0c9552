//! CLI command implementations.

mod analyze;
mod config;
mod init;
mod narrate;

pub use analyze::{run_analyze, AnalyzeOptions};
pub use config::run_config;
pub use init::run_init;
pub use narrate::run_narrate;
