//! Configuration module for Libretto.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{BackendSettings, GeneralSettings, NarrationSettings, Settings};
