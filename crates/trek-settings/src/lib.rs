//! # trek-settings
//!
//! Configuration for the Trek pipeline.
//!
//! Loading flow:
//! 1. Start with compiled [`TrekSettings::default()`]
//! 2. If `~/.trek/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{
    ExtractorSettings, GatewaySettings, QualitySettings, SummarizerSettings, TrekSettings,
};
