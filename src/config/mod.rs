//! Configuration module for fieldgraph.
//!
//! Handles compiler settings loaded from TOML.

mod settings;

pub use settings::{AttachmentSettings, CompilerSettings, Settings, SettingsError};
