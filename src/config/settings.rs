//! TOML-based configuration for the field compiler.
//!
//! Supports a config file (fieldgraph.toml); every key is optional.
//!
//! Example configuration:
//! ```toml
//! [compiler]
//! dialect = "sqlite"        # sqlite | postgres | duckdb
//! base_alias = "t"
//! id_column = "id"
//! expand_suffix = "_expand"
//! coalesce_counts = true
//!
//! [attachment]
//! table = "attachment"
//! record_id_column = "record_id"
//! field_id_column = "field_id"
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compiler::{AttachmentOptions, CompileOptions};
use crate::naming::DEFAULT_EXPAND_SUFFIX;
use crate::sql::Dialect;

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub compiler: CompilerSettings,
    pub attachment: AttachmentSettings,
}

/// Compiler configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompilerSettings {
    /// SQL dialect of the rendered output.
    pub dialect: Dialect,

    /// Alias of the base record table.
    pub base_alias: String,

    /// Record identity column.
    pub id_column: String,

    /// Suffix of JSON expand columns.
    pub expand_suffix: String,

    /// Report 0 instead of NULL for counts with no related records.
    pub coalesce_counts: bool,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            base_alias: "t".to_string(),
            id_column: "id".to_string(),
            expand_suffix: DEFAULT_EXPAND_SUFFIX.to_string(),
            coalesce_counts: true,
        }
    }
}

/// Attachment table configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AttachmentSettings {
    /// Table holding one row per attached file.
    pub table: String,

    /// Column pointing back at the owning record.
    pub record_id_column: String,

    /// Column naming the attachment field a file was uploaded to.
    pub field_id_column: String,
}

impl Default for AttachmentSettings {
    fn default() -> Self {
        Self {
            table: "attachment".to_string(),
            record_id_column: "record_id".to_string(),
            field_id_column: "field_id".to_string(),
        }
    }
}

impl Settings {
    /// Parse and validate settings from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `FIELDGRAPH_CONFIG`
    /// 2. `./fieldgraph.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("FIELDGRAPH_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("fieldgraph.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// Reject values that would produce invalid SQL identifiers.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let required = [
            ("compiler.base_alias", &self.compiler.base_alias),
            ("compiler.id_column", &self.compiler.id_column),
            ("attachment.table", &self.attachment.table),
            ("attachment.record_id_column", &self.attachment.record_id_column),
            ("attachment.field_id_column", &self.attachment.field_id_column),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(SettingsError::InvalidConfig(format!("{} must not be empty", key)));
            }
        }
        Ok(())
    }

    /// Options for [`Compiler`](crate::compiler::Compiler).
    pub fn compiler_options(&self) -> CompileOptions {
        CompileOptions {
            dialect: self.compiler.dialect,
            base_alias: self.compiler.base_alias.clone(),
            id_column: self.compiler.id_column.clone(),
            expand_suffix: self.compiler.expand_suffix.clone(),
            coalesce_counts: self.compiler.coalesce_counts,
            attachment: AttachmentOptions {
                table: self.attachment.table.clone(),
                record_id_column: self.attachment.record_id_column.clone(),
                field_id_column: self.attachment.field_id_column.clone(),
            },
        }
    }
}
