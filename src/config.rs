//! Archiving configuration: which extensions count as images and where copies go.

use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

/// File looked up next to the document by [`ArchiveConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "asset-archiver.json";

/// Extensions recognised when no configuration says otherwise.
pub const DEFAULT_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Directory, relative to the document, receiving the copied images.
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Suffix appended to the document path for the pre-mutation copy.
pub const DEFAULT_BACKUP_SUFFIX: &str = ".bak";

/// Settings for one archiving run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Image extensions, including the leading dot, that terminate a recognised path.
    pub extensions: Vec<String>,
    /// Name of the directory next to the document that receives the copies.
    pub assets_dir: String,
    /// Suffix appended to the document path for the backup copy.
    pub backup_suffix: String,
    /// Match extensions regardless of ASCII case.
    pub case_insensitive_extensions: bool,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            assets_dir: DEFAULT_ASSETS_DIR.into(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.into(),
            case_insensitive_extensions: false,
        }
    }
}

/// Errors raised when an explicitly requested configuration file cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// Failed to parse the configuration JSON.
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}

impl ArchiveConfig {
    /// Look for [`DEFAULT_CONFIG_FILE`] in the document directory.
    ///
    /// A missing file yields the defaults. An unreadable or malformed file is logged and also
    /// yields the defaults, so a stray config never blocks archiving.
    pub fn discover(document_dir: &Path) -> Self {
        let candidate = document_dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.is_file() {
            return Self::default();
        }
        match Self::from_path(&candidate) {
            Ok(config) => config,
            Err(err) => {
                warn!("ignoring configuration: {err}");
                Self::default()
            }
        }
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.normalised())
    }

    /// Backup location for a document.
    pub fn backup_path(&self, document: &Path) -> PathBuf {
        let mut name = document.as_os_str().to_os_string();
        name.push(&self.backup_suffix);
        PathBuf::from(name)
    }

    /// Drop blank extensions and make sure each one carries its leading dot.
    fn normalised(mut self) -> Self {
        self.extensions = self
            .extensions
            .into_iter()
            .map(|ext| ext.trim().to_string())
            .filter(|ext| !ext.is_empty() && ext != ".")
            .map(|ext| if ext.starts_with('.') { ext } else { format!(".{ext}") })
            .collect();
        self.assets_dir = self.assets_dir.trim_matches(['/', '\\']).to_string();
        if self.assets_dir.is_empty() {
            self.assets_dir = DEFAULT_ASSETS_DIR.into();
        }
        if self.backup_suffix.is_empty() {
            self.backup_suffix = DEFAULT_BACKUP_SUFFIX.into();
        }
        self
    }
}
