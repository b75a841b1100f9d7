#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod resolver;
pub mod store;

pub use archiver::{AssetArchiver, rewrite_text};
pub use config::{ArchiveConfig, ConfigError};
pub use error::{ArchiveError, ArchiveErrorKind, ArchiveResult};
pub use matcher::PathMatcher;
pub use models::{ArchiveReport, PathMapping, PathPair};
pub use resolver::UsedNames;
pub use store::{BlobStore, FsStore, TextStore};
