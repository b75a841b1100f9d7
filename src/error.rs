//! Error types produced while archiving a document's image assets.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Fatal failures of a single archiving run.
///
/// None of these are retried. Whatever was already written (the backup, assets copied so far)
/// stays on disk for manual inspection.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The document or a referenced image could not be opened.
    #[error("cannot read {}: {source}", .path.display())]
    SourceUnreadable {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The `.bak` copy of the document could not be written.
    #[error("failed to write backup {}: {source}", .path.display())]
    BackupFailed {
        /// Backup path that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A destination computed for an image already exists and is a different file.
    #[error("destination {} already exists", .path.display())]
    DestinationConflict {
        /// Destination that is already occupied.
        path: PathBuf,
    },
    /// The assets directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A readable image could not be duplicated into the assets directory.
    #[error("failed to copy {} to {}: {source}", .source_path.display(), .destination.display())]
    CopyFailed {
        /// Image being copied.
        source_path: PathBuf,
        /// Destination inside the assets directory.
        destination: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The rewritten document could not be persisted.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        /// Document path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Fieldless classification of [`ArchiveError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveErrorKind {
    /// See [`ArchiveError::SourceUnreadable`].
    SourceUnreadable,
    /// See [`ArchiveError::BackupFailed`].
    BackupFailed,
    /// See [`ArchiveError::DestinationConflict`].
    DestinationConflict,
    /// See [`ArchiveError::DirectoryCreateFailed`].
    DirectoryCreateFailed,
    /// See [`ArchiveError::CopyFailed`].
    CopyFailed,
    /// See [`ArchiveError::WriteFailed`].
    WriteFailed,
}

impl ArchiveError {
    /// Classify the error.
    pub fn kind(&self) -> ArchiveErrorKind {
        match self {
            Self::SourceUnreadable { .. } => ArchiveErrorKind::SourceUnreadable,
            Self::BackupFailed { .. } => ArchiveErrorKind::BackupFailed,
            Self::DestinationConflict { .. } => ArchiveErrorKind::DestinationConflict,
            Self::DirectoryCreateFailed { .. } => ArchiveErrorKind::DirectoryCreateFailed,
            Self::CopyFailed { .. } => ArchiveErrorKind::CopyFailed,
            Self::WriteFailed { .. } => ArchiveErrorKind::WriteFailed,
        }
    }

    /// Path the failure is about.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::SourceUnreadable { path, .. }
            | Self::BackupFailed { path, .. }
            | Self::DestinationConflict { path }
            | Self::DirectoryCreateFailed { path, .. }
            | Self::WriteFailed { path, .. } => path,
            Self::CopyFailed { source_path, .. } => source_path,
        }
    }
}
