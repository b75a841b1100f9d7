//! Archiving pipeline: backup, extract, resolve, copy, rewrite, write.
//!
//! There is no rollback. When a step fails the backup, any assets already copied and the
//! document are left exactly as they are; restoring from the `.bak` copy is a manual step.

use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::config::ArchiveConfig;
use crate::error::{ArchiveError, ArchiveResult};
use crate::matcher::PathMatcher;
use crate::models::{ArchiveReport, PathMapping, PathPair};
use crate::store::{BlobStore, FsStore, TextStore};

/// Copies the images a document references into its assets directory and rewrites the
/// references.
///
/// Every call to [`AssetArchiver::archive`] is independent; nothing carries over between
/// documents.
#[derive(Debug, Clone)]
pub struct AssetArchiver<S = FsStore> {
  store: S,
  config: ArchiveConfig,
  matcher: PathMatcher,
}

/// What the copy phase should do with one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyAction {
  Copy,
  Reuse,
}

impl AssetArchiver<FsStore> {
  /// Archiver working on the local filesystem.
  pub fn with_config(config: ArchiveConfig) -> Self {
    Self::new(FsStore, config)
  }
}

impl<S: TextStore + BlobStore> AssetArchiver<S> {
  /// Create an archiver over `store`, compiling the path pattern once.
  pub fn new(store: S, config: ArchiveConfig) -> Self {
    let matcher = PathMatcher::new(&config.extensions, config.case_insensitive_extensions);
    Self {
      store,
      config,
      matcher,
    }
  }

  /// Configuration in use.
  pub fn config(&self) -> &ArchiveConfig {
    &self.config
  }

  /// Underlying store.
  pub fn store(&self) -> &S {
    &self.store
  }

  /// Run the whole pipeline for one document.
  pub fn archive(&self, document: &Path) -> ArchiveResult<ArchiveReport> {
    info!("archiving {}", document.display());
    let backup = self.backup(document)?;

    let text = self
      .store
      .read_text(document)
      .map_err(|source| ArchiveError::SourceUnreadable {
        path: document.to_path_buf(),
        source,
      })?;

    if let Some(pattern) = self.matcher.pattern() {
      debug!("path pattern: {pattern}");
    }
    let extracted = self.matcher.extract(&text);
    info!("found {} image path(s)", extracted.len());
    for path in &extracted {
      debug!("  {path}");
    }

    let document_dir = document.parent().unwrap_or_else(|| Path::new(""));
    let mapping = PathMapping::build(&extracted, document_dir, &self.config.assets_dir);
    info!("{} distinct image(s) to archive", mapping.len());

    let actions = self.plan_copies(&mapping)?;
    let mut copied = 0;
    let mut reused = 0;
    for (pair, action) in mapping.iter().zip(actions) {
      match action {
        CopyAction::Copy => {
          self.copy_asset(pair)?;
          copied += 1;
        }
        CopyAction::Reuse => {
          info!("{} is already in place", pair.destination.display());
          reused += 1;
        }
      }
    }

    let (rewritten, replacements) = rewrite_text(&text, &mapping, &self.config.assets_dir);
    self
      .store
      .write_text(document, &rewritten)
      .map_err(|source| ArchiveError::WriteFailed {
        path: document.to_path_buf(),
        source,
      })?;
    info!(
      "rewrote {replacements} reference(s) in {}",
      document.display()
    );

    Ok(ArchiveReport {
      document: document.to_path_buf(),
      backup,
      mapping,
      copied,
      reused,
      replacements,
    })
  }

  fn backup(&self, document: &Path) -> ArchiveResult<PathBuf> {
    self
      .store
      .check_readable(document)
      .map_err(|source| ArchiveError::SourceUnreadable {
        path: document.to_path_buf(),
        source,
      })?;

    let backup = self.config.backup_path(document);
    self
      .store
      .copy_file(document, &backup)
      .map_err(|source| ArchiveError::BackupFailed {
        path: backup.clone(),
        source,
      })?;
    info!("backup written to {}", backup.display());
    Ok(backup)
  }

  /// Check every pair before anything is copied.
  ///
  /// Unreadable sources and occupied destinations are reported before the first asset lands on
  /// disk. A destination that is the source file itself is left alone. The copy itself still
  /// refuses to overwrite, which catches names that only collide on case-folding filesystems.
  fn plan_copies(&self, mapping: &PathMapping) -> ArchiveResult<Vec<CopyAction>> {
    mapping
      .iter()
      .map(|pair| {
        let source = Path::new(&pair.source);
        self
          .store
          .check_readable(source)
          .map_err(|err| ArchiveError::SourceUnreadable {
            path: source.to_path_buf(),
            source: err,
          })?;
        if !self.store.exists(&pair.destination) {
          return Ok(CopyAction::Copy);
        }

        let same = self
          .store
          .is_same_file(source, &pair.destination)
          .map_err(|err| ArchiveError::SourceUnreadable {
            path: source.to_path_buf(),
            source: err,
          })?;
        if same {
          Ok(CopyAction::Reuse)
        } else {
          Err(ArchiveError::DestinationConflict {
            path: pair.destination.clone(),
          })
        }
      })
      .collect()
  }

  fn copy_asset(&self, pair: &PathPair) -> ArchiveResult<()> {
    if let Some(parent) = pair.destination.parent() {
      if !parent.as_os_str().is_empty() && !self.store.exists(parent) {
        self
          .store
          .create_dir_all(parent)
          .map_err(|source| ArchiveError::DirectoryCreateFailed {
            path: parent.to_path_buf(),
            source,
          })?;
      }
    }

    let source = Path::new(&pair.source);
    self
      .store
      .copy_new(source, &pair.destination)
      .map_err(|err| match err.kind() {
        io::ErrorKind::AlreadyExists => ArchiveError::DestinationConflict {
          path: pair.destination.clone(),
        },
        _ => ArchiveError::CopyFailed {
          source_path: source.to_path_buf(),
          destination: pair.destination.clone(),
          source: err,
        },
      })?;
    info!("copied {} to {}", pair.source, pair.destination.display());
    Ok(())
  }
}

/// Replace every occurrence of each source with its `<assets_dir>/<name>` reference.
///
/// Longer sources are substituted first so a source that is a prefix of another cannot break
/// it. Returns the new text and the number of occurrences replaced.
pub fn rewrite_text(text: &str, mapping: &PathMapping, assets_dir: &str) -> (String, usize) {
  let mut pairs: Vec<&PathPair> = mapping.iter().collect();
  pairs.sort_by(|left, right| right.source.len().cmp(&left.source.len()));

  let mut rewritten = text.to_string();
  let mut replacements = 0;
  for pair in pairs {
    let occurrences = rewritten.matches(pair.source.as_str()).count();
    if occurrences == 0 {
      continue;
    }
    let reference = pair.relative_reference(assets_dir);
    debug!("replacing {} with {reference}", pair.source);
    rewritten = rewritten.replace(pair.source.as_str(), &reference);
    replacements += occurrences;
  }

  (rewritten, replacements)
}
