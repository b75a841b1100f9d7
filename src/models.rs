//! Data structures produced while archiving a document.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::resolver::UsedNames;

/// One source path and the destination it is copied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathPair {
  /// Path exactly as it appeared in the document.
  pub source: String,
  /// Unique destination inside the assets directory.
  pub destination: PathBuf,
}

impl PathPair {
  /// File name of the destination.
  pub fn file_name(&self) -> &str {
    self
      .destination
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or_default()
  }

  /// Relative reference written into the document, e.g. `assets/img.png`.
  pub fn relative_reference(&self, assets_dir: &str) -> String {
    format!("{}/{}", assets_dir, self.file_name())
  }
}

/// Insertion-ordered mapping from source paths to destinations for one run.
///
/// Each distinct source appears once, in order of first appearance. The mapping is immutable
/// after [`PathMapping::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PathMapping {
  pairs: Vec<PathPair>,
}

impl PathMapping {
  /// Deduplicate `extracted` and assign every distinct path a destination.
  ///
  /// A fresh [`UsedNames`] is created here, so repeated builds never influence each other.
  pub fn build<I, S>(extracted: I, document_dir: &Path, assets_dir: &str) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut seen = BTreeSet::new();
    let mut used = UsedNames::new();
    let mut pairs = Vec::new();

    for path in extracted {
      let path = path.as_ref();
      if !seen.insert(path.to_string()) {
        continue;
      }
      pairs.push(PathPair {
        source: path.to_string(),
        destination: used.assign(path, document_dir, assets_dir),
      });
    }

    Self { pairs }
  }

  /// Pairs in mapping order.
  pub fn iter(&self) -> std::slice::Iter<'_, PathPair> {
    self.pairs.iter()
  }

  /// Number of distinct source paths.
  pub fn len(&self) -> usize {
    self.pairs.len()
  }

  /// `true` when the document referenced no images.
  pub fn is_empty(&self) -> bool {
    self.pairs.is_empty()
  }

  /// Destination assigned to `source`, if it was extracted.
  pub fn destination_of(&self, source: &str) -> Option<&Path> {
    self
      .pairs
      .iter()
      .find(|pair| pair.source == source)
      .map(|pair| pair.destination.as_path())
  }
}

impl<'a> IntoIterator for &'a PathMapping {
  type Item = &'a PathPair;
  type IntoIter = std::slice::Iter<'a, PathPair>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// Outcome of a successful archiving run.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
  /// Document that was rewritten.
  pub document: PathBuf,
  /// Pre-mutation copy of the document.
  pub backup: PathBuf,
  /// Source to destination assignment used for copying and rewriting.
  pub mapping: PathMapping,
  /// Assets newly copied during the run.
  pub copied: usize,
  /// Assets whose destination already was the source file.
  pub reused: usize,
  /// Occurrences of source paths replaced in the document text.
  pub replacements: usize,
}
