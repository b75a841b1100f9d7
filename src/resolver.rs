//! Destination naming for archived images.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Final component of a path written with either `\` or `/` separators.
///
/// Extracted paths are Windows paths, so [`Path::file_name`] cannot be used on other hosts.
pub fn basename(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// Split a file name into stem and extension (extension keeps its dot).
///
/// A leading dot does not start an extension, so `.png` has stem `.png` and no extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(index) => name.split_at(index),
    }
}

/// File names already handed out during one archiving run.
///
/// Created fresh for every run so nothing leaks between documents. Names are never released.
#[derive(Debug, Clone, Default)]
pub struct UsedNames {
    names: BTreeSet<String>,
}

impl UsedNames {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` has been reserved.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Number of reserved names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// `true` when nothing has been reserved yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reserve a unique file name for `source` and return it.
    ///
    /// The basename is used when free, otherwise `stem_1.ext`, `stem_2.ext`, ... until an
    /// unused candidate turns up.
    pub fn reserve(&mut self, source: &str) -> String {
        let base = basename(source);
        if self.names.insert(base.to_string()) {
            return base.to_string();
        }

        let (stem, extension) = split_name(base);
        let mut counter = 1usize;
        loop {
            let candidate = format!("{stem}_{counter}{extension}");
            if self.names.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Reserve a name for `source` and place it under `<document_dir>/<assets_dir>/`.
    pub fn assign(&mut self, source: &str, document_dir: &Path, assets_dir: &str) -> PathBuf {
        document_dir.join(assets_dir).join(self.reserve(source))
    }
}
