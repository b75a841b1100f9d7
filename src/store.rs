//! Storage collaborators used by the archiver.
//!
//! The pipeline only talks to these traits. [`FsStore`] is the real filesystem; tests plug in
//! an in-memory store so drive-letter paths can be exercised on any host.

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Whole-document text access.
pub trait TextStore {
  /// Read the full UTF-8 text at `path`.
  fn read_text(&self, path: &Path) -> io::Result<String>;

  /// Replace the contents of `path` with `text`.
  fn write_text(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// Byte-level file duplication and the filesystem queries the copy phase needs.
pub trait BlobStore {
  /// Open `path` for reading and close it again.
  ///
  /// Used to tell an unreadable source apart from a failure on the destination side.
  fn check_readable(&self, path: &Path) -> io::Result<()>;

  /// Duplicate bytes and metadata from `source` to `destination`, replacing it if present.
  fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<()>;

  /// Duplicate bytes and metadata into a `destination` that must not exist yet.
  ///
  /// Fails with [`io::ErrorKind::AlreadyExists`] when it does, including when the filesystem
  /// folds case and a differently-cased name is already there.
  fn copy_new(&self, source: &Path, destination: &Path) -> io::Result<()>;

  /// Whether anything exists at `path`.
  fn exists(&self, path: &Path) -> bool;

  /// Whether both paths name the same underlying file.
  fn is_same_file(&self, left: &Path, right: &Path) -> io::Result<bool>;

  /// Create `path` and any missing parents.
  fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// Store backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl TextStore for FsStore {
  fn read_text(&self, path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
  }

  fn write_text(&self, path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
  }
}

impl BlobStore for FsStore {
  fn check_readable(&self, path: &Path) -> io::Result<()> {
    File::open(path).map(|_| ())
  }

  fn copy_file(&self, source: &Path, destination: &Path) -> io::Result<()> {
    // An earlier copy of a read-only source is read-only itself.
    if destination.exists() {
      make_writable(destination)?;
    }
    let target = File::options()
      .write(true)
      .create(true)
      .truncate(true)
      .open(destination)?;
    copy_contents(source, target, destination)
  }

  fn copy_new(&self, source: &Path, destination: &Path) -> io::Result<()> {
    let target = File::options()
      .write(true)
      .create_new(true)
      .open(destination)?;
    copy_contents(source, target, destination)
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }

  fn is_same_file(&self, left: &Path, right: &Path) -> io::Result<bool> {
    same_file::is_same_file(left, right)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
  }
}

/// Stream `source` into the already opened `target`, then carry over mtime and permissions.
///
/// The modification time is set through the open handle, and permissions are applied last, so a
/// read-only source never locks the copy before it is finished.
fn copy_contents(source: &Path, mut target: File, destination: &Path) -> io::Result<()> {
  let mut reader = File::open(source)?;
  let metadata = reader.metadata()?;
  io::copy(&mut reader, &mut target)?;
  target.set_modified(metadata.modified()?)?;
  drop(target);
  fs::set_permissions(destination, metadata.permissions())
}

fn make_writable(path: &Path) -> io::Result<()> {
  let mut permissions = fs::metadata(path)?.permissions();
  if !permissions.readonly() {
    return Ok(());
  }
  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    permissions.set_mode(permissions.mode() | 0o200);
  }
  #[cfg(not(unix))]
  #[allow(clippy::permissions_set_readonly_false)]
  permissions.set_readonly(false);
  fs::set_permissions(path, permissions)
}
