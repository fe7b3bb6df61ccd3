//! Directory symlinks exposing checkouts inside the docs tree.

use std::fs;
use std::io;
use std::path::Path;

use crate::SyncError;

/// Point `link` at directory `target`, replacing an existing link or file.
///
/// A real directory at `link` is never removed.
pub(crate) fn replace_dir_link(target: &Path, link: &Path) -> Result<(), SyncError> {
    let io_error = |source| SyncError::Io {
        path: link.to_path_buf(),
        source,
    };

    match fs::symlink_metadata(link) {
        Ok(meta) if meta.is_dir() => return Err(SyncError::Occupied(link.to_path_buf())),
        Ok(_) => remove_link(link).map_err(io_error)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(io_error(e)),
    }

    if let Some(parent) = link.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    symlink_dir(target, link).map_err(io_error)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(unix)]
fn remove_link(link: &Path) -> io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_link(link: &Path) -> io::Result<()> {
    // Directory symlinks are removed as directories on Windows.
    fs::remove_dir(link).or_else(|_| fs::remove_file(link))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_creates_link_and_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let link = temp_dir.path().join("docs/api/000-autumn");

        replace_dir_link(&target, &link).unwrap();

        assert_eq!(fs::read_link(&link).unwrap(), target);
    }

    #[test]
    fn test_replaces_existing_link() {
        let temp_dir = tempfile::tempdir().unwrap();
        let old = temp_dir.path().join("old");
        let new = temp_dir.path().join("new");
        fs::create_dir(&old).unwrap();
        fs::create_dir(&new).unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&old, &link).unwrap();

        replace_dir_link(&new, &link).unwrap();

        assert_eq!(fs::read_link(&link).unwrap(), new);
        assert!(old.exists());
    }

    #[test]
    fn test_refuses_real_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let target = temp_dir.path().join("target");
        fs::create_dir(&target).unwrap();
        let occupied = temp_dir.path().join("occupied");
        fs::create_dir(&occupied).unwrap();

        let result = replace_dir_link(&target, &occupied);
        assert!(matches!(result, Err(SyncError::Occupied(_))));
        assert!(occupied.is_dir());
    }
}
