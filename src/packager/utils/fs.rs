//! File system utilities for the working directory.
//!
//! Provides idempotent directory creation and removal, recursive copies that
//! preserve symlinks, and the permission fix-up needed for installer scripts.

use crate::packager::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    fs::create_dir_all(path)
        .await
        .fs_context("creating directory", path)
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing directory", path),
    }
}

/// Removes a file if it exists.
pub async fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).fs_context("removing file", path),
    }
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// Fails if the source path is a directory or doesn't exist.
pub async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if !from.exists() {
        return Err(Error::MissingInput {
            path: from.to_path_buf(),
        });
    }
    if !from.is_file() {
        return Err(Error::GenericError(format!("{from:?} is not a file")));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir)
            .await
            .fs_context("creating parent directory", dest_dir)?;
    }
    fs::copy(from, to).await.fs_context("copying file", from)?;
    Ok(())
}

/// Marks a file `rwxr-xr-x`.
#[cfg(unix)]
pub async fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        .await
        .fs_context("setting executable permissions", path)
}

/// Marks a file `rwxr-xr-x`.
#[cfg(not(unix))]
pub async fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Makes a symbolic link.
#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link.
#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
    if src.is_dir() {
        std::os::windows::fs::symlink_dir(src, dst)
    } else {
        std::os::windows::fs::symlink_file(src, dst)
    }
}

/// Recursively copies a directory, skipping top-level entries named in `exclude`.
///
/// Preserves symlinks on platforms that support them.
/// Fails if the source path is not a directory or doesn't exist.
pub async fn copy_dir_excluding(from: &Path, to: &Path, exclude: &[String]) -> Result<()> {
    if !from.exists() {
        return Err(Error::MissingInput {
            path: from.to_path_buf(),
        });
    }
    if !from.is_dir() {
        return Err(Error::GenericError(format!("{from:?} is not a Directory")));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();
    let exclude: Vec<PathBuf> = exclude.iter().map(PathBuf::from).collect();

    tokio::task::spawn_blocking(move || -> Result<()> {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).fs_context("creating parent directory", parent)?;
        }

        let walker = walkdir::WalkDir::new(&from)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() != 1
                    || !exclude
                        .iter()
                        .any(|name| entry.file_name() == name.as_os_str())
            });

        for entry in walker {
            let entry = entry?;
            let rel_path = entry.path().strip_prefix(&from)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())
                    .fs_context("reading symlink", entry.path())?;
                symlink(&target, &dest_path).fs_context("creating symlink", &dest_path)?;
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(&dest_path)
                    .fs_context("creating directory", &dest_path)?;
            } else {
                std::fs::copy(entry.path(), &dest_path)
                    .fs_context("copying file", entry.path())?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| Error::GenericError(format!("Directory copy task panicked: {}", e)))?
}

/// Recursively copies a directory from one path to another.
pub async fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    copy_dir_excluding(from, to, &[]).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_dir_skips_excluded_top_level_entries() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        std::fs::write(src.path().join("Welcome.rtf"), b"hi").unwrap();
        std::fs::write(src.path().join("Description.plist"), b"x").unwrap();
        std::fs::create_dir(src.path().join("en.lproj")).unwrap();
        std::fs::write(src.path().join("en.lproj").join("Description.plist"), b"y").unwrap();

        let target = dst.path().join("Resources");
        copy_dir_excluding(src.path(), &target, &["Description.plist".to_string()])
            .await
            .unwrap();

        assert!(target.join("Welcome.rtf").is_file());
        assert!(!target.join("Description.plist").exists());
        // Only top-level names are excluded.
        assert!(target.join("en.lproj").join("Description.plist").is_file());
    }

    #[tokio::test]
    async fn remove_dir_all_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        remove_dir_all(&missing).await.unwrap();
        remove_dir_all(&missing).await.unwrap();
    }

    #[tokio::test]
    async fn create_dir_all_erases_existing_contents() {
        let dir = tempfile::tempdir().unwrap();
        let work = dir.path().join("temp");
        std::fs::create_dir_all(work.join("stale")).unwrap();

        create_dir_all(&work, true).await.unwrap();

        assert!(work.is_dir());
        assert!(!work.join("stale").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn set_executable_sets_mode() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("postinstall");
        std::fs::write(&script, b"#!/bin/sh\n").unwrap();

        set_executable(&script).await.unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
