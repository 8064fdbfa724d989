//! File system utilities for bundling.
//!
//! Copies overwrite existing destination files, and directory removal
//! ignores missing paths, so re-running the pipeline after a partial failure
//! converges on the same output.

use std::{
    io::{self},
    path::Path,
};
use tokio::fs;

/// Creates all of the directories of the specified path, erasing it first if specified.
pub async fn create_dir_all(path: &Path, erase: bool) -> io::Result<()> {
    if erase {
        remove_dir_all(path).await?;
    }

    // create_dir_all is already idempotent - succeeds even if dir exists
    fs::create_dir_all(path).await
}

/// Removes the directory and its contents if it exists.
pub async fn remove_dir_all(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Makes a symbolic link to a directory.
#[cfg(unix)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a directory.
#[cfg(windows)]
fn symlink_dir(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(unix)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(src, dst)
}

/// Makes a symbolic link to a file.
#[cfg(windows)]
fn symlink_file(src: &Path, dst: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(src, dst)
}

/// Copies a regular file from one path to another, creating any parent
/// directories of the destination path as necessary.
///
/// An existing destination file is overwritten. Fails if the source is
/// missing or is a directory.
pub async fn copy_file(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from).await?;
    if !metadata.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a file", from.display()),
        ));
    }
    if let Some(dest_dir) = to.parent() {
        fs::create_dir_all(dest_dir).await?;
    }
    fs::copy(from, to).await?;
    Ok(())
}

/// Recursively copies a directory from one path to another, creating any
/// parent directories of the destination path as necessary.
///
/// Preserves symlinks on platforms that support them. Callers that need a
/// byte-identical tree should remove the destination first.
pub async fn copy_dir(from: &Path, to: &Path) -> io::Result<()> {
    let metadata = fs::metadata(from).await?;
    if !metadata.is_dir() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is not a directory", from.display()),
        ));
    }

    let from = from.to_path_buf();
    let to = to.to_path_buf();

    tokio::task::spawn_blocking(move || {
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent)?;
        }

        for entry in walkdir::WalkDir::new(&from) {
            let entry = entry?;
            let rel_path = entry
                .path()
                .strip_prefix(&from)
                .map_err(io::Error::other)?;
            let dest_path = to.join(rel_path);

            if entry.file_type().is_symlink() {
                let target = std::fs::read_link(entry.path())?;
                if entry.path().is_dir() {
                    symlink_dir(&target, &dest_path)?;
                } else {
                    symlink_file(&target, &dest_path)?;
                }
            } else if entry.file_type().is_dir() {
                std::fs::create_dir_all(dest_path)?;
            } else {
                std::fs::copy(entry.path(), dest_path)?;
            }
        }

        Ok(())
    })
    .await
    .map_err(|e| io::Error::other(format!("directory copy task panicked: {e}")))?
}

/// Copies each immediate child of `from` into `to`.
///
/// Files land directly in `to`; subdirectories are copied whole under their
/// own name. `to` is created if missing.
pub async fn copy_dir_contents(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to).await?;

    let mut entries = fs::read_dir(from).await?;
    while let Some(entry) = entries.next_entry().await? {
        let source = entry.path();
        let destination = to.join(entry.file_name());
        if entry.file_type().await?.is_dir() {
            copy_dir(&source, &destination).await?;
        } else {
            copy_file(&source, &destination).await?;
        }
    }

    Ok(())
}

/// Marks a file as executable (mode 0755).
#[cfg(unix)]
pub async fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await
}

/// Marks a file as executable. No-op on platforms without mode bits.
#[cfg(not(unix))]
pub async fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn copy_file_overwrites_destination() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("a.txt");
        let dst = temp.path().join("nested/b.txt");
        std::fs::write(&src, "new").unwrap();
        std::fs::create_dir_all(dst.parent().unwrap()).unwrap();
        std::fs::write(&dst, "old contents").unwrap();

        copy_file(&src, &dst).await.unwrap();

        assert_eq!(std::fs::read_to_string(&dst).unwrap(), "new");
    }

    #[tokio::test]
    async fn copy_file_rejects_directories() {
        let temp = tempfile::tempdir().unwrap();
        let err = copy_file(temp.path(), &temp.path().join("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn copy_dir_contents_is_one_level_flat() {
        let temp = tempfile::tempdir().unwrap();
        let src = temp.path().join("src");
        std::fs::create_dir_all(src.join("sub")).unwrap();
        std::fs::write(src.join("top.txt"), "top").unwrap();
        std::fs::write(src.join("sub/inner.txt"), "inner").unwrap();
        let dst = temp.path().join("dst");

        copy_dir_contents(&src, &dst).await.unwrap();

        assert!(dst.join("top.txt").is_file());
        assert!(dst.join("sub/inner.txt").is_file());
        assert!(!dst.join("inner.txt").exists());
    }

    #[tokio::test]
    async fn remove_dir_all_ignores_missing() {
        let temp = tempfile::tempdir().unwrap();
        remove_dir_all(&temp.path().join("missing")).await.unwrap();
    }
}
