//! Scratch directory for bytes at rest during an operation.
//!
//! Every file gets its own `{uuid}.{ext}` path so concurrent uploads sharing a name never
//! collide. Cleanup after a batch is spawned and not awaited by the request.

use std::io;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    /// Create (if needed) and open the scratch directory at `root`.
    pub async fn create(root: impl Into<PathBuf>) -> io::Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh path for a file originally named `file_name`. Nothing is created on disk.
    pub fn allocate(&self, file_name: &str) -> PathBuf {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()));
        let unique = Uuid::new_v4();
        match extension {
            Some(ext) => self.root.join(format!("{}.{}", unique, ext)),
            None => self.root.join(unique.to_string()),
        }
    }

    /// Delete `paths` in the background. Failures are logged, never raised.
    pub fn remove_later(&self, paths: Vec<PathBuf>) -> JoinHandle<()> {
        tokio::spawn(async move {
            for path in paths {
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => tracing::debug!(path = %path.display(), "Scratch file removed"),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path.display(), "Failed to remove scratch file")
                    }
                }
            }
        })
    }

    /// Remove every file left in the directory. Returns how many were removed.
    pub async fn clear(&self) -> io::Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn same_name_gets_distinct_paths() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path().join("upload")).await.unwrap();

        let a = scratch.allocate("file.png");
        let b = scratch.allocate("file.png");

        assert_ne!(a, b);
        assert_eq!(a.extension().unwrap(), "png");
        assert!(a.starts_with(scratch.root()));
    }

    #[tokio::test]
    async fn allocate_never_escapes_the_root() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();

        let path = scratch.allocate("../../etc/passwd");
        assert_eq!(path.parent().unwrap(), scratch.root());
        assert_eq!(scratch.allocate("weird.p/ng").parent().unwrap(), scratch.root());
    }

    #[tokio::test]
    async fn remove_later_deletes_files() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();
        let path = scratch.allocate("clip.mp4");
        tokio::fs::write(&path, b"bytes").await.unwrap();
        let missing = scratch.allocate("gone.mp4");

        scratch
            .remove_later(vec![path.clone(), missing])
            .await
            .unwrap();

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn clear_empties_the_directory() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(dir.path()).await.unwrap();
        for name in ["a.png", "b.png"] {
            tokio::fs::write(scratch.allocate(name), b"x").await.unwrap();
        }

        assert_eq!(scratch.clear().await.unwrap(), 2);
        assert_eq!(scratch.clear().await.unwrap(), 0);
    }
}
