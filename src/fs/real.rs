use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use tokio::task;

use crate::models::{EntryKind, FsEntry, FsMetadata};

use super::FileSystem;

pub struct RealFileSystem;

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn read_dir(&self, dir: &Path) -> Result<Vec<FsEntry>> {
        let dir = dir.to_path_buf();
        task::spawn_blocking(move || {
            let mut entries = Vec::new();
            for entry in std::fs::read_dir(&dir)?.filter_map(|e| e.ok()) {
                let file_type = match entry.file_type() {
                    Ok(file_type) => file_type,
                    Err(_) => continue,
                };
                let kind = if file_type.is_symlink() {
                    EntryKind::Symlink
                } else if file_type.is_dir() {
                    EntryKind::Directory
                } else if file_type.is_file() {
                    EntryKind::File
                } else {
                    EntryKind::Other
                };

                let name = entry.file_name().to_string_lossy().into_owned();
                let hidden = name.starts_with('.');
                entries.push(FsEntry {
                    path: entry.path(),
                    name,
                    kind,
                    hidden,
                });
            }
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(entries)
        })
        .await?
    }

    async fn metadata(&self, path: &Path) -> Result<FsMetadata> {
        let path = path.to_path_buf();
        task::spawn_blocking(move || {
            let metadata = std::fs::symlink_metadata(&path)?;
            Ok(to_fs_metadata(&metadata))
        })
        .await?
    }
}

#[cfg(unix)]
fn to_fs_metadata(metadata: &std::fs::Metadata) -> FsMetadata {
    use std::os::unix::fs::MetadataExt;

    FsMetadata {
        size: metadata.len(),
        modified: metadata.modified().ok(),
        mode: metadata.mode(),
        inode: metadata.ino(),
        uid: metadata.uid(),
        gid: metadata.gid(),
    }
}

#[cfg(not(unix))]
fn to_fs_metadata(metadata: &std::fs::Metadata) -> FsMetadata {
    FsMetadata {
        size: metadata.len(),
        modified: metadata.modified().ok(),
        ..FsMetadata::default()
    }
}
