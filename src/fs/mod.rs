mod real;

#[cfg(test)]
mod mock;

pub use real::RealFileSystem;

#[cfg(test)]
pub use mock::MockFileSystem;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::models::{FsEntry, FsMetadata};

#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Lists a directory's entries in deterministic (name) order.
    async fn read_dir(&self, dir: &Path) -> Result<Vec<FsEntry>>;

    /// Stats a single entry. Called only when the resolved flag set needs
    /// per-entry metadata; a failure degrades that entry, never the run.
    async fn metadata(&self, path: &Path) -> Result<FsMetadata>;
}
