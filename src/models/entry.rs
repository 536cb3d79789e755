use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Directory,
    File,
    Symlink,
    Other,
}

/// A raw directory entry as the filesystem boundary reports it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    pub hidden: bool,
}

/// Attributes behind a single stat call. The tree builder picks out the
/// fields the resolved flag set asks for.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FsMetadata {
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub mode: u32,
    pub inode: u64,
    pub uid: u32,
    pub gid: u32,
}

/// A filesystem object snapshot. Optional fields are populated only when the
/// corresponding flag is active; absence is a legitimate state, including
/// after a failed per-entry metadata read.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    pub modified_display: Option<String>,
    pub permissions: Option<String>,
    pub inode: Option<u64>,
    pub owner: Option<String>,
}

impl Entry {
    pub fn new(name: String, path: PathBuf, kind: EntryKind) -> Entry {
        Entry {
            name,
            path,
            kind,
            size: None,
            modified: None,
            modified_display: None,
            permissions: None,
            inode: None,
            owner: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}
