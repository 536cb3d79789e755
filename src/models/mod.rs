mod entry;
mod tree;

pub use entry::{Entry, EntryKind, FsEntry, FsMetadata};
pub use tree::{Folder, Node};
