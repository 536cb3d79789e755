use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};

use crate::cli::Args;
use crate::flags::Flag;
use crate::fs::FileSystem;
use crate::models::{Entry, EntryKind, Folder, FsEntry, Node};

/// Builds the full tree for the target directory before any rendering
/// happens. Only the top-level read is fatal; deeper failures are recorded
/// on their nodes and per-entry stat failures degrade that entry.
pub async fn build_tree<F: FileSystem>(fs: &F, args: &Args) -> Result<Folder> {
    let root = Entry::new(
        root_display_name(&args.path),
        args.path.clone(),
        EntryKind::Directory,
    );
    let children = build_level(fs, args)
        .await
        .with_context(|| format!("cannot list {}", args.path.display()))?;
    Ok(Folder {
        entry: root,
        error: None,
        children: Some(children),
    })
}

async fn build_level<F: FileSystem>(fs: &F, args: &Args) -> Result<Vec<Node>> {
    let entries = fs.read_dir(&args.path).await?;
    let mut nodes = Vec::with_capacity(entries.len());

    for raw in entries {
        // Hidden entries are excluded unless requested; with --directories
        // the same rule re-admits hidden directories under -a.
        if raw.hidden && !args.flags.contains(Flag::ShowHidden) {
            continue;
        }
        if args.flags.contains(Flag::DirsOnly) && raw.kind != EntryKind::Directory {
            continue;
        }

        let entry = build_entry(fs, args, &raw).await;

        // Symlinks are never expanded, so recursion is bounded by the real
        // directory tree and cannot cycle.
        let node = if raw.kind == EntryKind::Directory {
            if args.flags.contains(Flag::Recurse) {
                let child_args = args.with_path(raw.path.clone());
                match Box::pin(build_level(fs, &child_args)).await {
                    Ok(children) => Node::Folder(Folder {
                        entry,
                        error: None,
                        children: Some(children),
                    }),
                    Err(err) => Node::Folder(Folder {
                        entry,
                        error: Some(err.to_string()),
                        children: None,
                    }),
                }
            } else {
                Node::Folder(Folder::unexpanded(entry))
            }
        } else {
            Node::File(entry)
        };
        nodes.push(node);
    }

    Ok(nodes)
}

/// Populates exactly the fields the active flag set asks for. A failed stat
/// leaves every optional field absent.
async fn build_entry<F: FileSystem>(fs: &F, args: &Args, raw: &FsEntry) -> Entry {
    let mut entry = Entry::new(raw.name.clone(), raw.path.clone(), raw.kind);
    if !args.flags.wants_metadata() {
        return entry;
    }

    let Ok(metadata) = fs.metadata(&raw.path).await else {
        return entry;
    };

    let flags = &args.flags;
    if flags.contains(Flag::Size) {
        entry.size = Some(metadata.size);
    }
    if flags.contains(Flag::Time) {
        entry.modified = metadata.modified;
        entry.modified_display = metadata.modified.map(format_timestamp);
    }
    if flags.contains(Flag::Permission) {
        entry.permissions = Some(filemode(raw.kind, metadata.mode));
    }
    if flags.contains(Flag::Inode) {
        entry.inode = Some(metadata.inode);
    }
    if flags.contains(Flag::NumericOwner) {
        entry.owner = Some(format!("{}:{}", metadata.uid, metadata.gid));
    }
    entry
}

fn format_timestamp(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%d/%m/%Y %H:%M").to_string()
}

fn filemode(kind: EntryKind, mode: u32) -> String {
    let type_char = match kind {
        EntryKind::Directory => 'd',
        EntryKind::Symlink => 'l',
        EntryKind::File | EntryKind::Other => '-',
    };
    let mut out = String::with_capacity(10);
    out.push(type_char);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

pub fn root_display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.as_os_str().to_string_lossy().into_owned())
}
