use std::cmp::Ordering;
use std::io::{self, Write};

use colored::Colorize;

use crate::cli::Args;
use crate::flags::Flag;
use crate::models::{Entry, Folder, Node};

/// Renders a built tree. Sorting, coloring, and text transforms are all
/// projections of the resolved flag set; the tree itself stays in
/// enumeration order.
pub fn render<W: Write>(writer: &mut W, folder: &Folder, args: &Args) -> io::Result<()> {
    let Some(children) = folder.children.as_ref() else {
        return Ok(());
    };
    if args.flags.contains(Flag::OnePerLine) {
        write_levels(writer, children, args, 0)
    } else {
        write_inline(writer, children, args)
    }
}

fn write_levels<W: Write>(
    writer: &mut W,
    children: &[Node],
    args: &Args,
    depth: usize,
) -> io::Result<()> {
    for node in sorted(children, args) {
        for _ in 0..depth {
            writer.write_all(b"    ")?;
        }
        writer.write_all(display(node.entry(), args).as_bytes())?;
        if let Node::Folder(folder) = node
            && let Some(error) = folder.error.as_ref()
        {
            write!(writer, " [error: {error}]")?;
        }
        writer.write_all(b"\n")?;

        // Pre-order: a directory's subtree follows its own line directly.
        if let Node::Folder(folder) = node
            && let Some(grandchildren) = folder.children.as_ref()
        {
            write_levels(writer, grandchildren, args, depth + 1)?;
        }
    }
    Ok(())
}

fn write_inline<W: Write>(writer: &mut W, children: &[Node], args: &Args) -> io::Result<()> {
    let ordered = sorted(children, args);
    if ordered.is_empty() {
        return Ok(());
    }
    let comma = args.flags.contains(Flag::CommaSeparated);
    let mut first = true;
    for node in &ordered {
        if !first {
            writer.write_all(if comma { b", " } else { b" " })?;
        }
        first = false;
        writer.write_all(display(node.entry(), args).as_bytes())?;
    }
    if !comma && !args.flags.contains(Flag::NoTrailingSpace) {
        writer.write_all(b" ")?;
    }
    writer.write_all(b"\n")
}

/// Stable sort by the single active criterion; ties keep enumeration order.
fn sorted<'a>(children: &'a [Node], args: &Args) -> Vec<&'a Node> {
    let mut ordered: Vec<&Node> = children.iter().collect();
    if let Some(criterion) = args.flags.sort_criterion() {
        let reverse = args.flags.contains(Flag::Reverse);
        ordered.sort_by(|a, b| {
            let order = compare(criterion, a.entry(), b.entry());
            if reverse { order.reverse() } else { order }
        });
    }
    ordered
}

fn compare(criterion: Flag, a: &Entry, b: &Entry) -> Ordering {
    match criterion {
        Flag::SortSize => b.size.unwrap_or(0).cmp(&a.size.unwrap_or(0)),
        Flag::SortTime => b.modified.cmp(&a.modified),
        Flag::SortName => a.name.cmp(&b.name),
        Flag::SortExtension => a.name.chars().last().cmp(&b.name.chars().last()),
        Flag::SortVersion => version_cmp(&a.name, &b.name),
        Flag::SortWidth => a.name.chars().count().cmp(&b.name.chars().count()),
        _ => Ordering::Equal,
    }
}

enum Chunk {
    Number(String),
    Text(String),
}

fn chunks(name: &str) -> Vec<Chunk> {
    let mut out: Vec<Chunk> = Vec::new();
    for c in name.chars() {
        let digit = c.is_ascii_digit();
        match out.last_mut() {
            Some(Chunk::Number(chunk)) if digit => chunk.push(c),
            Some(Chunk::Text(chunk)) if !digit => chunk.push(c),
            _ => out.push(if digit {
                Chunk::Number(c.to_string())
            } else {
                Chunk::Text(c.to_string())
            }),
        }
    }
    out
}

/// Numeric chunks compare as numbers, text chunks lexically, so `file2`
/// sorts before `file10`.
fn version_cmp(a: &str, b: &str) -> Ordering {
    let mut left = chunks(a).into_iter();
    let mut right = chunks(b).into_iter();
    loop {
        let order = match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Chunk::Number(x)), Some(Chunk::Number(y))) => numeric_cmp(&x, &y),
            (Some(Chunk::Number(_)), Some(Chunk::Text(_))) => Ordering::Less,
            (Some(Chunk::Text(_)), Some(Chunk::Number(_))) => Ordering::Greater,
            (Some(Chunk::Text(x)), Some(Chunk::Text(y))) => x.cmp(&y),
        };
        if order != Ordering::Equal {
            return order;
        }
    }
}

fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Display string for one entry: transforms in fixed order (control-char
/// substitution, escape, quote), color last so its codes are never escaped,
/// then the bracketed metadata suffix.
fn display(entry: &Entry, args: &Args) -> String {
    let flags = &args.flags;
    let mut name = entry.name.clone();
    if flags.contains(Flag::HideControlChars) {
        name = substitute_control(&name);
    }
    if flags.contains(Flag::Escape) {
        name = escape_name(&name);
    }
    if flags.contains(Flag::Quote) {
        name = quote_name(&name);
    }
    if flags.contains(Flag::Color) && entry.is_directory() {
        name = name.blue().to_string();
    }
    match detail_suffix(entry, args) {
        Some(detail) => format!("{name} {detail}"),
        None => name,
    }
}

/// `[    size | dd/mm/yyyy HH:MM | perms | uid:gid | inode]`, restricted to
/// the active metadata flags; a field whose stat failed renders as `?`.
fn detail_suffix(entry: &Entry, args: &Args) -> Option<String> {
    let flags = &args.flags;
    let mut segments = Vec::new();
    if flags.contains(Flag::Size) {
        let size = match entry.size {
            Some(size) => group_digits(size),
            None => "?".to_owned(),
        };
        segments.push(format!("{size:>8}"));
    }
    if flags.contains(Flag::Time) {
        segments.push(entry.modified_display.clone().unwrap_or_else(|| "?".to_owned()));
    }
    if flags.contains(Flag::Permission) {
        segments.push(entry.permissions.clone().unwrap_or_else(|| "?".to_owned()));
    }
    if flags.contains(Flag::NumericOwner) {
        segments.push(entry.owner.clone().unwrap_or_else(|| "?".to_owned()));
    }
    if flags.contains(Flag::Inode) {
        segments.push(match entry.inode {
            Some(inode) => inode.to_string(),
            None => "?".to_owned(),
        });
    }
    if segments.is_empty() {
        None
    } else {
        Some(format!("[{}]", segments.join(" | ")))
    }
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, c) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn substitute_control(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_control() { '?' } else { c })
        .collect()
}

fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' => out.push_str("\\ "),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\{:03o}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn quote_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
