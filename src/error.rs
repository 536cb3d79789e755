use std::path::PathBuf;

use thiserror::Error;

use crate::flags::Flag;

/// User-facing failures, all raised before any filesystem traversal begins.
/// Per-entry metadata failures during traversal are recovered locally and
/// never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid flag: {0}")]
    InvalidFlag(String),

    #[error("conflicting flags: {0} and {1}")]
    ConflictingFlags(Flag, Flag),

    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}
