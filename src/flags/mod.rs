mod resolve;

pub use resolve::{Candidate, FlagSet, Resolved, parse_flag_tokens, resolve, resolve_candidates};

use std::fmt;

/// Closed vocabulary of listing options. Validation, conflict lookup, and
/// implication rules all match exhaustively over this enum; there is no
/// runtime registration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Flag {
    ShowHidden,
    Recurse,
    LongFormat,
    DirsOnly,
    Color,
    OnePerLine,
    NoTrailingSpace,
    CommaSeparated,
    Size,
    Time,
    Permission,
    Inode,
    NumericOwner,
    Reverse,
    SortSize,
    SortTime,
    SortName,
    SortExtension,
    SortVersion,
    SortWidth,
    Escape,
    Quote,
    ShowControlChars,
    HideControlChars,
    /// The parameterized `--sort=<key>` form; carries its key in the
    /// parameter map and implies the matching `Sort*` flag.
    SortKey,
}

impl Flag {
    pub const ALL: [Flag; 25] = [
        Flag::ShowHidden,
        Flag::Recurse,
        Flag::LongFormat,
        Flag::DirsOnly,
        Flag::Color,
        Flag::OnePerLine,
        Flag::NoTrailingSpace,
        Flag::CommaSeparated,
        Flag::Size,
        Flag::Time,
        Flag::Permission,
        Flag::Inode,
        Flag::NumericOwner,
        Flag::Reverse,
        Flag::SortSize,
        Flag::SortTime,
        Flag::SortName,
        Flag::SortExtension,
        Flag::SortVersion,
        Flag::SortWidth,
        Flag::Escape,
        Flag::Quote,
        Flag::ShowControlChars,
        Flag::HideControlChars,
        Flag::SortKey,
    ];

    pub fn from_short(letter: char) -> Option<Flag> {
        let flag = match letter {
            'a' => Flag::ShowHidden,
            'R' => Flag::Recurse,
            'l' => Flag::LongFormat,
            'd' => Flag::DirsOnly,
            '1' => Flag::OnePerLine,
            'm' => Flag::CommaSeparated,
            's' => Flag::Size,
            't' => Flag::Time,
            'p' => Flag::Permission,
            'i' => Flag::Inode,
            'n' => Flag::NumericOwner,
            'r' => Flag::Reverse,
            'S' => Flag::SortSize,
            'T' => Flag::SortTime,
            'N' => Flag::SortName,
            'X' => Flag::SortExtension,
            'V' => Flag::SortVersion,
            'W' => Flag::SortWidth,
            'b' => Flag::Escape,
            'Q' => Flag::Quote,
            'q' => Flag::HideControlChars,
            _ => return None,
        };
        Some(flag)
    }

    pub fn from_long(name: &str) -> Option<Flag> {
        let flag = match name {
            "all" => Flag::ShowHidden,
            "recursive" => Flag::Recurse,
            "long" => Flag::LongFormat,
            "directories" => Flag::DirsOnly,
            "color" => Flag::Color,
            "one-per-line" => Flag::OnePerLine,
            "no-trailing-space" => Flag::NoTrailingSpace,
            "commas" => Flag::CommaSeparated,
            "size" => Flag::Size,
            "time" => Flag::Time,
            "permissions" => Flag::Permission,
            "inode" => Flag::Inode,
            "numeric-owner" => Flag::NumericOwner,
            "reverse" => Flag::Reverse,
            "sort-size" => Flag::SortSize,
            "sort-time" => Flag::SortTime,
            "sort-name" => Flag::SortName,
            "sort-extension" => Flag::SortExtension,
            "sort-version" => Flag::SortVersion,
            "sort-width" => Flag::SortWidth,
            "escape" => Flag::Escape,
            "quote" => Flag::Quote,
            "show-control-chars" => Flag::ShowControlChars,
            "hide-control-chars" => Flag::HideControlChars,
            "sort" => Flag::SortKey,
            _ => return None,
        };
        Some(flag)
    }

    pub fn long_name(self) -> &'static str {
        match self {
            Flag::ShowHidden => "all",
            Flag::Recurse => "recursive",
            Flag::LongFormat => "long",
            Flag::DirsOnly => "directories",
            Flag::Color => "color",
            Flag::OnePerLine => "one-per-line",
            Flag::NoTrailingSpace => "no-trailing-space",
            Flag::CommaSeparated => "commas",
            Flag::Size => "size",
            Flag::Time => "time",
            Flag::Permission => "permissions",
            Flag::Inode => "inode",
            Flag::NumericOwner => "numeric-owner",
            Flag::Reverse => "reverse",
            Flag::SortSize => "sort-size",
            Flag::SortTime => "sort-time",
            Flag::SortName => "sort-name",
            Flag::SortExtension => "sort-extension",
            Flag::SortVersion => "sort-version",
            Flag::SortWidth => "sort-width",
            Flag::Escape => "escape",
            Flag::Quote => "quote",
            Flag::ShowControlChars => "show-control-chars",
            Flag::HideControlChars => "hide-control-chars",
            Flag::SortKey => "sort",
        }
    }

    /// Symmetric conflict table. `conflict_symmetry` below keeps it honest.
    pub fn conflicts(self) -> &'static [Flag] {
        match self {
            Flag::SortSize => &[
                Flag::SortTime,
                Flag::SortName,
                Flag::SortExtension,
                Flag::SortVersion,
                Flag::SortWidth,
            ],
            Flag::SortTime => &[
                Flag::SortSize,
                Flag::SortName,
                Flag::SortExtension,
                Flag::SortVersion,
                Flag::SortWidth,
            ],
            Flag::SortName => &[
                Flag::SortSize,
                Flag::SortTime,
                Flag::SortExtension,
                Flag::SortVersion,
                Flag::SortWidth,
            ],
            Flag::SortExtension => &[
                Flag::SortSize,
                Flag::SortTime,
                Flag::SortName,
                Flag::SortVersion,
                Flag::SortWidth,
            ],
            Flag::SortVersion => &[
                Flag::SortSize,
                Flag::SortTime,
                Flag::SortName,
                Flag::SortExtension,
                Flag::SortWidth,
            ],
            Flag::SortWidth => &[
                Flag::SortSize,
                Flag::SortTime,
                Flag::SortName,
                Flag::SortExtension,
                Flag::SortVersion,
            ],
            Flag::OnePerLine => &[Flag::NoTrailingSpace, Flag::CommaSeparated],
            Flag::NoTrailingSpace => &[Flag::OnePerLine],
            Flag::CommaSeparated => &[Flag::OnePerLine],
            Flag::Color => &[Flag::Escape, Flag::Quote],
            Flag::Escape => &[Flag::Color, Flag::HideControlChars],
            Flag::Quote => &[Flag::Color],
            Flag::HideControlChars => &[Flag::ShowControlChars, Flag::Escape],
            Flag::ShowControlChars => &[Flag::HideControlChars],
            _ => &[],
        }
    }

    /// Flags that make the tree builder attach per-entry metadata.
    pub fn is_metadata(self) -> bool {
        matches!(
            self,
            Flag::Size | Flag::Time | Flag::Permission | Flag::Inode | Flag::NumericOwner
        )
    }

    pub fn is_sort_criterion(self) -> bool {
        matches!(
            self,
            Flag::SortSize
                | Flag::SortTime
                | Flag::SortName
                | Flag::SortExtension
                | Flag::SortVersion
                | Flag::SortWidth
        )
    }

    pub fn takes_value(self) -> bool {
        matches!(self, Flag::SortKey)
    }

    /// Maps a `--sort=<key>` parameter to its criterion flag.
    pub fn sort_flag_for_key(key: &str) -> Option<Flag> {
        let flag = match key {
            "size" => Flag::SortSize,
            "time" => Flag::SortTime,
            "name" => Flag::SortName,
            "extension" => Flag::SortExtension,
            "version" => Flag::SortVersion,
            "width" => Flag::SortWidth,
            _ => return None,
        };
        Some(flag)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--{}", self.long_name())
    }
}
