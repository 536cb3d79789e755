use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Error;
use crate::flags::{self, Flag, FlagSet};

pub const USAGE: &str = "\
rls - list directory contents, driven entirely by flags

Usage: rls [FLAGS] [PATH]

The last argument not starting with '-' is the target directory
(default: the current directory). Short flags may be bundled (-alR).

  -a, --all                 include hidden entries
  -R, --recursive           descend into subdirectories
  -l, --long                long format (size, time, permissions)
  -d, --directories         list directories only
  -1, --one-per-line        one entry per line (default)
  -m, --commas              comma-separated single line
      --no-trailing-space   space-separated single line, no trailing space
  -s, --size                show byte sizes
  -t, --time                show modification times
  -p, --permissions         show permission strings
  -i, --inode               show inode numbers
  -n, --numeric-owner       show numeric uid:gid
  -r, --reverse             invert the sort order
  -S, --sort-size           sort by size, largest first
  -T, --sort-time           sort by modification time, newest first
  -N, --sort-name           sort by name
  -X, --sort-extension      sort by the name's last character
  -V, --sort-version        version-aware sort
  -W, --sort-width          sort by name length
      --sort=<key>          key: size|time|name|extension|version|width
  -b, --escape              C-style escapes for special characters
  -Q, --quote               double-quote entry names
  -q, --hide-control-chars  print control characters as '?' (default)
      --show-control-chars  print control characters as-is
      --color               colorize directories (default)
      --help                show this message
      --version             show version
";

/// The resolved invocation. Immutable once constructed; recursive descent
/// builds a new value per subdirectory via [`Args::with_path`].
#[derive(Clone, Debug)]
pub struct Args {
    pub path: PathBuf,
    pub flags: FlagSet,
    pub parameters: BTreeMap<Flag, String>,
}

impl Args {
    pub fn parse(tokens: &[String]) -> Result<Args, Error> {
        let (flag_tokens, path_tokens): (Vec<String>, Vec<String>) = tokens
            .iter()
            .cloned()
            .partition(|token| token.starts_with('-'));

        let resolved = flags::resolve(&flag_tokens)?;
        let path = resolve_path(&path_tokens)?;

        Ok(Args {
            path,
            flags: resolved.flags,
            parameters: resolved.parameters,
        })
    }

    pub fn with_path(&self, path: PathBuf) -> Args {
        Args {
            path,
            flags: self.flags.clone(),
            parameters: self.parameters.clone(),
        }
    }
}

/// The last non-flag token is the target path; absent means the current
/// directory. The target must exist and be a directory.
fn resolve_path(tokens: &[String]) -> Result<PathBuf, Error> {
    let path = match tokens {
        [] => PathBuf::from("."),
        [only] => PathBuf::from(only),
        [extra, .., _] => return Err(Error::UnexpectedArgument(extra.clone())),
    };

    match std::fs::metadata(&path) {
        Ok(metadata) if metadata.is_dir() => Ok(path),
        _ => Err(Error::InvalidPath(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(tokens: &[&str]) -> Result<Args, Error> {
        let tokens: Vec<String> = tokens.iter().map(|t| (*t).to_owned()).collect();
        Args::parse(&tokens)
    }

    #[test]
    fn defaults_to_current_directory() {
        let args = parse(&["-a"]).unwrap();
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.flags.contains(Flag::ShowHidden));
    }

    #[test]
    fn last_non_flag_token_is_the_path() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().to_string_lossy().into_owned();
        let args = parse(&["-a", target.as_str()]).unwrap();
        assert_eq!(args.path, temp.path());
    }

    #[test]
    fn missing_path_is_rejected() {
        let err = parse(&["/no/such/directory"]).unwrap_err();
        assert_eq!(err, Error::InvalidPath(PathBuf::from("/no/such/directory")));
    }

    #[test]
    fn file_path_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();
        let target = file.to_string_lossy().into_owned();
        let err = parse(&[target.as_str()]).unwrap_err();
        assert_eq!(err, Error::InvalidPath(file));
    }

    #[test]
    fn extra_positional_arguments_are_rejected() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().to_string_lossy().into_owned();
        let err = parse(&["stray", target.as_str()]).unwrap_err();
        assert_eq!(err, Error::UnexpectedArgument("stray".to_owned()));
    }

    #[test]
    fn with_path_keeps_flags_and_parameters() {
        let args = parse(&["--sort=width"]).unwrap();
        let child = args.with_path(PathBuf::from("/elsewhere"));
        assert_eq!(child.path, PathBuf::from("/elsewhere"));
        assert_eq!(child.flags, args.flags);
        assert_eq!(child.parameters, args.parameters);
    }
}
