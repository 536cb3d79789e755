use std::collections::{BTreeMap, BTreeSet};

use crate::error::Error;

use super::Flag;

/// A conflict-free set of flags. Ordered so that iteration and equality are
/// deterministic.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FlagSet(BTreeSet<Flag>);

impl FlagSet {
    pub fn contains(&self, flag: Flag) -> bool {
        self.0.contains(&flag)
    }

    pub fn iter(&self) -> impl Iterator<Item = Flag> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_superset(&self, other: &FlagSet) -> bool {
        self.0.is_superset(&other.0)
    }

    /// At most one criterion can be present; the catalog makes them mutually
    /// exclusive.
    pub fn sort_criterion(&self) -> Option<Flag> {
        self.iter().find(|flag| flag.is_sort_criterion())
    }

    pub fn wants_metadata(&self) -> bool {
        self.iter().any(Flag::is_metadata)
    }

    /// Inserts `flag` unless it conflicts with something already present.
    /// Returns whether the set changed.
    fn insert_checked(&mut self, flag: Flag) -> Result<bool, Error> {
        if self.contains(flag) {
            return Ok(false);
        }
        for &other in flag.conflicts() {
            if self.contains(other) {
                return Err(Error::ConflictingFlags(flag, other));
            }
        }
        self.0.insert(flag);
        Ok(true)
    }
}

/// Unchecked construction, for building expected sets in tests and for
/// driving the walker/renderer directly.
impl FromIterator<Flag> for FlagSet {
    fn from_iter<I: IntoIterator<Item = Flag>>(iter: I) -> Self {
        FlagSet(iter.into_iter().collect())
    }
}

/// A validated flag request, before closure: the flag plus its `=value`
/// parameter if the token carried one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub flag: Flag,
    pub value: Option<String>,
}

impl Candidate {
    pub fn bare(flag: Flag) -> Candidate {
        Candidate { flag, value: None }
    }
}

/// The resolver's output: conflict-free, implication-closed, with
/// conditional defaults folded in.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolved {
    pub flags: FlagSet,
    pub parameters: BTreeMap<Flag, String>,
}

/// Parses flag tokens (`-al`, `--long`, `--sort=size`) into candidates.
/// Unknown flags and unknown `--sort` keys fail before any filesystem access.
pub fn parse_flag_tokens(tokens: &[String]) -> Result<Vec<Candidate>, Error> {
    let mut candidates = Vec::new();
    for token in tokens {
        if let Some(rest) = token.strip_prefix("--") {
            if rest.is_empty() {
                return Err(Error::InvalidFlag(token.clone()));
            }
            let (name, value) = match rest.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (rest, None),
            };
            let flag = Flag::from_long(name).ok_or_else(|| Error::InvalidFlag(token.clone()))?;
            if flag.takes_value() {
                let value = value.ok_or_else(|| Error::InvalidFlag(token.clone()))?;
                if Flag::sort_flag_for_key(value).is_none() {
                    return Err(Error::InvalidFlag(token.clone()));
                }
                candidates.push(Candidate {
                    flag,
                    value: Some(value.to_owned()),
                });
            } else {
                if value.is_some() {
                    return Err(Error::InvalidFlag(token.clone()));
                }
                candidates.push(Candidate::bare(flag));
            }
        } else if let Some(rest) = token.strip_prefix('-') {
            if rest.is_empty() {
                return Err(Error::InvalidFlag(token.clone()));
            }
            for letter in rest.chars() {
                let flag = Flag::from_short(letter)
                    .ok_or_else(|| Error::InvalidFlag(format!("-{letter}")))?;
                candidates.push(Candidate::bare(flag));
            }
        } else {
            return Err(Error::InvalidFlag(token.clone()));
        }
    }
    Ok(candidates)
}

/// Full pipeline: token parse, incremental insertion, implication closure,
/// conditional defaults.
pub fn resolve(tokens: &[String]) -> Result<Resolved, Error> {
    resolve_candidates(parse_flag_tokens(tokens)?)
}

pub fn resolve_candidates(candidates: Vec<Candidate>) -> Result<Resolved, Error> {
    let mut flags = FlagSet::default();
    let mut parameters: BTreeMap<Flag, String> = BTreeMap::new();

    for candidate in candidates {
        flags.insert_checked(candidate.flag)?;
        if let Some(value) = candidate.value {
            if let Some(previous) = parameters.get(&candidate.flag)
                && *previous != value
            {
                // Two different sort keys requested; report them as the
                // criteria they stand for.
                let a = Flag::sort_flag_for_key(previous)
                    .ok_or_else(|| Error::InvalidFlag(previous.clone()))?;
                let b = Flag::sort_flag_for_key(&value)
                    .ok_or_else(|| Error::InvalidFlag(value.clone()))?;
                return Err(Error::ConflictingFlags(b, a));
            }
            parameters.insert(candidate.flag, value);
        }
    }

    close_over_implications(&mut flags, &parameters)?;
    apply_conditional_defaults(&mut flags);

    Ok(Resolved { flags, parameters })
}

/// Runs the implication rule table to fixpoint. Each newly implied flag goes
/// through the same conflict check as an explicit one, so the first
/// conflicting pair encountered is the one reported.
fn close_over_implications(
    flags: &mut FlagSet,
    parameters: &BTreeMap<Flag, String>,
) -> Result<(), Error> {
    loop {
        let mut changed = false;
        for implied in structural_implications(flags, parameters)? {
            changed |= flags.insert_checked(implied)?;
        }
        // Reverse needs a criterion to invert. This rule waits for the
        // structural rules to settle so that metadata implied by long-format
        // can steer the choice.
        if !changed
            && flags.contains(Flag::Reverse)
            && flags.sort_criterion().is_none()
        {
            let implied = if flags.contains(Flag::Size) {
                Flag::SortSize
            } else if flags.contains(Flag::Time) {
                Flag::SortTime
            } else {
                Flag::SortName
            };
            changed |= flags.insert_checked(implied)?;
        }
        if !changed {
            return Ok(());
        }
    }
}

fn structural_implications(
    flags: &FlagSet,
    parameters: &BTreeMap<Flag, String>,
) -> Result<Vec<Flag>, Error> {
    let mut implied = Vec::new();
    if flags.contains(Flag::LongFormat) {
        implied.extend([Flag::Size, Flag::Time, Flag::Permission]);
    }
    if flags.contains(Flag::Size)
        && flags.contains(Flag::Time)
        && flags.contains(Flag::Permission)
    {
        implied.push(Flag::LongFormat);
    }
    if flags.wants_metadata() || flags.contains(Flag::Recurse) {
        implied.push(Flag::OnePerLine);
    }
    if flags.contains(Flag::SortSize) {
        implied.push(Flag::Size);
    }
    if flags.contains(Flag::SortTime) {
        implied.push(Flag::Time);
    }
    if let Some(key) = parameters.get(&Flag::SortKey) {
        let criterion =
            Flag::sort_flag_for_key(key).ok_or_else(|| Error::InvalidFlag(key.clone()))?;
        implied.push(criterion);
    }
    implied.retain(|flag| !flags.contains(*flag));
    Ok(implied)
}

/// Defaults are a pure function of the resolved explicit/implied set: each
/// is enabled iff it conflicts with nothing already present.
fn apply_conditional_defaults(flags: &mut FlagSet) {
    const DEFAULTS: [Flag; 3] = [Flag::Color, Flag::OnePerLine, Flag::HideControlChars];
    for default in DEFAULTS {
        if !flags.contains(default)
            && default.conflicts().iter().all(|&other| !flags.contains(other))
        {
            flags.0.insert(default);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_strs(tokens: &[&str]) -> Result<Resolved, Error> {
        let tokens: Vec<String> = tokens.iter().map(|t| (*t).to_owned()).collect();
        resolve(&tokens)
    }

    fn flags_of(tokens: &[&str]) -> FlagSet {
        resolve_strs(tokens).unwrap().flags
    }

    #[test]
    fn bundled_short_flags_split() {
        let candidates =
            parse_flag_tokens(&["-al".to_owned(), "-R".to_owned()]).unwrap();
        let flags: Vec<Flag> = candidates.into_iter().map(|c| c.flag).collect();
        assert_eq!(flags, vec![Flag::ShowHidden, Flag::LongFormat, Flag::Recurse]);
    }

    #[test]
    fn long_flag_with_value() {
        let candidates = parse_flag_tokens(&["--sort=size".to_owned()]).unwrap();
        assert_eq!(
            candidates,
            vec![Candidate {
                flag: Flag::SortKey,
                value: Some("size".to_owned()),
            }]
        );
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert_eq!(
            parse_flag_tokens(&["-z".to_owned()]),
            Err(Error::InvalidFlag("-z".to_owned()))
        );
        assert_eq!(
            parse_flag_tokens(&["--bogus".to_owned()]),
            Err(Error::InvalidFlag("--bogus".to_owned()))
        );
        assert_eq!(
            parse_flag_tokens(&["--sort=owner".to_owned()]),
            Err(Error::InvalidFlag("--sort=owner".to_owned()))
        );
        assert_eq!(
            parse_flag_tokens(&["--all=yes".to_owned()]),
            Err(Error::InvalidFlag("--all=yes".to_owned()))
        );
    }

    #[test]
    fn empty_request_gets_only_defaults() {
        let resolved = resolve_strs(&[]).unwrap();
        let expected: FlagSet =
            [Flag::Color, Flag::OnePerLine, Flag::HideControlChars].into_iter().collect();
        assert_eq!(resolved.flags, expected);
    }

    #[test]
    fn long_format_expands_to_metadata_and_one_per_line() {
        let flags = flags_of(&["-l"]);
        for expected in [
            Flag::LongFormat,
            Flag::Size,
            Flag::Time,
            Flag::Permission,
            Flag::OnePerLine,
        ] {
            assert!(flags.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn closure_is_idempotent() {
        let resolved = resolve_strs(&["-l", "-a", "--sort=version"]).unwrap();
        let candidates: Vec<Candidate> = resolved
            .flags
            .iter()
            .map(|flag| Candidate {
                flag,
                value: resolved.parameters.get(&flag).cloned(),
            })
            .collect();
        let again = resolve_candidates(candidates).unwrap();
        assert_eq!(again, resolved);
    }

    #[test]
    fn closure_is_monotone() {
        let requested: FlagSet =
            [Flag::ShowHidden, Flag::Recurse, Flag::Inode].into_iter().collect();
        let resolved = resolve_strs(&["-a", "-R", "-i"]).unwrap();
        assert!(resolved.flags.is_superset(&requested));
    }

    #[test]
    fn long_format_conflicts_with_no_trailing_space_via_one_per_line() {
        let err = resolve_strs(&["-l", "--no-trailing-space"]).unwrap_err();
        assert_eq!(
            err,
            Error::ConflictingFlags(Flag::OnePerLine, Flag::NoTrailingSpace)
        );
    }

    #[test]
    fn comma_mode_conflicts_with_metadata_flags() {
        let err = resolve_strs(&["-m", "-l"]).unwrap_err();
        assert_eq!(
            err,
            Error::ConflictingFlags(Flag::OnePerLine, Flag::CommaSeparated)
        );
    }

    #[test]
    fn two_sort_criteria_conflict() {
        let err = resolve_strs(&["-S", "-T"]).unwrap_err();
        assert_eq!(err, Error::ConflictingFlags(Flag::SortTime, Flag::SortSize));
    }

    #[test]
    fn long_format_round_trips_against_explicit_set() {
        let from_long = resolve_strs(&["-l"]).unwrap();
        let from_parts = resolve_strs(&["-s", "-t", "-p", "-1"]).unwrap();
        assert_eq!(from_long.flags, from_parts.flags);
    }

    #[test]
    fn escape_suppresses_color_and_hide_defaults() {
        let flags = flags_of(&["-b"]);
        assert!(flags.contains(Flag::Escape));
        assert!(!flags.contains(Flag::Color));
        assert!(!flags.contains(Flag::HideControlChars));
        assert!(flags.contains(Flag::OnePerLine));
    }

    #[test]
    fn comma_mode_suppresses_one_per_line_default() {
        let flags = flags_of(&["-m"]);
        assert!(flags.contains(Flag::CommaSeparated));
        assert!(!flags.contains(Flag::OnePerLine));
    }

    #[test]
    fn show_control_chars_suppresses_hide_default() {
        let flags = flags_of(&["--show-control-chars"]);
        assert!(flags.contains(Flag::ShowControlChars));
        assert!(!flags.contains(Flag::HideControlChars));
    }

    #[test]
    fn reverse_alone_implies_name_sort() {
        let flags = flags_of(&["-r"]);
        assert_eq!(flags.sort_criterion(), Some(Flag::SortName));
    }

    #[test]
    fn reverse_with_size_implies_size_sort() {
        let flags = flags_of(&["-s", "-r"]);
        assert_eq!(flags.sort_criterion(), Some(Flag::SortSize));
    }

    #[test]
    fn reverse_respects_explicit_criterion() {
        let flags = flags_of(&["-r", "-W"]);
        assert_eq!(flags.sort_criterion(), Some(Flag::SortWidth));
    }

    #[test]
    fn sort_key_parameter_implies_matching_criterion() {
        let resolved = resolve_strs(&["--sort=time"]).unwrap();
        assert_eq!(resolved.flags.sort_criterion(), Some(Flag::SortTime));
        // Time metadata comes along so the criterion has something to compare.
        assert!(resolved.flags.contains(Flag::Time));
        assert_eq!(
            resolved.parameters.get(&Flag::SortKey),
            Some(&"time".to_owned())
        );
    }

    #[test]
    fn repeated_sort_keys_with_different_values_conflict() {
        let err = resolve_strs(&["--sort=size", "--sort=name"]).unwrap_err();
        assert_eq!(err, Error::ConflictingFlags(Flag::SortName, Flag::SortSize));
    }

    #[test]
    fn repeated_flags_are_idempotent() {
        assert_eq!(flags_of(&["-a", "-a", "--all"]), flags_of(&["-a"]));
    }
}
