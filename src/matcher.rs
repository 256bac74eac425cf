//! Regex match collection
//!
//! Compiles a pattern with JavaScript-style flag letters and walks a subject
//! string producing non-overlapping match records in order.
//!
//! # Scan Rule
//!
//! The scan starts at offset 0. After each match the offset moves to the
//! match end. When a match is empty (`start == end`) the offset is pushed one
//! character further, so patterns such as `(?:)` or `a*` always terminate:
//! a subject of N characters yields at most N + 1 empty matches.
//!
//! Offsets are UTF-8 byte offsets into the subject. Forced advances step over a
//! whole character so every offset stays on a character boundary.
//!
//! # Flags
//!
//! | Letter | Effect |
//! |--------|--------|
//! | `g` | collect every match (otherwise only the first) |
//! | `i` | case-insensitive |
//! | `m` | `^`/`$` match at line boundaries |
//! | `s` | `.` matches `\n` |
//! | `u` | accepted; patterns are always Unicode-aware |
//! | `y` | sticky: each match must begin exactly at the scan offset |
//!
//! # Examples
//!
//! ```rust
//! use text_codec_kit::matcher::find_all_matches;
//!
//! let matches = find_all_matches(
//!     r"\b\w+@\w+\.\w+\b",
//!     "g",
//!     "Contact john@example.com or support@company.org",
//! )?;
//! assert_eq!(matches.len(), 2);
//! assert_eq!(matches[0].text, "john@example.com");
//! assert_eq!(matches[0].start, 8);
//! # Ok::<(), text_codec_kit::CodecError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::error::CodecError;

/// Parsed JavaScript-style regex flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchFlags {
    /// `g`: collect all matches
    pub global: bool,
    /// `i`: case-insensitive matching
    pub ignore_case: bool,
    /// `m`: multi-line anchors
    pub multi_line: bool,
    /// `s`: dot matches newline
    pub dot_all: bool,
    /// `u`: Unicode mode (always on, recorded for display)
    pub unicode: bool,
    /// `y`: sticky matching
    pub sticky: bool,
}

impl MatchFlags {
    /// Parse a flag string such as `"gi"`
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidPattern` for unknown or repeated letters.
    pub fn parse(flags: &str) -> Result<Self, CodecError> {
        let mut parsed = MatchFlags::default();

        for letter in flags.chars() {
            let slot = match letter {
                'g' => &mut parsed.global,
                'i' => &mut parsed.ignore_case,
                'm' => &mut parsed.multi_line,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                'y' => &mut parsed.sticky,
                other => {
                    return Err(CodecError::InvalidPattern(format!(
                        "unknown flag '{}' in \"{}\"",
                        other, flags
                    )));
                }
            };

            if *slot {
                return Err(CodecError::InvalidPattern(format!(
                    "repeated flag '{}' in \"{}\"",
                    letter, flags
                )));
            }
            *slot = true;
        }

        Ok(parsed)
    }
}

impl FromStr for MatchFlags {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchFlags::parse(s)
    }
}

impl fmt::Display for MatchFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letters = [
            (self.global, 'g'),
            (self.ignore_case, 'i'),
            (self.multi_line, 'm'),
            (self.dot_all, 's'),
            (self.unicode, 'u'),
            (self.sticky, 'y'),
        ];
        for (enabled, letter) in letters {
            if enabled {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}

/// One capture group of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapturedGroup {
    /// Group name for `(?P<name>...)` / `(?<name>...)` groups
    pub name: Option<String>,
    /// Captured text, `None` when the group did not participate
    pub value: Option<String>,
    /// Byte offset of the captured text
    pub start: Option<usize>,
}

/// One match of a pattern against a subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// Matched text
    pub text: String,
    /// Byte offset where the match starts
    pub start: usize,
    /// Byte offset one past the match end
    pub end: usize,
    /// `start` counted in UTF-16 code units, as JavaScript string indices are
    pub utf16_start: usize,
    /// `end` counted in UTF-16 code units
    pub utf16_end: usize,
    /// Capture groups 1..N in pattern order
    pub groups: Vec<CapturedGroup>,
}

impl MatchRecord {
    /// True for matches that consumed no characters
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A compiled pattern together with its flags
///
/// Immutable after construction, so one instance can be scanned against any
/// number of subjects, from any number of threads.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    flags: MatchFlags,
}

impl CompiledPattern {
    /// Compile `pattern` with a JavaScript-style flag string
    pub fn new(pattern: &str, flags: &str) -> Result<Self, CodecError> {
        Self::with_flags(pattern, MatchFlags::parse(flags)?)
    }

    /// Compile `pattern` with already-parsed flags
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidPattern` carrying the regex engine's message.
    pub fn with_flags(pattern: &str, flags: MatchFlags) -> Result<Self, CodecError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.ignore_case)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(|e| {
                tracing::debug!(pattern_len = pattern.len(), "pattern failed to compile");
                CodecError::InvalidPattern(e.to_string())
            })?;

        Ok(Self { regex, flags })
    }

    /// The flags this pattern was compiled with
    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    /// The pattern source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Lazily scan `subject`; each call starts a fresh scan from offset 0
    pub fn matches<'p, 's>(&'p self, subject: &'s str) -> Matches<'p, 's> {
        Matches {
            pattern: self,
            subject,
            position: 0,
            finished: false,
            utf16_cursor: (0, 0),
        }
    }
}

/// Iterator over the matches of a [`CompiledPattern`] in a subject
#[derive(Debug)]
pub struct Matches<'p, 's> {
    pattern: &'p CompiledPattern,
    subject: &'s str,
    position: usize,
    finished: bool,
    /// Last converted (byte offset, UTF-16 index) pair
    utf16_cursor: (usize, usize),
}

impl Matches<'_, '_> {
    /// Current scan offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// UTF-16 index of `byte`; offsets must be requested in non-decreasing order
    fn utf16_index(&mut self, byte: usize) -> usize {
        let (cursor_byte, cursor_units) = self.utf16_cursor;
        let units = cursor_units + self.subject[cursor_byte..byte].encode_utf16().count();
        self.utf16_cursor = (byte, units);
        units
    }

    fn advance_past(&mut self, start: usize, end: usize) {
        if end > start {
            self.position = end;
            return;
        }

        // Empty match: step over one character or stop at the end of input
        match self.subject[end..].chars().next() {
            Some(ch) => self.position = end + ch.len_utf8(),
            None => self.finished = true,
        }
    }
}

impl Iterator for Matches<'_, '_> {
    type Item = MatchRecord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let pattern = self.pattern;
        let regex = &pattern.regex;
        let flags = pattern.flags;

        let Some(captures) = regex.captures_at(self.subject, self.position) else {
            self.finished = true;
            return None;
        };
        let whole = captures.get(0)?;

        if flags.sticky && whole.start() != self.position {
            self.finished = true;
            return None;
        }

        let groups = regex
            .capture_names()
            .zip(captures.iter())
            .skip(1)
            .map(|(name, group)| CapturedGroup {
                name: name.map(ToOwned::to_owned),
                value: group.map(|m| m.as_str().to_owned()),
                start: group.map(|m| m.start()),
            })
            .collect();

        let record = MatchRecord {
            text: whole.as_str().to_owned(),
            start: whole.start(),
            end: whole.end(),
            utf16_start: self.utf16_index(whole.start()),
            utf16_end: self.utf16_index(whole.end()),
            groups,
        };

        self.advance_past(whole.start(), whole.end());
        if !flags.global {
            self.finished = true;
        }

        Some(record)
    }
}

/// Compile `pattern` and collect its matches in `subject`
///
/// # Errors
///
/// Returns `CodecError::InvalidPattern` for malformed patterns or flags.
pub fn find_all_matches(
    pattern: &str,
    flags: &str,
    subject: &str,
) -> Result<Vec<MatchRecord>, CodecError> {
    let compiled = CompiledPattern::new(pattern, flags)?;
    let matches: Vec<MatchRecord> = compiled.matches(subject).collect();
    tracing::trace!(
        count = matches.len(),
        subject_len = subject.len(),
        "collected regex matches"
    );
    Ok(matches)
}

/// Render matches as `Match N: "text" at position P` lines
///
/// `P` is the UTF-16 index ([`MatchRecord::utf16_start`]), so positions agree
/// with what a browser reports for the same subject. Byte offsets stay
/// available in [`MatchRecord::start`].
pub fn summarize_matches(matches: &[MatchRecord]) -> String {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| format!("Match {}: \"{}\" at position {}", i + 1, m.text, m.utf16_start))
        .collect::<Vec<_>>()
        .join("\n")
}
