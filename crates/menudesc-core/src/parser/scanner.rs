//! Line scanner — turns physical input lines into classified lines
//!
//! Handles: `#` comments (no escaping), trailing whitespace, blank lines,
//! tab-counted nesting depth, and the `keyword *= *value` pattern.
//! Works on bytes; non-UTF-8 sequences in values are replaced lossily.
//!
//! Guarantees:
//! - Classification of a single line is a pure function (`classify_line`)
//! - Blank and comment-only lines never reach the state machine
//! - Line numbers count every physical line, blank ones included

use std::io::{BufRead, Read};

use crate::error::{ParseError, ParseErrorKind};

/// Keyword kinds of the menu description language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Item,
    Cmd,
    Icon,
    Submenu,
    Separator,
    IconSize,
    MenuPos,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Item => "item",
            Keyword::Cmd => "cmd",
            Keyword::Icon => "icon",
            Keyword::Submenu => "submenu",
            Keyword::Separator => "separator",
            Keyword::IconSize => "iconsize",
            Keyword::MenuPos => "menupos",
        }
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords taking a `= value`, in match order
const VALUE_KEYWORDS: [Keyword; 6] = [
    Keyword::Cmd,
    Keyword::Item,
    Keyword::Icon,
    Keyword::Submenu,
    Keyword::MenuPos,
    Keyword::IconSize,
];

/// Scanner output for one physical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedLine {
    /// Nothing left after comment and whitespace stripping
    Blank,
    /// Recognized keyword with its nesting depth and value text
    Keyword {
        keyword: Keyword,
        value: String,
        depth: usize,
    },
    /// Stripped text that matched no keyword
    Malformed(String),
}

/// A classified line together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    pub line_number: usize,
    /// Original line text without its terminator
    pub raw: String,
    pub classified: ClassifiedLine,
}

// ── Classification ─────────────────────────────────────────

/// Classify one raw line (terminator may or may not be present)
pub fn classify_line(raw: &[u8]) -> ClassifiedLine {
    let uncommented = match raw.iter().position(|&b| b == b'#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };

    let trimmed_len = uncommented
        .iter()
        .rposition(|&b| !is_c_space(b))
        .map_or(0, |idx| idx + 1);
    let line = &uncommented[..trimmed_len];
    if line.is_empty() {
        return ClassifiedLine::Blank;
    }

    let depth = line.iter().take_while(|&&b| b == b'\t').count();
    let start = line
        .iter()
        .position(|&b| b != b'\t' && b != b' ')
        .unwrap_or(line.len());
    let text = String::from_utf8_lossy(&line[start..]);

    if text == Keyword::Separator.as_str() {
        return ClassifiedLine::Keyword {
            keyword: Keyword::Separator,
            value: String::new(),
            depth,
        };
    }

    for keyword in VALUE_KEYWORDS {
        if let Some(value) = match_assignment(&text, keyword.as_str()) {
            return ClassifiedLine::Keyword {
                keyword,
                value: value.to_string(),
                depth,
            };
        }
    }

    ClassifiedLine::Malformed(text.into_owned())
}

/// Match `keyword *= *` at the start of `text`, returning the value part
fn match_assignment<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    let rest = rest.trim_start_matches(' ').strip_prefix('=')?;
    Some(rest.trim_start_matches(' '))
}

/// Whitespace as C's `isspace` sees it
fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Drop a trailing `\n` or `\r\n`
fn strip_terminator(raw: &[u8]) -> &[u8] {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    raw.strip_suffix(b"\r").unwrap_or(raw)
}

/// Length-check and classify one physical line
pub fn scan_line(
    line_number: usize,
    raw: &[u8],
    max_line_length: usize,
) -> Result<ScannedLine, ParseError> {
    let content = strip_terminator(raw);
    let raw_text = String::from_utf8_lossy(content).into_owned();

    if content.len() >= max_line_length {
        return Err(ParseError::new(
            ParseErrorKind::OverlongLine {
                limit: max_line_length,
            },
            line_number,
            raw_text,
        ));
    }

    Ok(ScannedLine {
        line_number,
        raw: raw_text,
        classified: classify_line(content),
    })
}

// ── Stream scanner ─────────────────────────────────────────

/// Pulls non-blank classified lines from a buffered reader
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    line_number: usize,
    max_line_length: usize,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(reader: R, max_line_length: usize) -> Self {
        LineScanner {
            reader,
            buf: Vec::new(),
            line_number: 0,
            max_line_length,
        }
    }

    /// Number of physical lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Next non-blank line, or `None` at end of input
    ///
    /// Reads at most a little past `max_line_length` bytes per line; an
    /// overlong line is reported with its text truncated there.
    pub fn next_line(&mut self) -> crate::Result<Option<ScannedLine>> {
        loop {
            self.buf.clear();
            // Bounded so an overlong line is never buffered past the limit;
            // anything this long fails the length check in `scan_line`.
            let limit = self.max_line_length as u64 + 2;
            if (&mut self.reader).take(limit).read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let line = scan_line(self.line_number, &self.buf, self.max_line_length)?;
            if line.classified != ClassifiedLine::Blank {
                return Ok(Some(line));
            }
        }
    }
}
