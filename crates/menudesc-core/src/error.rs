//! Error types for menu description parsing
//!
//! Every parse failure is fatal: the parser stops at the first offending
//! line and reports it together with its 1-based line number and the
//! original line text.

use crate::parser::scanner::Keyword;

/// What went wrong on the offending line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    /// A physical line reached the maximum line length
    #[error("line too long (limit is {limit} bytes)")]
    OverlongLine { limit: usize },

    /// Line text did not match any known keyword pattern
    #[error("bad syntax")]
    UnrecognizedKeyword,

    /// A keyword appeared where no sequence expects it
    #[error("keyword '{0}' out of order")]
    OutOfOrderKeyword(Keyword),

    /// The next keyword of an item or submenu sequence was absent
    #[error("missing keyword '{expected}=' (after '{after}=')")]
    MissingRequiredKeyword { expected: Keyword, after: Keyword },

    /// Depth increased without an open submenu, or changed mid-sequence
    #[error("keyword found at incorrect indentation (depth {found}, menu depth {current})")]
    IndentationError { found: usize, current: usize },

    #[error("maximum submenu depth exceeded (limit is {limit})")]
    DepthLimitExceeded { limit: usize },

    #[error("exceeded maximum number of menu items (limit is {limit})")]
    ItemLimitExceeded { limit: usize },

    #[error("illegal size for menu icon (must be between {min} and {max})")]
    InvalidIconSize { min: u32, max: u32 },

    #[error("error reading menu position")]
    InvalidMenuPosition,

    /// Input ended in the middle of an item or submenu sequence
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

/// A fatal parse error anchored to a physical input line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line_number}: {kind}")]
pub struct ParseError {
    /// 1-based physical line number, blank and comment lines included
    pub line_number: usize,
    pub kind: ParseErrorKind,
    /// The offending line as read, without its line terminator
    pub raw_line: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, line_number: usize, raw_line: impl Into<String>) -> Self {
        Self {
            line_number,
            kind,
            raw_line: raw_line.into(),
        }
    }

    /// Human-readable description without the line prefix
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Errors from parsing a description read from a stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result type alias for stream parsing
pub type Result<T> = std::result::Result<T, Error>;
