//! Menu description parser — line scanner, menu tree, and the keyword
//! state machine that connects them
//!
//! # Language
//!
//! ```text
//! item=<label>          cmd=<command>          icon=<path-or-empty>
//! submenu=<label>       icon=<path-or-empty>
//! separator
//! iconsize=<8..256>     menupos=<x> <y>
//! ```
//!
//! Leading tabs encode nesting depth. An item's `item`→`cmd`→`icon` and a
//! submenu's `submenu`→`icon` must appear on consecutive non-blank lines at
//! one depth. Children of a submenu are indented one tab deeper; dropping
//! back to a shallower depth closes submenus.
//!
//! # Guarantees
//! - Deterministic: same input always produces the same tree
//! - Fail-fast: parsing stops at the first error, no partial tree is returned

pub mod ast;
pub mod scanner;

use std::io::BufRead;

use crate::directives::{parse_icon_size, parse_menu_position, Directives};
use crate::error::{ParseError, ParseErrorKind};
use crate::options::{ParseOptions, MAX_ICON_SIZE, MIN_ICON_SIZE};
use crate::Menu;
use ast::{Icon, Item, MenuNode, Submenu};
use scanner::{scan_line, ClassifiedLine, Keyword, LineScanner, ScannedLine};

// ── Public API ─────────────────────────────────────────────

/// Parse a menu description from a buffered reader using default limits
///
/// # Errors
/// `Error::Io` if reading fails, `Error::Parse` at the first invalid line.
pub fn parse<R: BufRead>(reader: R) -> crate::Result<Menu> {
    parse_with_options(reader, &ParseOptions::default())
}

/// Parse a menu description from a buffered reader
#[tracing::instrument(level = "debug", skip_all)]
pub fn parse_with_options<R: BufRead>(reader: R, options: &ParseOptions) -> crate::Result<Menu> {
    let mut scanner = LineScanner::new(reader, options.max_line_length);
    let mut machine = StateMachine::new(options);

    while let Some(line) = scanner.next_line()? {
        machine.feed(line)?;
    }

    Ok(machine.finish(scanner.line_number())?)
}

/// Parse an in-memory menu description using default limits
pub fn parse_str(input: &str) -> Result<Menu, ParseError> {
    parse_str_with_options(input, &ParseOptions::default())
}

/// Parse an in-memory menu description
pub fn parse_str_with_options(input: &str, options: &ParseOptions) -> Result<Menu, ParseError> {
    let mut machine = StateMachine::new(options);
    let mut line_number = 0;

    for raw in input.split_inclusive('\n') {
        line_number += 1;
        let line = scan_line(line_number, raw.as_bytes(), options.max_line_length)?;
        if line.classified != ClassifiedLine::Blank {
            machine.feed(line)?;
        }
    }

    machine.finish(line_number)
}

// ── State machine ──────────────────────────────────────────

/// What the machine expects next, carrying the partially read node
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Idle,
    ExpectCmd { label: String },
    ExpectIconForItem { label: String, command: String },
    ExpectIconForSubmenu { label: String },
}

/// Per-parse state; never shared between parse runs
struct StateMachine<'o> {
    options: &'o ParseOptions,
    mode: Mode,
    root: Submenu,
    /// Submenus entered below the root, innermost last
    open: Vec<Submenu>,
    directives: Directives,
    item_count: usize,
}

impl<'o> StateMachine<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        StateMachine {
            options,
            mode: Mode::Idle,
            root: Submenu::default(),
            open: Vec::new(),
            directives: Directives::new(options.default_icon_size),
            item_count: 0,
        }
    }

    fn current_depth(&self) -> usize {
        self.open.len()
    }

    fn current_menu(&mut self) -> &mut Submenu {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    /// Process one non-blank line
    fn feed(&mut self, line: ScannedLine) -> Result<(), ParseError> {
        let ScannedLine {
            line_number,
            raw,
            classified,
        } = line;

        self.step(classified)
            .map_err(|kind| ParseError::new(kind, line_number, raw))
    }

    fn step(&mut self, line: ClassifiedLine) -> Result<(), ParseErrorKind> {
        let (keyword, value, depth) = match line {
            ClassifiedLine::Keyword {
                keyword,
                value,
                depth,
            } => (keyword, value, depth),
            ClassifiedLine::Malformed(text) => {
                tracing::debug!(%text, "unrecognized line");
                return Err(ParseErrorKind::UnrecognizedKeyword);
            }
            ClassifiedLine::Blank => return Ok(()),
        };

        self.track_depth(depth)?;

        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => self.start_sequence(keyword, value),
            Mode::ExpectCmd { label } => {
                if keyword != Keyword::Cmd {
                    return Err(missing(Keyword::Cmd, Keyword::Item));
                }
                self.mode = Mode::ExpectIconForItem {
                    label,
                    command: value,
                };
                Ok(())
            }
            Mode::ExpectIconForItem { label, command } => {
                if keyword != Keyword::Icon {
                    return Err(missing(Keyword::Icon, Keyword::Cmd));
                }
                let icon = self.read_icon(value);
                tracing::debug!(%label, depth, "item");
                self.current_menu().attach_child(MenuNode::Item(Item {
                    label,
                    command,
                    icon,
                }));
                self.item_count += 1;
                Ok(())
            }
            Mode::ExpectIconForSubmenu { label } => {
                if keyword != Keyword::Icon {
                    return Err(missing(Keyword::Icon, Keyword::Submenu));
                }
                let icon = self.read_icon(value);
                tracing::debug!(%label, depth = depth + 1, "entering submenu");
                self.open.push(Submenu::new(label, icon));
                Ok(())
            }
        }
    }

    /// Dispatch a keyword read while idle
    fn start_sequence(&mut self, keyword: Keyword, value: String) -> Result<(), ParseErrorKind> {
        match keyword {
            Keyword::Item => {
                if self.item_count >= self.options.max_items {
                    return Err(ParseErrorKind::ItemLimitExceeded {
                        limit: self.options.max_items,
                    });
                }
                self.mode = Mode::ExpectCmd { label: value };
            }
            Keyword::Submenu => {
                if self.current_depth() >= self.options.max_depth {
                    return Err(ParseErrorKind::DepthLimitExceeded {
                        limit: self.options.max_depth,
                    });
                }
                self.mode = Mode::ExpectIconForSubmenu { label: value };
            }
            Keyword::Separator => {
                self.current_menu().attach_child(MenuNode::Separator);
            }
            Keyword::IconSize => {
                let size = parse_icon_size(&value).ok_or(ParseErrorKind::InvalidIconSize {
                    min: MIN_ICON_SIZE,
                    max: MAX_ICON_SIZE,
                })?;
                tracing::info!(size, "new icon size");
                self.directives.icon_size = size;
            }
            Keyword::MenuPos => {
                let position =
                    parse_menu_position(&value).ok_or(ParseErrorKind::InvalidMenuPosition)?;
                tracing::debug!(x = position.x, y = position.y, "menu position");
                self.directives.menu_position = Some(position);
            }
            Keyword::Cmd | Keyword::Icon => {
                return Err(ParseErrorKind::OutOfOrderKeyword(keyword));
            }
        }
        Ok(())
    }

    /// Apply the indentation rule before any mode dispatch
    fn track_depth(&mut self, depth: usize) -> Result<(), ParseErrorKind> {
        let current = self.current_depth();
        if depth > current || (depth < current && self.mode != Mode::Idle) {
            return Err(ParseErrorKind::IndentationError {
                found: depth,
                current,
            });
        }
        while self.current_depth() > depth {
            self.close_submenu();
        }
        Ok(())
    }

    fn close_submenu(&mut self) {
        if let Some(submenu) = self.open.pop() {
            tracing::debug!(label = %submenu.label, depth = self.open.len() + 1, "leaving submenu");
            self.current_menu().attach_child(MenuNode::Submenu(submenu));
        }
    }

    /// Shared by items and submenus: an empty path means no icon
    fn read_icon(&self, path: String) -> Option<Icon> {
        if path.is_empty() {
            return None;
        }
        Some(Icon {
            path,
            size: self.directives.icon_size,
        })
    }

    /// Close everything still open and hand over the finished menu
    fn finish(mut self, last_line: usize) -> Result<Menu, ParseError> {
        if self.mode != Mode::Idle {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEndOfInput,
                last_line,
                String::new(),
            ));
        }
        while !self.open.is_empty() {
            self.close_submenu();
        }

        if self.item_count == 0 {
            tracing::warn!("menu description contains no items");
        }

        Ok(Menu {
            root: self.root,
            directives: self.directives,
            item_count: self.item_count,
        })
    }
}

fn missing(expected: Keyword, after: Keyword) -> ParseErrorKind {
    ParseErrorKind::MissingRequiredKeyword { expected, after }
}
