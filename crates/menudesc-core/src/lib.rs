//! menudesc core — parser and validator for menu description files
//!
//! A menu description is a tab-indented, line-oriented list of items,
//! submenus, separators, and two global directives. This crate turns it
//! into a validated [`Menu`] tree or a [`ParseError`] pinned to the first
//! offending line. Rendering, icon loading, and launching commands are left
//! to whoever consumes the tree.
//!
//! # Architecture
//!
//! ```text
//! text → LineScanner → StateMachine → Menu (tree + directives)
//!                                       ↓
//!                                   Normalizer → canonical text → SHA-256
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: same input always produces the same tree
//! - **Fail-fast**: the first error ends the parse, no partial tree escapes
//! - **Bounded**: line length, item count, and nesting depth are limited

pub mod directives;
pub mod error;
pub mod normalizer;
pub mod options;
pub mod parser;

pub use directives::{Directives, MenuPosition};
pub use error::{Error, ParseError, ParseErrorKind, Result};
pub use options::ParseOptions;
pub use parser::ast::{Icon, Item, MenuNode, Submenu, Walk};
pub use parser::{parse, parse_str, parse_str_with_options, parse_with_options};

use serde::{Deserialize, Serialize};

/// A successfully parsed menu description
///
/// Immutable once returned; safe to share read-only between a renderer and
/// anything else that inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    /// The top-level menu (depth 0, empty label)
    root: Submenu,
    directives: Directives,
    /// Items declared across the whole tree
    item_count: usize,
}

impl Menu {
    /// True when the description declared no items at all
    ///
    /// Not an error: the renderer is expected to show a placeholder.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    pub fn root(&self) -> &Submenu {
        &self.root
    }

    /// Directive values in effect at the end of the description
    pub fn directives(&self) -> &Directives {
        &self.directives
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Depth-first traversal of every node with its nesting depth
    pub fn walk(&self) -> Walk<'_> {
        self.root.walk()
    }
}
