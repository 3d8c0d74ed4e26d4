//! Canonical normalizer — writes a parsed menu back out in one fixed form
//!
//! # Canonical form
//!
//! - `menupos=<x> <y>` first, if set
//! - one keyword per line as `keyword=value`, nesting by tabs
//! - no comments, no blank lines
//! - `iconsize=` emitted right before the first node whose icon was
//!   declared at a different size, and once more at the end if the final
//!   icon size still differs
//!
//! # Guarantees
//!
//! - **Lossless**: `parse(normalize(m)) == m`
//! - **Idempotent**: `normalize(normalize(x)) == normalize(x)`
//! - **Deterministic**: the SHA-256 of the canonical text identifies a menu

use std::fmt::Write as _;

use sha2::{Digest, Sha256};

use crate::parser::ast::{Icon, MenuNode, Submenu};
use crate::{Menu, ParseError, ParseOptions};

// ── Public API ─────────────────────────────────────────────

/// Parse `input` and return its canonical text
///
/// # Errors
/// Returns the first `ParseError` of the input.
pub fn normalize_text(input: &str, options: &ParseOptions) -> Result<String, ParseError> {
    let menu = crate::parse_str_with_options(input, options)?;
    Ok(normalize(&menu, options))
}

/// Serialize a parsed menu to canonical text
///
/// `options.default_icon_size` must be the one the menu was parsed with,
/// otherwise icon sizes are re-declared where they need not be.
pub fn normalize(menu: &Menu, options: &ParseOptions) -> String {
    let mut writer = CanonicalWriter {
        out: String::new(),
        icon_size: options.default_icon_size,
    };

    if let Some(pos) = menu.directives.menu_position {
        let _ = writeln!(writer.out, "menupos={} {}", pos.x, pos.y);
    }
    writer.write_children(&menu.root, 0);
    if menu.directives.icon_size != writer.icon_size {
        writer.write_icon_size(menu.directives.icon_size, 0);
    }

    writer.out
}

/// SHA-256 hex digest of the canonical text
pub fn compute_hash(menu: &Menu, options: &ParseOptions) -> String {
    let canonical = normalize(menu, options);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ── Writer ─────────────────────────────────────────────────

struct CanonicalWriter {
    out: String,
    /// Icon size a re-parse would have in effect at this point
    icon_size: u32,
}

impl CanonicalWriter {
    fn write_children(&mut self, menu: &Submenu, depth: usize) {
        for node in menu.children() {
            self.write_node(node, depth);
        }
    }

    fn write_node(&mut self, node: &MenuNode, depth: usize) {
        match node {
            MenuNode::Item(item) => {
                self.sync_icon_size(item.icon.as_ref(), depth);
                self.write_line(depth, "item", &item.label);
                self.write_line(depth, "cmd", &item.command);
                self.write_icon(item.icon.as_ref(), depth);
            }
            MenuNode::Submenu(submenu) => {
                self.sync_icon_size(submenu.icon.as_ref(), depth);
                self.write_line(depth, "submenu", &submenu.label);
                self.write_icon(submenu.icon.as_ref(), depth);
                self.write_children(submenu, depth + 1);
            }
            MenuNode::Separator => {
                self.indent(depth);
                self.out.push_str("separator\n");
            }
        }
    }

    fn sync_icon_size(&mut self, icon: Option<&Icon>, depth: usize) {
        if let Some(icon) = icon {
            if icon.size != self.icon_size {
                self.write_icon_size(icon.size, depth);
            }
        }
    }

    fn write_icon_size(&mut self, size: u32, depth: usize) {
        self.write_line(depth, "iconsize", &size.to_string());
        self.icon_size = size;
    }

    fn write_icon(&mut self, icon: Option<&Icon>, depth: usize) {
        let path = icon.map_or("", |icon| icon.path.as_str());
        self.write_line(depth, "icon", path);
    }

    fn write_line(&mut self, depth: usize, keyword: &str, value: &str) {
        self.indent(depth);
        let _ = writeln!(self.out, "{}={}", keyword, value);
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push('\t');
        }
    }
}
