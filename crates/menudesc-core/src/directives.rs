//! Global directives — settings that affect the whole menu rather than
//! producing a tree node
//!
//! `iconsize=` may appear any number of times; each occurrence only
//! affects icons declared after it. `menupos=` is last-write-wins.

use serde::{Deserialize, Serialize};

use crate::options::{MAX_ICON_SIZE, MIN_ICON_SIZE};

/// Screen point the popup menu is centered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directives {
    /// Icon size in pixels after the last `iconsize=` line
    pub icon_size: u32,
    pub menu_position: Option<MenuPosition>,
}

impl Directives {
    pub fn new(icon_size: u32) -> Self {
        Directives {
            icon_size,
            menu_position: None,
        }
    }
}

/// Parse an `iconsize=` value
///
/// Reads a leading, optionally signed, decimal integer and ignores whatever
/// follows it. Returns `None` when there is no number or it falls outside
/// `[MIN_ICON_SIZE, MAX_ICON_SIZE]`.
pub fn parse_icon_size(value: &str) -> Option<u32> {
    let value = value.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let sign_len = usize::from(value.starts_with(['+', '-']));
    let digits = value[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return None;
    }

    let size: i64 = value[..sign_len + digits].parse().ok()?;
    let size = u32::try_from(size).ok()?;
    (MIN_ICON_SIZE..=MAX_ICON_SIZE).contains(&size).then_some(size)
}

/// Parse a `menupos=` value into two integers
///
/// The value must start with a digit run (the x coordinate). Any non-digit
/// characters may separate it from a second digit run (y). Signs are not
/// recognized.
pub fn parse_menu_position(value: &str) -> Option<MenuPosition> {
    let bytes = value.as_bytes();

    let x_len = digit_run(bytes);
    if x_len == 0 || x_len == bytes.len() {
        return None;
    }
    let rest = &bytes[x_len..];

    let gap = rest.iter().take_while(|b| !b.is_ascii_digit()).count();
    let rest = &rest[gap..];
    let y_len = digit_run(rest);
    if y_len == 0 {
        return None;
    }

    Some(MenuPosition {
        x: parse_digits(&bytes[..x_len])?,
        y: parse_digits(&rest[..y_len])?,
    })
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

fn parse_digits(digits: &[u8]) -> Option<i32> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}
