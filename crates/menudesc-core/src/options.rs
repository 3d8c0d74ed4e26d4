//! Parser limits and defaults

/// Longest physical line accepted, in bytes (terminator excluded)
pub const MAX_LINE_LENGTH: usize = 768;
/// Most items a single description may declare
pub const MAX_MENU_ENTRIES: usize = 1024;
/// Deepest submenu nesting below the root menu
pub const MAX_SUBMENU_DEPTH: usize = 4;
pub const MIN_ICON_SIZE: u32 = 8;
pub const MAX_ICON_SIZE: u32 = 256;
/// Icon size used until the first `iconsize=` directive
pub const DEFAULT_ICON_SIZE: u32 = 16;

/// Tunable limits for one parse run
///
/// `Default` yields the reference limits above. The icon size bounds are
/// part of the language and are not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_line_length: usize,
    pub max_items: usize,
    pub max_depth: usize,
    pub default_icon_size: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_line_length: MAX_LINE_LENGTH,
            max_items: MAX_MENU_ENTRIES,
            max_depth: MAX_SUBMENU_DEPTH,
            default_icon_size: DEFAULT_ICON_SIZE,
        }
    }
}

impl ParseOptions {
    /// Override the starting icon size, clamped into the legal range
    #[must_use]
    pub fn with_default_icon_size(mut self, size: u32) -> Self {
        self.default_icon_size = size.clamp(MIN_ICON_SIZE, MAX_ICON_SIZE);
        self
    }
}
