//! Fixed presentation colors. Bubble fills come from the skill records; these
//! cover everything else.

use bevy::prelude::*;
use sb_core::parse_hex_color;

pub struct Palette;
impl Palette {
    pub const BG: Color = Color::srgb(0.06, 0.07, 0.1);
    pub const BUBBLE_FALLBACK: Color = Color::srgb(0.6, 0.6, 0.65);
    pub const LABEL: Color = Color::WHITE;
    /// Inner ring, tailwind blue-400 (#60a5fa).
    pub const RIPPLE_INNER: Color = Color::srgb(96.0 / 255.0, 165.0 / 255.0, 250.0 / 255.0);
    /// Outer ring, tailwind indigo-500 (#6366f1).
    pub const RIPPLE_OUTER: Color = Color::srgb(99.0 / 255.0, 102.0 / 255.0, 241.0 / 255.0);
    pub const RIPPLE_DOT: Color = Color::WHITE;
    pub const SELECTED_OUTLINE: Color = Color::srgba(1.0, 1.0, 1.0, 0.3);
    pub const PANEL_BG: Color = Color::srgba(0.05, 0.05, 0.08, 0.92);
}

/// Bubble fill for a hex string; malformed input falls back to a neutral grey.
pub fn bubble_fill(hex: &str) -> Color {
    parse_hex_color(hex).unwrap_or(Palette::BUBBLE_FALLBACK)
}
