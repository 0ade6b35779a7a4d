//! Stroke colors and the Holi palette.

use peniko::Color;
use thiserror::Error;

/// Default brush color (Holi purple).
pub const DEFAULT_COLOR: &str = "#9b87f5";

/// The Holi palette offered to new users.
pub const HOLI_PALETTE: [&str; 7] = [
    "#9b87f5", // Purple
    "#ff3f8e", // Pink
    "#33C3F0", // Blue
    "#59e6a3", // Green
    "#ffd965", // Yellow
    "#F97316", // Orange
    "#ea384c", // Red
];

/// Error returned for color strings that are not `#rgb`, `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color: {0:?}")]
pub struct ColorParseError(pub String);

/// Parse a CSS hex color string into a peniko [`Color`].
pub fn parse_css_color(color: &str) -> Result<Color, ColorParseError> {
    let invalid = || ColorParseError(color.to_string());
    let hex = color.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    // "#abc" expands each digit: a -> aa
    let short = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);

    match hex.len() {
        3 => Ok(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
        6 => Ok(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        )),
        8 => Ok(Color::from_rgba8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        )),
        _ => Err(invalid()),
    }
}

/// Format a color as `#rrggbb`, or `#rrggbbaa` when it is not fully opaque.
pub fn to_css_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    if rgba.a == 255 {
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// Pick a color from the Holi palette.
///
/// Uses a counter mixed with a splitmix32-style hash so it behaves the same on
/// every platform without a random number source.
pub fn random_holi_color() -> &'static str {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SEED_COUNTER: AtomicU32 = AtomicU32::new(1);

    let counter = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut x = counter.wrapping_mul(0x9E3779B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EBCA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2AE35);
    x ^= x >> 16;

    HOLI_PALETTE[x as usize % HOLI_PALETTE.len()]
}
