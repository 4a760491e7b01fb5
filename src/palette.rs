//! Series colours.
//!
//! [`ColorCycle`] hands out [`PALETTE`] entries in order, wrapping around. Each
//! caller owns its own cycle; there is no shared cursor.
//!
//! ```rust
//! use plotfit::palette::{hex_to_rgba, ColorCycle};
//!
//! let mut colors = ColorCycle::default();
//! assert_eq!(colors.next_color(), "#2563eb");
//! assert_eq!(colors.next_color(), "#a855f7");
//!
//! assert_eq!(hex_to_rgba("#2563eb", 0.16), "rgba(37, 99, 235, 0.16)");
//! ```
use crate::value::format_number;

/// Colours assigned to new series, in order.
pub const PALETTE: [&str; 10] = [
    "#2563eb", // blue
    "#a855f7", // purple
    "#f97316", // orange
    "#22c55e", // green
    "#ef4444", // red
    "#14b8a6", // teal
    "#f43f5e", // rose
    "#0ea5e9", // sky
    "#facc15", // amber
    "#8b5cf6", // violet
];

/// Cycles through [`PALETTE`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorCycle {
    index: usize,
}
impl ColorCycle {
    /// The next colour. Wraps after the last palette entry.
    pub fn next_color(&mut self) -> &'static str {
        let color = PALETTE[self.index % PALETTE.len()];
        self.index += 1;
        color
    }

    /// Starts again from the first colour.
    pub fn reset(&mut self) {
        self.index = 0;
    }
}
impl Iterator for ColorCycle {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_color())
    }
}

/// Splits `#rrggbb` (the `#` is optional) into its channels.
#[must_use]
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let value = u32::from_str_radix(hex, 16).ok()?;
    let [_, r, g, b] = value.to_be_bytes();
    Some((r, g, b))
}

/// Converts `#rrggbb` into `rgba(r, g, b, alpha)`.
///
/// Anything that is not six hex digits after an optional `#` is returned unchanged.
#[must_use]
pub fn hex_to_rgba(color: &str, alpha: f64) -> String {
    match parse_hex(color) {
        Some((r, g, b)) => format!("rgba({r}, {g}, {b}, {})", format_number(alpha)),
        None => color.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let mut colors = ColorCycle::default();
        let first: Vec<_> = colors.by_ref().take(PALETTE.len()).collect();
        assert_eq!(first, PALETTE);
        assert_eq!(colors.next_color(), PALETTE[0]);

        colors.reset();
        assert_eq!(colors.next_color(), PALETTE[0]);
    }

    #[test]
    fn test_hex_to_rgba() {
        assert_eq!(hex_to_rgba("#ef4444", 0.1), "rgba(239, 68, 68, 0.1)");
        assert_eq!(hex_to_rgba("22c55e", 1.0), "rgba(34, 197, 94, 1)");
        assert_eq!(hex_to_rgba("#fff", 0.5), "#fff");
        assert_eq!(hex_to_rgba("#zzzzzz", 0.5), "#zzzzzz");
        assert_eq!(hex_to_rgba("steelblue", 0.5), "steelblue");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#0ea5e9"), Some((14, 165, 233)));
        assert_eq!(parse_hex("#0ea5e"), None);
    }
}
