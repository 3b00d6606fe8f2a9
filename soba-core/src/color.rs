//! Terminal color representation
//!
//! Supports:
//! - The 16-color palette (0-7 standard, 8-15 bright)
//! - 256-color indexed palette
//! - 24-bit true color (RGB)

use serde::{Deserialize, Serialize};

/// Represents a terminal color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Palette color: 0-7 standard, 8-15 bright, 16-255 extended.
    Indexed(u8),
    /// 24-bit RGB color.
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    /// Append the SGR codes selecting this color as the foreground,
    /// using the narrowest form: `30+c`, `90+(c-8)`, `38;5;c`, or
    /// `38;2;r;g;b`.
    pub fn push_fg_codes(&self, codes: &mut Vec<i32>) {
        match *self {
            Color::Indexed(c @ 0..=7) => codes.push(30 + i32::from(c)),
            Color::Indexed(c @ 8..=15) => codes.push(90 + i32::from(c - 8)),
            Color::Indexed(c) => codes.extend([38, 5, i32::from(c)]),
            Color::Rgb { r, g, b } => {
                codes.extend([38, 2, i32::from(r), i32::from(g), i32::from(b)])
            }
        }
    }

    /// Background counterpart of [`push_fg_codes`](Self::push_fg_codes):
    /// `40+c`, `100+(c-8)`, `48;5;c`, or `48;2;r;g;b`.
    pub fn push_bg_codes(&self, codes: &mut Vec<i32>) {
        match *self {
            Color::Indexed(c @ 0..=7) => codes.push(40 + i32::from(c)),
            Color::Indexed(c @ 8..=15) => codes.push(100 + i32::from(c - 8)),
            Color::Indexed(c) => codes.extend([48, 5, i32::from(c)]),
            Color::Rgb { r, g, b } => {
                codes.extend([48, 2, i32::from(r), i32::from(g), i32::from(b)])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fg(color: Color) -> Vec<i32> {
        let mut codes = Vec::new();
        color.push_fg_codes(&mut codes);
        codes
    }

    fn bg(color: Color) -> Vec<i32> {
        let mut codes = Vec::new();
        color.push_bg_codes(&mut codes);
        codes
    }

    #[test]
    fn test_standard_palette() {
        assert_eq!(fg(Color::Indexed(0)), vec![30]);
        assert_eq!(fg(Color::Indexed(7)), vec![37]);
        assert_eq!(bg(Color::Indexed(1)), vec![41]);
    }

    #[test]
    fn test_bright_palette() {
        assert_eq!(fg(Color::Indexed(8)), vec![90]);
        assert_eq!(fg(Color::Indexed(15)), vec![97]);
        assert_eq!(bg(Color::Indexed(9)), vec![101]);
    }

    #[test]
    fn test_extended_palette() {
        assert_eq!(fg(Color::Indexed(16)), vec![38, 5, 16]);
        assert_eq!(fg(Color::Indexed(255)), vec![38, 5, 255]);
        assert_eq!(bg(Color::Indexed(128)), vec![48, 5, 128]);
    }

    #[test]
    fn test_rgb() {
        assert_eq!(
            fg(Color::Rgb { r: 1, g: 2, b: 3 }),
            vec![38, 2, 1, 2, 3]
        );
        assert_eq!(
            bg(Color::Rgb {
                r: 255,
                g: 128,
                b: 0
            }),
            vec![48, 2, 255, 128, 0]
        );
    }
}
