//! SGR (Select Graphic Rendition) attribute records.
//!
//! Every field of a record is optional. `None` means "inherit / default"
//! and is distinct from an attribute explicitly switched off via 22/23/...
//! (`Some(false)`). Emission only writes set fields, and only `true`
//! booleans produce codes.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A parsed SGR attribute set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SgrAttributes {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: Option<bool>,
    pub dim: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub blink: Option<bool>,
    pub inverse: Option<bool>,
    pub hidden: Option<bool>,
    pub strikethrough: Option<bool>,
}

impl SgrAttributes {
    /// Parse an SGR parameter list into a record.
    ///
    /// A `0` anywhere resets: it returns an empty record, discarding
    /// parameters before and after it.
    pub fn parse(params: &[i32]) -> SgrAttributes {
        let mut attrs = SgrAttributes::default();
        let mut i = 0;
        while i < params.len() {
            match params[i] {
                0 => return SgrAttributes::default(),
                1 => attrs.bold = Some(true),
                2 => attrs.dim = Some(true),
                3 => attrs.italic = Some(true),
                4 => attrs.underline = Some(true),
                5 => attrs.blink = Some(true),
                7 => attrs.inverse = Some(true),
                8 => attrs.hidden = Some(true),
                9 => attrs.strikethrough = Some(true),
                22 => {
                    attrs.bold = Some(false);
                    attrs.dim = Some(false);
                }
                23 => attrs.italic = Some(false),
                24 => attrs.underline = Some(false),
                25 => attrs.blink = Some(false),
                27 => attrs.inverse = Some(false),
                28 => attrs.hidden = Some(false),
                29 => attrs.strikethrough = Some(false),
                p @ 30..=37 => attrs.fg = Some(Color::Indexed((p - 30) as u8)),
                38 => {
                    if let Some((color, consumed)) = extended_color(&params[i + 1..]) {
                        attrs.fg = Some(color);
                        i += consumed;
                    }
                }
                39 => attrs.fg = None,
                p @ 40..=47 => attrs.bg = Some(Color::Indexed((p - 40) as u8)),
                48 => {
                    if let Some((color, consumed)) = extended_color(&params[i + 1..]) {
                        attrs.bg = Some(color);
                        i += consumed;
                    }
                }
                49 => attrs.bg = None,
                p @ 90..=97 => attrs.fg = Some(Color::Indexed((p - 90 + 8) as u8)),
                p @ 100..=107 => attrs.bg = Some(Color::Indexed((p - 100 + 8) as u8)),
                _ => {}
            }
            i += 1;
        }
        attrs
    }

    /// Layer `overlay` on top of `self`: a field set in the overlay wins,
    /// an unset overlay field inherits from the base. An overlay carrying
    /// only `bold` does not disturb colors.
    pub fn compose(&self, overlay: &SgrAttributes) -> SgrAttributes {
        SgrAttributes {
            fg: overlay.fg.or(self.fg),
            bg: overlay.bg.or(self.bg),
            bold: overlay.bold.or(self.bold),
            dim: overlay.dim.or(self.dim),
            italic: overlay.italic.or(self.italic),
            underline: overlay.underline.or(self.underline),
            blink: overlay.blink.or(self.blink),
            inverse: overlay.inverse.or(self.inverse),
            hidden: overlay.hidden.or(self.hidden),
            strikethrough: overlay.strikethrough.or(self.strikethrough),
        }
    }

    /// Minimal ANSI sequence reproducing this record: boolean attributes
    /// in the fixed order 1,2,3,4,5,7,8,9, then foreground, then
    /// background. An all-unset record yields the empty string.
    pub fn to_sequence(&self) -> String {
        let mut codes: Vec<i32> = Vec::new();
        for (flag, code) in [
            (self.bold, 1),
            (self.dim, 2),
            (self.italic, 3),
            (self.underline, 4),
            (self.blink, 5),
            (self.inverse, 7),
            (self.hidden, 8),
            (self.strikethrough, 9),
        ] {
            if flag == Some(true) {
                codes.push(code);
            }
        }
        if let Some(fg) = self.fg {
            fg.push_fg_codes(&mut codes);
        }
        if let Some(bg) = self.bg {
            bg.push_bg_codes(&mut codes);
        }
        if codes.is_empty() {
            return String::new();
        }
        let joined = codes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(";");
        format!("\x1b[{}m", joined)
    }

    /// True when no field is set. A record holding `Some(false)` is not
    /// empty: the explicit "off" is information.
    pub fn is_empty(&self) -> bool {
        *self == SgrAttributes::default()
    }
}

/// Extended color payload after a 38/48: `5;n` or `2;r;g;b`. Returns the
/// color and how many parameters were consumed; a truncated payload
/// returns `None` and consumes nothing.
fn extended_color(rest: &[i32]) -> Option<(Color, usize)> {
    match *rest.first()? {
        5 => rest
            .get(1)
            .map(|&n| (Color::Indexed(n as u8), 2)),
        2 => {
            if rest.len() >= 4 {
                Some((
                    Color::Rgb {
                        r: rest[1] as u8,
                        g: rest[2] as u8,
                        b: rest[3] as u8,
                    },
                    4,
                ))
            } else {
                None
            }
        }
        _ => None,
    }
}
