//! RGBA color values and their hex-string forms.
//!
//! Stored settings encode fill colors as lowercase `#rrggbb`. Parsing also
//! accepts the 8-digit `#aarrggbb` form (with or without the `#` prefix),
//! but serialization always writes 6 digits: the alpha channel is dropped
//! on the wire. Export fill colors are opaque in practice, so this is an
//! accepted lossy round-trip rather than a defect.

/// An 8-bit-per-channel RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const BLACK: Rgba = Rgba::rgb(0x00, 0x00, 0x00);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Parse a hex color string.
    ///
    /// Accepts `rrggbb` (full opacity assumed) and `aarrggbb`, each with an
    /// optional leading `#`. Returns `None` for anything else; callers
    /// decide whether that is a fallback or an error.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        match digits.len() {
            6 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                Some(Self::rgb(
                    (value >> 16) as u8,
                    (value >> 8) as u8,
                    value as u8,
                ))
            }
            8 => {
                let value = u32::from_str_radix(digits, 16).ok()?;
                Some(Self {
                    a: (value >> 24) as u8,
                    r: (value >> 16) as u8,
                    g: (value >> 8) as u8,
                    b: value as u8,
                })
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb` form used in the stored settings string.
    /// Alpha is not written.
    pub fn to_hex_rgb(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_with_prefix() {
        assert_eq!(Rgba::parse("#ff8000"), Some(Rgba::rgb(0xff, 0x80, 0x00)));
    }

    #[test]
    fn test_parse_six_digit_without_prefix() {
        assert_eq!(Rgba::parse("00ff00"), Some(Rgba::rgb(0x00, 0xff, 0x00)));
    }

    #[test]
    fn test_parse_eight_digit_keeps_alpha() {
        let color = Rgba::parse("#80ff0000").unwrap();
        assert_eq!(color.a, 0x80);
        assert_eq!(color.r, 0xff);
        assert_eq!(color.g, 0x00);
        assert_eq!(color.b, 0x00);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Rgba::parse("not a color"), None);
        assert_eq!(Rgba::parse("#fff"), None);
        assert_eq!(Rgba::parse("#zzzzzz"), None);
        assert_eq!(Rgba::parse(""), None);
    }

    #[test]
    fn test_hex_rgb_is_lowercase_six_digits() {
        assert_eq!(Rgba::rgb(0xAB, 0xCD, 0xEF).to_hex_rgb(), "#abcdef");
    }

    #[test]
    fn test_hex_rgb_drops_alpha() {
        let translucent = Rgba { r: 0xff, g: 0xff, b: 0xff, a: 0x10 };
        assert_eq!(translucent.to_hex_rgb(), "#ffffff");
    }

    #[test]
    fn test_white_round_trips() {
        assert_eq!(Rgba::parse(&Rgba::WHITE.to_hex_rgb()), Some(Rgba::WHITE));
    }
}
