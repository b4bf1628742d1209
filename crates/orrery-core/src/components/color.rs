use crate::error::{ConfigResult, ConfigurationError};

/// Linear RGB color for rendering, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS hex color: `#RRGGBB` or the `#RGB` shorthand.
    pub fn from_hex(hex: &str) -> ConfigResult<Self> {
        let invalid = || ConfigurationError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        let (r, g, b) = match digits.len() {
            6 => (channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?),
            3 => {
                // #abc == #aabbcc
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                (r * 17, g * 17, b * 17)
            }
            _ => return Err(invalid()),
        };

        Ok(Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        // Neutral grey, used for the ring band of bodies without a ring color.
        Self { r: 0.655, g: 0.616, b: 0.490 }
    }
}
