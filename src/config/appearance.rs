//! Visual appearance handed to a rendering surface.
//!
//! Built once by the caller and owned by the surface; nothing here is
//! loaded from bundled resources or cached process-wide.

use printpdf::Rgb;

use crate::config::defaults::{DEFAULT_BODY_FONT_SIZE, DEFAULT_PAGE_MARGIN};
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone)]
pub struct Appearance {
    pub scheme: ColorScheme,
    /// Link color
    pub accent: Rgb,
    /// Horizontal padding of the body and extra space below the last block
    pub body_padding: f32,
    pub base_font_size: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            scheme: ColorScheme::Light,
            accent: ACCENT_BLUE,
            body_padding: DEFAULT_PAGE_MARGIN,
            base_font_size: DEFAULT_BODY_FONT_SIZE,
        }
    }
}

impl Appearance {
    pub fn text_color(&self) -> Rgb {
        match self.scheme {
            ColorScheme::Light => rgb8(0x24, 0x29, 0x2e),
            ColorScheme::Dark => rgb8(0xc9, 0xd1, 0xd9),
        }
    }

    pub fn background_color(&self) -> Rgb {
        match self.scheme {
            ColorScheme::Light => rgb8(0xff, 0xff, 0xff),
            ColorScheme::Dark => rgb8(0x0d, 0x11, 0x17),
        }
    }

    /// Horizontal rules and table borders
    pub fn rule_color(&self) -> Rgb {
        rgb8(0x88, 0x88, 0x88)
    }

    /// Background behind code blocks
    pub fn code_background(&self) -> Rgb {
        match self.scheme {
            ColorScheme::Light => rgb8(0xf6, 0xf8, 0xfa),
            ColorScheme::Dark => rgb8(0x16, 0x1b, 0x22),
        }
    }
}

/// Default accent (links), GitHub blue
pub const ACCENT_BLUE: Rgb = Rgb {
    r: 0x03 as f32 / 255.0,
    g: 0x66 as f32 / 255.0,
    b: 0xd6 as f32 / 255.0,
    icc_profile: None,
};

fn rgb8(r: u8, g: u8, b: u8) -> Rgb {
    Rgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, None)
}

/// Parse `#rrggbb` (leading `#` optional)
pub fn parse_hex_color(spec: &str) -> Result<Rgb, ConfigError> {
    let hex = spec.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(spec.to_string()));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ConfigError::InvalidColor(spec.to_string()))
    };
    Ok(rgb8(channel(0)?, channel(2)?, channel(4)?))
}

/// Format a color as `#RRGGBB`
pub fn to_hex_string(color: &Rgb) -> String {
    let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", byte(color.r), byte(color.g), byte(color.b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let color = parse_hex_color("#0366d6").unwrap();
        assert_eq!(to_hex_string(&color), "#0366D6");
        assert!(parse_hex_color("0366D6").is_ok());
        assert!(parse_hex_color("#03d6").is_err());
        assert!(parse_hex_color("#zz66d6").is_err());
    }

    #[test]
    fn test_scheme_colors_differ() {
        let light = Appearance::default();
        let dark = Appearance {
            scheme: ColorScheme::Dark,
            ..Appearance::default()
        };
        assert_eq!(to_hex_string(&light.text_color()), "#24292E");
        assert_eq!(to_hex_string(&dark.text_color()), "#C9D1D9");
        assert_eq!(to_hex_string(&dark.background_color()), "#0D1117");
    }
}
