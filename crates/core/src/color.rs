//! CSS color type used by the scene theme.
//!
//! [`Rgba`] stores components in [0, 1] and round-trips through the two CSS
//! notations the scene emits: `#rrggbb` for opaque colors and
//! `rgba(r,g,b,a)` for translucent ones.

use crate::error::WoodgrainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// sRGB color with alpha, all components in [0, 1].
///
/// Serializes as its CSS string. The round-trip has 8-bit quantization on
/// the color channels, which is inherent to the CSS notations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Builds a color from 8-bit channels and an alpha in [0, 1].
    pub fn from_u8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Parses `#rrggbb`, `#rrggbbaa`, or `rgba(r, g, b, a)` (case insensitive).
    ///
    /// Returns `WoodgrainError::InvalidColor` for anything else.
    pub fn parse(s: &str) -> Result<Rgba, WoodgrainError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex(hex);
        }
        let lower = s.to_ascii_lowercase();
        if let Some(inner) = lower
            .strip_prefix("rgba(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::from_rgba_args(inner);
        }
        Err(WoodgrainError::InvalidColor(format!("unrecognized color '{s}'")))
    }

    fn from_hex(hex: &str) -> Result<Rgba, WoodgrainError> {
        if hex.len() != 6 && hex.len() != 8 {
            return Err(WoodgrainError::InvalidColor(format!(
                "expected 6 or 8 hex digits, got {}",
                hex.len()
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            hex.get(range)
                .ok_or_else(|| WoodgrainError::InvalidColor(format!("invalid {name} component")))
                .and_then(|digits| {
                    u8::from_str_radix(digits, 16).map_err(|e| {
                        WoodgrainError::InvalidColor(format!("invalid {name} component: {e}"))
                    })
                })
        };
        let r = channel(0..2, "red")?;
        let g = channel(2..4, "green")?;
        let b = channel(4..6, "blue")?;
        let a = if hex.len() == 8 {
            channel(6..8, "alpha")? as f64 / 255.0
        } else {
            1.0
        };
        Ok(Rgba::from_u8(r, g, b, a))
    }

    fn from_rgba_args(inner: &str) -> Result<Rgba, WoodgrainError> {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(WoodgrainError::InvalidColor(format!(
                "rgba() takes 4 arguments, got {}",
                parts.len()
            )));
        }
        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts[..3]) {
            *slot = part
                .parse::<u8>()
                .map_err(|e| WoodgrainError::InvalidColor(format!("invalid channel '{part}': {e}")))?;
        }
        let a = parts[3]
            .parse::<f64>()
            .map_err(|e| WoodgrainError::InvalidColor(format!("invalid alpha '{}': {e}", parts[3])))?;
        if !(0.0..=1.0).contains(&a) {
            return Err(WoodgrainError::InvalidColor(format!(
                "alpha {a} outside [0, 1]"
            )));
        }
        Ok(Rgba::from_u8(channels[0], channels[1], channels[2], a))
    }

    fn channel_u8(c: f64) -> u8 {
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    }

    /// Renders the color as CSS: `#rrggbb` when opaque, `rgba(...)` otherwise.
    pub fn to_css(self) -> String {
        let r = Self::channel_u8(self.r);
        let g = Self::channel_u8(self.g);
        let b = Self::channel_u8(self.b);
        if self.a >= 1.0 {
            format!("#{r:02x}{g:02x}{b:02x}")
        } else {
            format!("rgba({r},{g},{b},{})", self.a.clamp(0.0, 1.0))
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_opaque_hex() {
        let c = Rgba::parse("#2a1c15").unwrap();
        assert_eq!(c, Rgba::from_u8(0x2a, 0x1c, 0x15, 1.0));
        assert_eq!(c.to_css(), "#2a1c15");
    }

    #[test]
    fn parses_hex_case_insensitive() {
        let c = Rgba::parse("#FFAA00").unwrap();
        assert_eq!(c.to_css(), "#ffaa00");
    }

    #[test]
    fn parses_hex_with_alpha() {
        let c = Rgba::parse("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn parses_rgba_function() {
        let c = Rgba::parse("rgba(255, 210, 160, 0.05)").unwrap();
        assert_eq!(c, Rgba::from_u8(255, 210, 160, 0.05));
        assert_eq!(c.to_css(), "rgba(255,210,160,0.05)");
    }

    #[test]
    fn rgba_with_full_alpha_renders_as_hex() {
        let c = Rgba::parse("rgba(0,0,0,1)").unwrap();
        assert_eq!(c.to_css(), "#000000");
    }

    #[test]
    fn rejects_short_hex() {
        assert!(matches!(
            Rgba::parse("#fff"),
            Err(WoodgrainError::InvalidColor(_))
        ));
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(Rgba::parse("#gg0000").is_err());
    }

    #[test]
    fn rejects_rgba_with_wrong_arity() {
        assert!(Rgba::parse("rgba(1,2,3)").is_err());
    }

    #[test]
    fn rejects_alpha_out_of_range() {
        assert!(Rgba::parse("rgba(1,2,3,1.5)").is_err());
    }

    #[test]
    fn rejects_named_colors() {
        assert!(Rgba::parse("walnut").is_err());
    }

    #[test]
    fn serde_uses_css_string() {
        let c = Rgba::from_u8(0, 0, 0, 0.35);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"rgba(0,0,0,0.35)\"");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn serde_rejects_bad_string() {
        let result: Result<Rgba, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
