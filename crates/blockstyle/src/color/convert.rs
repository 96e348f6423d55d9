//! Conversions between hex, RGB and HSL.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// An sRGB color as 8-bit channels.
pub type Rgb = [u8; 3];

/// A color in HSL space: hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Returns the same color with lightness replaced.
    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }

    /// Returns the color rotated around the hue wheel.
    pub fn rotate_hue(self, degrees: f64) -> Self {
        Self {
            h: (self.h + degrees).rem_euclid(360.0),
            ..self
        }
    }
}

/// Error returned by [`rgb_to_hex`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color channel {value} is outside 0..=255")]
    ChannelOutOfRange { value: i64 },
}

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*rgb\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*\)\s*$")
        .expect("rgb() pattern is valid")
});

/// Parses a 3- or 6-digit hex color, with or without the leading `#`.
///
/// Returns `None` when the input is not hex; callers treat that as "no
/// color".
///
/// ```rust
/// use blockstyle::color::hex_to_rgb;
///
/// assert_eq!(hex_to_rgb("#36f"), Some([0x33, 0x66, 0xff]));
/// assert_eq!(hex_to_rgb("3366FF"), Some([0x33, 0x66, 0xff]));
/// assert_eq!(hex_to_rgb("#3366f"), None);
/// ```
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => Some([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17]),
        6 => Some([byte(0)?, byte(2)?, byte(4)?]),
        _ => None,
    }
}

/// Parses either a hex color or an `rgb(r, g, b)` expression.
pub fn parse_color(value: &str) -> Option<Rgb> {
    if let Some(rgb) = hex_to_rgb(value) {
        return Some(rgb);
    }

    let caps = RGB_FUNCTION.captures(value)?;
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    Some([channel(1)?, channel(2)?, channel(3)?])
}

/// Converts RGB to HSL, rounding hue to whole degrees and saturation and
/// lightness to whole percentages.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let exact = rgb_to_hsl_exact(rgb);
    Hsl {
        h: exact.h.round().rem_euclid(360.0),
        s: exact.s.round(),
        l: exact.l.round(),
    }
}

/// Converts RGB to HSL without rounding.
pub fn rgb_to_hsl_exact([r, g, b]: Rgb) -> Hsl {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l * 100.0);
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl::new(h * 60.0, s * 100.0, l * 100.0)
}

/// Converts HSL back to RGB.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h.rem_euclid(360.0) / 360.0;
    let s = (hsl.s / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        let v = to_channel(l);
        return [v, v, v];
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    [
        to_channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_channel(hue_to_rgb(p, q, h)),
        to_channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    ]
}

fn hue_to_rgb(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Formats channels as `#rrggbb`, failing if any channel is outside 0..=255.
pub fn rgb_to_hex(channels: [i64; 3]) -> Result<String, ColorError> {
    let mut rgb = [0u8; 3];
    for (slot, value) in rgb.iter_mut().zip(channels) {
        *slot = u8::try_from(value).map_err(|_| ColorError::ChannelOutOfRange { value })?;
    }
    Ok(hex_string(rgb))
}

/// Formats an in-range color as `#rrggbb`.
pub fn hex_string([r, g, b]: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn widen(rgb: Rgb) -> [i64; 3] {
        rgb.map(i64::from)
    }

    #[test]
    fn test_hex_to_rgb_forms() {
        assert_eq!(hex_to_rgb("#fff"), Some([255, 255, 255]));
        assert_eq!(hex_to_rgb("000000"), Some([0, 0, 0]));
        assert_eq!(hex_to_rgb("#3366ff"), Some([0x33, 0x66, 0xff]));
        assert_eq!(hex_to_rgb("#ggg"), None);
        assert_eq!(hex_to_rgb("#12345678"), None);
        assert_eq!(hex_to_rgb(""), None);
    }

    #[test]
    fn test_parse_color_rgb_function() {
        assert_eq!(parse_color("rgb(51, 102, 255)"), Some([51, 102, 255]));
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color("hsl(0, 0%, 0%)"), None);
    }

    #[test]
    fn test_rgb_to_hsl_known_values() {
        assert_eq!(rgb_to_hsl([255, 0, 0]), Hsl::new(0.0, 100.0, 50.0));
        assert_eq!(rgb_to_hsl([0, 255, 0]), Hsl::new(120.0, 100.0, 50.0));
        assert_eq!(rgb_to_hsl([0x33, 0x66, 0xff]), Hsl::new(225.0, 100.0, 60.0));
    }

    #[test]
    fn test_rgb_to_hsl_achromatic() {
        let hsl = rgb_to_hsl([128, 128, 128]);
        assert_eq!(hsl.h, 0.0);
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.l, 50.0);
    }

    #[test]
    fn test_hsl_to_rgb_known_values() {
        assert_eq!(hsl_to_rgb(Hsl::new(0.0, 100.0, 50.0)), [255, 0, 0]);
        assert_eq!(hsl_to_rgb(Hsl::new(240.0, 100.0, 50.0)), [0, 0, 255]);
        assert_eq!(hsl_to_rgb(Hsl::new(0.0, 0.0, 100.0)), [255, 255, 255]);
    }

    #[test]
    fn test_hue_wraps() {
        assert_eq!(
            hsl_to_rgb(Hsl::new(360.0, 100.0, 50.0)),
            hsl_to_rgb(Hsl::new(0.0, 100.0, 50.0))
        );
        assert_eq!(Hsl::new(270.0, 0.0, 0.0).rotate_hue(180.0).h, 90.0);
    }

    #[test]
    fn test_rgb_to_hex_rejects_out_of_range() {
        assert_eq!(rgb_to_hex([255, 0, 16]).unwrap(), "#ff0010");
        assert_eq!(
            rgb_to_hex([256, 0, 0]),
            Err(ColorError::ChannelOutOfRange { value: 256 })
        );
        assert!(rgb_to_hex([0, -1, 0]).is_err());
    }

    proptest! {
        #[test]
        fn prop_hex_round_trip(hex in "[0-9a-fA-F]{6}") {
            let rgb = hex_to_rgb(&hex).unwrap();
            let back = rgb_to_hex(widen(rgb)).unwrap();
            prop_assert_eq!(back, format!("#{}", hex.to_lowercase()));
        }

        #[test]
        fn prop_hsl_round_trip_within_one(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let back = hsl_to_rgb(rgb_to_hsl_exact([r, g, b]));
            for (a, b) in back.iter().zip([r, g, b]) {
                prop_assert!((i16::from(*a) - i16::from(b)).abs() <= 1);
            }
        }
    }
}
