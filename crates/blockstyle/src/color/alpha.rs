//! Translucent variants and 8-digit hex handling.

use std::collections::BTreeMap;

/// Alpha suffix for each opacity step, in percent.
pub const ALPHA_SUFFIXES: [(u8, &str); 9] = [
    (10, "1a"),
    (20, "33"),
    (30, "4d"),
    (40, "66"),
    (50, "80"),
    (60, "99"),
    (70, "b3"),
    (80, "cc"),
    (90, "e6"),
];

fn six_digits(value: &str) -> Option<String> {
    let digits = value.trim().strip_prefix('#').unwrap_or(value.trim());
    (digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()))
        .then(|| digits.to_ascii_lowercase())
}

/// Returns `#rrggbbaa` variants of a 6-digit hex color keyed by opacity.
///
/// Returns an empty map when the input is not a 6-digit hex color.
///
/// ```rust
/// use blockstyle::color::translucent_colors;
///
/// let variants = translucent_colors("#112233");
/// assert_eq!(variants[&50], "#11223380");
/// assert!(translucent_colors("#123").is_empty());
/// ```
pub fn translucent_colors(hex: &str) -> BTreeMap<u8, String> {
    let Some(digits) = six_digits(hex) else {
        return BTreeMap::new();
    };

    ALPHA_SUFFIXES
        .iter()
        .map(|(percent, suffix)| (*percent, format!("#{}{}", digits, suffix)))
        .collect()
}

/// Normalizes a 6- or 8-digit hex color to lower-case `#rrggbbaa`.
///
/// A missing alpha channel becomes `ff`. Anything else yields an empty string.
pub fn sanitize_hex_alpha(value: &str) -> String {
    let digits = value.trim().strip_prefix('#').unwrap_or(value.trim());
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return String::new();
    }

    match digits.len() {
        6 => format!("#{}ff", digits.to_ascii_lowercase()),
        8 => format!("#{}", digits.to_ascii_lowercase()),
        _ => String::new(),
    }
}
