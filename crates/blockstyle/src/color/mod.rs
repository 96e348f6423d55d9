//! Color math for design tokens.
//!
//! - [`hex_to_rgb`], [`rgb_to_hsl`], [`hsl_to_rgb`], [`rgb_to_hex`]: conversions
//! - [`generate_shades`]: the eleven-color [`ShadeSet`] derived from a token
//! - [`translucent_colors`], [`sanitize_hex_alpha`]: alpha variants
//!
//! Invalid input never panics or errors (except [`rgb_to_hex`], whose input
//! can be out of range): the functions return an empty result and callers
//! simply generate no shades.

mod alpha;
mod convert;
mod shades;

pub use alpha::{sanitize_hex_alpha, translucent_colors, ALPHA_SUFFIXES};
pub use convert::{
    hex_string, hex_to_rgb, hsl_to_rgb, parse_color, rgb_to_hex, rgb_to_hsl, rgb_to_hsl_exact,
    ColorError, Hsl, Rgb,
};
pub use shades::{generate_shades, Shade, ShadeLabel, ShadeSet};
