//! Shade and tint ramps derived from a single brand color.

use super::convert::{hex_string, hsl_to_rgb, parse_color, rgb_to_hsl_exact, Rgb};

/// Number of interpolation steps toward white or black.
const RAMP_STEPS: f64 = 4.0;
/// Lightness of the palest tint, in percent.
const NEAR_WHITE_LIGHTNESS: f64 = 98.0;
/// Lightness of the deepest shade, in percent.
const NEAR_BLACK_LIGHTNESS: f64 = 2.0;

/// Position of a color inside a [`ShadeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShadeLabel {
    Main,
    Light,
    Lighter,
    Lightest,
    NearWhite,
    Dark,
    Darker,
    Darkest,
    NearBlack,
    Complement,
    Inverted,
}

impl ShadeLabel {
    /// Every label, in the order a ramp is generated.
    pub const ALL: [ShadeLabel; 11] = [
        ShadeLabel::Main,
        ShadeLabel::Light,
        ShadeLabel::Lighter,
        ShadeLabel::Lightest,
        ShadeLabel::NearWhite,
        ShadeLabel::Dark,
        ShadeLabel::Darker,
        ShadeLabel::Darkest,
        ShadeLabel::NearBlack,
        ShadeLabel::Complement,
        ShadeLabel::Inverted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShadeLabel::Main => "main",
            ShadeLabel::Light => "light",
            ShadeLabel::Lighter => "lighter",
            ShadeLabel::Lightest => "lightest",
            ShadeLabel::NearWhite => "near-white",
            ShadeLabel::Dark => "dark",
            ShadeLabel::Darker => "darker",
            ShadeLabel::Darkest => "darkest",
            ShadeLabel::NearBlack => "near-black",
            ShadeLabel::Complement => "complement",
            ShadeLabel::Inverted => "inverted",
        }
    }
}

/// One derived color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shade {
    pub label: ShadeLabel,
    /// Lower-case `#rrggbb`.
    pub hex: String,
}

/// The eleven colors derived from one input color.
///
/// Empty when the input did not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadeSet {
    shades: Vec<Shade>,
}

impl ShadeSet {
    pub fn is_empty(&self) -> bool {
        self.shades.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shades.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shade> {
        self.shades.iter()
    }

    pub fn get(&self, label: ShadeLabel) -> Option<&Shade> {
        self.shades.iter().find(|shade| shade.label == label)
    }
}

impl<'a> IntoIterator for &'a ShadeSet {
    type Item = &'a Shade;
    type IntoIter = std::slice::Iter<'a, Shade>;

    fn into_iter(self) -> Self::IntoIter {
        self.shades.iter()
    }
}

/// Generates the shade ramp for a hex or `rgb(r, g, b)` color.
///
/// The ramp holds the color itself, four tints moving toward white (the last
/// pinned at 98% lightness), four shades moving toward black (the last pinned
/// at 2%), the hue complement and the channel inversion.
///
/// ```rust
/// use blockstyle::color::{generate_shades, ShadeLabel};
///
/// let shades = generate_shades("#3366ff");
/// assert_eq!(shades.len(), 11);
/// assert_eq!(shades.get(ShadeLabel::Main).unwrap().hex, "#3366ff");
/// assert!(generate_shades("var(--brand)").is_empty());
/// ```
pub fn generate_shades(color: &str) -> ShadeSet {
    let Some(rgb) = parse_color(color) else {
        return ShadeSet::default();
    };

    let hsl = rgb_to_hsl_exact(rgb);
    let mut shades = Vec::with_capacity(ShadeLabel::ALL.len());
    let mut push = |label: ShadeLabel, rgb: Rgb| {
        shades.push(Shade {
            label,
            hex: hex_string(rgb),
        })
    };

    push(ShadeLabel::Main, rgb);

    let tints = [ShadeLabel::Light, ShadeLabel::Lighter, ShadeLabel::Lightest];
    for (step, label) in (1..).zip(tints) {
        let l = hsl.l + (100.0 - hsl.l) * f64::from(step) / RAMP_STEPS;
        push(label, hsl_to_rgb(hsl.with_lightness(l)));
    }
    push(
        ShadeLabel::NearWhite,
        hsl_to_rgb(hsl.with_lightness(NEAR_WHITE_LIGHTNESS)),
    );

    let darks = [ShadeLabel::Dark, ShadeLabel::Darker, ShadeLabel::Darkest];
    for (step, label) in (1..).zip(darks) {
        let l = hsl.l - hsl.l * f64::from(step) / RAMP_STEPS;
        push(label, hsl_to_rgb(hsl.with_lightness(l)));
    }
    push(
        ShadeLabel::NearBlack,
        hsl_to_rgb(hsl.with_lightness(NEAR_BLACK_LIGHTNESS)),
    );

    push(ShadeLabel::Complement, hsl_to_rgb(hsl.rotate_hue(180.0)));
    push(ShadeLabel::Inverted, rgb.map(|c| 255 - c));

    ShadeSet { shades }
}
