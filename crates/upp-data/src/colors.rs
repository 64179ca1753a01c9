//! Named colors, color maps, and color-list resolution.

use serde::Deserialize;

use crate::error::{Result, UppError};

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)) as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)) as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)) as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)) as u8,
    )
}

const WHITE: Color = Color::opaque(255, 255, 255);

/// Colors addressable by name from a `colors` list in the specs file.
const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::opaque(0, 0, 0)),
    ("blue", Color::opaque(0, 0, 255)),
    ("brown", Color::opaque(139, 69, 19)),
    ("cyan", Color::opaque(0, 255, 255)),
    ("darkblue", Color::opaque(0, 0, 139)),
    ("darkgreen", Color::opaque(0, 100, 0)),
    ("darkred", Color::opaque(139, 0, 0)),
    ("gold", Color::opaque(255, 215, 0)),
    ("gray", Color::opaque(128, 128, 128)),
    ("green", Color::opaque(0, 128, 0)),
    ("greenyellow", Color::opaque(173, 255, 47)),
    ("indigo", Color::opaque(75, 0, 130)),
    ("lightgray", Color::opaque(211, 211, 211)),
    ("lime", Color::opaque(0, 255, 0)),
    ("magenta", Color::opaque(255, 0, 255)),
    ("navy", Color::opaque(0, 0, 128)),
    ("orange", Color::opaque(255, 165, 0)),
    ("pink", Color::opaque(255, 192, 203)),
    ("purple", Color::opaque(128, 0, 128)),
    ("red", Color::opaque(255, 0, 0)),
    ("tan", Color::opaque(210, 180, 140)),
    ("white", WHITE),
    ("yellow", Color::opaque(255, 255, 0)),
];

// Colormap gradient stops, interpolated linearly when sampled.
const JET: &[Color] = &[
    Color::opaque(0, 0, 131),
    Color::opaque(0, 60, 170),
    Color::opaque(5, 255, 255),
    Color::opaque(255, 255, 0),
    Color::opaque(250, 0, 0),
    Color::opaque(128, 0, 0),
];

const GREYS: &[Color] = &[Color::opaque(250, 250, 250), Color::opaque(20, 20, 20)];

const COOLWARM: &[Color] = &[
    Color::opaque(59, 76, 192),
    Color::opaque(144, 178, 254),
    Color::opaque(220, 220, 220),
    Color::opaque(245, 156, 125),
    Color::opaque(180, 4, 38),
];

const NCAR: &[Color] = &[
    Color::opaque(0, 0, 110),
    Color::opaque(0, 150, 255),
    Color::opaque(0, 255, 140),
    Color::opaque(255, 255, 0),
    Color::opaque(255, 100, 0),
    Color::opaque(255, 0, 255),
];

const COLORMAPS: &[(&str, &[Color])] = &[
    ("coolwarm", COOLWARM),
    ("greys", GREYS),
    ("jet", JET),
    ("ncar", NCAR),
];

/// Per-field palette functions: each samples the color map its field is
/// conventionally drawn with. Entries addressable as `colors` values.
const COLOR_FUNCTIONS: &[(&str, &str)] = &[
    ("cape_colors", "ncar"),
    ("cloud_colors", "greys"),
    ("hgt_colors", "jet"),
    ("pcp_colors", "ncar"),
    ("ps_colors", "coolwarm"),
    ("radar_colors", "ncar"),
    ("rh_colors", "jet"),
    ("t_colors", "jet"),
    ("terrain_colors", "greys"),
    ("vort_colors", "coolwarm"),
    ("wind_colors", "ncar"),
];

pub fn is_colormap(name: &str) -> bool {
    COLORMAPS.iter().any(|(n, _)| *n == name)
}

pub fn is_named_color(name: &str) -> bool {
    NAMED_COLORS.iter().any(|(n, _)| *n == name)
}

pub fn is_color_function(name: &str) -> bool {
    name == "centered_diff" || COLOR_FUNCTIONS.iter().any(|(n, _)| *n == name)
}

/// Look up a color by name.
pub fn named_color(name: &str) -> Result<Color> {
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
        .ok_or_else(|| UppError::UnknownColor(name.to_string()))
}

/// Sample `n` evenly spaced colors from a named color map.
pub fn sample_colormap(name: &str, n: usize) -> Result<Vec<Color>> {
    let stops = COLORMAPS
        .iter()
        .find(|(map, _)| *map == name)
        .map(|(_, stops)| *stops)
        .ok_or_else(|| UppError::UnknownColormap(name.to_string()))?;
    Ok(sample_stops(stops, n))
}

fn sample_stops(stops: &[Color], n: usize) -> Vec<Color> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![stops[0]];
    }

    (0..n)
        .map(|i| {
            let pos = i as f32 / (n - 1) as f32 * (stops.len() - 1) as f32;
            let lo = pos.floor() as usize;
            let hi = (lo + 1).min(stops.len() - 1);
            interpolate_color(stops[lo], stops[hi], pos - lo as f32)
        })
        .collect()
}

/// A `colors` entry as written in the specs file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Literal list of named colors, one per contour band.
    List(Vec<String>),
    /// Named color function evaluated against the entry's clevs and cmap.
    Function(String),
}

impl ColorSpec {
    /// Resolve into concrete colors, one per contour level.
    pub fn resolve(&self, clevs: &[f64], cmap: &str) -> Result<Vec<Color>> {
        match self {
            ColorSpec::List(names) => names.iter().map(|n| named_color(n)).collect(),
            ColorSpec::Function(name) => match name.as_str() {
                "centered_diff" => centered_diff(clevs, cmap),
                other => field_palette(other, clevs.len()),
            },
        }
    }
}

/// Resolve a per-field palette function, one color per contour level.
fn field_palette(name: &str, n: usize) -> Result<Vec<Color>> {
    let cmap = COLOR_FUNCTIONS
        .iter()
        .find(|(func, _)| *func == name)
        .map(|(_, cmap)| *cmap)
        .ok_or_else(|| UppError::UnknownColor(name.to_string()))?;
    sample_colormap(cmap, n)
}

/// Colors for a centered-difference plot: the color map sampled across the
/// levels with the band around zero blanked to white.
fn centered_diff(clevs: &[f64], cmap: &str) -> Result<Vec<Color>> {
    let mut colors = sample_colormap(cmap, clevs.len())?;
    let mid = colors.len() / 2;
    if !colors.is_empty() {
        colors[mid] = WHITE;
        if colors.len() % 2 == 0 && mid > 0 {
            colors[mid - 1] = WHITE;
        }
    }
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_color_lookup() {
        assert_eq!(named_color("red").unwrap(), Color::opaque(255, 0, 0));
        assert!(named_color("mauve-ish").is_err());
    }

    #[test]
    fn test_css_green_family() {
        // Names follow the CSS/matplotlib palette the specs vocabulary
        // comes from: lime is pure green, green is the darker one.
        assert_eq!(named_color("lime").unwrap(), Color::opaque(0, 255, 0));
        assert_eq!(named_color("green").unwrap(), Color::opaque(0, 128, 0));
        assert_eq!(
            named_color("greenyellow").unwrap(),
            Color::opaque(173, 255, 47)
        );
    }

    #[test]
    fn test_field_palette_functions_resolve() {
        let clevs: Vec<f64> = (0..8).map(f64::from).collect();
        for (name, _) in COLOR_FUNCTIONS {
            assert!(is_color_function(name), "{name} not recognized");
            let spec = ColorSpec::Function(name.to_string());
            let colors = spec.resolve(&clevs, "jet").unwrap();
            assert_eq!(colors.len(), clevs.len(), "{name} color count");
        }
    }

    #[test]
    fn test_sample_count_matches_request() {
        for n in [1, 2, 5, 12, 256] {
            assert_eq!(sample_colormap("jet", n).unwrap().len(), n);
        }
    }

    #[test]
    fn test_sample_endpoints_are_stops() {
        let colors = sample_colormap("jet", 7).unwrap();
        assert_eq!(colors[0], JET[0]);
        assert_eq!(colors[6], JET[JET.len() - 1]);
    }

    #[test]
    fn test_unknown_colormap() {
        assert!(matches!(
            sample_colormap("plasma", 5),
            Err(UppError::UnknownColormap(_))
        ));
    }

    #[test]
    fn test_color_list_resolution() {
        let spec = ColorSpec::List(vec!["red".into(), "white".into(), "blue".into()]);
        let colors = spec.resolve(&[], "jet").unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[1], WHITE);
    }

    #[test]
    fn test_centered_diff_blanks_the_middle() {
        let clevs: Vec<f64> = (-4..=4).map(f64::from).collect();
        let spec = ColorSpec::Function("centered_diff".to_string());
        let colors = spec.resolve(&clevs, "coolwarm").unwrap();
        assert_eq!(colors.len(), 9);
        assert_eq!(colors[4], WHITE);
        assert_ne!(colors[0], WHITE);
        assert_ne!(colors[8], WHITE);
    }
}
