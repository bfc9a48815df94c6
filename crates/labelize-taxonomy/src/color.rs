//! Label colors
//!
//! Labels carry `#rgb` / `#rrggbb` hex colors. Markup written by browsers
//! often spells them as `rgb(...)` or by name; [`css_color_to_hex`] maps those
//! back. [`Palette`] hands out colors for labels created without one
//! (sublabels, inferred labels).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Colors offered when no palette is configured
pub const DEFAULT_PALETTE: [&str; 7] = [
    "#6aa3ff", "#20c997", "#ffc107", "#dc3545", "#6f42c1", "#fd7e14", "#e83e8c",
];

/// Check for `#rgb` or `#rrggbb`
#[must_use]
pub fn is_hex_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Normalize a CSS color to hex
///
/// Hex colors are returned as written. `rgb()` / `rgba()` (comma or space
/// separated, integer or percent channels) and named colors become
/// `#rrggbb`; alpha is dropped. Anything else, including `transparent`,
/// yields `None`.
#[must_use]
pub fn css_color_to_hex(color: &str) -> Option<String> {
    let color = color.trim();
    if is_hex_color(color) {
        return Some(color.to_string());
    }
    let lower = color.to_ascii_lowercase();
    let functional = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'));
    if let Some(args) = functional {
        return rgb_to_hex(args);
    }
    NAMED_COLORS
        .binary_search_by(|(name, _)| (*name).cmp(lower.as_str()))
        .ok()
        .map(|index| NAMED_COLORS[index].1.to_string())
}

/// True if both colors normalize to the same `#rrggbb`
#[must_use]
pub fn same_color(a: &str, b: &str) -> bool {
    match (css_color_to_hex(a), css_color_to_hex(b)) {
        (Some(a), Some(b)) => expand_hex(&a) == expand_hex(&b),
        _ => false,
    }
}

fn expand_hex(hex: &str) -> String {
    let digits = hex.trim_start_matches('#').to_ascii_lowercase();
    if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits
    }
}

fn rgb_to_hex(args: &str) -> Option<String> {
    let channels = args.split_once('/').map_or(args, |(channels, _alpha)| channels);
    let parts: Vec<&str> = channels
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }
    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    Some(format!("#{r:02x}{g:02x}{b:02x}"))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(raw: &str) -> Option<u8> {
    let (value, max) = match raw.strip_suffix('%') {
        Some(percent) => (percent.parse::<f64>().ok()?, 100.0),
        None => (raw.parse::<f64>().ok()?, 255.0),
    };
    if !(0.0..=max).contains(&value) {
        return None;
    }
    Some((value * 255.0 / max).round() as u8)
}

/// CSS named colors, sorted by name
const NAMED_COLORS: [(&str, &str); 148] = [
    ("aliceblue", "#f0f8ff"), ("antiquewhite", "#faebd7"), ("aqua", "#00ffff"),
    ("aquamarine", "#7fffd4"), ("azure", "#f0ffff"), ("beige", "#f5f5dc"), ("bisque", "#ffe4c4"),
    ("black", "#000000"), ("blanchedalmond", "#ffebcd"), ("blue", "#0000ff"),
    ("blueviolet", "#8a2be2"), ("brown", "#a52a2a"), ("burlywood", "#deb887"),
    ("cadetblue", "#5f9ea0"), ("chartreuse", "#7fff00"), ("chocolate", "#d2691e"),
    ("coral", "#ff7f50"), ("cornflowerblue", "#6495ed"), ("cornsilk", "#fff8dc"),
    ("crimson", "#dc143c"), ("cyan", "#00ffff"), ("darkblue", "#00008b"), ("darkcyan", "#008b8b"),
    ("darkgoldenrod", "#b8860b"), ("darkgray", "#a9a9a9"), ("darkgreen", "#006400"),
    ("darkgrey", "#a9a9a9"), ("darkkhaki", "#bdb76b"), ("darkmagenta", "#8b008b"),
    ("darkolivegreen", "#556b2f"), ("darkorange", "#ff8c00"), ("darkorchid", "#9932cc"),
    ("darkred", "#8b0000"), ("darksalmon", "#e9967a"), ("darkseagreen", "#8fbc8f"),
    ("darkslateblue", "#483d8b"), ("darkslategray", "#2f4f4f"), ("darkslategrey", "#2f4f4f"),
    ("darkturquoise", "#00ced1"), ("darkviolet", "#9400d3"), ("deeppink", "#ff1493"),
    ("deepskyblue", "#00bfff"), ("dimgray", "#696969"), ("dimgrey", "#696969"),
    ("dodgerblue", "#1e90ff"), ("firebrick", "#b22222"), ("floralwhite", "#fffaf0"),
    ("forestgreen", "#228b22"), ("fuchsia", "#ff00ff"), ("gainsboro", "#dcdcdc"),
    ("ghostwhite", "#f8f8ff"), ("gold", "#ffd700"), ("goldenrod", "#daa520"), ("gray", "#808080"),
    ("green", "#008000"), ("greenyellow", "#adff2f"), ("grey", "#808080"), ("honeydew", "#f0fff0"),
    ("hotpink", "#ff69b4"), ("indianred", "#cd5c5c"), ("indigo", "#4b0082"), ("ivory", "#fffff0"),
    ("khaki", "#f0e68c"), ("lavender", "#e6e6fa"), ("lavenderblush", "#fff0f5"),
    ("lawngreen", "#7cfc00"), ("lemonchiffon", "#fffacd"), ("lightblue", "#add8e6"),
    ("lightcoral", "#f08080"), ("lightcyan", "#e0ffff"), ("lightgoldenrodyellow", "#fafad2"),
    ("lightgray", "#d3d3d3"), ("lightgreen", "#90ee90"), ("lightgrey", "#d3d3d3"),
    ("lightpink", "#ffb6c1"), ("lightsalmon", "#ffa07a"), ("lightseagreen", "#20b2aa"),
    ("lightskyblue", "#87cefa"), ("lightslategray", "#778899"), ("lightslategrey", "#778899"),
    ("lightsteelblue", "#b0c4de"), ("lightyellow", "#ffffe0"), ("lime", "#00ff00"),
    ("limegreen", "#32cd32"), ("linen", "#faf0e6"), ("magenta", "#ff00ff"), ("maroon", "#800000"),
    ("mediumaquamarine", "#66cdaa"), ("mediumblue", "#0000cd"), ("mediumorchid", "#ba55d3"),
    ("mediumpurple", "#9370db"), ("mediumseagreen", "#3cb371"), ("mediumslateblue", "#7b68ee"),
    ("mediumspringgreen", "#00fa9a"), ("mediumturquoise", "#48d1cc"),
    ("mediumvioletred", "#c71585"), ("midnightblue", "#191970"), ("mintcream", "#f5fffa"),
    ("mistyrose", "#ffe4e1"), ("moccasin", "#ffe4b5"), ("navajowhite", "#ffdead"),
    ("navy", "#000080"), ("oldlace", "#fdf5e6"), ("olive", "#808000"), ("olivedrab", "#6b8e23"),
    ("orange", "#ffa500"), ("orangered", "#ff4500"), ("orchid", "#da70d6"),
    ("palegoldenrod", "#eee8aa"), ("palegreen", "#98fb98"), ("paleturquoise", "#afeeee"),
    ("palevioletred", "#db7093"), ("papayawhip", "#ffefd5"), ("peachpuff", "#ffdab9"),
    ("peru", "#cd853f"), ("pink", "#ffc0cb"), ("plum", "#dda0dd"), ("powderblue", "#b0e0e6"),
    ("purple", "#800080"), ("rebeccapurple", "#663399"), ("red", "#ff0000"),
    ("rosybrown", "#bc8f8f"), ("royalblue", "#4169e1"), ("saddlebrown", "#8b4513"),
    ("salmon", "#fa8072"), ("sandybrown", "#f4a460"), ("seagreen", "#2e8b57"),
    ("seashell", "#fff5ee"), ("sienna", "#a0522d"), ("silver", "#c0c0c0"), ("skyblue", "#87ceeb"),
    ("slateblue", "#6a5acd"), ("slategray", "#708090"), ("slategrey", "#708090"),
    ("snow", "#fffafa"), ("springgreen", "#00ff7f"), ("steelblue", "#4682b4"), ("tan", "#d2b48c"),
    ("teal", "#008080"), ("thistle", "#d8bfd8"), ("tomato", "#ff6347"), ("turquoise", "#40e0d0"),
    ("violet", "#ee82ee"), ("wheat", "#f5deb3"), ("white", "#ffffff"), ("whitesmoke", "#f5f5f5"),
    ("yellow", "#ffff00"), ("yellowgreen", "#9acd32"),
];

/// Random color source
///
/// Seeded palettes are deterministic, which keeps inferred taxonomies stable
/// across runs.
#[derive(Debug, Clone)]
pub struct Palette {
    colors: Vec<String>,
    rng: StdRng,
}

impl Palette {
    /// Create palette from colors; invalid entries are skipped and an empty
    /// list falls back to [`DEFAULT_PALETTE`]
    #[must_use]
    pub fn new(colors: &[String], seed: Option<u64>) -> Self {
        let mut colors: Vec<String> = colors.iter().filter(|c| is_hex_color(c)).cloned().collect();
        if colors.is_empty() {
            colors = DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect();
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { colors, rng }
    }

    /// Deterministic palette over the default colors
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(&[], Some(seed))
    }

    /// Pick the next color
    pub fn next_color(&mut self) -> String {
        let index = self.rng.random_range(0..self.colors.len());
        self.colors[index].clone()
    }

    /// Colors this palette draws from
    #[inline]
    #[must_use]
    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(&[], None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#6aa3ff"));
        assert!(is_hex_color("#FFF"));
        assert!(!is_hex_color("6aa3ff"));
        assert!(!is_hex_color("#6aa3f"));
        assert!(!is_hex_color("#gggggg"));
        assert!(!is_hex_color("rgb(1, 2, 3)"));
    }

    #[test]
    fn css_colors_normalize_to_hex() {
        assert_eq!(css_color_to_hex("#6aa3ff").as_deref(), Some("#6aa3ff"));
        assert_eq!(css_color_to_hex("rgb(106, 163, 255)").as_deref(), Some("#6aa3ff"));
        assert_eq!(css_color_to_hex(" RGBA(106,163,255,0.5) ").as_deref(), Some("#6aa3ff"));
        assert_eq!(css_color_to_hex("rgb(106 163 255 / 50%)").as_deref(), Some("#6aa3ff"));
        assert_eq!(css_color_to_hex("rgb(100%, 0%, 0%)").as_deref(), Some("#ff0000"));
        assert_eq!(css_color_to_hex("CornflowerBlue").as_deref(), Some("#6495ed"));
        assert_eq!(css_color_to_hex("rgb(256, 0, 0)"), None);
        assert_eq!(css_color_to_hex("rgb(1, 2)"), None);
        assert_eq!(css_color_to_hex("transparent"), None);
        assert_eq!(css_color_to_hex("blueish"), None);
    }

    #[test]
    fn named_colors_are_sorted() {
        assert!(NAMED_COLORS.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(NAMED_COLORS.iter().all(|(_, hex)| is_hex_color(hex)));
    }

    #[test]
    fn same_color_ignores_notation() {
        assert!(same_color("#FFF", "white"));
        assert!(same_color("rgb(106, 163, 255)", "#6AA3FF"));
        assert!(!same_color("#000", "#001"));
        assert!(!same_color("nope", "nope"));
    }

    #[test]
    fn palette_draws_from_its_colors() {
        let mut palette = Palette::seeded(7);
        for _ in 0..20 {
            let color = palette.next_color();
            assert!(DEFAULT_PALETTE.contains(&color.as_str()));
        }
    }

    #[test]
    fn seeded_palettes_repeat() {
        let mut a = Palette::seeded(42);
        let mut b = Palette::seeded(42);
        let xs: Vec<_> = (0..10).map(|_| a.next_color()).collect();
        let ys: Vec<_> = (0..10).map(|_| b.next_color()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn invalid_palette_entries_fall_back() {
        let palette = Palette::new(&["red".to_string()], Some(1));
        assert_eq!(palette.colors().len(), DEFAULT_PALETTE.len());

        let custom = Palette::new(&["#000".to_string(), "nope".to_string()], Some(1));
        assert_eq!(custom.colors(), &["#000"]);
    }
}
