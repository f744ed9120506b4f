//! Best-effort color handling for reference resolution.
//!
//! Recognises hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), the functional
//! `rgb()`/`rgba()`/`hsl()`/`hsla()`/`hsv()`/`hsva()` forms and CSS color
//! names. It is a classifier, not a CSS parser: anything it cannot read is
//! simply "not a color".

use ::palette::encoding::Srgb as SrgbStandard;
use ::palette::{named, FromColor, Hsl, Hsv, Srgb, Srgba, WithAlpha};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

/// Number of shades in a generated palette.
pub const PALETTE_SIZE: usize = 10;
/// Index of the input color inside its own palette.
pub const PRIMARY_LEVEL: usize = 5;

const HUE_STEP: f64 = 2.0;
const SATURATION_STEP: f64 = 0.16;
const SATURATION_STEP_2: f64 = 0.05;
const BRIGHTNESS_STEP_1: f64 = 0.05;
const BRIGHTNESS_STEP_2: f64 = 0.15;
const LIGHT_COLOR_COUNT: usize = 5;
const DARK_COLOR_COUNT: usize = 4;

static FUNCTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(rgba?|hsla?|hsva?)\s*\(\s*([^()]*?)\s*\)$").expect("functional color regex")
});
static ARG_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,/]+").expect("argument separator regex"));

/// HSV over the sRGB standard. Hue in degrees, saturation and value in 0-1.
pub type SrgbHsv = Hsv<SrgbStandard, f64>;
type SrgbHsl = Hsl<SrgbStandard, f64>;

/// An sRGB color with alpha; every component is in 0-1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub Srgba<f64>);

impl Color {
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::from_srgb(Srgb::new(r, g, b).into_format())
    }

    fn from_srgb(rgb: Srgb<f64>) -> Self {
        Color(rgb.with_alpha(1.0))
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Color(self.0.color.with_alpha(alpha))
    }

    pub fn alpha(&self) -> f64 {
        self.0.alpha
    }

    /// Parse a color string. `None` means "not a color".
    pub fn parse(input: &str) -> Option<Color> {
        let s = input.trim().to_ascii_lowercase();
        if s.is_empty() {
            return None;
        }
        if s == "transparent" {
            return Some(Color::from_rgb8(0, 0, 0).with_alpha(0.0));
        }
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(caps) = FUNCTIONAL.captures(&s) {
            return parse_functional(&caps[1], &caps[2]);
        }
        named::from_str(&s).map(|rgb| Color::from_srgb(rgb.into_format()))
    }

    pub fn to_hsv(&self) -> SrgbHsv {
        SrgbHsv::from_color(self.0.color)
    }

    /// An opaque color from HSV.
    pub fn from_hsv(hsv: SrgbHsv) -> Color {
        Color::from_srgb(Srgb::from_color(hsv))
    }

    /// Lowercase hex: `#rrggbb` when opaque, `#rrggbbaa` otherwise.
    pub fn to_hex(&self) -> String {
        let rgba: Srgba<u8> = self.0.into_format();
        if rgba.alpha == u8::MAX {
            format!("#{:x}", rgba.color)
        } else {
            format!("#{:x}{:02x}", rgba.color, rgba.alpha)
        }
    }
}

pub fn is_color(input: &str) -> bool {
    Color::parse(input).is_some()
}

// ── Parsing ─────────────────────────────────────────────────────────

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let (rgb, alpha) = match hex.len() {
        3 | 6 => (hex, None),
        4 => {
            let (rgb, a) = hex.split_at(3);
            (rgb, Some(u8::from_str_radix(a, 16).ok()? * 17))
        }
        8 => {
            let (rgb, a) = hex.split_at(6);
            (rgb, Some(u8::from_str_radix(a, 16).ok()?))
        }
        _ => return None,
    };
    let color = Color::from_srgb(Srgb::<u8>::from_str(rgb).ok()?.into_format());
    Some(match alpha {
        Some(a) => color.with_alpha(a as f64 / 255.0),
        None => color,
    })
}

/// A numeric argument, with whether it was written as a percentage.
fn parse_arg(arg: &str) -> Option<(f64, bool)> {
    let (number, percent) = match arg.strip_suffix('%') {
        Some(n) => (n, true),
        None => (arg.strip_suffix("deg").unwrap_or(arg), false),
    };
    let n = number.parse::<f64>().ok()?;
    n.is_finite().then_some((n, percent))
}

/// A 0-1 fraction from `50%`, `0.5` or `50`.
fn fraction((n, percent): (f64, bool)) -> f64 {
    let f = if percent || n > 1.0 { n / 100.0 } else { n };
    f.clamp(0.0, 1.0)
}

/// A 0-1 channel from `255` or `100%`.
fn channel((n, percent): (f64, bool)) -> f64 {
    let c = if percent { n / 100.0 } else { n / 255.0 };
    c.clamp(0.0, 1.0)
}

fn alpha((n, percent): (f64, bool)) -> f64 {
    let a = if percent { n / 100.0 } else { n };
    if (0.0..=1.0).contains(&a) {
        a
    } else {
        1.0
    }
}

/// `rgb`/`rgba`, `hsl`/`hsla` and `hsv`/`hsva` are aliases: each takes three
/// components and an optional alpha.
fn parse_functional(kind: &str, args: &str) -> Option<Color> {
    let args = ARG_SEPARATOR
        .split(args)
        .filter(|a| !a.is_empty())
        .map(parse_arg)
        .collect::<Option<Vec<_>>>()?;
    if !(3..=4).contains(&args.len()) {
        return None;
    }
    let a = args.get(3).copied().map(alpha).unwrap_or(1.0);
    let rgb = match &kind[..3] {
        "rgb" => Srgb::new(channel(args[0]), channel(args[1]), channel(args[2])),
        "hsl" => Srgb::from_color(SrgbHsl::new(
            args[0].0,
            fraction(args[1]),
            fraction(args[2]),
        )),
        "hsv" => Srgb::from_color(SrgbHsv::new(
            args[0].0,
            fraction(args[1]),
            fraction(args[2]),
        )),
        _ => return None,
    };
    Some(Color::from_srgb(rgb).with_alpha(a))
}

// ── Palette ─────────────────────────────────────────────────────────

fn shade_hue(hsv: &SrgbHsv, i: usize, light: bool) -> f64 {
    let h = hsv.hue.into_positive_degrees().round();
    let step = HUE_STEP * i as f64;
    // Cool hues drift towards blue when darkened, warm hues towards red.
    let hue = if (60.0..=240.0).contains(&h) {
        if light {
            h - step
        } else {
            h + step
        }
    } else if light {
        h + step
    } else {
        h - step
    };
    if hue < 0.0 {
        hue + 360.0
    } else if hue >= 360.0 {
        hue - 360.0
    } else {
        hue
    }
}

fn shade_saturation(hsv: &SrgbHsv, i: usize, light: bool) -> f64 {
    // Greys stay grey.
    if hsv.hue.into_positive_degrees() == 0.0 && hsv.saturation == 0.0 {
        return hsv.saturation;
    }
    let mut s = if light {
        hsv.saturation - SATURATION_STEP * i as f64
    } else if i == DARK_COLOR_COUNT {
        hsv.saturation + SATURATION_STEP
    } else {
        hsv.saturation + SATURATION_STEP_2 * i as f64
    };
    s = s.min(1.0);
    if light && i == LIGHT_COLOR_COUNT && s > 0.1 {
        s = 0.1;
    }
    s = s.max(0.06);
    (s * 100.0).round() / 100.0
}

fn shade_value(hsv: &SrgbHsv, i: usize, light: bool) -> f64 {
    let v = if light {
        hsv.value + BRIGHTNESS_STEP_1 * i as f64
    } else {
        hsv.value - BRIGHTNESS_STEP_2 * i as f64
    };
    (v.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

fn shade(hsv: &SrgbHsv, i: usize, light: bool) -> Color {
    Color::from_hsv(SrgbHsv::new(
        shade_hue(hsv, i, light),
        shade_saturation(hsv, i, light),
        shade_value(hsv, i, light),
    ))
}

/// Generate the tonal palette of a color, lightest first.
///
/// Entry `PRIMARY_LEVEL` is the input color itself, made opaque; five
/// lighter shades precede it and four darker ones follow.
pub fn palette(color: Color) -> [Color; PALETTE_SIZE] {
    let hsv = color.to_hsv();
    let mut shades = [Color::from_rgb8(0, 0, 0); PALETTE_SIZE];
    for (slot, i) in (1..=LIGHT_COLOR_COUNT).rev().enumerate() {
        shades[slot] = shade(&hsv, i, true);
    }
    shades[PRIMARY_LEVEL] = color.with_alpha(1.0);
    for i in 1..=DARK_COLOR_COUNT {
        shades[PRIMARY_LEVEL + i] = shade(&hsv, i, false);
    }
    shades
}

/// Pick a palette level and apply an opacity percentage.
pub fn derive(color: Color, level: u8, opacity: u8) -> Color {
    let level = (level as usize).min(PALETTE_SIZE - 1);
    let opacity = opacity.min(100) as f64 / 100.0;
    palette(color)[level].with_alpha(opacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(input: &str) -> Option<String> {
        Color::parse(input).map(|c| c.to_hex())
    }

    #[test]
    fn parses_common_forms() {
        let red = Some("#ff0000".to_string());
        assert_eq!(Color::parse("#FF0000"), Some(Color::from_rgb8(255, 0, 0)));
        assert_eq!(hex("#f00"), red);
        assert_eq!(hex("red"), red);
        assert_eq!(hex("Red"), red);
        assert_eq!(hex("rgb(255, 0, 0)"), red);
        assert_eq!(
            Color::parse("rgba(0, 0, 255, 0.5)"),
            Some(Color::from_rgb8(0, 0, 255).with_alpha(0.5))
        );
        assert_eq!(hex("hsl(120, 100%, 50%)"), Some("#00ff00".to_string()));
        assert_eq!(hex("hsv(240, 100%, 100%)"), Some("#0000ff".to_string()));
        assert_eq!(hex("transparent"), Some("#00000000".to_string()));
    }

    #[test]
    fn hex_with_alpha() {
        assert_eq!(hex("#f008"), Some("#ff000088".to_string()));
        assert_eq!(hex("#1677ff80"), Some("#1677ff80".to_string()));
        assert_eq!(hex("#1677ffff"), Some("#1677ff".to_string()));
    }

    #[test]
    fn functional_forms_take_an_optional_alpha() {
        assert_eq!(hex("rgba(0, 0, 0)"), Some("#000000".to_string()));
        assert_eq!(hex("rgb(0 0 0 / 50%)"), Some("#00000080".to_string()));
        assert_eq!(hex("rgb(0, 0, 0, 0.5)"), Some("#00000080".to_string()));
        assert_eq!(hex("hsla(120, 100%, 50%)"), Some("#00ff00".to_string()));
        assert_eq!(hex("hsl(120, 100%, 50%, 0.5)"), Some("#00ff0080".to_string()));
        assert_eq!(hex("hsva(240, 100%, 100%)"), Some("#0000ff".to_string()));
    }

    #[test]
    fn rejects_non_colors() {
        for s in [
            "", "16px", "bold", "#12", "#ggg", "#+f0000", "#é12", "rgb(1, 2)",
            "rgba(1, 2, 3, 4, 5)", "@brand", "100", "notacolor",
        ] {
            assert!(!is_color(s), "{:?} should not be a color", s);
        }
    }

    #[test]
    fn hex_output_includes_alpha_only_when_translucent() {
        assert_eq!(Color::from_rgb8(255, 0, 0).to_hex(), "#ff0000");
        assert_eq!(
            Color::from_rgb8(255, 0, 0).with_alpha(0.5).to_hex(),
            "#ff000080"
        );
    }

    #[test]
    fn hsv_round_trip() {
        let c = Color::from_rgb8(22, 119, 255);
        assert_eq!(Color::from_hsv(c.to_hsv()).to_hex(), "#1677ff");
    }

    #[test]
    fn palette_of_ant_blue() {
        let shades: Vec<String> = palette(Color::parse("#1677ff").unwrap())
            .iter()
            .map(Color::to_hex)
            .collect();
        assert_eq!(shades.len(), PALETTE_SIZE);
        assert_eq!(shades[PRIMARY_LEVEL], "#1677ff");
        assert_eq!(shades[0], "#e6f4ff");
        assert_eq!(shades[9], "#001d66");
    }

    #[test]
    fn palette_keeps_greys_grey() {
        for shade in palette(Color::from_rgb8(128, 128, 128)) {
            let hex = shade.to_hex();
            assert_eq!(&hex[1..3], &hex[3..5], "{}", hex);
            assert_eq!(&hex[3..5], &hex[5..7], "{}", hex);
        }
    }

    #[test]
    fn derive_applies_level_and_opacity() {
        let red = Color::from_rgb8(255, 0, 0);
        assert_eq!(derive(red, 5, 100).to_hex(), "#ff0000");
        assert_eq!(derive(red, 5, 0).to_hex(), "#ff000000");
        assert_eq!(derive(red, 5, 50).to_hex(), "#ff000080");
        assert_eq!(derive(red, 3, 100).to_hex(), "#ff5d52");
        assert_eq!(derive(red, 42, 100), derive(red, 9, 100));
    }
}
