//! Color parsing and palette normalization.
//!
//! Icons are recolored to a single theming token so consumers can drive
//! them from CSS `color`. The parser only needs to classify values well
//! enough to tell visible paint from transparent or absent paint — anything
//! it cannot classify is left untouched by the palette walk.

use crate::ast::Svg;

/// The CSS keyword icons are normalized to.
pub const CURRENT_COLOR: &str = "currentColor";

/// Presentation attributes that carry paint.
pub const COLOR_ATTRIBUTES: [&str; 6] = [
    "fill",
    "stroke",
    "stop-color",
    "flood-color",
    "lighting-color",
    "color",
];

/// A classified color value.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// `none`
    None,
    /// `transparent`
    Transparent,
    /// `currentColor`
    Current,
    /// Hex or `rgb()`/`rgba()` notation
    Rgb { r: u8, g: u8, b: u8, alpha: f64 },
    /// `hsl()`/`hsla()` notation
    Hsl {
        hue: f64,
        saturation: f64,
        lightness: f64,
        alpha: f64,
    },
    /// A CSS named color
    Named(&'static str),
    /// A paint server reference, `url(#id)`
    Reference(String),
}

impl Color {
    /// Classify a color value. Returns `None` for anything that is not
    /// recognizably a color (`inherit`, CSS variables, malformed values).
    pub fn parse(s: &str) -> Option<Color> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "none" => return Some(Color::None),
            "transparent" => return Some(Color::Transparent),
            "currentcolor" => return Some(Color::Current),
            _ => {}
        }

        if let Some(hex) = lower.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = strip_function(&lower, "rgb").or_else(|| strip_function(&lower, "rgba"))
        {
            return parse_rgb_args(&args);
        }
        if let Some(args) = strip_function(&lower, "hsl").or_else(|| strip_function(&lower, "hsla"))
        {
            return parse_hsl_args(&args);
        }
        if let Some(args) = strip_function(&lower, "url") {
            return Some(Color::Reference(args));
        }

        NAMED_COLORS
            .binary_search(&lower.as_str())
            .ok()
            .map(|idx| Color::Named(NAMED_COLORS[idx]))
    }
}

/// Is this color invisible paint — `none`, `transparent`, or zero alpha?
pub fn is_empty_color(color: &Color) -> bool {
    match color {
        Color::None | Color::Transparent => true,
        Color::Rgb { alpha, .. } | Color::Hsl { alpha, .. } => *alpha == 0.0,
        _ => false,
    }
}

/// What the palette callback decides for a single color value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorChange {
    Keep,
    Replace(String),
}

/// Palette normalization settings.
#[derive(Debug, Clone)]
pub struct PaletteOptions {
    /// Paint assigned to the root when the icon relies on the implicit
    /// default (black) everywhere.
    pub default_color: String,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            default_color: CURRENT_COLOR.into(),
        }
    }
}

/// Walk every color value in the document and let `callback` decide its
/// fate. Covers paint attributes and color declarations inside `style`
/// attributes. The callback receives the attribute or property name, the
/// raw value, and its classification (`None` when unclassifiable).
///
/// Afterwards, an icon that never sets `fill` anywhere is given
/// `fill="<default_color>"` on its root so the implicit black paint
/// becomes themable.
pub fn apply_palette<F>(svg: &mut Svg, options: &PaletteOptions, mut callback: F)
where
    F: FnMut(&str, &str, Option<&Color>) -> ColorChange,
{
    let mut sets_fill = false;

    svg.for_each_element_mut(|elem| {
        for attr in &mut elem.attributes {
            if !COLOR_ATTRIBUTES.contains(&attr.name.local.as_str()) || attr.name.prefix.is_some()
            {
                continue;
            }
            if attr.name.local == "fill" {
                sets_fill = true;
            }
            let parsed = Color::parse(&attr.value);
            if let ColorChange::Replace(value) =
                callback(&attr.name.local, &attr.value, parsed.as_ref())
            {
                attr.value = value;
            }
        }

        if let Some(style) = elem.get_attr("style").map(|s| s.to_string()) {
            let rewritten = rewrite_style(&style, &mut sets_fill, &mut callback);
            if rewritten != style {
                elem.set_attr("style", rewritten);
            }
        }
    });

    if !sets_fill {
        svg.root
            .set_attr("fill", options.default_color.clone());
    }
}

fn rewrite_style<F>(style: &str, sets_fill: &mut bool, callback: &mut F) -> String
where
    F: FnMut(&str, &str, Option<&Color>) -> ColorChange,
{
    let mut parts = Vec::new();

    for decl in style.split(';') {
        if decl.trim().is_empty() {
            continue;
        }
        let Some((prop, value)) = decl.split_once(':') else {
            parts.push(decl.trim().to_string());
            continue;
        };

        let prop = prop.trim();
        let value = value.trim();
        if COLOR_ATTRIBUTES.contains(&prop) {
            if prop == "fill" {
                *sets_fill = true;
            }
            let parsed = Color::parse(value);
            let value = match callback(prop, value, parsed.as_ref()) {
                ColorChange::Replace(replacement) => replacement,
                ColorChange::Keep => value.to_string(),
            };
            parts.push(format!("{prop}:{value}"));
        } else {
            parts.push(format!("{prop}:{value}"));
        }
    }

    parts.join(";")
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |c: char| c.to_digit(16).unwrap_or(0) as u8;
    let chars: Vec<char> = hex.chars().collect();

    let (r, g, b, alpha) = match chars.len() {
        3 => (
            nibble(chars[0]) * 17,
            nibble(chars[1]) * 17,
            nibble(chars[2]) * 17,
            255,
        ),
        4 => (
            nibble(chars[0]) * 17,
            nibble(chars[1]) * 17,
            nibble(chars[2]) * 17,
            nibble(chars[3]) * 17,
        ),
        6 => (
            nibble(chars[0]) * 16 + nibble(chars[1]),
            nibble(chars[2]) * 16 + nibble(chars[3]),
            nibble(chars[4]) * 16 + nibble(chars[5]),
            255,
        ),
        8 => (
            nibble(chars[0]) * 16 + nibble(chars[1]),
            nibble(chars[2]) * 16 + nibble(chars[3]),
            nibble(chars[4]) * 16 + nibble(chars[5]),
            nibble(chars[6]) * 16 + nibble(chars[7]),
        ),
        _ => return None,
    };

    Some(Color::Rgb {
        r,
        g,
        b,
        alpha: alpha as f64 / 255.0,
    })
}

/// Strip `name(args)` and return the args, or `None`.
fn strip_function(s: &str, name: &str) -> Option<String> {
    let rest = s.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.trim().to_string())
}

fn split_args(args: &str) -> Vec<&str> {
    args.split([',', ' ', '\t', '/'])
        .filter(|part| !part.is_empty())
        .collect()
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        if let Some(pct) = s.strip_suffix('%') {
            let v: f64 = pct.parse().ok()?;
            (0.0..=100.0).contains(&v).then(|| (v * 255.0 / 100.0).round() as u8)
        } else {
            let v: f64 = s.parse().ok()?;
            (0.0..=255.0).contains(&v).then(|| v.round() as u8)
        }
    };

    let r = channel(parts[0])?;
    let g = channel(parts[1])?;
    let b = channel(parts[2])?;
    let alpha = match parts.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(Color::Rgb { r, g, b, alpha })
}

fn parse_hsl_args(args: &str) -> Option<Color> {
    let parts = split_args(args);
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let hue: f64 = parts[0].strip_suffix("deg").unwrap_or(parts[0]).parse().ok()?;
    let saturation: f64 = parts[1].strip_suffix('%')?.parse().ok()?;
    let lightness: f64 = parts[2].strip_suffix('%')?.parse().ok()?;
    let alpha = match parts.get(3) {
        Some(a) => parse_alpha(a)?,
        None => 1.0,
    };
    Some(Color::Hsl {
        hue,
        saturation,
        lightness,
        alpha,
    })
}

fn parse_alpha(s: &str) -> Option<f64> {
    let (value, scale) = match s.strip_suffix('%') {
        Some(pct) => (pct.parse::<f64>().ok()?, 100.0),
        None => (s.parse::<f64>().ok()?, 1.0),
    };
    let alpha = value / scale;
    (0.0..=1.0).contains(&alpha).then_some(alpha)
}

/// CSS named colors, sorted for binary search.
static NAMED_COLORS: [&str; 148] = [
    "aliceblue",
    "antiquewhite",
    "aqua",
    "aquamarine",
    "azure",
    "beige",
    "bisque",
    "black",
    "blanchedalmond",
    "blue",
    "blueviolet",
    "brown",
    "burlywood",
    "cadetblue",
    "chartreuse",
    "chocolate",
    "coral",
    "cornflowerblue",
    "cornsilk",
    "crimson",
    "cyan",
    "darkblue",
    "darkcyan",
    "darkgoldenrod",
    "darkgray",
    "darkgreen",
    "darkgrey",
    "darkkhaki",
    "darkmagenta",
    "darkolivegreen",
    "darkorange",
    "darkorchid",
    "darkred",
    "darksalmon",
    "darkseagreen",
    "darkslateblue",
    "darkslategray",
    "darkslategrey",
    "darkturquoise",
    "darkviolet",
    "deeppink",
    "deepskyblue",
    "dimgray",
    "dimgrey",
    "dodgerblue",
    "firebrick",
    "floralwhite",
    "forestgreen",
    "fuchsia",
    "gainsboro",
    "ghostwhite",
    "gold",
    "goldenrod",
    "gray",
    "green",
    "greenyellow",
    "grey",
    "honeydew",
    "hotpink",
    "indianred",
    "indigo",
    "ivory",
    "khaki",
    "lavender",
    "lavenderblush",
    "lawngreen",
    "lemonchiffon",
    "lightblue",
    "lightcoral",
    "lightcyan",
    "lightgoldenrodyellow",
    "lightgray",
    "lightgreen",
    "lightgrey",
    "lightpink",
    "lightsalmon",
    "lightseagreen",
    "lightskyblue",
    "lightslategray",
    "lightslategrey",
    "lightsteelblue",
    "lightyellow",
    "lime",
    "limegreen",
    "linen",
    "magenta",
    "maroon",
    "mediumaquamarine",
    "mediumblue",
    "mediumorchid",
    "mediumpurple",
    "mediumseagreen",
    "mediumslateblue",
    "mediumspringgreen",
    "mediumturquoise",
    "mediumvioletred",
    "midnightblue",
    "mintcream",
    "mistyrose",
    "moccasin",
    "navajowhite",
    "navy",
    "oldlace",
    "olive",
    "olivedrab",
    "orange",
    "orangered",
    "orchid",
    "palegoldenrod",
    "palegreen",
    "paleturquoise",
    "palevioletred",
    "papayawhip",
    "peachpuff",
    "peru",
    "pink",
    "plum",
    "powderblue",
    "purple",
    "rebeccapurple",
    "red",
    "rosybrown",
    "royalblue",
    "saddlebrown",
    "salmon",
    "sandybrown",
    "seagreen",
    "seashell",
    "sienna",
    "silver",
    "skyblue",
    "slateblue",
    "slategray",
    "slategrey",
    "snow",
    "springgreen",
    "steelblue",
    "tan",
    "teal",
    "thistle",
    "tomato",
    "turquoise",
    "violet",
    "wheat",
    "white",
    "whitesmoke",
    "yellow",
    "yellowgreen",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_svg;
    use crate::serialize::serialize_svg;

    fn to_token(_attr: &str, _raw: &str, color: Option<&Color>) -> ColorChange {
        match color {
            Some(c) if !is_empty_color(c) => ColorChange::Replace(CURRENT_COLOR.into()),
            _ => ColorChange::Keep,
        }
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(Color::parse("none"), Some(Color::None));
        assert_eq!(Color::parse("  TRANSPARENT "), Some(Color::Transparent));
        assert_eq!(Color::parse("currentColor"), Some(Color::Current));
        assert_eq!(Color::parse("red"), Some(Color::Named("red")));
        assert_eq!(Color::parse("rebeccapurple"), Some(Color::Named("rebeccapurple")));
        assert_eq!(Color::parse("inherit"), None);
        assert_eq!(Color::parse("var(--icon)"), None);
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            Color::parse("#f00"),
            Some(Color::Rgb {
                r: 255,
                g: 0,
                b: 0,
                alpha: 1.0
            })
        );
        assert_eq!(
            Color::parse("#11223344"),
            Some(Color::Rgb {
                r: 0x11,
                g: 0x22,
                b: 0x33,
                alpha: 0x44 as f64 / 255.0
            })
        );
        assert_eq!(Color::parse("#12345"), None);
        assert_eq!(Color::parse("#xyz"), None);
    }

    #[test]
    fn test_parse_functions() {
        assert_eq!(
            Color::parse("rgb(255, 0, 0)"),
            Some(Color::Rgb {
                r: 255,
                g: 0,
                b: 0,
                alpha: 1.0
            })
        );
        assert!(matches!(
            Color::parse("rgba(0,0,0,0)"),
            Some(Color::Rgb { alpha, .. }) if alpha == 0.0
        ));
        assert!(matches!(
            Color::parse("hsl(120, 50%, 50%)"),
            Some(Color::Hsl { .. })
        ));
        assert!(matches!(
            Color::parse("url(#gradient)"),
            Some(Color::Reference(id)) if id == "#gradient"
        ));
        assert_eq!(Color::parse("rgb(1,2)"), None);
    }

    #[test]
    fn test_empty_classification() {
        assert!(is_empty_color(&Color::None));
        assert!(is_empty_color(&Color::Transparent));
        assert!(is_empty_color(&Color::parse("#0000").unwrap()));
        assert!(is_empty_color(&Color::parse("rgba(10,20,30,0)").unwrap()));
        assert!(!is_empty_color(&Color::Current));
        assert!(!is_empty_color(&Color::parse("#fff").unwrap()));
        assert!(!is_empty_color(&Color::parse("black").unwrap()));
    }

    #[test]
    fn test_palette_replaces_visible_colors() {
        let mut svg = parse_svg(
            r##"<svg xmlns="http://www.w3.org/2000/svg"><path fill="#ff0000" stroke="none" d="M0 0z"/></svg>"##,
        )
        .unwrap();
        apply_palette(&mut svg, &PaletteOptions::default(), to_token);

        let out = serialize_svg(&svg, true);
        assert!(out.contains(r#"fill="currentColor""#));
        assert!(out.contains(r#"stroke="none""#));
    }

    #[test]
    fn test_palette_rewrites_style_declarations() {
        let mut svg = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path style="fill: blue; stroke-width: 2" d="M0 0z"/></svg>"#,
        )
        .unwrap();
        apply_palette(&mut svg, &PaletteOptions::default(), to_token);

        let out = serialize_svg(&svg, true);
        assert!(out.contains("fill:currentColor"));
        assert!(out.contains("stroke-width:2"));
    }

    #[test]
    fn test_palette_keeps_unparsable() {
        let mut svg = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path fill="inherit" d="M0 0z"/></svg>"#,
        )
        .unwrap();
        apply_palette(&mut svg, &PaletteOptions::default(), to_token);

        let out = serialize_svg(&svg, true);
        assert!(out.contains(r#"fill="inherit""#));
    }

    #[test]
    fn test_palette_default_fill_injection() {
        // Icon drawn with the implicit black fill
        let mut svg = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="M0 0h8v8z"/></svg>"#,
        )
        .unwrap();
        apply_palette(&mut svg, &PaletteOptions::default(), to_token);
        assert_eq!(svg.root.get_attr("fill"), Some(CURRENT_COLOR));

        // But not when any fill is already present
        let mut svg = parse_svg(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><path fill="none" d="M0 0h8v8z"/></svg>"#,
        )
        .unwrap();
        apply_palette(&mut svg, &PaletteOptions::default(), to_token);
        assert_eq!(svg.root.get_attr("fill"), None);
    }
}
