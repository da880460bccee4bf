//! Colour constants and helpers. Colours are packed ARGB8888 `u32`s.

pub const BACKGROUND: u32 = 0xFFFFFFFF;
pub const OVERVIEW_BACKGROUND: u32 = 0xFFD3D3D3;
pub const FOREGROUND: u32 = 0xFF000000;
pub const FOOTPRINT: u32 = 0xFF808080;
pub const SEPARATOR: u32 = 0xFF404040;

const NAMED: &[(&str, u32)] = &[
    ("black", 0xFF000000),
    ("white", 0xFFFFFFFF),
    ("red", 0xFFFF0000),
    ("green", 0xFF008000),
    ("lime", 0xFF00FF00),
    ("blue", 0xFF0000FF),
    ("yellow", 0xFFFFFF00),
    ("cyan", 0xFF00FFFF),
    ("magenta", 0xFFFF00FF),
    ("orange", 0xFFFFA500),
    ("purple", 0xFF800080),
    ("pink", 0xFFFFC0CB),
    ("brown", 0xFFA52A2A),
    ("gray", 0xFF808080),
    ("grey", 0xFF808080),
    ("lightgrey", 0xFFD3D3D3),
    ("lightgray", 0xFFD3D3D3),
    ("darkgray", 0xFFA9A9A9),
    ("darkgrey", 0xFFA9A9A9),
];

/// Parses a colour name (case-insensitive) or a `#rrggbb` / `#rgb` literal.
pub fn parse_color(name: &str) -> Option<u32> {
    let name = name.trim();
    if let Some(hex) = name.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = name.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(candidate, _)| *candidate == lower)
        .map(|&(_, color)| color)
}

fn parse_hex(hex: &str) -> Option<u32> {
    match hex.len() {
        6 => u32::from_str_radix(hex, 16).ok().map(|rgb| 0xFF00_0000 | rgb),
        3 => {
            let rgb = u32::from_str_radix(hex, 16).ok()?;
            let (r, g, b) = ((rgb >> 8) & 0xF, (rgb >> 4) & 0xF, rgb & 0xF);
            Some(0xFF00_0000 | (r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors_are_case_insensitive() {
        assert_eq!(parse_color("Red"), Some(0xFFFF0000));
        assert_eq!(parse_color("gray"), parse_color("GREY"));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#00ff80"), Some(0xFF00FF80));
        assert_eq!(parse_color("#f0a"), Some(0xFFFF00AA));
        assert_eq!(parse_color("#12"), None);
    }
}
