//! Palette colors: hex normalization and field access for the editor

use fleetgrid_types::Palette;

/// Canonical `#rrggbb` form of a user-entered color, or None when invalid.
///
/// Accepts surrounding whitespace, a missing `#` and the short `#abc` form.
pub fn normalize_hex(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

/// RGB triple of a color accepted by [`normalize_hex`]
pub fn parse_rgb(input: &str) -> Option<(u8, u8, u8)> {
    let hex = normalize_hex(input)?;
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(1)?, channel(3)?, channel(5)?))
}

/// Editable palette entries in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteField {
    Accent,
    ScheduleFill,
    PlanFill,
    FactFill,
    Border,
}

impl PaletteField {
    pub const ALL: [PaletteField; 5] = [
        PaletteField::Accent,
        PaletteField::ScheduleFill,
        PaletteField::PlanFill,
        PaletteField::FactFill,
        PaletteField::Border,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PaletteField::Accent => "Акцент",
            PaletteField::ScheduleFill => "График работы",
            PaletteField::PlanFill => "План",
            PaletteField::FactFill => "Факт",
            PaletteField::Border => "Рамка",
        }
    }

    pub fn get<'a>(&self, palette: &'a Palette) -> &'a str {
        match self {
            PaletteField::Accent => &palette.accent,
            PaletteField::ScheduleFill => &palette.schedule_fill,
            PaletteField::PlanFill => &palette.plan_fill,
            PaletteField::FactFill => &palette.fact_fill,
            PaletteField::Border => &palette.border,
        }
    }

    pub fn get_mut<'a>(&self, palette: &'a mut Palette) -> &'a mut String {
        match self {
            PaletteField::Accent => &mut palette.accent,
            PaletteField::ScheduleFill => &mut palette.schedule_fill,
            PaletteField::PlanFill => &mut palette.plan_fill,
            PaletteField::FactFill => &mut palette.fact_fill,
            PaletteField::Border => &mut palette.border,
        }
    }
}

/// Copy with every field normalized; invalid entries fall back to the defaults
pub fn sanitize_palette(palette: &Palette) -> Palette {
    let defaults = Palette::default();
    let mut out = defaults.clone();
    for field in PaletteField::ALL {
        *field.get_mut(&mut out) = normalize_hex(field.get(palette))
            .unwrap_or_else(|| field.get(&defaults).to_string());
    }
    out
}

/// Fields whose text is not a valid color
pub fn invalid_fields(palette: &Palette) -> Vec<PaletteField> {
    PaletteField::ALL
        .iter()
        .copied()
        .filter(|f| normalize_hex(f.get(palette)).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_hex() {
        assert_eq!(normalize_hex(" #55B4C7 ").as_deref(), Some("#55b4c7"));
        assert_eq!(normalize_hex("2563eb").as_deref(), Some("#2563eb"));
        assert_eq!(normalize_hex("#AbC").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_hex("#abcd"), None);
        assert_eq!(normalize_hex("#ggg"), None);
        assert_eq!(normalize_hex(""), None);
    }

    #[test]
    fn test_parse_rgb() {
        assert_eq!(parse_rgb("#0b0f14"), Some((0x0b, 0x0f, 0x14)));
        assert_eq!(parse_rgb("fff"), Some((255, 255, 255)));
        assert_eq!(parse_rgb("blue"), None);
    }

    #[test]
    fn test_sanitize_replaces_invalid_fields() {
        let palette = Palette {
            accent: "F00".into(),
            fact_fill: "not a color".into(),
            ..Palette::default()
        };
        assert_eq!(invalid_fields(&palette), vec![PaletteField::FactFill]);
        let clean = sanitize_palette(&palette);
        assert_eq!(clean.accent, "#ff0000");
        assert_eq!(clean.fact_fill, "#2563eb");
        assert!(invalid_fields(&clean).is_empty());
    }
}
