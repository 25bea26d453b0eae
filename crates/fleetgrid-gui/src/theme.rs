//! Board colors derived from the server palette

use eframe::egui::Color32;
use fleetgrid_domain::model::parse_rgb;
use fleetgrid_types::{Layer, Palette};

fn color(hex: &str, fallback: Color32) -> Color32 {
    parse_rgb(hex)
        .map(|(r, g, b)| Color32::from_rgb(r, g, b))
        .unwrap_or(fallback)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardTheme {
    pub accent: Color32,
    pub schedule_fill: Color32,
    pub plan_fill: Color32,
    pub fact_fill: Color32,
    pub border: Color32,
    pub header_bg: Color32,
    pub sticky_bg: Color32,
    pub band_bg: Color32,
    pub text: Color32,
    pub muted: Color32,
}

impl BoardTheme {
    pub fn from_palette(palette: &Palette) -> Self {
        let defaults = Palette::default();
        let accent = color(&palette.accent, color(&defaults.accent, Color32::LIGHT_BLUE));
        Self {
            accent,
            schedule_fill: color(&palette.schedule_fill, accent),
            plan_fill: color(&palette.plan_fill, accent),
            fact_fill: color(&palette.fact_fill, Color32::from_rgb(0x25, 0x63, 0xeb)),
            border: color(&palette.border, Color32::from_rgb(0x0b, 0x0f, 0x14)),
            header_bg: Color32::from_rgb(0xf1, 0xf5, 0xf9),
            sticky_bg: Color32::WHITE,
            band_bg: Color32::from_rgb(0xf6, 0xf8, 0xfb),
            text: Color32::from_rgb(0x0f, 0x17, 0x2a),
            muted: Color32::from_rgb(0x64, 0x74, 0x8b),
        }
    }

    /// Fill of a filled cell in a layer row
    pub fn layer_fill(&self, layer: Layer) -> Color32 {
        match layer {
            Layer::Schedule => self.schedule_fill,
            Layer::Plan => self.plan_fill,
            Layer::Fact => self.fact_fill,
        }
    }

    /// Light tint of the plan fill behind request tags
    pub fn plan_tint(&self) -> Color32 {
        self.plan_fill.gamma_multiply(0.35)
    }
}

impl Default for BoardTheme {
    fn default() -> Self {
        Self::from_palette(&Palette::default())
    }
}
