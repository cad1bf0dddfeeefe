//! Theme tokens (hex strings as supplied by the host) and their resolved palette.

use std::collections::BTreeMap;

use scene::components::Color;
use serde::{Deserialize, Serialize};

use crate::error::AssetError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeTokens {
    pub background: String,
    pub ocean_inner: String,
    pub ocean_outer: String,
    pub atmosphere: String,
    pub hex_stroke: String,
    pub graticule_minor: String,
    pub graticule_major: String,
    pub parallels: String,
    pub land_known: String,
    pub land_unknown: String,
    pub land_stroke: String,
    pub land_hover: String,
    pub land_hover_stroke: String,
    pub accent: String,
    pub border: String,
    pub ring: String,
    pub tick: String,
    pub beacon: String,
    pub star: String,
    pub tooltip_background: String,
    pub tooltip_text: String,
    /// Orbital object colors by key (`station`, `sat-a`, ...).
    pub orbit_colors: BTreeMap<String, String>,
    /// Marker category colors.
    pub category_colors: BTreeMap<String, String>,
    /// Marker status colors by `MarkerStatus::color_key`.
    pub status_colors: BTreeMap<String, String>,
}

impl Default for ThemeTokens {
    fn default() -> Self {
        let map = |pairs: &[(&str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        Self {
            background: "#050b14".into(),
            ocean_inner: "#0d2236".into(),
            ocean_outer: "#061321".into(),
            atmosphere: "#3aa0ff40".into(),
            hex_stroke: "#1b3a55".into(),
            graticule_minor: "#16314a".into(),
            graticule_major: "#24506f".into(),
            parallels: "#2f6d8f".into(),
            land_known: "#2b5d7d".into(),
            land_unknown: "#1a3247".into(),
            land_stroke: "#0a1724".into(),
            land_hover: "#3d86b3".into(),
            land_hover_stroke: "#9fd6ff".into(),
            accent: "#ffb547".into(),
            border: "#0f2a40".into(),
            ring: "#2a5878".into(),
            tick: "#3f7aa0".into(),
            beacon: "#7fe3ff".into(),
            star: "#cfe8ff".into(),
            tooltip_background: "#0b1826".into(),
            tooltip_text: "#e6f3ff".into(),
            orbit_colors: map(&[("station", "#ffd166"), ("satellite", "#6ee7b7")]),
            category_colors: map(&[
                ("naval", "#4cc9f0"),
                ("air", "#b8f2e6"),
                ("army", "#f4a261"),
                ("border", "#e76f51"),
            ]),
            status_colors: map(&[
                ("militarized", "#ef476f"),
                ("incident", "#ffd166"),
                ("disputed", "#f78c6b"),
                ("controlled", "#06d6a0"),
            ]),
        }
    }
}

impl ThemeTokens {
    pub fn from_json_str(payload: &str) -> Result<Self, AssetError> {
        serde_json::from_str(payload).map_err(AssetError::json("theme"))
    }

    /// Parse every token; any malformed color fails the whole theme.
    pub fn resolve(&self) -> Result<Palette, AssetError> {
        let c = |s: &String| Color::parse_hex(s);
        let map = |m: &BTreeMap<String, String>| -> Result<BTreeMap<String, Color>, AssetError> {
            m.iter()
                .map(|(k, v)| Ok((k.clone(), Color::parse_hex(v)?)))
                .collect()
        };
        Ok(Palette {
            background: c(&self.background)?,
            ocean_inner: c(&self.ocean_inner)?,
            ocean_outer: c(&self.ocean_outer)?,
            atmosphere: c(&self.atmosphere)?,
            hex_stroke: c(&self.hex_stroke)?,
            graticule_minor: c(&self.graticule_minor)?,
            graticule_major: c(&self.graticule_major)?,
            parallels: c(&self.parallels)?,
            land_known: c(&self.land_known)?,
            land_unknown: c(&self.land_unknown)?,
            land_stroke: c(&self.land_stroke)?,
            land_hover: c(&self.land_hover)?,
            land_hover_stroke: c(&self.land_hover_stroke)?,
            accent: c(&self.accent)?,
            border: c(&self.border)?,
            ring: c(&self.ring)?,
            tick: c(&self.tick)?,
            beacon: c(&self.beacon)?,
            star: c(&self.star)?,
            tooltip_background: c(&self.tooltip_background)?,
            tooltip_text: c(&self.tooltip_text)?,
            orbit_colors: map(&self.orbit_colors)?,
            category_colors: map(&self.category_colors)?,
            status_colors: map(&self.status_colors)?,
        })
    }
}

/// Resolved theme colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub ocean_inner: Color,
    pub ocean_outer: Color,
    pub atmosphere: Color,
    pub hex_stroke: Color,
    pub graticule_minor: Color,
    pub graticule_major: Color,
    pub parallels: Color,
    pub land_known: Color,
    pub land_unknown: Color,
    pub land_stroke: Color,
    pub land_hover: Color,
    pub land_hover_stroke: Color,
    pub accent: Color,
    pub border: Color,
    pub ring: Color,
    pub tick: Color,
    pub beacon: Color,
    pub star: Color,
    pub tooltip_background: Color,
    pub tooltip_text: Color,
    pub orbit_colors: BTreeMap<String, Color>,
    pub category_colors: BTreeMap<String, Color>,
    pub status_colors: BTreeMap<String, Color>,
}

impl Palette {
    /// Orbital object color; unknown keys fall back to `satellite`, then the accent.
    pub fn orbit_color(&self, key: &str) -> Color {
        self.orbit_colors
            .get(key)
            .or_else(|| self.orbit_colors.get("satellite"))
            .copied()
            .unwrap_or(self.accent)
    }

    pub fn category_color(&self, key: &str) -> Color {
        self.category_colors.get(key).copied().unwrap_or(self.accent)
    }

    pub fn status_color(&self, key: &str) -> Color {
        self.status_colors.get(key).copied().unwrap_or(self.ring)
    }
}
