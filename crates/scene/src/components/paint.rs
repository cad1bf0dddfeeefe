use thiserror::Error;

/// 8-bit sRGB color with straight alpha.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| err())
        };
        match hex.len() {
            3 => Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
            ..self
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn alpha(self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

/// Resolved paint of a scene node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Paint {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    /// Node opacity multiplier in `[0, 1]`.
    pub opacity: f64,
    /// Apply the glow filter.
    pub glow: bool,
    /// Dash pattern `[on, off]` in pixels.
    pub dash: Option<[f64; 2]>,
    /// Animated dash offset in pixels.
    pub dash_offset: f64,
}

impl Default for Paint {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            opacity: 1.0,
            glow: false,
            dash: None,
            dash_offset: 0.0,
        }
    }
}

impl Paint {
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn with_stroke(self, color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..self
        }
    }

    pub fn with_dash(self, dash: [f64; 2]) -> Self {
        Self {
            dash: Some(dash),
            ..self
        }
    }

    pub fn with_glow(self, glow: bool) -> Self {
        Self { glow, ..self }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            opacity: opacity.clamp(0.0, 1.0),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Color, Paint};

    #[test]
    fn parses_hex_forms() {
        assert_eq!(Color::parse_hex("#fff").unwrap(), Color::rgb(255, 255, 255));
        assert_eq!(Color::parse_hex("#0a1b2c").unwrap(), Color::rgb(10, 27, 44));
        assert_eq!(
            Color::parse_hex("#0a1b2c80").unwrap(),
            Color::rgba(10, 27, 44, 128)
        );
        assert!(Color::parse_hex("0a1b2c").is_err());
        assert!(Color::parse_hex("#12345").is_err());
        assert!(Color::parse_hex("#zzzzzz").is_err());
    }

    #[test]
    fn hex_round_trip_drops_alpha() {
        let c = Color::rgba(1, 2, 3, 4);
        assert_eq!(c.to_hex(), "#010203");
        assert_eq!(c.with_alpha(1.0).a, 255);
    }

    #[test]
    fn paint_builders_compose() {
        let p = Paint::fill(Color::rgb(1, 1, 1))
            .with_stroke(Color::rgb(2, 2, 2), 0.5)
            .with_glow(true)
            .with_opacity(2.0);
        assert_eq!(p.stroke_width, 0.5);
        assert!(p.glow);
        assert_eq!(p.opacity, 1.0);
    }
}
