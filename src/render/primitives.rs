use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self::rgba(self.red, self.green, self.blue, alpha)
    }

    /// Parses `#RGB`, `#RRGGBB` or `#AARRGGBB` (leading `#` optional).
    pub fn from_hex(input: &str) -> ChartResult<Self> {
        let hex = input.trim().trim_start_matches('#');
        if hex.is_empty() || !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
            return Err(ChartError::InvalidData(format!("invalid hex color `{input}`")));
        }
        let value = u32::from_str_radix(hex, 16)
            .map_err(|_| ChartError::InvalidData(format!("invalid hex color `{input}`")))?;
        let (a, r, g, b) = match hex.len() {
            3 => (
                255,
                ((value >> 8) & 0xF) * 17,
                ((value >> 4) & 0xF) * 17,
                (value & 0xF) * 17,
            ),
            6 => (255, (value >> 16) & 0xFF, (value >> 8) & 0xFF, value & 0xFF),
            8 => (
                (value >> 24) & 0xFF,
                (value >> 16) & 0xFF,
                (value >> 8) & 0xFF,
                value & 0xFF,
            ),
            _ => {
                return Err(ChartError::InvalidData(format!(
                    "hex color `{input}` must have 3, 6 or 8 digits"
                )));
            }
        };
        let channel = |v: u32| f64::from(v) / 255.0;
        Ok(Self::rgba(channel(r), channel(g), channel(b), channel(a)))
    }

    /// Composites `mask` over `self` and returns an opaque color.
    ///
    /// Each channel is `self * (1 - mask.alpha) + mask * mask.alpha`.
    #[must_use]
    pub fn blended_with(self, mask: Self) -> Self {
        let a = mask.alpha;
        Self::rgb(
            self.red * (1.0 - a) + mask.red * a,
            self.green * (1.0 - a) + mask.green * a,
            self.blue * (1.0 - a) + mask.blue * a,
        )
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Semibold,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub size_px: f64,
    pub weight: FontWeight,
}

impl FontSpec {
    #[must_use]
    pub const fn regular(size_px: f64) -> Self {
        Self {
            size_px,
            weight: FontWeight::Regular,
        }
    }

    #[must_use]
    pub const fn semibold(size_px: f64) -> Self {
        Self {
            size_px,
            weight: FontWeight::Semibold,
        }
    }
}

/// Stroked polyline for one line series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePath {
    pub color: Color,
    pub stroke_width: f64,
    pub points: Vec<Point>,
}

/// Filled rectangles sharing one color.
///
/// `highlighted` marks the set layered on top of dimmed columns when a
/// timestamp is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSet {
    pub color: Color,
    pub rects: Vec<Rect>,
    pub highlighted: bool,
}

/// Closed fill polygon for one stacked band: upper boundary left to right,
/// then lower boundary right to left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaBand {
    pub color: Color,
    pub polygon: Vec<Point>,
}

/// Positioned text with the font it was measured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub frame: Rect,
    pub font: FontSpec,
}

/// Pie slice spanning `[start_angle, end_angle)` radians, clockwise in device space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieWedge {
    pub color: Color,
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub percent: i64,
    pub label: Option<TextRun>,
}

pub(crate) fn validate_points(points: &[Point], what: &str) -> ChartResult<()> {
    if points.iter().all(|point| point.is_finite()) {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} coordinates must be finite"
        )))
    }
}

pub(crate) fn validate_rect(rect: Rect, what: &str) -> ChartResult<()> {
    if rect.is_finite() && rect.width >= 0.0 && rect.height >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} must be finite with non-negative size"
        )))
    }
}

impl LinePath {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        validate_points(&self.points, "line")?;
        self.color.validate()
    }
}

impl BarSet {
    pub fn validate(&self) -> ChartResult<()> {
        for rect in &self.rects {
            validate_rect(*rect, "bar rect")?;
        }
        self.color.validate()
    }
}

impl AreaBand {
    pub fn validate(&self) -> ChartResult<()> {
        validate_points(&self.polygon, "area band")?;
        self.color.validate()
    }
}

impl TextRun {
    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text run must not be empty".to_owned(),
            ));
        }
        if !self.font.size_px.is_finite() || self.font.size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        validate_rect(self.frame, "text frame")
    }
}

impl PieWedge {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.center.is_finite()
            || !self.radius.is_finite()
            || self.radius < 0.0
            || !self.start_angle.is_finite()
            || !self.end_angle.is_finite()
        {
            return Err(ChartError::InvalidData(
                "pie wedge geometry must be finite".to_owned(),
            ));
        }
        if let Some(label) = &self.label {
            label.validate()?;
        }
        self.color.validate()
    }
}
