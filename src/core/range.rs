use serde::{Deserialize, Serialize};

/// Closed integer range `low..=high` used for value axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntRange {
    pub low: i64,
    pub high: i64,
}

impl IntRange {
    /// Builds an ordered range regardless of argument order.
    #[must_use]
    pub fn new(a: i64, b: i64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    #[must_use]
    pub fn len(self) -> i64 {
        self.high.saturating_sub(self.low)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(self, value: i64) -> bool {
        value >= self.low && value <= self.high
    }

    #[must_use]
    pub fn contains_range(self, other: Self) -> bool {
        other.low >= self.low && other.high <= self.high
    }
}

/// Closed time range in unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    #[must_use]
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() <= 0.0
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.start && value <= self.end
    }

    #[must_use]
    pub fn contains_range(self, other: Self) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Timestamp at a normalized position inside the range.
    #[must_use]
    pub fn at_fraction(self, fraction: f64) -> f64 {
        self.start + self.len() * fraction
    }
}

/// Rounds a positive value to one significant digit.
///
/// `0.137 -> 0.1`, `137 -> 100`, `180 -> 200`, `96 -> 100`. The magnitude is
/// taken as the ceiling of `log10` so the kept digit is always the leading one.
/// Non-positive or non-finite input yields `0.0`.
#[must_use]
pub fn round_to_next_significant(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        return 0.0;
    }
    let exponent = value.log10().ceil() as i32;
    let unit = 10f64.powi(exponent - 1);
    let rounded = (value / unit).round() * unit;
    if rounded > 0.0 { rounded } else { unit }
}

/// Rounding direction used when snapping to the device pixel grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelRounding {
    Nearest,
    Up,
    Down,
}

/// Device pixel grid (`scale` physical pixels per logical point).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenScale {
    scale: f64,
}

impl ScreenScale {
    /// Non-finite or non-positive scales fall back to `1.0`.
    #[must_use]
    pub fn new(scale: f64) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        };
        Self { scale }
    }

    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    /// Width of one physical pixel in logical points.
    #[must_use]
    pub fn hairline(self) -> f64 {
        1.0 / self.scale
    }

    #[must_use]
    pub fn round(self, value: f64, rule: PixelRounding) -> f64 {
        let scaled = value * self.scale;
        let snapped = match rule {
            PixelRounding::Nearest => scaled.round(),
            PixelRounding::Up => scaled.ceil(),
            PixelRounding::Down => scaled.floor(),
        };
        snapped / self.scale
    }
}

impl Default for ScreenScale {
    fn default() -> Self {
        Self::new(1.0)
    }
}
