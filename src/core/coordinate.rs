//! Pure conversions between data space and device pixels.
//!
//! Every function returns a finite value: a degenerate range or rectangle
//! maps to the rectangle's midpoint instead of dividing by zero.

use crate::core::range::{IntRange, TimeRange};
use crate::core::types::Rect;

/// Timestamp to device x, reserving `inset / 2` pixels at both edges.
#[must_use]
pub fn x_pixel(timestamp: f64, range: TimeRange, rect: Rect, inset: f64) -> f64 {
    let len = range.len();
    if len <= 0.0 || !len.is_finite() {
        return finite_or(rect.mid_x(), 0.0);
    }
    let value = rect.min_x() + inset / 2.0 + (timestamp - range.start) / len * (rect.width - inset);
    finite_or(value, finite_or(rect.mid_x(), 0.0))
}

/// Value to device y; larger values map to smaller y.
#[must_use]
pub fn y_pixel(value: i64, range: IntRange, rect: Rect) -> f64 {
    let len = range.len();
    if len <= 0 {
        return finite_or(rect.mid_y(), 0.0);
    }
    let fraction = (value as f64 - range.low as f64) / len as f64;
    let pixel = rect.min_y() + (1.0 - fraction) * rect.height;
    finite_or(pixel, finite_or(rect.mid_y(), 0.0))
}

/// Device x back to a timestamp, the inverse of [`x_pixel`].
#[must_use]
pub fn time_at_x(pixel: f64, range: TimeRange, rect: Rect, inset: f64) -> f64 {
    let usable = rect.width - inset;
    if usable <= 0.0 || !usable.is_finite() {
        return finite_or(range.at_fraction(0.5), 0.0);
    }
    let fraction = (pixel - rect.min_x() - inset / 2.0) / usable;
    finite_or(range.at_fraction(fraction), finite_or(range.start, 0.0))
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}
