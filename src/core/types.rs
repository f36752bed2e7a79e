use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Device-space point.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned device rectangle with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    #[must_use]
    pub fn min_x(self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn max_x(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn min_y(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn max_y(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn mid_x(self) -> f64 {
        self.x + self.width / 2.0
    }

    #[must_use]
    pub fn mid_y(self) -> f64 {
        self.y + self.height / 2.0
    }

    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.mid_x(), self.mid_y())
    }

    /// Grows (negative `dx`) or shrinks (positive `dx`) the rect horizontally on both sides.
    #[must_use]
    pub fn inset_by(self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    #[must_use]
    pub fn offset_by(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Strict intersection: rects that only touch along an edge do not intersect.
    #[must_use]
    pub fn intersects(self, other: Self) -> bool {
        self.min_x() < other.max_x()
            && other.min_x() < self.max_x()
            && self.min_y() < other.max_y()
            && other.min_y() < self.max_y()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// The two device rectangles the engine lays out against.
///
/// `plot_area` receives series geometry, `axis_area` receives labels and
/// gridlines. They usually share an x extent and differ by vertical insets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub plot_area: Rect,
    pub axis_area: Rect,
}

impl Viewport {
    pub fn new(plot_area: Rect, axis_area: Rect) -> ChartResult<Self> {
        for rect in [plot_area, axis_area] {
            if !rect.is_finite() || rect.width < 0.0 || rect.height < 0.0 {
                return Err(ChartError::InvalidViewport {
                    width: rect.width,
                    height: rect.height,
                });
            }
        }
        Ok(Self {
            plot_area,
            axis_area,
        })
    }

    /// Viewport where labels share the plot rectangle.
    pub fn uniform(area: Rect) -> ChartResult<Self> {
        Self::new(area, area)
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.plot_area.width > 0.0
            && self.plot_area.height > 0.0
            && self.axis_area.width > 0.0
            && self.axis_area.height > 0.0
    }
}

/// One sample of a series: unix timestamp in seconds and an integer value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: i64,
}

impl DataPoint {
    #[must_use]
    pub const fn new(x: f64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Normalized `[start, end]` fraction of the dataset's full time range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibleWindow {
    start: f64,
    end: f64,
}

impl VisibleWindow {
    /// Clamps both ends into `[0, 1]` and orders them.
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        let clamp = |value: f64| {
            if value.is_finite() {
                value.clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        let (start, end) = (clamp(start), clamp(end));
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
        }
    }

    #[must_use]
    pub fn start(self) -> f64 {
        self.start
    }

    #[must_use]
    pub fn end(self) -> f64 {
        self.end
    }

    #[must_use]
    pub fn len(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len() <= 0.0
    }
}

impl Default for VisibleWindow {
    fn default() -> Self {
        Self::full()
    }
}

#[cfg(test)]
mod tests {
    use super::{Rect, VisibleWindow, Viewport};

    #[test]
    fn visible_window_orders_and_clamps() {
        let window = VisibleWindow::new(1.4, 0.25);
        assert_eq!(window.start(), 0.25);
        assert_eq!(window.end(), 1.0);

        let nan = VisibleWindow::new(f64::NAN, 0.5);
        assert_eq!(nan.start(), 0.0);
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let left = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!left.intersects(right));
        assert!(left.intersects(right.offset_by(-0.5, 0.0)));
    }

    #[test]
    fn viewport_rejects_negative_and_non_finite_sizes() {
        assert!(Viewport::uniform(Rect::new(0.0, 0.0, -1.0, 10.0)).is_err());
        assert!(Viewport::uniform(Rect::new(0.0, f64::NAN, 1.0, 10.0)).is_err());

        let zero = Viewport::uniform(Rect::new(0.0, 0.0, 0.0, 0.0)).expect("zero is allowed");
        assert!(!zero.is_valid());
    }
}
