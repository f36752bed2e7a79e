use serde::{Deserialize, Serialize};

use crate::core::{Rect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::primitives::{
    AreaBand, BarSet, Color, LinePath, PieWedge, validate_rect,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub text: String,
    pub frame: Rect,
}

/// Gridlines as one-pixel-high rectangles spanning the axis width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridInfo {
    pub color: Color,
    pub lines: Vec<Rect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisInfo {
    pub text_color: Color,
    pub labels: Vec<AxisLabel>,
    pub grid: Option<GridInfo>,
}

impl AxisInfo {
    pub fn validate(&self) -> ChartResult<()> {
        self.text_color.validate()?;
        for label in &self.labels {
            if label.text.is_empty() {
                return Err(ChartError::InvalidData(
                    "axis label text must not be empty".to_owned(),
                ));
            }
            validate_rect(label.frame, "axis label frame")?;
        }
        if let Some(grid) = &self.grid {
            grid.color.validate()?;
            for line in &grid.lines {
                validate_rect(*line, "gridline")?;
            }
        }
        Ok(())
    }
}

/// Drawable data geometry of one pass, by chart kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum SeriesGeometry {
    #[default]
    Empty,
    Lines(Vec<LinePath>),
    /// Bar sets in draw order; highlighted sets come last.
    Bars(Vec<BarSet>),
    AreaBands {
        bands: Vec<AreaBand>,
        stroke_width: f64,
    },
    Pie(Vec<PieWedge>),
}

impl SeriesGeometry {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Lines(lines) => lines.is_empty(),
            Self::Bars(sets) => sets.is_empty(),
            Self::AreaBands { bands, .. } => bands.is_empty(),
            Self::Pie(wedges) => wedges.is_empty(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Empty => Ok(()),
            Self::Lines(lines) => lines.iter().try_for_each(LinePath::validate),
            Self::Bars(sets) => sets.iter().try_for_each(BarSet::validate),
            Self::AreaBands {
                bands,
                stroke_width,
            } => {
                if !stroke_width.is_finite() || *stroke_width < 0.0 {
                    return Err(ChartError::InvalidData(
                        "area stroke width must be finite and >= 0".to_owned(),
                    ));
                }
                bands.iter().try_for_each(AreaBand::validate)
            }
            Self::Pie(wedges) => wedges.iter().try_for_each(PieWedge::validate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub name: String,
    pub value: String,
    pub percent: Option<String>,
    /// Device y of the marker for this row.
    pub y: f64,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TooltipInfo {
    pub timestamp: f64,
    pub title: String,
    /// Device x of the selected timestamp.
    pub x: f64,
    pub guide_line_visible: bool,
    pub point_markers_visible: bool,
    pub rows: Vec<TooltipRow>,
    pub grid_color: Color,
}

impl TooltipInfo {
    pub fn validate(&self) -> ChartResult<()> {
        if !self.x.is_finite() || self.rows.iter().any(|row| !row.y.is_finite()) {
            return Err(ChartError::InvalidData(
                "tooltip positions must be finite".to_owned(),
            ));
        }
        self.grid_color.validate()
    }
}

/// Immutable result of one computation pass.
///
/// All fields were computed against the same dataset, window, viewport and
/// selection snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub generation: u64,
    pub viewport: Viewport,
    pub x_axis: Option<AxisInfo>,
    pub y_axis: Option<AxisInfo>,
    pub second_y_axis: Option<AxisInfo>,
    pub series: SeriesGeometry,
    pub tooltip: Option<TooltipInfo>,
    pub start_date_label: String,
    pub end_date_label: Option<String>,
    pub animating: bool,
}

impl ChartFrame {
    #[must_use]
    pub fn empty(generation: u64, viewport: Viewport) -> Self {
        Self {
            generation,
            viewport,
            x_axis: None,
            y_axis: None,
            second_y_axis: None,
            series: SeriesGeometry::Empty,
            tooltip: None,
            start_date_label: String::new(),
            end_date_label: None,
            animating: false,
        }
    }

    /// Axes that are present, in x, y, second-y order.
    pub fn axes(&self) -> impl Iterator<Item = &AxisInfo> {
        [&self.x_axis, &self.y_axis, &self.second_y_axis]
            .into_iter()
            .flatten()
    }

    /// Rejects non-finite geometry anywhere in the frame.
    pub fn validate(&self) -> ChartResult<()> {
        for rect in [self.viewport.plot_area, self.viewport.axis_area] {
            if !rect.is_finite() {
                return Err(ChartError::InvalidViewport {
                    width: rect.width,
                    height: rect.height,
                });
            }
        }
        for axis in self.axes() {
            axis.validate()?;
        }
        self.series.validate()?;
        if let Some(tooltip) = &self.tooltip {
            tooltip.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartFrame, SeriesGeometry};
    use crate::core::{Point, Rect, Viewport};
    use crate::render::{Color, LinePath};

    #[test]
    fn validate_rejects_non_finite_line_points() {
        let viewport = Viewport::uniform(Rect::new(0.0, 0.0, 100.0, 50.0)).expect("viewport");
        let mut frame = ChartFrame::empty(1, viewport);
        assert!(frame.validate().is_ok());
        assert!(frame.series.is_empty());

        frame.series = SeriesGeometry::Lines(vec![LinePath {
            color: Color::rgb(0.0, 0.0, 0.0),
            stroke_width: 1.5,
            points: vec![Point::new(0.0, f64::NAN)],
        }]);
        assert!(frame.validate().is_err());
    }
}
