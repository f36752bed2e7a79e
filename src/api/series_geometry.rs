use std::collections::HashSet;
use std::ops::Range;

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::windowing::points_in_time_range;
use crate::core::{
    ChartKind, Dataset, IntRange, PixelRounding, Point, PreparedDataset, Rect,
    ScreenScale, TimeRange, x_pixel, y_pixel,
};
use crate::render::{AreaBand, BarSet, Color, LinePath, SeriesGeometry};

const MAX_BAR_STEP_ITERATIONS: usize = 32;

/// Pixel width of one bar: the distance between the first two timestamps when
/// that same width is reserved as inset, rounded up to the device grid.
///
/// Zero for non-bar charts and single-point datasets.
pub(super) fn bar_step(
    dataset: &Dataset,
    selected: TimeRange,
    axis: Rect,
    screen: ScreenScale,
) -> f64 {
    if dataset.kind() != ChartKind::Bar || dataset.len() < 2 || selected.is_empty() {
        return 0.0;
    }
    let delta = dataset.timestamp(1) - dataset.timestamp(0);
    let mut seen = HashSet::new();
    let mut step = 0.0_f64;
    for _ in 0..MAX_BAR_STEP_ITERATIONS {
        let next = screen.round(delta / selected.len() * (axis.width - step), PixelRounding::Up);
        if !next.is_finite() {
            return 0.0;
        }
        let next = next.max(0.0);
        if next == step || !seen.insert(next.to_bits()) {
            step = step.max(next);
            break;
        }
        step = next;
    }
    step
}

/// Everything the per-kind generators read during one pass.
#[derive(Debug, Clone, Copy)]
pub(super) struct GeometryInputs<'a> {
    pub dataset: &'a Dataset,
    pub prepared: &'a PreparedDataset,
    pub plot: Rect,
    pub axis: Rect,
    /// Time range mapped onto the axis width.
    pub selected: TimeRange,
    /// Time range whose points are emitted.
    pub bordered: TimeRange,
    pub bar_step: f64,
    pub y_range: Option<IntRange>,
    pub second_y_range: Option<IntRange>,
    pub selected_index: Option<usize>,
    pub line_width: f64,
    pub screen: ScreenScale,
    pub non_selected_mask: Color,
}

impl GeometryInputs<'_> {
    fn x(&self, timestamp: f64) -> f64 {
        x_pixel(timestamp, self.selected, self.axis, self.bar_step)
    }

    /// Range a series is scaled by; the last series uses the second range in dual mode.
    fn range_for(&self, series_index: usize) -> Option<IntRange> {
        if self.dataset.second_axis_series() == Some(series_index) {
            self.second_y_range
        } else {
            self.y_range
        }
    }

    fn point_span(&self) -> Range<usize> {
        self.dataset
            .series()
            .first()
            .map_or(0..0, |series| points_in_time_range(&series.points, self.bordered))
    }
}

/// Drawable geometry for the dataset's chart kind.
pub(super) fn series_geometry(inputs: &GeometryInputs<'_>) -> SeriesGeometry {
    if inputs.prepared.visible().is_empty() {
        return SeriesGeometry::Empty;
    }
    match (inputs.dataset.kind(), inputs.dataset.stacked()) {
        (ChartKind::Line, _) => SeriesGeometry::Lines(line_paths(inputs)),
        (ChartKind::Bar, false) => SeriesGeometry::Bars(bar_sets(inputs)),
        (ChartKind::Bar, true) => SeriesGeometry::Bars(stacked_bar_sets(inputs)),
        (ChartKind::Area, _) => SeriesGeometry::AreaBands {
            bands: area_bands(inputs),
            stroke_width: inputs.screen.hairline(),
        },
    }
}

fn line_path(inputs: &GeometryInputs<'_>, series_index: usize) -> Option<LinePath> {
    let series = &inputs.dataset.series()[series_index];
    let range = inputs.range_for(series_index)?;
    let span = points_in_time_range(&series.points, inputs.bordered);
    let points = series.points[span]
        .iter()
        .map(|point| Point::new(inputs.x(point.x), y_pixel(point.y, range, inputs.plot)))
        .collect();
    Some(LinePath {
        color: series.color,
        stroke_width: inputs.line_width,
        points,
    })
}

#[cfg(not(feature = "parallel-projection"))]
fn line_paths(inputs: &GeometryInputs<'_>) -> Vec<LinePath> {
    inputs
        .prepared
        .visible()
        .iter()
        .filter_map(|&series_index| line_path(inputs, series_index))
        .collect()
}

#[cfg(feature = "parallel-projection")]
fn line_paths(inputs: &GeometryInputs<'_>) -> Vec<LinePath> {
    inputs
        .prepared
        .visible()
        .par_iter()
        .filter_map(|&series_index| line_path(inputs, series_index))
        .collect()
}

/// Rect between two device y values, whichever is on top.
fn vertical_span(x: f64, width: f64, a: f64, b: f64) -> Rect {
    let top = a.min(b);
    Rect::new(x, top, width, (a.max(b) - top).max(0.0))
}

/// Splits per-column rects into dimmed sets and the highlighted column.
fn split_selection(
    inputs: &GeometryInputs<'_>,
    colors: &[Color],
    columns: &[(usize, Vec<Rect>)],
) -> Vec<BarSet> {
    let Some(selected) = inputs.selected_index else {
        return colors
            .iter()
            .enumerate()
            .map(|(row, &color)| BarSet {
                color,
                rects: columns.iter().filter_map(|(_, rects)| rects.get(row).copied()).collect(),
                highlighted: false,
            })
            .collect();
    };

    let mut sets: Vec<BarSet> = colors
        .iter()
        .enumerate()
        .map(|(row, &color)| BarSet {
            color: color.blended_with(inputs.non_selected_mask),
            rects: columns
                .iter()
                .filter(|(index, _)| *index != selected)
                .filter_map(|(_, rects)| rects.get(row).copied())
                .collect(),
            highlighted: false,
        })
        .collect();
    sets.extend(colors.iter().enumerate().map(|(row, &color)| BarSet {
        color,
        rects: columns
            .iter()
            .filter(|(index, _)| *index == selected)
            .filter_map(|(_, rects)| rects.get(row).copied())
            .collect(),
        highlighted: true,
    }));
    sets
}

fn bar_left(inputs: &GeometryInputs<'_>, timestamp: f64) -> f64 {
    inputs
        .screen
        .round(inputs.x(timestamp) - inputs.bar_step / 2.0, PixelRounding::Down)
}

fn bar_sets(inputs: &GeometryInputs<'_>) -> Vec<BarSet> {
    let series = inputs.dataset.series();
    let visible = inputs.prepared.visible();
    let colors: Vec<Color> = visible.iter().map(|&index| series[index].color).collect();
    let bottom = inputs.plot.max_y();

    let columns: Vec<(usize, Vec<Rect>)> = inputs
        .point_span()
        .map(|index| {
            let timestamp = inputs.dataset.timestamp(index);
            let left = bar_left(inputs, timestamp);
            let rects = visible
                .iter()
                .filter_map(|&series_index| {
                    let range = inputs.range_for(series_index)?;
                    let value = series[series_index].points[index].y;
                    let top = y_pixel(value, range, inputs.plot).min(bottom);
                    Some(vertical_span(left, inputs.bar_step, top, bottom))
                })
                .collect();
            (index, rects)
        })
        .collect();
    split_selection(inputs, &colors, &columns)
}

fn stacked_bar_sets(inputs: &GeometryInputs<'_>) -> Vec<BarSet> {
    let series = inputs.dataset.series();
    let visible = inputs.prepared.visible();
    let colors: Vec<Color> = visible.iter().map(|&index| series[index].color).collect();
    let Some(range) = inputs.y_range else {
        return Vec::new();
    };
    let stacked = inputs.prepared.stacked_values();

    let columns: Vec<(usize, Vec<Rect>)> = inputs
        .point_span()
        .filter_map(|index| {
            let column = stacked.get(index)?;
            let left = bar_left(inputs, column.x);
            let mut lower = inputs.plot.max_y();
            let mut sum = 0_i64;
            let rects = column
                .values
                .iter()
                .map(|&value| {
                    sum = sum.saturating_add(value);
                    let upper = inputs
                        .screen
                        .round(y_pixel(sum, range, inputs.plot), PixelRounding::Nearest);
                    let rect = vertical_span(left, inputs.bar_step, upper, lower);
                    lower = upper;
                    rect
                })
                .collect();
            Some((index, rects))
        })
        .collect();
    split_selection(inputs, &colors, &columns)
}

/// Closed polygon: `upper` left to right, then `lower` right to left.
fn band_polygon(upper: &[Point], lower: &[Point]) -> Vec<Point> {
    let mut polygon = Vec::with_capacity(upper.len() + lower.len());
    polygon.extend_from_slice(upper);
    polygon.extend(lower.iter().rev().copied());
    polygon
}

fn area_bands(inputs: &GeometryInputs<'_>) -> Vec<AreaBand> {
    let series = inputs.dataset.series();
    let visible = inputs.prepared.visible();
    let span = inputs.point_span();
    let plot = inputs.plot;
    let xs: Vec<f64> = span
        .clone()
        .map(|index| inputs.x(inputs.dataset.timestamp(index)))
        .collect();
    let baseline: Vec<Point> = xs.iter().map(|&x| Point::new(x, plot.max_y())).collect();

    if !inputs.dataset.stacked() {
        return visible
            .iter()
            .filter_map(|&series_index| {
                let range = inputs.range_for(series_index)?;
                let line: Vec<Point> = span
                    .clone()
                    .zip(&xs)
                    .map(|(index, &x)| {
                        Point::new(x, y_pixel(series[series_index].points[index].y, range, plot))
                    })
                    .collect();
                Some(AreaBand {
                    color: series[series_index].color,
                    polygon: band_polygon(&line, &baseline),
                })
            })
            .collect();
    }

    let mut boundaries: Vec<Vec<Point>> = vec![baseline];
    if inputs.dataset.percentage() {
        let columns = &inputs.prepared.stacked_percent_values()[span.clone()];
        for band in 0..visible.len() {
            let last = band + 1 == visible.len();
            let boundary = columns
                .iter()
                .zip(&xs)
                .map(|(column, &x)| {
                    if last {
                        return Point::new(x, plot.min_y());
                    }
                    let share: f64 = column.shares[..=band].iter().sum();
                    Point::new(x, plot.min_y() + (1.0 - share / 100.0) * plot.height)
                })
                .collect();
            boundaries.push(boundary);
        }
    } else {
        let Some(range) = inputs.y_range else {
            return Vec::new();
        };
        let columns = &inputs.prepared.stacked_values()[span.clone()];
        for band in 0..visible.len() {
            let boundary = columns
                .iter()
                .zip(&xs)
                .map(|(column, &x)| {
                    let sum = column.values[..=band]
                        .iter()
                        .copied()
                        .fold(0_i64, i64::saturating_add);
                    Point::new(x, y_pixel(sum, range, plot))
                })
                .collect();
            boundaries.push(boundary);
        }
    }

    visible
        .iter()
        .enumerate()
        .map(|(band, &series_index)| AreaBand {
            color: series[series_index].color,
            polygon: band_polygon(&boundaries[band + 1], &boundaries[band]),
        })
        .collect()
}
