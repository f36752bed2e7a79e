use crate::core::windowing::index_of;
use crate::core::{ChartKind, Dataset, IntRange, PreparedDataset, Rect, TimeRange, x_pixel, y_pixel};
use crate::render::{Color, TooltipInfo, TooltipRow};

use super::label_format::{DateLabeler, DateStyle, grouped_value};

pub(super) const TOTAL_ROW_NAME: &str = "All";

#[derive(Debug, Clone, Copy)]
pub(super) struct TooltipInputs<'a> {
    pub dataset: &'a Dataset,
    pub prepared: &'a PreparedDataset,
    pub timestamp: f64,
    pub plot: Rect,
    pub axis: Rect,
    pub selected: TimeRange,
    pub bar_step: f64,
    pub y_range: Option<IntRange>,
    pub second_y_range: Option<IntRange>,
    pub grid_color: Color,
    pub total_text_color: Color,
}

impl TooltipInputs<'_> {
    fn marker_y(&self, value: i64, range: Option<IntRange>) -> f64 {
        range.map_or(self.plot.mid_y(), |range| y_pixel(value, range, self.plot))
    }
}

/// Tooltip for the selected timestamp, or `None` when it is not a data point
/// or no series is visible.
pub(super) fn tooltip_info(
    inputs: &TooltipInputs<'_>,
    labeler: &mut DateLabeler,
) -> Option<TooltipInfo> {
    let dataset = inputs.dataset;
    let visible = inputs.prepared.visible();
    if visible.is_empty() {
        return None;
    }
    let index = index_of(&dataset.series().first()?.points, inputs.timestamp)?;
    let kind = dataset.kind();
    let series = dataset.series();
    let percents = inputs.prepared.percents_at(dataset, index);

    let mut rows = Vec::with_capacity(visible.len() + 1);
    let mut sum = 0_i64;
    for (position, &series_index) in visible.iter().enumerate() {
        let current = &series[series_index];
        let value = current.points[index].y;
        let y = if dataset.stacked() {
            sum = sum.saturating_add(value);
            inputs.marker_y(sum, inputs.y_range)
        } else if dataset.second_axis_series() == Some(series_index) {
            inputs.marker_y(value, inputs.second_y_range)
        } else {
            inputs.marker_y(value, inputs.y_range)
        };
        rows.push(TooltipRow {
            name: current.name.clone(),
            value: grouped_value(value),
            percent: percents
                .as_ref()
                .and_then(|percents| percents.get(position))
                .map(|percent| format!("{percent}%")),
            y,
            color: current.color,
        });
    }

    if kind == ChartKind::Bar && dataset.stacked() {
        rows.push(TooltipRow {
            name: TOTAL_ROW_NAME.to_owned(),
            value: grouped_value(sum),
            percent: None,
            y: inputs.marker_y(sum, inputs.y_range),
            color: inputs.total_text_color,
        });
    }

    Some(TooltipInfo {
        timestamp: inputs.timestamp,
        title: labeler.format(inputs.timestamp, DateStyle::Tooltip),
        x: x_pixel(inputs.timestamp, inputs.selected, inputs.axis, inputs.bar_step),
        guide_line_visible: kind != ChartKind::Bar,
        point_markers_visible: kind == ChartKind::Line,
        rows,
        grid_color: inputs.grid_color,
    })
}
