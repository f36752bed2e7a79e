use crate::core::{DataPoint, IntRange, StackedColumn, TimeRange};
use crate::core::windowing::points_in_time_range;

/// Headroom divisor: ranges are padded by `span / 20` on each side.
const PAD_DIVISOR: i64 = 20;

/// Fixed range of percent-stacked charts.
pub const PERCENT_RANGE: IntRange = IntRange { low: 0, high: 100 };

/// Padded extrema of the values in `bordered`.
///
/// `pad = (max - min) / 20` (integer division) is applied to both ends.
/// `floor_at_zero` includes 0 in the minimum (bar charts). Non-negative data is
/// never padded below 0. Returns `None` when no value falls in range.
pub(super) fn padded_range<'a>(
    series: impl IntoIterator<Item = &'a [DataPoint]>,
    bordered: TimeRange,
    floor_at_zero: bool,
) -> Option<IntRange> {
    let mut extrema: Option<(i64, i64)> = None;
    for points in series {
        for point in &points[points_in_time_range(points, bordered)] {
            extrema = Some(match extrema {
                Some((min, max)) => (min.min(point.y), max.max(point.y)),
                None => (point.y, point.y),
            });
        }
    }
    let (mut min, max) = extrema?;
    if floor_at_zero {
        min = min.min(0);
    }
    let pad = max.saturating_sub(min) / PAD_DIVISOR;
    let mut low = min.saturating_sub(pad);
    if min >= 0 {
        low = low.max(0);
    }
    Some(IntRange::new(low, max.saturating_add(pad)))
}

/// `0 ..= maxColumnSum + maxColumnSum / 20` over the columns in `bordered`.
pub(super) fn stacked_range(columns: &[StackedColumn], bordered: TimeRange) -> IntRange {
    let max_sum = columns
        .iter()
        .filter(|column| bordered.contains(column.x))
        .map(StackedColumn::sum)
        .max()
        .unwrap_or(0)
        .max(0);
    IntRange::new(0, max_sum.saturating_add(max_sum / PAD_DIVISOR))
}
