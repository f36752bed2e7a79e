use std::ops::Range;

use crate::core::range::TimeRange;
use crate::core::types::{DataPoint, VisibleWindow};

/// Maps a normalized window onto the dataset's full time range.
#[must_use]
pub fn selected_time_range(full: TimeRange, window: VisibleWindow) -> TimeRange {
    TimeRange::new(full.at_fraction(window.start()), full.at_fraction(window.end()))
}

/// Extends `selected` outward to the nearest point strictly outside each edge.
///
/// Falls back to the full range bound when no point lies beyond an edge.
/// `points` must be sorted by `x`.
#[must_use]
pub fn bordered_range(points: &[DataPoint], full: TimeRange, selected: TimeRange) -> TimeRange {
    let first_inside = points.partition_point(|point| point.x < selected.start);
    let start = if first_inside > 0 {
        points[first_inside - 1].x
    } else {
        full.start
    };

    let first_after = points.partition_point(|point| point.x <= selected.end);
    let end = points.get(first_after).map_or(full.end, |point| point.x);

    TimeRange::new(start.min(selected.start), end.max(selected.end))
}

/// Index span of the points whose `x` falls inside the closed range.
#[must_use]
pub fn points_in_time_range(points: &[DataPoint], range: TimeRange) -> Range<usize> {
    let start = points.partition_point(|point| point.x < range.start);
    let end = points.partition_point(|point| point.x <= range.end);
    start..end.max(start)
}

/// Index of the point whose timestamp is nearest to `x` (earlier point on ties).
#[must_use]
pub fn nearest_index(points: &[DataPoint], x: f64) -> Option<usize> {
    if points.is_empty() || !x.is_finite() {
        return None;
    }
    let upper = points.partition_point(|point| point.x < x);
    if upper == 0 {
        return Some(0);
    }
    if upper == points.len() {
        return Some(points.len() - 1);
    }
    let before = x - points[upper - 1].x;
    let after = points[upper].x - x;
    Some(if after < before { upper } else { upper - 1 })
}

/// Exact-match index lookup for an already snapped timestamp.
#[must_use]
pub fn index_of(points: &[DataPoint], x: f64) -> Option<usize> {
    let index = points.partition_point(|point| point.x < x);
    (points.get(index)?.x == x).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::{bordered_range, index_of, nearest_index, points_in_time_range};
    use crate::core::{DataPoint, TimeRange};

    fn points() -> Vec<DataPoint> {
        (0..10).map(|i| DataPoint::new(f64::from(i) * 10.0, i64::from(i))).collect()
    }

    #[test]
    fn bordered_range_reaches_first_point_outside_each_edge() {
        let points = points();
        let full = TimeRange::new(0.0, 90.0);

        let bordered = bordered_range(&points, full, TimeRange::new(25.0, 55.0));
        assert_eq!(bordered, TimeRange::new(20.0, 60.0));

        let on_points = bordered_range(&points, full, TimeRange::new(30.0, 50.0));
        assert_eq!(on_points, TimeRange::new(20.0, 60.0));

        assert_eq!(bordered_range(&points, full, full), full);
    }

    #[test]
    fn index_helpers_snap_and_slice() {
        let points = points();
        assert_eq!(points_in_time_range(&points, TimeRange::new(15.0, 40.0)), 2..5);
        assert_eq!(nearest_index(&points, 14.0), Some(1));
        assert_eq!(nearest_index(&points, 15.0), Some(1));
        assert_eq!(nearest_index(&points, 16.0), Some(2));
        assert_eq!(nearest_index(&points, -5.0), Some(0));
        assert_eq!(nearest_index(&points, 500.0), Some(9));
        assert_eq!(nearest_index(&[], 1.0), None);
        assert_eq!(index_of(&points, 40.0), Some(4));
        assert_eq!(index_of(&points, 41.0), None);
    }
}
