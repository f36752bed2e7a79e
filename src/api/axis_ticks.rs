use crate::core::{IntRange, Rect, round_to_next_significant, y_pixel};
use crate::render::{AxisLabel, FontSpec};

use super::label_format::shortened_value;
use super::text_metrics::TextMeasurer;

/// Number of gridline intervals aimed for across a value range.
pub(super) const TARGET_INTERVALS: f64 = 6.0;

/// Gridline interval and first gridline value of one value axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    pub interval: f64,
    pub first: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YTick {
    pub value: i64,
    pub y: f64,
}

/// Interval `round_to_next_significant(span / 6)` (at least 1), first tick at
/// the smallest multiple of the interval not below `range.low`.
#[must_use]
pub fn tick_plan(range: IntRange) -> TickPlan {
    let interval = round_to_next_significant(range.len() as f64 / TARGET_INTERVALS).max(1.0);
    let first = (range.low as f64 / interval).ceil() * interval;
    TickPlan { interval, first }
}

/// Plan for `own` whose gridlines line up with the plan of `reference`.
///
/// Interval and first-tick offset are scaled by `own.len / reference.len` and
/// rounded up.
#[must_use]
pub fn aligned_tick_plan(own: IntRange, reference: IntRange) -> TickPlan {
    if reference.is_empty() {
        return tick_plan(own);
    }
    let reference_plan = tick_plan(reference);
    let multiplier = own.len() as f64 / reference.len() as f64;
    let interval = (reference_plan.interval * multiplier).ceil().max(1.0);
    let first = ((reference_plan.first - reference.low as f64) * multiplier + own.low as f64).ceil();
    TickPlan { interval, first }
}

/// Gridline values from `plan.first` through `range.high + interval` whose
/// pixel position lies inside `plot`.
#[must_use]
pub fn y_ticks(range: IntRange, plan: TickPlan, plot: Rect) -> Vec<YTick> {
    let mut ticks = Vec::new();
    if !plan.interval.is_finite() || plan.interval <= 0.0 || !plan.first.is_finite() {
        return ticks;
    }
    let last = range.high as f64 + plan.interval;
    let mut step = 0u32;
    loop {
        let raw = plan.first + f64::from(step) * plan.interval;
        if raw > last {
            break;
        }
        let value = raw as i64;
        let y = y_pixel(value, range, plot);
        if y >= plot.min_y() && y <= plot.max_y() {
            ticks.push(YTick { value, y });
        }
        step += 1;
    }
    ticks
}

/// Value labels sitting `gap_px` above their gridline.
///
/// The first axis is left aligned in `axis`, the second right aligned. Labels
/// whose top would leave the axis rectangle are dropped.
pub(super) fn y_axis_labels(
    ticks: &[YTick],
    measurer: &dyn TextMeasurer,
    font: FontSpec,
    line_height_px: f64,
    axis: Rect,
    second_axis: bool,
    gap_px: f64,
) -> Vec<AxisLabel> {
    ticks
        .iter()
        .filter_map(|tick| {
            let text = shortened_value(tick.value);
            let width = measurer.measure(&text, font).width;
            let y = tick.y - gap_px - line_height_px;
            if y <= axis.min_y() {
                return None;
            }
            let x = if second_axis {
                axis.max_x() - width
            } else {
                axis.min_x()
            };
            Some(AxisLabel {
                text,
                frame: Rect::new(x, y, width, line_height_px),
            })
        })
        .collect()
}

/// One-pixel-high gridline rectangles centered on each tick.
pub(super) fn gridlines(ticks: &[YTick], axis: Rect) -> Vec<Rect> {
    ticks
        .iter()
        .map(|tick| Rect::new(axis.min_x(), tick.y - 0.5, axis.width, 1.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{TickPlan, aligned_tick_plan, tick_plan, y_axis_labels, y_ticks};
    use crate::api::text_metrics::EstimatedTextMeasurer;
    use crate::core::{IntRange, Rect};
    use crate::render::FontSpec;

    #[test]
    fn plan_uses_one_significant_digit_of_sixth_span() {
        assert_eq!(
            tick_plan(IntRange::new(0, 600)),
            TickPlan {
                interval: 100.0,
                first: 0.0
            }
        );
        assert_eq!(tick_plan(IntRange::new(13, 1_213)).interval, 200.0);
        assert_eq!(tick_plan(IntRange::new(13, 1_213)).first, 200.0);
        assert_eq!(tick_plan(IntRange::new(0, 3)).interval, 1.0);
    }

    #[test]
    fn aligned_plan_scales_reference_interval() {
        let plan = aligned_tick_plan(IntRange::new(0, 60), IntRange::new(0, 600));
        assert_eq!(plan.interval, 10.0);
        assert_eq!(plan.first, 0.0);
    }

    #[test]
    fn ticks_stay_inside_plot_and_include_top() {
        let plot = Rect::new(0.0, 10.0, 100.0, 300.0);
        let range = IntRange::new(0, 600);
        let ticks = y_ticks(range, tick_plan(range), plot);
        let values: Vec<_> = ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values, vec![0, 100, 200, 300, 400, 500, 600]);
        assert_eq!(ticks[0].y, 310.0);
        assert_eq!(ticks[6].y, 10.0);
    }

    #[test]
    fn labels_above_axis_top_are_dropped() {
        let plot = Rect::new(0.0, 10.0, 100.0, 300.0);
        let range = IntRange::new(0, 60_000);
        let ticks = y_ticks(range, tick_plan(range), plot);
        let labels = y_axis_labels(
            &ticks,
            &EstimatedTextMeasurer::default(),
            FontSpec::regular(11.0),
            13.0,
            plot,
            true,
            4.0,
        );
        assert_eq!(labels.len(), ticks.len() - 1);
        assert_eq!(labels[0].text, "0");
        assert_eq!(labels.last().expect("label").text, "50K");
        assert!((labels[0].frame.max_x() - 100.0).abs() <= 1e-9);
    }
}
