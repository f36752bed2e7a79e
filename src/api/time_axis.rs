use crate::core::{Rect, Size, TimeRange, x_pixel};
use crate::render::{AxisLabel, FontSpec};

use super::label_format::{DateLabeler, DateStyle};
use super::label_priority::LabelPriorities;
use super::text_metrics::TextMeasurer;

/// Geometry shared by every X label of one pass.
#[derive(Debug, Clone, Copy)]
pub(super) struct XLabelLayout {
    pub axis: Rect,
    pub full: TimeRange,
    pub selected: TimeRange,
    pub bar_step: f64,
    pub label_size: Size,
    /// Fraction of the label width added around each frame for overlap tests.
    pub overlap_tolerance: f64,
}

impl XLabelLayout {
    /// Frame centered on the date's x, resting on the bottom of the axis.
    fn frame(&self, timestamp: f64, range: TimeRange) -> Rect {
        let center = x_pixel(timestamp, range, self.axis, self.bar_step);
        Rect::new(
            center - self.label_size.width / 2.0,
            self.axis.max_y() - self.label_size.height,
            self.label_size.width,
            self.label_size.height,
        )
    }

    fn widen(&self, frame: Rect) -> Rect {
        frame.inset_by(-self.label_size.width * self.overlap_tolerance / 2.0, 0.0)
    }

    /// Whether the label stays inside the axis when the current window is
    /// panned fully left and fully right.
    fn fits_pan_extremes(&self, timestamp: f64) -> bool {
        let window = self.selected.len();
        let leftmost = TimeRange::new(self.full.start, self.full.start + window);
        let rightmost = TimeRange::new(self.full.end - window, self.full.end);
        self.frame(timestamp, leftmost).min_x() >= self.axis.min_x()
            && self.frame(timestamp, rightmost).max_x() <= self.axis.max_x()
    }
}

/// Widest formatted axis date (rounded up) by the configured line height.
pub(super) fn measure_label_size(
    timestamps: &[f64],
    labeler: &mut DateLabeler,
    measurer: &dyn TextMeasurer,
    font: FontSpec,
    line_height_px: f64,
) -> Size {
    let width = timestamps
        .iter()
        .map(|&timestamp| {
            let text = labeler.format(timestamp, DateStyle::Axis);
            measurer.measure(&text, font).width
        })
        .fold(0.0, f64::max);
    Size::new(width.ceil(), line_height_px)
}

/// Greedy overlap-free label selection in descending priority, sorted by x.
pub(super) fn visible_x_labels(
    timestamps: &[f64],
    priorities: &LabelPriorities,
    layout: &XLabelLayout,
    labeler: &mut DateLabeler,
) -> Vec<AxisLabel> {
    let widened_axis = layout.widen(layout.axis);
    let mut accepted: Vec<(usize, Rect, Rect)> = Vec::new();

    for &index in priorities.ordered() {
        let Some(&timestamp) = timestamps.get(index) else {
            continue;
        };
        let frame = layout.frame(timestamp, layout.selected);
        if !frame.intersects(widened_axis) {
            continue;
        }
        let widened = layout.widen(frame);
        if accepted.iter().any(|(_, _, other)| other.intersects(widened)) {
            continue;
        }
        if !layout.fits_pan_extremes(timestamp) {
            continue;
        }
        accepted.push((index, frame, widened));
    }

    accepted.sort_by(|left, right| left.1.min_x().total_cmp(&right.1.min_x()));
    accepted
        .into_iter()
        .map(|(index, frame, _)| AxisLabel {
            text: labeler.format(timestamps[index], DateStyle::Axis),
            frame,
        })
        .collect()
}

/// One-pixel baseline at the bottom of the plot.
pub(super) fn x_baseline(plot: Rect, axis: Rect) -> Rect {
    Rect::new(axis.min_x(), plot.max_y() - 0.5, axis.width, 1.0)
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::{XLabelLayout, measure_label_size, visible_x_labels, x_baseline};
    use crate::api::label_format::{DateFormats, DateLabeler};
    use crate::api::label_priority::{PriorityInputs, resolve_label_priorities};
    use crate::api::text_metrics::EstimatedTextMeasurer;
    use crate::core::{Rect, Size, TimeRange};
    use crate::render::FontSpec;

    const START: f64 = 1_551_398_400.0;

    fn setup(count: usize) -> (Vec<f64>, DateLabeler, Size) {
        let timestamps: Vec<f64> = (0..count).map(|day| START + day as f64 * 86_400.0).collect();
        let utc = FixedOffset::east_opt(0).expect("utc");
        let mut labeler = DateLabeler::new(DateFormats::for_spacing(86_400.0), utc);
        let size = measure_label_size(
            &timestamps,
            &mut labeler,
            &EstimatedTextMeasurer::default(),
            FontSpec::regular(11.0),
            13.0,
        );
        (timestamps, labeler, size)
    }

    #[test]
    fn label_size_is_widest_date_rounded_up() {
        let (_, _, size) = setup(40);
        assert_eq!(size.height, 13.0);
        assert_eq!(size.width, size.width.ceil());
        assert!(size.width > 0.0);
    }

    #[test]
    fn zoomed_window_shows_non_overlapping_labels_inside_axis() {
        let (timestamps, mut labeler, size) = setup(365);
        let axis = Rect::new(0.0, 300.0, 320.0, 20.0);
        let priorities = resolve_label_priorities(
            PriorityInputs {
                timestamps: &timestamps,
                label_size: size,
                axis,
                spacing_ratio: 0.5,
                min_window_fraction: 0.05,
            },
            &mut StdRng::seed_from_u64(9),
        );
        let full = TimeRange::new(timestamps[0], timestamps[364]);
        for window in [(0.0, 1.0), (0.3, 0.5), (0.9, 1.0)] {
            let layout = XLabelLayout {
                axis,
                full,
                selected: TimeRange::new(full.at_fraction(window.0), full.at_fraction(window.1)),
                bar_step: 0.0,
                label_size: size,
                overlap_tolerance: 0.25,
            };
            let labels = visible_x_labels(&timestamps, &priorities, &layout, &mut labeler);
            assert!(labels.len() >= 2, "window {window:?} shows {} labels", labels.len());
            for pair in labels.windows(2) {
                assert!(pair[0].frame.max_x() <= pair[1].frame.min_x());
            }
            for label in &labels {
                assert_eq!(label.frame.max_y(), axis.max_y());
                assert!(label.frame.intersects(axis.inset_by(-size.width * 0.125, 0.0)));
            }
        }
    }

    #[test]
    fn baseline_sits_on_plot_bottom() {
        let line = x_baseline(Rect::new(0.0, 0.0, 200.0, 100.0), Rect::new(0.0, 0.0, 200.0, 120.0));
        assert_eq!(line, Rect::new(0.0, 99.5, 200.0, 1.0));
    }
}
