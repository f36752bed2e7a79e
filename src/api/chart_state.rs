//! Synchronous computation core.
//!
//! [`ChartComputation`] owns one copy of every input and turns it into a
//! [`ChartFrame`] per pass. The worker lane in [`crate::api::ChartEngine`]
//! drives it from a background thread; tests and embedding hosts can drive it
//! directly with a [`ManualClock`](crate::api::ManualClock).

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, trace, warn};

use crate::core::windowing::{bordered_range, index_of, nearest_index, selected_time_range};
use crate::core::{
    AnimatedRange, ChartKind, Dataset, IntRange, PreparedDataset, Rect, SeriesId, Size, TimeRange,
    Viewport, VisibleWindow, time_at_x,
};
use crate::error::ChartResult;
use crate::render::{AxisInfo, ChartFrame, Color, GridInfo, SeriesGeometry};

use super::axis_ticks::{TickPlan, aligned_tick_plan, gridlines, tick_plan, y_axis_labels, y_ticks};
use super::clock::{Clock, MonotonicClock};
use super::engine_config::EngineConfig;
use super::label_format::{DateFormats, DateLabeler, DateStyle};
use super::label_priority::{LabelPriorities, PriorityInputs, resolve_label_priorities};
use super::pie::{PieLayout, pie_wedges};
use super::scheduler::{PendingUpdate, SelectionRequest};
use super::series_geometry::{GeometryInputs, bar_step, series_geometry};
use super::text_metrics::{EstimatedTextMeasurer, TextMeasurer};
use super::time_axis::{XLabelLayout, measure_label_size, visible_x_labels, x_baseline};
use super::tooltip::{TooltipInputs, tooltip_info};
use super::value_range::{PERCENT_RANGE, padded_range, stacked_range};

#[derive(Debug, Clone, Copy)]
struct YAxisSlot {
    plot: Rect,
    axis: Rect,
    /// Right-aligned labels.
    second_axis: bool,
}

/// Y targets of one pass before animation.
#[derive(Debug, Clone, Copy, Default)]
struct RangeTargets {
    first: Option<IntRange>,
    second: Option<IntRange>,
    /// Percent charts jump straight to `0..=100`.
    snap: bool,
}

pub struct ChartComputation {
    config: EngineConfig,
    clock: Box<dyn Clock>,
    measurer: Box<dyn TextMeasurer>,
    rng: StdRng,
    dataset: Option<Dataset>,
    prepared: PreparedDataset,
    timestamps: Vec<f64>,
    window: VisibleWindow,
    viewport: Option<Viewport>,
    selection: SelectionRequest,
    zoomed: bool,
    y_range: AnimatedRange,
    second_y_range: AnimatedRange,
    labeler: DateLabeler,
    label_size: Size,
    priorities: Option<LabelPriorities>,
    priorities_axis: Option<Rect>,
    last_bar_step: f64,
    generation: u64,
}

impl std::fmt::Debug for ChartComputation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartComputation")
            .field("generation", &self.generation)
            .field("window", &self.window)
            .field("viewport", &self.viewport)
            .field("selection", &self.selection)
            .field("zoomed", &self.zoomed)
            .field("series", &self.dataset.as_ref().map(|dataset| dataset.series().len()))
            .finish_non_exhaustive()
    }
}

impl ChartComputation {
    pub fn new(config: EngineConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            clock: Box::new(MonotonicClock::new()),
            measurer: Box::new(EstimatedTextMeasurer::default()),
            rng: StdRng::seed_from_u64(config.label_jitter_seed),
            dataset: None,
            prepared: PreparedDataset::default(),
            timestamps: Vec::new(),
            window: VisibleWindow::full(),
            viewport: None,
            selection: SelectionRequest::Timestamp(None),
            zoomed: false,
            y_range: AnimatedRange::new(config.animation_duration()),
            second_y_range: AnimatedRange::new(config.animation_duration()),
            labeler: DateLabeler::new(DateFormats::default(), config.utc_offset()),
            label_size: Size::default(),
            priorities: None,
            priorities_axis: None,
            last_bar_step: 0.0,
            generation: 0,
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[must_use]
    pub fn with_text_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Box::new(measurer);
        if self.dataset.is_some() {
            self.remeasure_labels();
        }
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    #[must_use]
    pub fn visible_window(&self) -> VisibleWindow {
        self.window
    }

    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    #[must_use]
    pub fn zoomed(&self) -> bool {
        self.zoomed
    }

    /// Generation of the most recent frame, `0` before the first pass.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bar width of the most recent pass, `0` for non-bar charts.
    #[must_use]
    pub fn bar_step(&self) -> f64 {
        self.last_bar_step
    }

    /// Label size used by the X axis, measured once per dataset.
    #[must_use]
    pub fn label_size(&self) -> Size {
        self.label_size
    }

    /// Selected timestamp snapped to the nearest date of the dataset.
    #[must_use]
    pub fn selected_timestamp(&self) -> Option<f64> {
        let SelectionRequest::Timestamp(Some(raw)) = self.selection else {
            return None;
        };
        let points = &self.dataset.as_ref()?.series().first()?.points;
        nearest_index(points, raw).map(|index| points[index].x)
    }

    /// Both dataset and viewport are known.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.dataset.is_some() && self.viewport.is_some()
    }

    /// Whether either Y range is still transitioning.
    #[must_use]
    pub fn animating(&self) -> bool {
        self.y_range.animating() || self.second_y_range.animating()
    }

    pub fn set_dataset(&mut self, dataset: Dataset) {
        let replaced = self
            .dataset
            .as_ref()
            .is_none_or(|current| !current.same_identity(&dataset));
        if replaced {
            self.y_range.reset();
            self.second_y_range.reset();
            self.selection = SelectionRequest::Timestamp(None);
            self.zoomed = false;
        }
        debug!(
            name = dataset.name(),
            series = dataset.series().len(),
            points = dataset.len(),
            kind = ?dataset.kind(),
            replaced,
            "dataset updated"
        );
        self.prepared = PreparedDataset::new(&dataset);
        self.timestamps = dataset.timestamps().collect();
        self.labeler.reset(
            DateFormats::for_spacing(dataset.point_spacing()),
            self.config.utc_offset(),
        );
        self.dataset = Some(dataset);
        self.remeasure_labels();
    }

    pub fn set_visible_window(&mut self, window: VisibleWindow) {
        trace!(start = window.start(), end = window.end(), "visible window updated");
        self.window = window;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            warn!(?viewport, "viewport has an empty rectangle; geometry will be degenerate");
        }
        debug!(
            plot_width = viewport.plot_area.width,
            plot_height = viewport.plot_area.height,
            axis_width = viewport.axis_area.width,
            "viewport updated"
        );
        self.viewport = Some(viewport);
    }

    pub fn set_selected_timestamp(&mut self, timestamp: Option<f64>) {
        self.selection = SelectionRequest::Timestamp(timestamp.filter(|value| value.is_finite()));
    }

    /// Selects the date nearest to device `x` on the axis; resolved on the next pass.
    pub fn select_at_pixel(&mut self, x: f64) {
        if x.is_finite() {
            self.selection = SelectionRequest::Pixel(x);
        } else {
            warn!(x, "ignoring non-finite selection pixel");
        }
    }

    /// Returns whether the flag changed.
    pub fn set_series_selected(&mut self, id: &SeriesId, selected: bool) -> bool {
        let Some(dataset) = self.dataset.as_mut() else {
            warn!(series = id.as_str(), "series selection before any dataset");
            return false;
        };
        if dataset.series_index(id).is_none() {
            warn!(series = id.as_str(), "unknown series id");
            return false;
        }
        let changed = dataset.set_series_selected(id, selected);
        if changed {
            self.prepared = PreparedDataset::new(dataset);
            debug!(series = id.as_str(), selected, "series selection changed");
        }
        changed
    }

    pub fn set_zoomed(&mut self, zoomed: bool) {
        self.zoomed = zoomed;
    }

    /// Applies queued mutations: dataset, window, selection, viewport.
    pub fn apply(&mut self, pending: PendingUpdate) {
        let PendingUpdate {
            dataset,
            window,
            series_flags,
            selection,
            zoomed,
            viewport,
        } = pending;
        if let Some(dataset) = dataset {
            self.set_dataset(dataset);
        }
        if let Some(window) = window {
            self.set_visible_window(window);
        }
        for (id, selected) in series_flags {
            self.set_series_selected(&id, selected);
        }
        match selection {
            Some(SelectionRequest::Timestamp(timestamp)) => self.set_selected_timestamp(timestamp),
            Some(SelectionRequest::Pixel(x)) => self.select_at_pixel(x),
            None => {}
        }
        if let Some(zoomed) = zoomed {
            self.set_zoomed(zoomed);
        }
        if let Some(viewport) = viewport {
            self.set_viewport(viewport);
        }
    }

    fn remeasure_labels(&mut self) {
        self.label_size = measure_label_size(
            &self.timestamps,
            &mut self.labeler,
            self.measurer.as_ref(),
            self.config.label_font,
            self.config.label_line_height_px,
        );
        self.priorities = None;
    }

    /// Runs one pass; `None` until both dataset and viewport are known.
    pub fn compute(&mut self) -> Option<ChartFrame> {
        let viewport = self.viewport?;
        let dataset = self.dataset.as_ref()?;
        let now = self.clock.now();
        let plot = viewport.plot_area;
        let axis = viewport.axis_area;
        let kind = dataset.kind();
        let palette = self.config.palette;

        let full = dataset.time_range();
        let selected = selected_time_range(full, self.window);
        let step = bar_step(dataset, selected, axis, self.config.screen());
        self.last_bar_step = step;

        let points = &dataset.series()[0].points;
        if let SelectionRequest::Pixel(x) = self.selection {
            let timestamp = time_at_x(x, selected, axis, step);
            let snapped = nearest_index(points, timestamp).map(|index| points[index].x);
            self.selection = SelectionRequest::Timestamp(snapped);
        }
        let selected_timestamp = match self.selection {
            SelectionRequest::Timestamp(Some(raw)) => {
                nearest_index(points, raw).map(|index| points[index].x)
            }
            _ => None,
        };
        let selected_index = selected_timestamp.and_then(|timestamp| index_of(points, timestamp));

        self.generation = self.generation.saturating_add(1);
        let mut frame = ChartFrame::empty(self.generation, viewport);

        if kind == ChartKind::Area && self.zoomed {
            if let (Some(timestamp), Some(index)) = (selected_timestamp, selected_index) {
                let layout = PieLayout {
                    plot,
                    edge_inset_px: self.config.pie_edge_inset_px,
                    max_font_px: self.config.pie_label_max_font_px,
                    fill_ratio: self.config.pie_label_fill_ratio,
                };
                frame.series = SeriesGeometry::Pie(pie_wedges(
                    dataset,
                    &self.prepared,
                    index,
                    layout,
                    self.measurer.as_ref(),
                ));
                frame.start_date_label = self.labeler.format(timestamp, DateStyle::StartTitle);
                trace!(generation = self.generation, timestamp, "pie pass");
                return Some(frame);
            }
        }

        let bordered = bordered_range(points, full, selected);
        let targets = range_targets(dataset, &self.prepared, bordered);
        if targets.snap {
            self.y_range.reset();
            self.second_y_range.reset();
        }
        let first = match targets.first {
            Some(target) => Some(self.y_range.update(target, now)),
            None => {
                self.y_range.reset();
                None
            }
        };
        let second = match targets.second {
            Some(target) => Some(self.second_y_range.update(target, now)),
            None => {
                self.second_y_range.reset();
                None
            }
        };
        frame.animating = first.is_some_and(|(_, animating)| animating)
            || second.is_some_and(|(_, animating)| animating);
        let y_range = first.map(|(range, _)| range);
        let second_y_range = second.map(|(range, _)| range);

        let (y_axis, second_y_axis) = self.y_axes(dataset, plot, axis, y_range, second_y_range);
        frame.y_axis = y_axis;
        frame.second_y_axis = second_y_axis;

        if self.priorities.is_none() || self.priorities_axis != Some(axis) {
            self.priorities = Some(resolve_label_priorities(
                PriorityInputs {
                    timestamps: &self.timestamps,
                    label_size: self.label_size,
                    axis,
                    spacing_ratio: self.config.label_spacing_ratio,
                    min_window_fraction: self.config.min_window_fraction,
                },
                &mut self.rng,
            ));
            self.priorities_axis = Some(axis);
        }
        let labels = match &self.priorities {
            Some(priorities) => visible_x_labels(
                &self.timestamps,
                priorities,
                &XLabelLayout {
                    axis,
                    full,
                    selected,
                    bar_step: step,
                    label_size: self.label_size,
                    overlap_tolerance: self.config.label_overlap_tolerance,
                },
                &mut self.labeler,
            ),
            None => Vec::new(),
        };
        frame.x_axis = Some(AxisInfo {
            text_color: palette.x_axis_label_text,
            labels,
            grid: Some(GridInfo {
                color: palette.axis_grid_for(kind),
                lines: vec![x_baseline(plot, axis)],
            }),
        });

        frame.series = series_geometry(&GeometryInputs {
            dataset,
            prepared: &self.prepared,
            plot,
            axis,
            selected,
            bordered,
            bar_step: step,
            y_range,
            second_y_range,
            selected_index,
            line_width: self.config.line_width_px,
            screen: self.config.screen(),
            non_selected_mask: palette.non_selected_mask,
        });

        frame.tooltip = selected_timestamp.and_then(|timestamp| {
            tooltip_info(
                &TooltipInputs {
                    dataset,
                    prepared: &self.prepared,
                    timestamp,
                    plot,
                    axis,
                    selected,
                    bar_step: step,
                    y_range,
                    second_y_range,
                    grid_color: palette.tooltip_grid_for(kind),
                    total_text_color: palette.tooltip_total_text,
                },
                &mut self.labeler,
            )
        });

        frame.start_date_label = self.labeler.format(selected.start, DateStyle::StartTitle);
        frame.end_date_label = (!self.labeler.same_day(selected.start, selected.end))
            .then(|| self.labeler.format(selected.end, DateStyle::EndTitle));

        trace!(
            generation = frame.generation,
            animating = frame.animating,
            bar_step = step,
            x_labels = frame.x_axis.as_ref().map_or(0, |axis| axis.labels.len()),
            "chart pass computed"
        );
        Some(frame)
    }

    fn y_axes(
        &self,
        dataset: &Dataset,
        plot: Rect,
        axis: Rect,
        first: Option<IntRange>,
        second: Option<IntRange>,
    ) -> (Option<AxisInfo>, Option<AxisInfo>) {
        let palette = self.config.palette;
        let grid = Some(palette.axis_grid_for(dataset.kind()));
        let left = YAxisSlot {
            plot,
            axis,
            second_axis: false,
        };
        let right = YAxisSlot {
            second_axis: true,
            ..left
        };

        if !dataset.dual_y_axis() {
            let info = first.map(|range| {
                self.y_axis_info(range, tick_plan(range), left, palette.y_axis_label_text, grid)
            });
            return (info, None);
        }

        let series = dataset.series();
        let first_color = series.first().map_or(palette.y_axis_label_text, |series| series.color);
        let second_color = series.last().map_or(palette.y_axis_label_text, |series| series.color);

        match (first, second) {
            (Some(first), Some(second)) => {
                // Gridlines follow the wider range; only the higher axis draws them.
                let (first_plan, second_plan) = if first.len() >= second.len() {
                    (tick_plan(first), aligned_tick_plan(second, first))
                } else {
                    (aligned_tick_plan(first, second), tick_plan(second))
                };
                let first_owns_grid = first.high >= second.high;
                (
                    Some(self.y_axis_info(
                        first,
                        first_plan,
                        left,
                        first_color,
                        grid.filter(|_| first_owns_grid),
                    )),
                    Some(self.y_axis_info(
                        second,
                        second_plan,
                        right,
                        second_color,
                        grid.filter(|_| !first_owns_grid),
                    )),
                )
            }
            (Some(first), None) => (
                Some(self.y_axis_info(first, tick_plan(first), left, first_color, grid)),
                None,
            ),
            (None, Some(second)) => (
                None,
                Some(self.y_axis_info(second, tick_plan(second), right, second_color, grid)),
            ),
            (None, None) => (None, None),
        }
    }

    fn y_axis_info(
        &self,
        range: IntRange,
        plan: TickPlan,
        slot: YAxisSlot,
        text_color: Color,
        grid_color: Option<Color>,
    ) -> AxisInfo {
        let ticks = y_ticks(range, plan, slot.plot);
        AxisInfo {
            text_color,
            labels: y_axis_labels(
                &ticks,
                self.measurer.as_ref(),
                self.config.label_font,
                self.config.label_line_height_px,
                slot.axis,
                slot.second_axis,
                self.config.y_label_gap_px,
            ),
            grid: grid_color.map(|color| GridInfo {
                color,
                lines: gridlines(&ticks, slot.axis),
            }),
        }
    }
}

fn range_targets(dataset: &Dataset, prepared: &PreparedDataset, bordered: TimeRange) -> RangeTargets {
    let visible = prepared.visible();
    if visible.is_empty() {
        return RangeTargets::default();
    }
    let series = dataset.series();
    let floor_at_zero = dataset.kind() == ChartKind::Bar;

    if dataset.stacked() && dataset.percentage() {
        return RangeTargets {
            first: Some(PERCENT_RANGE),
            second: None,
            snap: true,
        };
    }
    if dataset.stacked() {
        return RangeTargets {
            first: Some(stacked_range(prepared.stacked_values(), bordered)),
            ..RangeTargets::default()
        };
    }
    if dataset.dual_y_axis() {
        let axis_range = |index: usize| {
            series[index]
                .selected
                .then(|| padded_range([series[index].points.as_slice()], bordered, floor_at_zero))
                .flatten()
        };
        let first = axis_range(0);
        let second = dataset.second_axis_series().and_then(axis_range);
        return RangeTargets {
            first,
            second,
            snap: false,
        };
    }
    RangeTargets {
        first: padded_range(
            visible.iter().map(|&index| series[index].points.as_slice()),
            bordered,
            floor_at_zero,
        ),
        ..RangeTargets::default()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ChartComputation;
    use crate::api::clock::ManualClock;
    use crate::api::engine_config::EngineConfig;
    use crate::core::{ChartKind, DataPoint, Dataset, Rect, Series, Viewport, VisibleWindow};
    use crate::render::{Color, SeriesGeometry};

    const DAY: f64 = 86_400.0;
    const START: f64 = 1_551_398_400.0;

    fn dataset(kind: ChartKind, columns: &[&[i64]]) -> Dataset {
        let series = columns
            .iter()
            .enumerate()
            .map(|(index, values)| {
                Series::new(
                    format!("y{index}"),
                    format!("#{index}"),
                    Color::rgb(0.2, 0.3, 0.4 + index as f64 * 0.1),
                    kind,
                    values
                        .iter()
                        .enumerate()
                        .map(|(day, &y)| DataPoint::new(START + day as f64 * DAY, y))
                        .collect(),
                )
            })
            .collect();
        Dataset::new("test", series).expect("dataset")
    }

    fn computation(clock: &ManualClock) -> ChartComputation {
        ChartComputation::new(EngineConfig::default())
            .expect("config")
            .with_clock(clock.clone())
    }

    fn viewport() -> Viewport {
        Viewport::new(
            Rect::new(0.0, 20.0, 300.0, 200.0),
            Rect::new(0.0, 0.0, 300.0, 240.0),
        )
        .expect("viewport")
    }

    #[test]
    fn no_frame_until_dataset_and_viewport_are_known() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        assert!(engine.compute().is_none());
        engine.set_dataset(dataset(ChartKind::Line, &[&[1, 2, 3]]));
        assert!(engine.compute().is_none());
        engine.set_viewport(viewport());
        assert!(engine.is_ready());
        let frame = engine.compute().expect("frame");
        assert_eq!(frame.generation, 1);
        frame.validate().expect("valid frame");
    }

    #[test]
    fn repeated_passes_are_identical_apart_from_generation() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(dataset(ChartKind::Line, &[&[10, 40, 25, 80, 60]]));
        engine.set_viewport(viewport());
        engine.set_visible_window(VisibleWindow::new(0.2, 0.9));
        let first = engine.compute().expect("frame");
        let mut second = engine.compute().expect("frame");
        assert_eq!(second.generation, first.generation + 1);
        second.generation = first.generation;
        assert_eq!(first, second);
    }

    #[test]
    fn window_change_animates_then_settles() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(dataset(ChartKind::Line, &[&[10, 20, 30, 1_000, 2_000]]));
        engine.set_viewport(viewport());
        assert!(!engine.compute().expect("frame").animating);

        engine.set_visible_window(VisibleWindow::new(0.0, 0.3));
        assert!(engine.compute().expect("frame").animating);
        clock.advance(Duration::from_millis(300));
        assert!(!engine.compute().expect("frame").animating);
    }

    #[test]
    fn pixel_selection_snaps_to_nearest_date() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(dataset(ChartKind::Line, &[&[1, 2, 3, 4, 5]]));
        engine.set_viewport(viewport());
        engine.select_at_pixel(80.0);
        let frame = engine.compute().expect("frame");
        // 300 px over four days: 80 px is closest to day 1 at 75 px.
        assert_eq!(engine.selected_timestamp(), Some(START + DAY));
        let tooltip = frame.tooltip.expect("tooltip");
        assert_eq!(tooltip.x, 75.0);
        assert_eq!(tooltip.rows[0].value, "2");
    }

    #[test]
    fn zoomed_area_selection_produces_pie() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(
            dataset(ChartKind::Area, &[&[40, 10], &[35, 10], &[26, 10]])
                .with_stacked(true)
                .with_percentage(true),
        );
        engine.set_viewport(viewport());
        engine.set_selected_timestamp(Some(START + 10.0));
        engine.set_zoomed(true);
        let frame = engine.compute().expect("frame");
        let SeriesGeometry::Pie(wedges) = &frame.series else {
            panic!("expected pie geometry");
        };
        assert_eq!(wedges.len(), 3);
        assert!(frame.x_axis.is_none() && frame.y_axis.is_none());
        assert!(frame.tooltip.is_none());
        assert_eq!(frame.start_date_label, "1 March 2019");
        assert!(frame.end_date_label.is_none());
    }

    #[test]
    fn dual_axis_colors_labels_and_grids_one_axis() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(
            dataset(ChartKind::Line, &[&[100, 600, 300], &[1, 6, 3]]).with_dual_y_axis(true),
        );
        engine.set_viewport(viewport());
        let frame = engine.compute().expect("frame");
        let first = frame.y_axis.as_ref().expect("first axis");
        let second = frame.second_y_axis.as_ref().expect("second axis");
        let series = engine.dataset().expect("dataset").series();
        assert_eq!(first.text_color, series[0].color);
        assert_eq!(second.text_color, series[1].color);
        assert!(first.grid.is_some());
        assert!(second.grid.is_none());
    }

    #[test]
    fn hidden_axis_stops_animating_and_snaps_when_shown_again() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(
            dataset(
                ChartKind::Line,
                &[&[10, 20, 30, 1_000, 2_000], &[1, 2, 3, 100, 200]],
            )
            .with_dual_y_axis(true),
        );
        engine.set_viewport(viewport());
        assert!(!engine.compute().expect("frame").animating);

        engine.set_visible_window(VisibleWindow::new(0.0, 0.3));
        assert!(engine.compute().expect("frame").animating);
        assert!(engine.set_series_selected(&"y1".into(), false));
        let frame = engine.compute().expect("frame");
        assert!(frame.second_y_axis.is_none());

        clock.advance(Duration::from_secs(2));
        assert!(!engine.compute().expect("frame").animating);
        assert!(!engine.animating());

        assert!(engine.set_series_selected(&"y1".into(), true));
        let frame = engine.compute().expect("frame");
        assert!(frame.second_y_axis.is_some());
        assert!(!frame.animating);
    }

    #[test]
    fn hiding_first_series_keeps_second_axis() {
        let clock = ManualClock::new();
        let mut engine = computation(&clock);
        engine.set_dataset(
            dataset(ChartKind::Line, &[&[100, 600, 300], &[1, 6, 3]]).with_dual_y_axis(true),
        );
        engine.set_viewport(viewport());
        assert!(engine.set_series_selected(&"y0".into(), false));
        let frame = engine.compute().expect("frame");
        assert!(frame.y_axis.is_none());
        let second = frame.second_y_axis.as_ref().expect("second axis");
        assert!(second.grid.is_some());
    }
}
