use indexmap::IndexMap;
use tracing::trace;

use crate::core::{Dataset, SeriesId, Viewport, VisibleWindow};

/// One caller-side input change.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Dataset(Dataset),
    VisibleWindow(VisibleWindow),
    Viewport(Viewport),
    SelectedTimestamp(Option<f64>),
    /// Device x on the axis rectangle; snapped to the nearest date.
    SelectAtPixel(f64),
    SeriesSelected(SeriesId, bool),
    Zoomed(bool),
}

/// Tap selection as last requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionRequest {
    Timestamp(Option<f64>),
    Pixel(f64),
}

/// Mutations waiting for the next pass; the latest value wins per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingUpdate {
    pub dataset: Option<Dataset>,
    pub window: Option<VisibleWindow>,
    pub series_flags: IndexMap<SeriesId, bool>,
    pub selection: Option<SelectionRequest>,
    pub zoomed: Option<bool>,
    pub viewport: Option<Viewport>,
}

impl PendingUpdate {
    pub fn record(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::Dataset(dataset) => {
                // Flags recorded against the previous dataset no longer apply.
                self.series_flags.clear();
                self.dataset = Some(dataset);
            }
            Mutation::VisibleWindow(window) => self.window = Some(window),
            Mutation::Viewport(viewport) => self.viewport = Some(viewport),
            Mutation::SelectedTimestamp(timestamp) => {
                self.selection = Some(SelectionRequest::Timestamp(timestamp));
            }
            Mutation::SelectAtPixel(x) => self.selection = Some(SelectionRequest::Pixel(x)),
            Mutation::SeriesSelected(id, selected) => {
                self.series_flags.insert(id, selected);
            }
            Mutation::Zoomed(zoomed) => self.zoomed = Some(zoomed),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dataset.is_none()
            && self.window.is_none()
            && self.series_flags.is_empty()
            && self.selection.is_none()
            && self.zoomed.is_none()
            && self.viewport.is_none()
    }

    #[must_use]
    pub fn has_dataset(&self) -> bool {
        self.dataset.is_some()
    }

    #[must_use]
    pub fn has_viewport(&self) -> bool {
        self.viewport.is_some()
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Scheduled,
    Running,
}

/// What the worker does after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPass {
    None,
    Immediate,
    AfterFrameDelay,
}

/// `Idle -> Scheduled -> Running -> (Idle | Scheduled)`.
#[derive(Debug, Clone)]
pub struct UpdateScheduler {
    state: SchedulerState,
    inputs_ready: bool,
    follow_up: bool,
    passes: u64,
}

impl Default for UpdateScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            inputs_ready: false,
            follow_up: false,
            passes: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[must_use]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Whether both dataset and viewport are known.
    pub fn set_inputs_ready(&mut self, ready: bool) {
        self.inputs_ready = ready;
    }

    /// Requests a pass; returns whether a new pass was scheduled.
    pub fn request_update(&mut self) -> bool {
        if !self.inputs_ready {
            return false;
        }
        match self.state {
            SchedulerState::Idle => {
                self.state = SchedulerState::Scheduled;
                true
            }
            SchedulerState::Scheduled => false,
            SchedulerState::Running => {
                let scheduled = !self.follow_up;
                self.follow_up = true;
                scheduled
            }
        }
    }

    /// Moves a scheduled pass to running; `false` when nothing is scheduled.
    pub fn begin_pass(&mut self) -> bool {
        if self.state != SchedulerState::Scheduled {
            return false;
        }
        self.state = SchedulerState::Running;
        self.passes = self.passes.saturating_add(1);
        true
    }

    pub fn finish_pass(&mut self, animating: bool) -> NextPass {
        if self.state != SchedulerState::Running {
            return NextPass::None;
        }
        let next = if std::mem::take(&mut self.follow_up) {
            self.state = SchedulerState::Scheduled;
            NextPass::Immediate
        } else if animating {
            self.state = SchedulerState::Idle;
            NextPass::AfterFrameDelay
        } else {
            self.state = SchedulerState::Idle;
            NextPass::None
        };
        trace!(pass = self.passes, ?next, "finished chart pass");
        next
    }
}

#[cfg(test)]
mod tests {
    use super::{Mutation, NextPass, PendingUpdate, SchedulerState, SelectionRequest, UpdateScheduler};
    use crate::core::VisibleWindow;

    #[test]
    fn missing_inputs_keep_scheduler_idle() {
        let mut scheduler = UpdateScheduler::new();
        assert!(!scheduler.request_update());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert!(!scheduler.begin_pass());
    }

    #[test]
    fn requests_while_scheduled_coalesce() {
        let mut scheduler = UpdateScheduler::new();
        scheduler.set_inputs_ready(true);
        assert!(scheduler.request_update());
        assert!(!scheduler.request_update());
        assert!(scheduler.begin_pass());
        assert_eq!(scheduler.finish_pass(false), NextPass::None);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.passes(), 1);
    }

    #[test]
    fn requests_while_running_schedule_one_follow_up() {
        let mut scheduler = UpdateScheduler::new();
        scheduler.set_inputs_ready(true);
        scheduler.request_update();
        scheduler.begin_pass();
        assert!(scheduler.request_update());
        assert!(!scheduler.request_update());
        assert_eq!(scheduler.finish_pass(true), NextPass::Immediate);
        assert_eq!(scheduler.state(), SchedulerState::Scheduled);
        assert!(scheduler.begin_pass());
        assert_eq!(scheduler.finish_pass(true), NextPass::AfterFrameDelay);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn pending_update_keeps_latest_values() {
        let mut pending = PendingUpdate::default();
        assert!(pending.is_empty());
        pending.record(Mutation::VisibleWindow(VisibleWindow::new(0.1, 0.2)));
        pending.record(Mutation::VisibleWindow(VisibleWindow::new(0.3, 0.4)));
        pending.record(Mutation::SelectAtPixel(12.0));
        pending.record(Mutation::SelectedTimestamp(None));
        pending.record(Mutation::SeriesSelected("a".into(), false));
        pending.record(Mutation::SeriesSelected("a".into(), true));

        assert_eq!(pending.window, Some(VisibleWindow::new(0.3, 0.4)));
        assert_eq!(pending.selection, Some(SelectionRequest::Timestamp(None)));
        assert_eq!(pending.series_flags.len(), 1);
        let drained = pending.take();
        assert!(pending.is_empty());
        assert!(!drained.is_empty());
        assert!(!drained.has_dataset());
    }
}
