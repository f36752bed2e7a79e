mod axis_ticks;
mod chart_state;
mod clock;
mod engine;
mod engine_config;
mod label_format;
mod label_priority;
mod pie;
mod scheduler;
mod series_geometry;
mod text_metrics;
mod time_axis;
mod tooltip;
mod value_range;

pub use axis_ticks::{TickPlan, YTick, aligned_tick_plan, tick_plan, y_ticks};
pub use chart_state::ChartComputation;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::{ChartEngine, WorkerMessage};
pub use engine_config::{ChartPalette, EngineConfig};
pub use label_format::{
    DateFormats, DateLabelCacheStats, DateLabeler, DateStyle, grouped_value, shortened_value,
};
pub use label_priority::{LabelPriorities, PriorityInputs, resolve_label_priorities};
pub use scheduler::{
    Mutation, NextPass, PendingUpdate, SchedulerState, SelectionRequest, UpdateScheduler,
};
pub use text_metrics::{EstimatedTextMeasurer, TextMeasurer};
pub use value_range::PERCENT_RANGE;
