pub mod animated_range;
pub mod coordinate;
pub mod dataset;
pub mod projection;
pub mod range;
pub mod types;
pub mod windowing;

pub use animated_range::AnimatedRange;
pub use coordinate::{time_at_x, x_pixel, y_pixel};
pub use dataset::{ChartKind, Dataset, Series, SeriesId};
pub use projection::{
    ColumnValues, PercentColumn, PreparedDataset, StackedColumn, apportion_percentages,
};
pub use range::{IntRange, PixelRounding, ScreenScale, TimeRange, round_to_next_significant};
pub use types::{DataPoint, Point, Rect, Size, Viewport, VisibleWindow};
