mod frame;
mod handle_pool;
mod primitives;
mod sink;

pub use frame::{
    AxisInfo, AxisLabel, ChartFrame, GridInfo, SeriesGeometry, TooltipInfo, TooltipRow,
};
pub use handle_pool::{HandlePool, PoolSyncStats};
pub use primitives::{
    AreaBand, BarSet, Color, FontSpec, FontWeight, LinePath, PieWedge, TextRun,
};
pub use sink::{CallbackSink, FrameSink, NullSink};
