use std::sync::Arc;
use std::sync::mpsc::Sender;

use crate::error::{ChartError, ChartResult};
use crate::render::ChartFrame;

/// Receives every published frame on the worker thread.
///
/// Implementations hand the snapshot to the host, which redraws from it.
pub trait FrameSink: Send {
    fn publish(&mut self, frame: Arc<ChartFrame>) -> ChartResult<()>;
}

/// Adapts a closure into a [`FrameSink`].
pub struct CallbackSink<F>(pub F);

impl<F> FrameSink for CallbackSink<F>
where
    F: FnMut(Arc<ChartFrame>) + Send,
{
    fn publish(&mut self, frame: Arc<ChartFrame>) -> ChartResult<()> {
        (self.0)(frame);
        Ok(())
    }
}

impl FrameSink for Sender<Arc<ChartFrame>> {
    fn publish(&mut self, frame: Arc<ChartFrame>) -> ChartResult<()> {
        self.send(frame).map_err(|_| ChartError::WorkerUnavailable)
    }
}

/// Sink that drops frames after validating them.
///
/// Used by tests and headless hosts to catch invalid geometry.
#[derive(Debug, Default)]
pub struct NullSink {
    pub published: u64,
    pub last_generation: Option<u64>,
}

impl FrameSink for NullSink {
    fn publish(&mut self, frame: Arc<ChartFrame>) -> ChartResult<()> {
        frame.validate()?;
        self.published += 1;
        self.last_generation = Some(frame.generation);
        Ok(())
    }
}
