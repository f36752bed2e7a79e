use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, trace, warn};

use crate::core::{Dataset, SeriesId, Viewport, VisibleWindow};
use crate::error::{ChartError, ChartResult};
use crate::render::FrameSink;

use super::chart_state::ChartComputation;
use super::engine_config::EngineConfig;
use super::scheduler::{Mutation, NextPass, PendingUpdate, UpdateScheduler};

const WORKER_THREAD_NAME: &str = "chart-engine-worker";

/// Messages consumed by the worker lane, in FIFO order.
#[derive(Debug)]
pub enum WorkerMessage {
    Mutate(Mutation),
    Shutdown,
}

/// Handle to the background worker computing chart frames.
///
/// Setters only enqueue a mutation; frames arrive through the [`FrameSink`]
/// given at spawn time. Dropping the handle stops the worker without waiting
/// for it; [`ChartEngine::shutdown`] waits.
#[derive(Debug)]
pub struct ChartEngine {
    sender: Sender<WorkerMessage>,
    worker: Option<JoinHandle<()>>,
}

impl ChartEngine {
    pub fn spawn(config: EngineConfig, sink: impl FrameSink + 'static) -> ChartResult<Self> {
        Self::spawn_with(ChartComputation::new(config)?, sink)
    }

    /// Spawns the worker around a preconfigured computation (custom clock or
    /// text measurer).
    pub fn spawn_with(
        computation: ChartComputation,
        sink: impl FrameSink + 'static,
    ) -> ChartResult<Self> {
        let (sender, receiver) = mpsc::channel::<WorkerMessage>();
        let worker = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || Worker::new(computation, sink).run(&receiver))
            .map_err(|err| {
                warn!(error = %err, "failed to spawn chart worker");
                ChartError::WorkerUnavailable
            })?;
        debug!("chart worker started");
        Ok(Self {
            sender,
            worker: Some(worker),
        })
    }

    pub fn set_dataset(&self, dataset: Dataset) -> ChartResult<()> {
        self.send(Mutation::Dataset(dataset))
    }

    pub fn set_visible_window(&self, window: VisibleWindow) -> ChartResult<()> {
        self.send(Mutation::VisibleWindow(window))
    }

    pub fn set_viewport(&self, viewport: Viewport) -> ChartResult<()> {
        self.send(Mutation::Viewport(viewport))
    }

    pub fn set_selected_timestamp(&self, timestamp: Option<f64>) -> ChartResult<()> {
        self.send(Mutation::SelectedTimestamp(timestamp))
    }

    pub fn select_at_pixel(&self, x: f64) -> ChartResult<()> {
        self.send(Mutation::SelectAtPixel(x))
    }

    pub fn set_series_selected(&self, id: impl Into<SeriesId>, selected: bool) -> ChartResult<()> {
        self.send(Mutation::SeriesSelected(id.into(), selected))
    }

    pub fn set_zoomed(&self, zoomed: bool) -> ChartResult<()> {
        self.send(Mutation::Zoomed(zoomed))
    }

    /// Stops the worker and waits for it to exit.
    pub fn shutdown(mut self) -> ChartResult<()> {
        let _ = self.sender.send(WorkerMessage::Shutdown);
        match self.worker.take() {
            Some(worker) => worker.join().map_err(|_| ChartError::WorkerUnavailable),
            None => Ok(()),
        }
    }

    fn send(&self, mutation: Mutation) -> ChartResult<()> {
        self.sender
            .send(WorkerMessage::Mutate(mutation))
            .map_err(|_| ChartError::WorkerUnavailable)
    }
}

impl Drop for ChartEngine {
    fn drop(&mut self) {
        if self.worker.take().is_some() {
            let _ = self.sender.send(WorkerMessage::Shutdown);
        }
    }
}

struct Worker<S> {
    computation: ChartComputation,
    sink: S,
    scheduler: UpdateScheduler,
    pending: PendingUpdate,
    rearm_at: Option<Instant>,
    shutdown: bool,
}

impl<S: FrameSink> Worker<S> {
    fn new(computation: ChartComputation, sink: S) -> Self {
        Self {
            computation,
            sink,
            scheduler: UpdateScheduler::new(),
            pending: PendingUpdate::default(),
            rearm_at: None,
            shutdown: false,
        }
    }

    fn run(mut self, receiver: &Receiver<WorkerMessage>) {
        while !self.shutdown {
            let message = match self.rearm_at {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match receiver.recv_timeout(wait) {
                        Ok(message) => Some(message),
                        Err(RecvTimeoutError::Timeout) => None,
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match receiver.recv() {
                    Ok(message) => Some(message),
                    Err(_) => break,
                },
            };

            match message {
                Some(message) => self.handle(message),
                None => self.rearm_at = None,
            }
            self.drain(receiver);
            if self.shutdown {
                break;
            }
            self.refresh_readiness();
            self.scheduler.request_update();
            self.run_scheduled(receiver);
        }
        debug!(passes = self.scheduler.passes(), "chart worker stopped");
    }

    fn handle(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::Mutate(mutation) => self.pending.record(mutation),
            WorkerMessage::Shutdown => self.shutdown = true,
        }
    }

    /// Records every message already queued so one pass covers the burst.
    fn drain(&mut self, receiver: &Receiver<WorkerMessage>) {
        while !self.shutdown {
            match receiver.try_recv() {
                Ok(message) => self.handle(message),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.shutdown = true;
                    break;
                }
            }
        }
    }

    fn refresh_readiness(&mut self) {
        let ready = (self.computation.dataset().is_some() || self.pending.has_dataset())
            && (self.computation.viewport().is_some() || self.pending.has_viewport());
        self.scheduler.set_inputs_ready(ready);
    }

    fn run_scheduled(&mut self, receiver: &Receiver<WorkerMessage>) {
        while self.scheduler.begin_pass() {
            self.computation.apply(self.pending.take());
            let mut animating = false;
            if let Some(frame) = self.computation.compute() {
                animating = frame.animating;
                trace!(generation = frame.generation, animating, "publishing chart frame");
                if let Err(err) = self.sink.publish(Arc::new(frame)) {
                    warn!(error = %err, "frame sink rejected chart frame");
                }
            }

            self.drain(receiver);
            if self.shutdown {
                return;
            }
            if !self.pending.is_empty() {
                self.refresh_readiness();
                self.scheduler.request_update();
            }
            match self.scheduler.finish_pass(animating) {
                NextPass::None => self.rearm_at = None,
                NextPass::Immediate => {}
                NextPass::AfterFrameDelay => {
                    self.rearm_at = Some(Instant::now() + self.computation.config().frame_interval());
                }
            }
        }
    }
}
