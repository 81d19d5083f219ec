use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::entities::NestResultSheet;

/// Cooperative cancellation flag for a nesting run.
///
/// Cancellation is never preemptive: the flag is observed at the top of the
/// orchestrator loop and at the raster packer's yield points, so an
/// individual placement search may run to completion before the request is
/// honored.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Lifecycle state of a nesting run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NestState {
    Idle,
    Running,
    Completed,
    OutOfMaterial,
    Cancelled,
}

/// Incremental snapshot of a running nest, emitted periodically so the
/// caller can render feedback without waiting for the final result.
#[derive(Debug)]
pub struct NestProgress<'a> {
    pub state: NestState,
    /// Items placed so far.
    pub placed: usize,
    /// Total items in the run.
    pub total: usize,
    /// Sheets closed so far.
    pub sheets: &'a [NestResultSheet],
    /// Fraction of items placed, in [0, 1].
    pub fraction: f32,
}

/// Receiver for progress updates. Implementations must be cheap: updates are
/// emitted from inside the placement loop.
pub trait ProgressSink {
    fn progress(&mut self, update: NestProgress<'_>);
}

/// Sink that discards all updates.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn progress(&mut self, _update: NestProgress<'_>) {}
}
