//! Progress notification from an optimization run to its caller.
//!
//! The runner pushes a [`Progress`] value into a [`ProgressSink`] at every
//! generation boundary. Sinks never block the runner and never influence
//! the search; how often the caller reads them is up to the caller.
//!
//! Ready-made sinks:
//!
//! - [`NoProgress`]: discards everything
//! - any `Fn(Progress) + Send + Sync` closure
//! - [`ChannelSink`]: wraps an unbounded `mpsc::Sender`, never drops
//! - [`BoundedChannelSink`]: wraps an `mpsc::SyncSender`, drops events when full

use std::sync::mpsc::{Sender, SyncSender, TrySendError};

/// A single progress notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Progress {
    /// `generation` of `total` generations have finished.
    Generation { generation: usize, total: usize },
    /// The whole run, including ranking, has finished. Authoritative.
    Completed,
    /// The run stopped on a precondition failure or cancellation.
    Aborted,
}

impl Progress {
    /// Progress as a percentage in `[0, 100]`, or `-1.0` for [`Progress::Aborted`].
    pub fn percent(&self) -> f64 {
        match *self {
            Progress::Generation { generation, total } => {
                if total == 0 {
                    100.0
                } else {
                    generation as f64 / total as f64 * 100.0
                }
            }
            Progress::Completed => 100.0,
            Progress::Aborted => -1.0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Progress::Completed | Progress::Aborted)
    }
}

/// Receives progress notifications.
pub trait ProgressSink: Send + Sync {
    /// Delivers one notification. Must not block.
    fn emit(&self, progress: Progress);
}

/// Sink that ignores all notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn emit(&self, _progress: Progress) {}
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn emit(&self, progress: Progress) {
        self(progress)
    }
}

/// Forwards every notification over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink(pub Sender<Progress>);

impl ProgressSink for ChannelSink {
    fn emit(&self, progress: Progress) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.0.send(progress);
    }
}

/// Forwards notifications over a bounded channel, dropping them while it is full.
///
/// Callers that poll slowly should treat [`Progress::Completed`] as
/// authoritative rather than relying on every intermediate value arriving.
#[derive(Debug, Clone)]
pub struct BoundedChannelSink(pub SyncSender<Progress>);

impl ProgressSink for BoundedChannelSink {
    fn emit(&self, progress: Progress) {
        match self.0.try_send(progress) {
            Ok(()) | Err(TrySendError::Disconnected(_)) => {}
            Err(TrySendError::Full(_)) => {
                tracing::trace!(?progress, "progress channel full, dropping event");
            }
        }
    }
}
