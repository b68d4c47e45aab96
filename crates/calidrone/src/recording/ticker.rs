//! The recording duration tick.
//!
//! Each recording gets its own [`TickHandle`]. The handle carries a
//! generation number that the session compares against every incoming
//! [`TickEvent`], so ticks sent by a timer that belongs to an earlier
//! recording are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};
use tracing::{debug, trace};

/// One tick of a recording's duration timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickEvent {
    /// Generation of the timer that sent it.
    pub generation: u64,
}

/// A handle to control a tick timer.
///
/// This is a lightweight, cloneable handle; cancelling any clone stops the
/// timer task.
#[derive(Debug, Clone)]
pub struct TickHandle {
    generation: u64,
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl TickHandle {
    /// Create a handle for the given generation.
    #[must_use]
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// The generation this timer ticks for.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Stop the timer.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Check if the timer has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// The event this timer sends.
    #[must_use]
    pub fn event(&self) -> TickEvent {
        TickEvent {
            generation: self.generation,
        }
    }
}

/// Send a [`TickEvent`] every `period` until the handle is cancelled or the
/// receiver goes away.
///
/// The first tick fires one full period after the call.
pub async fn run_ticker(handle: TickHandle, period: Duration, tx: mpsc::Sender<TickEvent>) {
    let start = tokio::time::Instant::now() + period;
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    debug!(generation = handle.generation, ?period, "Tick timer started");

    loop {
        if handle.is_cancelled() {
            break;
        }
        tokio::select! {
            () = handle.notify.notified() => {}
            _ = interval.tick() => {
                if handle.is_cancelled() {
                    break;
                }
                trace!(generation = handle.generation, "Tick");
                if tx.send(handle.event()).await.is_err() {
                    break;
                }
            }
        }
    }

    debug!(generation = handle.generation, "Tick timer stopped");
}
