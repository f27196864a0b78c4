//! dictgen/progress.rs
//! Non-blocking progress reporting for dictionary training.
use std::thread::{self, JoinHandle};

use crossbeam::channel::{bounded, Receiver, Sender, TrySendError};

use crate::constants::PROGRESS_CHANNEL_CAP;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub content_type: String,
    /// 0.0..=100.0
    pub percent: f64,
}

/// Offer `event` without blocking. Returns `false` when it was dropped
/// because the channel is full or nobody listens.
pub fn report(tx: &Sender<ProgressEvent>, event: ProgressEvent) -> bool {
    match tx.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
    }
}

pub fn progress_channel() -> (Sender<ProgressEvent>, Receiver<ProgressEvent>) {
    bounded(PROGRESS_CHANNEL_CAP)
}

/// Background consumer that logs progress until every sender is dropped.
pub struct ProgressReporter {
    handle: JoinHandle<usize>,
}

impl ProgressReporter {
    pub fn spawn() -> (Sender<ProgressEvent>, ProgressReporter) {
        let (tx, rx) = progress_channel();
        let handle = thread::spawn(move || {
            let mut seen = 0;
            for ev in rx.iter() {
                seen += 1;
                if ev.percent >= 100.0 {
                    log::info!("{}: samples read", ev.content_type);
                } else {
                    log::debug!("{}: {:.2}%", ev.content_type, ev.percent);
                }
            }
            seen
        });
        (tx, ProgressReporter { handle })
    }

    /// Wait for the consumer to drain; returns how many events it logged.
    pub fn join(self) -> usize {
        self.handle.join().unwrap_or(0)
    }
}
