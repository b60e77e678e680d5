//! Background statistics refresh
//!
//! Fetches `GET /stats` right away and then on a fixed interval, handing
//! each good reading to a callback. A failed fetch is logged and skipped,
//! so the last good reading stays on screen. Dropping the poller stops the
//! thread and waits for it.

use crate::api::{Backend, BackendStats};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

pub struct StatsPoller {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl StatsPoller {
    pub fn spawn<B, F>(backend: Arc<B>, interval: Duration, mut on_update: F) -> std::io::Result<Self>
    where
        B: Backend,
        F: FnMut(BackendStats) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("photoauth-stats".into())
            .spawn(move || loop {
                match backend.stats() {
                    Ok(stats) => on_update(stats),
                    Err(e) => debug!(error = %e, "stats refresh failed"),
                }
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    // Explicit stop or the poller was dropped.
                    _ => break,
                }
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
