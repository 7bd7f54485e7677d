//! Background refresh loop of an open Monitor tab

use super::engine::RefreshEngine;
use super::view::MonitorView;
use crate::host::PanelHost;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle of a running refresh loop.
///
/// The loop runs a tick, reports its changes to the host, then sleeps for
/// the interval, so ticks never overlap. Cancellation takes effect between
/// ticks. Dropping the handle stops it.
pub struct RefreshTask {
    token: CancellationToken,
    handle: Option<JoinHandle<MonitorView>>,
}

impl RefreshTask {
    /// Start refreshing `view` every `interval`
    pub fn spawn(
        engine: RefreshEngine,
        mut view: MonitorView,
        interval: Duration,
        host: Arc<dyn PanelHost>,
    ) -> Self {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let handle = tokio::spawn(async move {
            tracing::info!(device = %engine.device(), ?interval, "monitor refresh started");
            while !cancelled.is_cancelled() {
                // A started tick always runs to completion
                let changes = engine.tick(&mut view).await;
                if !changes.is_empty() {
                    host.update_monitor(&view, &changes);
                }

                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
            tracing::info!(device = %engine.device(), "monitor refresh stopped");
            view
        });

        Self {
            token,
            handle: Some(handle),
        }
    }

    /// Ask the loop to stop; no tick starts after this returns
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the loop has been asked to stop
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Whether the loop has exited
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the loop and wait for it, returning the last view state
    pub async fn stop(mut self) -> Option<MonitorView> {
        self.token.cancel();
        let handle = self.handle.take()?;
        match handle.await {
            Ok(view) => Some(view),
            Err(e) => {
                tracing::warn!("monitor refresh task failed: {e}");
                None
            }
        }
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
