//! Explicit task context (§9's "global singletons" redesign flag):
//! logger span, db pool, config, progress callback and pause/cancel flags
//! are threaded down through one `Context` value rather than read off
//! ambient globals.

use crate::error::OrchestratorError;
use crate::progress::ProgressSnapshot;
use common::ScraperConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Notify;
use tokio::time::sleep;
use tracing::Span;

pub type ProgressCallback = Box<dyn Fn(&ProgressSnapshot) + Send + Sync>;

/// Cooperative pause/cancel signaling (§4.5 "Pause/cancel", §9's
/// "exceptions for control flow" redesign flag). A plain `Arc<AtomicBool>`
/// pair is sufficient at this scale; no external cancellation-token crate
/// is pulled in solely for this.
pub struct Context {
    pub span: Span,
    pub config: ScraperConfig,
    pub progress: ProgressCallback,
    pause_flag: Arc<AtomicBool>,
    pause_notify: Arc<Notify>,
    cancel_flag: Arc<AtomicBool>,
}

impl Context {
    pub fn new(span: Span, config: ScraperConfig, progress: ProgressCallback) -> Self {
        Self {
            span,
            config,
            progress,
            pause_flag: Arc::new(AtomicBool::new(false)),
            pause_notify: Arc::new(Notify::new()),
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn pause_handle(&self) -> PauseHandle {
        PauseHandle { flag: self.pause_flag.clone(), notify: self.pause_notify.clone() }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle { flag: self.cancel_flag.clone() }
    }

    /// Checked at every suspension point named in §4.5/§5. Returns
    /// `Err(Cancelled)` if cancel was requested, blocks (without parking
    /// the async runtime's other tasks) while paused, and escalates to
    /// cancellation if the pause outlasts `config.pause_timeout`.
    pub async fn checkpoint(&self) -> Result<(), OrchestratorError> {
        if self.cancel_flag.load(Ordering::SeqCst) {
            return Err(OrchestratorError::Cancelled);
        }
        if !self.pause_flag.load(Ordering::SeqCst) {
            return Ok(());
        }

        tracing::info!("task paused, waiting to resume");
        let started = Instant::now();
        while self.pause_flag.load(Ordering::SeqCst) {
            if self.cancel_flag.load(Ordering::SeqCst) {
                return Err(OrchestratorError::Cancelled);
            }
            if started.elapsed() >= self.config.pause_timeout {
                tracing::warn!("pause exceeded timeout, escalating to cancel");
                self.cancel_flag.store(true, Ordering::SeqCst);
                return Err(OrchestratorError::PauseTimeout);
            }
            tokio::select! {
                _ = self.pause_notify.notified() => {}
                _ = sleep(std::time::Duration::from_millis(250)) => {}
            }
        }
        Ok(())
    }
}

/// Held by the caller that wants to pause/resume a running task.
#[derive(Clone)]
pub struct PauseHandle {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl PauseHandle {
    pub fn pause(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.flag.store(false, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_paused(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Held by the caller that wants to cancel a running task.
#[derive(Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> Context {
        Context::new(tracing::Span::none(), ScraperConfig::default(), Box::new(|_| {}))
    }

    #[tokio::test]
    async fn checkpoint_passes_when_idle() {
        let ctx = test_context();
        assert!(ctx.checkpoint().await.is_ok());
    }

    #[tokio::test]
    async fn checkpoint_fails_after_cancel() {
        let ctx = test_context();
        ctx.cancel_handle().cancel();
        assert!(matches!(ctx.checkpoint().await, Err(OrchestratorError::Cancelled)));
    }

    #[tokio::test]
    async fn checkpoint_resumes_once_unpaused() {
        let ctx = test_context();
        let pause = ctx.pause_handle();
        pause.pause();

        let resumed = tokio::spawn({
            let pause = pause.clone();
            async move {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                pause.resume();
            }
        });

        ctx.checkpoint().await.unwrap();
        resumed.await.unwrap();
    }
}
