//! Executor and view seams.
//!
//! Everything runs on one thread. The engine never blocks; it spawns local
//! tasks for network calls and sleeps for the settle delay.

use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Single-threaded task spawning and timers.
pub trait Runtime {
    /// Run `task` to completion in the background on the current thread.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    /// A future that completes after `duration`.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// Page-level side effects that accompany a selection change.
pub trait Viewport {
    fn scroll_to_top(&self);
}

/// Viewport for environments without a page (CLI, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_to_top(&self) {}
}

/// Tokio runtime. Tasks go through `spawn_local`, so callers must be inside
/// a `tokio::task::LocalSet`.
#[cfg(any(test, feature = "native"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioRuntime;

#[cfg(any(test, feature = "native"))]
impl Runtime for TokioRuntime {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }

    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
