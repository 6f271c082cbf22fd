//! Timers behind a trait so sequencing code can run without a browser.

use gloo_timers::future::TimeoutFuture;

/// Source of delays for pacing and teardown.
#[allow(async_fn_in_trait)]
pub trait Clock {
    async fn sleep(&self, millis: u32);
}

/// `setTimeout`-backed clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    async fn sleep(&self, millis: u32) {
        TimeoutFuture::new(millis).await;
    }
}
