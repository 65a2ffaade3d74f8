use futures::future::LocalBoxFuture;
use futures::FutureExt;
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use tracing::warn;
use web_sys::Window;

use crate::utils::timers::{Navigator, Scheduler, Task};

pub struct BrowserScheduler;

impl Scheduler for BrowserScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) {
        Timeout::new(delay_ms, task).forget();
    }

    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()> {
        TimeoutFuture::new(delay_ms).boxed_local()
    }
}

pub struct BrowserNavigator {
    window: Window,
}

impl BrowserNavigator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for BrowserNavigator {
    fn redirect(&self, target: &str) {
        if let Err(e) = self.window.location().set_href(target) {
            warn!("Failed to navigate to {}: {:?}", target, e);
        }
    }

    fn current_url(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }
}
