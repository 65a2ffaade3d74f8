use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;

pub type Task = Box<dyn FnOnce()>;

/// Timer facilities of the host event loop.
pub trait Scheduler {
    /// Runs `task` once after `delay_ms`. Scheduled tasks cannot be cancelled.
    fn schedule(&self, delay_ms: u32, task: Task);

    /// Resolves after `delay_ms`.
    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()>;
}

/// Page navigation.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    fn redirect(&self, target: &str);

    /// Full URL of the current page.
    fn current_url(&self) -> String;
}

struct Pending {
    due_ms: u64,
    seq: u64,
    task: Task,
}

/// Scheduler driven by hand. Delayed tasks wait until the virtual clock is
/// advanced past their due time; `sleep` resolves immediately.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<ManualInner>,
}

#[derive(Default)]
struct ManualInner {
    now_ms: Cell<u64>,
    seq: Cell<u64>,
    pending: RefCell<Vec<Pending>>,
    sleeps: RefCell<Vec<u32>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.inner.now_ms.get()
    }

    pub fn pending(&self) -> usize {
        self.inner.pending.borrow().len()
    }

    /// Delays requested through `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<u32> {
        self.inner.sleeps.borrow().clone()
    }

    /// Moves the clock forward and runs every task that became due, in due
    /// order. Tasks scheduled while advancing run too if they fall inside the
    /// window.
    pub fn advance(&self, delta_ms: u64) -> usize {
        let target = self.inner.now_ms.get() + delta_ms;
        let mut ran = 0;
        loop {
            let next = {
                let mut pending = self.inner.pending.borrow_mut();
                let idx = pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due_ms <= target)
                    .min_by_key(|(_, p)| (p.due_ms, p.seq))
                    .map(|(idx, _)| idx);
                idx.map(|idx| pending.remove(idx))
            };
            let Some(next) = next else { break };
            self.inner.now_ms.set(next.due_ms.max(self.inner.now_ms.get()));
            (next.task)();
            ran += 1;
        }
        self.inner.now_ms.set(target);
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Task) {
        let seq = self.inner.seq.get();
        self.inner.seq.set(seq + 1);
        self.inner.pending.borrow_mut().push(Pending {
            due_ms: self.inner.now_ms.get() + u64::from(delay_ms),
            seq,
            task,
        });
    }

    fn sleep(&self, delay_ms: u32) -> LocalBoxFuture<'static, ()> {
        self.inner.sleeps.borrow_mut().push(delay_ms);
        future::ready(()).boxed_local()
    }
}
