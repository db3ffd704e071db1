use std::{cell::RefCell, rc::Rc};

/// Schedules delayed continuations on the host event loop.
///
/// Dropping a handle cancels its task; `detach` lets the task run regardless.
pub trait Scheduler {
    type Handle;

    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Self::Handle;
    fn detach(&self, handle: Self::Handle);
}

/// Coalesces bursts of triggers into one run of `action` after a quiet period.
pub struct Debouncer<S: Scheduler> {
    scheduler: S,
    delay_ms: u32,
    action: Rc<dyn Fn()>,
    pending: RefCell<Option<S::Handle>>,
}

impl<S: Scheduler> Debouncer<S> {
    pub fn new(scheduler: S, delay_ms: u32, action: impl Fn() + 'static) -> Self {
        Self {
            scheduler,
            delay_ms,
            action: Rc::new(action),
            pending: RefCell::new(None),
        }
    }

    pub fn trigger(&self) {
        // Cancel before scheduling so at most one timer is ever outstanding.
        let superseded = self.pending.borrow_mut().take();
        drop(superseded);

        let action = Rc::clone(&self.action);
        let handle = self
            .scheduler
            .schedule(self.delay_ms, Box::new(move || action()));
        *self.pending.borrow_mut() = Some(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualScheduler;
    use std::cell::Cell;

    fn counting_debouncer(scheduler: &ManualScheduler, delay_ms: u32) -> (Debouncer<ManualScheduler>, Rc<Cell<u32>>) {
        let runs = Rc::new(Cell::new(0));
        let counter = Rc::clone(&runs);
        let debouncer = Debouncer::new(scheduler.clone(), delay_ms, move || {
            counter.set(counter.get() + 1);
        });
        (debouncer, runs)
    }

    #[test]
    fn burst_runs_once_after_quiet_period() {
        let scheduler = ManualScheduler::default();
        let (debouncer, runs) = counting_debouncer(&scheduler, 250);

        for _ in 0..5 {
            debouncer.trigger();
            assert_eq!(scheduler.pending(), 1);
            scheduler.advance(40);
        }

        scheduler.advance(209);
        assert_eq!(runs.get(), 0);

        scheduler.advance(1);
        assert_eq!(runs.get(), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn separated_triggers_each_run() {
        let scheduler = ManualScheduler::default();
        let (debouncer, runs) = counting_debouncer(&scheduler, 250);

        debouncer.trigger();
        scheduler.advance(300);
        debouncer.trigger();
        scheduler.advance(300);

        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn untriggered_debouncer_never_runs() {
        let scheduler = ManualScheduler::default();
        let (_debouncer, runs) = counting_debouncer(&scheduler, 250);

        scheduler.advance(10_000);
        assert_eq!(runs.get(), 0);
    }
}
