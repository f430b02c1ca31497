use log::debug;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Callback invoked on every animation tick.
pub type TickCallback = Box<dyn FnMut()>;

/// The injected clock capability.
///
/// The overlay never owns a timer thread: ticks are deferred callbacks
/// re-enqueued onto the host's single-threaded draw/event loop. Hosts bridge
/// this to their platform's animation facility; tests use [`ManualScheduler`].
pub trait Scheduler {
    /// Schedules `tick` to run every `interval` until the handle is cancelled
    /// or dropped.
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Box<dyn ScheduleHandle>;
}

/// Cancellation handle for a repeating schedule.
///
/// Cancellation is synchronous: once `cancel` returns, no further ticks fire.
pub trait ScheduleHandle {
    fn cancel(&mut self);
}

struct ManualEntry {
    interval: Duration,
    next_due: Duration,
    tick: TickCallback,
    cancelled: Rc<Cell<bool>>,
}

/// A manually advanced virtual clock.
///
/// Ticks fire only from within [`advance`](ManualScheduler::advance), in due
/// order, on the calling thread. Suitable for tests and for hosts that pump
/// their own frame clock.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    entries: RefCell<Vec<ManualEntry>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the virtual clock forward, firing every due tick in time order.
    pub fn advance(&self, elapsed: Duration) {
        let target = self.now.get() + elapsed;
        loop {
            self.entries.borrow_mut().retain(|entry| !entry.cancelled.get());
            let due = self
                .entries
                .borrow()
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.next_due <= target)
                .min_by_key(|(_, entry)| entry.next_due)
                .map(|(index, entry)| (index, entry.next_due));
            let Some((index, due)) = due else {
                break;
            };
            // Take the entry out so the tick can re-enter the scheduler.
            let mut entry = self.entries.borrow_mut().remove(index);
            self.now.set(due);
            entry.next_due += entry.interval;
            (entry.tick)();
            if !entry.cancelled.get() {
                self.entries.borrow_mut().push(entry);
            }
        }
        self.now.set(target);
    }
}

struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl ScheduleHandle for ManualHandle {
    fn cancel(&mut self) {
        self.cancelled.set(true);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, tick: TickCallback) -> Box<dyn ScheduleHandle> {
        let interval = interval.max(Duration::from_millis(1));
        let cancelled = Rc::new(Cell::new(false));
        self.entries.borrow_mut().push(ManualEntry {
            interval,
            next_due: self.now.get() + interval,
            tick,
            cancelled: cancelled.clone(),
        });
        Box::new(ManualHandle { cancelled })
    }
}

/// Drives the sweep phase: a Stopped/Running state machine advancing a
/// normalized phase in `[0, 1)` at a fixed cadence.
///
/// The phase is owned here exclusively; renderers read it through the frame
/// context. Wrapping is instantaneous, so the animation stays bounded with no
/// drift.
pub struct SweepDriver {
    scheduler: Rc<dyn Scheduler>,
    redraw: Rc<dyn Fn()>,
    phase: Rc<Cell<f32>>,
    handle: Option<Box<dyn ScheduleHandle>>,
}

impl SweepDriver {
    pub fn new(scheduler: Rc<dyn Scheduler>, redraw: Rc<dyn Fn()>) -> Self {
        Self { scheduler, redraw, phase: Rc::new(Cell::new(0.0)), handle: None }
    }

    /// Current sweep phase in `[0, 1)`.
    pub fn phase(&self) -> f32 {
        self.phase.get()
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Starts ticking. Idempotent while already running.
    pub fn start(&mut self, interval: Duration, step: f32) {
        if self.handle.is_some() {
            return;
        }
        debug!("starting sweep driver: interval={interval:?} step={step}");
        let phase = self.phase.clone();
        let redraw = self.redraw.clone();
        let tick = Box::new(move || {
            phase.set((phase.get() + step).rem_euclid(1.0));
            redraw();
        });
        self.handle = Some(self.scheduler.schedule_repeating(interval, tick));
    }

    /// Cancels the pending tick. Idempotent while already stopped. A tick
    /// already mid-flight on the loop completes harmlessly.
    pub fn stop(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            debug!("stopping sweep driver");
            handle.cancel();
        }
    }
}

impl Drop for SweepDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
