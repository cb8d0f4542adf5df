//! Deferred callbacks for lifecycle transitions.
//!
//! Everything runs on one execution context. Controllers never sleep; they
//! hand callbacks to a [`TimerService`] and the event loop decides when time
//! moves forward. Tests drive a [`Scheduler`] by hand, the demo binary feeds
//! it wall-clock time from a [`SystemClock`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::{Duration, Instant};

/// A callback armed on a timer.
pub type TimerCallback = Box<dyn FnOnce()>;

/// Identity of a scheduled callback, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Schedule/cancel interface consumed by the overlay and notification controllers.
pub trait TimerService {
    /// Current logical time.
    fn now(&self) -> Duration;

    /// Run `callback` once `delay` has elapsed. A zero delay means "next tick":
    /// the callback never runs synchronously inside `schedule`.
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId;

    /// Cancel a pending callback. Returns `false` if it already fired or was
    /// cancelled before.
    fn cancel(&self, id: TimerId) -> bool;
}

/// Single-threaded timer queue with a logical clock.
///
/// Callbacks fire ordered by due time, then by scheduling order. Before each
/// callback runs the clock is moved to its due time, so a timer armed from
/// inside a callback is measured from the moment that callback fired.
#[derive(Default)]
pub struct Scheduler {
    now: Cell<Duration>,
    next_seq: Cell<u64>,
    queue: RefCell<BTreeMap<(Duration, u64), TimerCallback>>,
    due: RefCell<HashMap<u64, Duration>>,
}

impl Scheduler {
    /// Create a scheduler whose clock starts at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `delta`, firing everything that becomes due.
    /// Returns the number of callbacks fired.
    pub fn advance(&self, delta: Duration) -> usize {
        self.advance_to(self.now.get() + delta)
    }

    /// Fire callbacks that are already due (including next-tick callbacks)
    /// without moving the clock.
    pub fn tick(&self) -> usize {
        self.advance_to(self.now.get())
    }

    /// Move the clock to `target`, firing everything due at or before it.
    /// A target in the past only fires what is already due.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            // Release the queue borrow before running the callback so it can
            // schedule or cancel freely.
            let next = {
                let mut queue = self.queue.borrow_mut();
                match queue.first_key_value() {
                    Some((&(due, _), _)) if due <= target => queue.pop_first(),
                    _ => None,
                }
            };
            let Some(((due, seq), callback)) = next else {
                break;
            };
            self.due.borrow_mut().remove(&seq);
            if due > self.now.get() {
                self.now.set(due);
            }
            callback();
            fired += 1;
        }
        if target > self.now.get() {
            self.now.set(target);
        }
        fired
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Due time of the earliest pending callback.
    pub fn next_due(&self) -> Option<Duration> {
        self.queue.borrow().keys().next().map(|(due, _)| *due)
    }
}

impl TimerService for Scheduler {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerId {
        let seq = self.next_seq.get();
        self.next_seq.set(seq + 1);
        let due = self.now.get() + delay;
        self.queue.borrow_mut().insert((due, seq), callback);
        self.due.borrow_mut().insert(seq, due);
        TimerId(seq)
    }

    fn cancel(&self, id: TimerId) -> bool {
        let Some(due) = self.due.borrow_mut().remove(&id.0) else {
            return false;
        };
        // Dropping the callback outside the borrow; it may own controller handles.
        let removed = self.queue.borrow_mut().remove(&(due, id.0));
        removed.is_some()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}

/// Wall-clock source for driving a [`Scheduler`] from a real event loop.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start measuring from now.
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Time elapsed since [`SystemClock::start`].
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> TimerCallback) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &'static str| -> TimerCallback {
            let sink = sink.clone();
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_zero_delay_waits_for_tick() {
        let scheduler = Scheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(Duration::ZERO, make("tick"));
        assert!(log.borrow().is_empty());

        assert_eq!(scheduler.tick(), 1);
        assert_eq!(*log.borrow(), vec!["tick"]);
    }

    #[test]
    fn test_fires_in_due_then_schedule_order() {
        let scheduler = Scheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(ms(20), make("late"));
        scheduler.schedule(ms(10), make("first"));
        scheduler.schedule(ms(10), make("second"));

        scheduler.advance(ms(25));
        assert_eq!(*log.borrow(), vec!["first", "second", "late"]);
        assert_eq!(scheduler.now(), ms(25));
    }

    #[test]
    fn test_not_due_yet() {
        let scheduler = Scheduler::new();
        let (log, make) = recorder();
        scheduler.schedule(ms(100), make("a"));

        assert_eq!(scheduler.advance(ms(99)), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.advance(ms(1)), 1);
    }

    #[test]
    fn test_cancel() {
        let scheduler = Scheduler::new();
        let (log, make) = recorder();
        let id = scheduler.schedule(ms(10), make("cancelled"));

        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        scheduler.advance(ms(50));
        assert!(log.borrow().is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_cancel_after_fire_is_false() {
        let scheduler = Scheduler::new();
        let (_log, make) = recorder();
        let id = scheduler.schedule(ms(1), make("x"));
        scheduler.advance(ms(1));
        assert!(!scheduler.cancel(id));
    }

    #[test]
    fn test_nested_timer_measured_from_callback_time() {
        let scheduler = Rc::new(Scheduler::new());
        let fired_at = Rc::new(Cell::new(None));

        let inner_scheduler = scheduler.clone();
        let inner_fired = fired_at.clone();
        scheduler.schedule(
            ms(1000),
            Box::new(move || {
                let at = inner_fired.clone();
                let clock = inner_scheduler.clone();
                inner_scheduler.schedule(ms(300), Box::new(move || at.set(Some(clock.now()))));
            }),
        );

        // One big jump still runs the nested timer at 1300, not 1000 + jump.
        scheduler.advance(ms(2000));
        assert_eq!(fired_at.get(), Some(ms(1300)));
        assert_eq!(scheduler.now(), ms(2000));
    }

    #[test]
    fn test_next_due() {
        let scheduler = Scheduler::new();
        assert_eq!(scheduler.next_due(), None);
        scheduler.schedule(ms(40), Box::new(|| {}));
        scheduler.schedule(ms(15), Box::new(|| {}));
        assert_eq!(scheduler.next_due(), Some(ms(15)));
    }

    #[test]
    fn test_advance_to_past_does_not_rewind() {
        let scheduler = Scheduler::new();
        scheduler.advance(ms(50));
        scheduler.advance_to(ms(10));
        assert_eq!(scheduler.now(), ms(50));
    }
}
