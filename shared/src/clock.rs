//! Wall time and delayed callbacks.
//!
//! The browser implements [`Clock`] with `zoon::Timer`; tests use
//! [`TestClock`], whose time only moves when `advance_by()` is called.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local};

pub trait Clock {
    fn now(&self) -> DateTime<Local>;

    /// Run `callback` once after `delay_ms` milliseconds.
    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>);
}

/// Entry for a pending timer.
struct TimerEntry {
    /// When the timer should fire (virtual time in ms)
    fire_at_ms: u64,
    /// Insertion order, so timers due at the same instant fire FIFO
    sequence: u64,
    callback: Box<dyn FnOnce()>,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at_ms == other.fire_at_ms && self.sequence == other.sequence
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap: earliest fire time, then earliest insertion
        other
            .fire_at_ms
            .cmp(&self.fire_at_ms)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Default)]
struct TestClockInner {
    current_time_ms: u64,
    next_sequence: u64,
    pending_timers: BinaryHeap<TimerEntry>,
}

/// Virtual time clock for testing.
///
/// Cloning shares the same timeline.
#[derive(Clone)]
pub struct TestClock {
    origin: DateTime<Local>,
    inner: Rc<RefCell<TestClockInner>>,
}

impl TestClock {
    /// Create a new TestClock starting at virtual time 0.
    pub fn new() -> Self {
        Self {
            origin: Local::now(),
            inner: Rc::default(),
        }
    }

    /// Get the current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.inner.borrow().current_time_ms
    }

    /// Advance virtual time, firing every timer that comes due on the way.
    ///
    /// Callbacks run with the clock already moved to their fire time, and
    /// timers they schedule can fire within the same call.
    pub fn advance_by(&self, ms: u64) {
        let target_time = self.now_ms() + ms;
        loop {
            // No borrow held while a callback runs; it may schedule more timers
            let due = {
                let mut inner = self.inner.borrow_mut();
                let is_due = inner
                    .pending_timers
                    .peek()
                    .is_some_and(|entry| entry.fire_at_ms <= target_time);
                if is_due { inner.pending_timers.pop() } else { None }
            };
            let Some(entry) = due else {
                break;
            };
            self.inner.borrow_mut().current_time_ms = entry.fire_at_ms;
            (entry.callback)();
        }
        self.inner.borrow_mut().current_time_ms = target_time;
    }

    /// Check if there are any pending timers.
    pub fn has_pending_timers(&self) -> bool {
        !self.inner.borrow().pending_timers.is_empty()
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = i64::try_from(self.now_ms()).unwrap_or(i64::MAX);
        self.origin + Duration::milliseconds(elapsed)
    }

    fn schedule(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) {
        let mut inner = self.inner.borrow_mut();
        let fire_at_ms = inner.current_time_ms + u64::from(delay_ms);
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        inner.pending_timers.push(TimerEntry {
            fire_at_ms,
            sequence,
            callback,
        });
    }
}
