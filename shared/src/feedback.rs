//! Transient "Copied!" / "Copy failed" acknowledgment on the copy buttons.

use futures_signals::signal::{Mutable, Signal};

use crate::clock::Clock;

pub const COPY_FEEDBACK_DURATION_MS: u32 = 1600;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyStatus {
    #[default]
    Idle,
    Copied,
    Failed,
}

/// Feedback state of one pane's copy button.
///
/// Every `show()` schedules its own reset, but a reset only applies if no
/// newer `show()` happened since, so the status lasts
/// [`COPY_FEEDBACK_DURATION_MS`] after the latest copy. An earlier reset
/// that comes due inside a newer window is stale and leaves it alone.
#[derive(Clone, Default)]
pub struct CopyFeedback {
    status: Mutable<CopyStatus>,
    generation: Mutable<u64>,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> CopyStatus {
        self.status.get()
    }

    pub fn is_copied(&self) -> bool {
        self.status() == CopyStatus::Copied
    }

    pub fn status_signal(&self) -> impl Signal<Item = CopyStatus> + use<> {
        self.status.signal()
    }

    pub fn show(&self, status: CopyStatus, clock: &impl Clock) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.status.set_neq(status);

        let this = self.clone();
        clock.schedule(
            COPY_FEEDBACK_DURATION_MS,
            Box::new(move || this.expire(generation)),
        );
    }

    fn expire(&self, generation: u64) {
        if self.generation.get() == generation {
            self.status.set_neq(CopyStatus::Idle);
        }
    }
}
