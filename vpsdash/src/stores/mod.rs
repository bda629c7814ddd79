//! Pollers, controllers and stores that own the client's view of the server.

pub mod downloads;
pub mod service;
pub mod status;
pub mod tasks;

use std::time::Instant;

use crate::command::Outbox;
use crate::notifier::Notifier;
use crate::render::Renderer;
use crate::scheduler::Scheduler;

/// Everything a component may touch while handling one command or reply.
pub struct Ctx<'a> {
    pub outbox: &'a mut Outbox,
    pub notifier: &'a mut Notifier,
    pub scheduler: &'a mut Scheduler,
    pub renderer: &'a mut dyn Renderer,
    pub now: Instant,
}

/// In-flight flag for one poller. A second fetch is never issued while one
/// is outstanding.
#[derive(Debug, Default)]
pub struct PollGuard {
    in_flight: bool,
    stale: bool,
}

impl PollGuard {
    /// True if the caller may issue the fetch; false drops the cycle.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Like [`try_begin`](Self::try_begin), but a refused caller marks the
    /// outstanding result as stale so its owner fetches again once it lands.
    pub fn begin_or_mark_stale(&mut self) -> bool {
        if self.try_begin() {
            return true;
        }
        self.stale = true;
        false
    }

    /// Mark the outstanding fetch, if any, as stale. Nothing is issued.
    pub fn invalidate(&mut self) {
        if self.in_flight {
            self.stale = true;
        }
    }

    /// Clear the flag at the end of a cycle, whatever its outcome.
    /// Returns whether the finished fetch was marked stale.
    pub fn finish(&mut self) -> bool {
        self.in_flight = false;
        std::mem::take(&mut self.stale)
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }
}

#[cfg(test)]
pub(crate) mod harness {
    use std::time::{Duration, Instant};

    use super::Ctx;
    use crate::command::Outbox;
    use crate::notifier::Notifier;
    use crate::render::recording::Recorder;
    use crate::scheduler::Scheduler;

    /// Owned backing state for a [`Ctx`] in unit tests.
    pub struct Harness {
        pub outbox: Outbox,
        pub notifier: Notifier,
        pub scheduler: Scheduler,
        pub renderer: Recorder,
        pub now: Instant,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                outbox: Outbox::default(),
                notifier: Notifier::new(Duration::from_secs(3)),
                scheduler: Scheduler::new(),
                renderer: Recorder::default(),
                now: Instant::now(),
            }
        }

        pub fn cx(&mut self) -> Ctx<'_> {
            Ctx {
                outbox: &mut self.outbox,
                notifier: &mut self.notifier,
                scheduler: &mut self.scheduler,
                renderer: &mut self.renderer,
                now: self.now,
            }
        }

        pub fn toast(&self) -> Option<(crate::notifier::Severity, &str)> {
            self.notifier
                .current()
                .map(|t| (t.severity, t.message.as_str()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PollGuard;

    #[test]
    fn guard_drops_while_in_flight_and_reports_staleness() {
        let mut g = PollGuard::default();
        assert!(g.try_begin());
        assert!(!g.try_begin());
        assert!(!g.finish());

        assert!(g.try_begin());
        assert!(!g.begin_or_mark_stale());
        assert!(g.in_flight());
        assert!(g.finish());
        assert!(!g.in_flight());
    }

    #[test]
    fn invalidate_only_touches_an_outstanding_fetch() {
        let mut g = PollGuard::default();
        g.invalidate();
        assert!(g.try_begin());
        assert!(!g.finish());

        assert!(g.try_begin());
        g.invalidate();
        assert!(g.finish());
    }
}
