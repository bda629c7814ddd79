//! Cancellable interval and one-shot timers that yield [`Command`]s.
//!
//! The scheduler never sleeps: the event loop asks for the next deadline,
//! waits on it, then drains whatever is due. Passing `now` in keeps the
//! timers testable without a clock.

use std::time::{Duration, Instant};

use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Entry {
    handle: TimerHandle,
    due: Instant,
    period: Option<Duration>,
    command: Command,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, due: Instant, period: Option<Duration>, command: Command) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.entries.push(Entry {
            handle,
            due,
            period,
            command,
        });
        handle
    }

    /// Fire `command` every `period`, first at `now + period`.
    pub fn start_interval(&mut self, period: Duration, command: Command, now: Instant) -> TimerHandle {
        self.insert(now + period, Some(period), command)
    }

    pub fn schedule_once(&mut self, delay: Duration, command: Command, now: Instant) -> TimerHandle {
        self.insert(now + delay, None, command)
    }

    /// Returns false when the handle already fired (one-shot) or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Drain every command due at `now`, in deadline order. Intervals are
    /// re-armed; a late interval fires once and skips the missed ticks.
    pub fn take_due(&mut self, now: Instant) -> Vec<Command> {
        let mut due: Vec<(Instant, Command)> = Vec::new();
        self.entries.retain_mut(|e| {
            if e.due > now {
                return true;
            }
            due.push((e.due, e.command.clone()));
            match e.period {
                Some(period) => {
                    e.due += period;
                    if e.due <= now {
                        e.due = now + period;
                    }
                    true
                }
                None => false,
            }
        });
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, c)| c).collect()
    }
}
