use std::time::{Duration, Instant};

/// What a timer does when it fires. The session interprets these; the clock
/// only keeps the deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    HideLabels,
    RevealLabels,
    AutoSpawn,
}

/// Cancel handle for one scheduled entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    id: TimerId,
    due: Instant,
    repeat: Option<Duration>,
    action: TimerAction,
}

/// Registry of outstanding delayed/repeating actions scoped to one session.
/// Driven cooperatively: the owner polls `fire_due` on every tick with an
/// injected `now`, so tests never sleep. Zero-delay scheduling is the
/// caller's edge case: the session applies such actions synchronously and
/// never registers them here.
#[derive(Debug, Default)]
pub struct SessionClock {
    entries: Vec<Entry>,
    next_id: u64,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::default()
    }

    fn register(
        &mut self,
        action: TimerAction,
        due: Instant,
        repeat: Option<Duration>,
    ) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(Entry {
            id,
            due,
            repeat,
            action,
        });
        id
    }

    /// One-shot; deregisters itself when it fires.
    pub fn after(&mut self, action: TimerAction, delay: Duration, now: Instant) -> TimerId {
        self.register(action, now + delay, None)
    }

    /// Repeating; re-arms from the poll time on every fire.
    pub fn every(&mut self, action: TimerAction, interval: Duration, now: Instant) -> TimerId {
        self.register(action, now + interval, Some(interval))
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|entry| entry.id != id);
    }

    /// Forgets every outstanding entry. Must run on every session-ending
    /// transition so no stale timer mutates a torn-down board.
    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pops every due entry in deadline order. One-shots are forgotten,
    /// repeating entries are re-armed relative to `now`.
    pub fn fire_due(&mut self, now: Instant) -> Vec<TimerAction> {
        let mut due: Vec<(Instant, TimerAction)> = Vec::new();

        self.entries.retain_mut(|entry| {
            if entry.due > now {
                return true;
            }
            due.push((entry.due, entry.action));
            match entry.repeat {
                Some(interval) => {
                    entry.due = now + interval;
                    true
                }
                None => false,
            }
        });

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, action)| action).collect()
    }
}
