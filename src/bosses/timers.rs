//! Bosses domain: per-encounter registry of delayed and repeating actions.
//!
//! Every scheduled action owns a [`TimerId`]. Advancing the registry only counts how often each
//! timer came due; actions are handed out one at a time by [`TimerRegistry::pop_due`], so a
//! timer cancelled while earlier actions are being dispatched never fires.

use std::collections::BTreeMap;
use std::time::Duration;

use bevy::prelude::*;

/// Shortest cadence a repeating timer may run at.
const MIN_REPEAT_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct ScheduledTimer<A> {
    timer: Timer,
    action: A,
    due: u32,
}

impl<A> ScheduledTimer<A> {
    fn repeating(&self) -> bool {
        self.timer.mode() == TimerMode::Repeating
    }
}

#[derive(Debug)]
pub struct TimerRegistry<A> {
    next_id: u64,
    timers: BTreeMap<TimerId, ScheduledTimer<A>>,
}

impl<A> Default for TimerRegistry<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            timers: BTreeMap::new(),
        }
    }
}

impl<A: Clone> TimerRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires `action` once after `delay`. A zero delay fires on the next [`pop_due`](Self::pop_due).
    pub fn schedule_once(&mut self, delay: Duration, action: A) -> TimerId {
        let due = u32::from(delay.is_zero());
        self.insert(Timer::new(delay, TimerMode::Once), action, due)
    }

    /// Fires `action` every `interval` until cancelled.
    pub fn schedule_repeating(&mut self, interval: Duration, action: A) -> TimerId {
        let interval = interval.max(MIN_REPEAT_INTERVAL);
        self.insert(Timer::new(interval, TimerMode::Repeating), action, 0)
    }

    fn insert(&mut self, timer: Timer, action: A, due: u32) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, ScheduledTimer { timer, action, due });
        id
    }

    /// Advances every live timer by `delta`, queueing the actions that came due.
    pub fn advance(&mut self, delta: Duration) {
        for scheduled in self.timers.values_mut() {
            if scheduled.repeating() {
                scheduled.timer.tick(delta);
                scheduled.due += scheduled.timer.times_finished_this_tick();
            } else if scheduled.due == 0 {
                scheduled.timer.tick(delta);
                if scheduled.timer.just_finished() {
                    scheduled.due = 1;
                }
            }
        }
    }

    /// Takes the next queued action, oldest timer first. One-shot timers are released once fired.
    pub fn pop_due(&mut self) -> Option<(TimerId, A)> {
        let (&id, scheduled) = self.timers.iter_mut().find(|(_, t)| t.due > 0)?;
        scheduled.due -= 1;
        let action = scheduled.action.clone();
        if !scheduled.repeating() {
            self.timers.remove(&id);
        }
        Some((id, action))
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    /// Cancels everything. Returns how many timers were still live.
    pub fn clear(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn remaining(&self, id: TimerId) -> Option<Duration> {
        self.timers.get(&id).map(|t| t.timer.remaining())
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
