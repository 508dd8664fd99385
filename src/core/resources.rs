//! Core domain: shared resources for run configuration and progression.

use bevy::prelude::*;
use rand::Rng;
use std::time::Duration;

use crate::encounter::PlayerSnapshot;

const INTERMISSION_SECS: f32 = 2.0;

#[derive(Resource, Debug)]
pub struct RunConfig {
    pub seed: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: rand::rng().random(),
        }
    }
}

/// Where the run is in the boss sequence and what the player carries between fights.
#[derive(Resource, Debug, Default)]
pub struct BossProgress {
    /// Index into the registry's boss sequence.
    pub position: usize,
    /// Losses against the boss at `position`.
    pub attempts: u32,
    /// Encounters started this run; mixed into each encounter's seed.
    pub encounters_started: u32,
    /// Player state handed over by the last resolved encounter.
    pub carried: Option<PlayerSnapshot>,
}

impl BossProgress {
    /// Moves on to the next boss. Returns false when the sequence is exhausted.
    pub fn advance(&mut self, snapshot: PlayerSnapshot, sequence_len: usize) -> bool {
        self.carried = Some(snapshot);
        self.attempts = 0;
        self.position += 1;
        self.position < sequence_len
    }

    /// Sets up a retry of the same boss with the carried state at full health.
    pub fn retry(&mut self, snapshot: PlayerSnapshot) {
        self.carried = Some(snapshot.with_full_health());
        self.attempts += 1;
    }
}

/// Pause between encounters.
#[derive(Resource, Debug)]
pub struct IntermissionTimer(pub Timer);

impl Default for IntermissionTimer {
    fn default() -> Self {
        Self(Timer::new(
            Duration::from_secs_f32(INTERMISSION_SECS),
            TimerMode::Once,
        ))
    }
}
