//! Core domain: game state definitions for the run flow.

use bevy::prelude::*;

#[derive(States, Debug, Hash, Eq, PartialEq, Clone, Default)]
pub enum GameState {
    #[default]
    Boot,
    /// A boss encounter is live.
    Fight,
    /// Between encounters: after a victory or before a retry.
    Intermission,
    /// Every boss in the sequence has been defeated.
    Victory,
}
