//! Core domain: run state machine, seed and boss progression.

mod resources;
mod state;
mod systems;

pub use resources::{BossProgress, IntermissionTimer, RunConfig};
pub use state::GameState;

use bevy::prelude::*;

use crate::core::systems::{
    finish_boot, handle_encounter_resolved, leave_intermission, setup_camera,
};
use crate::encounter::EncounterSet;

pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<RunConfig>()
            .init_resource::<BossProgress>()
            .init_resource::<IntermissionTimer>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, finish_boot.run_if(in_state(GameState::Boot)))
            .add_systems(
                Update,
                handle_encounter_resolved
                    .in_set(EncounterSet::Present)
                    .run_if(in_state(GameState::Fight)),
            )
            .add_systems(
                Update,
                leave_intermission.run_if(in_state(GameState::Intermission)),
            );
    }
}
