//! Arena domain: the physical fight space and its bridge to the encounter.

mod collisions;
mod components;
mod frame;
mod input;
mod noise;
mod spawn;

pub use components::{BossBody, PlayerBody};
pub use frame::to_arena;

use bevy::prelude::*;

use crate::arena::collisions::{repeat_lingering_contacts, route_collisions};
use crate::arena::input::{
    detect_ground, expire_strikes, follow_player, move_player, player_skills, player_strikes,
};
use crate::arena::noise::{NoiseControl, adjust_noise, reset_noise};
use crate::arena::spawn::{
    apply_spawn_signals, despawn_arena, move_boss, settle_effects, spawn_arena, steer_minions,
    steer_projectiles,
};
use crate::core::GameState;
use crate::encounter::{EncounterSet, begin_encounter};

pub struct ArenaPlugin;

impl Plugin for ArenaPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NoiseControl>()
            .add_systems(
                OnEnter(GameState::Fight),
                (spawn_arena, reset_noise).after(begin_encounter),
            )
            .add_systems(OnExit(GameState::Fight), despawn_arena)
            .add_systems(
                Update,
                (
                    detect_ground,
                    move_player,
                    player_strikes,
                    player_skills,
                    follow_player,
                    expire_strikes,
                    adjust_noise,
                )
                    .chain()
                    .before(EncounterSet::Route)
                    .run_if(in_state(GameState::Fight)),
            )
            .add_systems(
                Update,
                (route_collisions, repeat_lingering_contacts)
                    .chain()
                    .in_set(EncounterSet::Route)
                    .run_if(in_state(GameState::Fight)),
            )
            .add_systems(
                Update,
                (
                    apply_spawn_signals,
                    steer_projectiles,
                    steer_minions,
                    move_boss,
                    settle_effects,
                )
                    .chain()
                    .in_set(EncounterSet::Present)
                    .run_if(in_state(GameState::Fight)),
            );
    }
}
