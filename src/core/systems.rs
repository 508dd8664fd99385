//! Core domain: core run flow systems and setup.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::content::BossRegistry;
use crate::core::resources::{BossProgress, IntermissionTimer, RunConfig};
use crate::core::state::GameState;
use crate::encounter::{EncounterOutcome, EncounterResolved};

pub(crate) fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Leaves boot once content is in place.
pub(crate) fn finish_boot(
    registry: Option<Res<BossRegistry>>,
    config: Res<RunConfig>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    match registry {
        Some(registry) if !registry.is_empty() => {
            info!("Starting run with seed: {}", config.seed);
            game_state.set(GameState::Fight);
        }
        _ => error!("No bosses loaded; staying in boot"),
    }
}

/// Victory moves to the next boss (or ends the run); defeat retries the same boss.
pub(crate) fn handle_encounter_resolved(
    mut events: MessageReader<EncounterResolved>,
    registry: Res<BossRegistry>,
    mut progress: ResMut<BossProgress>,
    mut timer: ResMut<IntermissionTimer>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    for event in events.read() {
        match event.outcome {
            EncounterOutcome::PlayerVictory => {
                info!("{} defeated!", event.boss_id);
                if progress.advance(event.snapshot.clone(), registry.len()) {
                    timer.0.reset();
                    game_state.set(GameState::Intermission);
                } else {
                    info!("Victory! Defeated all {} bosses.", registry.len());
                    game_state.set(GameState::Victory);
                }
            }
            EncounterOutcome::PlayerDefeated => {
                progress.retry(event.snapshot.clone());
                info!(
                    "Defeated by {}; retrying (attempt {})",
                    event.boss_id,
                    progress.attempts + 1
                );
                timer.0.reset();
                game_state.set(GameState::Intermission);
            }
            EncounterOutcome::Pending => {
                warn!("Ignoring unresolved outcome for {}", event.boss_id);
            }
        }
    }
}

pub(crate) fn leave_intermission(
    time: Res<Time>,
    mut timer: ResMut<IntermissionTimer>,
    mut game_state: ResMut<NextState<GameState>>,
) {
    timer.0.tick(time.delta());
    if timer.0.just_finished() {
        game_state.set(GameState::Fight);
    }
}
