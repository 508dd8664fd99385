//! UI domain: HUD for the active encounter.

mod hud;
mod hud_boss;
mod hud_player;
mod messages;

pub use hud::HudState;

use bevy::prelude::*;

use crate::core::GameState;
use crate::encounter::{EncounterSet, begin_encounter};
use crate::ui::hud::{apply_hud_signals, reset_hud, tick_hud_messages};
use crate::ui::hud_boss::{spawn_boss_panel, update_boss_panel};
use crate::ui::hud_player::{spawn_player_hearts_ui, update_player_hearts};
use crate::ui::messages::{announce_run_victory, spawn_message_board, update_message_board};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HudState>()
            .add_systems(
                Startup,
                (
                    spawn_boss_panel,
                    spawn_player_hearts_ui,
                    spawn_message_board,
                ),
            )
            .add_systems(OnEnter(GameState::Fight), reset_hud.after(begin_encounter))
            .add_systems(OnEnter(GameState::Victory), announce_run_victory)
            .add_systems(
                Update,
                apply_hud_signals
                    .in_set(EncounterSet::Present)
                    .run_if(in_state(GameState::Fight)),
            )
            .add_systems(
                Update,
                (
                    tick_hud_messages,
                    update_boss_panel,
                    update_player_hearts,
                    update_message_board,
                )
                    .chain()
                    .after(EncounterSet::Present),
            );
    }
}
