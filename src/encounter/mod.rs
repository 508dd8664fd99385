//! Encounter domain: the boss fight coordinator and its engine adapters.

mod coordinator;
mod mechanics;
mod player;
mod signals;
mod systems;
#[cfg(test)]
mod tests;

pub use coordinator::{ArenaPositions, Encounter};
pub use mechanics::{BossMechanics, CarrierNetwork, DataAggregate, Delivery, KeyRing};
pub use player::{PlayerSnapshot, PlayerState, SkillRefusal};
pub use signals::{
    AttackSource, ContactEvent, EncounterEntity, EncounterOutcome, EncounterResolved,
    EncounterSignal, PickupId, SpawnKind, SpawnRequest,
};
pub use systems::ActiveEncounter;

pub use crate::content::PrivacySkill;
pub(crate) use systems::begin_encounter;

use bevy::prelude::*;

use crate::core::GameState;
use crate::encounter::systems::{
    advance_encounter, apply_contacts, end_encounter, publish_signals,
};

/// Ordering for everything that touches the active encounter within a frame.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum EncounterSet {
    /// Collision routing into [`ContactEvent`]s.
    Route,
    /// Contacts, time and signal publishing.
    Simulate,
    /// Reacting to [`EncounterSignal`]s.
    Present,
}

pub struct EncounterPlugin;

impl Plugin for EncounterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveEncounter>()
            .add_message::<ContactEvent>()
            .add_message::<EncounterSignal>()
            .add_message::<EncounterResolved>()
            .configure_sets(
                Update,
                (
                    EncounterSet::Route,
                    EncounterSet::Simulate,
                    EncounterSet::Present,
                )
                    .chain(),
            )
            .add_systems(OnEnter(GameState::Fight), begin_encounter)
            .add_systems(OnExit(GameState::Fight), end_encounter)
            .add_systems(
                Update,
                (apply_contacts, advance_encounter, publish_signals)
                    .chain()
                    .in_set(EncounterSet::Simulate)
                    .run_if(in_state(GameState::Fight)),
            );
    }
}
