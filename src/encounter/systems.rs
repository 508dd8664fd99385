//! Encounter domain: systems feeding the engine's time and contacts into the active fight.

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;

use crate::arena::{BossBody, PlayerBody, to_arena};
use crate::bosses::BossProfile;
use crate::content::{BossRegistry, EncounterTuning};
use crate::core::{BossProgress, RunConfig};

use super::coordinator::{ArenaPositions, Encounter};
use super::player::PlayerSnapshot;
use super::signals::{ContactEvent, EncounterResolved, EncounterSignal};

/// The fight currently in progress, if any.
#[derive(Resource, Debug, Default)]
pub struct ActiveEncounter {
    pub encounter: Option<Encounter>,
}

impl ActiveEncounter {
    pub fn begin(&mut self, encounter: Encounter) {
        self.end();
        self.encounter = Some(encounter);
    }

    /// Tears down the running fight, if any. Returns whether there was one.
    pub fn end(&mut self) -> bool {
        match self.encounter.as_mut() {
            Some(encounter) => {
                encounter.teardown();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.encounter.as_ref().is_some_and(|e| e.is_live())
    }
}

/// Starts the fight against the boss at the current sequence position.
pub(crate) fn begin_encounter(
    registry: Res<BossRegistry>,
    tuning: Res<EncounterTuning>,
    config: Res<RunConfig>,
    mut progress: ResMut<BossProgress>,
    mut active: ResMut<ActiveEncounter>,
) {
    let Some(def) = registry.at(progress.position) else {
        error!(
            "No boss at sequence position {} ({} loaded)",
            progress.position,
            registry.len()
        );
        return;
    };

    let profile = match BossProfile::from_def(def) {
        Ok(profile) => profile,
        Err(e) => {
            error!("Boss '{}' is unusable: {}", def.id, e);
            return;
        }
    };

    let snapshot = progress
        .carried
        .clone()
        .unwrap_or_else(|| PlayerSnapshot::fresh(&tuning));
    let seed = config.seed ^ u64::from(progress.encounters_started);
    progress.encounters_started += 1;

    info!(
        "Beginning encounter {} against {} (attempt {})",
        progress.encounters_started,
        profile.name,
        progress.attempts + 1
    );
    active.begin(Encounter::start(profile, tuning.clone(), &snapshot, seed));
}

pub(crate) fn end_encounter(mut active: ResMut<ActiveEncounter>) {
    if active.end() {
        debug!("Active encounter torn down");
    }
    active.encounter = None;
}

pub(crate) fn apply_contacts(
    mut contacts: MessageReader<ContactEvent>,
    mut active: ResMut<ActiveEncounter>,
) {
    for contact in contacts.read() {
        if let Some(encounter) = active.encounter.as_mut() {
            encounter.handle(contact.clone());
        }
    }
}

pub(crate) fn advance_encounter(
    time: Res<Time>,
    mut active: ResMut<ActiveEncounter>,
    player_query: Query<&Transform, With<PlayerBody>>,
    boss_query: Query<&Transform, With<BossBody>>,
) {
    let Some(encounter) = active.encounter.as_mut() else {
        return;
    };

    let positions = ArenaPositions {
        player: player_query
            .iter()
            .next()
            .map(|t| to_arena(t.translation.truncate()))
            .unwrap_or_default(),
        boss: boss_query
            .iter()
            .next()
            .map(|t| to_arena(t.translation.truncate()))
            .unwrap_or_default(),
    };
    encounter.advance(time.delta(), positions);
}

pub(crate) fn publish_signals(
    mut active: ResMut<ActiveEncounter>,
    mut signals: MessageWriter<EncounterSignal>,
    mut resolved: MessageWriter<EncounterResolved>,
) {
    let Some(encounter) = active.encounter.as_mut() else {
        return;
    };
    let boss_id = encounter.profile().id.clone();

    for signal in encounter.drain_signals() {
        if let EncounterSignal::Resolved { outcome, snapshot } = &signal {
            resolved.write(EncounterResolved {
                boss_id: boss_id.clone(),
                outcome: *outcome,
                snapshot: snapshot.clone(),
            });
        }
        signals.write(signal);
    }
}
