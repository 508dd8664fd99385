//! Bosses domain: auxiliary combatants summoned during an encounter.

use std::collections::BTreeMap;

use crate::combat::{Combatant, DamageOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MinionId(pub u32);

/// How a boss's minions are built and what they do besides fighting.
#[derive(Debug, Clone, PartialEq)]
pub struct MinionProfile {
    pub health: f32,
    pub per_summon: u32,
    /// Horizontal spawn offset range around the boss.
    pub spread: f32,
    /// Seconds of data collection before the minion heads back to report.
    pub report_after: Option<f32>,
    pub drops_key: bool,
    /// Health restored to the boss when this minion reaches the player.
    pub heal_on_contact: f32,
    pub dies_on_contact: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Minion {
    pub id: MinionId,
    pub combatant: Combatant,
    pub reports_to_boss: bool,
    pub collected_data: f32,
    pub returning: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MinionHit {
    Damaged(f32),
    /// The minion died and has been removed from the roster.
    Defeated(Minion),
    Unknown,
}

#[derive(Debug, Default)]
pub struct MinionRoster {
    next_id: u32,
    minions: BTreeMap<MinionId, Minion>,
}

impl MinionRoster {
    pub fn spawn(&mut self, profile: &MinionProfile) -> MinionId {
        let id = MinionId(self.next_id);
        self.next_id += 1;
        self.minions.insert(
            id,
            Minion {
                id,
                combatant: Combatant::new(profile.health, 1.0),
                reports_to_boss: profile.report_after.is_some(),
                collected_data: 0.0,
                returning: false,
            },
        );
        id
    }

    pub fn get(&self, id: MinionId) -> Option<&Minion> {
        self.minions.get(&id)
    }

    pub fn active_count(&self) -> u32 {
        self.minions.len() as u32
    }

    pub fn damage(&mut self, id: MinionId, amount: f32) -> MinionHit {
        let Some(minion) = self.minions.get_mut(&id) else {
            return MinionHit::Unknown;
        };
        match minion.combatant.apply_damage(amount) {
            DamageOutcome::Applied(actual) => MinionHit::Damaged(actual),
            DamageOutcome::Defeated(_) | DamageOutcome::Ignored => self
                .minions
                .remove(&id)
                .map(MinionHit::Defeated)
                .unwrap_or(MinionHit::Unknown),
        }
    }

    pub fn remove(&mut self, id: MinionId) -> Option<Minion> {
        self.minions.remove(&id)
    }

    /// Accrues one data unit per second on reporting minions. Returns the ones that just reached
    /// `threshold` and turned back toward the boss.
    pub fn collect_data(&mut self, elapsed_secs: f32, threshold: f32) -> Vec<MinionId> {
        let mut returning = Vec::new();
        for minion in self.minions.values_mut() {
            if !minion.reports_to_boss || minion.returning {
                continue;
            }
            minion.collected_data += elapsed_secs;
            if minion.collected_data >= threshold {
                minion.returning = true;
                returning.push(minion.id);
            }
        }
        returning
    }

    /// Removes every minion, returning their ids in spawn order.
    pub fn drain(&mut self) -> Vec<MinionId> {
        let ids = self.minions.keys().copied().collect();
        self.minions.clear();
        ids
    }
}
