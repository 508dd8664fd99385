//! Encounter domain: the player's side of a fight and the state carried between fights.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combat::Combatant;
use crate::content::{EncounterTuning, PrivacySkill};

/// Why a skill could not be used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillRefusal {
    Locked(PrivacySkill),
    CoolingDown { skill: PrivacySkill, remaining: f32 },
    /// The skill has nothing to do inside a boss arena.
    NoArenaEffect(PrivacySkill),
    EncounterClosed,
}

impl fmt::Display for SkillRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillRefusal::Locked(skill) => write!(f, "{} is not unlocked", skill),
            SkillRefusal::CoolingDown { skill, remaining } => {
                write!(f, "{} is recharging ({:.1}s left)", skill, remaining)
            }
            SkillRefusal::NoArenaEffect(skill) => write!(f, "{} has no effect here", skill),
            SkillRefusal::EncounterClosed => write!(f, "the encounter is over"),
        }
    }
}

impl std::error::Error for SkillRefusal {}

/// Everything about the player that survives from one encounter to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub attack_power: f32,
    pub weapon_level: u32,
    pub unlocked_skills: BTreeSet<PrivacySkill>,
    /// Seconds left per cooling skill.
    pub skill_cooldowns: BTreeMap<PrivacySkill, f32>,
}

impl PlayerSnapshot {
    pub fn fresh(tuning: &EncounterTuning) -> Self {
        Self {
            health: tuning.player_max_health,
            max_health: tuning.player_max_health,
            attack_power: tuning.player_attack_power,
            weapon_level: 1,
            unlocked_skills: tuning.starting_skills.iter().copied().collect(),
            skill_cooldowns: BTreeMap::new(),
        }
    }

    /// Same progression, full hearts. Used when retrying a lost fight.
    pub fn with_full_health(mut self) -> Self {
        self.health = self.max_health;
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub combatant: Combatant,
    pub weapon_level: u32,
    pub unlocked_skills: BTreeSet<PrivacySkill>,
    pub skill_cooldowns: BTreeMap<PrivacySkill, f32>,
    pub invincible: bool,
    pub carrying_package: bool,
}

impl PlayerState {
    pub fn from_snapshot(snapshot: &PlayerSnapshot) -> Self {
        Self {
            combatant: Combatant::with_health(
                snapshot.health,
                snapshot.max_health,
                snapshot.attack_power,
            ),
            weapon_level: snapshot.weapon_level,
            unlocked_skills: snapshot.unlocked_skills.clone(),
            skill_cooldowns: snapshot.skill_cooldowns.clone(),
            invincible: false,
            carrying_package: false,
        }
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            health: self.combatant.health,
            max_health: self.combatant.max_health,
            attack_power: self.combatant.attack_power,
            weapon_level: self.weapon_level,
            unlocked_skills: self.unlocked_skills.clone(),
            skill_cooldowns: self.skill_cooldowns.clone(),
        }
    }

    pub fn hearts(&self) -> u32 {
        self.combatant.health.max(0.0).ceil() as u32
    }

    /// Raises weapon level and attack power by `ceil(factor * 2)`. Returns the gain.
    pub fn upgrade_weapon(&mut self, factor: f32) -> u32 {
        let gain = (factor * 2.0).ceil().max(0.0) as u32;
        self.weapon_level += gain;
        self.combatant.attack_power += gain as f32;
        gain
    }

    pub fn unlock_skill(&mut self, skill: PrivacySkill) -> bool {
        self.unlocked_skills.insert(skill)
    }

    pub fn start_cooldown(&mut self, skill: PrivacySkill, seconds: f32) {
        if seconds > 0.0 {
            self.skill_cooldowns.insert(skill, seconds);
        }
    }

    /// Spends an unlocked, recharged skill and starts its cooldown.
    pub fn use_skill(
        &mut self,
        skill: PrivacySkill,
        cooldown_secs: f32,
    ) -> Result<(), SkillRefusal> {
        if !self.unlocked_skills.contains(&skill) {
            return Err(SkillRefusal::Locked(skill));
        }
        let remaining = self.cooldown(skill);
        if remaining > 0.0 {
            return Err(SkillRefusal::CoolingDown { skill, remaining });
        }
        self.start_cooldown(skill, cooldown_secs);
        Ok(())
    }

    pub fn cooldown(&self, skill: PrivacySkill) -> f32 {
        self.skill_cooldowns.get(&skill).copied().unwrap_or(0.0)
    }

    pub fn tick_cooldowns(&mut self, elapsed_secs: f32) {
        for remaining in self.skill_cooldowns.values_mut() {
            *remaining = (*remaining - elapsed_secs).max(0.0);
        }
        self.skill_cooldowns.retain(|_, remaining| *remaining > 0.0);
    }
}
