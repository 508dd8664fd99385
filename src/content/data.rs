//! Content domain: RON definitions for bosses and encounter tuning.

use std::time::Duration;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Wrapper for list-style data files.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataFile<T> {
    pub schema_version: u32,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum BossKind {
    DifferentialPrivacy,
    FederatedLearning,
    HomomorphicEncryption,
    SecureMultiparty,
}

/// Privacy skills the player can unlock and carry between fights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub enum PrivacySkill {
    DifferentialPrivacy,
    FederatedLearning,
    HomomorphicEncryption,
    PolymorphicEncryption,
}

impl std::fmt::Display for PrivacySkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrivacySkill::DifferentialPrivacy => "Differential Privacy",
            PrivacySkill::FederatedLearning => "Federated Learning",
            PrivacySkill::HomomorphicEncryption => "Homomorphic Encryption",
            PrivacySkill::PolymorphicEncryption => "Polymorphic Encryption",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BossDef {
    pub id: String,
    pub name: String,
    pub kind: BossKind,
    pub max_health: f32,
    /// Multiplier applied to every player-sourced hit before mitigation.
    pub damage_scale: f32,
    pub projectile_speed: f32,
    /// Replaces the encounter-wide blast damage for this boss and its minions.
    #[serde(default)]
    pub blast_damage: Option<f32>,
    pub mitigation: MitigationDef,
    pub phases: Vec<PhaseDef>,
    #[serde(default)]
    pub minions: Option<MinionDef>,
    #[serde(default)]
    pub mechanics: Vec<MechanicDef>,
    #[serde(default)]
    pub layouts: Vec<ArenaLayoutDef>,
    #[serde(default)]
    pub patrol: Vec<(f32, f32)>,
    #[serde(default)]
    pub reward: RewardDef,
}

/// What the player keeps after beating the boss.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RewardDef {
    #[serde(default)]
    pub skill: Option<PrivacySkill>,
    /// Passed to the weapon upgrade; 0 means no upgrade.
    #[serde(default)]
    pub weapon_upgrade: f32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum MitigationDef {
    Unmitigated,
    Continuous { initial_strength: f32 },
    Encrypted { multiplier: f32 },
    MinionGated,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhaseDef {
    pub threshold: f32,
    pub behaviors: Vec<String>,
    pub attack_interval_ms: u64,
    #[serde(default)]
    pub cadence_overrides: Vec<CadenceOverrideDef>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub layout: Option<String>,
    #[serde(default)]
    pub move_speed: Option<f32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CadenceOverrideDef {
    pub behavior: String,
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MinionDef {
    pub health: f32,
    pub per_summon: u32,
    pub spread: f32,
    #[serde(default)]
    pub report_after_secs: Option<f32>,
    #[serde(default)]
    pub drops_key: bool,
    #[serde(default)]
    pub heal_on_contact: f32,
    #[serde(default)]
    pub dies_on_contact: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum MechanicDef {
    DecryptionKeys {
        required: u32,
        spawn_interval_ms: u64,
        max_outstanding: u32,
    },
    DataAggregation {
        lessons: Vec<LessonDef>,
    },
    CarrierNetwork {
        carriers: u32,
        package_interval_ms: u64,
        combo_damage: f32,
        combo_delay_ms: u64,
        drop_x: (f32, f32),
        drop_y: f32,
    },
}

/// A behavior the boss learns once its aggregated minion data reaches `threshold`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LessonDef {
    pub threshold: f32,
    pub behavior: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArenaLayoutDef {
    pub id: String,
    pub platforms: Vec<(f32, f32)>,
}

/// Encounter-wide constants shared by every boss fight.
#[derive(Resource, Debug, Clone, Deserialize, Serialize)]
pub struct EncounterTuning {
    pub player_max_health: f32,
    pub player_attack_power: f32,
    pub player_hit_damage: f32,
    pub invincibility_ms: u64,
    /// (horizontal scale, vertical impulse)
    pub boss_contact_knockback: (f32, f32),
    pub projectile_knockback: (f32, f32),
    /// Fixed impulse, not distance based.
    pub laser_knockback: (f32, f32),
    pub laser_telegraph_ms: u64,
    pub laser_duration_ms: u64,
    pub burst_count: u32,
    pub burst_spacing_ms: u64,
    pub spread_angles: Vec<f32>,
    pub blast_damage: f32,
    pub helper_damage: f32,
    pub blast_cooldown_ms: u64,
    pub helper_cooldown_ms: u64,
    /// Skills a fresh run starts with.
    pub starting_skills: Vec<PrivacySkill>,
    pub phase_recheck_ms: u64,
    pub message_ms: u64,
    pub announcement_ms: u64,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            player_max_health: 5.0,
            player_attack_power: 1.0,
            player_hit_damage: 1.0,
            invincibility_ms: 1000,
            boss_contact_knockback: (2.0, -200.0),
            projectile_knockback: (2.0, -100.0),
            laser_knockback: (-200.0, 0.0),
            laser_telegraph_ms: 1000,
            laser_duration_ms: 2000,
            burst_count: 5,
            burst_spacing_ms: 500,
            spread_angles: vec![-30.0, 0.0, 30.0],
            blast_damage: 3.0,
            helper_damage: 5.0,
            blast_cooldown_ms: 3000,
            helper_cooldown_ms: 10_000,
            starting_skills: vec![PrivacySkill::HomomorphicEncryption],
            phase_recheck_ms: 1000,
            message_ms: 2000,
            announcement_ms: 3000,
        }
    }
}

impl EncounterTuning {
    pub fn invincibility(&self) -> Duration {
        Duration::from_millis(self.invincibility_ms)
    }

    pub fn blast_cooldown(&self) -> Duration {
        Duration::from_millis(self.blast_cooldown_ms)
    }

    pub fn helper_cooldown(&self) -> Duration {
        Duration::from_millis(self.helper_cooldown_ms)
    }

    pub fn phase_recheck(&self) -> Duration {
        Duration::from_millis(self.phase_recheck_ms)
    }

    pub fn message_duration(&self) -> Duration {
        Duration::from_millis(self.message_ms)
    }

    pub fn announcement_duration(&self) -> Duration {
        Duration::from_millis(self.announcement_ms)
    }
}
