//! Bosses domain: validated, ready-to-fight boss configuration built from content definitions.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bevy::prelude::*;

use crate::combat::ShieldState;
use crate::content::{BossDef, BossKind, MechanicDef, MitigationDef, PhaseDef, PrivacySkill};

use super::behavior::{BehaviorTag, UnknownBehaviorTag};
use super::minion::MinionProfile;
use super::phase::{Phase, PhaseTable, PhaseTableError};

#[derive(Debug, Clone, PartialEq)]
pub struct ArenaLayout {
    pub id: String,
    pub platforms: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lesson {
    pub threshold: f32,
    pub behavior: BehaviorTag,
    pub message: String,
}

/// Boss-specific side systems that run next to the phase machine.
#[derive(Debug, Clone, PartialEq)]
pub enum Mechanic {
    DecryptionKeys {
        required: u32,
        spawn_interval: Duration,
        max_outstanding: u32,
    },
    DataAggregation {
        lessons: Vec<Lesson>,
    },
    CarrierNetwork {
        carriers: u32,
        package_interval: Duration,
        combo_damage: f32,
        combo_delay: Duration,
        drop_x: (f32, f32),
        drop_y: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    InvalidValue { field: &'static str, value: f32 },
    Phases(PhaseTableError),
    UnknownBehavior { field: &'static str, source: UnknownBehaviorTag },
}

impl ProfileError {
    pub fn field(&self) -> &'static str {
        match self {
            ProfileError::InvalidValue { field, .. } => field,
            ProfileError::Phases(_) => "phases",
            ProfileError::UnknownBehavior { field, .. } => field,
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::InvalidValue { field, value } => {
                write!(f, "invalid value {} for {}", value, field)
            }
            ProfileError::Phases(err) => write!(f, "{}", err),
            ProfileError::UnknownBehavior { field, source } => write!(f, "{}: {}", field, source),
        }
    }
}

impl std::error::Error for ProfileError {}

impl From<PhaseTableError> for ProfileError {
    fn from(err: PhaseTableError) -> Self {
        ProfileError::Phases(err)
    }
}

#[derive(Debug, Clone)]
pub struct BossProfile {
    pub id: String,
    pub name: String,
    pub kind: BossKind,
    pub max_health: f32,
    pub damage_scale: f32,
    pub projectile_speed: f32,
    /// Overrides the encounter-wide blast damage.
    pub blast_damage: Option<f32>,
    pub shield: ShieldState,
    pub phases: PhaseTable,
    pub minions: Option<MinionProfile>,
    pub mechanics: Vec<Mechanic>,
    pub layouts: Vec<ArenaLayout>,
    pub patrol: Vec<Vec2>,
    pub reward_skill: Option<PrivacySkill>,
    pub weapon_upgrade: f32,
}

impl BossProfile {
    pub fn from_def(def: &BossDef) -> Result<Self, ProfileError> {
        positive("max_health", def.max_health)?;
        non_negative("damage_scale", def.damage_scale)?;
        non_negative("projectile_speed", def.projectile_speed)?;
        if let Some(damage) = def.blast_damage {
            non_negative("blast_damage", damage)?;
        }
        non_negative("reward.weapon_upgrade", def.reward.weapon_upgrade)?;

        let shield = match def.mitigation {
            MitigationDef::Unmitigated => ShieldState::None,
            MitigationDef::Continuous { initial_strength } => {
                unit("mitigation.initial_strength", initial_strength)?;
                ShieldState::Continuous {
                    strength: initial_strength,
                }
            }
            MitigationDef::Encrypted { multiplier } => {
                unit("mitigation.multiplier", multiplier)?;
                ShieldState::Encrypted {
                    encrypted: true,
                    multiplier,
                }
            }
            MitigationDef::MinionGated => ShieldState::MinionGated { active_minions: 0 },
        };

        let phases = def
            .phases
            .iter()
            .enumerate()
            .map(|(index, phase)| build_phase(index, phase))
            .collect::<Result<Vec<_>, _>>()?;
        let phases = PhaseTable::new(phases)?;

        let minions = match &def.minions {
            Some(minion) => {
                positive("minions.health", minion.health)?;
                non_negative("minions.spread", minion.spread)?;
                non_negative("minions.heal_on_contact", minion.heal_on_contact)?;
                if let Some(secs) = minion.report_after_secs {
                    positive("minions.report_after_secs", secs)?;
                }
                Some(MinionProfile {
                    health: minion.health,
                    per_summon: minion.per_summon,
                    spread: minion.spread,
                    report_after: minion.report_after_secs,
                    drops_key: minion.drops_key,
                    heal_on_contact: minion.heal_on_contact,
                    dies_on_contact: minion.dies_on_contact,
                })
            }
            None => None,
        };

        let mechanics = def
            .mechanics
            .iter()
            .map(build_mechanic)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: def.id.clone(),
            name: def.name.clone(),
            kind: def.kind,
            max_health: def.max_health,
            damage_scale: def.damage_scale,
            projectile_speed: def.projectile_speed,
            blast_damage: def.blast_damage,
            shield,
            phases,
            minions,
            mechanics,
            layouts: def
                .layouts
                .iter()
                .map(|layout| ArenaLayout {
                    id: layout.id.clone(),
                    platforms: layout.platforms.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
                })
                .collect(),
            patrol: def.patrol.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            reward_skill: def.reward.skill,
            weapon_upgrade: def.reward.weapon_upgrade,
        })
    }

    pub fn layout(&self, id: &str) -> Option<&ArenaLayout> {
        self.layouts.iter().find(|layout| layout.id == id)
    }
}

fn build_phase(index: usize, def: &PhaseDef) -> Result<Phase, PhaseTableError> {
    let parse = |name: &str| {
        BehaviorTag::from_str(name).map_err(|source| PhaseTableError::UnknownBehavior {
            phase: index,
            source,
        })
    };

    let behaviors = def
        .behaviors
        .iter()
        .map(|name| parse(name.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut phase = Phase::new(
        def.threshold,
        behaviors,
        Duration::from_millis(def.attack_interval_ms),
    )
    .with_announcement(def.message.clone());

    for cadence in &def.cadence_overrides {
        phase = phase.with_override(
            parse(cadence.behavior.as_str())?,
            Duration::from_millis(cadence.interval_ms),
        );
    }
    if let Some(layout) = &def.layout {
        phase = phase.with_layout(layout.clone());
    }
    if let Some(speed) = def.move_speed {
        phase = phase.with_move_speed(speed);
    }
    Ok(phase)
}

fn build_mechanic(def: &MechanicDef) -> Result<Mechanic, ProfileError> {
    Ok(match def {
        MechanicDef::DecryptionKeys {
            required,
            spawn_interval_ms,
            max_outstanding,
        } => Mechanic::DecryptionKeys {
            required: *required,
            spawn_interval: Duration::from_millis(*spawn_interval_ms),
            max_outstanding: *max_outstanding,
        },
        MechanicDef::DataAggregation { lessons } => Mechanic::DataAggregation {
            lessons: lessons
                .iter()
                .map(|lesson| {
                    let behavior = BehaviorTag::from_str(&lesson.behavior).map_err(|source| {
                        ProfileError::UnknownBehavior {
                            field: "mechanics.lessons.behavior",
                            source,
                        }
                    })?;
                    Ok(Lesson {
                        threshold: lesson.threshold,
                        behavior,
                        message: lesson.message.clone(),
                    })
                })
                .collect::<Result<Vec<_>, ProfileError>>()?,
        },
        MechanicDef::CarrierNetwork {
            carriers,
            package_interval_ms,
            combo_damage,
            combo_delay_ms,
            drop_x,
            drop_y,
        } => {
            non_negative("mechanics.combo_damage", *combo_damage)?;
            Mechanic::CarrierNetwork {
                carriers: *carriers,
                package_interval: Duration::from_millis(*package_interval_ms),
                combo_damage: *combo_damage,
                combo_delay: Duration::from_millis(*combo_delay_ms),
                drop_x: *drop_x,
                drop_y: *drop_y,
            }
        }
    })
}

fn positive(field: &'static str, value: f32) -> Result<(), ProfileError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ProfileError::InvalidValue { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ProfileError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProfileError::InvalidValue { field, value })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ProfileError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProfileError::InvalidValue { field, value })
    }
}
