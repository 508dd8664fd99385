//! Combat domain: damage mitigation for boss-directed hits.

use bevy::prelude::*;

/// How a boss reduces incoming damage. A boss uses exactly one model per encounter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShieldState {
    /// Full damage.
    None,
    /// Absorbs `strength` (clamped to `[0, 1]`) of every hit.
    Continuous { strength: f32 },
    /// While `encrypted`, hits are scaled by the fixed `multiplier`.
    Encrypted { encrypted: bool, multiplier: f32 },
    /// Fully blocks hits while any minion is alive.
    MinionGated { active_minions: u32 },
}

impl ShieldState {
    /// Fraction of raw damage that gets through, always within `[0, 1]`.
    pub fn multiplier(&self) -> f32 {
        match *self {
            ShieldState::None => 1.0,
            ShieldState::Continuous { strength } => 1.0 - clamp_unit(strength),
            ShieldState::Encrypted {
                encrypted: true,
                multiplier,
            } => clamp_unit(multiplier),
            ShieldState::Encrypted {
                encrypted: false, ..
            } => 1.0,
            ShieldState::MinionGated { active_minions } => {
                if active_minions > 0 {
                    0.0
                } else {
                    1.0
                }
            }
        }
    }

    pub fn is_shielded(&self) -> bool {
        self.multiplier() < 1.0
    }

    pub fn is_continuous(&self) -> bool {
        matches!(self, ShieldState::Continuous { .. })
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(
            self,
            ShieldState::Encrypted {
                encrypted: true,
                ..
            }
        )
    }

    /// Sets the continuous strength. Returns false when this boss does not use a continuous shield
    /// or the value is NaN.
    pub fn set_strength(&mut self, value: f32) -> bool {
        match self {
            ShieldState::Continuous { strength } if !value.is_nan() => {
                *strength = clamp_unit(value);
                true
            }
            _ => false,
        }
    }

    pub fn set_encrypted(&mut self, value: bool) -> bool {
        match self {
            ShieldState::Encrypted { encrypted, .. } => {
                *encrypted = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_active_minions(&mut self, count: u32) -> bool {
        match self {
            ShieldState::MinionGated { active_minions } => {
                *active_minions = count;
                true
            }
            _ => false,
        }
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Rejects damage values that must never reach a [`Combatant`](super::Combatant).
pub fn sanitize_damage(raw: f32) -> f32 {
    if raw.is_finite() && raw >= 0.0 {
        raw
    } else {
        warn!("Rejected invalid damage value {raw}, treating as 0");
        0.0
    }
}

/// Damage that actually lands on a boss for a raw hit, given its shield state.
pub fn effective_damage(raw: f32, shield: &ShieldState) -> f32 {
    sanitize_damage(raw) * shield.multiplier()
}
