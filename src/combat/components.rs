//! Combat domain: health-bearing participants and knockback.

use bevy::prelude::*;

/// Horizontal knockback is clamped so a far-away source cannot launch the target off-screen.
pub const MAX_KNOCKBACK_VELOCITY: f32 = 800.0;

/// Result of applying damage to a [`Combatant`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Damage landed and the combatant is still standing.
    Applied(f32),
    /// This hit took the combatant to zero health. Reported once per combatant.
    Defeated(f32),
    /// The combatant was already defeated; nothing changed.
    Ignored,
}

impl DamageOutcome {
    pub fn amount(&self) -> f32 {
        match self {
            DamageOutcome::Applied(amount) | DamageOutcome::Defeated(amount) => *amount,
            DamageOutcome::Ignored => 0.0,
        }
    }
}

/// Base attributes shared by the player, bosses and their minions.
#[derive(Debug, Clone, PartialEq)]
pub struct Combatant {
    pub health: f32,
    pub max_health: f32,
    pub attack_power: f32,
    defeated: bool,
}

impl Combatant {
    pub fn new(max_health: f32, attack_power: f32) -> Self {
        Self::with_health(max_health, max_health, attack_power)
    }

    /// Builds a combatant that starts below full health, e.g. when restoring a snapshot.
    pub fn with_health(health: f32, max_health: f32, attack_power: f32) -> Self {
        let max_health = max_health.max(0.0);
        let health = health.clamp(0.0, max_health);
        Self {
            health,
            max_health,
            attack_power,
            defeated: health <= 0.0,
        }
    }

    /// Applies already-mitigated damage. Non-finite or negative amounts count as zero.
    pub fn apply_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.defeated {
            return DamageOutcome::Ignored;
        }

        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let actual = amount.min(self.health);
        self.health -= actual;

        if self.health <= 0.0 {
            self.health = 0.0;
            self.defeated = true;
            DamageOutcome::Defeated(actual)
        } else {
            DamageOutcome::Applied(actual)
        }
    }

    /// Restores health up to the maximum. A defeated combatant stays defeated.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if self.defeated || !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let actual = amount.min(self.max_health - self.health);
        self.health += actual;
        actual
    }

    pub fn is_defeated(&self) -> bool {
        self.defeated
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }
}

/// Knockback pushing `target` away from `source`, proportional to their horizontal distance.
pub fn knockback_away(target: Vec2, source: Vec2, horizontal_scale: f32, vertical: f32) -> Vec2 {
    let horizontal = ((target.x - source.x) * horizontal_scale)
        .clamp(-MAX_KNOCKBACK_VELOCITY, MAX_KNOCKBACK_VELOCITY);
    Vec2::new(horizontal, vertical)
}
