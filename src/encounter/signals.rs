//! Encounter domain: contact events in, signals out.

use std::time::Duration;

use bevy::ecs::message::Message;
use bevy::prelude::*;

use crate::bosses::{ArenaLayout, BehaviorTag, MinionId, ProjectilePattern};

use super::player::PlayerSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncounterOutcome {
    #[default]
    Pending,
    PlayerVictory,
    PlayerDefeated,
}

impl EncounterOutcome {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, EncounterOutcome::Pending)
    }
}

/// What landed a player hit on the boss or a minion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackSource {
    Melee,
    Projectile,
    Blast,
    Helper,
}

/// Id for a collectible the encounter placed in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PickupId(pub u32);

/// Overlaps reported by the collision layer, already resolved to encounter terms.
#[derive(Debug, Clone, PartialEq)]
pub enum ContactEvent {
    PlayerAttackHitBoss {
        source: AttackSource,
    },
    PlayerHitBoss {
        player: Vec2,
        boss: Vec2,
    },
    BossProjectileHitPlayer {
        player: Vec2,
        projectile: Vec2,
    },
    LaserHitPlayer,
    MinionTouchedPlayer {
        minion: MinionId,
        player: Vec2,
        minion_pos: Vec2,
    },
    PlayerAttackHitMinion {
        minion: MinionId,
        source: AttackSource,
        position: Vec2,
    },
    MinionReachedBoss {
        minion: MinionId,
    },
    KeyCollected {
        pickup: PickupId,
    },
    PackageCollected {
        pickup: PickupId,
    },
    PackageDelivered {
        carrier: usize,
    },
    /// Result of the distribution-overlap minigame.
    ShieldSignal {
        strength: f32,
    },
}

impl Message for ContactEvent {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnKind {
    Projectile {
        pattern: ProjectilePattern,
        speed: f32,
    },
    Minion {
        id: MinionId,
    },
    DecryptionKey {
        pickup: PickupId,
    },
    Package {
        pickup: PickupId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest {
    pub kind: SpawnKind,
    pub position: Vec2,
    pub target: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterEntity {
    Minion(MinionId),
    Pickup(PickupId),
}

/// Notifications for the HUD, arena and spawn collaborators. Nothing waits on them.
#[derive(Debug, Clone, PartialEq)]
pub enum EncounterSignal {
    BossHealthChanged {
        ratio: f32,
    },
    PlayerHealthChanged {
        hearts: u32,
    },
    ShieldChanged {
        multiplier: f32,
    },
    Message {
        text: String,
        duration: Duration,
    },
    PhaseChanged {
        phase: usize,
        behaviors: Vec<BehaviorTag>,
        layout: Option<ArenaLayout>,
    },
    BehaviorsLearned {
        behaviors: Vec<BehaviorTag>,
    },
    Spawn(SpawnRequest),
    Despawn(EncounterEntity),
    MinionReturning(MinionId),
    PlayerKnockback {
        impulse: Vec2,
    },
    PlayerInvincible {
        active: bool,
    },
    LaserCharging {
        origin: Vec2,
    },
    LaserActive {
        origin: Vec2,
        duration: Duration,
    },
    LaserExpired,
    ComputationPulse {
        origin: Vec2,
    },
    BossMoveTo {
        target: Vec2,
        speed: f32,
    },
    CarrierLoaded {
        carrier: usize,
        loaded: bool,
    },
    CombinedAttack {
        damage: f32,
    },
    ArenaCleared,
    Resolved {
        outcome: EncounterOutcome,
        snapshot: PlayerSnapshot,
    },
}

impl Message for EncounterSignal {}

/// Sent once per encounter when it reaches a terminal outcome.
#[derive(Debug, Clone)]
pub struct EncounterResolved {
    pub boss_id: String,
    pub outcome: EncounterOutcome,
    pub snapshot: PlayerSnapshot,
}

impl Message for EncounterResolved {}
