//! Arena domain: physics layers and markers for everything the encounter puts on screen.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::bosses::MinionId;
use crate::encounter::{AttackSource, PickupId};

/// Physics layers for collision filtering
#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    /// Floor and platforms
    Ground,
    /// The player body
    Player,
    /// Boss and minions
    Enemy,
    /// Player strikes and player projectiles (damage enemies)
    PlayerHitbox,
    /// Boss projectiles and the laser (damage player)
    EnemyHitbox,
    /// Keys and packages
    Pickup,
    /// Carriers the player delivers packages to
    Friendly,
}

#[derive(Component, Debug)]
pub struct PlayerBody;

#[derive(Component, Debug)]
pub struct BossBody;

/// Short-lived player hitbox. Melee swings, player projectiles, blasts and helpers all carry one.
#[derive(Component, Debug)]
pub struct PlayerStrike {
    pub source: AttackSource,
    pub lifetime: Timer,
}

/// Keeps a body at a fixed offset from the player, like the learning helper.
#[derive(Component, Debug)]
pub struct Companion {
    pub offset: Vec2,
}

#[derive(Component, Debug)]
pub struct BossProjectile {
    pub homing: bool,
    pub speed: f32,
    pub lifetime: Timer,
}

#[derive(Component, Debug)]
pub struct LaserBeamZone;

/// Warning line drawn while the laser charges. Has no collider.
#[derive(Component, Debug)]
pub struct LaserTelegraph;

#[derive(Component, Debug)]
pub struct PulseEffect {
    pub lifetime: Timer,
}

#[derive(Component, Debug)]
pub struct MinionBody {
    pub id: MinionId,
    pub returning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupKind {
    Key,
    Package,
}

#[derive(Component, Debug)]
pub struct PickupBody {
    pub pickup: PickupId,
    pub kind: PickupKind,
}

#[derive(Component, Debug)]
pub struct CarrierBody {
    pub index: usize,
}

/// Anything spawned for the current fight. Removed when the fight state exits.
#[derive(Component, Debug)]
pub struct ArenaEntity;

/// Platform colliders from the current phase layout.
#[derive(Component, Debug)]
pub struct LayoutPlatform;

/// Where the boss is heading, if anywhere.
#[derive(Component, Debug, Default)]
pub struct BossMovement {
    pub target: Option<Vec2>,
    pub speed: f32,
}

#[derive(Component, Debug, Default)]
pub struct PlayerControl {
    pub facing: f32,
    pub on_ground: bool,
    pub strike_cooldown: f32,
}
