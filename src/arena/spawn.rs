//! Arena domain: spawning and despawning bodies in response to encounter signals.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::arena::components::{
    ArenaEntity, BossBody, BossMovement, BossProjectile, CarrierBody, GameLayer, LaserBeamZone,
    LaserTelegraph, LayoutPlatform, MinionBody, PickupBody, PickupKind, PlayerBody,
    PlayerControl, PulseEffect,
};
use crate::arena::frame::{ARENA_SIZE, FLOOR_Y, flip_y, to_arena, to_world};
use crate::bosses::{ArenaLayout, ProjectilePattern};
use crate::encounter::{ActiveEncounter, EncounterEntity, EncounterSignal, SpawnKind, SpawnRequest};

const PLAYER_START: Vec2 = Vec2::new(200.0, 520.0);
const BOSS_START: Vec2 = Vec2::new(600.0, 300.0);
const BOSS_SIZE: Vec2 = Vec2::new(80.0, 80.0);
const PROJECTILE_RADIUS: f32 = 6.0;
const PROJECTILE_LIFETIME: f32 = 5.0;
const HOMING_TURN_RATE: f32 = 3.0;
const MINION_SPEED: f32 = 80.0;
const MINION_SIZE: f32 = 20.0;
const PICKUP_SIZE: f32 = 18.0;
const PACKAGE_FALL_SPEED: f32 = 150.0;
const PLATFORM_SIZE: Vec2 = Vec2::new(120.0, 16.0);
const LASER_THICKNESS: f32 = 24.0;
const PULSE_LIFETIME: f32 = 0.6;
const ARRIVAL_DISTANCE: f32 = 4.0;

const CARRIER_COLOR_EMPTY: Color = Color::srgb(0.3, 0.5, 0.9);
const CARRIER_COLOR_LOADED: Color = Color::srgb(0.3, 0.9, 0.4);

/// Spawns the floor, walls, player, boss and any carriers for the boss about to be fought.
pub(crate) fn spawn_arena(mut commands: Commands, active: Res<ActiveEncounter>) {
    let ground_layers = CollisionLayers::new(
        GameLayer::Ground,
        [GameLayer::Player, GameLayer::Pickup],
    );

    let floor_height = ARENA_SIZE.y - FLOOR_Y;
    let floor_center = to_world(Vec2::new(ARENA_SIZE.x / 2.0, FLOOR_Y + floor_height / 2.0));
    commands.spawn((
        ArenaEntity,
        Sprite::from_color(Color::srgb(0.25, 0.25, 0.3), Vec2::new(ARENA_SIZE.x, floor_height)),
        Transform::from_xyz(floor_center.x, floor_center.y, 0.0),
        RigidBody::Static,
        Collider::rectangle(ARENA_SIZE.x, floor_height),
        ground_layers,
    ));

    for x in [0.0, ARENA_SIZE.x] {
        let wall = to_world(Vec2::new(x, ARENA_SIZE.y / 2.0));
        commands.spawn((
            ArenaEntity,
            Transform::from_xyz(wall.x, wall.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(20.0, ARENA_SIZE.y),
            ground_layers,
        ));
    }

    let player = to_world(PLAYER_START);
    commands.spawn((
        ArenaEntity,
        PlayerBody,
        PlayerControl {
            facing: 1.0,
            ..default()
        },
        Sprite::from_color(Color::srgb(0.9, 0.9, 0.95), Vec2::new(24.0, 48.0)),
        Transform::from_xyz(player.x, player.y, 1.0),
        (
            RigidBody::Dynamic,
            Collider::rectangle(24.0, 48.0),
            LockedAxes::ROTATION_LOCKED,
            LinearVelocity::default(),
            GravityScale(0.0),
            Friction::new(0.0),
            CollisionEventsEnabled,
            CollidingEntities::default(),
            CollisionLayers::new(
                GameLayer::Player,
                [
                    GameLayer::Ground,
                    GameLayer::Enemy,
                    GameLayer::EnemyHitbox,
                    GameLayer::Pickup,
                    GameLayer::Friendly,
                ],
            ),
        ),
    ));

    let boss = to_world(BOSS_START);
    commands.spawn((
        ArenaEntity,
        BossBody,
        BossMovement::default(),
        Sprite::from_color(Color::srgb(0.7, 0.2, 0.3), BOSS_SIZE),
        Transform::from_xyz(boss.x, boss.y, 1.0),
        (
            RigidBody::Dynamic,
            Collider::rectangle(BOSS_SIZE.x, BOSS_SIZE.y),
            LinearVelocity::default(),
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
            CollisionEventsEnabled,
            CollisionLayers::new(
                GameLayer::Enemy,
                [GameLayer::Player, GameLayer::PlayerHitbox, GameLayer::Enemy],
            ),
        ),
    ));

    let carriers = active
        .encounter
        .as_ref()
        .and_then(|e| e.mechanics().carriers.as_ref())
        .map(|network| network.carriers())
        .unwrap_or(0);
    for index in 0..carriers {
        let step = ARENA_SIZE.x / (carriers as f32 + 1.0);
        let position = to_world(Vec2::new(step * (index as f32 + 1.0), FLOOR_Y - 30.0));
        commands.spawn((
            ArenaEntity,
            CarrierBody { index },
            Sprite::from_color(CARRIER_COLOR_EMPTY, Vec2::new(30.0, 60.0)),
            Transform::from_xyz(position.x, position.y, 0.5),
            Collider::rectangle(30.0, 60.0),
            Sensor,
            CollisionEventsEnabled,
            CollisionLayers::new(GameLayer::Friendly, [GameLayer::Player]),
        ));
    }

    debug!("Arena spawned with {} carriers", carriers);
}

/// Applies spawn, despawn and movement signals from the encounter to the world.
#[allow(clippy::too_many_arguments)]
pub(crate) fn apply_spawn_signals(
    mut commands: Commands,
    mut signals: MessageReader<EncounterSignal>,
    mut player_query: Query<(&mut LinearVelocity, &mut Sprite), With<PlayerBody>>,
    mut boss_query: Query<&mut BossMovement, With<BossBody>>,
    boss_transform: Query<&Transform, With<BossBody>>,
    mut minion_query: Query<(Entity, &mut MinionBody)>,
    pickup_query: Query<(Entity, &PickupBody)>,
    mut carrier_query: Query<(&CarrierBody, &mut Sprite), Without<PlayerBody>>,
    transient_query: Query<
        Entity,
        Or<(
            With<BossProjectile>,
            With<LaserBeamZone>,
            With<LaserTelegraph>,
            With<PulseEffect>,
        )>,
    >,
    laser_query: Query<Entity, Or<(With<LaserBeamZone>, With<LaserTelegraph>)>>,
    platform_query: Query<Entity, With<LayoutPlatform>>,
) {
    let boss = boss_transform
        .iter()
        .next()
        .map(|t| t.translation.truncate())
        .unwrap_or_default();

    for signal in signals.read() {
        match signal {
            EncounterSignal::Spawn(request) => spawn_requested(&mut commands, request),
            EncounterSignal::Despawn(EncounterEntity::Minion(id)) => {
                for (entity, minion) in &minion_query {
                    if minion.id == *id {
                        commands.entity(entity).try_despawn();
                    }
                }
            }
            EncounterSignal::Despawn(EncounterEntity::Pickup(pickup)) => {
                for (entity, body) in &pickup_query {
                    if body.pickup == *pickup {
                        commands.entity(entity).try_despawn();
                    }
                }
            }
            EncounterSignal::MinionReturning(id) => {
                for (_, mut minion) in &mut minion_query {
                    if minion.id == *id {
                        minion.returning = true;
                    }
                }
            }
            EncounterSignal::PhaseChanged {
                layout: Some(layout),
                ..
            } => {
                for entity in &platform_query {
                    commands.entity(entity).try_despawn();
                }
                spawn_layout(&mut commands, layout);
            }
            EncounterSignal::PlayerKnockback { impulse } => {
                if let Some((mut velocity, _)) = player_query.iter_mut().next() {
                    velocity.0 = flip_y(*impulse);
                }
            }
            EncounterSignal::PlayerInvincible { active } => {
                if let Some((_, mut sprite)) = player_query.iter_mut().next() {
                    sprite.color = sprite.color.with_alpha(if *active { 0.4 } else { 1.0 });
                }
            }
            EncounterSignal::LaserCharging { origin } => {
                let y = to_world(*origin).y;
                commands.spawn((
                    ArenaEntity,
                    LaserTelegraph,
                    Sprite::from_color(
                        Color::srgba(1.0, 0.2, 0.2, 0.25),
                        Vec2::new(ARENA_SIZE.x, 2.0),
                    ),
                    Transform::from_xyz(0.0, y, 2.0),
                ));
            }
            EncounterSignal::LaserActive { origin, .. } => {
                for entity in &laser_query {
                    commands.entity(entity).try_despawn();
                }
                let y = to_world(*origin).y;
                commands.spawn((
                    ArenaEntity,
                    LaserBeamZone,
                    Sprite::from_color(
                        Color::srgba(1.0, 0.1, 0.1, 0.8),
                        Vec2::new(ARENA_SIZE.x, LASER_THICKNESS),
                    ),
                    Transform::from_xyz(0.0, y, 2.0),
                    Collider::rectangle(ARENA_SIZE.x, LASER_THICKNESS),
                    Sensor,
                    CollisionEventsEnabled,
                    CollisionLayers::new(GameLayer::EnemyHitbox, [GameLayer::Player]),
                ));
            }
            EncounterSignal::LaserExpired => {
                for entity in &laser_query {
                    commands.entity(entity).try_despawn();
                }
            }
            EncounterSignal::ComputationPulse { .. } => {
                commands.spawn((
                    ArenaEntity,
                    PulseEffect {
                        lifetime: Timer::from_seconds(PULSE_LIFETIME, TimerMode::Once),
                    },
                    Sprite::from_color(Color::srgba(0.6, 0.3, 1.0, 0.35), BOSS_SIZE * 2.0),
                    Transform::from_xyz(boss.x, boss.y, 0.8),
                ));
            }
            EncounterSignal::BossMoveTo { target, speed } => {
                for mut movement in &mut boss_query {
                    movement.target = Some(to_world(*target));
                    movement.speed = *speed;
                }
            }
            EncounterSignal::CarrierLoaded { carrier, loaded } => {
                for (body, mut sprite) in &mut carrier_query {
                    if body.index == *carrier {
                        sprite.color = if *loaded {
                            CARRIER_COLOR_LOADED
                        } else {
                            CARRIER_COLOR_EMPTY
                        };
                    }
                }
            }
            EncounterSignal::ArenaCleared => {
                for entity in &transient_query {
                    commands.entity(entity).try_despawn();
                }
                for (entity, _) in &minion_query {
                    commands.entity(entity).try_despawn();
                }
                for (entity, _) in &pickup_query {
                    commands.entity(entity).try_despawn();
                }
            }
            _ => {}
        }
    }
}

fn spawn_requested(commands: &mut Commands, request: &SpawnRequest) {
    let position = to_world(request.position);
    let target = to_world(request.target);

    match request.kind {
        SpawnKind::Projectile { pattern, speed } => {
            let aim = (target - position).try_normalize().unwrap_or(Vec2::NEG_Y);
            let direction = match pattern {
                ProjectilePattern::Aimed | ProjectilePattern::Homing => aim,
                ProjectilePattern::Angled(degrees) => Vec2::from_angle(degrees.to_radians()).rotate(aim),
            };
            let color = match pattern {
                ProjectilePattern::Homing => Color::srgb(1.0, 0.5, 0.1),
                _ => Color::srgb(1.0, 0.85, 0.2),
            };
            commands.spawn((
                ArenaEntity,
                BossProjectile {
                    homing: matches!(pattern, ProjectilePattern::Homing),
                    speed,
                    lifetime: Timer::from_seconds(PROJECTILE_LIFETIME, TimerMode::Once),
                },
                Sprite::from_color(color, Vec2::splat(PROJECTILE_RADIUS * 2.0)),
                Transform::from_xyz(position.x, position.y, 1.5),
                RigidBody::Kinematic,
                Collider::circle(PROJECTILE_RADIUS),
                Sensor,
                LinearVelocity(direction * speed),
                CollisionEventsEnabled,
                CollisionLayers::new(GameLayer::EnemyHitbox, [GameLayer::Player]),
            ));
        }
        SpawnKind::Minion { id } => {
            commands.spawn((
                ArenaEntity,
                MinionBody {
                    id,
                    returning: false,
                },
                Sprite::from_color(Color::srgb(0.8, 0.4, 0.6), Vec2::splat(MINION_SIZE)),
                Transform::from_xyz(position.x, position.y, 1.0),
                RigidBody::Dynamic,
                Collider::rectangle(MINION_SIZE, MINION_SIZE),
                Sensor,
                LinearVelocity::default(),
                LockedAxes::ROTATION_LOCKED,
                GravityScale(0.0),
                CollisionEventsEnabled,
                CollisionLayers::new(
                    GameLayer::Enemy,
                    [GameLayer::Player, GameLayer::PlayerHitbox, GameLayer::Enemy],
                ),
            ));
        }
        SpawnKind::DecryptionKey { pickup } => {
            commands.spawn((
                ArenaEntity,
                PickupBody {
                    pickup,
                    kind: PickupKind::Key,
                },
                Sprite::from_color(Color::srgb(1.0, 0.9, 0.1), Vec2::splat(PICKUP_SIZE)),
                Transform::from_xyz(position.x, position.y, 1.0),
                Collider::rectangle(PICKUP_SIZE, PICKUP_SIZE),
                Sensor,
                CollisionEventsEnabled,
                CollisionLayers::new(GameLayer::Pickup, [GameLayer::Player]),
            ));
        }
        SpawnKind::Package { pickup } => {
            commands.spawn((
                ArenaEntity,
                PickupBody {
                    pickup,
                    kind: PickupKind::Package,
                },
                Sprite::from_color(Color::srgb(0.6, 0.4, 0.2), Vec2::splat(PICKUP_SIZE)),
                Transform::from_xyz(position.x, position.y, 1.0),
                RigidBody::Kinematic,
                Collider::rectangle(PICKUP_SIZE, PICKUP_SIZE),
                Sensor,
                LinearVelocity(Vec2::NEG_Y * PACKAGE_FALL_SPEED),
                CollisionEventsEnabled,
                CollisionLayers::new(GameLayer::Pickup, [GameLayer::Player]),
            ));
        }
    }
}

fn spawn_layout(commands: &mut Commands, layout: &ArenaLayout) {
    for platform in &layout.platforms {
        let position = to_world(*platform);
        commands.spawn((
            ArenaEntity,
            LayoutPlatform,
            Sprite::from_color(Color::srgb(0.35, 0.35, 0.45), PLATFORM_SIZE),
            Transform::from_xyz(position.x, position.y, 0.0),
            RigidBody::Static,
            Collider::rectangle(PLATFORM_SIZE.x, PLATFORM_SIZE.y),
            CollisionLayers::new(GameLayer::Ground, [GameLayer::Player, GameLayer::Pickup]),
        ));
    }
    debug!("Layout {} spawned ({} platforms)", layout.id, layout.platforms.len());
}

/// Bends homing projectiles toward the player and expires old ones.
pub(crate) fn steer_projectiles(
    mut commands: Commands,
    time: Res<Time>,
    player_query: Query<&Transform, With<PlayerBody>>,
    mut projectiles: Query<(
        Entity,
        &mut BossProjectile,
        &Transform,
        &mut LinearVelocity,
    )>,
) {
    let player = player_query.iter().next().map(|t| t.translation.truncate());

    for (entity, mut projectile, transform, mut velocity) in &mut projectiles {
        projectile.lifetime.tick(time.delta());
        if projectile.lifetime.just_finished() {
            commands.entity(entity).try_despawn();
            continue;
        }

        if projectile.homing
            && let Some(player) = player
        {
            let desired = (player - transform.translation.truncate())
                .try_normalize()
                .unwrap_or(Vec2::ZERO)
                * projectile.speed;
            let blend = (HOMING_TURN_RATE * time.delta_secs()).min(1.0);
            velocity.0 = velocity.0.lerp(desired, blend);
        }
    }
}

/// Minions chase the player, or head back to the boss once they carry enough data.
pub(crate) fn steer_minions(
    player_query: Query<&Transform, With<PlayerBody>>,
    boss_query: Query<&Transform, With<BossBody>>,
    mut minions: Query<(&MinionBody, &Transform, &mut LinearVelocity)>,
) {
    let player = player_query.iter().next().map(|t| t.translation.truncate());
    let boss = boss_query.iter().next().map(|t| t.translation.truncate());

    for (minion, transform, mut velocity) in &mut minions {
        let target = if minion.returning { boss } else { player };
        velocity.0 = match target {
            Some(target) => {
                (target - transform.translation.truncate())
                    .try_normalize()
                    .unwrap_or(Vec2::ZERO)
                    * MINION_SPEED
            }
            None => Vec2::ZERO,
        };
    }
}

/// Moves the boss toward its current patrol target.
pub(crate) fn move_boss(
    mut boss_query: Query<(&mut BossMovement, &Transform, &mut LinearVelocity), With<BossBody>>,
) {
    for (mut movement, transform, mut velocity) in &mut boss_query {
        let Some(target) = movement.target else {
            velocity.0 = Vec2::ZERO;
            continue;
        };
        let offset = target - transform.translation.truncate();
        if offset.length() <= ARRIVAL_DISTANCE {
            movement.target = None;
            velocity.0 = Vec2::ZERO;
        } else {
            velocity.0 = offset.normalize() * movement.speed;
        }
    }
}

/// Stops packages on the floor and fades out computation pulses.
pub(crate) fn settle_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut packages: Query<(&PickupBody, &Transform, &mut LinearVelocity)>,
    mut pulses: Query<(Entity, &mut PulseEffect)>,
) {
    for (body, transform, mut velocity) in &mut packages {
        if body.kind == PickupKind::Package
            && to_arena(transform.translation.truncate()).y >= FLOOR_Y - PICKUP_SIZE / 2.0
        {
            velocity.0 = Vec2::ZERO;
        }
    }

    for (entity, mut pulse) in &mut pulses {
        pulse.lifetime.tick(time.delta());
        if pulse.lifetime.just_finished() {
            commands.entity(entity).try_despawn();
        }
    }
}

pub(crate) fn despawn_arena(mut commands: Commands, query: Query<Entity, With<ArenaEntity>>) {
    let mut count = 0;
    for entity in &query {
        commands.entity(entity).despawn();
        count += 1;
    }
    debug!("Despawned {} arena entities", count);
}
