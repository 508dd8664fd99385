//! Arena domain: player locomotion and strikes from keyboard input.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::arena::components::{
    ArenaEntity, Companion, GameLayer, PlayerBody, PlayerControl, PlayerStrike,
};
use crate::encounter::{ActiveEncounter, AttackSource, PrivacySkill};

const RUN_SPEED: f32 = 250.0;
const JUMP_VELOCITY: f32 = 480.0;
const GRAVITY: f32 = 1200.0;
const MAX_FALL_SPEED: f32 = 900.0;
const PLAYER_HALF_HEIGHT: f32 = 24.0;
const STRIKE_COOLDOWN: f32 = 0.3;
const MELEE_REACH: Vec2 = Vec2::new(36.0, 40.0);
const MELEE_LIFETIME: f32 = 0.15;
const SHOT_SPEED: f32 = 500.0;
const SHOT_LIFETIME: f32 = 1.5;
const BLAST_SIZE: f32 = 120.0;
const BLAST_LIFETIME: f32 = 0.25;
const HELPER_OFFSET: f32 = 50.0;
const HELPER_SIZE: f32 = 24.0;
const HELPER_LIFETIME: f32 = 10.0;

pub(crate) fn detect_ground(
    spatial_query: SpatialQuery,
    mut query: Query<(&Transform, &mut PlayerControl), With<PlayerBody>>,
) {
    let ground_filter = SpatialQueryFilter::from_mask(GameLayer::Ground);

    for (transform, mut control) in &mut query {
        let origin = transform.translation.truncate() - Vec2::new(0.0, PLAYER_HALF_HEIGHT);
        control.on_ground = spatial_query
            .cast_ray(origin, Dir2::NEG_Y, 4.0, true, &ground_filter)
            .is_some();
    }
}

/// Runs, jumps and applies gravity by hand; knockback arrives as a velocity override.
pub(crate) fn move_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut query: Query<(&mut PlayerControl, &mut LinearVelocity), With<PlayerBody>>,
) {
    // Arrow keys belong to the noise control.
    let mut axis = 0.0;
    if keyboard.pressed(KeyCode::KeyA) {
        axis -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        axis += 1.0;
    }
    let jump = keyboard.just_pressed(KeyCode::Space) || keyboard.just_pressed(KeyCode::KeyW);

    for (mut control, mut velocity) in &mut query {
        if axis != 0.0 {
            control.facing = axis;
        }
        control.strike_cooldown = (control.strike_cooldown - time.delta_secs()).max(0.0);

        // Knockback decays instead of snapping straight to the run speed.
        let target_x = axis * RUN_SPEED;
        velocity.x += (target_x - velocity.x) * (12.0 * time.delta_secs()).min(1.0);

        if control.on_ground {
            velocity.y = velocity.y.max(0.0);
            if jump {
                velocity.y = JUMP_VELOCITY;
            }
        } else {
            velocity.y = (velocity.y - GRAVITY * time.delta_secs()).max(-MAX_FALL_SPEED);
        }
    }
}

/// J swings, K shoots.
pub(crate) fn player_strikes(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut query: Query<(&Transform, &mut PlayerControl), With<PlayerBody>>,
) {
    let source = if keyboard.just_pressed(KeyCode::KeyJ) {
        AttackSource::Melee
    } else if keyboard.just_pressed(KeyCode::KeyK) {
        AttackSource::Projectile
    } else {
        return;
    };

    for (transform, mut control) in &mut query {
        if control.strike_cooldown > 0.0 {
            continue;
        }
        control.strike_cooldown = STRIKE_COOLDOWN;
        let origin = transform.translation.truncate();
        spawn_strike(&mut commands, source, origin, control.facing);
        debug!("Player strike: {:?}", source);
    }
}

/// L releases the homomorphic blast, H calls the federated helper. Both need the skill unlocked
/// and recharged.
pub(crate) fn player_skills(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut active: ResMut<ActiveEncounter>,
    query: Query<(&Transform, &PlayerControl), With<PlayerBody>>,
) {
    let skill = if keyboard.just_pressed(KeyCode::KeyL) {
        PrivacySkill::HomomorphicEncryption
    } else if keyboard.just_pressed(KeyCode::KeyH) {
        PrivacySkill::FederatedLearning
    } else {
        return;
    };
    let Some(encounter) = active.encounter.as_mut() else {
        return;
    };

    let source = match encounter.activate_skill(skill) {
        Ok(source) => source,
        Err(refusal) => {
            debug!("Skill refused: {}", refusal);
            return;
        }
    };
    for (transform, control) in &query {
        spawn_strike(
            &mut commands,
            source,
            transform.translation.truncate(),
            control.facing,
        );
    }
}

fn spawn_strike(commands: &mut Commands, source: AttackSource, origin: Vec2, facing: f32) {
    let layers = CollisionLayers::new(GameLayer::PlayerHitbox, [GameLayer::Enemy]);

    match source {
        AttackSource::Melee => {
            let position = origin + Vec2::new(facing * MELEE_REACH.x, 0.0);
            commands.spawn((
                ArenaEntity,
                PlayerStrike {
                    source,
                    lifetime: Timer::from_seconds(MELEE_LIFETIME, TimerMode::Once),
                },
                Sprite::from_color(Color::srgba(1.0, 1.0, 0.0, 0.5), MELEE_REACH),
                Transform::from_xyz(position.x, position.y, 1.0),
                Collider::rectangle(MELEE_REACH.x, MELEE_REACH.y),
                Sensor,
                CollisionEventsEnabled,
                layers,
            ));
        }
        AttackSource::Projectile => {
            commands.spawn((
                ArenaEntity,
                PlayerStrike {
                    source,
                    lifetime: Timer::from_seconds(SHOT_LIFETIME, TimerMode::Once),
                },
                Sprite::from_color(Color::srgb(0.4, 0.9, 1.0), Vec2::splat(8.0)),
                Transform::from_xyz(origin.x, origin.y, 1.0),
                RigidBody::Kinematic,
                Collider::circle(4.0),
                Sensor,
                LinearVelocity(Vec2::new(facing * SHOT_SPEED, 0.0)),
                CollisionEventsEnabled,
                layers,
            ));
        }
        AttackSource::Helper => {
            let offset = Vec2::new(facing * HELPER_OFFSET, 0.0);
            let position = origin + offset;
            commands.spawn((
                ArenaEntity,
                PlayerStrike {
                    source,
                    lifetime: Timer::from_seconds(HELPER_LIFETIME, TimerMode::Once),
                },
                Companion { offset },
                Sprite::from_color(Color::srgb(0.2, 0.8, 0.2), Vec2::splat(HELPER_SIZE)),
                Transform::from_xyz(position.x, position.y, 1.0),
                RigidBody::Kinematic,
                Collider::circle(HELPER_SIZE / 2.0),
                Sensor,
                CollisionEventsEnabled,
                layers,
            ));
        }
        AttackSource::Blast => {
            commands.spawn((
                ArenaEntity,
                PlayerStrike {
                    source,
                    lifetime: Timer::from_seconds(BLAST_LIFETIME, TimerMode::Once),
                },
                Sprite::from_color(Color::srgba(0.5, 0.8, 1.0, 0.35), Vec2::splat(BLAST_SIZE)),
                Transform::from_xyz(origin.x, origin.y, 1.0),
                Collider::circle(BLAST_SIZE / 2.0),
                Sensor,
                CollisionEventsEnabled,
                layers,
            ));
        }
    }
}

pub(crate) fn follow_player(
    player_query: Query<&Transform, With<PlayerBody>>,
    mut companions: Query<(&Companion, &mut Transform), Without<PlayerBody>>,
) {
    let Some(player) = player_query.iter().next() else {
        return;
    };
    for (companion, mut transform) in &mut companions {
        let target = player.translation.truncate() + companion.offset;
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }
}

pub(crate) fn expire_strikes(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut PlayerStrike)>,
) {
    for (entity, mut strike) in &mut query {
        strike.lifetime.tick(time.delta());
        if strike.lifetime.just_finished() {
            commands.entity(entity).try_despawn();
        }
    }
}
