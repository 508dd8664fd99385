//! Arena domain: turning physics overlaps into encounter contacts.

use avian2d::prelude::*;
use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::arena::components::{
    BossBody, BossProjectile, CarrierBody, LaserBeamZone, MinionBody, PickupBody, PickupKind,
    PlayerBody, PlayerStrike,
};
use crate::arena::frame::to_arena;
use crate::bosses::MinionId;
use crate::encounter::{ActiveEncounter, AttackSource, ContactEvent, PickupId};

/// What a collider is, as far as the encounter cares. Positions are in arena coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Body {
    Player(Vec2),
    Boss(Vec2),
    Strike(AttackSource),
    Projectile(Vec2),
    Laser,
    Minion {
        id: MinionId,
        returning: bool,
        position: Vec2,
    },
    Pickup {
        pickup: PickupId,
        kind: PickupKind,
    },
    Carrier(usize),
}

/// Resolves an overlapping pair to a contact, trying both orderings.
pub(crate) fn classify(a: Body, b: Body) -> Option<ContactEvent> {
    classify_ordered(a, b).or_else(|| classify_ordered(b, a))
}

fn classify_ordered(a: Body, b: Body) -> Option<ContactEvent> {
    match (a, b) {
        (Body::Strike(source), Body::Boss(_)) => Some(ContactEvent::PlayerAttackHitBoss { source }),
        (Body::Strike(source), Body::Minion { id, position, .. }) => {
            Some(ContactEvent::PlayerAttackHitMinion {
                minion: id,
                source,
                position,
            })
        }
        (Body::Player(player), Body::Boss(boss)) => {
            Some(ContactEvent::PlayerHitBoss { player, boss })
        }
        (Body::Player(player), Body::Projectile(projectile)) => {
            Some(ContactEvent::BossProjectileHitPlayer { player, projectile })
        }
        (Body::Player(_), Body::Laser) => Some(ContactEvent::LaserHitPlayer),
        (Body::Player(player), Body::Minion { id, position, .. }) => {
            Some(ContactEvent::MinionTouchedPlayer {
                minion: id,
                player,
                minion_pos: position,
            })
        }
        (
            Body::Minion {
                id,
                returning: true,
                ..
            },
            Body::Boss(_),
        ) => Some(ContactEvent::MinionReachedBoss { minion: id }),
        (Body::Player(_), Body::Pickup { pickup, kind }) => Some(match kind {
            PickupKind::Key => ContactEvent::KeyCollected { pickup },
            PickupKind::Package => ContactEvent::PackageCollected { pickup },
        }),
        (Body::Player(_), Body::Carrier(carrier)) => {
            Some(ContactEvent::PackageDelivered { carrier })
        }
        _ => None,
    }
}

/// Read access to everything a collider can be, for turning entities into [`Body`]s.
#[derive(SystemParam)]
pub(crate) struct ArenaBodies<'w, 's> {
    players: Query<'w, 's, &'static Transform, With<PlayerBody>>,
    bosses: Query<'w, 's, &'static Transform, With<BossBody>>,
    strikes: Query<'w, 's, &'static PlayerStrike>,
    projectiles: Query<'w, 's, &'static Transform, With<BossProjectile>>,
    lasers: Query<'w, 's, (), With<LaserBeamZone>>,
    minions: Query<'w, 's, (&'static MinionBody, &'static Transform)>,
    pickups: Query<'w, 's, &'static PickupBody>,
    carriers: Query<'w, 's, &'static CarrierBody>,
}

impl ArenaBodies<'_, '_> {
    fn body_of(&self, entity: Entity) -> Option<Body> {
        if let Ok(transform) = self.players.get(entity) {
            return Some(Body::Player(to_arena(transform.translation.truncate())));
        }
        if let Ok(transform) = self.bosses.get(entity) {
            return Some(Body::Boss(to_arena(transform.translation.truncate())));
        }
        if let Ok(strike) = self.strikes.get(entity) {
            return Some(Body::Strike(strike.source));
        }
        if let Ok(transform) = self.projectiles.get(entity) {
            return Some(Body::Projectile(to_arena(transform.translation.truncate())));
        }
        if self.lasers.get(entity).is_ok() {
            return Some(Body::Laser);
        }
        if let Ok((minion, transform)) = self.minions.get(entity) {
            return Some(Body::Minion {
                id: minion.id,
                returning: minion.returning,
                position: to_arena(transform.translation.truncate()),
            });
        }
        if let Ok(pickup) = self.pickups.get(entity) {
            return Some(Body::Pickup {
                pickup: pickup.pickup,
                kind: pickup.kind,
            });
        }
        self.carriers
            .get(entity)
            .ok()
            .map(|carrier| Body::Carrier(carrier.index))
    }
}

/// Hazards that keep hurting for as long as the player stays in them.
pub(crate) fn is_lingering(contact: &ContactEvent) -> bool {
    matches!(
        contact,
        ContactEvent::PlayerHitBoss { .. }
            | ContactEvent::LaserHitPlayer
            | ContactEvent::MinionTouchedPlayer { .. }
    )
}

pub(crate) fn route_collisions(
    mut commands: Commands,
    mut collision_events: MessageReader<CollisionStart>,
    mut contacts: MessageWriter<ContactEvent>,
    bodies: ArenaBodies,
) {
    for event in collision_events.read() {
        let (Some(a), Some(b)) = (
            bodies.body_of(event.collider1),
            bodies.body_of(event.collider2),
        ) else {
            continue;
        };
        let Some(contact) = classify(a, b) else {
            continue;
        };

        // Projectiles are spent on whatever they hit.
        for (entity, body) in [(event.collider1, a), (event.collider2, b)] {
            let spent = match body {
                Body::Projectile(_) => true,
                Body::Strike(source) => source == AttackSource::Projectile,
                _ => false,
            };
            if spent {
                commands.entity(entity).try_despawn();
            }
        }

        debug!("Contact: {:?}", contact);
        contacts.write(contact);
    }
}

/// Collision starts fire once per entry. While the player is vulnerable, a hazard it never left
/// is reported again so it lands after invincibility ends.
pub(crate) fn repeat_lingering_contacts(
    active: Res<ActiveEncounter>,
    bodies: ArenaBodies,
    player_query: Query<(Entity, &CollidingEntities), With<PlayerBody>>,
    mut contacts: MessageWriter<ContactEvent>,
) {
    let vulnerable = active
        .encounter
        .as_ref()
        .is_some_and(|encounter| encounter.is_live() && !encounter.player().invincible);
    if !vulnerable {
        return;
    }

    for (entity, colliding) in &player_query {
        let Some(player) = bodies.body_of(entity) else {
            continue;
        };
        let lingering = colliding
            .iter()
            .filter_map(|other| bodies.body_of(*other))
            .filter_map(|other| classify(player, other))
            .find(is_lingering);
        if let Some(contact) = lingering {
            debug!("Lingering contact: {:?}", contact);
            contacts.write(contact);
        }
    }
}
