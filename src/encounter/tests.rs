//! Encounter domain: tests for whole fights driven through contacts and time.

use std::time::Duration;

use bevy::prelude::*;

use super::{
    ArenaPositions, AttackSource, ContactEvent, Encounter, EncounterEntity, EncounterOutcome,
    EncounterSignal, PickupId, PlayerSnapshot, PrivacySkill, SkillRefusal, SpawnKind,
};
use crate::bosses::{BehaviorTag, BossProfile, MinionId, ProjectilePattern};
use crate::content::{EncounterTuning, builtin_content};

const STEP: Duration = Duration::from_millis(100);

fn profile(id: &str) -> BossProfile {
    let (registry, _) = builtin_content().expect("built-in content should parse");
    BossProfile::from_def(registry.get(id).expect("boss exists")).expect("valid profile")
}

fn start(id: &str) -> Encounter {
    let tuning = EncounterTuning::default();
    let snapshot = PlayerSnapshot::fresh(&tuning);
    let mut encounter = Encounter::start(profile(id), tuning, &snapshot, 7);
    encounter.drain_signals();
    encounter
}

/// Advances in fixed steps and returns every signal raised along the way.
fn run_for(encounter: &mut Encounter, millis: u64) -> Vec<EncounterSignal> {
    let mut signals = Vec::new();
    for _ in 0..(millis / 100) {
        encounter.advance(STEP, ArenaPositions::default());
        signals.extend(encounter.drain_signals());
    }
    signals
}

fn strike(encounter: &mut Encounter, attack_power: f32) -> Vec<EncounterSignal> {
    encounter.player_mut().combatant.attack_power = attack_power;
    encounter.handle(ContactEvent::PlayerAttackHitBoss {
        source: AttackSource::Melee,
    });
    encounter.drain_signals()
}

fn messages(signals: &[EncounterSignal]) -> Vec<&str> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Message { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

fn spawned_keys(signals: &[EncounterSignal]) -> Vec<PickupId> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Spawn(request) => match request.kind {
                SpawnKind::DecryptionKey { pickup } => Some(pickup),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn key_positions(signals: &[EncounterSignal]) -> Vec<Vec2> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Spawn(request) => match request.kind {
                SpawnKind::DecryptionKey { .. } => Some(request.position),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn spawned_packages(signals: &[EncounterSignal]) -> Vec<PickupId> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Spawn(request) => match request.kind {
                SpawnKind::Package { pickup } => Some(pickup),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn spawned_minions(signals: &[EncounterSignal]) -> Vec<MinionId> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Spawn(request) => match request.kind {
                SpawnKind::Minion { id } => Some(id),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn projectile_speeds(signals: &[EncounterSignal]) -> Vec<f32> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Spawn(request) => match request.kind {
                SpawnKind::Projectile { speed, .. } => Some(speed),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn phase_numbers(signals: &[EncounterSignal]) -> Vec<usize> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::PhaseChanged { phase, .. } => Some(*phase),
            _ => None,
        })
        .collect()
}

fn resolutions(signals: &[EncounterSignal]) -> Vec<EncounterOutcome> {
    signals
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::Resolved { outcome, .. } => Some(*outcome),
            _ => None,
        })
        .collect()
}

fn projectile_hit() -> ContactEvent {
    ContactEvent::BossProjectileHitPlayer {
        player: Vec2::new(100.0, 0.0),
        projectile: Vec2::new(150.0, 0.0),
    }
}

// -----------------------------------------------------------------------------
// Start-up
// -----------------------------------------------------------------------------

#[test]
fn test_start_announces_first_phase_and_state() {
    let tuning = EncounterTuning::default();
    let snapshot = PlayerSnapshot::fresh(&tuning);
    let mut encounter = Encounter::start(profile("he_boss"), tuning, &snapshot, 7);
    let signals = encounter.drain_signals();

    let layout = signals.iter().find_map(|s| match s {
        EncounterSignal::PhaseChanged {
            phase: 1, layout, ..
        } => layout.clone(),
        _ => None,
    });
    assert_eq!(layout.map(|l| l.platforms.len()), Some(6));
    assert!(signals.contains(&EncounterSignal::BossHealthChanged { ratio: 1.0 }));
    assert!(signals.contains(&EncounterSignal::PlayerHealthChanged { hearts: 5 }));
    assert!(signals.contains(&EncounterSignal::ShieldChanged { multiplier: 0.1 }));
    assert!(messages(&signals).contains(&"Phase 1: Encrypted State!"));
    assert_eq!(
        encounter.active_behaviors(),
        &[BehaviorTag::ShootProjectiles, BehaviorTag::SummonMinions]
    );
    assert!(encounter.is_live());
}

// -----------------------------------------------------------------------------
// Mitigation
// -----------------------------------------------------------------------------

#[test]
fn test_encrypted_boss_takes_a_tenth_until_keys_are_collected() {
    let mut encounter = start("he_boss");

    let signals = strike(&mut encounter, 100.0);
    assert_eq!(encounter.boss().health, 490.0);
    assert!(messages(&signals).contains(&"Attack reduced by encryption!"));

    // Keys fall every 15 seconds.
    let keys = spawned_keys(&run_for(&mut encounter, 45_000));
    assert_eq!(keys.len(), 3);

    let mut signals = Vec::new();
    for pickup in &keys {
        encounter.handle(ContactEvent::KeyCollected { pickup: *pickup });
        signals.extend(encounter.drain_signals());
    }
    let shown = messages(&signals);
    assert!(shown.contains(&"Decryption Key Collected (1/3)!"));
    assert!(shown.contains(&"Decryption Key Collected (3/3)!"));
    assert!(shown.contains(&"Boss Decrypted! Now you can deal full damage!"));
    assert!(signals.contains(&EncounterSignal::ShieldChanged { multiplier: 1.0 }));
    assert!(!encounter.shield().is_encrypted());

    let signals = strike(&mut encounter, 100.0);
    assert_eq!(encounter.boss().health, 390.0);
    assert!(!messages(&signals).contains(&"Attack reduced by encryption!"));
}

#[test]
fn test_keys_stop_spawning_while_three_lie_uncollected() {
    let mut encounter = start("he_boss");

    // Due at 15, 30, 45 and 60 seconds; the fourth finds three already waiting.
    let keys = spawned_keys(&run_for(&mut encounter, 60_000));
    assert_eq!(keys.len(), 3);
    let ring = encounter.mechanics().keys.as_ref().expect("key ring");
    assert_eq!(ring.outstanding, 3);
    assert!(!ring.can_spawn());

    encounter.handle(ContactEvent::KeyCollected { pickup: keys[0] });
    assert_eq!(spawned_keys(&run_for(&mut encounter, 15_000)).len(), 1);
}

#[test]
fn test_keys_appear_above_a_platform() {
    let mut encounter = start("he_boss");
    let positions = key_positions(&run_for(&mut encounter, 45_000));
    assert_eq!(positions.len(), 3);

    let platforms = encounter
        .profile()
        .layout("he_phase_1")
        .expect("phase one layout")
        .platforms
        .clone();
    for position in positions {
        assert!(
            platforms.iter().any(|platform| position.y == platform.y - 50.0
                && (position.x - platform.x).abs() <= 50.0),
            "key at {position} is not above a platform"
        );
    }
}

#[test]
fn test_collected_key_cannot_be_collected_twice() {
    let mut encounter = start("he_boss");
    let keys = spawned_keys(&run_for(&mut encounter, 15_000));
    assert_eq!(keys.len(), 1);

    encounter.handle(ContactEvent::KeyCollected { pickup: keys[0] });
    encounter.handle(ContactEvent::KeyCollected { pickup: keys[0] });
    encounter.handle(ContactEvent::KeyCollected {
        pickup: PickupId(999),
    });

    let ring = encounter.mechanics().keys.as_ref().expect("key ring");
    assert_eq!(ring.collected, 1);
    assert_eq!(ring.outstanding, 0);
}

#[test]
fn test_full_noise_shield_blocks_all_damage() {
    let mut encounter = start("dp_boss");
    strike(&mut encounter, 100.0);
    assert_eq!(encounter.boss().health, 500.0);

    encounter.handle(ContactEvent::ShieldSignal { strength: 0.5 });
    let signals = encounter.drain_signals();
    assert!(signals.contains(&EncounterSignal::ShieldChanged { multiplier: 0.5 }));

    // 100 attack, scaled by 0.2, halved by the shield.
    strike(&mut encounter, 100.0);
    assert_eq!(encounter.boss().health, 490.0);
}

#[test]
fn test_noise_strength_speeds_up_projectiles() {
    let mut encounter = start("dp_boss");
    assert_eq!(projectile_speeds(&run_for(&mut encounter, 3000)), vec![400.0]);

    encounter.handle(ContactEvent::ShieldSignal { strength: 0.5 });
    assert_eq!(projectile_speeds(&run_for(&mut encounter, 3000)), vec![300.0]);
}

#[test]
fn test_shield_signal_is_ignored_by_other_bosses() {
    let mut encounter = start("smc_boss");
    encounter.handle(ContactEvent::ShieldSignal { strength: 0.5 });
    assert!(encounter.drain_signals().is_empty());

    strike(&mut encounter, 50.0);
    assert_eq!(encounter.boss().health, 1450.0);
}

#[test]
fn test_minions_shield_the_federated_boss() {
    let mut encounter = start("fl_boss");
    let signals = run_for(&mut encounter, 4000);
    let minions = spawned_minions(&signals);
    assert_eq!(minions.len(), 2);
    assert!(signals.contains(&EncounterSignal::ShieldChanged { multiplier: 0.0 }));

    strike(&mut encounter, 10.0);
    assert_eq!(encounter.boss().health, 300.0);

    let mut signals = Vec::new();
    for minion in &minions {
        encounter.handle(ContactEvent::PlayerAttackHitMinion {
            minion: *minion,
            source: AttackSource::Melee,
            position: Vec2::ZERO,
        });
        signals.extend(encounter.drain_signals());
    }
    assert!(signals.contains(&EncounterSignal::Despawn(EncounterEntity::Minion(minions[0]))));
    assert!(signals.contains(&EncounterSignal::ShieldChanged { multiplier: 1.0 }));
    assert_eq!(encounter.minion_count(), 0);

    strike(&mut encounter, 10.0);
    assert_eq!(encounter.boss().health, 290.0);
}

#[test]
fn test_blast_damage_follows_the_boss() {
    let mut encounter = start("he_boss");
    encounter.handle(ContactEvent::PlayerAttackHitBoss {
        source: AttackSource::Blast,
    });
    // 50 through encryption.
    assert_eq!(encounter.boss().health, 495.0);

    let mut encounter = start("smc_boss");
    encounter.handle(ContactEvent::PlayerAttackHitBoss {
        source: AttackSource::Blast,
    });
    assert_eq!(encounter.boss().health, 1497.0);

    let mut encounter = start("dp_boss");
    encounter.handle(ContactEvent::ShieldSignal { strength: 0.0 });
    encounter.handle(ContactEvent::PlayerAttackHitBoss {
        source: AttackSource::Blast,
    });
    assert!((encounter.boss().health - 499.4).abs() < 1e-3);
}

#[test]
fn test_helper_strikes_for_its_own_damage() {
    let mut encounter = start("smc_boss");
    encounter.handle(ContactEvent::PlayerAttackHitBoss {
        source: AttackSource::Helper,
    });
    assert_eq!(encounter.boss().health, 1495.0);
}

// -----------------------------------------------------------------------------
// Phases
// -----------------------------------------------------------------------------

#[test]
fn test_big_hit_steps_through_phases_one_at_a_time() {
    let mut encounter = start("fl_boss");

    // 300 -> 60 health, ratio 0.2, which is below both later thresholds.
    let signals = strike(&mut encounter, 240.0);
    assert_eq!(phase_numbers(&signals), vec![2]);
    assert_eq!(encounter.phase_index(), 1);

    let signals = run_for(&mut encounter, 900);
    assert!(phase_numbers(&signals).is_empty());

    let signals = run_for(&mut encounter, 100);
    assert_eq!(phase_numbers(&signals), vec![3]);
    assert_eq!(encounter.phase_index(), 2);
    assert!(encounter.active_behaviors().contains(&BehaviorTag::LaserBeam));
}

#[test]
fn test_healing_does_not_regress_phase() {
    let mut encounter = start("he_boss");

    // 1800 raw at a tenth leaves 320 of 500.
    strike(&mut encounter, 1800.0);
    assert_eq!(encounter.phase_index(), 1);

    let minions = spawned_minions(&run_for(&mut encounter, 4000));
    assert_eq!(minions.len(), 1);

    encounter.handle(ContactEvent::MinionTouchedPlayer {
        minion: minions[0],
        player: Vec2::new(100.0, 0.0),
        minion_pos: Vec2::new(120.0, 0.0),
    });
    let signals = encounter.drain_signals();
    assert_eq!(encounter.boss().health, 340.0);
    assert!(encounter.boss().health_ratio() > 0.66);
    assert!(signals.contains(&EncounterSignal::Despawn(EncounterEntity::Minion(minions[0]))));
    assert_eq!(encounter.phase_index(), 1);

    strike(&mut encounter, 0.0);
    run_for(&mut encounter, 2000);
    assert_eq!(encounter.phase_index(), 1);
}

#[test]
fn test_final_phase_strengthens_encryption_without_keys() {
    let mut encounter = start("he_boss");

    // 3400 raw at a tenth leaves 160 of 500.
    strike(&mut encounter, 3400.0);
    let signals = run_for(&mut encounter, 1000);
    assert_eq!(phase_numbers(&signals), vec![3]);
    assert!(messages(&signals).contains(&"Encryption Strengthened!"));
    assert!(encounter.shield().is_encrypted());
}

#[test]
fn test_encryption_returns_each_non_final_phase() {
    let mut encounter = start("he_boss");
    let keys = spawned_keys(&run_for(&mut encounter, 45_000));
    for pickup in keys {
        encounter.handle(ContactEvent::KeyCollected { pickup });
    }
    encounter.drain_signals();
    assert!(!encounter.shield().is_encrypted());

    // 500 -> 300 at full damage, ratio 0.6.
    let signals = strike(&mut encounter, 200.0);
    assert_eq!(phase_numbers(&signals), vec![2]);
    assert!(signals.contains(&EncounterSignal::ShieldChanged { multiplier: 0.1 }));
    assert!(encounter.shield().is_encrypted());

    strike(&mut encounter, 100.0);
    assert_eq!(encounter.boss().health, 290.0);

    // 1500 at a tenth leaves 140, ratio 0.28. The keys already held break the seal again.
    let signals = strike(&mut encounter, 1500.0);
    assert_eq!(phase_numbers(&signals), vec![3]);
    assert!(messages(&signals).contains(&"Boss Decrypted! Now you can deal full damage!"));
    assert!(!encounter.shield().is_encrypted());

    strike(&mut encounter, 100.0);
    assert_eq!(encounter.boss().health, 40.0);
}

#[test]
fn test_aggressive_burst_fires_follow_up_shots() {
    let mut encounter = start("he_boss");
    strike(&mut encounter, 3400.0);
    run_for(&mut encounter, 1000);
    assert_eq!(encounter.phase_index(), 2);

    let mut fired = 0;
    let mut counts = Vec::new();
    for millis in [2000, 1500, 500] {
        fired += projectile_speeds(&run_for(&mut encounter, millis)).len();
        counts.push(fired);
    }
    // First shot at 2s, four follow-ups every 500ms, then the next burst at 4s.
    assert_eq!(counts, vec![1, 4, 6]);
}

#[test]
fn test_computation_pulse_in_second_phase() {
    let mut encounter = start("he_boss");
    strike(&mut encounter, 1800.0);

    let signals = run_for(&mut encounter, 4000);
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, EncounterSignal::ComputationPulse { .. }))
    );
    assert!(messages(&signals).contains(&"Performing Encrypted Computation!"));
}

// -----------------------------------------------------------------------------
// Player damage
// -----------------------------------------------------------------------------

#[test]
fn test_player_is_invincible_after_a_hit() {
    let mut encounter = start("smc_boss");

    encounter.handle(projectile_hit());
    let signals = encounter.drain_signals();
    assert!(signals.contains(&EncounterSignal::PlayerKnockback {
        impulse: Vec2::new(-100.0, -100.0)
    }));
    assert!(signals.contains(&EncounterSignal::PlayerHealthChanged { hearts: 4 }));
    assert!(signals.contains(&EncounterSignal::PlayerInvincible { active: true }));

    encounter.handle(projectile_hit());
    assert!(encounter.drain_signals().is_empty());
    assert_eq!(encounter.player().hearts(), 4);

    let signals = run_for(&mut encounter, 1000);
    assert!(signals.contains(&EncounterSignal::PlayerInvincible { active: false }));
    encounter.handle(projectile_hit());
    assert_eq!(encounter.player().hearts(), 3);
}

#[test]
fn test_player_defeat_resolves_once() {
    let mut encounter = start("smc_boss");
    let mut signals = Vec::new();
    for _ in 0..5 {
        encounter.handle(projectile_hit());
        signals.extend(encounter.drain_signals());
        signals.extend(run_for(&mut encounter, 1000));
    }

    assert_eq!(resolutions(&signals), vec![EncounterOutcome::PlayerDefeated]);
    assert_eq!(encounter.outcome(), EncounterOutcome::PlayerDefeated);
    assert!(!encounter.is_live());
    assert_eq!(encounter.timer_count(), 0);

    let snapshot = signals.iter().find_map(|s| match s {
        EncounterSignal::Resolved { snapshot, .. } => Some(snapshot.clone()),
        _ => None,
    });
    assert_eq!(snapshot.map(|s| s.health), Some(0.0));

    encounter.handle(projectile_hit());
    strike(&mut encounter, 5000.0);
    assert!(encounter.drain_signals().is_empty());
    assert_eq!(encounter.outcome(), EncounterOutcome::PlayerDefeated);
}

#[test]
fn test_laser_only_hurts_while_the_beam_is_on() {
    let mut encounter = start("fl_boss");
    strike(&mut encounter, 240.0);
    run_for(&mut encounter, 1000);
    assert_eq!(encounter.phase_index(), 2);

    let signals = run_for(&mut encounter, 2000);
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, EncounterSignal::LaserCharging { .. }))
    );
    assert!(!encounter.beam_active());
    encounter.handle(ContactEvent::LaserHitPlayer);
    assert_eq!(encounter.player().hearts(), 5);

    let signals = run_for(&mut encounter, 1000);
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, EncounterSignal::LaserActive { .. }))
    );
    assert!(encounter.beam_active());
    encounter.handle(ContactEvent::LaserHitPlayer);
    assert_eq!(encounter.player().hearts(), 4);
    assert!(
        encounter
            .drain_signals()
            .contains(&EncounterSignal::PlayerKnockback {
                impulse: Vec2::new(-200.0, 0.0)
            })
    );
}

// -----------------------------------------------------------------------------
// Minions
// -----------------------------------------------------------------------------

#[test]
fn test_defeated_cipher_minion_drops_a_key() {
    let mut encounter = start("he_boss");
    let minions = spawned_minions(&run_for(&mut encounter, 3000));
    assert_eq!(minions.len(), 1);

    let position = Vec2::new(300.0, 400.0);
    encounter.handle(ContactEvent::PlayerAttackHitMinion {
        minion: minions[0],
        source: AttackSource::Blast,
        position,
    });
    let signals = encounter.drain_signals();
    assert!(signals.contains(&EncounterSignal::Despawn(EncounterEntity::Minion(minions[0]))));
    let key = signals.iter().find_map(|s| match s {
        EncounterSignal::Spawn(request) => match request.kind {
            SpawnKind::DecryptionKey { .. } => Some(request.position),
            _ => None,
        },
        _ => None,
    });
    assert_eq!(key, Some(position));
    assert_eq!(
        encounter.mechanics().keys.as_ref().map(|k| k.outstanding),
        Some(1)
    );
}

#[test]
fn test_minion_report_teaches_new_behavior() {
    let mut encounter = start("fl_boss");
    let first = spawned_minions(&run_for(&mut encounter, 4000));
    assert_eq!(first.len(), 2);

    // Unreported minions are ignored.
    encounter.handle(ContactEvent::MinionReachedBoss { minion: first[0] });
    assert_eq!(encounter.minion_count(), 2);

    let signals = run_for(&mut encounter, 6000);
    for minion in &first {
        assert!(signals.contains(&EncounterSignal::MinionReturning(*minion)));
    }

    let mut signals = Vec::new();
    for minion in &first {
        encounter.handle(ContactEvent::MinionReachedBoss { minion: *minion });
        signals.extend(encounter.drain_signals());
    }
    assert!(messages(&signals).contains(&"The boss has learned to shoot projectiles!"));
    assert!(
        signals
            .iter()
            .any(|s| matches!(s, EncounterSignal::BehaviorsLearned { behaviors } if behaviors.contains(&BehaviorTag::ShootProjectiles)))
    );
    assert!(
        encounter
            .active_behaviors()
            .contains(&BehaviorTag::ShootProjectiles)
    );
    assert_eq!(encounter.phase_index(), 0);

    let speeds = projectile_speeds(&run_for(&mut encounter, 2000));
    assert_eq!(speeds, vec![300.0]);
}

// -----------------------------------------------------------------------------
// Carrier network
// -----------------------------------------------------------------------------

#[test]
fn test_second_package_waits_until_the_first_is_delivered() {
    let mut encounter = start("smc_boss");
    let packages = spawned_packages(&run_for(&mut encounter, 10_000));
    assert_eq!(packages.len(), 2);

    encounter.handle(ContactEvent::PackageCollected {
        pickup: packages[0],
    });
    encounter.drain_signals();

    encounter.handle(ContactEvent::PackageCollected {
        pickup: packages[1],
    });
    assert!(encounter.drain_signals().is_empty());
    assert!(encounter.player().carrying_package);

    encounter.handle(ContactEvent::PackageDelivered { carrier: 0 });
    encounter.handle(ContactEvent::PackageCollected {
        pickup: packages[1],
    });
    let signals = encounter.drain_signals();
    assert!(signals.contains(&EncounterSignal::Despawn(EncounterEntity::Pickup(packages[1]))));
    assert!(messages(&signals).contains(&"Package collected!"));
    assert!(encounter.player().carrying_package);
}

#[test]
fn test_four_deliveries_fire_one_combined_attack() {
    let mut encounter = start("smc_boss");
    let mut signals = Vec::new();

    for carrier in 0..4 {
        let packages = spawned_packages(&run_for(&mut encounter, 5000));
        assert_eq!(packages.len(), 1);
        encounter.handle(ContactEvent::PackageCollected {
            pickup: packages[0],
        });
        assert!(encounter.player().carrying_package);
        encounter.handle(ContactEvent::PackageDelivered { carrier });
        signals.extend(encounter.drain_signals());
    }

    assert!(signals.contains(&EncounterSignal::CarrierLoaded {
        carrier: 3,
        loaded: true
    }));
    assert!(messages(&signals).contains(&"All parties ready! Combined attack incoming!"));
    assert_eq!(encounter.boss().health, 1500.0);

    let mut after = run_for(&mut encounter, 1000);
    after.extend(run_for(&mut encounter, 10_000));
    let combos: Vec<f32> = after
        .iter()
        .filter_map(|s| match s {
            EncounterSignal::CombinedAttack { damage } => Some(*damage),
            _ => None,
        })
        .collect();
    assert_eq!(combos, vec![500.0]);
    assert_eq!(encounter.boss().health, 1000.0);
    assert_eq!(encounter.phase_index(), 0);
    assert_eq!(
        encounter.mechanics().carriers.as_ref().map(|c| c.loaded_count()),
        Some(0)
    );
}

#[test]
fn test_delivery_needs_a_package_and_an_empty_carrier() {
    let mut encounter = start("smc_boss");

    encounter.handle(ContactEvent::PackageDelivered { carrier: 0 });
    assert!(
        messages(&encounter.drain_signals()).contains(&"You have no package to deliver!")
    );

    for _ in 0..2 {
        let packages = spawned_packages(&run_for(&mut encounter, 5000));
        encounter.handle(ContactEvent::PackageCollected {
            pickup: packages[0],
        });
        encounter.handle(ContactEvent::PackageDelivered { carrier: 0 });
    }
    let signals = encounter.drain_signals();
    assert!(messages(&signals).contains(&"This friendly already has a package!"));
    assert!(encounter.player().carrying_package);

    encounter.handle(ContactEvent::PackageDelivered { carrier: 1 });
    assert!(!encounter.player().carrying_package);
    assert_eq!(
        encounter.mechanics().carriers.as_ref().map(|c| c.loaded_count()),
        Some(2)
    );
}

// -----------------------------------------------------------------------------
// Resolution and teardown
// -----------------------------------------------------------------------------

#[test]
fn test_victory_clears_the_arena_and_stops_timers() {
    let mut encounter = start("he_boss");
    let minions = spawned_minions(&run_for(&mut encounter, 3000));
    assert_eq!(minions.len(), 1);

    let signals = strike(&mut encounter, 10_000.0);
    assert!(signals.contains(&EncounterSignal::BossHealthChanged { ratio: 0.0 }));
    assert!(signals.contains(&EncounterSignal::Despawn(EncounterEntity::Minion(minions[0]))));
    assert!(signals.contains(&EncounterSignal::ArenaCleared));
    assert_eq!(resolutions(&signals), vec![EncounterOutcome::PlayerVictory]);

    assert_eq!(encounter.outcome(), EncounterOutcome::PlayerVictory);
    assert_eq!(encounter.timer_count(), 0);
    assert_eq!(encounter.minion_count(), 0);
    assert!(!encounter.is_live());

    assert!(run_for(&mut encounter, 20_000).is_empty());
    assert!(strike(&mut encounter, 10_000.0).is_empty());
    assert_eq!(encounter.boss().health, 0.0);
}

#[test]
fn test_teardown_runs_once_without_an_outcome() {
    let mut encounter = start("smc_boss");
    run_for(&mut encounter, 5000);
    encounter.drain_signals();

    encounter.teardown();
    let signals = encounter.drain_signals();
    assert!(signals.contains(&EncounterSignal::ArenaCleared));
    assert!(resolutions(&signals).is_empty());
    assert_eq!(encounter.outcome(), EncounterOutcome::Pending);
    assert_eq!(encounter.timer_count(), 0);

    encounter.teardown();
    assert!(encounter.drain_signals().is_empty());
    encounter.handle(ContactEvent::PackageDelivered { carrier: 0 });
    assert!(encounter.drain_signals().is_empty());
}

// -----------------------------------------------------------------------------
// Player progression
// -----------------------------------------------------------------------------

#[test]
fn test_skill_cooldowns_tick_with_the_encounter() {
    let mut encounter = start("smc_boss");
    encounter
        .player_mut()
        .start_cooldown(PrivacySkill::DifferentialPrivacy, 1.5);

    run_for(&mut encounter, 1000);
    let remaining = encounter
        .player()
        .cooldown(PrivacySkill::DifferentialPrivacy);
    assert!((remaining - 0.5).abs() < 1e-3, "remaining {remaining}");

    run_for(&mut encounter, 1100);
    assert_eq!(
        encounter
            .player()
            .cooldown(PrivacySkill::DifferentialPrivacy),
        0.0
    );
    assert!(encounter.player().skill_cooldowns.is_empty());
}

#[test]
fn test_snapshot_carries_upgrades_as_json() {
    let mut encounter = start("dp_boss");
    let player = encounter.player_mut();
    assert_eq!(player.upgrade_weapon(0.6), 2);
    assert!(player.unlock_skill(PrivacySkill::PolymorphicEncryption));
    assert!(!player.unlock_skill(PrivacySkill::PolymorphicEncryption));

    let snapshot = encounter.player().snapshot();
    assert_eq!(snapshot.weapon_level, 3);
    assert_eq!(snapshot.attack_power, 3.0);

    let json = snapshot.to_json().expect("snapshot serializes");
    assert!(json.contains("\"weapon_level\":3"));
    let restored: PlayerSnapshot = serde_json::from_str(&json).expect("snapshot parses");
    assert_eq!(restored, snapshot);
}

#[test]
fn test_skills_need_unlocking_and_recharge() {
    let mut encounter = start("smc_boss");
    assert!(
        encounter
            .player()
            .unlocked_skills
            .contains(&PrivacySkill::HomomorphicEncryption)
    );

    assert_eq!(
        encounter.activate_skill(PrivacySkill::HomomorphicEncryption),
        Ok(AttackSource::Blast)
    );
    assert!(matches!(
        encounter.activate_skill(PrivacySkill::HomomorphicEncryption),
        Err(SkillRefusal::CoolingDown { .. })
    ));
    assert_eq!(
        encounter.activate_skill(PrivacySkill::FederatedLearning),
        Err(SkillRefusal::Locked(PrivacySkill::FederatedLearning))
    );

    encounter
        .player_mut()
        .unlock_skill(PrivacySkill::DifferentialPrivacy);
    assert_eq!(
        encounter.activate_skill(PrivacySkill::DifferentialPrivacy),
        Err(SkillRefusal::NoArenaEffect(PrivacySkill::DifferentialPrivacy))
    );

    run_for(&mut encounter, 3100);
    assert_eq!(
        encounter.activate_skill(PrivacySkill::HomomorphicEncryption),
        Ok(AttackSource::Blast)
    );
}

#[test]
fn test_victory_grants_the_boss_reward() {
    let mut encounter = start("fl_boss");
    let signals = strike(&mut encounter, 10_000.0);

    assert!(messages(&signals).contains(&"New privacy skill: Federated Learning!"));
    let snapshot = signals.iter().find_map(|s| match s {
        EncounterSignal::Resolved { snapshot, .. } => Some(snapshot.clone()),
        _ => None,
    });
    let snapshot = snapshot.expect("victory carries a snapshot");
    assert!(
        snapshot
            .unlocked_skills
            .contains(&PrivacySkill::FederatedLearning)
    );
    assert_eq!(snapshot.weapon_level, 2);
    assert_eq!(snapshot.attack_power, 10_001.0);

    assert_eq!(
        encounter.activate_skill(PrivacySkill::FederatedLearning),
        Err(SkillRefusal::EncounterClosed)
    );
}

#[test]
fn test_defeat_grants_nothing() {
    let mut encounter = start("fl_boss");
    let mut signals = Vec::new();
    for _ in 0..5 {
        encounter.handle(projectile_hit());
        signals.extend(encounter.drain_signals());
        signals.extend(run_for(&mut encounter, 1000));
    }
    let snapshot = signals.iter().find_map(|s| match s {
        EncounterSignal::Resolved { snapshot, .. } => Some(snapshot.clone()),
        _ => None,
    });
    let snapshot = snapshot.expect("defeat carries a snapshot");
    assert!(
        !snapshot
            .unlocked_skills
            .contains(&PrivacySkill::FederatedLearning)
    );
    assert_eq!(snapshot.weapon_level, 1);
}

#[test]
fn test_projectiles_aim_at_the_player() {
    let mut encounter = start("dp_boss");
    let positions = ArenaPositions {
        player: Vec2::new(100.0, 550.0),
        boss: Vec2::new(600.0, 300.0),
    };
    let mut signals = Vec::new();
    for _ in 0..30 {
        encounter.advance(STEP, positions);
        signals.extend(encounter.drain_signals());
    }

    let request = signals.iter().find_map(|s| match s {
        EncounterSignal::Spawn(request) => Some(*request),
        _ => None,
    });
    let request = request.expect("a projectile was fired");
    assert_eq!(
        request.kind,
        SpawnKind::Projectile {
            pattern: ProjectilePattern::Aimed,
            speed: 400.0
        }
    );
    assert_eq!(request.position, positions.boss);
    assert_eq!(request.target, positions.player);
}
