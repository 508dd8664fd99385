//! Combat domain: unit tests for combatants and mitigation.

use bevy::prelude::*;

use super::{
    Combatant, DamageOutcome, MAX_KNOCKBACK_VELOCITY, ShieldState, effective_damage,
    knockback_away, sanitize_damage,
};

#[test]
fn test_combatant_damage_and_defeat() {
    let mut boss = Combatant::new(500.0, 1.0);
    assert_eq!(boss.apply_damage(160.0), DamageOutcome::Applied(160.0));
    assert_eq!(boss.health, 340.0);
    assert!(!boss.is_defeated());

    assert_eq!(boss.apply_damage(400.0), DamageOutcome::Defeated(340.0));
    assert_eq!(boss.health, 0.0);
    assert!(boss.is_defeated());
}

#[test]
fn test_defeat_is_reported_once() {
    let mut minion = Combatant::new(3.0, 1.0);
    assert!(matches!(minion.apply_damage(5.0), DamageOutcome::Defeated(_)));

    for _ in 0..10 {
        assert_eq!(minion.apply_damage(1.0), DamageOutcome::Ignored);
    }
    assert!(minion.is_defeated());
    assert_eq!(minion.health, 0.0);
}

#[test]
fn test_zero_and_invalid_damage_are_noops() {
    let mut player = Combatant::new(5.0, 1.0);
    assert_eq!(player.apply_damage(0.0), DamageOutcome::Applied(0.0));
    assert_eq!(player.apply_damage(-3.0), DamageOutcome::Applied(0.0));
    assert_eq!(player.apply_damage(f32::NAN), DamageOutcome::Applied(0.0));
    assert_eq!(player.health, 5.0);
}

#[test]
fn test_heal_is_capped_and_ignored_after_defeat() {
    let mut boss = Combatant::new(500.0, 1.0);
    boss.apply_damage(10.0);
    assert_eq!(boss.heal(20.0), 10.0);
    assert_eq!(boss.health, 500.0);

    boss.apply_damage(500.0);
    assert_eq!(boss.heal(20.0), 0.0);
    assert!(boss.is_defeated());
}

#[test]
fn test_restored_combatant_is_clamped() {
    let restored = Combatant::with_health(9.0, 5.0, 2.0);
    assert_eq!(restored.health, 5.0);
    assert!(!restored.is_defeated());

    let empty = Combatant::with_health(0.0, 5.0, 1.0);
    assert!(empty.is_defeated());
    assert_eq!(empty.health_ratio(), 0.0);
}

#[test]
fn test_knockback_scales_with_distance() {
    let impulse = knockback_away(Vec2::new(120.0, 0.0), Vec2::new(100.0, 50.0), 2.0, -200.0);
    assert_eq!(impulse, Vec2::new(40.0, -200.0));

    let far = knockback_away(Vec2::new(-2000.0, 0.0), Vec2::ZERO, 2.0, -100.0);
    assert_eq!(far.x, -MAX_KNOCKBACK_VELOCITY);
}

#[test]
fn test_encrypted_boss_takes_tenth_then_full_after_decryption() {
    let mut shield = ShieldState::Encrypted {
        encrypted: true,
        multiplier: 0.1,
    };
    assert!((effective_damage(100.0, &shield) - 10.0).abs() < 1e-4);

    assert!(shield.set_encrypted(false));
    assert_eq!(effective_damage(100.0, &shield), 100.0);
}

#[test]
fn test_full_continuous_shield_blocks_everything() {
    let shield = ShieldState::Continuous { strength: 1.0 };
    for raw in [0.0, 1.0, 3.0, 250.0] {
        assert_eq!(effective_damage(raw, &shield), 0.0);
    }
}

#[test]
fn test_continuous_strength_is_clamped() {
    let mut shield = ShieldState::Continuous { strength: 0.0 };
    assert!(shield.set_strength(1.7));
    assert_eq!(shield, ShieldState::Continuous { strength: 1.0 });
    assert!(shield.set_strength(-0.5));
    assert_eq!(effective_damage(10.0, &shield), 10.0);
    assert!(!shield.set_strength(f32::NAN));

    let unclamped = ShieldState::Continuous { strength: 2.0 };
    assert_eq!(effective_damage(10.0, &unclamped), 0.0);
}

#[test]
fn test_shield_setters_respect_variant() {
    let mut none = ShieldState::None;
    assert!(!none.set_strength(0.5));
    assert!(!none.set_encrypted(true));
    assert!(!none.set_active_minions(2));
    assert_eq!(none, ShieldState::None);
}

#[test]
fn test_minion_gated_shield() {
    let mut shield = ShieldState::MinionGated { active_minions: 2 };
    assert!(shield.is_shielded());
    assert_eq!(effective_damage(5.0, &shield), 0.0);

    shield.set_active_minions(0);
    assert!(!shield.is_shielded());
    assert_eq!(effective_damage(5.0, &shield), 5.0);
}

#[test]
fn test_mitigation_bounds() {
    let shields = [
        ShieldState::None,
        ShieldState::Continuous { strength: 0.0 },
        ShieldState::Continuous { strength: 0.35 },
        ShieldState::Continuous { strength: 1.0 },
        ShieldState::Encrypted {
            encrypted: true,
            multiplier: 0.1,
        },
        ShieldState::Encrypted {
            encrypted: false,
            multiplier: 0.1,
        },
        ShieldState::MinionGated { active_minions: 0 },
        ShieldState::MinionGated { active_minions: 4 },
    ];

    for shield in &shields {
        for raw in [0.0_f32, 0.2, 1.0, 3.0, 5.0, 100.0, 500.0] {
            let effective = effective_damage(raw, shield);
            assert!(effective >= 0.0, "{shield:?} produced negative damage");
            assert!(effective <= raw, "{shield:?} amplified {raw}");
        }
    }
}

#[test]
fn test_invalid_raw_damage_is_rejected() {
    assert_eq!(sanitize_damage(-1.0), 0.0);
    assert_eq!(sanitize_damage(f32::NAN), 0.0);
    assert_eq!(sanitize_damage(f32::INFINITY), 0.0);
    assert_eq!(effective_damage(-50.0, &ShieldState::None), 0.0);
    assert_eq!(effective_damage(f32::NAN, &ShieldState::None), 0.0);
}
