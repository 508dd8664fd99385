//! Encounter domain: one boss fight from start to resolved outcome.
//!
//! The [`Encounter`] owns every piece of mutable fight state. Contacts come in through
//! [`Encounter::handle`], time through [`Encounter::advance`], and everything the outside world
//! should react to is queued as [`EncounterSignal`]s.

use std::collections::BTreeMap;
use std::time::Duration;

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::bosses::{
    AttackCommand, AttackScheduler, AttackTimings, BehaviorTag, BossProfile, Mechanic, MinionHit,
    MinionId, MinionRoster, Phase, PhaseController, TimerAction, TimerId, TimerRegistry,
};
use crate::combat::{
    Combatant, DamageOutcome, ShieldState, effective_damage, knockback_away, sanitize_damage,
};
use crate::content::{EncounterTuning, PrivacySkill};

use super::mechanics::{BossMechanics, Delivery};
use super::player::{PlayerSnapshot, PlayerState, SkillRefusal};
use super::signals::{
    AttackSource, ContactEvent, EncounterEntity, EncounterOutcome, EncounterSignal, PickupId,
    SpawnKind, SpawnRequest,
};

const DEFAULT_MOVE_SPEED: f32 = 100.0;
/// Horizontal jitter around a platform when placing a decryption key.
const KEY_JITTER: f32 = 50.0;
/// Keys appear this far above the platform surface (arena y grows downward).
const KEY_LIFT: f32 = 50.0;

/// Where the two main bodies are, as last reported by the arena.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArenaPositions {
    pub player: Vec2,
    pub boss: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickupKind {
    Key,
    Package,
}

#[derive(Debug)]
pub struct Encounter {
    profile: BossProfile,
    tuning: EncounterTuning,
    boss: Combatant,
    shield: ShieldState,
    phases: PhaseController,
    timers: TimerRegistry<TimerAction>,
    scheduler: AttackScheduler,
    minions: MinionRoster,
    mechanics: BossMechanics,
    player: PlayerState,
    pickups: BTreeMap<PickupId, PickupKind>,
    next_pickup: u32,
    positions: ArenaPositions,
    patrol_index: usize,
    invincibility: Option<TimerId>,
    recheck: Option<TimerId>,
    outcome: EncounterOutcome,
    closed: bool,
    outbox: Vec<EncounterSignal>,
    rng: ChaCha8Rng,
}

impl Encounter {
    /// Builds the fight and enters its first phase.
    pub fn start(
        profile: BossProfile,
        tuning: EncounterTuning,
        player: &PlayerSnapshot,
        seed: u64,
    ) -> Self {
        let timings = AttackTimings {
            laser_telegraph: Duration::from_millis(tuning.laser_telegraph_ms),
            laser_duration: Duration::from_millis(tuning.laser_duration_ms),
            burst_count: tuning.burst_count,
            burst_spacing: Duration::from_millis(tuning.burst_spacing_ms),
            spread_angles: tuning.spread_angles.clone(),
        };

        let mut encounter = Self {
            boss: Combatant::new(profile.max_health, 1.0),
            shield: profile.shield,
            phases: PhaseController::new(profile.phases.clone()),
            timers: TimerRegistry::new(),
            scheduler: AttackScheduler::new(timings),
            minions: MinionRoster::default(),
            mechanics: BossMechanics::from_profile(&profile),
            player: PlayerState::from_snapshot(player),
            pickups: BTreeMap::new(),
            next_pickup: 0,
            positions: ArenaPositions::default(),
            patrol_index: 0,
            invincibility: None,
            recheck: None,
            outcome: EncounterOutcome::Pending,
            closed: false,
            outbox: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            profile,
            tuning,
        };
        encounter.begin();
        encounter
    }

    fn begin(&mut self) {
        info!(
            "Encounter started: {} ({} hp, {} phases)",
            self.profile.name,
            self.profile.max_health,
            self.profile.phases.len()
        );

        let first = self.phases.current().clone();
        self.enter_phase(&first);

        for mechanic in self.profile.mechanics.clone() {
            match mechanic {
                Mechanic::DecryptionKeys { spawn_interval, .. } => {
                    self.timers
                        .schedule_repeating(spawn_interval, TimerAction::SpawnKey);
                }
                Mechanic::CarrierNetwork {
                    package_interval, ..
                } => {
                    self.timers
                        .schedule_repeating(package_interval, TimerAction::SpawnPackage);
                }
                Mechanic::DataAggregation { .. } => {}
            }
        }

        self.outbox.push(EncounterSignal::BossHealthChanged {
            ratio: self.boss.health_ratio(),
        });
        self.outbox.push(EncounterSignal::PlayerHealthChanged {
            hearts: self.player.hearts(),
        });
        self.outbox.push(EncounterSignal::ShieldChanged {
            multiplier: self.shield.multiplier(),
        });
    }

    pub fn profile(&self) -> &BossProfile {
        &self.profile
    }

    pub fn outcome(&self) -> EncounterOutcome {
        self.outcome
    }

    /// True until the fight resolves or is torn down.
    pub fn is_live(&self) -> bool {
        !self.closed
    }

    pub fn boss(&self) -> &Combatant {
        &self.boss
    }

    pub fn shield(&self) -> &ShieldState {
        &self.shield
    }

    pub fn phase(&self) -> &Phase {
        self.phases.current()
    }

    pub fn phase_index(&self) -> usize {
        self.phases.index()
    }

    pub fn active_behaviors(&self) -> &[BehaviorTag] {
        self.scheduler.behaviors()
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerState {
        &mut self.player
    }

    pub fn mechanics(&self) -> &BossMechanics {
        &self.mechanics
    }

    pub fn minion_count(&self) -> u32 {
        self.minions.active_count()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn beam_active(&self) -> bool {
        self.scheduler.beam_active()
    }

    pub fn drain_signals(&mut self) -> Vec<EncounterSignal> {
        std::mem::take(&mut self.outbox)
    }

    /// Routes one contact into the fight. Ignored once the encounter is closed.
    pub fn handle(&mut self, event: ContactEvent) {
        if self.closed {
            debug!("Ignoring {:?} after encounter closed", event);
            return;
        }

        match event {
            ContactEvent::PlayerAttackHitBoss { source } => {
                let raw = self.raw_damage(source) * self.profile.damage_scale;
                self.strike_boss(raw);
            }
            ContactEvent::PlayerHitBoss { player, boss } => {
                let (scale, vertical) = self.tuning.boss_contact_knockback;
                self.hit_player(knockback_away(player, boss, scale, vertical));
            }
            ContactEvent::BossProjectileHitPlayer { player, projectile } => {
                let (scale, vertical) = self.tuning.projectile_knockback;
                self.hit_player(knockback_away(player, projectile, scale, vertical));
            }
            ContactEvent::LaserHitPlayer => {
                if self.scheduler.beam_active() {
                    self.hit_player(Vec2::from(self.tuning.laser_knockback));
                }
            }
            ContactEvent::MinionTouchedPlayer {
                minion,
                player,
                minion_pos,
            } => self.minion_contact(minion, player, minion_pos),
            ContactEvent::PlayerAttackHitMinion {
                minion,
                source,
                position,
            } => self.strike_minion(minion, source, position),
            ContactEvent::MinionReachedBoss { minion } => self.minion_report(minion),
            ContactEvent::KeyCollected { pickup } => self.collect_key(pickup),
            ContactEvent::PackageCollected { pickup } => self.collect_package(pickup),
            ContactEvent::PackageDelivered { carrier } => self.deliver_package(carrier),
            ContactEvent::ShieldSignal { strength } => self.set_shield_strength(strength),
        }
    }

    /// Moves the encounter clock forward and runs every action that came due.
    pub fn advance(&mut self, delta: Duration, positions: ArenaPositions) {
        if self.closed {
            return;
        }
        self.positions = positions;

        let secs = delta.as_secs_f32();
        self.player.tick_cooldowns(secs);
        if let Some(threshold) = self.profile.minions.as_ref().and_then(|m| m.report_after) {
            for id in self.minions.collect_data(secs, threshold) {
                self.outbox.push(EncounterSignal::MinionReturning(id));
            }
        }

        self.timers.advance(delta);
        while let Some((id, action)) = self.timers.pop_due() {
            self.run_action(id, action);
        }
    }

    /// Spends an unlocked skill and returns the strike the arena should release for it.
    pub fn activate_skill(&mut self, skill: PrivacySkill) -> Result<AttackSource, SkillRefusal> {
        if self.closed {
            return Err(SkillRefusal::EncounterClosed);
        }
        let (source, cooldown) = match skill {
            PrivacySkill::HomomorphicEncryption => {
                (AttackSource::Blast, self.tuning.blast_cooldown())
            }
            PrivacySkill::FederatedLearning => {
                (AttackSource::Helper, self.tuning.helper_cooldown())
            }
            PrivacySkill::DifferentialPrivacy | PrivacySkill::PolymorphicEncryption => {
                return Err(SkillRefusal::NoArenaEffect(skill));
            }
        };

        self.player.use_skill(skill, cooldown.as_secs_f32())?;
        debug!("Activated {:?} as {:?}", skill, source);
        Ok(source)
    }

    /// Cancels everything without producing an outcome, e.g. when the arena is unloaded.
    pub fn teardown(&mut self) {
        self.close();
    }

    fn raw_damage(&self, source: AttackSource) -> f32 {
        match source {
            AttackSource::Melee | AttackSource::Projectile => self.player.combatant.attack_power,
            AttackSource::Blast => self
                .profile
                .blast_damage
                .unwrap_or(self.tuning.blast_damage),
            AttackSource::Helper => self.tuning.helper_damage,
        }
    }

    fn strike_boss(&mut self, raw: f32) -> DamageOutcome {
        let effective = effective_damage(raw, &self.shield);
        let outcome = self.boss.apply_damage(effective);
        debug!(
            "{} took {} of {} raw damage ({} left)",
            self.profile.name,
            outcome.amount(),
            raw,
            self.boss.health
        );

        if self.shield.is_encrypted() && raw > 0.0 {
            self.message("Attack reduced by encryption!");
        }

        if let DamageOutcome::Defeated(_) = outcome {
            self.outbox
                .push(EncounterSignal::BossHealthChanged { ratio: 0.0 });
            self.resolve(EncounterOutcome::PlayerVictory);
            return outcome;
        }

        self.check_phase();
        self.outbox.push(EncounterSignal::BossHealthChanged {
            ratio: self.boss.health_ratio(),
        });
        outcome
    }

    fn check_phase(&mut self) {
        let ratio = self.boss.health_ratio();
        let Some(phase) = self.phases.check_transition(ratio).cloned() else {
            return;
        };
        self.enter_phase(&phase);

        if self.phases.transition_due(ratio) && self.recheck.is_none() {
            let delay = self.tuning.phase_recheck();
            self.recheck = Some(self.timers.schedule_once(delay, TimerAction::PhaseRecheck));
        }
    }

    fn enter_phase(&mut self, phase: &Phase) {
        info!("{} entered phase {}", self.profile.name, phase.number());
        self.reschedule();

        if !phase.announcement.is_empty() {
            let duration = self.tuning.announcement_duration();
            self.announce(phase.announcement.clone(), duration);
        }

        let layout = phase
            .layout
            .as_deref()
            .and_then(|id| self.profile.layout(id))
            .cloned();
        self.outbox.push(EncounterSignal::PhaseChanged {
            phase: phase.number(),
            behaviors: self.scheduler.behaviors().to_vec(),
            layout,
        });

        if phase.index > 0 && self.phases.is_final() {
            self.enter_final_phase();
        } else if self.mechanics.keys.is_some() {
            self.reencrypt();
        }
    }

    /// Every non-final phase of an encrypted boss starts sealed, whatever keys are held.
    fn reencrypt(&mut self) {
        if !self.shield.is_encrypted() && self.shield.set_encrypted(true) {
            info!("{} re-encrypted", self.profile.name);
            self.outbox.push(EncounterSignal::ShieldChanged {
                multiplier: self.shield.multiplier(),
            });
        }
    }

    /// Final-phase rule for encrypted bosses: enough keys break the encryption for good.
    fn enter_final_phase(&mut self) {
        let Some(keys) = &self.mechanics.keys else {
            return;
        };
        if keys.complete() {
            self.decrypt();
        } else if self.shield.is_encrypted() {
            self.message("Encryption Strengthened!");
        }
    }

    fn reschedule(&mut self) {
        let had_beam = self.scheduler.beam_active();
        let phase = self.phases.current().clone();
        let learned = self.mechanics.learned_behaviors();
        self.scheduler.activate(&mut self.timers, &phase, &learned);
        if had_beam {
            self.outbox.push(EncounterSignal::LaserExpired);
        }
    }

    fn hit_player(&mut self, impulse: Vec2) -> bool {
        if self.player.invincible {
            return false;
        }

        let outcome = self
            .player
            .combatant
            .apply_damage(self.tuning.player_hit_damage);
        self.outbox
            .push(EncounterSignal::PlayerKnockback { impulse });
        self.outbox.push(EncounterSignal::PlayerHealthChanged {
            hearts: self.player.hearts(),
        });

        if let DamageOutcome::Defeated(_) = outcome {
            self.resolve(EncounterOutcome::PlayerDefeated);
            return true;
        }

        self.player.invincible = true;
        self.outbox
            .push(EncounterSignal::PlayerInvincible { active: true });
        let window = self.tuning.invincibility();
        self.invincibility = Some(
            self.timers
                .schedule_once(window, TimerAction::EndInvincibility),
        );
        true
    }

    fn minion_contact(&mut self, minion: MinionId, player: Vec2, minion_pos: Vec2) {
        if self.minions.get(minion).is_none() {
            return;
        }
        let Some(profile) = self.profile.minions.clone() else {
            return;
        };

        let (scale, vertical) = self.tuning.projectile_knockback;
        if !self.hit_player(knockback_away(player, minion_pos, scale, vertical)) || self.closed {
            return;
        }

        if profile.heal_on_contact > 0.0 {
            let healed = self.boss.heal(profile.heal_on_contact);
            if healed > 0.0 {
                debug!("{} healed {} from a minion", self.profile.name, healed);
                self.outbox.push(EncounterSignal::BossHealthChanged {
                    ratio: self.boss.health_ratio(),
                });
            }
        }
        if profile.dies_on_contact {
            self.remove_minion(minion);
        }
    }

    fn strike_minion(&mut self, minion: MinionId, source: AttackSource, position: Vec2) {
        let raw = sanitize_damage(self.raw_damage(source));
        if let MinionHit::Defeated(_) = self.minions.damage(minion, raw) {
            self.outbox
                .push(EncounterSignal::Despawn(EncounterEntity::Minion(minion)));
            self.sync_minion_shield();

            if self
                .profile
                .minions
                .as_ref()
                .is_some_and(|profile| profile.drops_key)
            {
                self.spawn_key(position);
            }
        }
    }

    fn minion_report(&mut self, minion: MinionId) {
        let Some(data) = self
            .minions
            .get(minion)
            .filter(|m| m.returning)
            .map(|m| m.collected_data)
        else {
            return;
        };
        self.remove_minion(minion);

        let Some(aggregate) = self.mechanics.aggregate.as_mut() else {
            return;
        };
        let lessons = aggregate.absorb(data);
        debug!("Aggregated minion data now {}", aggregate.total);
        if lessons.is_empty() {
            return;
        }

        for lesson in &lessons {
            self.message(lesson.message.clone());
        }
        self.reschedule();
        self.outbox.push(EncounterSignal::BehaviorsLearned {
            behaviors: self.scheduler.behaviors().to_vec(),
        });
    }

    fn remove_minion(&mut self, minion: MinionId) {
        if self.minions.remove(minion).is_some() {
            self.outbox
                .push(EncounterSignal::Despawn(EncounterEntity::Minion(minion)));
            self.sync_minion_shield();
        }
    }

    fn sync_minion_shield(&mut self) {
        let before = self.shield.multiplier();
        if self.shield.set_active_minions(self.minions.active_count())
            && self.shield.multiplier() != before
        {
            self.outbox.push(EncounterSignal::ShieldChanged {
                multiplier: self.shield.multiplier(),
            });
        }
    }

    fn set_shield_strength(&mut self, strength: f32) {
        if self.shield.set_strength(strength) {
            debug!("Shield strength set to {}", strength);
            self.outbox.push(EncounterSignal::ShieldChanged {
                multiplier: self.shield.multiplier(),
            });
        } else {
            warn!(
                "Ignoring shield signal {} for {:?}",
                strength, self.shield
            );
        }
    }

    fn collect_key(&mut self, pickup: PickupId) {
        if self.pickups.get(&pickup) != Some(&PickupKind::Key) {
            return;
        }
        let Some(keys) = self.mechanics.keys.as_mut() else {
            return;
        };
        self.pickups.remove(&pickup);
        let collected = keys.collect();
        let required = keys.required;
        let complete = keys.complete();

        self.outbox
            .push(EncounterSignal::Despawn(EncounterEntity::Pickup(pickup)));
        self.message(format!(
            "Decryption Key Collected ({}/{})!",
            collected.min(required),
            required
        ));
        if complete {
            self.decrypt();
        }
    }

    fn decrypt(&mut self) {
        if self.shield.is_encrypted() && self.shield.set_encrypted(false) {
            info!("{} decrypted", self.profile.name);
            self.message("Boss Decrypted! Now you can deal full damage!");
            self.outbox.push(EncounterSignal::ShieldChanged {
                multiplier: self.shield.multiplier(),
            });
        }
    }

    fn collect_package(&mut self, pickup: PickupId) {
        if self.pickups.get(&pickup) != Some(&PickupKind::Package) || self.player.carrying_package
        {
            return;
        }
        self.pickups.remove(&pickup);
        self.player.carrying_package = true;
        self.outbox
            .push(EncounterSignal::Despawn(EncounterEntity::Pickup(pickup)));
        self.message("Package collected!");
    }

    fn deliver_package(&mut self, carrier: usize) {
        let Some(network) = self.mechanics.carriers.as_mut() else {
            return;
        };
        if !self.player.carrying_package {
            self.message("You have no package to deliver!");
            return;
        }

        match network.deliver(carrier) {
            Delivery::UnknownCarrier => warn!("Delivery to unknown carrier {}", carrier),
            Delivery::AlreadyLoaded => self.message("This friendly already has a package!"),
            Delivery::Loaded { all_loaded } => {
                let armed = all_loaded && network.arm_combo();
                let delay = network.combo_delay;
                self.player.carrying_package = false;
                self.outbox.push(EncounterSignal::CarrierLoaded {
                    carrier,
                    loaded: true,
                });
                self.message("Package delivered!");
                if armed {
                    self.timers
                        .schedule_once(delay, TimerAction::CombinedAttack);
                    self.message("All parties ready! Combined attack incoming!");
                }
            }
        }
    }

    fn fire_combined_attack(&mut self) {
        let Some(network) = self.mechanics.carriers.as_mut() else {
            return;
        };
        let Some(damage) = network.fire_combo() else {
            return;
        };
        let carriers = network.carriers();

        info!("Combined attack for {} damage", damage);
        self.outbox
            .push(EncounterSignal::CombinedAttack { damage });
        for carrier in 0..carriers {
            self.outbox.push(EncounterSignal::CarrierLoaded {
                carrier,
                loaded: false,
            });
        }
        self.strike_boss(damage);
    }

    fn run_action(&mut self, id: TimerId, action: TimerAction) {
        match action {
            TimerAction::EndInvincibility => {
                if self.invincibility == Some(id) {
                    self.invincibility = None;
                    self.player.invincible = false;
                    self.outbox
                        .push(EncounterSignal::PlayerInvincible { active: false });
                }
            }
            TimerAction::SpawnKey => self.spawn_periodic_key(),
            TimerAction::SpawnPackage => self.spawn_package(),
            TimerAction::CombinedAttack => self.fire_combined_attack(),
            TimerAction::PhaseRecheck => {
                self.recheck = None;
                self.check_phase();
            }
            TimerAction::Behavior(_)
            | TimerAction::BurstShot
            | TimerAction::LaserFire
            | TimerAction::LaserEnd => {
                for command in self.scheduler.dispatch(&mut self.timers, action) {
                    self.execute(command);
                }
            }
        }
    }

    fn execute(&mut self, command: AttackCommand) {
        let origin = self.positions.boss;
        match command {
            AttackCommand::FireProjectile(pattern) => {
                let speed = self.projectile_speed();
                self.spawn(SpawnKind::Projectile { pattern, speed }, origin);
            }
            AttackCommand::SummonMinions => self.summon_minions(),
            AttackCommand::LaserTelegraph => {
                self.outbox.push(EncounterSignal::LaserCharging { origin });
            }
            AttackCommand::LaserOn { duration } => {
                self.outbox
                    .push(EncounterSignal::LaserActive { origin, duration });
            }
            AttackCommand::LaserOff => self.outbox.push(EncounterSignal::LaserExpired),
            AttackCommand::ComputationPulse => {
                self.message("Performing Encrypted Computation!");
                self.outbox
                    .push(EncounterSignal::ComputationPulse { origin });
            }
            AttackCommand::Reposition => {
                if self.profile.patrol.is_empty() {
                    return;
                }
                let target = self.profile.patrol[self.patrol_index % self.profile.patrol.len()];
                self.patrol_index = (self.patrol_index + 1) % self.profile.patrol.len();
                let speed = self.phases.current().move_speed.unwrap_or(DEFAULT_MOVE_SPEED);
                self.outbox
                    .push(EncounterSignal::BossMoveTo { target, speed });
            }
        }
    }

    /// Continuous shields also speed up the boss's projectiles.
    fn projectile_speed(&self) -> f32 {
        match self.shield {
            ShieldState::Continuous { strength } => {
                self.profile.projectile_speed * (1.0 + strength.clamp(0.0, 1.0))
            }
            _ => self.profile.projectile_speed,
        }
    }

    fn summon_minions(&mut self) {
        let Some(profile) = self.profile.minions.clone() else {
            warn!("{} has no minion profile to summon", self.profile.name);
            return;
        };

        for _ in 0..profile.per_summon {
            let id = self.minions.spawn(&profile);
            let offset = if profile.spread > 0.0 {
                self.rng.random_range(-profile.spread..=profile.spread)
            } else {
                0.0
            };
            let position = self.positions.boss + Vec2::new(offset, 0.0);
            self.spawn(SpawnKind::Minion { id }, position);
        }
        debug!("{} minions active", self.minions.active_count());
        self.sync_minion_shield();
    }

    fn spawn_periodic_key(&mut self) {
        if !self
            .mechanics
            .keys
            .as_ref()
            .is_some_and(|keys| keys.can_spawn())
        {
            return;
        }

        let platform = self
            .phases
            .current()
            .layout
            .as_deref()
            .and_then(|id| self.profile.layout(id))
            .and_then(|layout| {
                let count = layout.platforms.len();
                (count > 0).then(|| layout.platforms[self.rng.random_range(0..count)])
            });
        let position = match platform {
            Some(platform) => {
                let jitter = self.rng.random_range(-KEY_JITTER..=KEY_JITTER);
                platform + Vec2::new(jitter, -KEY_LIFT)
            }
            None => self.positions.boss,
        };
        self.spawn_key(position);
    }

    fn spawn_key(&mut self, position: Vec2) {
        let Some(keys) = self.mechanics.keys.as_mut() else {
            return;
        };
        keys.spawned();
        let pickup = self.next_pickup_id();
        self.pickups.insert(pickup, PickupKind::Key);
        self.spawn(SpawnKind::DecryptionKey { pickup }, position);
    }

    fn spawn_package(&mut self) {
        let Some(network) = &self.mechanics.carriers else {
            return;
        };
        let (min_x, max_x) = network.drop_x;
        let drop_y = network.drop_y;
        let x = self.rng.random_range(min_x..=max_x);

        let pickup = self.next_pickup_id();
        self.pickups.insert(pickup, PickupKind::Package);
        self.spawn(SpawnKind::Package { pickup }, Vec2::new(x, drop_y));
    }

    fn next_pickup_id(&mut self) -> PickupId {
        let id = PickupId(self.next_pickup);
        self.next_pickup += 1;
        id
    }

    fn spawn(&mut self, kind: SpawnKind, position: Vec2) {
        self.outbox.push(EncounterSignal::Spawn(SpawnRequest {
            kind,
            position,
            target: self.positions.player,
        }));
    }

    fn message(&mut self, text: impl Into<String>) {
        let duration = self.tuning.message_duration();
        self.announce(text.into(), duration);
    }

    fn announce(&mut self, text: String, duration: Duration) {
        self.outbox
            .push(EncounterSignal::Message { text, duration });
    }

    fn resolve(&mut self, outcome: EncounterOutcome) {
        if self.outcome.is_terminal() {
            return;
        }
        self.outcome = outcome;
        self.close();
        if outcome == EncounterOutcome::PlayerVictory {
            self.grant_reward();
        }

        let snapshot = self.player.snapshot();
        info!("Encounter with {} resolved: {:?}", self.profile.name, outcome);
        match snapshot.to_json() {
            Ok(json) => debug!("Carried player state: {}", json),
            Err(e) => warn!("Could not render player snapshot: {}", e),
        }
        self.outbox
            .push(EncounterSignal::Resolved { outcome, snapshot });
    }

    fn grant_reward(&mut self) {
        if let Some(skill) = self.profile.reward_skill {
            if self.player.unlock_skill(skill) {
                info!("Unlocked {}", skill);
                self.message(format!("New privacy skill: {}!", skill));
            }
        }
        if self.profile.weapon_upgrade > 0.0 {
            let gain = self.player.upgrade_weapon(self.profile.weapon_upgrade);
            info!("Weapon upgraded by {} to level {}", gain, self.player.weapon_level);
            self.message(format!("Weapon upgraded to level {}!", self.player.weapon_level));
        }
    }

    /// Cancels every timer and removes every auxiliary entity. Runs once.
    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let had_beam = self.scheduler.beam_active();
        let scheduled = self.scheduler.deactivate(&mut self.timers);
        let other = self.timers.clear();
        debug!(
            "Encounter closed: cancelled {} attack timers and {} other timers",
            scheduled, other
        );
        if had_beam {
            self.outbox.push(EncounterSignal::LaserExpired);
        }

        for id in self.minions.drain() {
            self.outbox
                .push(EncounterSignal::Despawn(EncounterEntity::Minion(id)));
        }
        for pickup in std::mem::take(&mut self.pickups).into_keys() {
            self.outbox
                .push(EncounterSignal::Despawn(EncounterEntity::Pickup(pickup)));
        }

        self.player.invincible = false;
        self.player.carrying_package = false;
        self.invincibility = None;
        self.recheck = None;
        self.outbox.push(EncounterSignal::ArenaCleared);
    }
}
