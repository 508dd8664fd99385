//! Bosses domain: turns the active phase's behaviors into timed attack commands.

use std::time::Duration;

use bevy::prelude::*;

use super::behavior::BehaviorTag;
use super::phase::Phase;
use super::timers::{TimerId, TimerRegistry};

/// Everything an encounter can schedule. The scheduler handles the first four; the rest belong
/// to the encounter's own mechanics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerAction {
    Behavior(BehaviorTag),
    BurstShot,
    LaserFire,
    LaserEnd,
    EndInvincibility,
    SpawnKey,
    SpawnPackage,
    CombinedAttack,
    PhaseRecheck,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectilePattern {
    /// Straight at the player's position at fire time.
    Aimed,
    /// Aimed, then rotated by the given degrees.
    Angled(f32),
    /// Re-aims at the player every frame.
    Homing,
}

/// A fire-and-forget action for the encounter to carry out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackCommand {
    FireProjectile(ProjectilePattern),
    SummonMinions,
    LaserTelegraph,
    LaserOn { duration: Duration },
    LaserOff,
    ComputationPulse,
    Reposition,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackTimings {
    pub laser_telegraph: Duration,
    pub laser_duration: Duration,
    pub burst_count: u32,
    pub burst_spacing: Duration,
    pub spread_angles: Vec<f32>,
}

impl Default for AttackTimings {
    fn default() -> Self {
        Self {
            laser_telegraph: Duration::from_millis(1000),
            laser_duration: Duration::from_millis(2000),
            burst_count: 5,
            burst_spacing: Duration::from_millis(500),
            spread_angles: vec![-30.0, 0.0, 30.0],
        }
    }
}

/// Owns the timers of the current phase, including follow-ups such as laser and burst steps.
#[derive(Debug)]
pub struct AttackScheduler {
    timings: AttackTimings,
    handles: Vec<TimerId>,
    behaviors: Vec<BehaviorTag>,
    beams_active: u32,
    active: bool,
}

impl AttackScheduler {
    pub fn new(timings: AttackTimings) -> Self {
        Self {
            timings,
            handles: Vec::new(),
            behaviors: Vec::new(),
            beams_active: 0,
            active: false,
        }
    }

    /// Replaces whatever is running with one repeating timer per behavior of `phase`, plus any
    /// `extra` behaviors the boss picked up outside the phase table.
    pub fn activate(
        &mut self,
        timers: &mut TimerRegistry<TimerAction>,
        phase: &Phase,
        extra: &[BehaviorTag],
    ) {
        self.deactivate(timers);

        for &tag in phase.behaviors.iter().chain(extra) {
            if self.behaviors.contains(&tag) {
                continue;
            }
            let id = timers.schedule_repeating(phase.cadence(tag), TimerAction::Behavior(tag));
            self.handles.push(id);
            self.behaviors.push(tag);
        }
        self.active = true;

        debug!(
            "Scheduler active for phase {} with {:?}",
            phase.number(),
            self.behaviors
        );
    }

    /// Cancels every timer this scheduler owns. Safe to call repeatedly.
    pub fn deactivate(&mut self, timers: &mut TimerRegistry<TimerAction>) -> usize {
        let cancelled = self
            .handles
            .drain(..)
            .filter(|id| timers.cancel(*id))
            .count();
        self.behaviors.clear();
        self.beams_active = 0;
        self.active = false;
        cancelled
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn behaviors(&self) -> &[BehaviorTag] {
        &self.behaviors
    }

    pub fn beam_active(&self) -> bool {
        self.beams_active > 0
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    /// Expands a fired action into commands, scheduling any follow-up steps it needs.
    pub fn dispatch(
        &mut self,
        timers: &mut TimerRegistry<TimerAction>,
        action: TimerAction,
    ) -> Vec<AttackCommand> {
        if !self.active {
            return Vec::new();
        }
        self.handles.retain(|id| timers.contains(*id));

        match action {
            TimerAction::Behavior(tag) => self.dispatch_behavior(timers, tag),
            TimerAction::BurstShot => vec![AttackCommand::FireProjectile(ProjectilePattern::Aimed)],
            TimerAction::LaserFire => {
                let duration = self.timings.laser_duration;
                self.follow_up(timers, duration, TimerAction::LaserEnd);
                self.beams_active += 1;
                vec![AttackCommand::LaserOn { duration }]
            }
            TimerAction::LaserEnd => {
                self.beams_active = self.beams_active.saturating_sub(1);
                // Beams can overlap; the zone stays until the last one ends.
                if self.beams_active == 0 {
                    vec![AttackCommand::LaserOff]
                } else {
                    Vec::new()
                }
            }
            TimerAction::EndInvincibility
            | TimerAction::SpawnKey
            | TimerAction::SpawnPackage
            | TimerAction::CombinedAttack
            | TimerAction::PhaseRecheck => Vec::new(),
        }
    }

    fn dispatch_behavior(
        &mut self,
        timers: &mut TimerRegistry<TimerAction>,
        tag: BehaviorTag,
    ) -> Vec<AttackCommand> {
        match tag {
            BehaviorTag::ShootProjectiles => {
                vec![AttackCommand::FireProjectile(ProjectilePattern::Aimed)]
            }
            BehaviorTag::SpreadShot => self
                .timings
                .spread_angles
                .iter()
                .map(|angle| AttackCommand::FireProjectile(ProjectilePattern::Angled(*angle)))
                .collect(),
            BehaviorTag::HomingProjectile => {
                vec![AttackCommand::FireProjectile(ProjectilePattern::Homing)]
            }
            BehaviorTag::SummonMinions => vec![AttackCommand::SummonMinions],
            BehaviorTag::LaserBeam => {
                let delay = self.timings.laser_telegraph;
                self.follow_up(timers, delay, TimerAction::LaserFire);
                vec![AttackCommand::LaserTelegraph]
            }
            BehaviorTag::AggressiveAttack => {
                if self.timings.burst_count == 0 {
                    return Vec::new();
                }
                for shot in 1..self.timings.burst_count {
                    let delay = self.timings.burst_spacing * shot;
                    self.follow_up(timers, delay, TimerAction::BurstShot);
                }
                vec![AttackCommand::FireProjectile(ProjectilePattern::Aimed)]
            }
            BehaviorTag::EncryptedComputation => vec![AttackCommand::ComputationPulse],
            BehaviorTag::Reposition => vec![AttackCommand::Reposition],
        }
    }

    fn follow_up(
        &mut self,
        timers: &mut TimerRegistry<TimerAction>,
        delay: Duration,
        action: TimerAction,
    ) {
        let id = timers.schedule_once(delay, action);
        self.handles.push(id);
    }
}
