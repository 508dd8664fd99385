//! Bosses domain: behavior tags, phase machine, attack scheduling and minions.

mod behavior;
mod minion;
mod phase;
mod profile;
mod scheduler;
mod timers;

pub use behavior::{BehaviorTag, UnknownBehaviorTag};
pub use minion::{Minion, MinionHit, MinionId, MinionProfile, MinionRoster};
pub use phase::{Phase, PhaseController, PhaseTable, PhaseTableError};
pub use profile::{ArenaLayout, BossProfile, Lesson, Mechanic, ProfileError};
pub use scheduler::{AttackCommand, AttackScheduler, AttackTimings, ProjectilePattern, TimerAction};
pub use timers::{TimerId, TimerRegistry};
