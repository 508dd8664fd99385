//! Combat domain: combatants, knockback and damage mitigation.

mod components;
mod mitigation;
#[cfg(test)]
mod tests;

pub use components::{Combatant, DamageOutcome, MAX_KNOCKBACK_VELOCITY, knockback_away};
pub use mitigation::{ShieldState, effective_damage, sanitize_damage};
