//! Validation for boss definitions and their cross-references.

use crate::bosses::BossProfile;

use super::data::*;
use super::registry::BossRegistry;

/// A validation error with context about what failed.
#[derive(Debug)]
pub struct ValidationError {
    pub boss_id: String,
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Boss '{}' field '{}': {}",
            self.boss_id, self.field, self.message
        )
    }
}

impl std::error::Error for ValidationError {}

/// Push an error when `$cond` does not hold.
macro_rules! require {
    ($errors:expr, $cond:expr, $boss_id:expr, $field:expr, $($msg:tt)+) => {
        if !$cond {
            $errors.push(ValidationError {
                boss_id: $boss_id.to_string(),
                field: $field,
                message: format!($($msg)+),
            });
        }
    };
}

/// Validate every boss in the registry.
/// Returns a list of validation errors, empty if all bosses can be fought.
pub fn validate_bosses(registry: &BossRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    require!(
        errors,
        !registry.is_empty(),
        "<registry>",
        "items",
        "no bosses defined"
    );

    for id in &registry.sequence {
        let Some(def) = registry.get(id) else {
            continue;
        };
        validate_boss(def, &mut errors);
    }

    errors
}

fn validate_boss(def: &BossDef, errors: &mut Vec<ValidationError>) {
    if let Err(err) = BossProfile::from_def(def) {
        errors.push(ValidationError {
            boss_id: def.id.clone(),
            field: err.field(),
            message: err.to_string(),
        });
    }

    for phase in &def.phases {
        if let Some(layout) = &phase.layout {
            require!(
                errors,
                def.layouts.iter().any(|l| &l.id == layout),
                def.id,
                "phases.layout",
                "references missing layout '{}'",
                layout
            );
        }
    }

    let summons = def
        .phases
        .iter()
        .any(|phase| phase.behaviors.iter().any(|b| b == "summonMinions"));
    require!(
        errors,
        !summons || def.minions.is_some(),
        def.id,
        "minions",
        "phases summon minions but no minion profile is defined"
    );

    if matches!(def.mitigation, MitigationDef::MinionGated) {
        require!(
            errors,
            summons,
            def.id,
            "mitigation",
            "minion-gated shield needs a phase that summons minions"
        );
    }

    for mechanic in &def.mechanics {
        match mechanic {
            MechanicDef::DecryptionKeys { required, .. } => {
                require!(
                    errors,
                    matches!(def.mitigation, MitigationDef::Encrypted { .. }),
                    def.id,
                    "mechanics",
                    "decryption keys need encrypted mitigation"
                );
                require!(
                    errors,
                    *required > 0,
                    def.id,
                    "mechanics.required",
                    "at least one key must be required"
                );
            }
            MechanicDef::DataAggregation { .. } => {
                require!(
                    errors,
                    def.minions
                        .as_ref()
                        .is_some_and(|m| m.report_after_secs.is_some()),
                    def.id,
                    "mechanics",
                    "data aggregation needs minions with report_after_secs"
                );
            }
            MechanicDef::CarrierNetwork {
                carriers, drop_x, ..
            } => {
                require!(
                    errors,
                    *carriers > 0,
                    def.id,
                    "mechanics.carriers",
                    "carrier network needs at least one carrier"
                );
                require!(
                    errors,
                    drop_x.0 <= drop_x.1,
                    def.id,
                    "mechanics.drop_x",
                    "drop range {:?} is inverted",
                    drop_x
                );
            }
        }
    }

    let reposition = def
        .phases
        .iter()
        .any(|phase| phase.behaviors.iter().any(|b| b == "reposition"));
    require!(
        errors,
        !reposition || !def.patrol.is_empty(),
        def.id,
        "patrol",
        "reposition needs at least one patrol point"
    );
}
