//! Content domain: boss data files, registry and validation.

mod data;
mod loader;
mod registry;
mod validation;

pub use data::{
    ArenaLayoutDef, BossDef, BossKind, CadenceOverrideDef, DataFile, EncounterTuning, LessonDef,
    MechanicDef, MinionDef, MitigationDef, PhaseDef, PrivacySkill, RewardDef,
};
pub use loader::{ContentLoadError, SCHEMA_VERSION, builtin_content, load_content};
pub use registry::BossRegistry;
pub use validation::{ValidationError, validate_bosses};

use bevy::prelude::*;
use std::path::Path;

const DATA_DIR: &str = "assets/data";

pub struct ContentPlugin;

impl Plugin for ContentPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(PreStartup, load_boss_content);
    }
}

/// Load and validate content, falling back to the compiled-in copy when the files are unusable.
fn load_boss_content(mut commands: Commands) {
    let (registry, tuning) = match load_validated(Path::new(DATA_DIR)) {
        Some(content) => content,
        None => {
            warn!("Using built-in boss content");
            match builtin_content() {
                Ok(content) => content,
                Err(errors) => {
                    for e in &errors {
                        error!("{}", e);
                    }
                    (BossRegistry::default(), EncounterTuning::default())
                }
            }
        }
    };

    info!("{}", registry.summary());
    commands.insert_resource(registry);
    commands.insert_resource(tuning);
}

fn load_validated(base_path: &Path) -> Option<(BossRegistry, EncounterTuning)> {
    let (registry, tuning) = match load_content(base_path) {
        Ok(content) => content,
        Err(errors) => {
            for e in &errors {
                warn!("{}", e);
            }
            return None;
        }
    };

    let errors = validate_bosses(&registry);
    if errors.is_empty() {
        Some((registry, tuning))
    } else {
        for e in &errors {
            error!("{}", e);
        }
        None
    }
}
