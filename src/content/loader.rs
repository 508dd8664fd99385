//! Loader for RON content files at startup.

use bevy::prelude::*;
use ron::Options;
use std::fs;
use std::path::Path;

use super::data::*;
use super::registry::BossRegistry;

pub const SCHEMA_VERSION: u32 = 1;

const BOSSES_FILE: &str = "bosses.ron";
const TUNING_FILE: &str = "encounter.ron";

const BUILTIN_BOSSES: &str = include_str!("../../assets/data/bosses.ron");
const BUILTIN_TUNING: &str = include_str!("../../assets/data/encounter.ron");

/// Error type for content loading failures.
#[derive(Debug)]
pub struct ContentLoadError {
    pub file: String,
    pub message: String,
}

impl std::fmt::Display for ContentLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.file, self.message)
    }
}

impl std::error::Error for ContentLoadError {}

/// Create RON options with extensions enabled for more flexible parsing.
fn ron_options() -> Options {
    Options::default().with_default_extension(ron::extensions::Extensions::IMPLICIT_SOME)
}

fn read_file(path: &Path) -> Result<String, ContentLoadError> {
    fs::read_to_string(path).map_err(|e| ContentLoadError {
        file: path.display().to_string(),
        message: format!("IO error: {}", e),
    })
}

/// Parse a DataFile<T> wrapper, rejecting unknown schema versions.
fn parse_data_file<T>(file: &str, contents: &str) -> Result<Vec<T>, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let data: DataFile<T> = ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })?;

    if data.schema_version != SCHEMA_VERSION {
        return Err(ContentLoadError {
            file: file.to_string(),
            message: format!(
                "unsupported schema_version {} (expected {})",
                data.schema_version, SCHEMA_VERSION
            ),
        });
    }

    Ok(data.items)
}

/// Parse a single RON struct (not wrapped in DataFile).
fn parse_single_file<T>(file: &str, contents: &str) -> Result<T, ContentLoadError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    ron_options()
        .from_str(contents)
        .map_err(|e| ContentLoadError {
            file: file.to_string(),
            message: format!("Parse error: {}", e),
        })
}

fn assemble(
    bosses: Result<Vec<BossDef>, ContentLoadError>,
    tuning: Result<EncounterTuning, ContentLoadError>,
) -> Result<(BossRegistry, EncounterTuning), Vec<ContentLoadError>> {
    match (bosses, tuning) {
        (Ok(defs), Ok(tuning)) => {
            let mut registry = BossRegistry::default();
            for def in defs {
                registry.insert(def);
            }
            Ok((registry, tuning))
        }
        (bosses, tuning) => Err(bosses.err().into_iter().chain(tuning.err()).collect()),
    }
}

/// Load boss definitions and tuning from `base_path` (normally assets/data).
pub fn load_content(
    base_path: &Path,
) -> Result<(BossRegistry, EncounterTuning), Vec<ContentLoadError>> {
    let bosses_path = base_path.join(BOSSES_FILE);
    let tuning_path = base_path.join(TUNING_FILE);

    let bosses = read_file(&bosses_path)
        .and_then(|contents| parse_data_file(&bosses_path.display().to_string(), &contents));
    let tuning = read_file(&tuning_path)
        .and_then(|contents| parse_single_file(&tuning_path.display().to_string(), &contents));

    assemble(bosses, tuning)
}

/// The data files compiled into the binary, used when the on-disk copies are unusable.
pub fn builtin_content() -> Result<(BossRegistry, EncounterTuning), Vec<ContentLoadError>> {
    assemble(
        parse_data_file(BOSSES_FILE, BUILTIN_BOSSES),
        parse_single_file(TUNING_FILE, BUILTIN_TUNING),
    )
}
