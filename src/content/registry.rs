//! Content domain: lookup of loaded boss definitions.

use bevy::prelude::*;
use std::collections::HashMap;

use super::data::BossDef;

/// All loaded bosses, keyed by id, plus the order they are fought in.
#[derive(Resource, Debug, Default, Clone)]
pub struct BossRegistry {
    pub bosses: HashMap<String, BossDef>,
    pub sequence: Vec<String>,
}

impl BossRegistry {
    pub fn insert(&mut self, def: BossDef) {
        if !self.bosses.contains_key(&def.id) {
            self.sequence.push(def.id.clone());
        }
        self.bosses.insert(def.id.clone(), def);
    }

    pub fn get(&self, id: &str) -> Option<&BossDef> {
        self.bosses.get(id)
    }

    /// The boss fought at `position` in the run, if any.
    pub fn at(&self, position: usize) -> Option<&BossDef> {
        self.sequence.get(position).and_then(|id| self.bosses.get(id))
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn summary(&self) -> String {
        let names: Vec<&str> = self
            .sequence
            .iter()
            .filter_map(|id| self.bosses.get(id))
            .map(|def| def.name.as_str())
            .collect();
        format!("BossRegistry loaded {} bosses: {}", names.len(), names.join(" -> "))
    }
}
