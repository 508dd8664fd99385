//! Encounter domain: boss-specific side systems (keys, data aggregation, carriers).

use std::time::Duration;

use crate::bosses::{BehaviorTag, BossProfile, Lesson, Mechanic};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyRing {
    pub collected: u32,
    pub required: u32,
    /// Keys lying in the arena right now.
    pub outstanding: u32,
    pub max_outstanding: u32,
}

impl KeyRing {
    pub fn can_spawn(&self) -> bool {
        self.outstanding < self.max_outstanding
    }

    pub fn spawned(&mut self) {
        self.outstanding += 1;
    }

    pub fn collect(&mut self) -> u32 {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.collected += 1;
        self.collected
    }

    pub fn complete(&self) -> bool {
        self.collected >= self.required
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataAggregate {
    pub total: f32,
    lessons: Vec<Lesson>,
    learned: Vec<BehaviorTag>,
}

impl DataAggregate {
    pub fn new(lessons: Vec<Lesson>) -> Self {
        Self {
            total: 0.0,
            lessons,
            learned: Vec::new(),
        }
    }

    /// Adds reported data, returning lessons unlocked by this report.
    pub fn absorb(&mut self, data: f32) -> Vec<Lesson> {
        if data.is_finite() && data > 0.0 {
            self.total += data;
        }
        let mut unlocked = Vec::new();
        for lesson in &self.lessons {
            if self.total >= lesson.threshold && !self.learned.contains(&lesson.behavior) {
                self.learned.push(lesson.behavior);
                unlocked.push(lesson.clone());
            }
        }
        unlocked
    }

    pub fn learned(&self) -> &[BehaviorTag] {
        &self.learned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    UnknownCarrier,
    AlreadyLoaded,
    Loaded { all_loaded: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarrierNetwork {
    loaded: Vec<bool>,
    combo_armed: bool,
    pub combo_damage: f32,
    pub combo_delay: Duration,
    pub drop_x: (f32, f32),
    pub drop_y: f32,
}

impl CarrierNetwork {
    pub fn new(
        carriers: u32,
        combo_damage: f32,
        combo_delay: Duration,
        drop_x: (f32, f32),
        drop_y: f32,
    ) -> Self {
        Self {
            loaded: vec![false; carriers as usize],
            combo_armed: false,
            combo_damage,
            combo_delay,
            drop_x,
            drop_y,
        }
    }

    pub fn carriers(&self) -> usize {
        self.loaded.len()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.iter().filter(|loaded| **loaded).count()
    }

    pub fn deliver(&mut self, carrier: usize) -> Delivery {
        let Some(slot) = self.loaded.get_mut(carrier) else {
            return Delivery::UnknownCarrier;
        };
        if *slot {
            return Delivery::AlreadyLoaded;
        }
        *slot = true;
        Delivery::Loaded {
            all_loaded: self.loaded.iter().all(|loaded| *loaded),
        }
    }

    /// Arms the combined attack once every carrier is loaded. False if already armed or not ready.
    pub fn arm_combo(&mut self) -> bool {
        if self.combo_armed || !self.loaded.iter().all(|loaded| *loaded) {
            return false;
        }
        self.combo_armed = true;
        true
    }

    /// Spends the armed combo and unloads every carrier.
    pub fn fire_combo(&mut self) -> Option<f32> {
        if !self.combo_armed {
            return None;
        }
        self.combo_armed = false;
        self.loaded.iter_mut().for_each(|loaded| *loaded = false);
        Some(self.combo_damage)
    }
}

/// Per-encounter state for whichever mechanics the boss profile lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BossMechanics {
    pub keys: Option<KeyRing>,
    pub aggregate: Option<DataAggregate>,
    pub carriers: Option<CarrierNetwork>,
}

impl BossMechanics {
    pub fn from_profile(profile: &BossProfile) -> Self {
        let mut mechanics = Self::default();
        for mechanic in &profile.mechanics {
            match mechanic {
                Mechanic::DecryptionKeys {
                    required,
                    max_outstanding,
                    ..
                } => {
                    mechanics.keys = Some(KeyRing {
                        collected: 0,
                        required: *required,
                        outstanding: 0,
                        max_outstanding: *max_outstanding,
                    });
                }
                Mechanic::DataAggregation { lessons } => {
                    mechanics.aggregate = Some(DataAggregate::new(lessons.clone()));
                }
                Mechanic::CarrierNetwork {
                    carriers,
                    combo_damage,
                    combo_delay,
                    drop_x,
                    drop_y,
                    ..
                } => {
                    mechanics.carriers = Some(CarrierNetwork::new(
                        *carriers,
                        *combo_damage,
                        *combo_delay,
                        *drop_x,
                        *drop_y,
                    ));
                }
            }
        }
        mechanics
    }

    pub fn learned_behaviors(&self) -> Vec<BehaviorTag> {
        self.aggregate
            .as_ref()
            .map(|aggregate| aggregate.learned().to_vec())
            .unwrap_or_default()
    }
}
