//! Bosses domain: phase tables and the one-way phase controller.

use std::fmt;
use std::time::Duration;

use super::behavior::{BehaviorTag, UnknownBehaviorTag};

/// A boss's behavioral stage, entered once its health ratio drops to `health_threshold`.
#[derive(Debug, Clone, PartialEq)]
pub struct Phase {
    /// Zero-based position in the table, assigned by [`PhaseTable::new`].
    pub index: usize,
    pub health_threshold: f32,
    /// Enabled actions in dispatch order, without duplicates.
    pub behaviors: Vec<BehaviorTag>,
    pub attack_interval: Duration,
    /// Per-behavior cadences that replace `attack_interval` for that behavior.
    pub cadence_overrides: Vec<(BehaviorTag, Duration)>,
    pub announcement: String,
    /// Arena layout the presentation should switch to on entry.
    pub layout: Option<String>,
    pub move_speed: Option<f32>,
}

impl Phase {
    pub fn new(
        health_threshold: f32,
        behaviors: impl IntoIterator<Item = BehaviorTag>,
        attack_interval: Duration,
    ) -> Self {
        let mut phase = Self {
            index: 0,
            health_threshold,
            behaviors: Vec::new(),
            attack_interval,
            cadence_overrides: Vec::new(),
            announcement: String::new(),
            layout: None,
            move_speed: None,
        };
        for tag in behaviors {
            phase.push_behavior(tag);
        }
        phase
    }

    pub fn with_override(mut self, tag: BehaviorTag, interval: Duration) -> Self {
        self.cadence_overrides.retain(|(existing, _)| *existing != tag);
        self.cadence_overrides.push((tag, interval));
        self
    }

    pub fn with_announcement(mut self, text: impl Into<String>) -> Self {
        self.announcement = text.into();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = Some(speed);
        self
    }

    /// Human-facing phase number (1-based).
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn cadence(&self, tag: BehaviorTag) -> Duration {
        self.cadence_overrides
            .iter()
            .find(|(overridden, _)| *overridden == tag)
            .map(|(_, interval)| *interval)
            .unwrap_or(self.attack_interval)
    }

    pub fn has_behavior(&self, tag: BehaviorTag) -> bool {
        self.behaviors.contains(&tag)
    }

    fn push_behavior(&mut self, tag: BehaviorTag) {
        if !self.behaviors.contains(&tag) {
            self.behaviors.push(tag);
        }
    }
}

/// Configuration errors caught while building a [`PhaseTable`].
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseTableError {
    Empty,
    ThresholdOutOfRange { phase: usize, threshold: f32 },
    ThresholdsNotDescending { phase: usize, previous: f32, threshold: f32 },
    ZeroInterval { phase: usize, behavior: Option<BehaviorTag> },
    UnknownBehavior { phase: usize, source: UnknownBehaviorTag },
}

impl fmt::Display for PhaseTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseTableError::Empty => write!(f, "phase table has no phases"),
            PhaseTableError::ThresholdOutOfRange { phase, threshold } => write!(
                f,
                "phase {} threshold {} is outside (0, 1]",
                phase + 1,
                threshold
            ),
            PhaseTableError::ThresholdsNotDescending {
                phase,
                previous,
                threshold,
            } => write!(
                f,
                "phase {} threshold {} must be below the previous threshold {}",
                phase + 1,
                threshold,
                previous
            ),
            PhaseTableError::ZeroInterval {
                phase,
                behavior: Some(tag),
            } => write!(f, "phase {} has a zero cadence for {}", phase + 1, tag),
            PhaseTableError::ZeroInterval {
                phase,
                behavior: None,
            } => write!(f, "phase {} has a zero attack interval", phase + 1),
            PhaseTableError::UnknownBehavior { phase, source } => {
                write!(f, "phase {}: {}", phase + 1, source)
            }
        }
    }
}

impl std::error::Error for PhaseTableError {}

/// Phases ordered by strictly descending health threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    phases: Vec<Phase>,
}

impl PhaseTable {
    pub fn new(mut phases: Vec<Phase>) -> Result<Self, PhaseTableError> {
        if phases.is_empty() {
            return Err(PhaseTableError::Empty);
        }

        let mut previous: Option<f32> = None;
        for (index, phase) in phases.iter_mut().enumerate() {
            let threshold = phase.health_threshold;
            if !(threshold > 0.0 && threshold <= 1.0) {
                return Err(PhaseTableError::ThresholdOutOfRange {
                    phase: index,
                    threshold,
                });
            }
            if let Some(previous) = previous
                && threshold >= previous
            {
                return Err(PhaseTableError::ThresholdsNotDescending {
                    phase: index,
                    previous,
                    threshold,
                });
            }
            if phase.attack_interval.is_zero() {
                return Err(PhaseTableError::ZeroInterval {
                    phase: index,
                    behavior: None,
                });
            }
            if let Some((tag, _)) = phase
                .cadence_overrides
                .iter()
                .find(|(_, interval)| interval.is_zero())
            {
                return Err(PhaseTableError::ZeroInterval {
                    phase: index,
                    behavior: Some(*tag),
                });
            }

            phase.index = index;
            previous = Some(threshold);
        }

        Ok(Self { phases })
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn get(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Phase> {
        self.phases.iter()
    }
}

/// Tracks the active phase. The index only ever moves forward, one step per check.
#[derive(Debug, Clone)]
pub struct PhaseController {
    table: PhaseTable,
    current: usize,
}

impl PhaseController {
    pub fn new(table: PhaseTable) -> Self {
        Self { table, current: 0 }
    }

    pub fn current(&self) -> &Phase {
        // PhaseTable::new rejects empty tables and `current` never passes the last index
        &self.table.phases[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn is_final(&self) -> bool {
        self.current + 1 >= self.table.len()
    }

    pub fn table(&self) -> &PhaseTable {
        &self.table
    }

    /// True when `health_ratio` is at or below the next phase's threshold.
    pub fn transition_due(&self, health_ratio: f32) -> bool {
        self.table
            .get(self.current + 1)
            .is_some_and(|next| health_ratio <= next.health_threshold)
    }

    /// Advances at most one phase. Returns the newly entered phase, if any.
    pub fn check_transition(&mut self, health_ratio: f32) -> Option<&Phase> {
        if !self.transition_due(health_ratio) {
            return None;
        }
        self.current += 1;
        Some(self.current())
    }
}
