//! Arena domain: the noise distributions that drive a continuous (differential privacy) shield.
//!
//! The player steers a Gaussian against the boss's. The shield absorbs whatever the two do not
//! share: `strength = max(0, 1 - overlap)`.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::encounter::{ActiveEncounter, ContactEvent};

pub const MIN_VARIANCE: f32 = 10.0;
pub const MAX_VARIANCE: f32 = 300.0;
/// Mean units per second while an arrow key is held.
const MEAN_RATE: f32 = 120.0;
const VARIANCE_RATE: f32 = 120.0;
const OVERLAP_SAMPLES: usize = 200;
/// Sampled from `-SPAN / 2` to `SPAN / 2`.
const OVERLAP_SPAN: f32 = 800.0;

/// A Gaussian given by mean and variance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseCurve {
    pub mean: f32,
    pub variance: f32,
}

impl Default for NoiseCurve {
    fn default() -> Self {
        Self {
            mean: 0.0,
            variance: 100.0,
        }
    }
}

impl NoiseCurve {
    pub fn density(&self, x: f32) -> f32 {
        let coeff = 1.0 / (2.0 * std::f32::consts::PI * self.variance).sqrt();
        coeff * (-(x - self.mean).powi(2) / (2.0 * self.variance)).exp()
    }
}

/// Area under the lower of the two densities, in `[0, 1]` for normalised Gaussians.
pub fn overlap(a: &NoiseCurve, b: &NoiseCurve) -> f32 {
    let dx = OVERLAP_SPAN / OVERLAP_SAMPLES as f32;
    (0..=OVERLAP_SAMPLES)
        .map(|i| {
            let x = i as f32 * dx - OVERLAP_SPAN / 2.0;
            a.density(x).min(b.density(x)) * dx
        })
        .sum()
}

pub fn shield_strength(player: &NoiseCurve, boss: &NoiseCurve) -> f32 {
    (1.0 - overlap(player, boss)).max(0.0)
}

#[derive(Resource, Debug, Clone)]
pub struct NoiseControl {
    pub player: NoiseCurve,
    pub boss: NoiseCurve,
    changed: bool,
}

impl Default for NoiseControl {
    fn default() -> Self {
        Self {
            player: NoiseCurve::default(),
            boss: NoiseCurve::default(),
            changed: true,
        }
    }
}

impl NoiseControl {
    pub fn shift_mean(&mut self, delta: f32) {
        if delta != 0.0 {
            self.player.mean += delta;
            self.changed = true;
        }
    }

    /// Widens (or narrows, for negative `delta`) the player's distribution within the bounds.
    pub fn widen(&mut self, delta: f32) {
        let variance = (self.player.variance + delta).clamp(MIN_VARIANCE, MAX_VARIANCE);
        if variance != self.player.variance {
            self.player.variance = variance;
            self.changed = true;
        }
    }

    /// The shield strength to report, once per change.
    pub fn take_strength(&mut self) -> Option<f32> {
        if !std::mem::take(&mut self.changed) {
            return None;
        }
        Some(shield_strength(&self.player, &self.boss))
    }
}

pub(crate) fn reset_noise(mut noise: ResMut<NoiseControl>) {
    *noise = NoiseControl::default();
}

/// Left/right moves the player's mean, up/down its variance. Reports the resulting shield
/// strength on fight start and after every change.
pub(crate) fn adjust_noise(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    active: Res<ActiveEncounter>,
    mut noise: ResMut<NoiseControl>,
    mut contacts: MessageWriter<ContactEvent>,
) {
    let Some(encounter) = active.encounter.as_ref() else {
        return;
    };
    if !encounter.shield().is_continuous() || !encounter.is_live() {
        return;
    }

    let secs = time.delta_secs();
    if keyboard.pressed(KeyCode::ArrowLeft) {
        noise.shift_mean(-MEAN_RATE * secs);
    } else if keyboard.pressed(KeyCode::ArrowRight) {
        noise.shift_mean(MEAN_RATE * secs);
    }
    if keyboard.pressed(KeyCode::ArrowUp) {
        noise.widen(VARIANCE_RATE * secs);
    } else if keyboard.pressed(KeyCode::ArrowDown) {
        noise.widen(-VARIANCE_RATE * secs);
    }

    if let Some(strength) = noise.take_strength() {
        debug!("Noise shield strength {:.3}", strength);
        contacts.write(ContactEvent::ShieldSignal { strength });
    }
}
