//! UI domain: HUD state driven by encounter signals.

use std::time::Duration;

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::encounter::{ActiveEncounter, EncounterOutcome, EncounterSignal};

#[derive(Debug, Clone)]
pub struct HudMessage {
    pub text: String,
    pub timer: Timer,
}

/// What the HUD shows. Only ever written from [`EncounterSignal`]s.
#[derive(Resource, Debug, Clone)]
pub struct HudState {
    pub boss_name: String,
    pub boss_ratio: f32,
    pub hearts: u32,
    pub max_hearts: u32,
    pub phase: usize,
    pub shield_multiplier: f32,
    pub invincible: bool,
    messages: Vec<HudMessage>,
}

impl Default for HudState {
    fn default() -> Self {
        Self {
            boss_name: String::new(),
            boss_ratio: 1.0,
            hearts: 0,
            max_hearts: 0,
            phase: 1,
            shield_multiplier: 1.0,
            invincible: false,
            messages: Vec::new(),
        }
    }
}

impl HudState {
    pub fn reset(&mut self, boss_name: impl Into<String>, max_hearts: u32) {
        *self = Self {
            boss_name: boss_name.into(),
            hearts: max_hearts,
            max_hearts,
            ..Default::default()
        };
    }

    pub fn apply(&mut self, signal: &EncounterSignal) {
        match signal {
            EncounterSignal::BossHealthChanged { ratio } => {
                self.boss_ratio = ratio.clamp(0.0, 1.0);
            }
            EncounterSignal::PlayerHealthChanged { hearts } => {
                self.hearts = *hearts;
                self.max_hearts = self.max_hearts.max(*hearts);
            }
            EncounterSignal::ShieldChanged { multiplier } => {
                self.shield_multiplier = *multiplier;
            }
            EncounterSignal::PhaseChanged { phase, .. } => self.phase = *phase,
            EncounterSignal::PlayerInvincible { active } => self.invincible = *active,
            EncounterSignal::Message { text, duration } => {
                self.push_message(text.clone(), *duration);
            }
            EncounterSignal::Resolved { outcome, .. } => {
                let text = match outcome {
                    EncounterOutcome::PlayerVictory => format!("{} defeated!", self.boss_name),
                    EncounterOutcome::PlayerDefeated => "You were defeated! Retrying...".to_string(),
                    EncounterOutcome::Pending => return,
                };
                self.push_message(text, Duration::from_secs(2));
            }
            _ => {}
        }
    }

    /// Shows `text` for `duration`. Returns false if the same text is already on screen.
    pub fn push_message(&mut self, text: String, duration: Duration) -> bool {
        if duration.is_zero() || self.messages.iter().any(|m| m.text == text) {
            return false;
        }
        info!("{}", text);
        self.messages.push(HudMessage {
            text,
            timer: Timer::new(duration, TimerMode::Once),
        });
        true
    }

    /// Ages messages, dropping expired ones. Returns how many expired.
    pub fn tick(&mut self, delta: Duration) -> usize {
        let before = self.messages.len();
        self.messages.retain_mut(|message| {
            message.timer.tick(delta);
            !message.timer.just_finished()
        });
        before - self.messages.len()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|m| m.text.as_str())
    }

    pub fn shielded(&self) -> bool {
        self.shield_multiplier < 1.0
    }
}

pub(crate) fn reset_hud(mut hud: ResMut<HudState>, active: Res<ActiveEncounter>) {
    let Some(encounter) = active.encounter.as_ref() else {
        return;
    };
    let max_hearts = encounter.player().combatant.max_health.ceil().max(0.0) as u32;
    hud.reset(encounter.profile().name.clone(), max_hearts);
}

pub(crate) fn apply_hud_signals(
    mut signals: MessageReader<EncounterSignal>,
    mut hud: ResMut<HudState>,
) {
    for signal in signals.read() {
        hud.apply(signal);
    }
}

pub(crate) fn tick_hud_messages(time: Res<Time>, mut hud: ResMut<HudState>) {
    hud.tick(time.delta());
}
