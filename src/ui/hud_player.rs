//! UI domain: player hearts.

use bevy::prelude::*;

use crate::ui::hud::HudState;

pub(crate) const PLAYER_HEARTS_PADDING: f32 = 16.0;

#[derive(Component)]
pub struct PlayerHeartsUI;

pub(crate) fn spawn_player_hearts_ui(mut commands: Commands) {
    commands.spawn((
        PlayerHeartsUI,
        Text::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.2, 0.3)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(PLAYER_HEARTS_PADDING),
            top: Val::Px(PLAYER_HEARTS_PADDING),
            ..default()
        },
    ));
}

pub(crate) fn update_player_hearts(
    hud: Res<HudState>,
    mut query: Query<(&mut Text, &mut TextColor), With<PlayerHeartsUI>>,
) {
    if !hud.is_changed() {
        return;
    }

    let full = hud.hearts.min(hud.max_hearts) as usize;
    let empty = hud.max_hearts.saturating_sub(hud.hearts) as usize;
    for (mut text, mut color) in &mut query {
        **text = format!("{}{}", "♥ ".repeat(full), "♡ ".repeat(empty));
        // Fade while invincible.
        color.0 = if hud.invincible {
            Color::srgba(0.9, 0.2, 0.3, 0.5)
        } else {
            Color::srgb(0.9, 0.2, 0.3)
        };
    }
}
