//! UI domain: on-screen announcements.

use std::time::Duration;

use bevy::prelude::*;

use crate::ui::hud::HudState;

const VICTORY_MESSAGE_SECS: u64 = 3600;

#[derive(Component)]
pub struct MessageBoard;

pub(crate) fn spawn_message_board(mut commands: Commands) {
    commands.spawn((
        MessageBoard,
        Text::new(""),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.95, 0.6)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(96.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        },
    ));
}

pub(crate) fn update_message_board(
    hud: Res<HudState>,
    mut query: Query<&mut Text, With<MessageBoard>>,
) {
    if !hud.is_changed() {
        return;
    }

    let lines: Vec<&str> = hud.messages().collect();
    for mut text in &mut query {
        **text = lines.join("\n");
    }
}

pub(crate) fn announce_run_victory(mut hud: ResMut<HudState>) {
    hud.push_message(
        "All privacy bosses defeated!".to_string(),
        Duration::from_secs(VICTORY_MESSAGE_SECS),
    );
}
