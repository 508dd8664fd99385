//! UI domain: boss health bar, name and shield readout.

use bevy::prelude::*;

use crate::ui::hud::HudState;

const BAR_WIDTH: f32 = 480.0;
const BAR_HEIGHT: f32 = 20.0;
const PANEL_TOP: f32 = 16.0;

const BAR_COLOR: Color = Color::srgb(0.8, 0.1, 0.1);
const SHIELDED_BAR_COLOR: Color = Color::srgb(0.3, 0.4, 0.9);

/// Column holding the boss label above its health bar.
#[derive(Component)]
pub struct BossPanel;

#[derive(Component)]
pub struct BossHealthFill;

/// Name, phase and shield readout.
#[derive(Component)]
pub struct BossLabel;

pub(crate) fn spawn_boss_panel(mut commands: Commands) {
    commands
        .spawn((
            BossPanel,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(PANEL_TOP),
                width: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                row_gap: Val::Px(6.0),
                ..default()
            },
        ))
        .with_children(|panel| {
            panel.spawn((
                BossLabel,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::srgb(0.9, 0.9, 0.9)),
            ));
            panel
                .spawn((
                    Node {
                        width: Val::Px(BAR_WIDTH),
                        height: Val::Px(BAR_HEIGHT),
                        border: UiRect::all(Val::Px(2.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.05, 0.05, 0.05, 0.9)),
                    BorderColor::all(Color::srgb(0.5, 0.5, 0.55)),
                ))
                .with_children(|frame| {
                    frame.spawn((
                        BossHealthFill,
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(BAR_COLOR),
                    ));
                });
        });
}

pub(crate) fn update_boss_panel(
    hud: Res<HudState>,
    mut fill_query: Query<(&mut Node, &mut BackgroundColor), With<BossHealthFill>>,
    mut label_query: Query<&mut Text, With<BossLabel>>,
) {
    if !hud.is_changed() {
        return;
    }

    for (mut node, mut bg_color) in &mut fill_query {
        node.width = Val::Percent(hud.boss_ratio * 100.0);
        // Shielded bosses show a cooler bar.
        bg_color.0 = if hud.shielded() {
            SHIELDED_BAR_COLOR
        } else {
            BAR_COLOR
        };
    }

    for mut text in &mut label_query {
        let mut label = format!("{} - Phase {}", hud.boss_name, hud.phase);
        if hud.shielded() {
            label.push_str(&format!(
                " (damage x{:.2})",
                hud.shield_multiplier.max(0.0)
            ));
        }
        **text = label;
    }
}
