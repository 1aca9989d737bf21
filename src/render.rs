use crate::components::*;
use crate::game_runtime::{ExploredMap, GamePhase, RuntimeState};
use crate::raycast::{self, RAY_COUNT};
use crate::tilemap::MazeGrid;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_view)
            .add_systems(Update, (update_first_person_view, draw_minimap, update_hud));
    }
}

/// One vertical wall slice of the first-person view.
#[derive(Component)]
struct ViewColumn(usize);

#[derive(Component)]
enum Backdrop {
    Ceiling,
    Floor,
}

#[derive(Component)]
struct HudText;

fn setup_view(mut commands: Commands) {
    commands.spawn(Camera2d);

    commands.spawn((
        Backdrop::Ceiling,
        Sprite::from_color(Color::srgb(0.36, 0.36, 0.54), Vec2::ONE),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));
    commands.spawn((
        Backdrop::Floor,
        Sprite::from_color(Color::srgb(0.47, 0.53, 0.6), Vec2::ONE),
        Transform::from_xyz(0.0, 0.0, 0.0),
    ));

    for i in 0..RAY_COUNT {
        commands.spawn((
            ViewColumn(i),
            Sprite::from_color(Color::BLACK, Vec2::ONE),
            Transform::from_xyz(0.0, 0.0, 1.0),
        ));
    }

    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 16.0,
            ..default()
        },
        TextColor(Color::srgba(0.95, 1.0, 0.98, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            right: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        },
        HudText,
    ));
}

/// Cast one ray per view column and shape the wall slice sprites from the
/// corrected hit distances.
fn update_first_person_view(
    grid: Res<MazeGrid>,
    config: Res<GameConfig>,
    players: Query<(&GamePosition, &Heading), With<Player>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut backdrops: Query<(&Backdrop, &mut Sprite, &mut Transform), Without<ViewColumn>>,
    mut columns: Query<(&ViewColumn, &mut Sprite, &mut Transform), Without<Backdrop>>,
) {
    let Ok((position, heading)) = players.get_single() else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    let (cw, ch) = (window.width(), window.height());

    for (backdrop, mut sprite, mut transform) in &mut backdrops {
        sprite.custom_size = Some(Vec2::new(cw, ch / 2.0));
        transform.translation.y = match backdrop {
            Backdrop::Ceiling => ch / 4.0,
            Backdrop::Floor => -ch / 4.0,
        };
    }

    let slice_width = cw / RAY_COUNT as f32;
    let max_wall_height = ch * config.max_wall_height_factor;

    for (column, mut sprite, mut transform) in &mut columns {
        let angle = raycast::ray_angle(heading.dir, column.0);
        let hit = raycast::march_ray(&grid, position.x, position.y, angle);
        let corrected =
            raycast::corrected_distance(hit.distance, angle, heading.dir, config.min_distance);
        let wall_height = (ch / corrected.max(0.01)).min(max_wall_height);
        let value = raycast::brightness(corrected);
        sprite.color = if hit.tile == TileType::Goal {
            Color::srgb(1.0, value * 0.5, value * 0.5)
        } else {
            Color::srgb(value, value, value)
        };
        sprite.custom_size = Some(Vec2::new(slice_width + 1.0, wall_height));
        transform.translation = Vec3::new(
            -cw / 2.0 + (column.0 as f32 + 0.5) * slice_width,
            0.0,
            1.0,
        );
    }
}

/// Top-left minimap of explored territory: visited floors, the walls seen
/// around them, and the player marker with its facing.
fn draw_minimap(
    grid: Res<MazeGrid>,
    explored: Res<ExploredMap>,
    config: Res<GameConfig>,
    players: Query<(&GamePosition, &Heading), With<Player>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut gizmos: Gizmos,
) {
    let Ok((position, heading)) = players.get_single() else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    let size = grid.size();
    if size == 0 {
        return;
    }
    let cell = config.mini_map_size / size as f32;
    let origin_x = -window.width() / 2.0 + config.map_padding;
    let origin_y = window.height() / 2.0 - config.map_padding;

    let center_of = |x: i32, y: i32| {
        Vec2::new(
            origin_x + (x as f32 + 0.5) * cell,
            origin_y - (y as f32 + 0.5) * cell,
        )
    };
    let near_explored = |x: i32, y: i32| {
        explored.is_explored(x, y)
            || explored.is_explored(x - 1, y)
            || explored.is_explored(x + 1, y)
            || explored.is_explored(x, y - 1)
            || explored.is_explored(x, y + 1)
    };

    for y in 0..size as i32 {
        for x in 0..size as i32 {
            let tile = grid.get(x, y);
            let color = match tile {
                TileType::Wall if near_explored(x, y) => Color::srgba(0.2, 0.2, 0.25, 0.9),
                TileType::Goal if near_explored(x, y) => Color::srgba(1.0, 0.25, 0.25, 0.95),
                TileType::Floor if explored.is_explored(x, y) => {
                    Color::srgba(0.85, 0.9, 0.95, 0.5)
                }
                _ => continue,
            };
            gizmos.rect_2d(center_of(x, y), Vec2::splat(cell * 0.9), color);
        }
    }

    let player_px = Vec2::new(
        origin_x + position.x * cell,
        origin_y - position.y * cell,
    );
    gizmos.circle_2d(player_px, cell * 0.3, Color::srgba(0.3, 0.9, 0.4, 1.0));
    let facing = Vec2::new(heading.dir.cos(), -heading.dir.sin());
    gizmos.line_2d(
        player_px,
        player_px + facing * cell * 0.8,
        Color::srgba(0.3, 0.9, 0.4, 1.0),
    );
}

fn update_hud(runtime: Res<RuntimeState>, mut query: Query<&mut Text, With<HudText>>) {
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };
    text.0 = match runtime.phase {
        GamePhase::Playing => format!(
            "{:.2}\n{} | 1 easy  2 normal  3 hard  R restart",
            runtime.elapsed_seconds(),
            runtime.difficulty
        ),
        GamePhase::Won => format!(
            "CLEAR! {:.2}s on {}\n1/2/3 or R for a new maze",
            runtime.clear_time.unwrap_or_default(),
            runtime.difficulty
        ),
    };
}
