use bevy::prelude::*;

/// Marks the player entity
#[derive(Component)]
pub struct Player;

#[derive(Clone, Copy, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum TileType {
    Floor = 0,
    Wall = 1,
    Goal = 2,
}

impl TileType {
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => TileType::Wall,
            2 => TileType::Goal,
            _ => TileType::Floor,
        }
    }

    pub fn is_passable(self) -> bool {
        self != TileType::Wall
    }
}

/// Sub-tile precision position (grid units, cell centers at n + 0.5)
#[derive(Component, Clone, Copy, Default)]
pub struct GamePosition {
    pub x: f32,
    pub y: f32,
}

/// Facing angle in radians plus the current forward speed (grid units per tick).
/// Positive speed walks along the facing direction, negative walks backwards.
#[derive(Component, Clone, Copy, Default)]
pub struct Heading {
    pub dir: f32,
    pub speed: f32,
}

/// Gameplay and view tuning (as a resource so it can be loaded from config)
#[derive(Resource, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub move_speed: f32,
    pub rotation_step: f32,
    pub min_distance: f32,
    pub max_wall_height_factor: f32,
    pub mini_map_size: f32,
    pub map_padding: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            rotation_step: std::f32::consts::FRAC_PI_4,
            min_distance: 0.3,
            max_wall_height_factor: 2.0,
            mini_map_size: 150.0,
            map_padding: 10.0,
        }
    }
}
