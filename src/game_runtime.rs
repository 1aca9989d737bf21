use bevy::prelude::*;
use bevy::utils::Instant;
use serde::Serialize;

use crate::components::{GamePosition, Heading, Player};
use crate::difficulty::Difficulty;
use crate::events::GameEventBus;
use crate::generation::{self, Rng};
use crate::rankings::RankingStoreHandle;
use crate::tilemap::MazeGrid;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub enum GamePhase {
    Playing,
    Won,
}

#[derive(Resource, Clone)]
pub struct RuntimeState {
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub clear_time: Option<f32>,
    started_at: Instant,
    score_recorded: bool,
}

impl Default for RuntimeState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Playing,
            difficulty: Difficulty::Easy,
            clear_time: None,
            started_at: Instant::now(),
            score_recorded: false,
        }
    }
}

impl RuntimeState {
    pub fn start(&mut self, difficulty: Difficulty) {
        self.phase = GamePhase::Playing;
        self.difficulty = difficulty;
        self.clear_time = None;
        self.started_at = Instant::now();
        self.score_recorded = false;
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.started_at.elapsed().as_secs_f32()
    }

    pub fn is_gameplay_active(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Stop the clock. Returns the clear time rounded to centiseconds, the
    /// same precision the leaderboard stores.
    pub fn win(&mut self) -> f32 {
        let clear_time = (self.elapsed_seconds() * 100.0).round() / 100.0;
        self.phase = GamePhase::Won;
        self.clear_time = Some(clear_time);
        clear_time
    }

    pub fn snapshot(&self) -> RuntimeStateSnapshot {
        RuntimeStateSnapshot {
            state: match self.phase {
                GamePhase::Playing => "Playing".to_string(),
                GamePhase::Won => "Won".to_string(),
            },
            difficulty: self.difficulty,
            elapsed_seconds: self.elapsed_seconds(),
            clear_time: self.clear_time,
        }
    }
}

#[derive(Serialize, Clone)]
pub struct RuntimeStateSnapshot {
    pub state: String,
    pub difficulty: Difficulty,
    pub elapsed_seconds: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_time: Option<f32>,
}

/// Run condition: movement, timers, and events only advance mid-game.
pub fn gameplay_systems_enabled(runtime: Res<RuntimeState>) -> bool {
    runtime.is_gameplay_active()
}

/// Identity attached to submitted scores, from startup config.
#[derive(Resource, Clone)]
pub struct PlayerProfile {
    pub name: String,
    pub submit_scores: bool,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            name: "anonymous".to_string(),
            submit_scores: true,
        }
    }
}

/// Explored-cell flags driving the minimap. Reset per maze; the start cell
/// counts as explored from spawn.
#[derive(Resource, Clone)]
pub struct ExploredMap {
    size: usize,
    cells: Vec<bool>,
}

impl ExploredMap {
    pub fn for_grid(grid: &MazeGrid) -> Self {
        let mut explored = Self {
            size: grid.size(),
            cells: vec![false; grid.size() * grid.size()],
        };
        let (sx, sy) = grid.start();
        explored.mark(sx as i32, sy as i32);
        explored
    }

    pub fn mark(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size {
            self.cells[y as usize * self.size + x as usize] = true;
        }
    }

    pub fn is_explored(&self, x: i32, y: i32) -> bool {
        x >= 0
            && y >= 0
            && (x as usize) < self.size
            && (y as usize) < self.size
            && self.cells[y as usize * self.size + x as usize]
    }
}

/// Swap in a freshly generated or fixed grid and reset the run.
pub fn apply_grid(
    new_grid: MazeGrid,
    grid: &mut MazeGrid,
    explored: &mut ExploredMap,
    runtime: &mut RuntimeState,
    position: &mut GamePosition,
    heading: &mut Heading,
) {
    *grid = new_grid;
    *explored = ExploredMap::for_grid(grid);
    let (sx, sy) = grid.start();
    position.x = sx as f32 + 0.5;
    position.y = sy as f32 + 0.5;
    heading.dir = crate::player::initial_facing(grid);
    heading.speed = 0.0;
    runtime.start(Difficulty::from_size(grid.size()));
}

/// Generate a quality maze for `size` and start a run on it.
pub fn start_game(
    size: usize,
    grid: &mut MazeGrid,
    explored: &mut ExploredMap,
    runtime: &mut RuntimeState,
    bus: &mut GameEventBus,
    position: &mut GamePosition,
    heading: &mut Heading,
) {
    let result = generation::generate_quality_maze(size, &mut Rng::from_entropy());
    info!(
        "[MazeRunner] Generated {size}x{size} maze: path {path:?}, attempts {attempts}, walls removed {walls}",
        size = result.grid.size(),
        path = result.path_length,
        attempts = result.attempts,
        walls = result.walls_removed,
    );
    if !result.meets_standard {
        warn!("[MazeRunner] Maze fell short of the quality standard after all attempts; playing it anyway");
    }
    bus.maze_generated(result.grid.size(), result.path_length, result.meets_standard);
    apply_grid(result.grid, grid, explored, runtime, position, heading);
}

pub struct RuntimeStatePlugin;

impl Plugin for RuntimeStatePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                restart_on_keys.run_if(resource_exists::<ButtonInput<KeyCode>>),
                submit_score_on_win,
            ),
        );
    }
}

/// 1/2/3 start a new maze at that tier; R restarts the current tier.
fn restart_on_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut grid: ResMut<MazeGrid>,
    mut explored: ResMut<ExploredMap>,
    mut runtime: ResMut<RuntimeState>,
    mut bus: ResMut<GameEventBus>,
    mut players: Query<(&mut GamePosition, &mut Heading), With<Player>>,
) {
    let requested = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(Difficulty::Easy)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(Difficulty::Normal)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(Difficulty::Hard)
    } else if keyboard.just_pressed(KeyCode::KeyR) {
        Some(runtime.difficulty)
    } else {
        None
    };
    let Some(difficulty) = requested else {
        return;
    };
    let Ok((mut position, mut heading)) = players.get_single_mut() else {
        return;
    };
    start_game(
        difficulty.grid_size(),
        &mut grid,
        &mut explored,
        &mut runtime,
        &mut bus,
        &mut position,
        &mut heading,
    );
}

/// Record the clear once per run, directly into the shared ranking store.
fn submit_score_on_win(
    mut runtime: ResMut<RuntimeState>,
    profile: Res<PlayerProfile>,
    store: Option<Res<RankingStoreHandle>>,
) {
    if runtime.phase != GamePhase::Won || runtime.score_recorded {
        return;
    }
    runtime.score_recorded = true;
    let Some(clear_time) = runtime.clear_time else {
        return;
    };
    info!(
        "[MazeRunner] CLEAR! {:.2}s on {}",
        clear_time, runtime.difficulty
    );
    if !profile.submit_scores {
        return;
    }
    let Some(store) = store else {
        return;
    };
    match store.0.write() {
        Ok(mut rankings) => {
            let row = rankings.add(&profile.name, clear_time, runtime.difficulty);
            let eligibility = rankings.rank_for(runtime.difficulty, clear_time);
            info!(
                "[MazeRunner] Recorded {:.2}s for {} (rank {} of {})",
                row.clear_time, row.player_name, eligibility.rank, eligibility.total
            );
        }
        Err(_) => warn!("[MazeRunner] Ranking store lock poisoned; score not recorded"),
    };
}
