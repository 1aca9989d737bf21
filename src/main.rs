#![cfg_attr(target_arch = "wasm32", allow(dead_code))]

#[cfg(not(target_arch = "wasm32"))]
mod api;
mod components;
mod difficulty;
mod events;
mod fixtures;
mod game_runtime;
mod generation;
mod input;
mod pathfinding;
mod player;
mod quality;
mod rankings;
mod raycast;
mod render;
mod tilemap;

use bevy::prelude::*;
use components::GameConfig;
use difficulty::Difficulty;
use game_runtime::{ExploredMap, PlayerProfile, RuntimeState};
use generation::Rng;
use rankings::RankingStore;
use tilemap::MazeGrid;

#[derive(serde::Deserialize, Default)]
struct StartupConfig {
    window_title: Option<String>,
    window_width: Option<f32>,
    window_height: Option<f32>,
    difficulty: Option<Difficulty>,
    maze_size: Option<usize>,
    seed: Option<u64>,
    /// Name of a fixture maze that bypasses generation (e.g. "simple").
    test_maze: Option<String>,
    player_name: Option<String>,
    submit_scores: Option<bool>,
    rankings_path: Option<String>,
    tuning: Option<GameConfig>,
}

fn load_startup_config() -> StartupConfig {
    let path = std::env::var("MAZE_RUNNER_CONFIG")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "game.json".to_string());
    match std::fs::read_to_string(&path) {
        Ok(contents) => match serde_json::from_str::<StartupConfig>(&contents) {
            Ok(cfg) => {
                println!("[MazeRunner] Loaded startup config from {}", path);
                cfg
            }
            Err(e) => {
                eprintln!("[MazeRunner] Failed to parse {}: {}", path, e);
                StartupConfig::default()
            }
        },
        Err(_) => StartupConfig::default(),
    }
}

fn initial_maze(config: &StartupConfig) -> MazeGrid {
    let fixture = match config.test_maze.as_deref() {
        Some(name) => {
            let fixture = fixtures::test_maze(name);
            if fixture.is_none() {
                eprintln!(
                    "[MazeRunner] Unknown test maze '{}'; generating instead",
                    name
                );
            }
            fixture
        }
        None => None,
    };
    if let Some(fixture) = fixture {
        println!(
            "[MazeRunner] Using fixed test maze '{}' (start {:?}, goal {:?})",
            fixture.name, fixture.start, fixture.goal
        );
        return fixture.grid();
    }

    let size = config
        .maze_size
        .or_else(|| config.difficulty.map(|d| d.grid_size()))
        .unwrap_or(generation::DEFAULT_MAZE_SIZE);
    let mut rng = match config.seed {
        Some(seed) => Rng::seeded(seed),
        None => Rng::from_entropy(),
    };
    let result = generation::generate_quality_maze(size, &mut rng);
    println!(
        "[MazeRunner] Generated {size}x{size} maze: path {path:?}, attempts {attempts}, walls removed {walls}",
        size = result.grid.size(),
        path = result.path_length,
        attempts = result.attempts,
        walls = result.walls_removed,
    );
    if !result.meets_standard {
        eprintln!(
            "[MazeRunner] Maze fell short of the quality standard after all attempts; playing it anyway"
        );
    }
    result.grid
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let headless = args.iter().any(|a| a == "--headless");

    let startup_config = load_startup_config();
    let initial_grid = initial_maze(&startup_config);

    let mut runtime = RuntimeState::default();
    runtime.start(Difficulty::from_size(initial_grid.size()));

    let profile = PlayerProfile {
        name: startup_config
            .player_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "anonymous".to_string()),
        submit_scores: startup_config.submit_scores.unwrap_or(true),
    };

    let rankings_path = startup_config
        .rankings_path
        .clone()
        .unwrap_or_else(|| "data/rankings.json".to_string());
    let rankings = RankingStore::load_or_default(rankings_path.into());

    let mut app = App::new();

    if headless {
        // Headless mode: no window, no rendering, just the game loop + API
        app.add_plugins(MinimalPlugins);
        println!("[MazeRunner] Starting in HEADLESS mode");
    } else {
        let window_title = startup_config
            .window_title
            .clone()
            .unwrap_or_else(|| "Maze Runner".to_string());
        let window_width = startup_config.window_width.unwrap_or(960.0);
        let window_height = startup_config.window_height.unwrap_or(540.0);

        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: window_title,
                resolution: (window_width, window_height).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }));
        app.insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.14)));
        app.add_plugins(render::RenderPlugin);
        println!("[MazeRunner] Starting in WINDOWED mode");
    }

    app.insert_resource(startup_config.tuning.clone().unwrap_or_default())
        .insert_resource(ExploredMap::for_grid(&initial_grid))
        .insert_resource(initial_grid)
        .insert_resource(runtime)
        .insert_resource(profile)
        .insert_resource(rankings.into_handle())
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_plugins(input::InputPlugin)
        .add_plugins(events::GameEventsPlugin)
        .add_plugins(game_runtime::RuntimeStatePlugin)
        .add_plugins(player::PlayerPlugin);

    #[cfg(not(target_arch = "wasm32"))]
    app.add_plugins(api::ApiPlugin);

    app.run();
}
