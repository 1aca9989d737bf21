mod router;
mod routes_game;
mod routes_rankings;
mod state;
pub mod types;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use std::sync::{Arc, RwLock};

use crate::components::{GamePosition, Heading, Player};
use crate::difficulty::Difficulty;
use crate::events::{GameEvent, GameEventBus};
use crate::game_runtime::{self, ExploredMap, RuntimeState, RuntimeStateSnapshot};
use crate::rankings::{RankEligibility, RankingStore, RankingStoreHandle};
use crate::tilemap::MazeGrid;
use router::build_router;
use routes_game::*;
use routes_rankings::*;
use state::*;
use types::*;

const DEFAULT_API_PORT: u16 = 3000;

#[derive(Debug, PartialEq)]
pub enum ApiCommand {
    RestartGame { size: usize },
}

#[derive(Resource)]
pub struct ApiChannels {
    pub receiver: Receiver<ApiCommand>,
}

#[derive(Resource, Clone)]
struct SharedSnapshot {
    data: Arc<RwLock<SnapshotData>>,
}

fn api_port() -> u16 {
    std::env::var("MAZE_RUNNER_API_PORT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_API_PORT)
}

pub struct ApiPlugin;

impl Plugin for ApiPlugin {
    fn build(&self, app: &mut App) {
        let (tx, rx) = crossbeam_channel::unbounded::<ApiCommand>();

        let initial_grid = app.world().resource::<MazeGrid>().clone();
        let rankings = app.world().resource::<RankingStoreHandle>().0.clone();
        let (start_x, start_y) = initial_grid.start();
        let snapshot = Arc::new(RwLock::new(SnapshotData {
            player: PlayerState {
                x: start_x as f32 + 0.5,
                y: start_y as f32 + 0.5,
                dir: 0.0,
                speed: 0.0,
            },
            grid: initial_grid,
            runtime: RuntimeState::default().snapshot(),
            events: Vec::new(),
        }));

        let state = AppState {
            sender: tx,
            snapshot: snapshot.clone(),
            rankings,
        };

        app.insert_resource(ApiChannels { receiver: rx })
            .insert_resource(SharedSnapshot { data: snapshot })
            .add_systems(Update, (update_snapshot, process_api_commands).chain());

        let port = api_port();
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("[MazeRunner API] Failed to start runtime: {e}");
                    return;
                }
            };
            rt.block_on(async move {
                let app = build_router(state);
                let listener = match tokio::net::TcpListener::bind(("127.0.0.1", port)).await {
                    Ok(listener) => listener,
                    Err(e) => {
                        eprintln!("[MazeRunner API] Failed to bind port {port}: {e}");
                        return;
                    }
                };
                println!("[MazeRunner API] Listening on http://127.0.0.1:{port}");
                if let Err(e) = axum::serve(listener, app).await {
                    eprintln!("[MazeRunner API] Server error: {e}");
                }
            });
        });
    }
}

/// Most recent events mirrored into the snapshot for `GET /events`.
const SNAPSHOT_EVENT_LIMIT: usize = 50;

/// Keep the shared snapshot in sync with current game state
fn update_snapshot(
    grid: Res<MazeGrid>,
    runtime: Res<RuntimeState>,
    bus: Res<GameEventBus>,
    players: Query<(&GamePosition, &Heading), With<Player>>,
    shared: Res<SharedSnapshot>,
) {
    if let Ok(mut snap) = shared.data.try_write() {
        if grid.is_changed() {
            snap.grid = grid.clone();
        }
        if bus.is_changed() {
            let skip = bus.recent.len().saturating_sub(SNAPSHOT_EVENT_LIMIT);
            snap.events = bus.recent.iter().skip(skip).cloned().collect();
        }
        if let Ok((position, heading)) = players.get_single() {
            snap.player = PlayerState {
                x: position.x,
                y: position.y,
                dir: heading.dir,
                speed: heading.speed,
            };
        }
        snap.runtime = runtime.snapshot();
    }
}

/// Apply queued HTTP commands inside the game loop
fn process_api_commands(
    channels: Res<ApiChannels>,
    mut grid: ResMut<MazeGrid>,
    mut explored: ResMut<ExploredMap>,
    mut runtime: ResMut<RuntimeState>,
    mut bus: ResMut<GameEventBus>,
    mut players: Query<(&mut GamePosition, &mut Heading), With<Player>>,
) {
    while let Ok(command) = channels.receiver.try_recv() {
        match command {
            ApiCommand::RestartGame { size } => {
                let Ok((mut position, mut heading)) = players.get_single_mut() else {
                    continue;
                };
                game_runtime::start_game(
                    size,
                    &mut grid,
                    &mut explored,
                    &mut runtime,
                    &mut bus,
                    &mut position,
                    &mut heading,
                );
            }
        }
    }
}
