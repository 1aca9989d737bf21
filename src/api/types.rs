use serde::{Deserialize, Serialize};

use crate::rankings::Ranking;
use crate::tilemap::MazeGrid;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> ApiResponse<String> {
        ApiResponse {
            ok: true,
            data: Some("ok".to_string()),
            error: None,
        }
    }
}

#[derive(Serialize)]
pub struct GridState {
    pub size: usize,
    pub tiles: Vec<u8>,
    pub start: (usize, usize),
    pub goal: Option<(usize, usize)>,
}

impl GridState {
    pub fn from_grid(grid: &MazeGrid) -> Self {
        Self {
            size: grid.size(),
            tiles: grid.tiles().to_vec(),
            start: grid.start(),
            goal: grid.goal(),
        }
    }
}

#[derive(Serialize, Clone)]
pub struct PlayerState {
    pub x: f32,
    pub y: f32,
    pub dir: f32,
    pub speed: f32,
}

#[derive(Serialize)]
pub struct StateResponse {
    pub grid: GridState,
    pub player: PlayerState,
    pub runtime: crate::game_runtime::RuntimeStateSnapshot,
}

/// Consumer-facing ranking row, camelCase like the web client expects.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingView {
    pub id: u64,
    pub player_name: String,
    pub clear_time: f32,
    pub created_at_unix_ms: u64,
}

impl From<&Ranking> for RankingView {
    fn from(row: &Ranking) -> Self {
        Self {
            id: row.id,
            player_name: row.player_name.clone(),
            clear_time: row.clear_time,
            created_at_unix_ms: row.created_at_unix_ms,
        }
    }
}

#[derive(Serialize)]
pub struct RankingsResponse {
    pub rankings: Vec<RankingView>,
}

/// Query string for `GET /rankings`. Fields arrive as strings so the
/// handlers can return precise validation errors instead of rejections.
#[derive(Deserialize)]
pub struct RankingsQuery {
    pub difficulty: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRankingRequest {
    pub player_name: Option<String>,
    pub clear_time: Option<f32>,
    pub difficulty: Option<String>,
}

#[derive(Deserialize)]
pub struct RankQuery {
    #[serde(rename = "clearTime")]
    pub clear_time: Option<f32>,
}

#[derive(Deserialize)]
pub struct RestartRequest {
    pub size: Option<usize>,
    pub difficulty: Option<String>,
}
