use super::*;

/// Largest grid the HTTP surface will generate in one request.
const MAX_API_MAZE_SIZE: usize = 99;

// GET /health
pub(super) async fn health() -> Json<ApiResponse<String>> {
    Json(ApiResponse::ok())
}

// GET /state
pub(super) async fn get_state(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<StateResponse>>) {
    match state.snapshot.read() {
        Ok(snap) => (
            StatusCode::OK,
            Json(ApiResponse::success(StateResponse {
                grid: GridState::from_grid(&snap.grid),
                player: snap.player.clone(),
                runtime: snap.runtime.clone(),
            })),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to read game state")),
        ),
    }
}

// GET /events
pub(super) async fn get_events(
    State(state): State<AppState>,
) -> (StatusCode, Json<ApiResponse<Vec<GameEvent>>>) {
    match state.snapshot.read() {
        Ok(snap) => (
            StatusCode::OK,
            Json(ApiResponse::success(snap.events.clone())),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to read events")),
        ),
    }
}

// POST /generate
pub(super) async fn generate_maze(
    Json(req): Json<crate::generation::GenerateRequest>,
) -> (StatusCode, Json<ApiResponse<crate::generation::QualityResult>>) {
    if req.size.is_some_and(|size| size > MAX_API_MAZE_SIZE) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "size must be at most {}",
                MAX_API_MAZE_SIZE
            ))),
        );
    }
    let result = crate::generation::generate(&req);
    (StatusCode::OK, Json(ApiResponse::success(result)))
}

// POST /game/restart
pub(super) async fn restart_game(
    State(state): State<AppState>,
    Json(req): Json<RestartRequest>,
) -> (StatusCode, Json<ApiResponse<String>>) {
    let difficulty = match req.difficulty.as_deref() {
        Some(name) => match name.parse::<Difficulty>() {
            Ok(difficulty) => Some(difficulty),
            Err(e) => return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e))),
        },
        None => None,
    };
    let size = req
        .size
        .or(difficulty.map(|d| d.grid_size()))
        .unwrap_or(crate::generation::DEFAULT_MAZE_SIZE);
    if size > MAX_API_MAZE_SIZE {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(format!(
                "size must be at most {}",
                MAX_API_MAZE_SIZE
            ))),
        );
    }

    match state.sender.send(ApiCommand::RestartGame { size }) {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok())),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("game loop is not running")),
        ),
    }
}
