use super::*;

const DIFFICULTY_PARAM_ERROR: &str =
    "difficulty parameter is required and must be one of 'easy', 'normal', or 'hard'";
const DIFFICULTY_FIELD_ERROR: &str =
    "difficulty is required and must be one of 'easy', 'normal', or 'hard'";

fn parse_difficulty(value: Option<&str>) -> Option<Difficulty> {
    value.and_then(|v| v.parse().ok())
}

// GET /rankings?difficulty=easy&limit=10
pub(super) async fn get_rankings(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<RankingsQuery>,
) -> (StatusCode, Json<ApiResponse<RankingsResponse>>) {
    let Some(difficulty) = parse_difficulty(params.difficulty.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(DIFFICULTY_PARAM_ERROR)),
        );
    };
    let limit = params.limit.unwrap_or(10);
    if limit <= 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("limit must be a positive number")),
        );
    }

    match state.rankings.read() {
        Ok(store) => {
            let rankings = store
                .top(difficulty, limit as usize)
                .iter()
                .map(RankingView::from)
                .collect();
            (
                StatusCode::OK,
                Json(ApiResponse::success(RankingsResponse { rankings })),
            )
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to get rankings")),
        ),
    }
}

// POST /rankings
pub(super) async fn submit_ranking(
    State(state): State<AppState>,
    Json(req): Json<SubmitRankingRequest>,
) -> (StatusCode, Json<ApiResponse<RankingView>>) {
    let player_name = match req.player_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "playerName is required and must be a non-empty string",
                )),
            )
        }
    };
    let clear_time = match req.clear_time {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(
                    "clearTime is required and must be a positive number",
                )),
            )
        }
    };
    let Some(difficulty) = parse_difficulty(req.difficulty.as_deref()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(DIFFICULTY_FIELD_ERROR)),
        );
    };

    match state.rankings.write() {
        Ok(mut store) => {
            let row = store.add(&player_name, clear_time, difficulty);
            (
                StatusCode::CREATED,
                Json(ApiResponse::success(RankingView::from(&row))),
            )
        }
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to add ranking")),
        ),
    }
}

// GET /rankings/{difficulty}/rank?clearTime=12.34
pub(super) async fn get_rank(
    State(state): State<AppState>,
    axum::extract::Path(difficulty): axum::extract::Path<String>,
    axum::extract::Query(params): axum::extract::Query<RankQuery>,
) -> (StatusCode, Json<ApiResponse<RankEligibility>>) {
    let Ok(difficulty) = difficulty.parse::<Difficulty>() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(DIFFICULTY_PARAM_ERROR)),
        );
    };
    let clear_time = match params.clear_time {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("clearTime must be a positive number")),
            )
        }
    };

    match state.rankings.read() {
        Ok(store) => (
            StatusCode::OK,
            Json(ApiResponse::success(store.rank_for(difficulty, clear_time))),
        ),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Failed to check rank eligibility")),
        ),
    }
}
