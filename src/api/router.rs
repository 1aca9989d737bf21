use super::*;

pub(super) fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/events", get(get_events))
        .route("/generate", post(generate_maze))
        .route("/game/restart", post(restart_game))
        .route("/rankings", get(get_rankings).post(submit_ranking))
        .route("/rankings/{difficulty}/rank", get(get_rank))
        .with_state(state)
}
