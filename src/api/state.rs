use super::*;

/// Game state mirrored out of the ECS for the HTTP handlers.
pub(super) struct SnapshotData {
    pub grid: MazeGrid,
    pub player: PlayerState,
    pub runtime: RuntimeStateSnapshot,
    pub events: Vec<GameEvent>,
}

#[derive(Clone)]
pub(super) struct AppState {
    pub(super) sender: Sender<ApiCommand>,
    pub(super) snapshot: Arc<RwLock<SnapshotData>>,
    pub(super) rankings: Arc<RwLock<RankingStore>>,
}
