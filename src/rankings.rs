use crate::difficulty::Difficulty;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Board depth: times ranked inside this many places are "eligible".
pub const RANKING_DISPLAY_LIMIT: usize = 10;

const FILE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Ranking {
    pub id: u64,
    pub player_name: String,
    /// Clear time in seconds, centisecond precision.
    pub clear_time: f32,
    pub created_at_unix_ms: u64,
}

#[derive(Serialize, Clone, PartialEq, Debug)]
pub struct RankEligibility {
    /// 1-based position this time would take on the board.
    pub rank: usize,
    pub total: usize,
    pub eligible: bool,
}

#[derive(Serialize, Deserialize, Clone)]
struct RankingsFile {
    version: u32,
    next_id: u64,
    rankings: HashMap<Difficulty, Vec<Ranking>>,
}

impl Default for RankingsFile {
    fn default() -> Self {
        Self {
            version: FILE_VERSION,
            next_id: 1,
            rankings: HashMap::new(),
        }
    }
}

/// Per-difficulty clear-time board, kept sorted ascending, persisted as a
/// JSON file when a path is configured.
pub struct RankingStore {
    path: Option<PathBuf>,
    data: RankingsFile,
}

/// Shared handle: the win system writes scores, the HTTP routes read and
/// write through the same store.
#[derive(Resource, Clone)]
pub struct RankingStoreHandle(pub Arc<RwLock<RankingStore>>);

impl RankingStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RankingsFile::default(),
        }
    }

    /// Load the store from disk; a missing file starts empty, a corrupt one
    /// is logged and replaced rather than aborting startup.
    pub fn load_or_default(path: PathBuf) -> Self {
        let data = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RankingsFile>(&contents) {
                Ok(data) => data,
                Err(e) => {
                    warn!(
                        "[MazeRunner] Rankings file {} is unreadable ({}); starting empty",
                        path.display(),
                        e
                    );
                    RankingsFile::default()
                }
            },
            Err(_) => RankingsFile::default(),
        };
        Self {
            path: Some(path),
            data,
        }
    }

    pub fn into_handle(self) -> RankingStoreHandle {
        RankingStoreHandle(Arc::new(RwLock::new(self)))
    }

    fn persist(&self) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let serialized = match serde_json::to_string_pretty(&self.data) {
            Ok(s) => s,
            Err(e) => {
                warn!("[MazeRunner] Failed to serialize rankings: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(path, serialized) {
            warn!(
                "[MazeRunner] Failed to write rankings to {}: {}",
                path.display(),
                e
            );
        }
    }

    /// Insert a clear time, keeping the board sorted (ties keep insertion
    /// order, matching first-come-first-ranked).
    pub fn add(&mut self, player_name: &str, clear_time: f32, difficulty: Difficulty) -> Ranking {
        let row = Ranking {
            id: self.data.next_id,
            player_name: player_name.to_string(),
            clear_time,
            created_at_unix_ms: unix_millis(),
        };
        self.data.next_id += 1;

        let board = self.data.rankings.entry(difficulty).or_default();
        let position = board.partition_point(|r| r.clear_time <= clear_time);
        board.insert(position, row.clone());
        self.persist();
        row
    }

    /// Best `limit` times for a difficulty, fastest first.
    pub fn top(&self, difficulty: Difficulty, limit: usize) -> Vec<Ranking> {
        self.data
            .rankings
            .get(&difficulty)
            .map(|board| board.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Where a hypothetical time would land: one place below every strictly
    /// faster stored time.
    pub fn rank_for(&self, difficulty: Difficulty, clear_time: f32) -> RankEligibility {
        let board = self.data.rankings.get(&difficulty);
        let total = board.map_or(0, |b| b.len());
        let better = board.map_or(0, |b| {
            b.iter().filter(|r| r.clear_time < clear_time).count()
        });
        let rank = better + 1;
        RankEligibility {
            rank,
            total,
            eligible: rank <= RANKING_DISPLAY_LIMIT,
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boards_stay_sorted_fastest_first() {
        let mut store = RankingStore::in_memory();
        store.add("cass", 30.5, Difficulty::Easy);
        store.add("ripley", 12.25, Difficulty::Easy);
        store.add("dallas", 19.0, Difficulty::Easy);

        let top = store.top(Difficulty::Easy, 10);
        let names: Vec<&str> = top.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(names, vec!["ripley", "dallas", "cass"]);
        assert_eq!(store.top(Difficulty::Easy, 2).len(), 2);
    }

    #[test]
    fn difficulties_keep_separate_boards() {
        let mut store = RankingStore::in_memory();
        store.add("ripley", 12.0, Difficulty::Easy);
        store.add("lambert", 40.0, Difficulty::Hard);
        assert_eq!(store.top(Difficulty::Easy, 10).len(), 1);
        assert_eq!(store.top(Difficulty::Hard, 10).len(), 1);
        assert!(store.top(Difficulty::Normal, 10).is_empty());
    }

    #[test]
    fn ids_are_unique_and_increasing() {
        let mut store = RankingStore::in_memory();
        let a = store.add("a", 10.0, Difficulty::Easy);
        let b = store.add("b", 5.0, Difficulty::Normal);
        assert!(b.id > a.id);
    }

    #[test]
    fn rank_counts_strictly_faster_times() {
        let mut store = RankingStore::in_memory();
        assert_eq!(
            store.rank_for(Difficulty::Normal, 10.0),
            RankEligibility {
                rank: 1,
                total: 0,
                eligible: true
            }
        );
        store.add("a", 8.0, Difficulty::Normal);
        store.add("b", 10.0, Difficulty::Normal);
        store.add("c", 12.0, Difficulty::Normal);
        // a tie does not push the queried time down a place
        let eligibility = store.rank_for(Difficulty::Normal, 10.0);
        assert_eq!(eligibility.rank, 2);
        assert_eq!(eligibility.total, 3);
        assert!(eligibility.eligible);
    }

    #[test]
    fn eleventh_place_is_not_eligible() {
        let mut store = RankingStore::in_memory();
        for i in 0..RANKING_DISPLAY_LIMIT {
            store.add("runner", 10.0 + i as f32, Difficulty::Easy);
        }
        assert!(!store.rank_for(Difficulty::Easy, 99.0).eligible);
        assert!(store.rank_for(Difficulty::Easy, 5.0).eligible);
    }

    #[test]
    fn rankings_survive_a_reload() {
        let path = std::env::temp_dir().join(format!(
            "maze-runner-rankings-test-{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let mut store = RankingStore::load_or_default(path.clone());
        store.add("ripley", 12.25, Difficulty::Hard);
        store.add("dallas", 19.0, Difficulty::Hard);
        drop(store);

        let reloaded = RankingStore::load_or_default(path.clone());
        let top = reloaded.top(Difficulty::Hard, 10);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player_name, "ripley");
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_files_start_empty_instead_of_failing() {
        let path = std::env::temp_dir().join(format!(
            "maze-runner-rankings-corrupt-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json at all").unwrap();
        let store = RankingStore::load_or_default(path.clone());
        assert!(store.top(Difficulty::Easy, 10).is_empty());
        let _ = std::fs::remove_file(&path);
    }
}
