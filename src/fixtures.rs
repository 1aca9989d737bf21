use crate::tilemap::MazeGrid;

const F: u8 = 0;
const W: u8 = 1;
const G: u8 = 2;

/// Hand-authored maze that bypasses the generation pipeline, for
/// deterministic end-to-end runs. Selected via the `test_maze` startup
/// config field.
#[derive(Clone)]
pub struct TestMaze {
    pub name: &'static str,
    pub size: usize,
    pub tiles: &'static [u8],
    pub start: (usize, usize),
    pub goal: (usize, usize),
}

impl TestMaze {
    pub fn grid(&self) -> MazeGrid {
        MazeGrid::from_tiles(self.size, self.tiles.to_vec())
            .expect("fixture tile tables are size * size")
    }
}

/// `simple`: minimal 5x5 maze cleared in two steps east.
#[rustfmt::skip]
const SIMPLE: TestMaze = TestMaze {
    name: "simple",
    size: 5,
    tiles: &[
        W, W, W, W, W,
        W, F, F, G, W,
        W, W, W, W, W,
        W, W, W, W, W,
        W, W, W, W, W,
    ],
    start: (1, 1),
    goal: (3, 1),
};

pub fn test_maze(name: &str) -> Option<TestMaze> {
    match name {
        "simple" => Some(SIMPLE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::TileType;
    use crate::pathfinding::shortest_path;

    #[test]
    fn unknown_fixture_names_return_none() {
        assert!(test_maze("simple").is_some());
        assert!(test_maze("does-not-exist").is_none());
    }

    #[test]
    fn simple_fixture_matches_its_metadata() {
        let fixture = test_maze("simple").unwrap();
        let grid = fixture.grid();
        assert_eq!(grid.size(), 5);
        let (sx, sy) = fixture.start;
        assert_eq!(grid.get(sx as i32, sy as i32), TileType::Floor);
        assert_eq!(grid.goal(), Some(fixture.goal));
    }

    #[test]
    fn simple_fixture_clears_in_two_steps() {
        let grid = test_maze("simple").unwrap().grid();
        assert_eq!(shortest_path(&grid), Some(2));
    }
}
