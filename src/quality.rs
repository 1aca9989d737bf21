use crate::components::TileType;
use crate::generation::Rng;
use crate::tilemap::MazeGrid;

const NEIGHBORS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

/// Reference scale for the quality threshold: corner-to-corner distance.
pub fn diagonal_distance(size: usize) -> f32 {
    size.saturating_sub(1) as f32 * std::f32::consts::SQRT_2
}

/// The single acceptance criterion the generation pipeline optimizes toward:
/// the shortest path must cover at least `threshold` of the grid diagonal.
pub fn meets_quality_standard(path_length: u32, size: usize, threshold: f32) -> bool {
    path_length as f32 >= diagonal_distance(size) * threshold
}

/// Interior wall cells adjacent to two or more passable cells. Opening one
/// joins two corridor branches, creating a loop.
pub fn removable_walls(grid: &MazeGrid) -> Vec<(i32, i32)> {
    let size = grid.size() as i32;
    let mut walls = Vec::new();
    for y in 1..size - 1 {
        for x in 1..size - 1 {
            if grid.get(x, y) != TileType::Wall {
                continue;
            }
            let open_neighbors = NEIGHBORS
                .iter()
                .filter(|(dx, dy)| grid.get(x + dx, y + dy).is_passable())
                .count();
            if open_neighbors >= 2 {
                walls.push((x, y));
            }
        }
    }
    walls
}

/// Open up to `count` randomly chosen removable walls on a copy of the grid.
/// The input grid is never mutated; with no candidates the copy is returned
/// unchanged.
pub fn remove_random_walls(grid: &MazeGrid, count: usize, rng: &mut Rng) -> MazeGrid {
    let mut repaired = grid.clone();
    let mut candidates = removable_walls(&repaired);
    if candidates.is_empty() {
        return repaired;
    }
    rng.shuffle(&mut candidates);
    for &(x, y) in candidates.iter().take(count) {
        repaired.set(x, y, TileType::Floor);
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinding::grid_from_rows;

    #[test]
    fn quality_standard_boundary_at_half_diagonal() {
        // diagonal(11) ~= 14.14, half ~= 7.07
        assert!(meets_quality_standard(8, 11, 0.5));
        assert!(!meets_quality_standard(7, 11, 0.5));
    }

    #[test]
    fn removable_walls_require_two_open_neighbors() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.#.#", //
            "#.#.#", //
            "#.#G#", //
            "#####",
        ]);
        // the column at x=2 separates two corridors; its interior cells all
        // touch passable cells on both sides
        let walls = removable_walls(&grid);
        assert_eq!(walls, vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn dead_end_walls_are_not_removable() {
        let grid = grid_from_rows(&[
            "#####", //
            "#..G#", //
            "#####", //
            "#####", //
            "#####",
        ]);
        // every interior wall below the corridor touches at most one floor
        assert!(removable_walls(&grid).is_empty());
    }

    #[test]
    fn remove_random_walls_never_mutates_the_input() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.#.#", //
            "#.#.#", //
            "#.#G#", //
            "#####",
        ]);
        let before = grid.clone();
        let mut rng = Rng::seeded(7);
        let repaired = remove_random_walls(&grid, 1, &mut rng);
        assert_eq!(grid, before);

        // exactly one Wall->Floor transition, nothing else changed
        let mut changed = Vec::new();
        for y in 0..5 {
            for x in 0..5 {
                if grid.get(x, y) != repaired.get(x, y) {
                    assert_eq!(grid.get(x, y), crate::components::TileType::Wall);
                    assert_eq!(repaired.get(x, y), crate::components::TileType::Floor);
                    changed.push((x, y));
                }
            }
        }
        assert_eq!(changed.len(), 1);
    }

    #[test]
    fn removal_count_caps_to_available_candidates() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.#.#", //
            "#.#.#", //
            "#.#G#", //
            "#####",
        ]);
        let mut rng = Rng::seeded(3);
        let repaired = remove_random_walls(&grid, 99, &mut rng);
        // all three candidates opened, no other cell touched
        assert!(removable_walls(&repaired).is_empty());
        assert_eq!(repaired.get(2, 1), crate::components::TileType::Floor);
        assert_eq!(repaired.get(2, 2), crate::components::TileType::Floor);
        assert_eq!(repaired.get(2, 3), crate::components::TileType::Floor);
    }

    #[test]
    fn grid_without_candidates_comes_back_unchanged() {
        let grid = grid_from_rows(&[
            "#####", //
            "#..G#", //
            "#####", //
            "#####", //
            "#####",
        ]);
        let mut rng = Rng::seeded(11);
        assert_eq!(remove_random_walls(&grid, 2, &mut rng), grid);
    }
}
