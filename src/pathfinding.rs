use crate::components::TileType;
use crate::tilemap::{MazeGrid, START_CELL};
use std::collections::VecDeque;

/// Search order: up, right, down, left
const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Shortest path (in hops) from the fixed start cell to the goal.
pub fn shortest_path(grid: &MazeGrid) -> Option<u32> {
    shortest_path_from(grid, START_CELL.0 as i32, START_CELL.1 as i32)
}

/// Breadth-first search over 4-connected passable cells.
///
/// Returns the hop count to the first goal reached, or `None` when the grid
/// is empty, the start is out of bounds or a wall, or no goal is reachable.
/// Cells are marked visited when enqueued so nothing is enqueued twice and
/// the first goal dequeued is at minimal distance.
pub fn shortest_path_from(grid: &MazeGrid, start_x: i32, start_y: i32) -> Option<u32> {
    let size = grid.size();
    if size == 0 {
        return None;
    }
    if !grid.in_bounds(start_x, start_y) || grid.is_wall(start_x, start_y) {
        return None;
    }

    let mut visited = vec![false; size * size];
    let mut queue: VecDeque<(i32, i32, u32)> = VecDeque::new();
    visited[start_y as usize * size + start_x as usize] = true;
    queue.push_back((start_x, start_y, 0));

    while let Some((x, y, distance)) = queue.pop_front() {
        if grid.get(x, y) == TileType::Goal {
            return Some(distance);
        }
        for (dx, dy) in DIRECTIONS {
            let nx = x + dx;
            let ny = y + dy;
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let index = ny as usize * size + nx as usize;
            if visited[index] || grid.is_wall(nx, ny) {
                continue;
            }
            visited[index] = true;
            queue.push_back((nx, ny, distance + 1));
        }
    }

    None
}

#[cfg(test)]
pub(crate) fn grid_from_rows(rows: &[&str]) -> MazeGrid {
    let size = rows.len();
    let mut grid = MazeGrid::filled(size, TileType::Wall);
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), size, "grid rows must be square");
        for (x, ch) in row.chars().enumerate() {
            let tile = match ch {
                '#' => TileType::Wall,
                '.' => TileType::Floor,
                'G' => TileType::Goal,
                other => panic!("unknown tile char {:?}", other),
            };
            grid.set(x as i32, y as i32, tile);
        }
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_corridor_to_goal() {
        let grid = grid_from_rows(&[
            "#####", //
            "#..G#", //
            "#####", //
            "#####", //
            "#####",
        ]);
        assert_eq!(shortest_path(&grid), Some(2));
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let grid = grid_from_rows(&[
            "#####", //
            "#..##", //
            "###G#", //
            "#####", //
            "#####",
        ]);
        assert_eq!(shortest_path(&grid), None);
    }

    #[test]
    fn start_on_wall_or_out_of_bounds_fails() {
        let grid = grid_from_rows(&[
            "#####", //
            "#..G#", //
            "#####", //
            "#####", //
            "#####",
        ]);
        assert_eq!(shortest_path_from(&grid, 0, 0), None);
        assert_eq!(shortest_path_from(&grid, -1, 1), None);
        assert_eq!(shortest_path_from(&grid, 1, 9), None);
    }

    #[test]
    fn takes_the_shorter_of_two_routes() {
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "#.#.#", //
            "#G..#", //
            "#####",
        ]);
        // straight down is 2 hops; the loop around (3,1) would be 6
        assert_eq!(shortest_path(&grid), Some(2));
    }

    #[test]
    fn multiple_goals_return_nearest_without_crashing() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.G.#", //
            "#...#", //
            "#..G#", //
            "#####",
        ]);
        assert_eq!(shortest_path(&grid), Some(1));
    }

    #[test]
    fn no_goal_terminates_with_none() {
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "#...#", //
            "#...#", //
            "#####",
        ]);
        assert_eq!(shortest_path(&grid), None);
    }

    #[test]
    fn goal_on_start_cell_is_distance_zero() {
        let mut grid = MazeGrid::filled(5, TileType::Wall);
        grid.set(1, 1, TileType::Goal);
        assert_eq!(shortest_path(&grid), Some(0));
    }
}
