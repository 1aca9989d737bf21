use crate::components::*;
use crate::events::GameEventBus;
use crate::game_runtime::{self, ExploredMap, RuntimeState};
use crate::input::VirtualInput;
use crate::tilemap::MazeGrid;
use bevy::prelude::*;

/// Look-ahead fraction of the step used for wall checks, so the player
/// stops slightly before touching a wall face.
const COLLISION_MARGIN: f32 = 0.2;

/// Sampling interval (in grid units) for goal checks along a movement step.
const GOAL_CHECK_STEP: f32 = 0.5;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_player).add_systems(
            FixedUpdate,
            (apply_movement_input, integrate_movement)
                .chain()
                .run_if(game_runtime::gameplay_systems_enabled),
        );
    }
}

/// Facing for a fresh spawn: the first open cardinal direction, checked
/// east, south, west, north.
pub fn initial_facing(grid: &MazeGrid) -> f32 {
    use std::f32::consts::{FRAC_PI_2, PI};
    let (sx, sy) = grid.start();
    let checks = [
        ((1, 0), 0.0),
        ((0, 1), FRAC_PI_2),
        ((-1, 0), PI),
        ((0, -1), 3.0 * FRAC_PI_2),
    ];
    for ((dx, dy), dir) in checks {
        if grid.get(sx as i32 + dx, sy as i32 + dy).is_passable() {
            return dir;
        }
    }
    0.0
}

fn spawn_player(mut commands: Commands, grid: Res<MazeGrid>) {
    let (sx, sy) = grid.start();
    commands.spawn((
        Player,
        GamePosition {
            x: sx as f32 + 0.5,
            y: sy as f32 + 0.5,
        },
        Heading {
            dir: initial_facing(&grid),
            speed: 0.0,
        },
    ));
}

fn apply_movement_input(
    vinput: Res<VirtualInput>,
    config: Res<GameConfig>,
    mut players: Query<&mut Heading, With<Player>>,
) {
    let Ok(mut heading) = players.get_single_mut() else {
        return;
    };
    heading.speed = if vinput.pressed("forward") {
        config.move_speed
    } else if vinput.pressed("backward") {
        -config.move_speed
    } else {
        0.0
    };
    if vinput.just_pressed("turn_left") {
        heading.dir -= config.rotation_step;
    }
    if vinput.just_pressed("turn_right") {
        heading.dir += config.rotation_step;
    }
}

fn integrate_movement(
    grid: Res<MazeGrid>,
    mut explored: ResMut<ExploredMap>,
    mut runtime: ResMut<RuntimeState>,
    mut bus: ResMut<GameEventBus>,
    mut players: Query<(&mut GamePosition, &Heading), With<Player>>,
) {
    let Ok((mut position, heading)) = players.get_single_mut() else {
        return;
    };
    let outcome = step_player(&grid, &mut position, heading, &mut explored);
    if outcome.reached_goal {
        let clear_time = runtime.win();
        bus.goal_reached(clear_time);
    }
}

pub struct StepOutcome {
    pub moved: bool,
    pub reached_goal: bool,
}

/// One movement tick: advance along the facing direction unless the
/// look-ahead point lands in a wall, nudge back to the corridor center when
/// hugging a side wall, mark the cell explored, then check the whole
/// movement segment for a goal crossing.
pub fn step_player(
    grid: &MazeGrid,
    position: &mut GamePosition,
    heading: &Heading,
    explored: &mut ExploredMap,
) -> StepOutcome {
    let prev_x = position.x;
    let prev_y = position.y;
    let (sin, cos) = heading.dir.sin_cos();
    let step = heading.speed;

    let mut moved = false;
    let check_x = position.x + cos * step * (1.0 + COLLISION_MARGIN);
    let check_y = position.y + sin * step * (1.0 + COLLISION_MARGIN);
    if grid.get_at(check_x, check_y) != TileType::Wall {
        position.x += cos * step;
        position.y += sin * step;
        moved = true;

        // centering: when a side wall is adjacent, keep to the middle of the
        // corridor instead of scraping along the wall face
        let cell_x = position.x.floor();
        let cell_y = position.y.floor();
        let offset_x = position.x - cell_x;
        let offset_y = position.y - cell_y;
        let left_wall = grid.get(cell_x as i32 - 1, cell_y as i32) == TileType::Wall;
        let right_wall = grid.get(cell_x as i32 + 1, cell_y as i32) == TileType::Wall;
        let top_wall = grid.get(cell_x as i32, cell_y as i32 - 1) == TileType::Wall;
        let bottom_wall = grid.get(cell_x as i32, cell_y as i32 + 1) == TileType::Wall;

        if (left_wall && offset_x < 0.5) || (right_wall && offset_x > 0.5) {
            position.x = cell_x + 0.5;
        }
        if (top_wall && offset_y < 0.5) || (bottom_wall && offset_y > 0.5) {
            position.y = cell_y + 0.5;
        }

        explored.mark(position.x.floor() as i32, position.y.floor() as i32);
    }

    let reached_goal = goal_crossed(grid, prev_x, prev_y, position.x, position.y);
    StepOutcome { moved, reached_goal }
}

/// Whether the segment from `(x0, y0)` to `(x1, y1)` passes through the
/// goal cell. Endpoints are checked first, then interpolated samples, so a
/// large step cannot tunnel across the goal.
pub fn goal_crossed(grid: &MazeGrid, x0: f32, y0: f32, x1: f32, y1: f32) -> bool {
    if grid.get_at(x0, y0) == TileType::Goal || grid.get_at(x1, y1) == TileType::Goal {
        return true;
    }
    if x0.floor() == x1.floor() && y0.floor() == y1.floor() {
        return false;
    }

    let distance = (x1 - x0).hypot(y1 - y0);
    // at least one interior sample even for sub-step moves across a boundary
    let num_checks = ((distance / GOAL_CHECK_STEP).ceil() as i32).max(2);
    for i in 1..num_checks {
        let t = i as f32 / num_checks as f32;
        let x = x0 + (x1 - x0) * t;
        let y = y0 + (y1 - y0) * t;
        if grid.get_at(x, y) == TileType::Goal {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test_maze;
    use crate::pathfinding::grid_from_rows;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn explored_for(grid: &MazeGrid) -> ExploredMap {
        ExploredMap::for_grid(grid)
    }

    #[test]
    fn spawn_faces_the_first_open_direction() {
        // simple fixture opens to the east
        let grid = test_maze("simple").unwrap().grid();
        assert_eq!(initial_facing(&grid), 0.0);

        // corridor running south from the start
        let grid = grid_from_rows(&[
            "#####", //
            "#.###", //
            "#.###", //
            "#.#G#", //
            "#####",
        ]);
        assert_eq!(initial_facing(&grid), FRAC_PI_2);
    }

    #[test]
    fn walking_into_a_wall_is_rejected() {
        let grid = grid_from_rows(&[
            "#####", //
            "#..##", //
            "#####", //
            "#####", //
            "#####",
        ]);
        let mut explored = explored_for(&grid);
        let mut position = GamePosition { x: 2.5, y: 1.5 };
        // a step long enough that the look-ahead point lands inside the wall
        let heading = Heading {
            dir: 0.0,
            speed: 0.45,
        };
        let outcome = step_player(&grid, &mut position, &heading, &mut explored);
        assert!(!outcome.moved);
        assert_eq!((position.x, position.y), (2.5, 1.5));
    }

    #[test]
    fn centering_keeps_the_player_off_side_walls() {
        let grid = test_maze("simple").unwrap().grid();
        let mut explored = explored_for(&grid);
        // drifting north inside the corridor; the wall above forces the
        // player back to the corridor center line
        let mut position = GamePosition { x: 1.5, y: 1.5 };
        let heading = Heading {
            dir: 3.0 * FRAC_PI_2,
            speed: 0.1,
        };
        let outcome = step_player(&grid, &mut position, &heading, &mut explored);
        assert!(outcome.moved);
        assert_eq!(position.y, 1.5);
        assert!((position.x - 1.5).abs() < 1e-4);
    }

    #[test]
    fn forward_movement_marks_cells_explored() {
        let grid = test_maze("simple").unwrap().grid();
        let mut explored = explored_for(&grid);
        let mut position = GamePosition { x: 1.9, y: 1.5 };
        let heading = Heading {
            dir: 0.0,
            speed: 0.1,
        };
        assert!(!explored.is_explored(2, 1));
        let outcome = step_player(&grid, &mut position, &heading, &mut explored);
        assert!(outcome.moved);
        assert!(explored.is_explored(2, 1));
    }

    #[test]
    fn reaching_the_goal_cell_wins() {
        let grid = test_maze("simple").unwrap().grid();
        let mut explored = explored_for(&grid);
        let mut position = GamePosition { x: 2.9, y: 1.5 };
        let heading = Heading {
            dir: 0.0,
            speed: 0.1,
        };
        // walk east until the goal cell at x=3 is entered
        let mut reached = false;
        for _ in 0..5 {
            if step_player(&grid, &mut position, &heading, &mut explored).reached_goal {
                reached = true;
                break;
            }
        }
        assert!(reached);
    }

    #[test]
    fn goal_crossing_is_detected_mid_segment() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.G.#", //
            "#####", //
            "#####", //
            "#####",
        ]);
        // segment endpoints sit on floors either side of the goal
        assert!(goal_crossed(&grid, 1.5, 1.5, 3.5, 1.5));
        assert!(!goal_crossed(&grid, 1.5, 1.5, 1.6, 1.5));
    }

    #[test]
    fn backward_movement_works_against_the_facing() {
        let grid = test_maze("simple").unwrap().grid();
        let mut explored = explored_for(&grid);
        let mut position = GamePosition { x: 2.5, y: 1.5 };
        // facing east but walking backwards, ends up further west
        let heading = Heading {
            dir: 0.0,
            speed: -0.1,
        };
        let outcome = step_player(&grid, &mut position, &heading, &mut explored);
        assert!(outcome.moved);
        assert!(position.x < 2.5);
    }

    #[test]
    fn standing_still_neither_moves_nor_wins() {
        let grid = test_maze("simple").unwrap().grid();
        let mut explored = explored_for(&grid);
        let mut position = GamePosition { x: 1.5, y: 1.5 };
        let heading = Heading {
            dir: PI,
            speed: 0.0,
        };
        let outcome = step_player(&grid, &mut position, &heading, &mut explored);
        assert!((position.x, position.y) == (1.5, 1.5));
        assert!(!outcome.reached_goal);
        // standing still still counts as a (zero-length) successful step
        assert!(outcome.moved);
    }
}
