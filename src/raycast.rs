use crate::components::TileType;
use crate::tilemap::MazeGrid;

pub const RAY_COUNT: usize = 320;
pub const MAX_RAY_DISTANCE: f32 = 30.0;
pub const RAY_STEP: f32 = 0.05;
pub const SHADOW_DISTANCE_FACTOR: f32 = 10.0;
pub const FIELD_OF_VIEW: f32 = std::f32::consts::FRAC_PI_3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    /// `Wall` or `Goal` for a blocking tile; `Floor` when the ray ran out of
    /// range without hitting anything.
    pub tile: TileType,
}

/// Angle of the `index`-th view column for a player facing `dir`.
pub fn ray_angle(dir: f32, index: usize) -> f32 {
    dir - FIELD_OF_VIEW / 2.0 + (index as f32 / RAY_COUNT as f32) * FIELD_OF_VIEW
}

/// March a ray in fixed steps until it enters a blocking tile.
/// Out-of-bounds cells read as Wall, so rays cannot escape the grid.
pub fn march_ray(grid: &MazeGrid, origin_x: f32, origin_y: f32, angle: f32) -> RayHit {
    let (sin, cos) = angle.sin_cos();
    let mut distance = 0.0;
    while distance < MAX_RAY_DISTANCE {
        distance += RAY_STEP;
        let tile = grid.get_at(origin_x + cos * distance, origin_y + sin * distance);
        if !tile.is_passable() || tile == TileType::Goal {
            return RayHit { distance, tile };
        }
    }
    RayHit {
        distance: MAX_RAY_DISTANCE,
        tile: TileType::Floor,
    }
}

/// Remove the fisheye bulge by projecting the hit distance onto the facing
/// direction, clamped so near walls cannot blow the slice height up.
pub fn corrected_distance(hit_distance: f32, ray_angle: f32, facing: f32, min_distance: f32) -> f32 {
    (hit_distance * (ray_angle - facing).cos()).max(min_distance)
}

/// Distance shading: 1.0 up close fading to 0.0 at the shadow horizon.
pub fn brightness(corrected: f32) -> f32 {
    1.0 - (corrected / SHADOW_DISTANCE_FACTOR).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test_maze;

    #[test]
    fn ray_east_hits_the_goal_slice() {
        let grid = test_maze("simple").unwrap().grid();
        // player mid-cell at (1.5, 1.5); goal cell starts at x=3.0
        let hit = march_ray(&grid, 1.5, 1.5, 0.0);
        assert_eq!(hit.tile, TileType::Goal);
        assert!((hit.distance - 1.5).abs() < 2.0 * RAY_STEP, "{}", hit.distance);
    }

    #[test]
    fn ray_west_hits_the_border_wall() {
        let grid = test_maze("simple").unwrap().grid();
        let hit = march_ray(&grid, 1.5, 1.5, std::f32::consts::PI);
        assert_eq!(hit.tile, TileType::Wall);
        assert!((hit.distance - 0.5).abs() < 2.0 * RAY_STEP, "{}", hit.distance);
    }

    #[test]
    fn unobstructed_ray_runs_out_of_range() {
        let grid = MazeGrid::filled(40, TileType::Floor);
        let hit = march_ray(&grid, 1.5, 1.5, 0.0);
        assert_eq!(hit.tile, TileType::Floor);
        assert_eq!(hit.distance, MAX_RAY_DISTANCE);
    }

    #[test]
    fn column_angles_sweep_the_field_of_view() {
        let first = ray_angle(0.0, 0);
        let last = ray_angle(0.0, RAY_COUNT - 1);
        assert!((first + FIELD_OF_VIEW / 2.0).abs() < 1e-5);
        assert!(last < FIELD_OF_VIEW / 2.0);
        assert!(ray_angle(0.0, RAY_COUNT / 2) >= first && ray_angle(0.0, RAY_COUNT / 2) <= last + 1e-5);
    }

    #[test]
    fn fisheye_correction_shortens_oblique_rays() {
        let straight = corrected_distance(10.0, 0.0, 0.0, 0.3);
        let oblique = corrected_distance(10.0, FIELD_OF_VIEW / 2.0, 0.0, 0.3);
        assert_eq!(straight, 10.0);
        assert!(oblique < straight);
        // clamp floor
        assert_eq!(corrected_distance(0.01, 0.0, 0.0, 0.3), 0.3);
    }

    #[test]
    fn brightness_fades_with_distance() {
        assert!(brightness(0.5) > brightness(5.0));
        assert_eq!(brightness(SHADOW_DISTANCE_FACTOR), 0.0);
        assert_eq!(brightness(SHADOW_DISTANCE_FACTOR * 3.0), 0.0);
    }
}
