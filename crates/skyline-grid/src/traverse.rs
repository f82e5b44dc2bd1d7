//! Walking a ray through the grid.

use std::iter::FusedIterator;

use skyline_geom::intersect::intersect_aabb;
use skyline_geom::{Aabb, Ray};
use skyline_math::{IVec2, Tolerance};

use crate::{BuiltGrid, Grid};

/// Nearest box struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the box in the scene's box list.
    pub box_index: u32,
    /// Distance along the ray, in world units.
    pub distance: f32,
}

impl Hit {
    fn beats(&self, other: Option<Hit>) -> bool {
        match other {
            None => true,
            Some(best) => {
                self.distance < best.distance
                    || (self.distance == best.distance && self.box_index < best.box_index)
            }
        }
    }
}

/// One cell visited by a [`CellWalk`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStep {
    /// Cell coordinates, always inside the grid.
    pub cell: IVec2,
    /// Distance along the ray to where it leaves the cell. Infinite if the
    /// ray never leaves (vertical rays).
    pub exit: f32,
}

/// Iterator over the cells a ray passes through, nearest first.
///
/// Starts in the cell holding the ray origin, or the cell where the ray
/// enters the grid's footprint if the origin lies outside it, and ends when
/// the ray leaves the grid. The walk takes at most `max.x + max.y + 2` steps.
#[derive(Debug, Clone)]
pub struct CellWalk<'a> {
    grid: &'a Grid,
    ray: Ray,
    cell: Option<IVec2>,
    steps_left: usize,
}

impl<'a> CellWalk<'a> {
    /// Begin walking `ray` through `grid`.
    pub fn new(grid: &'a Grid, ray: &Ray) -> Self {
        let steps_left = (grid.max.x + grid.max.y + 2).max(0) as usize;
        Self {
            grid,
            ray: *ray,
            cell: entry_cell(grid, ray),
            steps_left,
        }
    }
}

fn entry_cell(grid: &Grid, ray: &Ray) -> Option<IVec2> {
    let start = grid.position_to_cell(&ray.origin);
    if grid.contains_cell(&start) {
        return Some(start);
    }

    let t = grid.entry_distance(ray)?;
    let nudge = Tolerance::CELL_STEP * grid.cell_size.min();
    let cell = grid.position_to_cell(&ray.at(t + nudge));
    // A ray grazing the footprint can round to just outside it
    Some(IVec2::new(
        cell.x.clamp(0, grid.max.x - 1),
        cell.y.clamp(0, grid.max.y - 1),
    ))
}

impl Iterator for CellWalk<'_> {
    type Item = CellStep;

    fn next(&mut self) -> Option<CellStep> {
        let cell = self.cell?;
        if self.steps_left == 0 {
            self.cell = None;
            return None;
        }
        self.steps_left -= 1;

        let exit = self.grid.cell_exit(&self.ray, &cell);
        let mut next = self.grid.next_cell(&self.ray, &cell);
        if next == cell {
            next = self.grid.step_across(&self.ray, &cell);
        }
        self.cell = self.grid.contains_cell(&next).then_some(next);

        Some(CellStep { cell, exit })
    }
}

impl FusedIterator for CellWalk<'_> {}

impl BuiltGrid {
    /// Cells `ray` passes through, nearest first.
    pub fn traverse(&self, ray: &Ray) -> CellWalk<'_> {
        CellWalk::new(self.grid(), ray)
    }

    /// Find the nearest box `ray` strikes, visiting only the cells it
    /// passes through.
    ///
    /// `boxes` must be the list the grid was built from. Returns the same
    /// hit as [`scan_closest`] with no distance limit.
    pub fn trace_closest(&self, boxes: &[Aabb], ray: &Ray) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for step in self.traverse(ray) {
            for &box_index in self.cell_boxes(&step.cell) {
                let Some(aabb) = boxes.get(box_index as usize) else {
                    continue;
                };
                if let Some(distance) = intersect_aabb(ray, aabb) {
                    let hit = Hit {
                        box_index,
                        distance,
                    };
                    if hit.beats(best) {
                        best = Some(hit);
                    }
                }
            }

            // Anything closer would have been listed in a cell already visited
            if best.is_some_and(|hit| hit.distance <= step.exit) {
                break;
            }
        }
        best
    }
}

/// Nearest box `ray` strikes closer than `limit`, testing every box.
///
/// On equal distances the lower index wins.
pub fn scan_closest(boxes: &[Aabb], ray: &Ray, limit: f32) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for (i, aabb) in boxes.iter().enumerate() {
        let Some(distance) = intersect_aabb(ray, aabb) else {
            continue;
        };
        if distance >= limit {
            continue;
        }
        let hit = Hit {
            box_index: i as u32,
            distance,
        };
        if hit.beats(best) {
            best = Some(hit);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_grid;
    use approx::assert_relative_eq;
    use skyline_math::{Vec2, Vec3};

    fn unit_grid() -> Grid {
        Grid::new(Vec2::zeros(), Vec2::new(1.0, 1.0), IVec2::new(4, 4)).unwrap()
    }

    fn ray(origin: [f32; 3], dir: [f32; 3]) -> Ray {
        Ray::new(Vec3::from(origin), Vec3::from(dir)).unwrap()
    }

    fn cube(center: [f32; 3], width: [f32; 3]) -> Aabb {
        Aabb::new(Vec3::from(center), Vec3::from(width), 0).unwrap()
    }

    fn cells(walk: CellWalk<'_>) -> Vec<IVec2> {
        walk.map(|s| s.cell).collect()
    }

    #[test]
    fn test_walk_enters_from_outside() {
        let g = unit_grid();
        let r = ray([-2.0, 3.0, 0.5], [1.0, 0.0, 0.0]);
        let steps: Vec<_> = CellWalk::new(&g, &r).collect();
        let visited: Vec<_> = steps.iter().map(|s| s.cell).collect();
        assert_eq!(
            visited,
            vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 0), IVec2::new(3, 0)]
        );
        for (i, s) in steps.iter().enumerate() {
            assert_relative_eq!(s.exit, 3.0 + i as f32, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_walk_enters_from_far_side() {
        let g = unit_grid();
        let r = ray([10.0, 0.0, 2.5], [-1.0, 0.0, 0.0]);
        assert_eq!(
            cells(CellWalk::new(&g, &r)),
            vec![IVec2::new(3, 2), IVec2::new(2, 2), IVec2::new(1, 2), IVec2::new(0, 2)]
        );
    }

    #[test]
    fn test_walk_starts_on_max_boundary() {
        let g = unit_grid();
        let r = ray([4.0, 0.0, 0.5], [-1.0, 0.0, 0.0]);
        assert_eq!(
            cells(CellWalk::new(&g, &r)),
            vec![IVec2::new(3, 0), IVec2::new(2, 0), IVec2::new(1, 0), IVec2::new(0, 0)]
        );
        // Leaving through the same boundary visits nothing
        assert_eq!(CellWalk::new(&g, &ray([4.0, 0.0, 0.5], [1.0, 0.0, 0.0])).count(), 0);
    }

    #[test]
    fn test_walk_starts_inside() {
        let g = unit_grid();
        let r = ray([1.5, 0.0, 1.5], [0.0, 0.0, -1.0]);
        let steps: Vec<_> = CellWalk::new(&g, &r).collect();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].cell, IVec2::new(1, 1));
        assert_eq!(steps[1].cell, IVec2::new(1, 0));
        assert_relative_eq!(steps[0].exit, 0.5, epsilon = 1e-6);
        assert_relative_eq!(steps[1].exit, 1.5, epsilon = 1e-6);
    }

    #[test]
    fn test_walk_diagonal_steps_one_axis_at_a_time() {
        let g = unit_grid();
        let r = ray([0.5, 1.0, 0.25], [1.0, -0.1, 1.0]);
        let visited = cells(CellWalk::new(&g, &r));
        assert_eq!(
            visited,
            vec![
                IVec2::new(0, 0),
                IVec2::new(1, 0),
                IVec2::new(1, 1),
                IVec2::new(2, 1),
                IVec2::new(2, 2),
                IVec2::new(3, 2),
                IVec2::new(3, 3),
            ]
        );
        assert!(visited.len() <= (g.max.x + g.max.y + 2) as usize);
    }

    #[test]
    fn test_walk_vertical_ray() {
        let g = unit_grid();
        let r = ray([2.5, 10.0, 0.5], [0.0, -1.0, 0.0]);
        let steps: Vec<_> = CellWalk::new(&g, &r).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].cell, IVec2::new(2, 0));
        assert!(steps[0].exit.is_infinite());

        let outside = ray([-2.5, 10.0, 0.5], [0.0, -1.0, 0.0]);
        assert_eq!(CellWalk::new(&g, &outside).count(), 0);
    }

    #[test]
    fn test_walk_misses_grid() {
        let g = unit_grid();
        // Passes beside the footprint
        assert_eq!(CellWalk::new(&g, &ray([-2.0, 0.0, 6.0], [1.0, 0.0, 0.0])).count(), 0);
        // Points away from it
        assert_eq!(CellWalk::new(&g, &ray([-2.0, 0.0, 1.0], [-1.0, 0.0, 0.0])).count(), 0);
    }

    #[test]
    fn test_walk_is_fused() {
        let g = unit_grid();
        let mut walk = CellWalk::new(&g, &ray([3.5, 0.0, 3.5], [1.0, 0.0, 0.0]));
        assert!(walk.next().is_some());
        assert!(walk.next().is_none());
        assert!(walk.next().is_none());
    }

    fn street() -> Vec<Aabb> {
        vec![
            cube([2.0, 1.0, 0.0], [1.0, 2.0, 1.0]),
            cube([6.0, 1.0, 0.0], [1.0, 2.0, 1.0]),
            cube([10.0, 1.0, 0.0], [1.0, 2.0, 1.0]),
            cube([6.0, 1.0, 6.0], [12.0, 2.0, 1.0]),
        ]
    }

    #[test]
    fn test_trace_closest_finds_nearest() {
        let boxes = street();
        let built = build_grid(&boxes, IVec2::new(8, 8)).unwrap();

        let r = ray([-5.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        let hit = built.trace_closest(&boxes, &r).unwrap();
        assert_eq!(hit.box_index, 0);
        assert_relative_eq!(hit.distance, 6.5, epsilon = 1e-5);

        let r = ray([15.0, 1.0, 0.0], [-1.0, 0.0, 0.0]);
        let hit = built.trace_closest(&boxes, &r).unwrap();
        assert_eq!(hit.box_index, 2);
        assert_relative_eq!(hit.distance, 4.5, epsilon = 1e-5);
    }

    #[test]
    fn test_trace_closest_long_box() {
        let boxes = street();
        let built = build_grid(&boxes, IVec2::new(8, 8)).unwrap();
        // Hits the long box well inside its footprint
        let r = ray([9.0, 1.0, -3.0], [0.0, 0.0, 1.0]);
        let hit = built.trace_closest(&boxes, &r).unwrap();
        assert_eq!(hit.box_index, 3);
        assert_relative_eq!(hit.distance, 8.5, epsilon = 1e-5);
    }

    #[test]
    fn test_trace_closest_over_roofs() {
        let boxes = street();
        let built = build_grid(&boxes, IVec2::new(8, 8)).unwrap();
        assert!(built.trace_closest(&boxes, &ray([-5.0, 3.0, 0.0], [1.0, 0.0, 0.0])).is_none());
    }

    #[test]
    fn test_trace_matches_scan() {
        let boxes = street();
        let built = build_grid(&boxes, IVec2::new(5, 3)).unwrap();
        let rays = [
            ray([-5.0, 1.0, 0.0], [1.0, 0.0, 0.1]),
            ray([6.0, 10.0, 3.0], [0.0, -1.0, 0.3]),
            ray([0.0, 0.5, 10.0], [0.5, 0.0, -1.0]),
            ray([6.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            ray([20.0, 5.0, 20.0], [-1.0, -0.3, -1.0]),
        ];
        for r in &rays {
            let traced = built.trace_closest(&boxes, r);
            let scanned = scan_closest(&boxes, r, f32::INFINITY);
            assert_eq!(traced, scanned, "ray {r:?}");
        }
    }

    #[test]
    fn test_trace_from_footprint_edge() {
        let boxes = vec![
            cube([0.0, 1.0, 0.0], [2.0, 2.0, 2.0]),
            cube([4.0, 1.0, 0.0], [2.0, 2.0, 2.0]),
            cube([8.0, 1.0, 0.0], [2.0, 2.0, 2.0]),
        ];
        let built = build_grid(&boxes, IVec2::new(3, 1)).unwrap();
        let g = built.grid();
        let edge = g.origin.x + g.extent().x;
        let r = ray([edge, 1.0, 0.0], [-1.0, 0.0, 0.0]);

        let hit = built.trace_closest(&boxes, &r).unwrap();
        assert_eq!(hit.box_index, 2);
        assert_relative_eq!(hit.distance, 0.1, epsilon = 1e-4);
        assert_eq!(Some(hit), scan_closest(&boxes, &r, f32::INFINITY));
    }

    #[test]
    fn test_scan_respects_limit() {
        let boxes = street();
        let r = ray([-5.0, 1.0, 0.0], [1.0, 0.0, 0.0]);
        assert_eq!(scan_closest(&boxes, &r, f32::INFINITY).map(|h| h.box_index), Some(0));
        assert!(scan_closest(&boxes, &r, 6.5).is_none());
        assert!(scan_closest(&boxes, &r, 6.0).is_none());
        assert!(scan_closest(&boxes, &r, 6.6).is_some());
    }

    #[test]
    fn test_scan_ties_prefer_lower_index() {
        let boxes = vec![cube([0.0, 0.0, 0.0], [2.0, 2.0, 2.0]), cube([0.0, 0.0, 0.0], [2.0, 2.0, 2.0])];
        let hit = scan_closest(&boxes, &ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]), f32::INFINITY).unwrap();
        assert_eq!(hit.box_index, 0);
        assert_relative_eq!(hit.distance, 4.0);
    }
}
