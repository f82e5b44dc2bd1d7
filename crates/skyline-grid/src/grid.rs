//! Grid descriptor and per-step traversal math.

use skyline_geom::intersect::{intersect_rect, narrow, slab};
use skyline_geom::Ray;
use skyline_math::{floor_to_cell, to_float, xz, IVec2, Tolerance, Vec2, Vec3};

use crate::{GridError, Result};

/// A uniform grid over the X-Z plane.
///
/// Cell `(x, y)` covers `origin + (x, y) * cell_size` up to
/// `origin + (x + 1, y + 1) * cell_size`, where the grid's `y` runs along
/// world Z. Cells are stored row-major: index `x + y * max.x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    /// Number of cells along X and Z.
    pub max: IVec2,
    /// Size of one cell along X and Z.
    pub cell_size: Vec2,
    /// Minimum corner of the covered footprint.
    pub origin: Vec2,
}

impl Grid {
    /// Cell returned by [`Grid::next_cell`] when a ray never leaves its cell.
    pub const OUTSIDE: IVec2 = IVec2::new(-1, -1);

    /// Create a grid, rejecting non-positive cell counts or sizes.
    pub fn new(origin: Vec2, cell_size: Vec2, max: IVec2) -> Result<Self> {
        if max.x <= 0 || max.y <= 0 {
            return Err(GridError::InvalidResolution(max.x, max.y));
        }
        if !(cell_size.x.is_finite() && cell_size.y.is_finite())
            || cell_size.x <= 0.0
            || cell_size.y <= 0.0
        {
            return Err(GridError::InvalidCellSize(cell_size.x, cell_size.y));
        }
        Ok(Self {
            max,
            cell_size,
            origin,
        })
    }

    /// Total number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.max.x as usize * self.max.y as usize
    }

    /// Size of the whole footprint.
    #[inline]
    pub fn extent(&self) -> Vec2 {
        to_float(&self.max).component_mul(&self.cell_size)
    }

    /// Center of the footprint.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.extent() * 0.5
    }

    /// Whether `cell` lies in `[0, max.x) x [0, max.y)`.
    #[inline]
    pub fn contains_cell(&self, cell: &IVec2) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.max.x && cell.y < self.max.y
    }

    /// Row-major index of `cell`, or `None` outside the grid.
    #[inline]
    pub fn cell_index(&self, cell: &IVec2) -> Option<usize> {
        self.contains_cell(cell)
            .then(|| cell.x as usize + cell.y as usize * self.max.x as usize)
    }

    /// Cell coordinates of a row-major index.
    #[inline]
    pub fn cell_at(&self, index: usize) -> IVec2 {
        let w = self.max.x as usize;
        IVec2::new((index % w) as i32, (index / w) as i32)
    }

    /// World position of the center of `cell` on the ground.
    pub fn cell_center(&self, cell: &IVec2) -> Vec3 {
        let c = self.origin + (to_float(cell) + Vec2::new(0.5, 0.5)).component_mul(&self.cell_size);
        Vec3::new(c.x, 0.0, c.y)
    }

    /// Cell containing `pos`, ignoring height.
    ///
    /// Rounds toward negative infinity, so positions before the origin map
    /// to negative cells. The result may lie outside the grid.
    pub fn position_to_cell(&self, pos: &Vec3) -> IVec2 {
        floor_to_cell(&(xz(pos) - self.origin).component_div(&self.cell_size))
    }

    /// Distance along `ray` to where it enters the grid's footprint.
    ///
    /// If the ray starts inside the footprint this is the exit distance.
    /// `None` if the ray never crosses the footprint ahead of its origin.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        intersect_rect(ray, &self.center(), &(self.extent() * 0.5))
    }

    /// Distance along `ray` to where it is first over the footprint.
    ///
    /// Zero if the origin is inside the footprint or on its boundary with
    /// the ray heading in. `None` if the ray never crosses the footprint
    /// ahead of its origin.
    pub fn entry_distance(&self, ray: &Ray) -> Option<f32> {
        let center = self.center();
        let half = self.extent() * 0.5;
        let x = slab(half.x, ray.origin.x - center.x, ray.direction.x)?;
        let z = slab(half.y, ray.origin.z - center.y, ray.direction.z)?;
        let (t_min, t_max) = narrow(x, z)?;
        (t_max > 0.0).then_some(t_min.max(0.0))
    }

    /// Distance along `ray` to each axis' exit plane of `cell`.
    ///
    /// For each axis the exit plane is whichever of the cell's back and
    /// front planes lies farther along the ray. An axis the ray does not
    /// move along never exits.
    fn axis_exits(&self, ray: &Ray, cell: &IVec2) -> [f32; 2] {
        let pos = xz(&ray.origin);
        let dir = xz(&ray.direction);
        let mut exits = [f32::INFINITY; 2];
        for (axis, exit) in exits.iter_mut().enumerate() {
            if dir[axis] == 0.0 {
                continue;
            }
            let back = self.origin[axis] + cell[axis] as f32 * self.cell_size[axis];
            let front = back + self.cell_size[axis];
            let t_back = (back - pos[axis]) / dir[axis];
            let t_front = (front - pos[axis]) / dir[axis];
            *exit = t_back.max(t_front);
        }
        exits
    }

    /// Distance along `ray` to the boundary where it leaves `cell`.
    pub fn cell_exit(&self, ray: &Ray, cell: &IVec2) -> f32 {
        let [x, z] = self.axis_exits(ray, cell);
        x.min(z)
    }

    /// Distance along `ray` to just past the boundary where it leaves `cell`.
    ///
    /// The overshoot is a small fraction of a cell so that the point at
    /// this distance lies in the next cell rather than on the boundary.
    /// Infinite for vertical rays.
    pub fn dist_to_next_cell(&self, ray: &Ray, cell: &IVec2) -> f32 {
        let step = Tolerance::CELL_STEP * self.cell_size.x.min(self.cell_size.y);
        self.cell_exit(ray, cell) + step
    }

    /// The cell `ray` enters after leaving `cell`.
    ///
    /// May lie outside the grid; [`Grid::OUTSIDE`] if the ray never leaves.
    pub fn next_cell(&self, ray: &Ray, cell: &IVec2) -> IVec2 {
        let dist = self.dist_to_next_cell(ray, cell);
        if !dist.is_finite() {
            return Self::OUTSIDE;
        }
        self.position_to_cell(&ray.at(dist))
    }

    /// Neighbor across the boundary `ray` leaves `cell` through.
    ///
    /// Used when [`Grid::next_cell`] rounds back into `cell` for rays that
    /// barely move along the exiting axis.
    pub(crate) fn step_across(&self, ray: &Ray, cell: &IVec2) -> IVec2 {
        let [x, z] = self.axis_exits(ray, cell);
        let dir = xz(&ray.direction);
        let mut next = *cell;
        if x <= z {
            next.x += if dir.x > 0.0 { 1 } else { -1 };
        } else {
            next.y += if dir.y > 0.0 { 1 } else { -1 };
        }
        next
    }
}
