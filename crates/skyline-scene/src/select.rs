//! Picking boxes with a ray.

use skyline_geom::intersect::{intersect_ground, intersect_sphere};
use skyline_geom::{Aabb, Material, Ray};
use skyline_grid::{scan_closest, Hit};
use skyline_math::{IVec2, Vec3};

use crate::{Result, Scene, SceneError};

/// Width of a box created by selecting empty space.
pub const NEW_BOX_WIDTH: f32 = 0.1;

/// Name given to a box created by selecting empty space.
pub const DEFAULT_BOX_NAME: &str = "defaultBox";

/// A selected box, borrowed from the scene for editing.
#[derive(Debug)]
pub struct Selection<'a> {
    /// Index of the box.
    pub index: usize,
    /// Whether the box was created by this selection.
    pub created: bool,
    /// The box itself.
    pub aabb: &'a mut Aabb,
    /// Its material.
    pub material: &'a Material,
    /// Its name.
    pub name: &'a mut String,
    /// Cells of the last built grid that list the box. Empty for a box
    /// created by this selection or when no grid has been built.
    pub cells: Vec<IVec2>,
}

impl Scene {
    /// Distance to the nearer of the ground and the sky dome along `ray`.
    ///
    /// Nothing beyond this is visible. Infinite if the ray reaches neither.
    pub fn visible_limit(&self, ray: &Ray) -> f32 {
        let ground = intersect_ground(ray);
        let sky = intersect_sphere(ray, &self.sky);
        match (ground, sky) {
            (Some(g), Some(s)) => g.min(s),
            (Some(t), None) | (None, Some(t)) => t,
            (None, None) => f32::INFINITY,
        }
    }

    /// Nearest visible box along `ray`, testing every box.
    pub fn pick(&self, ray: &Ray) -> Option<Hit> {
        scan_closest(&self.boxes, ray, self.visible_limit(ray))
    }

    /// Nearest visible box along `ray`, walking the grid.
    ///
    /// Gives the same answer as [`Scene::pick`] but needs a grid that is up
    /// to date with the boxes.
    pub fn pick_with_grid(&self, ray: &Ray) -> Result<Option<Hit>> {
        let grid = match &self.grid {
            Some(grid) if !self.grid_stale => grid,
            _ => return Err(SceneError::StaleGrid),
        };
        let limit = self.visible_limit(ray);
        Ok(grid
            .trace_closest(&self.boxes, ray)
            .filter(|hit| hit.distance < limit))
    }

    /// Select the nearest visible box along `ray`.
    ///
    /// If no box is hit, a small box named [`DEFAULT_BOX_NAME`] is created
    /// on the floor below where the ray meets the ground or the sky, using
    /// the material of the last box (or material 0 for the first box), and
    /// that box is returned. `None` if the ray reaches neither a box, the
    /// ground nor the sky.
    ///
    /// The returned box can be edited in place, so the grid is marked stale.
    pub fn select(&mut self, ray: &Ray) -> Result<Option<Selection<'_>>> {
        let (index, created) = match self.pick(ray) {
            Some(hit) => (hit.box_index as usize, false),
            None => match self.create_box_at(ray)? {
                Some(index) => (index, true),
                None => return Ok(None),
            },
        };

        let cells = match (&self.grid, created) {
            (Some(grid), false) => grid.cells_containing(index as u32),
            _ => Vec::new(),
        };
        let aabb = &mut self.boxes[index];
        let material = self
            .materials
            .get(aabb.material as usize)
            .ok_or(SceneError::MissingMaterial(aabb.material))?;
        self.grid_stale = true;

        Ok(Some(Selection {
            index,
            created,
            aabb,
            material,
            name: &mut self.box_names[index],
            cells,
        }))
    }

    fn create_box_at(&mut self, ray: &Ray) -> Result<Option<usize>> {
        let limit = self.visible_limit(ray);
        if !limit.is_finite() {
            return Ok(None);
        }

        let material = self.boxes.last().map_or(0, |b| b.material);
        if material as usize >= self.materials.len() {
            return Err(SceneError::MissingMaterial(material));
        }
        let at = ray.at(limit);
        let center = Vec3::new(at.x, self.floor_y, at.z);
        let aabb = Aabb::new(center, Vec3::repeat(NEW_BOX_WIDTH), material)?;

        self.boxes.push(aabb);
        self.box_names.push(DEFAULT_BOX_NAME.to_owned());
        self.grid_stale = true;
        log::info!(
            "created box {} at ({:.3}, {:.3}, {:.3})",
            self.boxes.len() - 1,
            center.x,
            center.y,
            center.z
        );
        Ok(Some(self.boxes.len() - 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneSettings;
    use approx::assert_relative_eq;

    fn city() -> Scene {
        let mut s = Scene::new(&SceneSettings::default(), "sky.png", "ground.png").unwrap();
        s.add_material("brick", Vec3::zeros(), ["brick.png"; 6]).unwrap();
        s.add_material("glass", Vec3::zeros(), ["glass.png"; 6]).unwrap();
        s.add_box("a", Aabb::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 2.0), 0).unwrap())
            .unwrap();
        s.add_box("b", Aabb::new(Vec3::new(4.0, 2.0, 0.0), Vec3::new(2.0, 4.0, 2.0), 1).unwrap())
            .unwrap();
        s
    }

    fn ray(origin: [f32; 3], dir: [f32; 3]) -> Ray {
        Ray::new(Vec3::from(origin), Vec3::from(dir)).unwrap()
    }

    #[test]
    fn test_visible_limit() {
        let s = city();
        // Looking straight down from 5 units up
        assert_relative_eq!(s.visible_limit(&ray([3.0, 5.0, 3.0], [0.0, -1.0, 0.0])), 5.0);
        // Level ray from the center reaches the dome
        assert_relative_eq!(s.visible_limit(&ray([0.0, 1.0, 0.0], [1.0, 0.0, 0.0])), 99.0f32.sqrt(), epsilon = 1e-5);
        // Looking up from outside the dome sees nothing
        assert!(s.visible_limit(&ray([50.0, 1.0, 0.0], [0.0, 1.0, 0.0])).is_infinite());
    }

    #[test]
    fn test_select_existing_box() {
        let mut s = city();
        let before = s.boxes().to_vec();
        let sel = s.select(&ray([0.0, 1.0, -5.0], [0.0, 0.0, 1.0])).unwrap().unwrap();
        assert_eq!(sel.index, 0);
        assert!(!sel.created);
        assert_eq!(sel.name.as_str(), "a");
        assert_eq!(sel.material.textures, [2; 6]);
        assert!(sel.cells.is_empty());
        assert_eq!(s.boxes(), before.as_slice());
        assert_eq!(s.box_names().len(), 2);
    }

    #[test]
    fn test_select_nearest_of_two() {
        let mut s = city();
        let sel = s.select(&ray([8.0, 1.0, 0.0], [-1.0, 0.0, 0.0])).unwrap().unwrap();
        assert_eq!(sel.index, 1);
        assert_eq!(sel.material.textures, [3; 6]);
    }

    #[test]
    fn test_select_reports_cells() {
        let mut s = city();
        s.set_resolution(IVec2::new(4, 1)).unwrap();
        s.prepare().unwrap();
        let expected = s.grid().unwrap().cells_containing(1);
        assert!(!expected.is_empty());

        let sel = s.select(&ray([4.0, 8.0, 0.0], [0.0, -1.0, 0.0])).unwrap().unwrap();
        assert_eq!(sel.index, 1);
        assert_eq!(sel.cells, expected);
        assert!(s.is_grid_stale());
    }

    #[test]
    fn test_select_empty_space_creates_one_box() {
        let mut s = city();
        let sel = s.select(&ray([-3.0, 5.0, -3.0], [0.0, -1.0, -0.5])).unwrap().unwrap();
        assert!(sel.created);
        assert_eq!(sel.index, 2);
        assert_eq!(sel.name.as_str(), DEFAULT_BOX_NAME);
        assert!(sel.cells.is_empty());
        // Ground hit at y = 0, 5 units down and 2.5 units back
        assert_relative_eq!(sel.aabb.center, Vec3::new(-3.0, 0.0, -5.5), epsilon = 1e-5);
        assert_eq!(sel.aabb.width, Vec3::repeat(NEW_BOX_WIDTH));
        assert_eq!(sel.aabb.tex_norm, sel.aabb.width);
        // Inherits the last box's material
        assert_eq!(sel.aabb.material, 1);

        assert_eq!(s.boxes().len(), 3);
        assert_eq!(s.box_names().len(), 3);
        assert!(s.is_grid_stale());
    }

    #[test]
    fn test_select_sky_places_box_below_hit() {
        let mut s = city();
        let sel = s.select(&ray([0.0, 5.0, 0.0], [1.0, 1.0, 0.0])).unwrap().unwrap();
        assert!(sel.created);
        // The ray meets the dome at distance t with |(t/sqrt2, 5 + t/sqrt2, 0)| = 10
        let x = sel.aabb.center.x;
        assert_relative_eq!(x * x + (5.0 + x) * (5.0 + x), 100.0, epsilon = 1e-3);
        assert_eq!(sel.aabb.center.y, 0.0);
    }

    #[test]
    fn test_select_first_box_uses_material_zero() {
        let mut s = Scene::new(&SceneSettings::default(), "sky.png", "ground.png").unwrap();
        s.add_material("brick", Vec3::zeros(), ["brick.png"; 6]).unwrap();
        let sel = s.select(&ray([0.0, 3.0, 0.0], [0.2, -1.0, 0.0])).unwrap().unwrap();
        assert!(sel.created);
        assert_eq!(sel.aabb.material, 0);
    }

    #[test]
    fn test_select_without_materials_fails_cleanly() {
        let mut s = Scene::new(&SceneSettings::default(), "sky.png", "ground.png").unwrap();
        let err = s.select(&ray([0.0, 3.0, 0.0], [0.0, -1.0, 0.0])).unwrap_err();
        assert!(matches!(err, SceneError::MissingMaterial(0)));
        assert!(s.boxes().is_empty());
    }

    #[test]
    fn test_select_nothing_visible() {
        let mut s = city();
        assert!(s.select(&ray([50.0, 1.0, 0.0], [0.0, 1.0, 0.0])).unwrap().is_none());
        assert_eq!(s.boxes().len(), 2);
    }

    #[test]
    fn test_box_behind_ground_is_not_visible() {
        let mut s = city();
        // Underground box, seen from above through the ground
        s.add_box("cellar", Aabb::new(Vec3::new(-4.0, -3.0, 0.0), Vec3::new(2.0, 2.0, 2.0), 0).unwrap())
            .unwrap();
        let r = ray([-4.0, 5.0, 0.0], [0.0, -1.0, 0.0]);
        assert!(s.pick(&r).is_none());
    }

    #[test]
    fn test_edit_through_selection() {
        let mut s = city();
        {
            let sel = s.select(&ray([0.0, 1.0, -5.0], [0.0, 0.0, 1.0])).unwrap().unwrap();
            sel.aabb.width.y = 6.0;
            sel.name.push_str("_tall");
        }
        assert_eq!(s.boxes()[0].width.y, 6.0);
        assert_eq!(s.box_names()[0], "a_tall");
    }

    #[test]
    fn test_pick_with_grid_matches_pick() {
        let mut s = city();
        assert!(matches!(
            s.pick_with_grid(&ray([0.0, 1.0, -5.0], [0.0, 0.0, 1.0])),
            Err(SceneError::StaleGrid)
        ));

        s.set_resolution(IVec2::new(5, 3)).unwrap();
        s.prepare().unwrap();
        let rays = [
            ray([0.0, 1.0, -5.0], [0.0, 0.0, 1.0]),
            ray([8.0, 1.0, 0.0], [-1.0, 0.0, 0.0]),
            ray([4.0, 8.0, 0.5], [0.0, -1.0, 0.0]),
            ray([-3.0, 5.0, -3.0], [0.0, -1.0, -0.5]),
            ray([-6.0, 3.0, 1.0], [1.0, -0.2, -0.1]),
        ];
        for r in &rays {
            assert_eq!(s.pick_with_grid(r).unwrap(), s.pick(r), "ray {r:?}");
        }
    }
}
