
use crate::octree::packed::PackedOctree;
use crate::spatial::{
    math::vector::V3c,
    raytracing::{axis_normal, classify_axis, ray_quad},
    Cube, FLOAT_ERROR_TOLERANCE,
};

pub use crate::spatial::raytracing::{FaceHit, Ray};

/// Result of marching a ray through a packed octree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchHit {
    /// Where the ray enters the occupied cell
    pub point: V3c<f32>,
    /// Outward normal of the face of the occupied cell the ray entered through
    pub normal: V3c<f32>,
    pub colour: V3c<f32>,
    /// World space bounds of the occupied cell
    pub cell: Cube,
}

/// Colour resolution for rays hitting an occupied cell
pub trait Shading {
    fn shade(
        &self,
        octree: &PackedOctree,
        point: &V3c<f32>,
        normal: &V3c<f32>,
        cell: &Cube,
    ) -> V3c<f32>;
}

/// Colours every hit by the absolute value of its position local to the octree
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalPositionShading;

impl Shading for LocalPositionShading {
    fn shade(
        &self,
        octree: &PackedOctree,
        point: &V3c<f32>,
        _normal: &V3c<f32>,
        _cell: &Cube,
    ) -> V3c<f32> {
        octree.local_position(point).abs()
    }
}

/// Flat colour lit by a single directional light
#[derive(Debug, Clone, Copy)]
pub struct NormalShading {
    pub albedo: V3c<f32>,
    /// Direction the light travels in
    pub light_direction: V3c<f32>,
    pub ambient: f32,
}

impl Default for NormalShading {
    fn default() -> Self {
        Self {
            albedo: V3c::unit(1.),
            light_direction: V3c::new(0., -1., 1.).normalized(),
            ambient: 0.1,
        }
    }
}

impl Shading for NormalShading {
    fn shade(
        &self,
        _octree: &PackedOctree,
        _point: &V3c<f32>,
        normal: &V3c<f32>,
        _cell: &Cube,
    ) -> V3c<f32> {
        let diffuse = (-self.light_direction).dot(normal).max(0.);
        self.albedo * (self.ambient + (1. - self.ambient) * diffuse)
    }
}

/// Upper limit of the cells visited by one march, in proportion to the cells along one axis
const MARCH_STEP_BUDGET_FACTOR: usize = 4;

/// Finds where the ray enters the root cube of the octree.
/// Only the faces on the side of the origin are tested, z faces first, then y and x;
/// the first face the ray actually crosses is the entry.
/// Rays starting inside the root cube are not supported and miss.
pub fn octree_root(octree: &PackedOctree, ray: &Ray) -> Option<FaceHit> {
    if octree.is_empty() {
        return None;
    }

    let position = octree.position();
    let half_size = octree.root_size() / 2.;
    let root_cube = octree.root_cube();
    let classification: [i8; 3] = std::array::from_fn(|axis| {
        classify_axis(
            ray.origin.axis(axis),
            position.axis(axis) - half_size,
            position.axis(axis) + half_size,
        )
    });

    if classification.iter().all(|side| 0 == *side) {
        // Origin is inside the cube
        return None;
    }

    for axis in [2, 1, 0] {
        let side = classification[axis];
        if 0 == side {
            continue;
        }
        let normal = axis_normal(axis, side as f32);
        let plane_point = position + normal * half_size;
        if let Some((distance, point)) = ray_quad(&plane_point, &normal, ray, half_size) {
            // Keep the impact exactly on the face, regardless of rounding errors
            let point = point
                .max(&root_cube.min_position)
                .min(&root_cube.max_position())
                .with_axis(axis, plane_point.axis(axis));
            return Some(FaceHit {
                point,
                normal,
                distance,
            });
        }
    }
    None
}

/// Steps the ray cell by cell from the entry point on the root cube,
/// until it either meets an occupied leaf or leaves the root cube.
pub fn march(
    octree: &PackedOctree,
    entry: &FaceHit,
    direction: &V3c<f32>,
    shading: &impl Shading,
) -> Option<MarchHit> {
    let root_cube = octree.root_cube();
    let ray = Ray {
        origin: entry.point,
        direction: *direction,
    };
    let exit_distance = root_cube.intersect_ray(&ray)?.exit_distance;
    let tolerance = FLOAT_ERROR_TOLERANCE * octree.min_leaf_size().max(1.);
    let step_budget = MARCH_STEP_BUDGET_FACTOR * (3 * (1usize << octree.depth().min(24)) + 1);

    let mut distance = 0.;
    let mut normal = entry.normal;
    for _ in 0..step_budget {
        if distance >= exit_distance - tolerance && 0. < distance {
            return None;
        }

        let point = ray.point_at(distance);
        let cell = octree.cell_at(&point, direction)?;
        if cell.occupied {
            return Some(MarchHit {
                point,
                normal,
                colour: shading.shade(octree, &point, &normal, &cell.bounds),
                cell: cell.bounds,
            });
        }

        let exit = cell.bounds.concave_face_exit(&normal, &point, direction)?;
        distance += exit.distance;
        normal = -exit.normal;
    }

    log::warn!("Ray march ran out of its step budget of {step_budget} cells");
    None
}

/// Traces the ray against the octree: finds the entry into the root cube, then marches
/// through the cells to the first occupied leaf
pub fn octree_trace(
    octree: &PackedOctree,
    ray: &Ray,
    shading: &impl Shading,
) -> Option<MarchHit> {
    let entry = octree_root(octree, ray)?;
    march(octree, &entry, &ray.direction, shading)
}
