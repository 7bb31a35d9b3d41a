use crate::spatial::{math::vector::V3c, Cube, FLOAT_ERROR_TOLERANCE};


/// Minimum magnitude of the ray direction projected on a face normal to consider the face reachable
pub(crate) const RAY_QUAD_EPSILON: f32 = 0.000001;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: V3c<f32>,
    pub direction: V3c<f32>,
}

impl Ray {
    pub fn is_valid(&self) -> bool {
        (1. - self.direction.length()).abs() < 0.00001
    }

    pub fn point_at(&self, d: f32) -> V3c<f32> {
        self.origin + self.direction * d
    }
}

/// Impact of a ray on one face of a cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    /// The point where the ray meets the face
    pub point: V3c<f32>,
    /// Outward facing normal of the face which was hit
    pub normal: V3c<f32>,
    /// Distance from the origin of the ray to the impact point
    pub distance: f32,
}

/// Where a ray leaves a cell it is travelling inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellExit {
    /// Distance travelled from the given start point until the exit
    pub distance: f32,
    pub point: V3c<f32>,
    /// Outward facing normal of the face the ray leaves through
    pub normal: V3c<f32>,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct CubeRayIntersection {
    /// None in case the ray starts inside the cube
    pub(crate) impact_distance: Option<f32>,
    pub(crate) exit_distance: f32,
}

/// Unit vector along the given axis with the given sign
pub(crate) fn axis_normal(axis: usize, sign: f32) -> V3c<f32> {
    V3c::unit(0.).with_axis(axis, sign.signum())
}

/// Index of the dominant axis of an axis aligned normal
pub(crate) fn normal_axis(normal: &V3c<f32>) -> usize {
    let magnitude = normal.abs();
    if magnitude.x >= magnitude.y && magnitude.x >= magnitude.z {
        0
    } else if magnitude.y >= magnitude.z {
        1
    } else {
        2
    }
}

/// Classifies the given value against the range on an axis:
/// -1 if below `min`, +1 if above `max`, 0 if inside the range
pub fn classify_axis(value: f32, min: f32, max: f32) -> i8 {
    if value < min {
        -1
    } else if value > max {
        1
    } else {
        0
    }
}

/// Intersects the ray with a square face of `2 * half_size` edge length
/// centered at `plane_point`, facing `plane_normal`.
/// Returns with the distance along the ray and the impact point,
/// should the ray reach the face from its front side.
pub fn ray_quad(
    plane_point: &V3c<f32>,
    plane_normal: &V3c<f32>,
    ray: &Ray,
    half_size: f32,
) -> Option<(f32, V3c<f32>)> {
    let inverse_normal = -*plane_normal;
    let denominator = inverse_normal.dot(&ray.direction);
    if denominator <= RAY_QUAD_EPSILON {
        // parallel to the face, or facing away from it
        return None;
    }

    let distance = (*plane_point - ray.origin).dot(&inverse_normal) / denominator;
    if distance < 0. {
        return None;
    }

    let impact_point = ray.point_at(distance);
    let offset = (impact_point - *plane_point).abs();
    let limit = half_size + FLOAT_ERROR_TOLERANCE * half_size.max(1.);
    if offset.x > limit || offset.y > limit || offset.z > limit {
        return None;
    }
    Some((distance, impact_point))
}

impl Cube {
    /// Tells the intersection with the cube of the given ray.
    /// https://gamedev.stackexchange.com/questions/18436/most-efficient-aabb-vs-ray-collision-algorithms
    pub fn intersect_ray(&self, ray: &Ray) -> Option<CubeRayIntersection> {
        let max_position = self.max_position();
        let slab = |min: f32, max: f32, origin: f32, direction: f32| {
            if 0. == direction {
                if origin < min || origin > max {
                    (f32::INFINITY, f32::NEG_INFINITY)
                } else {
                    (f32::NEG_INFINITY, f32::INFINITY)
                }
            } else {
                let t1 = (min - origin) / direction;
                let t2 = (max - origin) / direction;
                (t1.min(t2), t1.max(t2))
            }
        };
        let (x_min, x_max) = slab(
            self.min_position.x,
            max_position.x,
            ray.origin.x,
            ray.direction.x,
        );
        let (y_min, y_max) = slab(
            self.min_position.y,
            max_position.y,
            ray.origin.y,
            ray.direction.y,
        );
        let (z_min, z_max) = slab(
            self.min_position.z,
            max_position.z,
            ray.origin.z,
            ray.direction.z,
        );

        let tmin = x_min.max(y_min).max(z_min);
        let tmax = x_max.min(y_max).min(z_max);

        if tmax < 0. || tmin > tmax {
            // ray is intersecting the cube, but it is behind it
            // OR ray doesn't intersect cube
            return None;
        }

        Some(CubeRayIntersection {
            impact_distance: if tmin < 0. { None } else { Some(tmin) },
            exit_distance: tmax,
        })
    }

    /// Calculates where a ray travelling inside the cube leaves it.
    /// The ray is expected to have entered through the face with the given outward `entry_normal`;
    /// the inverted entry normal gives the forward axis of the cell, the other two are the lateral axes.
    /// The smallest non-negative exit distance among the three decides the exit face,
    /// ties are won by the forward axis.
    pub fn concave_face_exit(
        &self,
        entry_normal: &V3c<f32>,
        point: &V3c<f32>,
        direction: &V3c<f32>,
    ) -> Option<CellExit> {
        let forward_axis = normal_axis(entry_normal);
        let axes = [forward_axis, (forward_axis + 1) % 3, (forward_axis + 2) % 3];
        let max_position = self.max_position();

        let mut exit: Option<(f32, usize)> = None;
        for axis in axes {
            let direction_component = direction.axis(axis);
            if 0. == direction_component {
                continue;
            }
            let boundary = if 0. < direction_component {
                max_position.axis(axis)
            } else {
                self.min_position.axis(axis)
            };
            let distance = ((boundary - point.axis(axis)) / direction_component).max(0.);
            if exit.map_or(true, |(closest, _)| distance < closest) {
                exit = Some((distance, axis));
            }
        }

        exit.map(|(distance, axis)| CellExit {
            distance,
            point: *point + *direction * distance,
            normal: axis_normal(axis, direction.axis(axis)),
        })
    }
}
