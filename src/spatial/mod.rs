pub mod math;
pub mod raytracing;

use crate::spatial::math::{offset_region, vector::V3c};

pub(crate) const FLOAT_ERROR_TOLERANCE: f32 = 0.00001;

/// An axis aligned cube described by its minimum corner and edge length
#[derive(Default, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Cube {
    pub min_position: V3c<f32>,
    pub size: f32,
}

impl Cube {
    /// A cube of the given size centered around the given point
    pub fn centered_at(center: V3c<f32>, size: f32) -> Self {
        Self {
            min_position: center - V3c::unit(size / 2.),
            size,
        }
    }

    /// Creates a bounding box within an area described by the min_position and size, for the given octant
    pub fn child_bounds_for(&self, octant: u8) -> Cube {
        let child_size = self.size / 2.;
        Cube {
            min_position: self.min_position + (offset_region(octant) * child_size),
            size: child_size,
        }
    }

    pub fn midpoint(&self) -> V3c<f32> {
        self.min_position + V3c::unit(self.size / 2.)
    }

    pub fn max_position(&self) -> V3c<f32> {
        self.min_position + V3c::unit(self.size)
    }

    /// True if the given point is inside the cube, with coordinates in inclusive, exclusive range
    /// Edges included
    pub fn contains_point(&self, point: &V3c<f32>) -> bool {
        (point.x >= self.min_position.x - FLOAT_ERROR_TOLERANCE)
            && (point.x < self.min_position.x + self.size + FLOAT_ERROR_TOLERANCE)
            && (point.y >= self.min_position.y - FLOAT_ERROR_TOLERANCE)
            && (point.y < self.min_position.y + self.size + FLOAT_ERROR_TOLERANCE)
            && (point.z >= self.min_position.z - FLOAT_ERROR_TOLERANCE)
            && (point.z < self.min_position.z + self.size + FLOAT_ERROR_TOLERANCE)
    }
}

/// Axis aligned bounding box of arbitrary proportions
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Aabb {
    pub min: V3c<f32>,
    pub max: V3c<f32>,
}

impl Default for Aabb {
    /// An inverted box, which contains nothing and can be extended by any point
    fn default() -> Self {
        Self {
            min: V3c::unit(f32::INFINITY),
            max: V3c::unit(f32::NEG_INFINITY),
        }
    }
}

impl Aabb {
    pub fn extend(&mut self, point: &V3c<f32>) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    pub fn size(&self) -> V3c<f32> {
        self.max - self.min
    }

    pub fn center(&self) -> V3c<f32> {
        self.min + self.size() / 2.
    }

    /// Inclusive containment on every boundary
    pub fn contains(&self, point: &V3c<f32>) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
            && self.min.z <= point.z
            && point.z <= self.max.z
    }
}
