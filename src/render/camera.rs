use crate::spatial::{math::vector::V3c, raytracing::Ray};
use nalgebra::{Isometry3, Matrix4, Point3, Vector3};

/// Pinhole camera looking down its local -z axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Camera space to world space transformation
    pub transform: Matrix4<f32>,
    /// Distance of the image plane from the camera origin
    pub focal_length: f32,
    /// Width and height of the image plane
    pub sensor_size: (f32, f32),
    /// Distance along each ray from the camera origin where the ray starts
    pub origin_offset: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Matrix4::identity(),
            focal_length: 1.,
            sensor_size: (1., 1.),
            origin_offset: 0.,
        }
    }
}

impl Camera {
    /// Camera placed at `eye`, facing `target`
    pub fn looking_at(eye: V3c<f32>, target: V3c<f32>, up: V3c<f32>) -> Self {
        let view = Isometry3::look_at_rh(
            &Point3::from(eye),
            &Point3::from(target),
            &Vector3::from(up),
        );
        Self {
            transform: view.inverse().to_homogeneous(),
            ..Default::default()
        }
    }

    pub fn with_focal_length(mut self, focal_length: f32) -> Self {
        self.focal_length = focal_length;
        self
    }

    pub fn with_sensor_size(mut self, width: f32, height: f32) -> Self {
        self.sensor_size = (width, height);
        self
    }

    /// World space position of the camera
    pub fn position(&self) -> V3c<f32> {
        V3c::from(self.transform.transform_point(&Point3::origin()))
    }

    /// Builds the world space ray going through the given position of the image plane.
    /// The plane position is relative to the center of the image plane.
    pub fn ray_for(&self, plane_position: (f32, f32)) -> Ray {
        let direction =
            V3c::new(plane_position.0, plane_position.1, -self.focal_length).normalized();
        let origin = direction * self.origin_offset;
        Ray {
            origin: V3c::from(self.transform.transform_point(&Point3::from(origin))),
            // Vectors ignore the translation of the transform
            direction: V3c::from(self.transform.transform_vector(&Vector3::from(direction)))
                .normalized(),
        }
    }

    /// Position of the center of the given pixel on the image plane,
    /// y growing downwards in pixel space and upwards on the image plane
    pub fn plane_position(&self, x: usize, y: usize, width: usize, height: usize) -> (f32, f32) {
        let u = (x as f32 + 0.5) / width as f32 - 0.5;
        let v = 0.5 - (y as f32 + 0.5) / height as f32;
        (u * self.sensor_size.0, v * self.sensor_size.1)
    }
}
