use crate::octree::raytracing::{octree_trace, LocalPositionShading, MarchHit, Ray, Shading};
use crate::render::{cache::OctreeCache, camera::Camera};
use crate::scene::Scene;
use crate::spatial::math::vector::V3c;

/// Resolves the colour seen along one camera ray
#[derive(Debug, Clone)]
pub struct LightPath<S: Shading = LocalPositionShading> {
    pub shading: S,
    /// Colour of rays not hitting anything
    pub background: V3c<f32>,
}

impl Default for LightPath<LocalPositionShading> {
    fn default() -> Self {
        Self::new(LocalPositionShading)
    }
}

impl<S: Shading> LightPath<S> {
    pub fn new(shading: S) -> Self {
        Self {
            shading,
            background: V3c::default(),
        }
    }

    pub fn with_background(mut self, background: V3c<f32>) -> Self {
        self.background = background;
        self
    }

    /// Colour of the given image plane position as seen by the camera
    pub fn trace(
        &self,
        camera: &Camera,
        plane_position: (f32, f32),
        scene: &Scene,
        cache: &OctreeCache,
    ) -> V3c<f32> {
        self.trace_ray(&camera.ray_for(plane_position), scene, cache)
            .map_or(self.background, |hit| hit.colour)
    }

    /// Traces the ray against the octree of every spatial in scene order, the first hit wins.
    /// Spatials without an octree in the cache are ignored until [`OctreeCache::prefabricate`] builds them.
    pub fn trace_ray(&self, ray: &Ray, scene: &Scene, cache: &OctreeCache) -> Option<MarchHit> {
        scene
            .spatials()
            .filter_map(|spatial| {
                let entry = cache.get(spatial.id());
                if entry.is_none() {
                    log::debug!(
                        "Spatial {:?} has no octree in the cache, skipped until prefabricated",
                        spatial.id()
                    );
                }
                entry
            })
            .find_map(|entry| octree_trace(entry.packed(), ray, &self.shading))
    }
}
