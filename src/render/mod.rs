pub mod cache;
pub mod camera;
pub mod framebuffer;
pub mod light_path;
mod tests;

pub use cache::{CachedOctree, OctreeCache};
pub use camera::Camera;
pub use framebuffer::{Framebuffer, ScanlineRenderer, DEFAULT_ROWS_PER_BATCH};
pub use light_path::LightPath;

use crate::octree::{raytracing::Shading, OctreeError, OctreeSettings};
use crate::scene::Scene;
use crate::spatial::math::vector::V3c;

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct RenderSettings {
    pub octree: OctreeSettings,
    pub rows_per_batch: usize,
    /// Colour of the pixels where no octree is hit
    pub background: V3c<f32>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            octree: OctreeSettings::default(),
            rows_per_batch: DEFAULT_ROWS_PER_BATCH,
            background: V3c::default(),
        }
    }
}

/// Owns everything a frame is rendered with. Rendering happens in two stages:
/// [`RenderContext::prefabricate`] brings the octrees up to date with the scene,
/// then [`RenderContext::render_batch`] traces rows against the unchanged octrees.
#[derive(Debug, Clone)]
pub struct RenderContext<S: Shading> {
    settings: RenderSettings,
    cache: OctreeCache,
    light_path: LightPath<S>,
    scanlines: ScanlineRenderer,
}

impl<S: Shading + Sync> RenderContext<S> {
    pub fn new(settings: RenderSettings, shading: S) -> Self {
        Self {
            cache: OctreeCache::new(settings.octree),
            light_path: LightPath::new(shading).with_background(settings.background),
            scanlines: ScanlineRenderer::new(settings.rows_per_batch),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn cache(&self) -> &OctreeCache {
        &self.cache
    }

    pub fn light_path(&self) -> &LightPath<S> {
        &self.light_path
    }

    pub fn scanlines(&self) -> &ScanlineRenderer {
        &self.scanlines
    }

    /// Builds or refreshes the octrees of the scene
    pub fn prefabricate(&mut self, scene: &Scene) -> Result<(), OctreeError> {
        self.cache.prefabricate(scene)
    }

    /// Renders the next batch of rows, returns true when the frame is complete
    pub fn render_batch(
        &mut self,
        camera: &Camera,
        scene: &Scene,
        framebuffer: &mut Framebuffer,
    ) -> bool {
        self.scanlines
            .render_batch(&self.light_path, camera, scene, &self.cache, framebuffer)
    }

    /// Prefabricates the scene, then renders batches until the frame is complete
    pub fn render_frame(
        &mut self,
        camera: &Camera,
        scene: &Scene,
        framebuffer: &mut Framebuffer,
    ) -> Result<(), OctreeError> {
        self.prefabricate(scene)?;
        self.scanlines.reset();
        while !self.render_batch(camera, scene, framebuffer) {}
        Ok(())
    }
}
