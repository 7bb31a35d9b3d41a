use crate::octree::raytracing::Shading;
use crate::render::{cache::OctreeCache, camera::Camera, light_path::LightPath};
use crate::scene::Scene;
use crate::spatial::math::vector::V3c;
use rayon::prelude::*;

/// Number of rows traced in one batch by default
pub const DEFAULT_ROWS_PER_BATCH: usize = 8;

/// Row major grid of linear colours
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pub(crate) pixels: Vec<V3c<f32>>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![V3c::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[V3c<f32>] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<&V3c<f32>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x)
    }

    /// Mutable slice of the given rows, clamped to the height of the buffer
    pub(crate) fn rows_mut(&mut self, start: usize, end: usize) -> &mut [V3c<f32>] {
        let start = start.min(self.height) * self.width;
        let end = end.min(self.height) * self.width;
        &mut self.pixels[start..end]
    }

    /// Packed 8 bit RGB triplets, each channel clamped to [0, 1] before quantization
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|pixel| {
                let clamped = pixel.clamped(0., 1.);
                [clamped.x, clamped.y, clamped.z].map(|channel| (channel * 255.).round() as u8)
            })
            .collect()
    }

    #[cfg(feature = "image_export")]
    pub fn to_image(&self) -> image::RgbImage {
        let rgb = self.to_rgb8();
        image::RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            let start = 3 * (y as usize * self.width + x as usize);
            image::Rgb([rgb[start], rgb[start + 1], rgb[start + 2]])
        })
    }
}

/// Splits the rendering of a frame into batches of rows, so the work of one frame
/// can be spread across multiple calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanlineRenderer {
    current_scanline: usize,
    rows_per_batch: usize,
}

impl Default for ScanlineRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_ROWS_PER_BATCH)
    }
}

impl ScanlineRenderer {
    pub fn new(rows_per_batch: usize) -> Self {
        Self {
            current_scanline: 0,
            rows_per_batch: rows_per_batch.max(1),
        }
    }

    /// The first row the next batch renders
    pub fn current_scanline(&self) -> usize {
        self.current_scanline
    }

    pub fn rows_per_batch(&self) -> usize {
        self.rows_per_batch
    }

    /// Restarts the frame from the first row
    pub fn reset(&mut self) {
        self.current_scanline = 0;
    }

    /// Traces the next batch of rows into the framebuffer, rows in parallel.
    /// Returns true if the batch finished the frame, in which case the next batch starts a new one.
    pub fn render_batch<S: Shading + Sync>(
        &mut self,
        light_path: &LightPath<S>,
        camera: &Camera,
        scene: &Scene,
        cache: &OctreeCache,
        framebuffer: &mut Framebuffer,
    ) -> bool {
        let (width, height) = (framebuffer.width(), framebuffer.height());
        if 0 == width || 0 == height {
            self.current_scanline = 0;
            return true;
        }

        let start = self.current_scanline.min(height);
        let end = (start + self.rows_per_batch).min(height);
        framebuffer
            .rows_mut(start, end)
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row_offset, row)| {
                let y = start + row_offset;
                for (x, pixel) in row.iter_mut().enumerate() {
                    let plane_position = camera.plane_position(x, y, width, height);
                    *pixel = light_path.trace(camera, plane_position, scene, cache);
                }
            });

        if end >= height {
            self.current_scanline = 0;
            true
        } else {
            self.current_scanline = end;
            false
        }
    }
}
