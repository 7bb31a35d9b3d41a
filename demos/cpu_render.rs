use voxray_rs::octree::{raytracing::NormalShading, OctreeSettings};
use voxray_rs::render::{Camera, Framebuffer, RenderContext, RenderSettings};
use voxray_rs::scene::{Geometric, Scene, Spatial, SpatialId, Vbo};
use voxray_rs::spatial::math::vector::V3c;

/// Points on the surface of a sphere
fn sphere_points(center: V3c<f32>, radius: f32, count: usize) -> Vec<V3c<f32>> {
    let golden_angle = std::f32::consts::PI * (3. - 5_f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1. - 2. * (i as f32 + 0.5) / count as f32;
            let ring_radius = (1. - y * y).sqrt();
            let theta = golden_angle * i as f32;
            center + V3c::new(theta.cos() * ring_radius, y, theta.sin() * ring_radius) * radius
        })
        .collect()
}

/// A flat square of points at the given height
fn floor_points(height: f32, half_extent: f32, step: f32) -> Vec<V3c<f32>> {
    let steps = (2. * half_extent / step) as usize;
    (0..=steps)
        .flat_map(|x| {
            (0..=steps).map(move |z| {
                V3c::new(
                    -half_extent + x as f32 * step,
                    height,
                    -half_extent + z as f32 * step,
                )
            })
        })
        .collect()
}

fn main() {
    env_logger::init();

    let mut scene = Scene::new();
    scene.insert(
        Spatial::new(SpatialId(0)).with_geometric(Geometric::new(vec![Vbo::positions(
            &sphere_points(V3c::new(0., 1., 0.), 1., 20000),
        )])),
    );
    scene.insert(
        Spatial::new(SpatialId(1)).with_geometric(Geometric::new(vec![Vbo::positions(
            &floor_points(0., 3., 0.1),
        )])),
    );

    let settings = RenderSettings {
        octree: OctreeSettings::default().with_min_cell_size(0.1),
        background: V3c::new(0.1, 0.1, 0.15),
        ..Default::default()
    };
    let mut context = RenderContext::new(settings, NormalShading::default());
    let camera = Camera::looking_at(
        V3c::new(4., 3., 5.),
        V3c::new(0., 0.5, 0.),
        V3c::new(0., 1., 0.),
    )
    .with_focal_length(1.5);

    let mut framebuffer = Framebuffer::new(512, 512);
    if let Err(error) = context.prefabricate(&scene) {
        log::error!("Unable to build the octrees of the scene: {:?}", error);
        return;
    }
    let mut batches = 0;
    while !context.render_batch(&camera, &scene, &mut framebuffer) {
        batches += 1;
        print!(
            "\r   progress: {:.1}%   ",
            100. * context.scanlines().current_scanline() as f32 / framebuffer.height() as f32
        );
    }
    println!("\rDone in {} batches!", batches + 1);

    let path = "cpu_render.png";
    match framebuffer.to_image().save(path) {
        Ok(()) => println!("Saved render to {path}"),
        Err(error) => log::error!("Unable to save render to {path}: {error}"),
    }
}
