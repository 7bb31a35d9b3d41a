#[cfg(test)]
mod camera_tests {
    use crate::render::Camera;
    use crate::spatial::math::vector::V3c;
    use nalgebra::{Matrix4, Vector3};

    fn assert_close(a: V3c<f32>, b: V3c<f32>) {
        assert!((a - b).length() < 0.0001, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_center_ray_looks_down_negative_z() {
        let ray = Camera::default().ray_for((0., 0.));
        assert_close(ray.origin, V3c::unit(0.));
        assert_close(ray.direction, V3c::new(0., 0., -1.));
    }

    #[test]
    fn test_translation_moves_origin_only() {
        let camera = Camera {
            transform: Matrix4::new_translation(&Vector3::new(1., 2., 3.)),
            ..Default::default()
        };
        let ray = camera.ray_for((0., 0.));
        assert_close(ray.origin, V3c::new(1., 2., 3.));
        assert_close(ray.direction, V3c::new(0., 0., -1.));
        assert_close(camera.position(), V3c::new(1., 2., 3.));
    }

    #[test]
    fn test_origin_offset_along_ray() {
        let camera = Camera {
            origin_offset: 2.,
            ..Default::default()
        };
        let ray = camera.ray_for((1., 0.));
        let expected_direction = V3c::new(1., 0., -1.).normalized();
        assert_close(ray.direction, expected_direction);
        assert_close(ray.origin, expected_direction * 2.);
    }

    #[test]
    fn test_looking_at_target() {
        let camera = Camera::looking_at(
            V3c::new(0., 0., 10.),
            V3c::new(0., 0., 0.),
            V3c::new(0., 1., 0.),
        );
        let ray = camera.ray_for((0., 0.));
        assert_close(ray.origin, V3c::new(0., 0., 10.));
        assert_close(ray.direction, V3c::new(0., 0., -1.));

        let camera = Camera::looking_at(
            V3c::new(10., 0., 0.),
            V3c::new(0., 0., 0.),
            V3c::new(0., 1., 0.),
        );
        assert_close(camera.ray_for((0., 0.)).direction, V3c::new(-1., 0., 0.));
    }

    #[test]
    fn test_plane_position_of_pixels() {
        let camera = Camera::default().with_sensor_size(2., 1.);
        assert_eq!(camera.plane_position(1, 1, 3, 3), (0., 0.));

        let (u, v) = camera.plane_position(0, 0, 2, 2);
        assert!((u + 0.5).abs() < 0.0001);
        assert!((v - 0.25).abs() < 0.0001);

        let (u, v) = camera.plane_position(1, 1, 2, 2);
        assert!((u - 0.5).abs() < 0.0001);
        assert!((v + 0.25).abs() < 0.0001);
    }
}

#[cfg(test)]
mod render_tests {
    use crate::octree::raytracing::LocalPositionShading;
    use crate::octree::OctreeSettings;
    use crate::render::{
        Camera, Framebuffer, LightPath, OctreeCache, RenderContext, RenderSettings,
        ScanlineRenderer,
    };
    use crate::scene::{Geometric, Scene, Spatial, SpatialId, Vbo};
    use crate::spatial::math::vector::V3c;
    use nalgebra::{Matrix4, Vector3};

    fn corner_spatial(id: u32, offset: V3c<f32>) -> Spatial {
        Spatial::new(SpatialId(id)).with_geometric(Geometric::new(vec![Vbo::positions(&[
            V3c::unit(-4.) + offset,
            V3c::unit(4.) + offset,
        ])]))
    }

    fn settings() -> OctreeSettings {
        OctreeSettings::default().with_min_cell_size(2.)
    }

    /// Camera at the given x,y looking down the -z axis from far away
    fn camera_above(x: f32, y: f32) -> Camera {
        Camera {
            transform: Matrix4::new_translation(&Vector3::new(x, y, 100.)),
            ..Default::default()
        }
        .with_sensor_size(0.001, 0.001)
    }

    #[test]
    fn test_cache_builds_reuses_and_rebuilds() {
        let mut scene = Scene::new();
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        let mut cache = OctreeCache::new(settings());
        assert!(cache.is_empty());

        cache.prefabricate(&scene).unwrap();
        assert_eq!(cache.len(), 1);
        let generation = cache.get(SpatialId(1)).unwrap().generation();
        assert_eq!(generation, scene.get(SpatialId(1)).unwrap().generation());
        assert!(!cache.get(SpatialId(1)).unwrap().packed().is_empty());

        cache.prefabricate(&scene).unwrap();
        assert_eq!(generation, cache.get(SpatialId(1)).unwrap().generation());

        scene
            .get_mut(SpatialId(1))
            .unwrap()
            .add_geometric(Geometric::new(vec![Vbo::positions(&[V3c::unit(10.)])]));
        cache.prefabricate(&scene).unwrap();
        let rebuilt = cache.get(SpatialId(1)).unwrap();
        assert!(generation < rebuilt.generation());
        assert!(rebuilt.octree().root_size() > 8.);
    }

    #[test]
    fn test_cache_prunes_removed_spatials() {
        let mut scene = Scene::new();
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        scene.insert(corner_spatial(2, V3c::unit(20.)));
        let mut cache = OctreeCache::new(settings());
        cache.prefabricate(&scene).unwrap();
        assert_eq!(cache.len(), 2);

        scene.remove(SpatialId(1));
        cache.prefabricate(&scene).unwrap();
        assert_eq!(cache.len(), 1);
        assert!(cache.get(SpatialId(1)).is_none());
        assert!(cache.get(SpatialId(2)).is_some());
    }

    #[test]
    fn test_cache_reports_invalid_settings() {
        let mut scene = Scene::new();
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        let mut cache = OctreeCache::new(OctreeSettings::default().with_min_cell_size(0.));
        assert!(cache.prefabricate(&scene).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_light_path_hit_and_background() {
        let mut scene = Scene::new();
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        let mut cache = OctreeCache::new(settings());
        cache.prefabricate(&scene).unwrap();

        let background = V3c::new(0.2, 0.3, 0.4);
        let light_path = LightPath::new(LocalPositionShading).with_background(background);

        let hit = light_path
            .trace_ray(&camera_above(3., 3.).ray_for((0., 0.)), &scene, &cache)
            .unwrap();
        assert_eq!(hit.normal, V3c::new(0., 0., 1.));
        assert!((hit.point.z - 4.).abs() < 0.0001);
        assert_ne!(
            light_path.trace(&camera_above(3., 3.), (0., 0.), &scene, &cache),
            background
        );

        assert_eq!(
            light_path.trace(&camera_above(-3., 3.), (0., 0.), &scene, &cache),
            background
        );
    }

    #[test]
    fn test_first_spatial_in_scene_order_wins() {
        let mut scene = Scene::new();
        // Further away from the camera, but first in the scene
        scene.insert(corner_spatial(1, V3c::new(0., 0., -20.)));
        scene.insert(corner_spatial(2, V3c::unit(0.)));
        let mut cache = OctreeCache::new(settings());
        cache.prefabricate(&scene).unwrap();

        let hit = LightPath::default()
            .trace_ray(&camera_above(3., 3.).ray_for((0., 0.)), &scene, &cache)
            .unwrap();
        assert!((hit.point.z + 16.).abs() < 0.0001);
    }

    #[test]
    fn test_spatials_missing_from_cache_are_ignored() {
        let mut scene = Scene::new();
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        let mut cache = OctreeCache::new(settings());
        assert!(LightPath::default()
            .trace_ray(&camera_above(3., 3.).ray_for((0., 0.)), &scene, &cache)
            .is_none());

        // The unbuilt spatial comes first and is closer to the camera, but only the cached one is traced
        cache.prefabricate(&scene).unwrap();
        let mut scene = Scene::new();
        scene.insert(corner_spatial(2, V3c::new(0., 0., 20.)));
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        assert!(cache.get(SpatialId(2)).is_none());
        let hit = LightPath::default()
            .trace_ray(&camera_above(3., 3.).ray_for((0., 0.)), &scene, &cache)
            .unwrap();
        assert!((hit.point.z - 4.).abs() < 0.0001);
    }

    #[test]
    fn test_scanline_batches_wrap_around() {
        let scene = Scene::new();
        let cache = OctreeCache::default();
        let light_path = LightPath::default();
        let camera = Camera::default();
        let mut framebuffer = Framebuffer::new(3, 20);
        let mut renderer = ScanlineRenderer::new(8);

        assert!(!renderer.render_batch(&light_path, &camera, &scene, &cache, &mut framebuffer));
        assert_eq!(renderer.current_scanline(), 8);
        assert!(!renderer.render_batch(&light_path, &camera, &scene, &cache, &mut framebuffer));
        assert_eq!(renderer.current_scanline(), 16);
        assert!(renderer.render_batch(&light_path, &camera, &scene, &cache, &mut framebuffer));
        assert_eq!(renderer.current_scanline(), 0);
    }

    #[test]
    fn test_empty_framebuffer_completes_immediately() {
        let mut renderer = ScanlineRenderer::default();
        assert_eq!(renderer.rows_per_batch(), 8);
        assert!(renderer.render_batch(
            &LightPath::default(),
            &Camera::default(),
            &Scene::new(),
            &OctreeCache::default(),
            &mut Framebuffer::new(0, 0),
        ));
    }

    #[test]
    fn test_render_frame_fills_framebuffer() {
        let mut scene = Scene::new();
        scene.insert(corner_spatial(1, V3c::unit(0.)));
        let background = V3c::new(0.5, 0., 0.);
        let mut context = RenderContext::new(
            RenderSettings {
                octree: settings(),
                rows_per_batch: 3,
                background,
            },
            LocalPositionShading,
        );

        let mut framebuffer = Framebuffer::new(4, 4);
        context
            .render_frame(&camera_above(3., 3.), &scene, &mut framebuffer)
            .unwrap();
        assert_eq!(context.cache().len(), 1);
        assert!(framebuffer.pixels().iter().all(|pixel| *pixel != background));

        let mut framebuffer = Framebuffer::new(4, 4);
        context
            .render_frame(&camera_above(-3., 3.), &scene, &mut framebuffer)
            .unwrap();
        assert!(framebuffer.pixels().iter().all(|pixel| *pixel == background));
        assert_eq!(context.scanlines().current_scanline(), 0);
    }

    #[test]
    fn test_rgb8_conversion_clamps() {
        let mut framebuffer = Framebuffer::new(2, 1);
        framebuffer.pixels = vec![V3c::new(-1., 0.5, 2.), V3c::new(1., 0., 0.)];
        assert_eq!(framebuffer.to_rgb8(), vec![0, 128, 255, 255, 0, 0]);
        assert_eq!(framebuffer.pixel(1, 0), Some(&V3c::new(1., 0., 0.)));
        assert_eq!(framebuffer.pixel(2, 0), None);
    }
}
