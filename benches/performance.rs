use criterion::{criterion_group, criterion_main};

use voxray_rs::octree::{
    packed::PackedOctree,
    raytracing::{octree_trace, LocalPositionShading, Ray},
    Octree, OctreeSettings, V3c, MAX_DATA_SIZE,
};

fn criterion_benchmark(c: &mut criterion::Criterion) {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let settings = OctreeSettings::default().with_min_cell_size(0.25);
    let points: Vec<V3c<f32>> = (0..20000)
        .map(|_| {
            V3c::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            )
        })
        .collect();

    c.bench_function("octree build", |b| {
        b.iter(|| Octree::from_points(&points, &settings).ok().unwrap());
    });

    let mut tree = Octree::from_points(&points, &settings).ok().unwrap();
    c.bench_function("octree insert", |b| {
        b.iter(|| {
            tree.insert(&V3c::new(
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
                rng.gen_range(-8.0..8.0),
            ))
        });
    });

    c.bench_function("octree serialize", |b| {
        b.iter(|| PackedOctree::serialize(&tree, 16 * MAX_DATA_SIZE));
    });

    let packed = PackedOctree::serialize(&tree, 16 * MAX_DATA_SIZE);
    c.bench_function("cpu octree_trace", |b| {
        let viewport_size_width = 64;
        let viewport_size_height = 64;
        let origin = V3c::new(20., 15., 30.);
        let direction = (V3c::unit(0.) - origin).normalized();
        let up_direction = V3c::new(0., 1., 0.);
        let right_direction = direction.cross(up_direction).normalized();
        let up_direction = right_direction.cross(direction).normalized();
        let viewport_width = 1.;
        let viewport_height = 1.;
        b.iter(|| {
            for y in 0..viewport_size_height {
                for x in 0..viewport_size_width {
                    let glass_point = origin
                        + direction
                        + right_direction
                            * (x as f32 / viewport_size_width as f32 - 0.5)
                            * viewport_width
                        + up_direction
                            * (y as f32 / viewport_size_height as f32 - 0.5)
                            * viewport_height;
                    let ray = Ray {
                        origin,
                        direction: (glass_point - origin).normalized(),
                    };
                    octree_trace(&packed, &ray, &LocalPositionShading);
                }
            }
        })
    });

    #[cfg(feature = "bytecode")]
    {
        c.bench_function("packed octree save", |b| {
            b.iter(|| {
                packed.save("test_junk_packed_octree").ok().unwrap();
            });
        });

        c.bench_function("packed octree load", |b| {
            b.iter(|| {
                let _copy = PackedOctree::load("test_junk_packed_octree").ok().unwrap();
            });
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
