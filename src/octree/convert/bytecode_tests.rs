use crate::octree::{packed::PackedOctree, Octree, OctreeSettings, V3c, MAX_DATA_SIZE};
use bendy::{decoding::FromBencode, encoding::ToBencode};
use rand::{thread_rng, Rng};

fn random_packed_octree() -> PackedOctree {
    let mut rng = thread_rng();
    let points: Vec<V3c<f32>> = (0..64)
        .map(|_| {
            V3c::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            )
        })
        .collect();
    let octree = Octree::from_points(&points, &OctreeSettings::default().with_min_cell_size(0.25))
        .unwrap();
    PackedOctree::serialize(&octree, MAX_DATA_SIZE)
}

#[test]
fn test_packed_octree_bytes() {
    let packed = random_packed_octree();
    let restored = PackedOctree::from_bytes(&packed.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, packed);
    assert_eq!(restored.occupied_leaves(), packed.occupied_leaves());
}

#[test]
fn test_overflow_flag_is_kept() {
    let octree = Octree::from_points(
        &[V3c::unit(-4.), V3c::unit(4.)],
        &OctreeSettings::default().with_min_cell_size(2.),
    )
    .unwrap();
    let packed = PackedOctree::serialize(&octree, 16);
    assert!(packed.overflowed());
    let restored = PackedOctree::from_bencode(&packed.to_bencode().unwrap()).unwrap();
    assert!(restored.overflowed());
}

#[test]
fn test_invalid_bytes() {
    assert!(PackedOctree::from_bytes(b"i42e").is_err());
    // Too short to hold a header
    assert!(PackedOctree::from_bytes(b"li0ei1ee").is_err());
}

#[test]
fn test_save_and_load() {
    let packed = random_packed_octree();
    let path = std::env::temp_dir().join(format!("packed_octree_{}.bencode", std::process::id()));
    let path = path.to_string_lossy().to_string();
    packed.save(&path).unwrap();
    let loaded = PackedOctree::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded, packed);
}
