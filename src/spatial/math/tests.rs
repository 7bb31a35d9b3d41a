#[cfg(test)]
mod vector_tests {
    use crate::spatial::math::vector::V3c;

    #[test]
    fn test_cross_product() {
        let a = V3c::new(3., 0., 2.);
        let b = V3c::new(-1., 4., 2.);
        let cross = a.cross(b);
        assert!(cross.x == -8.);
        assert!(cross.y == -8.);
        assert!(cross.z == 12.);
    }

    #[test]
    fn test_axis_access() {
        let v = V3c::new(1., 2., 3.);
        assert_eq!(v.axis(0), 1.);
        assert_eq!(v.axis(1), 2.);
        assert_eq!(v.axis(2), 3.);
        assert_eq!(v.with_axis(1, -5.), V3c::new(1., -5., 3.));
    }

    #[test]
    fn test_nalgebra_conversion() {
        let v = V3c::new(1., -2., 3.5);
        let na: nalgebra::Vector3<f32> = v.into();
        assert_eq!(V3c::from(na), v);
    }
}

#[cfg(test)]
mod octant_tests {
    use crate::spatial::math::{
        hash_region_towards, octant_index, offset_region, vector::V3c,
    };

    #[test]
    fn test_octant_index_order() {
        assert_eq!(octant_index(false, false, false), 0);
        assert_eq!(octant_index(true, false, false), 1);
        assert_eq!(octant_index(false, true, false), 2);
        assert_eq!(octant_index(true, true, false), 3);
        assert_eq!(octant_index(false, false, true), 4);
        assert_eq!(octant_index(true, true, true), 7);
    }

    #[test]
    fn test_offset_region_matches_index() {
        for octant in 0..8 {
            let offset = offset_region(octant);
            assert_eq!(
                octant_index(0. < offset.x, 0. < offset.y, 0. < offset.z),
                octant
            );
        }
    }

    #[test]
    fn test_hash_region_towards_inner_positions() {
        let direction = V3c::new(1., -1., 1.);
        assert_eq!(hash_region_towards(&V3c::new(0.0, 0.0, 0.0), 12.0, &direction), 0);
        assert_eq!(hash_region_towards(&V3c::new(7.0, 0.0, 0.0), 12.0, &direction), 1);
        assert_eq!(hash_region_towards(&V3c::new(0.0, 7.0, 0.0), 12.0, &direction), 2);
        assert_eq!(hash_region_towards(&V3c::new(0.0, 0.0, 7.0), 12.0, &direction), 4);
        assert_eq!(hash_region_towards(&V3c::new(10.0, 10.0, 10.0), 12.0, &direction), 7);
    }

    #[test]
    fn test_hash_region_towards_direction() {
        let on_boundary = V3c::new(6., 1., 1.);
        assert_eq!(
            hash_region_towards(&on_boundary, 12., &V3c::new(1., 0., 0.)),
            1
        );
        assert_eq!(
            hash_region_towards(&on_boundary, 12., &V3c::new(-1., 0., 0.)),
            0
        );
        // Off-boundary positions ignore the direction
        assert_eq!(
            hash_region_towards(&V3c::new(9., 9., 1.), 12., &V3c::new(-1., -1., 1.)),
            3
        );
    }

    #[test]
    fn test_hash_region_towards_without_movement_on_axis() {
        // On every halving plane, moving only along z: x and y fall to the positive side
        let on_center = V3c::new(1., 1., 1.);
        assert_eq!(hash_region_towards(&on_center, 2., &V3c::new(0., 0., 1.)), 7);
        assert_eq!(hash_region_towards(&on_center, 2., &V3c::new(0., 0., -1.)), 3);
        assert_eq!(hash_region_towards(&on_center, 2., &V3c::new(-1., 0., 0.)), 6);
        assert_eq!(hash_region_towards(&on_center, 2., &V3c::unit(0.)), 7);

        // Agrees with the octant a point on the plane is inserted into
        let on_x_plane = V3c::new(6., 2., 9.);
        assert_eq!(
            hash_region_towards(&on_x_plane, 12., &V3c::new(0., 1., 0.)),
            octant_index(
                on_x_plane.x >= 6.,
                on_x_plane.y >= 6.,
                on_x_plane.z >= 6.
            )
        );
    }
}
