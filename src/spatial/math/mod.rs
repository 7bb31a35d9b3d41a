mod tests;
pub mod vector;

use crate::spatial::{math::vector::V3c, FLOAT_ERROR_TOLERANCE};

///####################################################################################
/// Octant
///####################################################################################
/// Relative offset of the given octant inside its parent, each component either 0 or 1
/// The octant index is `x + 2y + 4z`, a bit being set on the positive side of the parent center
pub(crate) fn offset_region(octant: u8) -> V3c<f32> {
    match octant {
        0 => V3c::new(0., 0., 0.),
        1 => V3c::new(1., 0., 0.),
        2 => V3c::new(0., 1., 0.),
        3 => V3c::new(1., 1., 0.),
        4 => V3c::new(0., 0., 1.),
        5 => V3c::new(1., 0., 1.),
        6 => V3c::new(0., 1., 1.),
        7 => V3c::new(1., 1., 1.),
        _ => panic!("Invalid region hash provided for spatial reference!"),
    }
}

/// Assembles the octant index from the sign bits on each axis
pub fn octant_index(x: bool, y: bool, z: bool) -> u8 {
    x as u8 + (y as u8) * 2 + (z as u8) * 4
}

/// Assigns the octant index of the given position relative to a cell, see [`octant_index`].
/// Positions lying on the halving planes are resolved towards the given direction, so a ray standing
/// on a cell boundary is always placed into the cell it is heading into.
/// Without movement along an axis the position belongs to the positive side, same as during insertion.
/// * `offset` - From range 0..size in each dimensions
/// * `size` - Size of the region to check for child octants
pub(crate) fn hash_region_towards(offset: &V3c<f32>, size: f32, direction: &V3c<f32>) -> u8 {
    let half_size = size / 2.0;
    let positive_side = |position: f32, direction: f32| {
        if (position - half_size).abs() <= FLOAT_ERROR_TOLERANCE * size.max(1.) {
            if 0. == direction {
                true
            } else {
                0. < direction
            }
        } else {
            position > half_size
        }
    };
    octant_index(
        positive_side(offset.x, direction.x),
        positive_side(offset.y, direction.y),
        positive_side(offset.z, direction.z),
    )
}
