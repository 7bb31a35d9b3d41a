use crate::spatial::{math::vector::V3c, Aabb};

/// Result of fitting a cubic, power of two sized region around a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedBounds {
    /// Exact bounds of the input points
    pub bounds: Aabb,
    /// Edge length of the root cube: `2^depth * min_cell_size`
    pub root_size: f32,
    /// Number of subdivision levels from the root to the minimum cell size
    pub depth: u32,
    /// Translation from the local, origin centered octree space to world space
    pub center_offset: V3c<f32>,
}

/// Calculates the bounds of the given points and the smallest power of two multiple
/// of `min_cell_size` enclosing them. Returns with None if there are no usable points.
/// Points with non-finite coordinates are ignored.
pub fn fit_bounds(points: &[V3c<f32>], min_cell_size: f32) -> Option<FittedBounds> {
    let mut bounds = Aabb::default();
    let mut skipped = 0;
    for point in points {
        if point.is_finite() {
            bounds.extend(point);
        } else {
            skipped += 1;
        }
    }
    if 0 < skipped {
        log::warn!("Skipped {skipped} points with non-finite coordinates while fitting bounds");
    }
    if !bounds.is_valid() {
        return None;
    }

    let extent = bounds.size().max_component();
    let (root_size, depth) = root_size_for(extent, min_cell_size);
    Some(FittedBounds {
        bounds,
        root_size,
        depth,
        center_offset: bounds.center(),
    })
}

/// Smallest `2^depth * min_cell_size` not smaller than `extent`, with the depth.
/// Degenerate extents result in depth 0.
pub(crate) fn root_size_for(extent: f32, min_cell_size: f32) -> (f32, u32) {
    let cells = extent / min_cell_size;
    let mut depth = if cells > 1. && cells.is_finite() {
        cells.log2().ceil() as u32
    } else {
        0
    };
    // log2 may land on the wrong side of an integer
    while (2_f32.powi(depth as i32) * min_cell_size) < extent {
        depth += 1;
    }
    (2_f32.powi(depth as i32) * min_cell_size, depth)
}
