pub mod bounds;
pub mod packed;
pub mod raytracing;
pub mod types;

#[cfg(feature = "bytecode")]
mod convert;


pub use crate::octree::types::{
    NodeChildren, Octant, Octree, OctreeError, OctreeSettings, MAX_DATA_SIZE, MIN_CELL_SIZE,
    PACKED_HEADER_SIZE,
};
pub use crate::spatial::math::vector::V3c;

use crate::object_pool::ObjectPool;
use crate::octree::bounds::fit_bounds;
use crate::scene::Spatial;
use crate::spatial::{math::octant_index, Aabb, Cube};
use std::hash::{DefaultHasher, Hash, Hasher};

/// Debug identifier of a child octant, derived from its parents identifier
fn child_octant_id(parent_id: u32, octant: u8) -> u32 {
    let mut hasher = DefaultHasher::new();
    parent_id.hash(&mut hasher);
    octant.hash(&mut hasher);
    hasher.finish() as u32
}

impl Octree {
    /// An octree without geometry; every query on it misses
    pub fn empty(settings: &OctreeSettings) -> Self {
        Self {
            empty: true,
            true_bounds: Aabb::default(),
            root_size: 0.,
            depth: 0,
            offset: V3c::unit(0.),
            min_cell_size: settings.min_cell_size,
            root: None,
            octants: ObjectPool::default(),
        }
    }

    /// Creates an octree with a single unbranched root octant of the given size,
    /// centered at `offset` and meant to be subdivided `depth` times
    pub fn new(root_size: f32, depth: u32, offset: V3c<f32>) -> Self {
        let mut octants = ObjectPool::<Octant>::with_capacity(1 + 8 * depth as usize);
        let root = octants.push(Octant {
            size: root_size,
            id: child_octant_id(0, 0),
            has_data: false,
            children: NodeChildren::NoChildren,
        });
        let root_cube = Cube::centered_at(offset, root_size);
        Self {
            empty: false,
            true_bounds: Aabb {
                min: root_cube.min_position,
                max: root_cube.max_position(),
            },
            root_size,
            depth,
            offset,
            min_cell_size: root_size / 2_f32.powi(depth as i32),
            root: Some(root),
            octants,
        }
    }

    /// Builds an octree over the given world space points.
    /// Without usable points the result is an empty octree, which is not an error.
    pub fn from_points(points: &[V3c<f32>], settings: &OctreeSettings) -> Result<Self, OctreeError> {
        settings.validate()?;
        let Some(fitted) = fit_bounds(points, settings.min_cell_size) else {
            return Ok(Self::empty(settings));
        };

        let mut octree = Self::new(fitted.root_size, fitted.depth, fitted.center_offset);
        octree.true_bounds = fitted.bounds;
        octree.min_cell_size = settings.min_cell_size;
        for point in points.iter().filter(|point| point.is_finite()) {
            octree.insert(point);
        }
        log::debug!(
            "Built octree: root size {}, depth {}, {} octants over {} points",
            octree.root_size,
            octree.depth,
            octree.octants.len(),
            points.len()
        );
        Ok(octree)
    }

    /// Builds an octree over the position data of every geometric attached to the spatial
    pub fn from_spatial(spatial: &Spatial, settings: &OctreeSettings) -> Result<Self, OctreeError> {
        Self::from_points(&spatial.positions(), settings)
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Bounds of the input points before quantization
    pub fn true_bounds(&self) -> &Aabb {
        &self.true_bounds
    }

    pub fn root_size(&self) -> f32 {
        self.root_size
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Translation from the local octree space to world space
    pub fn offset(&self) -> V3c<f32> {
        self.offset
    }

    pub fn min_cell_size(&self) -> f32 {
        self.min_cell_size
    }

    pub fn root(&self) -> Option<usize> {
        self.root
    }

    /// World space cube covered by the root octant
    pub fn root_cube(&self) -> Cube {
        Cube::centered_at(self.offset, self.root_size)
    }

    pub fn octant(&self, key: usize) -> Option<&Octant> {
        if self.octants.key_is_valid(key) {
            Some(self.octants.get(key))
        } else {
            None
        }
    }

    /// Subdivides the given octant `depth` levels deep, every branch is fully allocated
    pub fn branch(&mut self, node: usize, depth: u32) {
        if 0 == depth || !self.octants.key_is_valid(node) {
            return;
        }

        let mut node_stack = vec![(node, depth)];
        while let Some((current_key, current_depth)) = node_stack.pop() {
            let children = match self.octants.get(current_key).children {
                NodeChildren::Children(children) => children,
                NodeChildren::NoChildren => {
                    let parent = self.octants.get(current_key);
                    let (child_size, parent_id) = (parent.size / 2., parent.id);
                    let mut children = [0; 8];
                    for (octant, child) in children.iter_mut().enumerate() {
                        *child = self.octants.push(Octant {
                            size: child_size,
                            id: child_octant_id(parent_id, octant as u8),
                            has_data: false,
                            children: NodeChildren::NoChildren,
                        });
                    }
                    self.octants.get_mut(current_key).children = NodeChildren::Children(children);
                    children
                }
            };

            if 1 < current_depth {
                node_stack.extend(children.iter().map(|child| (*child, current_depth - 1)));
            }
        }
    }

    /// Provides the child of the given octant on the requested side of its center,
    /// if the octant is already branched
    pub fn get_child(&self, node: usize, x: bool, y: bool, z: bool) -> Option<usize> {
        self.octant(node)?
            .children()
            .map(|children| children[octant_index(x, y, z) as usize])
    }

    /// Marks the leaf containing the given world space point as occupied,
    /// branching the octants along the way as needed.
    /// Returns false if the point is outside the root cube.
    pub fn insert(&mut self, point: &V3c<f32>) -> bool {
        let Some(root) = self.root else {
            return false;
        };
        if !self.root_cube().contains_point(point) {
            log::debug!("Point {point:?} is outside of the octree root, skipping");
            return false;
        }

        let local_point = *point - self.offset;
        let mut center = V3c::unit(0.);
        let mut current_key = root;
        let mut current_size = self.root_size;
        for _ in 0..self.depth {
            let (x, y, z) = (
                local_point.x >= center.x,
                local_point.y >= center.y,
                local_point.z >= center.z,
            );
            self.branch(current_key, 1);
            let Some(child) = self.get_child(current_key, x, y, z) else {
                return false;
            };
            current_size /= 2.;
            let half_size = current_size / 2.;
            let step = |positive: bool| if positive { half_size } else { -half_size };
            center = center + V3c::new(step(x), step(y), step(z));
            current_key = child;
        }
        self.octants.get_mut(current_key).has_data = true;
        true
    }

    /// Finds the leaf octant at the given world space point, along with its bounds
    pub fn leaf_at(&self, point: &V3c<f32>) -> Option<(usize, Cube)> {
        let root = self.root?;
        let mut bounds = self.root_cube();
        if !bounds.contains_point(point) {
            return None;
        }

        let mut current_key = root;
        loop {
            let octant = self.octants.get(current_key);
            let Some(children) = octant.children() else {
                return Some((current_key, bounds));
            };
            let center = bounds.midpoint();
            let child_octant = octant_index(
                point.x >= center.x,
                point.y >= center.y,
                point.z >= center.z,
            );
            current_key = children[child_octant as usize];
            bounds = bounds.child_bounds_for(child_octant);
        }
    }

    /// True if the leaf at the given world space point contains data
    pub fn is_occupied_at(&self, point: &V3c<f32>) -> bool {
        self.leaf_at(point)
            .is_some_and(|(key, _)| self.octants.get(key).has_data)
    }

    /// Number of leaves marked as containing data
    pub fn occupied_leaf_count(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut count = 0;
        let mut node_stack = vec![root];
        while let Some(key) = node_stack.pop() {
            let octant = self.octants.get(key);
            match octant.children() {
                Some(children) => node_stack.extend_from_slice(children),
                None => count += octant.has_data as usize,
            }
        }
        count
    }
}
