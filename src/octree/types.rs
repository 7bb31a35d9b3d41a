use crate::object_pool::ObjectPool;
use crate::spatial::{math::vector::V3c, Aabb};

#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Edge length of the smallest cell the octrees are subdivided to, in world units
pub const MIN_CELL_SIZE: f32 = 0.04;

/// Maximum number of floats a packed octree may occupy in the transfer buffer
pub const MAX_DATA_SIZE: usize = 256 * 256;

/// Number of floats preceding the first node in a packed octree
pub const PACKED_HEADER_SIZE: usize = 12;

/// error types during usage or creation of the octree
#[derive(Debug, Clone, PartialEq)]
pub enum OctreeError {
    /// The minimum cell size must be a positive, finite number
    InvalidCellSize(f32),
    /// The raw buffer is too short to hold the packed octree header
    InvalidPackedHeader(usize),
    /// The header of the packed buffer describes an impossible octree
    InvalidPackedStructure { root_size: f32, min_leaf_size: f32 },
}

/// Settings shared by octree construction and traversal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct OctreeSettings {
    /// Edge length of the leaf cells, every root size is a power of two multiple of it
    pub min_cell_size: f32,

    /// Exceeding this number of floats in the packed representation is reported as an error
    pub max_data_size: usize,
}

impl Default for OctreeSettings {
    fn default() -> Self {
        Self {
            min_cell_size: MIN_CELL_SIZE,
            max_data_size: MAX_DATA_SIZE,
        }
    }
}

impl OctreeSettings {
    pub fn with_min_cell_size(mut self, min_cell_size: f32) -> Self {
        self.min_cell_size = min_cell_size;
        self
    }

    pub fn with_max_data_size(mut self, max_data_size: usize) -> Self {
        self.max_data_size = max_data_size;
        self
    }

    pub fn validate(&self) -> Result<(), OctreeError> {
        if !self.min_cell_size.is_finite() || self.min_cell_size <= 0. {
            return Err(OctreeError::InvalidCellSize(self.min_cell_size));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum NodeChildren {
    /// The node is a leaf
    #[default]
    NoChildren,
    /// Keys of the 8 children inside the octant pool, indexed by `x + 2y + 4z`
    Children([usize; 8]),
}

/// One node of the 8-ary subdivision, a cube shaped region of space
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Octant {
    /// World space edge length of the cell
    pub size: f32,

    /// Identifier for debug visualization
    pub id: u32,

    /// True if the leaf contains at least one input point; meaningless for internal nodes
    pub has_data: bool,

    pub(crate) children: NodeChildren,
}

impl Octant {
    pub fn is_leaf(&self) -> bool {
        matches!(self.children, NodeChildren::NoChildren)
    }

    pub fn children(&self) -> Option<&[usize; 8]> {
        match &self.children {
            NodeChildren::NoChildren => None,
            NodeChildren::Children(children) => Some(children),
        }
    }
}

/// Sparse voxel octree built from the positions of one spatial entity.
/// The tree is built centered around the local origin, `offset` places it back into the world.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Octree {
    pub(crate) empty: bool,
    pub(crate) true_bounds: Aabb,
    pub(crate) root_size: f32,
    pub(crate) depth: u32,
    pub(crate) offset: V3c<f32>,
    pub(crate) min_cell_size: f32,
    pub(crate) root: Option<usize>,
    pub(crate) octants: ObjectPool<Octant>,
}
