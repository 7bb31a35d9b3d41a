use crate::octree::types::{NodeChildren, Octree, OctreeError, PACKED_HEADER_SIZE};
use crate::spatial::{
    math::{hash_region_towards, vector::V3c},
    Cube, FLOAT_ERROR_TOLERANCE,
};

/// Flat, address linked float representation of an octree, laid out for transfer into a fixed size buffer.
///
/// Header (12 floats): `[root_size, min_leaf_size, reserved, position.xyz, rotation.xyz, scale.xyz]`
///
/// Body, depth first in pre-order:
/// - internal nodes take 8 slots, one per child in `x + 2y + 4z` order, each either `0.0`
///   for an empty child or the index inside the buffer where the child node starts
/// - leaf nodes take a single slot, `1.0` if occupied, `0.0` otherwise
#[derive(Debug, Clone, PartialEq)]
pub struct PackedOctree {
    pub(crate) data: Vec<f32>,
    pub(crate) overflowed: bool,
}

/// A decoded node of the packed representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackedNode {
    Leaf { occupied: bool },
    /// Buffer addresses of the children, 0 where there is no child
    Internal { children: [u32; 8] },
}

/// The cell of a packed octree containing a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackedCell {
    pub bounds: Cube,
    pub occupied: bool,
    /// Number of levels below the root
    pub level: u32,
}

fn slot_is_set(value: f32) -> bool {
    FLOAT_ERROR_TOLERANCE < value.abs()
}

impl PackedOctree {
    /// Flattens the given octree. Exceeding `max_data_size` floats is reported in the log
    /// and through [`PackedOctree::overflowed`], the complete buffer is still returned.
    pub fn serialize(octree: &Octree, max_data_size: usize) -> Self {
        let offset = octree.offset();
        let mut data = Vec::with_capacity(PACKED_HEADER_SIZE + 8 * octree.octants.len());
        data.extend_from_slice(&[
            octree.root_size(),
            octree.min_cell_size(),
            0.,
            offset.x,
            offset.y,
            offset.z,
            // rotation
            0.,
            0.,
            0.,
            // scale
            1.,
            1.,
            1.,
        ]);
        debug_assert_eq!(PACKED_HEADER_SIZE, data.len());

        if let Some(root) = octree.root() {
            emit_node(octree, root, 0, &mut data);
        }

        let overflowed = data.len() > max_data_size;
        if overflowed {
            log::error!(
                "Packed octree takes {} floats, which exceeds the maximum transfer size of {}",
                data.len(),
                max_data_size
            );
        }
        Self { data, overflowed }
    }

    /// Wraps an already packed buffer, e.g. one read back from storage
    pub fn from_raw(data: Vec<f32>) -> Result<Self, OctreeError> {
        if data.len() < PACKED_HEADER_SIZE {
            return Err(OctreeError::InvalidPackedHeader(data.len()));
        }
        let (root_size, min_leaf_size) = (data[0], data[1]);
        if !root_size.is_finite()
            || !min_leaf_size.is_finite()
            || root_size < 0.
            || (PACKED_HEADER_SIZE < data.len() && (min_leaf_size <= 0. || root_size < min_leaf_size))
        {
            return Err(OctreeError::InvalidPackedStructure {
                root_size,
                min_leaf_size,
            });
        }
        Ok(Self {
            data,
            overflowed: false,
        })
    }

    /// True if the buffer grew beyond the maximum size during serialization
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<f32> {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer contains no nodes
    pub fn is_empty(&self) -> bool {
        self.data.len() <= PACKED_HEADER_SIZE
    }

    pub fn root_size(&self) -> f32 {
        self.data[0]
    }

    pub fn min_leaf_size(&self) -> f32 {
        self.data[1]
    }

    pub fn position(&self) -> V3c<f32> {
        V3c::new(self.data[3], self.data[4], self.data[5])
    }

    pub fn rotation(&self) -> V3c<f32> {
        V3c::new(self.data[6], self.data[7], self.data[8])
    }

    pub fn scale(&self) -> V3c<f32> {
        V3c::new(self.data[9], self.data[10], self.data[11])
    }

    /// Number of levels between the root and the leaves, derived from the header
    pub fn depth(&self) -> u32 {
        let (root_size, min_leaf_size) = (self.root_size(), self.min_leaf_size());
        if min_leaf_size <= 0. || root_size <= min_leaf_size {
            return 0;
        }
        (root_size / min_leaf_size).log2().round() as u32
    }

    /// World space cube covered by the root node
    pub fn root_cube(&self) -> Cube {
        Cube::centered_at(self.position(), self.root_size())
    }

    /// Position relative to the root cube, normalized into `[0,1]` on each axis for points inside it
    pub fn local_position(&self, point: &V3c<f32>) -> V3c<f32> {
        let half_size = self.root_size() / 2.;
        (*point + V3c::unit(half_size) - self.position()) / self.root_size()
    }

    /// Decodes the node starting at the given address, `level` levels below the root.
    /// Returns None for addresses outside of the buffer.
    pub fn node(&self, address: usize, level: u32) -> Option<PackedNode> {
        if level >= self.depth() {
            return self.data.get(address).map(|value| PackedNode::Leaf {
                occupied: slot_is_set(*value),
            });
        }

        let slots = self.data.get(address..address + 8)?;
        let mut children = [0; 8];
        for (child, slot) in children.iter_mut().zip(slots) {
            if slot_is_set(*slot) {
                *child = slot.round() as u32;
            }
        }
        Some(PackedNode::Internal { children })
    }

    /// Finds the cell containing the given world space point by descending the packed nodes.
    /// The returned cell is either an occupied leaf, or the largest empty region around the point.
    /// Points on a cell boundary are placed into the cell the given direction is pointing to.
    pub fn cell_at(&self, point: &V3c<f32>, direction: &V3c<f32>) -> Option<PackedCell> {
        let mut bounds = self.root_cube();
        if self.is_empty() || !bounds.contains_point(point) {
            return None;
        }

        let mut address = PACKED_HEADER_SIZE;
        let depth = self.depth();
        for level in 0..=depth {
            match self.node(address, level)? {
                PackedNode::Leaf { occupied } => {
                    return Some(PackedCell {
                        bounds,
                        occupied,
                        level,
                    })
                }
                PackedNode::Internal { children } => {
                    let octant = hash_region_towards(
                        &(*point - bounds.min_position),
                        bounds.size,
                        direction,
                    );
                    bounds = bounds.child_bounds_for(octant);
                    let child_address = children[octant as usize] as usize;
                    if 0 == child_address {
                        return Some(PackedCell {
                            bounds,
                            occupied: false,
                            level: level + 1,
                        });
                    }
                    if child_address <= address {
                        // Children are always stored after their parents
                        return None;
                    }
                    address = child_address;
                }
            }
        }
        None
    }

    /// Collects the bounds of every occupied leaf by following the child addresses
    pub fn occupied_leaves(&self) -> Vec<Cube> {
        let mut leaves = Vec::new();
        if self.is_empty() {
            return leaves;
        }

        let mut node_stack = vec![(PACKED_HEADER_SIZE, 0, self.root_cube())];
        while let Some((address, level, bounds)) = node_stack.pop() {
            match self.node(address, level) {
                Some(PackedNode::Leaf { occupied: true }) => leaves.push(bounds),
                Some(PackedNode::Internal { children }) => {
                    for (octant, child) in children.iter().enumerate() {
                        if 0 != *child && *child as usize > address {
                            node_stack.push((
                                *child as usize,
                                level + 1,
                                bounds.child_bounds_for(octant as u8),
                            ));
                        }
                    }
                }
                Some(PackedNode::Leaf { occupied: false }) | None => {}
            }
        }
        leaves
    }
}

/// True if any leaf under the given octant contains data
fn subtree_has_data(octree: &Octree, key: usize) -> bool {
    let mut node_stack = vec![key];
    while let Some(current) = node_stack.pop() {
        let octant = octree.octants.get(current);
        match octant.children {
            NodeChildren::NoChildren if octant.has_data => return true,
            NodeChildren::NoChildren => {}
            NodeChildren::Children(children) => node_stack.extend_from_slice(&children),
        }
    }
    false
}

/// Appends the given octant at the end of the buffer.
/// Nodes at the maximum depth are always written as leaves, so the decoder
/// can tell leaves apart from internal nodes by their level alone.
fn emit_node(octree: &Octree, key: usize, level: u32, data: &mut Vec<f32>) {
    let octant = octree.octants.get(key);
    if level >= octree.depth() {
        data.push(if subtree_has_data(octree, key) { 1. } else { 0. });
        return;
    }

    match octant.children {
        NodeChildren::NoChildren if octant.has_data => emit_uniform(level, octree.depth(), data),
        NodeChildren::NoChildren => data.extend_from_slice(&[0.; 8]),
        NodeChildren::Children(children) => {
            let node_address = data.len();
            data.extend_from_slice(&[0.; 8]);
            for (octant_index, child_key) in children.iter().enumerate() {
                let child = octree.octants.get(*child_key);
                if child.is_leaf() && !child.has_data {
                    continue;
                }
                data[node_address + octant_index] = data.len() as f32;
                emit_node(octree, *child_key, level + 1, data);
            }
        }
    }
}

/// Appends a completely occupied subtree, standing in for a leaf with data above the maximum depth
fn emit_uniform(level: u32, depth: u32, data: &mut Vec<f32>) {
    if level >= depth {
        data.push(1.);
        return;
    }
    let node_address = data.len();
    data.extend_from_slice(&[0.; 8]);
    for octant_index in 0..8 {
        data[node_address + octant_index] = data.len() as f32;
        emit_uniform(level + 1, depth, data);
    }
}
