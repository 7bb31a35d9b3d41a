// TODO:
// - Support rays starting inside the root cube of an octree
// - Trace the spatials of a scene by distance instead of scene order
// - Apply the rotation and scale of the packed header during traversal

pub mod object_pool;
pub mod octree;
pub mod render;
pub mod scene;
pub mod spatial;
