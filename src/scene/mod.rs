
use crate::spatial::math::vector::V3c;

/// Index of the vertex buffer carrying the vertex positions of a geometric
pub const POSITION_VBO_INDEX: u32 = 0;

/// Number of floats in one position tuple
pub const POSITION_TUPLE_SIZE: usize = 3;

/// Flat vertex attribute buffer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vbo {
    /// Attribute index the buffer is bound to
    pub index: u32,
    /// Number of floats making up one element
    pub tuple_size: usize,
    pub data: Vec<f32>,
}

impl Vbo {
    pub fn new(index: u32, tuple_size: usize, data: Vec<f32>) -> Self {
        Self {
            index,
            tuple_size,
            data,
        }
    }

    /// A position buffer from the given points
    pub fn positions(points: &[V3c<f32>]) -> Self {
        Self {
            index: POSITION_VBO_INDEX,
            tuple_size: POSITION_TUPLE_SIZE,
            data: points.iter().flat_map(|p| [p.x, p.y, p.z]).collect(),
        }
    }
}

/// A piece of geometry made of vertex buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometric {
    pub vbos: Vec<Vbo>,
}

impl Geometric {
    pub fn new(vbos: Vec<Vbo>) -> Self {
        Self { vbos }
    }

    /// The buffer holding the vertex positions, if there is any
    pub fn position_vbo(&self) -> Option<&Vbo> {
        self.vbos
            .iter()
            .find(|vbo| POSITION_VBO_INDEX == vbo.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpatialId(pub u32);

/// An entity of the scene, owning the geometry an octree is built from
#[derive(Debug, Clone, PartialEq)]
pub struct Spatial {
    id: SpatialId,
    geometrics: Vec<Geometric>,
    /// Increased on every geometry change
    generation: u64,
}

impl Spatial {
    pub fn new(id: SpatialId) -> Self {
        Self {
            id,
            geometrics: Vec::new(),
            generation: 0,
        }
    }

    pub fn with_geometric(mut self, geometric: Geometric) -> Self {
        self.add_geometric(geometric);
        self
    }

    pub fn id(&self) -> SpatialId {
        self.id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn geometrics(&self) -> &[Geometric] {
        &self.geometrics
    }

    pub fn add_geometric(&mut self, geometric: Geometric) {
        self.geometrics.push(geometric);
        self.generation += 1;
    }

    pub fn clear_geometrics(&mut self) {
        self.geometrics.clear();
        self.generation += 1;
    }

    /// Aggregates the vertex positions of every attached geometric.
    /// Geometrics without a position buffer contribute nothing;
    /// position buffers with a tuple size other than 3 are skipped with a warning.
    pub fn positions(&self) -> Vec<V3c<f32>> {
        let mut positions = Vec::new();
        for (geometric_index, geometric) in self.geometrics.iter().enumerate() {
            let Some(vbo) = geometric.position_vbo() else {
                continue;
            };
            if POSITION_TUPLE_SIZE != vbo.tuple_size {
                log::warn!(
                    "Spatial {:?}: position buffer of geometric {} has tuple size {}, expected {}; skipping",
                    self.id,
                    geometric_index,
                    vbo.tuple_size,
                    POSITION_TUPLE_SIZE
                );
                continue;
            }
            if 0 != vbo.data.len() % POSITION_TUPLE_SIZE {
                log::warn!(
                    "Spatial {:?}: position buffer of geometric {} ends with an incomplete tuple",
                    self.id,
                    geometric_index
                );
            }
            positions.extend(
                vbo.data
                    .chunks_exact(POSITION_TUPLE_SIZE)
                    .map(|tuple| V3c::new(tuple[0], tuple[1], tuple[2])),
            );
        }
        positions
    }
}

/// Ordered collection of spatial entities
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    spatials: Vec<Spatial>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the spatial to the scene, replacing any previous one with the same id
    pub fn insert(&mut self, spatial: Spatial) {
        match self.spatials.iter_mut().find(|s| s.id == spatial.id) {
            Some(existing) => {
                let generation = existing.generation.max(spatial.generation) + 1;
                *existing = spatial;
                existing.generation = generation;
            }
            None => self.spatials.push(spatial),
        }
    }

    pub fn remove(&mut self, id: SpatialId) -> Option<Spatial> {
        let index = self.spatials.iter().position(|s| s.id == id)?;
        Some(self.spatials.remove(index))
    }

    pub fn get(&self, id: SpatialId) -> Option<&Spatial> {
        self.spatials.iter().find(|s| s.id == id)
    }

    pub fn get_mut(&mut self, id: SpatialId) -> Option<&mut Spatial> {
        self.spatials.iter_mut().find(|s| s.id == id)
    }

    pub fn spatials(&self) -> impl Iterator<Item = &Spatial> {
        self.spatials.iter()
    }

    pub fn len(&self) -> usize {
        self.spatials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spatials.is_empty()
    }
}
