use crate::octree::{packed::PackedOctree, Octree, OctreeError, OctreeSettings};
use crate::scene::{Scene, Spatial, SpatialId};
use std::collections::HashMap;

/// Octree of a spatial along with its packed form
#[derive(Debug, Clone)]
pub struct CachedOctree {
    generation: u64,
    octree: Octree,
    packed: PackedOctree,
}

impl CachedOctree {
    fn build(spatial: &Spatial, settings: &OctreeSettings) -> Result<Self, OctreeError> {
        let octree = Octree::from_spatial(spatial, settings)?;
        let packed = PackedOctree::serialize(&octree, settings.max_data_size);
        Ok(Self {
            generation: spatial.generation(),
            octree,
            packed,
        })
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn packed(&self) -> &PackedOctree {
        &self.packed
    }

    /// Generation of the spatial geometry the octree was built from
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Octrees of the spatials in a scene, created on first use and rebuilt when the geometry changes.
/// Building requires exclusive access, tracing only reads the cache.
#[derive(Debug, Clone, Default)]
pub struct OctreeCache {
    settings: OctreeSettings,
    entries: HashMap<SpatialId, CachedOctree>,
}

impl OctreeCache {
    pub fn new(settings: OctreeSettings) -> Self {
        Self {
            settings,
            entries: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &OctreeSettings {
        &self.settings
    }

    /// Provides the octree of the spatial, building it if it is missing or outdated
    pub fn get_or_build(&mut self, spatial: &Spatial) -> Result<&CachedOctree, OctreeError> {
        let up_to_date = self
            .entries
            .get(&spatial.id())
            .is_some_and(|entry| entry.generation == spatial.generation());
        if !up_to_date {
            log::debug!(
                "Building octree for spatial {:?} at generation {}",
                spatial.id(),
                spatial.generation()
            );
            let entry = CachedOctree::build(spatial, &self.settings)?;
            self.entries.insert(spatial.id(), entry);
        }
        Ok(&self.entries[&spatial.id()])
    }

    pub fn get(&self, id: SpatialId) -> Option<&CachedOctree> {
        self.entries.get(&id)
    }

    pub fn remove(&mut self, id: SpatialId) -> Option<CachedOctree> {
        self.entries.remove(&id)
    }

    /// Brings the cache in sync with the scene: builds the missing or outdated octrees
    /// and drops the ones whose spatial is no longer part of the scene.
    /// A spatial failing to build is left out of the cache, the rest of the scene is still built;
    /// the first such error is returned.
    pub fn prefabricate(&mut self, scene: &Scene) -> Result<(), OctreeError> {
        let mut first_error = None;
        for spatial in scene.spatials() {
            let result = self.get_or_build(spatial).map(|_| ());
            if let Err(error) = result {
                log::error!(
                    "Unable to build octree for spatial {:?}: {:?}",
                    spatial.id(),
                    error
                );
                self.entries.remove(&spatial.id());
                first_error.get_or_insert(error);
            }
        }
        self.entries.retain(|id, _| scene.get(*id).is_some());
        first_error.map_or(Ok(()), Err)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
