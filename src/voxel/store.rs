//! Owned set of live voxels for the currently loaded shape

use std::collections::HashSet;

use crate::core::Result;
use crate::shape::target::Target;
use super::snapshot::{SnapshotEntry, round_to_grid};
use super::voxel::Voxel;

/// The live voxel array.
///
/// Contents are created wholesale by [`VoxelStore::load`] and replaced by the
/// next load. Simulation phases mutate voxels in place; the count never
/// changes between loads.
#[derive(Clone, Debug, Default)]
pub struct VoxelStore {
    voxels: Vec<Voxel>,
}

impl VoxelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all voxels with one per target, at rest. Returns the new count.
    pub fn load(&mut self, targets: &[Target]) -> usize {
        self.voxels = targets
            .iter()
            .enumerate()
            .map(|(id, target)| Voxel::new(id, target.position(), target.rgb()))
            .collect();
        self.voxels.len()
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub(crate) fn voxels_mut(&mut self) -> &mut [Voxel] {
        &mut self.voxels
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Voxel> {
        self.voxels.iter()
    }

    /// Current voxels rounded to the grid, in store order
    pub fn export_snapshot(&self) -> Vec<SnapshotEntry> {
        self.voxels
            .iter()
            .map(|v| SnapshotEntry {
                x: round_to_grid(v.position.x),
                y: round_to_grid(v.position.y),
                z: round_to_grid(v.position.z),
                color: v.color.to_hex_string(),
            })
            .collect()
    }

    /// Snapshot as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_snapshot())?)
    }

    /// Distinct `#rrggbb` colors in first-seen order
    pub fn unique_colors(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.voxels
            .iter()
            .map(|v| v.color.to_hex_string())
            .filter(|hex| seen.insert(hex.clone()))
            .collect()
    }
}
