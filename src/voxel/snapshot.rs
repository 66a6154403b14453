//! Exported snapshot entries used for sharing and import/export

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::shape::target::Target;
use crate::voxel::voxel::parse_hex_color;

/// A voxel rounded to the integer grid with a `#rrggbb` color
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub color: String,
}

impl SnapshotEntry {
    /// Convert back into a load target
    pub fn to_target(&self, index: usize) -> Result<Target> {
        let color = parse_hex_color(&self.color).ok_or_else(|| {
            Error::validation(index, format!("unparsable color {:?}", self.color))
        })?;
        Ok(Target::new(self.x, self.y, self.z, color))
    }
}

/// Convert a whole snapshot into targets, failing on the first bad entry
pub fn snapshot_to_targets(entries: &[SnapshotEntry]) -> Result<Vec<Target>> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| entry.to_target(index))
        .collect()
}

/// Round half towards positive infinity, so -0.5 becomes 0 and 0.5 becomes 1
pub fn round_to_grid(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}
