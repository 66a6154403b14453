//! Voxel data structures

pub mod voxel;
pub mod store;
pub mod snapshot;

pub use voxel::{Rgb, Voxel, parse_hex_color};
pub use store::VoxelStore;
pub use snapshot::{SnapshotEntry, snapshot_to_targets};
