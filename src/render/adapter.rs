//! Seam between the engine and whatever draws it

use crate::core::Result;
use super::instance::InstanceData;

/// A renderer that draws one instanced cube per voxel.
///
/// The driver calls `acquire` before the first frame and whenever the voxel
/// count changes, and `release` exactly once per successful `acquire`.
pub trait RenderAdapter {
    /// Allocate resources for `capacity` instances
    fn acquire(&mut self, capacity: usize) -> Result<()>;

    /// Upload this frame's instances (same length as the acquired capacity)
    fn write_instances(&mut self, instances: &[InstanceData]);

    /// Draw the frame
    fn present(&mut self);

    /// Free everything `acquire` allocated
    fn release(&mut self);
}
