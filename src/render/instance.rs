//! Per-voxel render payload

use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::voxel::voxel::Voxel;

/// Instance data for one voxel, tightly packed for a per-instance vertex buffer
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Center in world space (12 bytes, offset 0)
    pub position: [f32; 3],
    /// Euler angles, XYZ order, radians (12 bytes, offset 12)
    pub rotation: [f32; 3],
    /// Normalized RGB in [0, 1] (12 bytes, offset 24)
    pub color: [f32; 3],
}

impl InstanceData {
    pub fn from_voxel(voxel: &Voxel) -> Self {
        Self {
            position: voxel.position.to_array(),
            rotation: voxel.rotation.to_array(),
            color: voxel.color.to_array(),
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        let [x, y, z] = self.rotation;
        Quat::from_euler(EulerRot::XYZ, x, y, z)
    }

    /// Model matrix for a cube of edge `scale` at this instance
    pub fn model_matrix(&self, scale: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(scale),
            self.rotation_quat(),
            Vec3::from_array(self.position),
        )
    }
}

/// View a slice of instances as raw bytes for upload
pub fn as_bytes(instances: &[InstanceData]) -> &[u8] {
    bytemuck::cast_slice(instances)
}
