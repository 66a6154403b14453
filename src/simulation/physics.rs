//! Bouncing-particle physics for the dismantle phase.
//!
//! Each voxel moves independently: no voxel/voxel collision, only a floor
//! plane that clamps, bounces and damps.

use glam::Vec3;
use rand::Rng;

use crate::voxel::voxel::Voxel;
use super::config::PhysicsConfig;

/// Give every voxel a random outward/upward velocity and a small spin
pub fn scatter<R: Rng + ?Sized>(voxels: &mut [Voxel], rng: &mut R, config: &PhysicsConfig) {
    for voxel in voxels.iter_mut() {
        voxel.velocity = Vec3::new(
            (rng.random::<f32>() - 0.5) * config.scatter_horizontal,
            rng.random::<f32>() * config.scatter_vertical,
            (rng.random::<f32>() - 0.5) * config.scatter_horizontal,
        );
        voxel.angular_velocity = Vec3::new(
            (rng.random::<f32>() - 0.5) * config.scatter_spin,
            (rng.random::<f32>() - 0.5) * config.scatter_spin,
            (rng.random::<f32>() - 0.5) * config.scatter_spin,
        );
    }
}

/// Advance all voxels by `frames` reference frames.
///
/// Gravity and integration scale with `frames`; floor contact damping is
/// applied once per contact regardless of step size. After the call every
/// voxel's height is at least `floor_height`.
pub fn step(voxels: &mut [Voxel], frames: f32, floor_height: f32, config: &PhysicsConfig) {
    for voxel in voxels.iter_mut() {
        voxel.velocity.y -= config.gravity * frames;
        voxel.position += voxel.velocity * frames;
        voxel.rotation += voxel.angular_velocity * frames;

        if voxel.position.y < floor_height {
            voxel.position.y = floor_height;
            voxel.velocity.y *= -config.restitution;
            voxel.velocity.x *= config.friction;
            voxel.velocity.z *= config.friction;
            voxel.angular_velocity *= config.angular_friction;
        }
    }
}
