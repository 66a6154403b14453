//! Staged reconstruction towards matched destinations

use glam::Vec3;

use crate::voxel::voxel::Voxel;
use super::config::RebuildConfig;
use super::matcher::Assignment;

/// Bookkeeping for one in-flight rebuild. Discarded when the rebuild completes.
#[derive(Clone, Debug)]
pub struct RebuildPlan {
    /// One entry per live voxel, indexed like the store
    pub assignments: Vec<Assignment>,
    /// Session time at which the rebuild was requested
    pub started_at: f32,
}

impl RebuildPlan {
    pub fn new(assignments: Vec<Assignment>, started_at: f32) -> Self {
        Self { assignments, started_at }
    }

    /// Number of voxels that will travel
    pub fn destination_count(&self) -> usize {
        self.assignments.iter().filter(|a| !a.is_rubble()).count()
    }

    pub fn rubble_count(&self) -> usize {
        self.assignments.len() - self.destination_count()
    }

    /// True when nothing will ever move, so the rebuild is complete on entry
    pub fn is_trivial(&self) -> bool {
        self.destination_count() == 0
    }
}

/// Fraction of the remaining distance covered in `frames` reference frames
pub fn approach_fraction(frames: f32, config: &RebuildConfig) -> f32 {
    1.0 - (1.0 - config.approach_rate).powf(frames.max(0.0))
}

/// Move released voxels towards their destinations.
///
/// Rubble is left untouched. A voxel whose delay has not yet elapsed is left
/// untouched and keeps the rebuild open. Released voxels close a fixed
/// fraction of the remaining gap (position and rotation) and snap exactly
/// once within `snap_distance_sq`. Returns true once every destination voxel
/// has snapped.
pub fn advance(
    voxels: &mut [Voxel],
    plan: &RebuildPlan,
    now: f32,
    frames: f32,
    config: &RebuildConfig,
) -> bool {
    let elapsed = now - plan.started_at;
    let fraction = approach_fraction(frames, config);
    let mut all_done = true;

    for (voxel, assignment) in voxels.iter_mut().zip(&plan.assignments) {
        let (destination, delay) = match *assignment {
            Assignment::Rubble => continue,
            Assignment::Destination { position, delay } => (position.as_vec3(), delay),
        };

        if elapsed < delay {
            all_done = false;
            continue;
        }

        voxel.position += (destination - voxel.position) * fraction;
        voxel.rotation -= voxel.rotation * fraction;

        if voxel.position.distance_squared(destination) > config.snap_distance_sq {
            all_done = false;
        } else {
            voxel.position = destination;
            voxel.rotation = Vec3::ZERO;
            voxel.settle();
        }
    }

    all_done
}
