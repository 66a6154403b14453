//! Greedy color matching between live voxels and a new target shape.
//!
//! Targets are visited in input order. Each one claims the untaken source
//! whose color is nearest; ties go to the lowest source index. This is not a
//! minimum-cost matching: a later target can end up with a worse partner than
//! an optimal assignment would give it, and reassembly looks the way it does
//! because of that order.

use glam::IVec3;

use crate::shape::target::Target;
use crate::voxel::voxel::{Rgb, Voxel};
use super::config::RebuildConfig;

/// What a voxel does during a rebuild
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Assignment {
    /// Travel to `position` once `delay` seconds have passed since the rebuild started
    Destination { position: IVec3, delay: f32 },
    /// No target claimed this voxel; it stays where it is
    Rubble,
}

impl Assignment {
    pub fn is_rubble(&self) -> bool {
        matches!(self, Assignment::Rubble)
    }

    pub fn destination(&self) -> Option<IVec3> {
        match self {
            Assignment::Destination { position, .. } => Some(*position),
            Assignment::Rubble => None,
        }
    }
}

/// Release delay for a destination at height `y`.
///
/// Zero at or below the floor, then linear: `delay_per_span` seconds for
/// every `height_span` units of height.
pub fn release_delay(y: i32, floor_y: f32, config: &RebuildConfig) -> f32 {
    let spans = ((y as f32 - floor_y) / config.height_span).max(0.0);
    spans * config.delay_per_span
}

/// Assign every source voxel a destination or mark it as rubble.
///
/// The result is indexed like `sources`. At most `min(sources, targets)`
/// entries are destinations; excess targets are ignored.
pub fn match_colors(
    sources: &[Voxel],
    targets: &[Target],
    floor_y: f32,
    config: &RebuildConfig,
) -> Vec<Assignment> {
    let colors: Vec<Rgb> = sources.iter().map(|v| v.color).collect();
    let mut taken = vec![false; colors.len()];
    let mut assignments = vec![Assignment::Rubble; colors.len()];
    let mut remaining = colors.len();

    for target in targets {
        if remaining == 0 {
            break;
        }

        let wanted = target.rgb();
        let mut best: Option<(usize, f32)> = None;

        for (index, color) in colors.iter().enumerate() {
            if taken[index] {
                continue;
            }
            let dist = color.distance(&wanted);
            if best.is_none_or(|(_, best_dist)| dist < best_dist) {
                best = Some((index, dist));
                if dist < config.exact_match_epsilon {
                    break;
                }
            }
        }

        if let Some((index, _)) = best {
            taken[index] = true;
            remaining -= 1;
            assignments[index] = Assignment::Destination {
                position: target.cell(),
                delay: release_delay(target.y, floor_y, config),
            };
        }
    }

    log::debug!(
        "Matched {} of {} targets to {} sources ({} rubble)",
        colors.len() - remaining,
        targets.len(),
        colors.len(),
        remaining
    );

    assignments
}
