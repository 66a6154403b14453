//! Target descriptors consumed by load and rebuild

use std::collections::HashMap;

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::voxel::voxel::{MAX_PACKED_RGB, Rgb};

/// One cell of a target shape: integer grid position plus packed 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub color: u32,
}

impl Target {
    pub const fn new(x: i32, y: i32, z: i32, color: u32) -> Self {
        Self { x, y, z, color }
    }

    pub fn cell(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }

    pub fn position(&self) -> Vec3 {
        self.cell().as_vec3()
    }

    pub fn rgb(&self) -> Rgb {
        Rgb::from_packed(self.color)
    }
}

/// Check a whole payload before anything is mutated.
///
/// Colors must fit in 24 bits. Duplicate cells are an error only when
/// `reject_duplicate_cells` is set; otherwise they are passed through and
/// each becomes its own voxel.
pub fn validate_targets(targets: &[Target], reject_duplicate_cells: bool) -> Result<()> {
    let mut seen: HashMap<IVec3, usize> = HashMap::new();

    for (index, target) in targets.iter().enumerate() {
        if target.color > MAX_PACKED_RGB {
            return Err(Error::validation(
                index,
                format!("color {:#x} does not fit in 24 bits", target.color),
            ));
        }

        if reject_duplicate_cells {
            if let Some(first) = seen.insert(target.cell(), index) {
                return Err(Error::validation(
                    index,
                    format!(
                        "cell ({}, {}, {}) already used by entry {}",
                        target.x, target.y, target.z, first
                    ),
                ));
            }
        }
    }

    Ok(())
}
