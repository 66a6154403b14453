//! Grid shape builder with last-write-wins cells

use std::collections::HashMap;

use glam::{IVec3, Vec3};

use crate::voxel::snapshot::round_to_grid;
use super::target::Target;

/// Accumulates colored cells on the integer grid.
///
/// Writing a cell that is already set replaces its color but keeps the
/// cell's original position in the output order, so the result never holds
/// two targets for the same cell.
#[derive(Clone, Debug, Default)]
pub struct ShapeBuilder {
    cells: Vec<Target>,
    index: HashMap<IVec3, usize>,
}

impl ShapeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cell nearest to `position`
    pub fn set_block(&mut self, position: Vec3, color: u32) -> &mut Self {
        let cell = IVec3::new(
            round_to_grid(position.x),
            round_to_grid(position.y),
            round_to_grid(position.z),
        );
        self.set_cell(cell, color)
    }

    /// Set an integer cell
    pub fn set_cell(&mut self, cell: IVec3, color: u32) -> &mut Self {
        let target = Target::new(cell.x, cell.y, cell.z, color);
        match self.index.get(&cell) {
            Some(&slot) => self.cells[slot] = target,
            None => {
                self.index.insert(cell, self.cells.len());
                self.cells.push(target);
            }
        }
        self
    }

    /// Fill an ellipsoid: a sphere of `radius` stretched by `y_scale` vertically
    pub fn sphere(&mut self, center: Vec3, radius: f32, color: u32, y_scale: f32) -> &mut Self {
        let r2 = radius * radius;
        let x_range = (center.x - radius).floor() as i32..=(center.x + radius).ceil() as i32;
        let y_range = (center.y - radius * y_scale).floor() as i32
            ..=(center.y + radius * y_scale).ceil() as i32;
        let z_range = (center.z - radius).floor() as i32..=(center.z + radius).ceil() as i32;

        for x in x_range {
            for y in y_range.clone() {
                for z in z_range.clone() {
                    let dx = x as f32 - center.x;
                    let dy = (y as f32 - center.y) / y_scale;
                    let dz = z as f32 - center.z;
                    if dx * dx + dy * dy + dz * dz <= r2 {
                        self.set_cell(IVec3::new(x, y, z), color);
                    }
                }
            }
        }
        self
    }

    /// Fill every cell in the inclusive box `min..=max`
    pub fn fill_box(&mut self, min: IVec3, max: IVec3, color: u32) -> &mut Self {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.set_cell(IVec3::new(x, y, z), color);
                }
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn build(self) -> Vec<Target> {
        self.cells
    }
}
