//! Built-in shapes.
//!
//! A closed set: each [`Preset`] variant maps to one generator function.

use std::fmt;
use std::str::FromStr;

use glam::{IVec3, Vec3};

use crate::core::Error;
use super::builder::ShapeBuilder;
use super::target::Target;

/// Colors shared by the built-in shapes
pub mod palette {
    pub const DARK: u32 = 0x4A3728;
    pub const LIGHT: u32 = 0x654321;
    pub const WHITE: u32 = 0xF0F0F0;
    pub const GOLD: u32 = 0xFFD700;
    pub const BLACK: u32 = 0x111111;
    pub const WOOD: u32 = 0x3B2F2F;
    pub const GREEN: u32 = 0x228B22;
    pub const TALON: u32 = 0xE5C100;
}

/// Identifier of a built-in shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    Eagle,
    Rattle,
    Cradle,
    Cat,
    Rabbit,
    Twins,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Eagle,
        Preset::Rattle,
        Preset::Cradle,
        Preset::Cat,
        Preset::Rabbit,
        Preset::Twins,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Eagle => "Eagle",
            Preset::Rattle => "Rattle",
            Preset::Cradle => "Cradle",
            Preset::Cat => "Cat",
            Preset::Rabbit => "Rabbit",
            Preset::Twins => "Twins",
        }
    }

    /// Build this shape's targets
    pub fn generate(self) -> Vec<Target> {
        let generator: fn() -> Vec<Target> = match self {
            Preset::Eagle => eagle,
            Preset::Rattle => rattle,
            Preset::Cradle => cradle,
            Preset::Cat => cat,
            Preset::Rabbit => rabbit,
            Preset::Twins => twins,
        };
        generator()
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(format!("unknown preset {:?}", s)))
    }
}

fn eagle() -> Vec<Target> {
    let mut shape = ShapeBuilder::new();
    // Perch
    for x in -8..8 {
        let x = x as f32;
        let center = Vec3::new(x, (x * 0.2).sin() * 1.5, (x * 0.1).cos() * 1.5);
        shape.sphere(center, 1.8, palette::WOOD, 1.0);
    }
    // Body and head
    shape.sphere(Vec3::new(0.0, 8.0, 2.0), 4.5, palette::DARK, 1.4);
    shape.sphere(Vec3::new(0.0, 14.0, 3.0), 2.8, palette::WHITE, 1.0);
    shape.build()
}

fn rattle() -> Vec<Target> {
    let mut shape = ShapeBuilder::new();
    // Handle
    for y in -4..4 {
        shape.sphere(Vec3::new(0.0, y as f32, 0.0), 1.2, palette::WOOD, 1.0);
    }
    // Ring with a white core and two beads
    shape.sphere(Vec3::new(0.0, 6.0, 0.0), 3.5, palette::GOLD, 1.0);
    shape.sphere(Vec3::new(0.0, 6.0, 0.0), 2.0, 0xFFFFFF, 1.0);
    shape.set_cell(IVec3::new(1, 6, 1), palette::DARK);
    shape.set_cell(IVec3::new(-1, 6, -1), palette::TALON);
    shape.build()
}

fn cradle() -> Vec<Target> {
    let mut shape = ShapeBuilder::new();
    // Base
    shape.fill_box(IVec3::new(-6, 0, -4), IVec3::new(6, 0, 4), palette::WOOD);
    // Long sides
    for x in -6..=6 {
        for y in 1..5 {
            shape.set_cell(IVec3::new(x, y, -4), palette::WOOD);
            shape.set_cell(IVec3::new(x, y, 4), palette::WOOD);
        }
    }
    // Head and foot boards
    for z in -4..=4 {
        for y in 1..8 {
            shape.set_cell(IVec3::new(-6, y, z), palette::WOOD);
            shape.set_cell(IVec3::new(6, y, z), palette::WOOD);
        }
    }
    // Mattress
    shape.fill_box(IVec3::new(-5, 1, -3), IVec3::new(5, 1, 3), palette::WHITE);
    shape.build()
}

fn cat() -> Vec<Target> {
    let mut shape = ShapeBuilder::new();
    shape.sphere(Vec3::new(0.0, 5.0, 0.0), 4.0, palette::DARK, 1.0);
    shape.sphere(Vec3::new(0.0, 11.0, 0.0), 3.0, palette::DARK, 1.0);
    shape.build()
}

fn rabbit() -> Vec<Target> {
    let mut shape = ShapeBuilder::new();
    shape.sphere(Vec3::new(0.0, 3.0, 0.0), 3.5, palette::WHITE, 1.0);
    shape.sphere(Vec3::new(0.0, 8.0, 0.0), 2.5, palette::WHITE, 1.0);
    shape.build()
}

fn twins() -> Vec<Target> {
    let mut shape = ShapeBuilder::new();
    shape.sphere(Vec3::new(-5.0, 5.0, 0.0), 3.0, palette::GOLD, 1.0);
    shape.sphere(Vec3::new(5.0, 5.0, 0.0), 3.0, palette::DARK, 1.0);
    shape.build()
}
