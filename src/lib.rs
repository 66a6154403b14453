//! Voxmorph - voxel shapes that shatter and reassemble into new shapes
//!
//! A shape is a list of colored grid cells. The [`simulation::Engine`] turns
//! it into live voxels, scatters them under gravity on `dismantle`, and on
//! `rebuild` flies them into a new shape, pairing each target cell with the
//! closest-colored voxel still on the floor.

pub mod core;
pub mod voxel;
pub mod shape;
pub mod simulation;
pub mod render;
