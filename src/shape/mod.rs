//! Shape inputs: target descriptors, payload parsing, presets and saved models

pub mod target;
pub mod builder;
pub mod presets;
pub mod import;
pub mod library;

pub use target::{Target, validate_targets};
pub use builder::ShapeBuilder;
pub use presets::{Preset, palette};
pub use import::{parse_targets, targets_from_value};
pub use library::{ModelLibrary, SavedModel};
