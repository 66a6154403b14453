//! Engine tuning parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Full engine configuration. Velocities and accelerations are expressed per
/// reference frame (see [`PhysicsConfig::reference_frame_rate`]).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Height of the floor plane.
    pub floor_y: f32,
    /// Edge length of one voxel. Resting voxels sit half of this above the floor.
    pub voxel_size: f32,
    /// Seed for the dismantle scatter. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Fail loads/rebuilds that name the same grid cell twice.
    pub reject_duplicate_cells: bool,
    /// Destruction phase parameters.
    pub physics: PhysicsConfig,
    /// Reconstruction phase parameters.
    pub rebuild: RebuildConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            floor_y: -12.0,
            voxel_size: 1.0,
            seed: None,
            reject_duplicate_cells: false,
            physics: PhysicsConfig::default(),
            rebuild: RebuildConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Height a voxel's center is clamped to when it touches the floor
    pub fn floor_contact_height(&self) -> f32 {
        self.floor_y + self.voxel_size * 0.5
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loaded engine config from {}", path.as_ref().display());
        Self::from_json_str(&text)
    }

    /// Reject parameter combinations that break convergence or the floor clamp
    pub fn validate(&self) -> Result<()> {
        if !(self.voxel_size > 0.0) {
            return Err(Error::Config(format!("voxel_size must be positive, got {}", self.voxel_size)));
        }
        if !(self.physics.reference_frame_rate > 0.0) {
            return Err(Error::Config("reference_frame_rate must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.physics.restitution) {
            return Err(Error::Config(format!(
                "restitution must be in [0, 1), got {}",
                self.physics.restitution
            )));
        }
        if !(self.rebuild.approach_rate > 0.0 && self.rebuild.approach_rate <= 1.0) {
            return Err(Error::Config(format!(
                "approach_rate must be in (0, 1], got {}",
                self.rebuild.approach_rate
            )));
        }
        if !(self.rebuild.height_span > 0.0) {
            return Err(Error::Config("height_span must be positive".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Destruction physics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Frame rate the per-frame constants below are tuned for.
    pub reference_frame_rate: f32,
    /// Downward acceleration per frame.
    pub gravity: f32,
    /// Fraction of vertical speed kept (and inverted) on floor contact.
    pub restitution: f32,
    /// Horizontal velocity multiplier on floor contact.
    pub friction: f32,
    /// Angular velocity multiplier on floor contact.
    pub angular_friction: f32,
    /// Width of the symmetric range for initial horizontal velocity.
    pub scatter_horizontal: f32,
    /// Upper bound of the initial upward velocity.
    pub scatter_vertical: f32,
    /// Width of the symmetric range for initial angular velocity.
    pub scatter_spin: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            reference_frame_rate: 60.0,
            gravity: 0.03,
            restitution: 0.4,
            friction: 0.85,
            angular_friction: 0.7,
            scatter_horizontal: 1.2,
            scatter_vertical: 0.8,
            scatter_spin: 0.3,
        }
    }
}

/// Reconstruction animation and color matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebuildConfig {
    /// Fraction of the remaining distance covered per reference frame.
    pub approach_rate: f32,
    /// Squared distance under which a voxel snaps onto its destination.
    pub snap_distance_sq: f32,
    /// Color distance treated as an exact match (stops the source scan).
    pub exact_match_epsilon: f32,
    /// Height above the floor covered by one `delay_per_span`.
    pub height_span: f32,
    /// Release delay in seconds per `height_span` of height.
    pub delay_per_span: f32,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            approach_rate: 0.15,
            snap_distance_sq: 0.005,
            exact_match_epsilon: 0.01,
            height_span: 15.0,
            delay_per_span: 0.6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.floor_contact_height(), -11.5);
        assert!(cfg.physics.restitution < 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = EngineConfig::from_json_str(r#"{ "floor_y": 0.0, "physics": { "gravity": 0.05 } }"#).unwrap();
        assert_eq!(cfg.floor_y, 0.0);
        assert_eq!(cfg.physics.gravity, 0.05);
        assert_eq!(cfg.physics.friction, 0.85);
        assert_eq!(cfg.rebuild, RebuildConfig::default());
    }

    #[test]
    fn test_invalid_json_config() {
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "physics": { "restitution": 1.5 } }"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        let cfg = EngineConfig::default().with_seed(7);
        std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

        let loaded = EngineConfig::load_json(&path).unwrap();
        assert_eq!(loaded, cfg);
    }
}
