//! Saved custom shapes: builds that can be loaded, and rebuilds authored
//! against a particular base model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Result;
use super::target::{Target, validate_targets};

/// A named shape kept for later reuse
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedModel {
    pub name: String,
    pub targets: Vec<Target>,
    /// For rebuilds: the model that was loaded when this one was created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_model: Option<String>,
}

/// Session collection of custom builds and rebuilds
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelLibrary {
    builds: Vec<SavedModel>,
    rebuilds: Vec<SavedModel>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a shape that can be loaded as a new scene
    pub fn add_build(&mut self, name: impl Into<String>, targets: Vec<Target>) -> Result<()> {
        validate_targets(&targets, false)?;
        self.builds.push(SavedModel {
            name: name.into(),
            targets,
            base_model: None,
        });
        Ok(())
    }

    /// Save a rebuild target authored while `base_model` was loaded
    pub fn add_rebuild(
        &mut self,
        name: impl Into<String>,
        targets: Vec<Target>,
        base_model: impl Into<String>,
    ) -> Result<()> {
        validate_targets(&targets, false)?;
        self.rebuilds.push(SavedModel {
            name: name.into(),
            targets,
            base_model: Some(base_model.into()),
        });
        Ok(())
    }

    pub fn builds(&self) -> &[SavedModel] {
        &self.builds
    }

    /// Rebuilds offered while `base_model` is loaded
    pub fn rebuilds_for<'a>(&'a self, base_model: &'a str) -> impl Iterator<Item = &'a SavedModel> + 'a {
        self.rebuilds
            .iter()
            .filter(move |m| m.base_model.as_deref() == Some(base_model))
    }

    /// Most recently saved build with this name
    pub fn find_build(&self, name: &str) -> Option<&SavedModel> {
        self.builds.iter().rev().find(|m| m.name == name)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!(
            "Saved {} builds and {} rebuilds to {}",
            self.builds.len(),
            self.rebuilds.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let library: Self = serde_json::from_str(&text)?;
        for model in library.builds.iter().chain(&library.rebuilds) {
            validate_targets(&model.targets, false)?;
        }
        Ok(library)
    }
}
