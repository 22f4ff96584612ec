//! Input configuration: the action asset plus debug settings.
//!
//! Loaded from YAML (`.yaml`/`.yml`) or JSON (`.json`):
//! ```text
//! enable_debug: true
//! change_threshold: 0.1
//! asset:
//!   maps:
//!     - name: Player
//!       actions:
//!         - { name: Jump, type: Button }
//!         - { name: Move, type: Vector2 }
//! ```

use std::path::{Path, PathBuf};

use actionstate_common::ValueKind;
use actionstate_input::{ActionDescriptor, ChangeFilter, MemorySource};
use serde::{Deserialize, Serialize};

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// One action as declared in an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    /// Device-layer control type, e.g. `Button`, `Axis`, `Vector2`.
    #[serde(default, rename = "type")]
    pub control_type: String,
}

impl ActionDefinition {
    pub fn new(name: impl Into<String>, control_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            control_type: control_type.into(),
        }
    }

    pub fn kind(&self) -> ValueKind {
        ValueKind::from_control_type(&self.control_type)
    }
}

/// A named group of actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMap {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

/// Every action map the host registers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionAsset {
    #[serde(default)]
    pub maps: Vec<ActionMap>,
}

impl ActionAsset {
    pub fn action_count(&self) -> usize {
        self.maps.iter().map(|m| m.actions.len()).sum()
    }

    /// Flatten all maps into source descriptors, in declaration order.
    pub fn descriptors(&self) -> Vec<ActionDescriptor> {
        self.maps
            .iter()
            .flat_map(|m| m.actions.iter().map(move |a| (m, a)))
            .map(|(map, action)| {
                let kind = action.kind();
                if kind == ValueKind::Unknown && !action.control_type.is_empty() {
                    tracing::warn!(
                        map = %map.name,
                        action = %action.name,
                        control_type = %action.control_type,
                        "unsupported control type, kind will be inferred"
                    );
                }
                ActionDescriptor::new(action.name.clone(), kind)
            })
            .collect()
    }
}

/// Host settings: which actions exist and how chatty change dispatch is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub asset: ActionAsset,
    /// Log every dispatched change at debug level.
    pub enable_debug: bool,
    /// Minimum movement before a repeated change is dispatched again.
    pub change_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            asset: ActionAsset::default(),
            enable_debug: false,
            change_threshold: ChangeFilter::DEFAULT_THRESHOLD,
        }
    }
}

impl InputConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a file, picking the format from its extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&data),
            Some("json") => Self::from_json_str(&data),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.asset.maps.is_empty() {
            return Err(ConfigError::Invalid("asset has no action maps".into()));
        }
        for map in &self.asset.maps {
            if map.name.trim().is_empty() {
                return Err(ConfigError::Invalid("action map with empty name".into()));
            }
            if let Some(action) = map.actions.iter().find(|a| a.name.trim().is_empty()) {
                return Err(ConfigError::Invalid(format!(
                    "map {:?} has an action with empty name {:?}",
                    map.name, action.name
                )));
            }
        }
        if !self.change_threshold.is_finite() || self.change_threshold < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "change_threshold must be a non-negative number, got {}",
                self.change_threshold
            )));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "input configuration rejected");
                false
            }
        }
    }

    /// One-line summary: `maps: N, actions: M`.
    pub fn debug_info(&self) -> String {
        if !self.is_valid() {
            return "invalid configuration".to_string();
        }
        format!(
            "maps: {}, actions: {}",
            self.asset.maps.len(),
            self.asset.action_count()
        )
    }

    /// An in-memory source providing every action in the asset.
    pub fn memory_source(&self) -> MemorySource {
        MemorySource::new(self.asset.descriptors())
    }
}
