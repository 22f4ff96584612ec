//! Scripted input frames for playback through an [`InputHost`].
//!
//! ```text
//! frames:
//!   - - { op: deliver, action: Jump, value: { Bool: true } }
//!   - []
//!   - - { op: clear, action: Jump }
//! ```

use std::path::Path;

use actionstate_common::RawValue;
use actionstate_host::InputHost;
use actionstate_input::MemorySource;
use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// One source event applied before a frame's update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptEvent {
    Deliver { action: String, value: RawValue },
    Clear { action: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub frames: Vec<Vec<ScriptEvent>>,
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let script = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => serde_yaml::from_str(&data)?,
            Some("json") => serde_json::from_str(&data)?,
            _ => bail!("unsupported script format: {}", path.display()),
        };
        Ok(script)
    }
}

impl ScriptEvent {
    /// Feed this event into the host's source. Returns false if nothing received it.
    pub fn apply(&self, host: &mut InputHost<MemorySource>) -> bool {
        let fired = match self {
            Self::Deliver { action, value } => host.source_mut().deliver(action, *value),
            Self::Clear { action } => host.source_mut().clear(action),
        };
        if fired == 0 {
            tracing::warn!(event = ?self, "event dropped: unknown or disabled action");
        }
        fired > 0
    }
}
