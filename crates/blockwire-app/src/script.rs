//! Replay scripts: a block layout plus the pointer events to feed it.

use blockwire_core::{BlockProfile, ConfigError, EditorConfig, PointerEvent};
use kurbo::Point;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors while loading a replay.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Duplicate block name: {0}")]
    DuplicateName(String),
}

/// A block to place before replaying events.
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptBlock {
    /// Name used in the replay summary.
    pub name: String,
    pub position: Point,
    #[serde(default)]
    pub profile: BlockProfile,
}

/// A full replay.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Script {
    pub config: EditorConfig,
    pub blocks: Vec<ScriptBlock>,
    pub events: Vec<PointerEvent>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(json)?;
        script.config.validate()?;

        let mut names: Vec<&str> = script.blocks.iter().map(|b| b.name.as_str()).collect();
        names.sort_unstable();
        if let Some(pair) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(ScriptError::DuplicateName(pair[0].to_string()));
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let script = Script::from_json(
            r#"{
                "blocks": [
                    { "name": "a", "position": { "x": 0, "y": 0 } },
                    { "name": "b", "position": { "x": 300, "y": 0 },
                      "profile": { "can_receive": false } }
                ],
                "events": [
                    { "kind": "down", "position": { "x": 10, "y": 10 } },
                    { "kind": "up", "position": { "x": 10, "y": 10 } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(script.blocks.len(), 2);
        assert!(!script.blocks[1].profile.can_receive);
        assert!(script.blocks[1].profile.can_initiate);
        assert_eq!(script.events.len(), 2);
        assert_eq!(script.config, EditorConfig::default());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Script::from_json(
            r#"{ "blocks": [
                { "name": "a", "position": { "x": 0, "y": 0 } },
                { "name": "a", "position": { "x": 1, "y": 1 } }
            ] }"#,
        );
        assert!(matches!(err, Err(ScriptError::DuplicateName(name)) if name == "a"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Script::from_json(r#"{ "config": { "grid_size": -1 } }"#);
        assert!(matches!(err, Err(ScriptError::Config(_))));
    }
}
