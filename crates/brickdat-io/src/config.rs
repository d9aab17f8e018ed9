use anyhow::{Context, Result};
use brickdat_base::{Tolerance, Units};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default crease angle, in degrees, below which imported edges are softened.
pub const DEFAULT_CREASE_ANGLE: f64 = 20.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    pub units: Units,
    pub crease_angle: f64,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            units: Units::default(),
            crease_angle: DEFAULT_CREASE_ANGLE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub tolerance: Tolerance,
    /// Writes a `0 <title>` header line when set.
    pub title: Option<String>,
    /// File name for the `0 Name:` header line; only written together with a title.
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub import: ImportOptions,
    pub export: ExportOptions,
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ExportConfig> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse config file {}", path.display()))
}
