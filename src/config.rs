//! Rendering configuration, loaded from TOML.
//!
//! Lookup order: an explicit path, then `erdot.toml` in the working
//! directory, then built-in defaults.

use std::{fs, path::Path};

use log::{debug, info};
use serde::Deserialize;

use crate::error::{ErdError, Result};
use crate::table::Style;

pub const LOCAL_CONFIG: &str = "erdot.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub graph: GraphConfig,
    pub table: TableConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    pub font_name: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            font_name: "Helvetica".to_string(),
        }
    }
}

/// Cell presentation for table nodes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableConfig {
    /// Header style for tables declared without one.
    pub default_style: Option<Style>,
    /// Color of the muted type annotation.
    pub font_color: String,
    pub cell_padding: u32,
    pub align: Align,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            default_style: None,
            font_color: "grey60".to_string(),
            cell_padding: 5,
            align: Align::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

impl std::str::FromStr for AppConfig {
    type Err = ErdError;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| ErdError::Configuration(e.to_string()))
    }
}

pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    load_config_in(Path::new(""), explicit_path)
}

/// Like [`load_config`], resolving the local config file against `dir`.
pub fn load_config_in(dir: &Path, explicit_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = dir.join(LOCAL_CONFIG);
    if local.exists() {
        info!(path = local.display().to_string(); "Loading configuration from local path");
        return load_config_file(&local);
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(ErdError::Configuration(format!(
            "missing configuration file: {}",
            path.display()
        )));
    }
    let content = fs::read_to_string(path)?;
    content.parse()
}
