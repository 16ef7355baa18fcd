//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing file means "use defaults"; no template is written.
//!
//! Notes:
//! - Unknown XML fields are a hard error to surface misconfigurations early.
//! - Empty or whitespace-only values are treated as unset.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use crate::config::types::{Config, LogLevel, Zone, validate_tag};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    exiftool: Option<String>,
    tag: Option<String>,
    timezone: Option<String>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    delete_duplicates: Option<bool>,
    #[serde(default, deserialize_with = "de_bool_trimmed_opt")]
    confirm_deletion: Option<bool>,
}

// Accept " true " / "false\n" as written by hand-edited files.
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
        },
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config on top of defaults.
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.log_level.as_deref()) {
        cfg.log_level = s.parse::<LogLevel>().map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.log_file.as_deref()) {
        cfg.log_file = Some(PathBuf::from(s));
    }
    if let Some(s) = non_empty(parsed.exiftool.as_deref()) {
        cfg.exiftool = PathBuf::from(s);
    }
    if let Some(s) = non_empty(parsed.tag.as_deref()) {
        cfg.tag = validate_tag(s).map_err(anyhow::Error::msg)?;
    }
    if let Some(s) = non_empty(parsed.timezone.as_deref()) {
        cfg.zone = s.parse::<Zone>().map_err(anyhow::Error::msg)?;
    }
    if let Some(b) = parsed.delete_duplicates {
        cfg.delete_duplicates = b;
    }
    if let Some(b) = parsed.confirm_deletion {
        cfg.confirm_deletion = b;
    }

    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the config from its default location.
/// Returns the path alongside the Config, or `None` if no file exists there.
pub fn load_config_from_xml() -> Result<Option<(PathBuf, Config)>> {
    let cfg_path = default_config_path()?;
    if !cfg_path.exists() {
        debug!(path = %cfg_path.display(), "no config file; using defaults");
        return Ok(None);
    }
    let cfg = load_config_from_xml_path(&cfg_path)?;
    Ok(Some((cfg_path, cfg)))
}
