//! Config module.
//! Provides configuration types, default paths and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, default_log_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, Zone, validate_tag};
pub use xml::{load_config_from_xml, load_config_from_xml_path};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DATENAME_CONFIG";
pub const CONFIG_FILE_NAME: &str = "config.xml";
pub const LOG_FILE_NAME: &str = "datename.log";

pub const DEFAULT_EXIFTOOL: &str = "exiftool";
pub const DEFAULT_DATE_TAG: &str = "CreateDate";
