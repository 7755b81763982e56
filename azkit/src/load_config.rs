/// `load_config` module: loads a YAML filter definition into a [`DocFilter`].
///
/// This module is the only place where user-supplied YAML is parsed and mapped to
/// strongly-typed core structs.
///
/// # Accepted schema
/// ```yaml
/// filter:
///   include_attrs: [id, name]   # optional, empty or absent means "no restriction"
///   exclude_attrs: [ssn]        # optional, always wins over include_attrs
/// ```
///
/// # Errors
/// All errors use `anyhow::Error` and name the offending file, surfaced at the CLI boundary.
use anyhow::Result;
use azkit_core::doc_filter::{DocFilter, FilterConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug)]
pub struct CliConfig {
    pub filter: DocFilter,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    filter: FilterConfig,
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let raw: RawConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!(
                "Failed to parse config YAML {:?}: {e}",
                path_ref
            ));
        }
    };

    let filter = DocFilter::from(raw.filter);
    info!(
        include = filter.include_attrs().len(),
        exclude = filter.exclude_attrs().len(),
        "Filter configuration loaded"
    );
    Ok(CliConfig { filter })
}
