use anyhow::{Context, Result};
use bookmark_parse::{DEFAULT_GENERATOR, DEFAULT_ROOT_NAME, ImportOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the optional config file looked up in the working directory.
pub const CONFIG_FILE: &str = "bookmarks-cli.json";

/// Top-level bookmarks-cli.json schema.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Where `convert` writes canonical JSON.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Static site template directory.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Destination template for `gather`; `{browser}` and `{profile}` are substituted.
    #[serde(default = "default_destination")]
    pub destination: String,

    /// Browser profile directory used by `gather`.
    #[serde(default = "default_profile")]
    pub profile: String,

    #[serde(default = "default_root_name")]
    pub root_name: String,

    #[serde(default = "default_generator")]
    pub generator: String,
}

fn default_output() -> PathBuf {
    PathBuf::from("data/bookmarks.json")
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}
fn default_destination() -> String {
    "data/raw/{browser}_{profile}_Bookmarks.json".to_string()
}
fn default_profile() -> String {
    "Default".to_string()
}
fn default_root_name() -> String {
    DEFAULT_ROOT_NAME.to_string()
}
fn default_generator() -> String {
    DEFAULT_GENERATOR.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            static_dir: default_static_dir(),
            destination: default_destination(),
            profile: default_profile(),
            root_name: default_root_name(),
            generator: default_generator(),
        }
    }
}

impl CliConfig {
    /// Options handed to the importers.
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            root_name: self.root_name.clone(),
            generator: self.generator.clone(),
        }
    }
}

/// Load config from an explicit path, or from `bookmarks-cli.json` in `dir`.
///
/// An explicit path must exist; the implicit file falls back to defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<CliConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => dir.join(CONFIG_FILE),
    };

    if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: CliConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        tracing::debug!(path = %config_path.display(), "loaded config");
        Ok(config)
    } else if explicit.is_some() {
        anyhow::bail!("Config file not found: {}", config_path.display())
    } else {
        Ok(CliConfig::default())
    }
}
