//! Settings for flowlog-stacks
//!
//! Settings come from one of two places, lowest precedence first:
//! - Default values
//! - Settings files: the explicit `--config` path, else the file named by
//!   `FLOWLOGS_CONFIG`, else every file found by the search below
//! - Environment variables (`FLOWLOGS_VPC_ID`, `FLOWLOGS_REGION`, `FLOWLOGS_TAGS`)
//! - Command-line arguments
//!
//! The search layers `./flowlogs.toml`, `./flowlogs.yaml`, `./flowlogs.json`
//! and `~/.config/flowlogs/settings.toml`, in that order of precedence. A value
//! a file sets always beats the same value from a file further down the list,
//! even when it equals the default. Tag maps are unioned key by key.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Error, Result};
use crate::resources::provider::{DEFAULT_PROVIDER_VERSION, DEFAULT_REGION};

/// Environment variable naming a settings file.
pub const CONFIG_ENV: &str = "FLOWLOGS_CONFIG";

/// Settings consumed by the stack builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// VPC whose traffic is captured
    pub vpc_id: String,

    /// Region both stacks deploy to
    pub region: String,

    /// Tags applied to every resource through the provider
    pub tags: BTreeMap<String, String>,

    /// Version constraint for the AWS provider
    pub provider_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            vpc_id: String::new(),
            region: DEFAULT_REGION.to_string(),
            tags: BTreeMap::new(),
            provider_version: DEFAULT_PROVIDER_VERSION.to_string(),
        }
    }
}

/// Settings file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// TOML
    Toml,
    /// YAML
    Yaml,
    /// JSON
    Json,
}

impl SettingsFormat {
    /// Guess the format from a file extension, TOML when unknown.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yml" | "yaml" => Self::Yaml,
            "json" => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// The values one settings file sets. `None` means the file is silent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsLayer {
    /// VPC id
    pub vpc_id: Option<String>,
    /// Region
    pub region: Option<String>,
    /// Tags
    pub tags: Option<BTreeMap<String, String>>,
    /// AWS provider version constraint
    pub provider_version: Option<String>,
}

impl SettingsLayer {
    /// Read one settings file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config_load(path, e.to_string()))?;
        Self::parse(&content, SettingsFormat::from_path(path))
            .map_err(|e| Error::config_load(path, e.to_string()))
    }

    /// Parse a layer from a string
    pub fn parse(content: &str, format: SettingsFormat) -> Result<Self> {
        Ok(match format {
            SettingsFormat::Toml => toml::from_str(content)?,
            SettingsFormat::Yaml => {
                serde_yaml::from_str::<Option<Self>>(content)?.unwrap_or_default()
            }
            SettingsFormat::Json => serde_json::from_str(content)?,
        })
    }

    /// Fill whatever this layer leaves unset from a lower-precedence layer
    pub fn or(self, lower: SettingsLayer) -> SettingsLayer {
        let tags = match (self.tags, lower.tags) {
            (Some(higher), Some(mut tags)) => {
                tags.extend(higher);
                Some(tags)
            }
            (higher, lower) => higher.or(lower),
        };
        SettingsLayer {
            vpc_id: self.vpc_id.or(lower.vpc_id),
            region: self.region.or(lower.region),
            tags,
            provider_version: self.provider_version.or(lower.provider_version),
        }
    }

    /// Settings with defaults for everything the layer leaves unset
    pub fn resolve(self) -> Settings {
        let defaults = Settings::default();
        Settings {
            vpc_id: self.vpc_id.unwrap_or(defaults.vpc_id),
            region: self.region.unwrap_or(defaults.region),
            tags: self.tags.unwrap_or(defaults.tags),
            provider_version: self.provider_version.unwrap_or(defaults.provider_version),
        }
    }
}

impl Settings {
    /// Create settings for a VPC with the given tags.
    pub fn new(vpc_id: impl Into<String>, tags: BTreeMap<String, String>) -> Self {
        Self {
            vpc_id: vpc_id.into(),
            tags,
            ..Self::default()
        }
    }

    /// Load settings from the process environment and the settings files
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with(explicit_path, |key| std::env::var(key).ok())
    }

    /// Load settings, reading environment variables through `lookup`
    pub fn load_with<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let named = explicit_path
            .map(Path::to_path_buf)
            .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));

        let layer = match named {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::config_load(path, "file does not exist"));
                }
                debug!(path = %path.display(), "Loading settings file");
                SettingsLayer::from_file(&path)?
            }
            None => {
                let mut layer = SettingsLayer::default();
                for path in Self::search_paths() {
                    if path.exists() {
                        debug!(path = %path.display(), "Layering settings file");
                        layer = layer.or(SettingsLayer::from_file(&path)?);
                    }
                }
                layer
            }
        };

        let mut settings = layer.resolve();
        settings.apply_env_overrides(&lookup)?;
        Ok(settings)
    }

    /// Settings files to search, highest precedence first
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from("flowlogs.toml"),
            PathBuf::from("flowlogs.yaml"),
            PathBuf::from("flowlogs.json"),
        ];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("flowlogs").join("settings.toml"));
        }
        paths
    }

    /// Read one settings file, with defaults for what it leaves unset
    pub fn from_file(path: &Path) -> Result<Self> {
        SettingsLayer::from_file(path).map(SettingsLayer::resolve)
    }

    /// Parse settings from a string, with defaults for what it leaves unset
    pub fn parse(content: &str, format: SettingsFormat) -> Result<Self> {
        SettingsLayer::parse(content, format).map(SettingsLayer::resolve)
    }

    /// Apply environment variable overrides read through `lookup`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        // FLOWLOGS_VPC_ID
        if let Some(vpc_id) = lookup("FLOWLOGS_VPC_ID") {
            self.vpc_id = vpc_id;
        }

        // FLOWLOGS_REGION
        if let Some(region) = lookup("FLOWLOGS_REGION") {
            self.region = region;
        }

        // FLOWLOGS_TAGS=key=value,key=value
        if let Some(tags) = lookup("FLOWLOGS_TAGS") {
            for pair in tags.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                let (key, value) = parse_tag(pair)?;
                self.tags.insert(key, value);
            }
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn with_overrides(
        mut self,
        vpc_id: Option<&str>,
        region: Option<&str>,
        tags: &[(String, String)],
    ) -> Self {
        if let Some(vpc_id) = vpc_id {
            self.vpc_id = vpc_id.to_string();
        }
        if let Some(region) = region {
            self.region = region.to_string();
        }
        self.tags.extend(tags.iter().cloned());
        self
    }

    /// Checks that every required value is present before any graph is built
    pub fn validate(&self) -> Result<()> {
        if self.vpc_id.trim().is_empty() {
            return Err(Error::MissingSetting("vpc_id".to_string()));
        }
        if self.vpc_id.contains(char::is_whitespace) {
            return Err(Error::invalid_config(
                "vpc_id",
                format!("'{}' contains whitespace", self.vpc_id),
            ));
        }
        if self.region.trim().is_empty() {
            return Err(Error::MissingSetting("region".to_string()));
        }
        if self.tags.is_empty() {
            return Err(Error::MissingSetting("tags".to_string()));
        }
        if let Some((key, _)) = self.tags.iter().find(|(k, _)| k.trim().is_empty()) {
            return Err(Error::invalid_config(
                "tags",
                format!("tag key '{key}' is empty"),
            ));
        }
        Ok(())
    }
}

/// Parse a `key=value` tag
pub fn parse_tag(pair: &str) -> Result<(String, String)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(Error::invalid_config(
            "tags",
            format!("'{pair}' is not a key=value pair"),
        )),
    }
}
