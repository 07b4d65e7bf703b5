use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::photos::MAX_PHOTOS;
use crate::survey123::{DEFAULT_BASE_URL, DEFAULT_FIELD_PREFIX, Revision, Survey123Mapper};

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "birdability.toml";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BirdabilityConfig {
    #[serde(default)]
    pub survey123: Survey123Config,
    #[serde(default)]
    pub photos: PhotosConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Survey123Config {
    /// Share URL of the Survey123 form
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Prefix put in front of every pre-filled question
    #[serde(default = "default_field_prefix")]
    pub field_prefix: String,

    /// Form revision (v1: full question paths, v2: question names)
    #[serde(default)]
    pub revision: Revision,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PhotosConfig {
    /// Most photos per report (1 to 8)
    #[serde(default = "default_max_photos")]
    pub max_photos: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct StorageConfig {
    /// Directory for drafts; drafts stay in memory when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_field_prefix() -> String {
    DEFAULT_FIELD_PREFIX.to_string()
}

fn default_max_photos() -> usize {
    MAX_PHOTOS
}

impl Default for Survey123Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            field_prefix: default_field_prefix(),
            revision: Revision::default(),
        }
    }
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            max_photos: default_max_photos(),
        }
    }
}

impl From<&Survey123Config> for Survey123Mapper {
    fn from(config: &Survey123Config) -> Self {
        Survey123Mapper::new(config.revision)
            .with_base_url(config.base_url.clone())
            .with_field_prefix(config.field_prefix.clone())
    }
}

impl BirdabilityConfig {
    /// Load configuration from `birdability.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_file(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a specific file path.
    ///
    /// The file is optional. `BIRDABILITY_<SECTION>__<KEY>` environment
    /// variables override it, e.g. `BIRDABILITY_SURVEY123__REVISION=v1`.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let settings = Config::builder()
            .set_default("survey123.base_url", default_base_url())?
            .set_default("survey123.field_prefix", default_field_prefix())?
            .set_default("survey123.revision", Revision::default().to_string())?
            .set_default("photos.max_photos", default_max_photos() as i64)?
            .add_source(File::with_name(&path_str).required(false))
            .add_source(
                Environment::with_prefix("BIRDABILITY")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: BirdabilityConfig = settings.try_deserialize()?;
        config.validate()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photos.max_photos == 0 || self.photos.max_photos > MAX_PHOTOS {
            return Err(ConfigError::Message(format!(
                "photos.max_photos must be between 1 and {MAX_PHOTOS}"
            )));
        }

        if self.survey123.field_prefix.is_empty() {
            return Err(ConfigError::Message(
                "survey123.field_prefix must not be empty".to_string(),
            ));
        }

        if let Err(err) = Url::parse(&self.survey123.base_url) {
            return Err(ConfigError::Message(format!(
                "survey123.base_url '{}' is not a valid URL: {err}",
                self.survey123.base_url
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BirdabilityConfig::load_from_file(dir.path().join("missing.toml")).unwrap();

        assert_eq!(config.survey123.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.survey123.revision, Revision::V2);
        assert_eq!(config.photos.max_photos, 8);
        assert_eq!(config.storage.dir, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birdability.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[survey123]\nrevision = \"v1\"\n\n[photos]\nmax_photos = 4\n\n[storage]\ndir = \"drafts\""
        )
        .unwrap();

        let config = BirdabilityConfig::load_from_file(&path).unwrap();
        assert_eq!(config.survey123.revision, Revision::V1);
        assert_eq!(config.survey123.field_prefix, "field:");
        assert_eq!(config.photos.max_photos, 4);
        assert_eq!(config.storage.dir, Some(PathBuf::from("drafts")));
    }

    #[test]
    fn validation() {
        let mut config = BirdabilityConfig::default();
        assert!(config.validate().is_ok());

        config.photos.max_photos = 9;
        assert!(config.validate().is_err());

        config.photos.max_photos = 8;
        config.survey123.field_prefix.clear();
        assert!(config.validate().is_err());

        config.survey123.field_prefix = "field:".to_string();
        config.survey123.base_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
