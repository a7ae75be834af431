//! Run configuration and the fixed alias tables.
//!
//! Everything here is built once at start-up (built-in defaults, optionally
//! overridden by `species.toml`) and then only read.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use species_types::AttributeCategory;

use crate::error::{CatalogError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "species.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The JSON catalog, `{"races": [...]}`
    pub catalog_path: PathBuf,
    /// Directory listed when `add` is run without a file
    pub source_root: PathBuf,
    /// Concatenated multi-species text used by `enrich`
    pub corpus_path: PathBuf,
    pub image_source_dir: PathBuf,
    pub image_target_dir: PathBuf,
    /// Prefix stored in `imagePath`, e.g. "aliens/rodian.webp"
    pub image_url_prefix: String,
    /// Citation used when a record has no sources
    pub default_source: String,
    pub remote: RemoteConfig,
    pub aliases: Aliases,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("ALIENS.json"),
            source_root: PathBuf::from("Source Data"),
            corpus_path: PathBuf::from("Source Data/C4_Universe_Section.txt"),
            image_source_dir: PathBuf::from("Source Data/Aliens"),
            image_target_dir: PathBuf::from("web/public/aliens"),
            image_url_prefix: "aliens".to_string(),
            default_source: "Star Wars REUP Section 16".to_string(),
            remote: RemoteConfig::default(),
            aliases: Aliases::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub base_url: String,
    pub project_id: String,
    /// Usually supplied through `FIRESTORE_API_KEY` rather than the file.
    pub api_key: String,
    pub collection: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://firestore.googleapis.com/v1".to_string(),
            project_id: "star-wars-d6-species".to_string(),
            api_key: String::new(),
            collection: "species".to_string(),
        }
    }
}

/// Synonym tables used by the parsers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Aliases {
    /// Uppercase first token of an attribute line → category
    pub attributes: BTreeMap<String, AttributeCategory>,
    /// Labels that introduce the homeworld, tried in order
    pub homeworld_labels: Vec<String>,
    /// Canonical corpus heading → section key it should resolve to
    pub entities: BTreeMap<String, String>,
    /// Sanitized species name → sanitized image file stem
    pub images: BTreeMap<String, String>,
}

impl Default for Aliases {
    fn default() -> Self {
        let attributes = AttributeCategory::ALL
            .into_iter()
            .map(|c| (c.as_str().to_uppercase(), c))
            .collect();

        let entities = [
            ("CEREAN", "CEREANS"),
            ("CEREANS", "CEREANS"),
            ("GEONOSIAN WORKER", "GEONOSIAN"),
            ("GEONOSIAN ARISTOCRAT", "GEONOSIAN"),
            ("RODIAN", "RODIANS"),
            ("NAUTOLAN", "NAUTOLANS"),
            ("TRANDOSHAN", "TRANDOSHANS"),
        ];

        let images = [
            ("gamorrean", "gamorean"),
            ("wookiee", "wookie"),
            ("sullustan", "sulustan"),
            ("geonosianworker", "geonosian"),
            ("geonosianaristocrat", "geonosian"),
        ];

        Self {
            attributes,
            homeworld_labels: vec!["Home Planet".to_string(), "Homeworld".to_string()],
            entities: pairs(&entities),
            images: pairs(&images),
        }
    }
}

fn pairs(list: &[(&str, &str)]) -> BTreeMap<String, String> {
    list.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `species.toml` in the
    /// working directory is used when present, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) if !p.is_file() => return Err(CatalogError::MissingInputFile(p.to_path_buf())),
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let raw = fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
        let config = Self::from_toml(&raw)?;
        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| CatalogError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.aliases.homeworld_labels.is_empty() {
            return Err(CatalogError::Config(
                "aliases.homeworld_labels must name at least one label".to_string(),
            ));
        }
        if let Some(key) = self.aliases.attributes.keys().find(|k| k.to_uppercase() != **k) {
            return Err(CatalogError::Config(format!(
                "attribute alias '{key}' must be uppercase"
            )));
        }
        if self.remote.project_id.trim().is_empty() {
            return Err(CatalogError::Config("remote.project_id is empty".to_string()));
        }
        Ok(())
    }
}
