//! Configuration file support for curation runs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skucurate_core::{CurationParams, PipelineConfig};
use skucurate_formats::record::normalize_header;
use skucurate_formats::AliasColumns;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXPORT_DIR: &str = "data/intermediate/curation_exports";
pub const DEFAULT_SEED_PATH: &str = "dbt/seeds/ref_sku_names.csv";

/// Complete run configuration; every field has a default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    pub curation: CurationParams,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub seed: SeedConfig,
    pub pipeline: PipelineSettings,
}

impl CurationConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let config: Self = match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };
        config
            .curation
            .validate()
            .with_context(|| format!("Invalid curation settings in {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Write the default configuration to `path`, refusing to overwrite
    /// an existing file unless `force` is set
    pub fn init(path: &Path, force: bool) -> Result<Self> {
        if path.exists() && !force {
            return Err(anyhow::anyhow!(
                "Config file {} already exists; pass --force to overwrite",
                path.display()
            ));
        }
        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    pub fn alias_columns(&self) -> AliasColumns {
        AliasColumns {
            sku: normalize_header(&self.input.sku_column),
            description: normalize_header(&self.input.description_column),
            order: normalize_header(&self.input.order_column),
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            params: self.curation,
            num_threads: self.pipeline.num_threads,
        }
    }
}

/// Candidate table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Used when `--input` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub sku_column: String,
    pub description_column: String,
    pub order_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        let columns = AliasColumns::default();
        Self {
            path: None,
            sku_column: columns.sku,
            description_column: columns.description,
            order_column: columns.order,
        }
    }
}

/// Export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub export_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
        }
    }
}

/// Seed table settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub path: PathBuf,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SEED_PATH),
        }
    }
}

/// Parallelism settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Worker threads (None = one per core)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_threads: Option<usize>,
}
