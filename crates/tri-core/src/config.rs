//! Engine configuration loaded from YAML or TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, TriError};
use crate::MAX_VTX;

/// Tunables for generation, catalogs and the default workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Largest vertex count the workspace will enumerate or generate.
    #[serde(default = "default_max_vertices")]
    pub max_vertices: usize,
    /// Trace length stored by newly created catalogs.
    #[serde(default = "default_trace_count")]
    pub trace_count: usize,
    /// Directory holding durable catalogs; `None` keeps them in memory.
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
    /// File name of the default prime catalog inside `catalog_dir`.
    #[serde(default = "default_catalog")]
    pub default_catalog: String,
    /// Level the default prime catalog is generated to when no level is given.
    #[serde(default = "default_prime_level")]
    pub default_prime_level: usize,
    /// Worker threads for generation; `None` lets rayon decide.
    #[serde(default)]
    pub threads: Option<usize>,
}

fn default_max_vertices() -> usize {
    8
}

fn default_trace_count() -> usize {
    12
}

fn default_catalog() -> String {
    "default-primes.db".to_string()
}

fn default_prime_level() -> usize {
    6
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_vertices: default_max_vertices(),
            trace_count: default_trace_count(),
            catalog_dir: None,
            default_catalog: default_catalog(),
            default_prime_level: default_prime_level(),
            threads: None,
        }
    }
}

impl EngineConfig {
    /// Parses a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, TriError> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|err| TriError::Serde(ErrorInfo::new("config.parse_yaml", err.to_string())))?;
        config.validated()
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, TriError> {
        let config: Self = toml::from_str(contents)
            .map_err(|err| TriError::Serde(ErrorInfo::new("config.parse_toml", err.to_string())))?;
        config.validated()
    }

    /// Loads a configuration file, choosing the format from its extension.
    pub fn load(path: &Path) -> Result<Self, TriError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            TriError::Serde(
                ErrorInfo::new("config.read", format!("failed to read config: {err}"))
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let parsed = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&contents),
            _ => Self::from_yaml_str(&contents),
        };
        parsed.map_err(|err| match err {
            TriError::Serde(info) => {
                TriError::Serde(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Path of the default prime catalog, if catalogs are durable.
    pub fn default_catalog_path(&self) -> Option<PathBuf> {
        self.catalog_dir
            .as_ref()
            .map(|dir| dir.join(&self.default_catalog))
    }

    /// Checks limits; loaders call this, programmatic configs should too.
    pub fn validated(self) -> Result<Self, TriError> {
        if self.max_vertices == 0 {
            return Err(TriError::Capacity(ErrorInfo::new(
                "config.max_vertices",
                "max_vertices must be at least 1",
            )));
        }
        if self.max_vertices > MAX_VTX {
            return Err(TriError::too_many_vertices(self.max_vertices, MAX_VTX));
        }
        if self.default_prime_level > self.max_vertices {
            return Err(TriError::Capacity(
                ErrorInfo::new(
                    "config.prime_level",
                    "default_prime_level exceeds max_vertices",
                )
                .with_context("default_prime_level", self.default_prime_level.to_string())
                .with_context("max_vertices", self.max_vertices.to_string()),
            ));
        }
        Ok(self)
    }
}
