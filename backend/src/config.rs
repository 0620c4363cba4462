//! # Configuration
//!
//! Server settings are read from a single YAML file. The path comes from
//! `VEGGIE_BOX_CONFIG` (default `veggie_box.yaml`); a missing file means
//! defaults for everything. Every section and field is optional.
//!
//! ```yaml
//! server:
//!   host: "127.0.0.1"
//!   port: 3000
//!   allowed_origin: "http://localhost:8080"
//! database:
//!   url: "sqlite:veggie_box.db"
//! logging:
//!   level: "info"
//! rotation:
//!   lookback_weeks: 4
//! window:
//!   rule: wednesday_to_friday   # or `weekdays`
//! plans:
//!   small: { name: "Small Family", vegetable_count: 4, monthly_price: 2900,
//!            vegetable_budget: 2200, handling_fee: 700, min_count: 3, max_count: 5 }
//! catalog:
//!   seed_file: "data/catalog_seed.yaml"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::commands::catalog::ImportVegetable;
use crate::domain::models::{PlanId, PlanTable};
use crate::domain::rotation::DEFAULT_LOOKBACK_WEEKS;
use crate::domain::WindowRule;
use crate::storage::sqlite::DEFAULT_DATABASE_URL;

pub const CONFIG_PATH_ENV: &str = "VEGGIE_BOX_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "veggie_box.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed by CORS
    pub allowed_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            allowed_origin: "http://localhost:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub lookback_weeks: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            lookback_weeks: DEFAULT_LOOKBACK_WEEKS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub rule: WindowRule,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// YAML catalog loaded into an empty store at startup
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub rotation: RotationConfig,
    pub window: WindowConfig,
    pub plans: PlanTable,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load from the path in `VEGGIE_BOX_CONFIG`, or the default path
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(Path::new(&path))
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&yaml_content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as an empty map
        if yaml_content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml_content).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Every plan tier must be configured with a consistent size range
    pub fn validate(&self) -> Result<(), ConfigError> {
        for plan in PlanId::ALL {
            let config = self
                .plans
                .get(plan)
                .ok_or_else(|| ConfigError::Invalid(format!("plan {} is not configured", plan)))?;
            if config.vegetable_count == 0 {
                return Err(ConfigError::Invalid(format!("plan {} has no vegetables", plan)));
            }
            if !config.allows_count(config.vegetable_count) {
                return Err(ConfigError::Invalid(format!(
                    "plan {} count {} is outside its range {}-{}",
                    plan, config.vegetable_count, config.min_count, config.max_count
                )));
            }
        }
        Ok(())
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogSeed {
    vegetables: Vec<ImportVegetable>,
}

/// Read a catalog seed file: a `vegetables:` list of full records
pub fn load_catalog_seed(path: &Path) -> Result<Vec<ImportVegetable>, ConfigError> {
    let yaml_content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let seed: CatalogSeed = serde_yaml::from_str(&yaml_content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Read {} seed vegetables from {:?}", seed.vegetables.len(), path);
    Ok(seed.vegetables)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Category;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = AppConfig::load_from_path(&dir.path().join("absent.yaml")).unwrap();

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.rotation.lookback_weeks, 4);
        assert_eq!(config.window.rule, WindowRule::WednesdayToFriday);
        assert_eq!(config.plans.get(PlanId::Medium).unwrap().vegetable_count, 7);
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "server:\n  port: 8088\nwindow:\n  rule: weekdays\nrotation:\n  lookback_weeks: 6\n"
        )
        .unwrap();

        let config = AppConfig::load_from_path(file.path()).expect("Failed to load config");
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.window.rule, WindowRule::Weekdays);
        assert_eq!(config.rotation.lookback_weeks, 6);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_yaml("\n").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_plans_must_cover_every_tier() {
        let yaml = r#"
plans:
  small:
    name: "Small"
    vegetable_count: 4
    monthly_price: 2900
    vegetable_budget: 2200
    handling_fee: 700
    min_count: 3
    max_count: 5
"#;
        assert!(matches!(AppConfig::from_yaml(yaml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_yaml_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "server: [unclosed").unwrap();
        match AppConfig::load_from_path(file.path()) {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_catalog_seed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"vegetables:
  - id: carrots
    name: Organic Carrots
    category: root
    base_value: 4
    weight_per_value_point: 125
    market_price: 110
  - id: kankun
    name: Kankun
    category: leafy
    base_value: 2
    weight_per_value_point: 125
    market_price: 140
    is_available: false
"#
        )
        .unwrap();

        let seed = load_catalog_seed(file.path()).expect("Failed to load seed");
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].category, Category::Root);
        assert!(seed[0].is_available);
        assert!(!seed[1].is_available);
    }

    #[test]
    fn test_bundled_seed_catalog_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/catalog_seed.yaml");
        let seed = load_catalog_seed(&path).expect("Failed to load bundled seed");

        assert_eq!(seed.len(), 16);
        for category in Category::ALL {
            assert!(seed.iter().any(|v| v.category == category));
        }
        assert!(seed.iter().all(|v| v.base_value == v.category.default_base_value()));
    }
}
