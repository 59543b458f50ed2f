use crate::error::ConfigError;
use crate::overlay::ALL;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub colors: ColorConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    pub geometry: PathBuf, // .shp, .json or .geojson
    #[serde(default = "default_id_column")]
    pub id_column: String,
    #[serde(default = "default_geography_column")]
    pub geography_column: String,
    pub categories: Vec<String>, // numeric columns, one per language
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub heading: String,
    pub access_token: Option<String>,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColorConfig {
    pub seed: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: PathBuf,
}

fn default_id_column() -> String {
    "Id".to_string()
}

fn default_geography_column() -> String {
    "Geography".to_string()
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "Portland LEP".to_string(),
            heading: "Portland - Limited English Proficiency (Choropleth Example)".to_string(),
            access_token: None,
            zoom: 8.0,
            bearing: 0.0,
            pitch: 0.0,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { seed: 10 }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8051,
            static_dir: PathBuf::from("static"),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .with_context(|| "Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Category keys are the lowercased column names; they must be unique and
    /// must not shadow the "all" option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }

        let mut seen = HashSet::new();
        for column in &self.input.categories {
            let key = column.to_lowercase();
            if key == ALL {
                return Err(ConfigError::ReservedCategory(column.clone()));
            }
            if !seen.insert(key) {
                return Err(ConfigError::DuplicateCategory(column.clone()));
            }
        }

        for (name, value) in [
            ("zoom", self.map.zoom),
            ("bearing", self.map.bearing),
            ("pitch", self.map.pitch),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidMap(format!("{} must be finite", name)));
            }
        }

        Ok(())
    }

    /// The environment variable wins over the file.
    pub fn access_token(&self) -> Result<String, ConfigError> {
        self.resolve_access_token(std::env::var(TOKEN_ENV).ok())
    }

    fn resolve_access_token(&self, from_env: Option<String>) -> Result<String, ConfigError> {
        from_env
            .into_iter()
            .chain(self.map.access_token.clone())
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
            .ok_or(ConfigError::MissingAccessToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [input]
        geometry = "data/lep/Limited_English_Proficiency.shp"
        categories = ["Spanish", "Vietnamese"]
    "#;

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = AppConfig::from_toml(MINIMAL).unwrap();

        assert_eq!(config.input.id_column, "Id");
        assert_eq!(config.input.geography_column, "Geography");
        assert_eq!(config.map.zoom, 8.0);
        assert_eq!(config.map.bearing, 0.0);
        assert_eq!(config.map.pitch, 0.0);
        assert_eq!(config.colors.seed, 10);
        assert_eq!(config.server.port, 8051);
    }

    #[test]
    fn test_rejects_empty_category_list() {
        let toml = r#"
            [input]
            geometry = "regions.geojson"
            categories = []
        "#;
        let err = AppConfig::from_toml(toml).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::NoCategories)
        );
    }

    #[test]
    fn test_rejects_duplicate_and_reserved_keys() {
        let mut config = AppConfig::from_toml(MINIMAL).unwrap();

        config.input.categories = vec!["Spanish".into(), "SPANISH".into()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateCategory("SPANISH".into()))
        );

        config.input.categories = vec!["All".into()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::ReservedCategory("All".into()))
        );
    }

    #[test]
    fn test_access_token_resolution() {
        let mut config = AppConfig::from_toml(MINIMAL).unwrap();

        assert_eq!(
            config.resolve_access_token(None),
            Err(ConfigError::MissingAccessToken)
        );
        assert_eq!(
            config.resolve_access_token(Some("   ".into())),
            Err(ConfigError::MissingAccessToken)
        );

        config.map.access_token = Some("pk.file".into());
        assert_eq!(config.resolve_access_token(None).unwrap(), "pk.file");
        assert_eq!(
            config.resolve_access_token(Some("pk.env".into())).unwrap(),
            "pk.env"
        );
    }
}
