mod basic;
mod catalog;

pub use basic::BasicConfig;
pub use catalog::{CatalogConfig, TemplateSeed};

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, sync::LazyLock};

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Bootstrap view-controller templates (see `catalog` table in config.toml).
    #[serde(default)]
    pub catalog: CatalogConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

impl Config {
    /// Builds a Figment that merges defaults and a config TOML file.
    pub fn figment() -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment.merge(Toml::file(DEFAULT_CONFIG_FILE))
        } else {
            figment
        }
    }

    /// Loads configuration by merging defaults and `config.toml` if present.
    ///
    /// Note: this does **not** validate `basic.admin_key`. The binary calls
    /// [`Config::validate`] before serving so admin routes never run unguarded.
    pub fn from_optional_toml() -> Self {
        Self::figment().extract().unwrap_or_else(|err| {
            panic!("failed to extract configuration (defaults + optional config.toml): {err}")
        })
    }

    /// Checks fields that have no safe default.
    pub fn validate(&self) -> Result<(), String> {
        if self.basic.admin_key.trim().is_empty() {
            return Err("basic.admin_key must be set and non-empty".to_string());
        }
        self.catalog.validate()
    }
}

/// Global, lazily-initialized configuration instance.
pub static CONFIG: LazyLock<Config> = LazyLock::new(Config::from_optional_toml);

#[cfg(test)]
mod tests {
    use super::*;
    use figment::providers::Toml;

    #[test]
    fn defaults_seed_text_template_and_require_key() {
        let cfg = Config::default();
        assert_eq!(cfg.basic.listen_port, 5000);
        assert_eq!(cfg.basic.database_url, "sqlite://museum_backend.db");
        assert_eq!(cfg.catalog.templates.len(), 1);
        assert_eq!(cfg.catalog.templates[0].segue_id, "toExhibitTextViewController");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn toml_overrides_merge_over_defaults() {
        let cfg: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::string(
                r#"
                [basic]
                listen_port = 8443
                admin_key = 1234

                [[catalog.templates]]
                name = "ExhibitImageViewController"
                segue_id = "toExhibitImageViewController"
                "#,
            ))
            .extract()
            .expect("config extracts");

        assert_eq!(cfg.basic.listen_port, 8443);
        assert_eq!(cfg.basic.admin_key, "1234");
        assert_eq!(cfg.basic.loglevel, "info");
        assert_eq!(cfg.catalog.templates.len(), 1);
        assert_eq!(cfg.catalog.templates[0].name, "ExhibitImageViewController");
        assert!(cfg.validate().is_ok());
    }
}
