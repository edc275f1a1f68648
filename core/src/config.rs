//! TOML configuration for the Atlas client.
//!
//! ```toml
//! APIKey = "<INSERT-API-KEY>"
//! DefaultProbe = 666
//! ProxyAuth = "Basic dXNlcjpwYXNz"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::name;

/// Settings read from the config file. Empty strings mean "not set".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "APIKey", alias = "api_key")]
    pub api_key: String,
    #[serde(rename = "DefaultProbe", alias = "default_probe")]
    pub default_probe: u32,
    #[serde(rename = "ProxyAuth", alias = "proxy_auth")]
    pub proxy_auth: String,
}

impl Config {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self> {
        toml::from_str(raw).map_err(|source| AtlasError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw, path)?;
        tracing::debug!(path = %path.display(), has_key = config.api_key().is_some(), "loaded config");
        Ok(config)
    }

    /// The API key, if one is configured.
    pub fn api_key(&self) -> Option<&str> {
        (!self.api_key.is_empty()).then_some(self.api_key.as_str())
    }

    pub fn proxy_auth(&self) -> Option<&str> {
        (!self.proxy_auth.is_empty()).then_some(self.proxy_auth.as_str())
    }
}

/// Resolve `input` (tag or path) against `basedir` and load that file.
pub fn load_config(input: &str, basedir: &Path) -> Result<Config> {
    let path = name::resolve_name(input, basedir)?;
    Config::load(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
APIKey = "<INSERT-API-KEY>"
DefaultProbe = 666
"#;

    #[test]
    fn parses_go_style_keys() {
        let conf = Config::from_toml_str(SAMPLE, Path::new("config.toml")).unwrap();
        assert_eq!(conf.default_probe, 666);
        assert_eq!(conf.api_key(), Some("<INSERT-API-KEY>"));
        assert_eq!(conf.proxy_auth(), None);
    }

    #[test]
    fn empty_file_yields_defaults() {
        let conf = Config::from_toml_str("", Path::new("config.toml")).unwrap();
        assert_eq!(conf, Config::default());
        assert_eq!(conf.api_key(), None);
    }

    #[test]
    fn wrong_type_is_a_config_error() {
        let err = Config::from_toml_str("DefaultProbe = \"six\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, AtlasError::Config { .. }));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        write!(file, "{SAMPLE}ProxyAuth = \"Basic abc\"\n").unwrap();

        let conf = Config::load(file.path()).unwrap();
        assert_eq!(conf.default_probe, 666);
        assert_eq!(conf.proxy_auth(), Some("Basic abc"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = Config::load(Path::new("/nonexistent/atlas/config.toml")).unwrap_err();
        assert!(matches!(err, AtlasError::Io { .. }));
    }

    #[test]
    fn load_config_resolves_tags() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("work");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("config.toml"), "APIKey = \"ABC\"\nDefaultProbe = 1\n").unwrap();

        let conf = load_config("work", base.path()).unwrap();
        assert_eq!(conf.api_key(), Some("ABC"));
        assert_eq!(conf.default_probe, 1);
    }
}
