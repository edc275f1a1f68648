//! Config name resolution.
//!
//! A config can be named three ways: an absolute path (must end in `.toml`),
//! a relative `.toml` filename taken literally, or a short tag that maps to
//! `<basedir>/<tag>/config.toml`.

use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::error::{AtlasError, Result};

/// Application name used to derive the default base directory.
pub const APP_NAME: &str = "ripe-atlas";

const CONFIG_SUFFIX: &str = ".toml";
const CONFIG_FILE: &str = "config.toml";

/// A classified config name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigName {
    Absolute(PathBuf),
    LiteralRelative(PathBuf),
    Tag(String),
}

impl ConfigName {
    /// Classify `input`. Rules are tried in order; the first match wins.
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(AtlasError::InvalidName {
                name: String::new(),
                reason: "name is empty",
            });
        }
        if input.starts_with(MAIN_SEPARATOR) {
            if !input.ends_with(CONFIG_SUFFIX) {
                return Err(AtlasError::InvalidName {
                    name: input.to_string(),
                    reason: "absolute path must end with .toml",
                });
            }
            return Ok(ConfigName::Absolute(PathBuf::from(input)));
        }
        if input.ends_with(CONFIG_SUFFIX) {
            return Ok(ConfigName::LiteralRelative(PathBuf::from(input)));
        }
        Ok(ConfigName::Tag(input.to_string()))
    }

    /// Map the name to a config file path. Only tags use `basedir`.
    pub fn resolve(&self, basedir: &Path) -> PathBuf {
        match self {
            ConfigName::Absolute(path) | ConfigName::LiteralRelative(path) => path.clone(),
            ConfigName::Tag(tag) => basedir.join(tag).join(CONFIG_FILE),
        }
    }
}

/// `<home>/.config/<app>`
pub fn basedir(home: &Path, app: &str) -> PathBuf {
    home.join(".config").join(app)
}

/// Base directory under the current user's home, if one can be found.
pub fn default_basedir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| basedir(&home, APP_NAME))
}

/// Resolve `input` to a config file path against `basedir`.
pub fn resolve_name(input: &str, basedir: &Path) -> Result<PathBuf> {
    ConfigName::parse(input).map(|name| name.resolve(basedir))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn home_base() -> PathBuf {
        basedir(Path::new("/home/foo"), APP_NAME)
    }

    #[test]
    fn tag_maps_into_basedir() {
        let res = resolve_name("mytag", &home_base()).unwrap();
        assert_eq!(res, PathBuf::from("/home/foo/.config/ripe-atlas/mytag/config.toml"));
    }

    #[test]
    fn absolute_toml_path_is_kept() {
        let res = resolve_name("/nonexistent/foobar.toml", &home_base()).unwrap();
        assert_eq!(res, PathBuf::from("/nonexistent/foobar.toml"));
    }

    #[test]
    fn absolute_path_without_toml_suffix_is_rejected() {
        let err = resolve_name("/toto.yaml", &home_base()).unwrap_err();
        assert!(matches!(err, AtlasError::InvalidName { ref name, .. } if name == "/toto.yaml"));
    }

    #[test]
    fn relative_toml_name_is_taken_literally() {
        let name = ConfigName::parse("local/atlas.toml").unwrap();
        assert_eq!(name, ConfigName::LiteralRelative(PathBuf::from("local/atlas.toml")));
        assert_eq!(name.resolve(&home_base()), PathBuf::from("local/atlas.toml"));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            ConfigName::parse(""),
            Err(AtlasError::InvalidName { .. })
        ));
    }

    #[test]
    fn basedir_follows_xdg_layout() {
        assert_eq!(
            basedir(Path::new("/home/foo"), "other"),
            PathBuf::from("/home/foo/.config/other")
        );
    }

    #[test]
    fn any_absolute_non_toml_path_fails() {
        for input in ["/", "/etc/atlas", "/a/b.tom", "/a/config.toml.bak", "/x.TOML"] {
            assert!(resolve_name(input, &home_base()).is_err(), "{input}");
        }
    }

    #[test]
    fn tags_never_touch_the_suffix_rule() {
        for tag in ["prod", "a.b", "toml", "dev-2"] {
            let res = resolve_name(tag, &home_base()).unwrap();
            assert_eq!(res, home_base().join(tag).join("config.toml"));
        }
    }
}
