use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Maps a wiki page title to the language its source should be treated as.
///
/// Resolution tries the title's namespace prefix first (`Module:Foo` is Lua
/// regardless of extension), then the file extension (`User:X/common.js` is
/// JavaScript), and falls back to `wikitext`. The maps are fixed at load
/// time; hosts pass the resolved value to the tokenizer's embedded-language
/// handoff.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageMap {
    #[serde(default = "LanguageMap::default_prefixes")]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default = "LanguageMap::default_extensions")]
    pub extensions: BTreeMap<String, String>,
}

impl LanguageMap {
    fn default_prefixes() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Module".to_owned(), "lua".to_owned()),
            ("模块".to_owned(), "lua".to_owned()),
        ])
    }

    fn default_extensions() -> BTreeMap<String, String> {
        BTreeMap::from([
            (".js".to_owned(), "javascript".to_owned()),
            (".ts".to_owned(), "typescript".to_owned()),
            (".css".to_owned(), "css".to_owned()),
            (".less".to_owned(), "less".to_owned()),
            (".scss".to_owned(), "scss".to_owned()),
        ])
    }

    /// Resolves `title` to a document language identifier.
    pub fn resolve(&self, title: &str) -> &str {
        if let Some(prefix) = title.split(':').next()
            && let Some(language) = self.prefixes.get(prefix)
        {
            return language;
        }
        for (extension, language) in &self.extensions {
            if title.ends_with(extension.as_str()) {
                return language;
            }
        }
        "wikitext"
    }
}

impl Default for LanguageMap {
    fn default() -> Self {
        Self {
            prefixes: Self::default_prefixes(),
            extensions: Self::default_extensions(),
        }
    }
}

fn default_validation_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub language_map: LanguageMap,
    /// How long a host should wait after the last edit before re-validating.
    #[serde(default = "default_validation_delay_ms")]
    pub validation_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language_map: LanguageMap::default(),
            validation_delay_ms: default_validation_delay_ms(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/wikilint");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn config_path_expands_tilde() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/wikilint/config.toml"));
    }

    #[test]
    fn prefix_beats_extension() {
        let map = LanguageMap::default();
        // A Module page is Lua even when the title ends in a mapped extension.
        assert_eq!(map.resolve("Module:Citation/styles.css"), "lua");
        assert_eq!(map.resolve("模块:Foo"), "lua");
    }

    #[test]
    fn extension_resolution() {
        let map = LanguageMap::default();
        assert_eq!(map.resolve("User:X/common.js"), "javascript");
        assert_eq!(map.resolve("MediaWiki:Gadget-thing.ts"), "typescript");
        assert_eq!(map.resolve("MediaWiki:Common.css"), "css");
        assert_eq!(map.resolve("User:X/theme.less"), "less");
        assert_eq!(map.resolve("User:X/theme.scss"), "scss");
    }

    #[test]
    fn unresolved_titles_are_wikitext() {
        let map = LanguageMap::default();
        assert_eq!(map.resolve("Main Page"), "wikitext");
        assert_eq!(map.resolve("Talk:Something"), "wikitext");
        assert_eq!(map.resolve("User:X/notes.txt"), "wikitext");
        assert_eq!(map.resolve(""), "wikitext");
    }

    #[test]
    fn config_serialization_roundtrip() {
        let original = Config::default();

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        let mut test_config = Config::default();
        test_config.validation_delay_ms = 250;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("validation_delay_ms = 100").unwrap();
        assert_eq!(config.validation_delay_ms, 100);
        assert_eq!(config.language_map, LanguageMap::default());

        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn custom_maps_replace_defaults() {
        let config: Config = toml::from_str(
            r#"
[language_map.prefixes]
Gadget = "javascript"

[language_map.extensions]
".json" = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.language_map.resolve("Gadget:HotCat"), "javascript");
        assert_eq!(config.language_map.resolve("Data:Map.json"), "json");
        assert_eq!(config.language_map.resolve("Module:Foo"), "wikitext");
    }
}
