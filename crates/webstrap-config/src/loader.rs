//! Configuration loader with layered approach.
//!
//! Layers are applied in order, later layers overriding earlier ones:
//! 1. Defaults supplied by the caller
//! 2. Configuration file (YAML, TOML or JSON)
//! 3. `.env` file, if requested
//! 4. Environment variables under a prefix

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{ConfigError, Settings};

/// Base name of the configuration file searched for by [`ConfigLoader::discover`].
pub const CONFIG_FILE_STEM: &str = "application";

/// Extensions tried, in order, for each search directory.
pub const CONFIG_FILE_EXTENSIONS: [&str; 4] = ["yaml", "yml", "toml", "json"];

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML
    Yaml,
    /// TOML
    Toml,
    /// JSON
    Json,
}

impl Format {
    /// Picks the format from a file extension or format name.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::unsupported_format(other)),
        }
    }

    /// Picks the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ConfigError::unsupported_format(path.display().to_string()))?;
        Self::from_name(ext)
    }

    /// Parses `content` into a configuration tree.
    pub fn parse(self, content: &str) -> Result<Value, ConfigError> {
        let value = match self {
            Self::Yaml => serde_yaml::from_str::<Value>(content)?,
            Self::Toml => serde_json::to_value(toml::from_str::<toml::Table>(content)?)?,
            Self::Json => serde_json::from_str(content)?,
        };
        // An empty YAML document parses to null.
        Ok(if value.is_null() {
            Value::Object(Map::new())
        } else {
            value
        })
    }
}

/// Builds [`Settings`] from layered sources.
///
/// # Example
///
/// ```no_run
/// use webstrap_config::ConfigLoader;
///
/// # fn main() -> Result<(), webstrap_config::ConfigError> {
/// let settings = ConfigLoader::new()
///     .with_file("application.yaml")?
///     .with_env_prefix("WEBSTRAP")
///     .load()?;
///
/// let port = settings.get("service.port").int(8080);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    root: Value,
    source: Option<PathBuf>,
    env_prefix: Option<String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a loader with an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
            source: None,
            env_prefix: None,
        }
    }

    /// Merges `defaults` under whatever is already loaded.
    #[must_use]
    pub fn with_defaults(mut self, defaults: Value) -> Self {
        let mut base = defaults;
        merge(&mut base, std::mem::take(&mut self.root));
        self.root = base;
        self
    }

    /// Sets a single dotted key.
    #[must_use]
    pub fn with_value(mut self, key: &str, value: impl Into<Value>) -> Self {
        let segments: Vec<&str> = key.split('.').filter(|s| !s.is_empty()).collect();
        insert_path(&mut self.root, &segments, value.into());
        self
    }

    /// Loads a configuration file. The format follows the extension.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| ConfigError::read_error(path, e))?;
        merge(&mut self.root, format.parse(&content)?);
        self.source = Some(path.to_path_buf());

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(self)
    }

    /// Loads a configuration file if it exists.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Loads configuration from a string in the named format.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let value = Format::from_name(format)?.parse(content)?;
        merge(&mut self.root, value);
        Ok(self)
    }

    /// Loads the first `application.{yaml,yml,toml,json}` found in the
    /// executable's directory, then the home directory. Finding nothing is
    /// not an error.
    pub fn discover(self) -> Result<Self, ConfigError> {
        let dirs = default_search_dirs();
        self.discover_in(&dirs)
    }

    /// Like [`ConfigLoader::discover`], searching `dirs` in order.
    pub fn discover_in(self, dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        match find_config_file(dirs) {
            Some(path) => self.with_file(path),
            None => {
                tracing::debug!("no configuration file found");
                Ok(self)
            }
        }
    }

    /// Enables environment overrides under `prefix`.
    ///
    /// Variables are named `PREFIX__SECTION__KEY`. Each segment is
    /// lowercased and `_` becomes `-`, so
    /// `WEBSTRAP__SERVICE__WRITE_TIMEOUT_SECONDS` sets
    /// `service.write-timeout-seconds`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_uppercase());
        self
    }

    /// Loads a `.env` file from the current directory or its parents into
    /// the process environment, if one exists.
    #[must_use]
    pub fn with_dotenv(self) -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env file");
        }
        self
    }

    /// Applies environment overrides and returns the settings.
    pub fn load(self) -> Result<Settings, ConfigError> {
        let vars: Vec<(String, String)> = env::vars().collect();
        self.load_with_vars(vars)
    }

    /// Like [`ConfigLoader::load`], taking the environment explicitly.
    pub fn load_with_vars<I>(mut self, vars: I) -> Result<Settings, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        if let Some(prefix) = self.env_prefix.take() {
            let marker = format!("{prefix}__");
            for (key, value) in vars {
                if key.starts_with(&marker) {
                    self.apply_env_var(&key, &value, &marker)?;
                }
            }
        }

        Ok(Settings::from_value(self.root).with_source(self.source))
    }

    fn apply_env_var(&mut self, key: &str, value: &str, marker: &str) -> Result<(), ConfigError> {
        let rest = key
            .strip_prefix(marker)
            .ok_or_else(|| ConfigError::env_parse_error(key, "invalid key format"))?;

        let segments: Vec<String> = rest
            .split("__")
            .map(|s| s.to_lowercase().replace('_', "-"))
            .collect();

        if segments.iter().any(String::is_empty) {
            return Err(ConfigError::env_parse_error(key, "empty key segment"));
        }

        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        insert_path(&mut self.root, &segments, typed_env_value(value));
        Ok(())
    }
}

/// Executable directory, then home directory.
#[must_use]
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Some(dir) = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        dirs.push(home);
    }
    dirs
}

/// First existing `application.<ext>` across `dirs`.
#[must_use]
pub fn find_config_file(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| {
            CONFIG_FILE_EXTENSIONS
                .iter()
                .map(move |ext| dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
        })
        .find(|candidate| candidate.is_file())
}

/// Integer, then float, then boolean, then string.
fn typed_env_value(raw: &str) -> Value {
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            return Value::from(f);
        }
    }
    if let Ok(b) = raw.parse::<bool>() {
        return Value::from(b);
    }
    Value::from(raw)
}

fn insert_path(root: &mut Value, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else { return };
        node = map
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert((*last).to_string(), value);
    }
}

/// Deep-merges `overlay` into `base`; tables merge key by key, anything else
/// replaces.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_empty_loader() {
        let settings = ConfigLoader::new().load_with_vars(Vec::new()).unwrap();
        assert_eq!(settings.as_value(), &json!({}));
        assert!(settings.source().is_none());
    }

    #[test]
    fn test_yaml_file() {
        let file = temp_file(
            ".yaml",
            "version: 1.0.0\nservice:\n  name: orders\n  port: 8080\nlog-level: DEBUG\n",
        );
        let settings = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load_with_vars(Vec::new())
            .unwrap();

        assert_eq!(settings.get("service.name").string(""), "orders");
        assert_eq!(settings.get("service.port").int(0), 8080);
        assert_eq!(settings.get("log-level").string(""), "DEBUG");
        assert_eq!(settings.source(), Some(file.path()));
    }

    #[test]
    fn test_toml_file() {
        let file = temp_file(".toml", "version = \"1\"\n[service]\nport = 9000\n");
        let settings = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load_with_vars(Vec::new())
            .unwrap();
        assert_eq!(settings.get("service.port").int(0), 9000);
    }

    #[test]
    fn test_json_file() {
        let file = temp_file(".json", r#"{"service": {"host": "127.0.0.1"}}"#);
        let settings = ConfigLoader::new()
            .with_file(file.path())
            .unwrap()
            .load_with_vars(Vec::new())
            .unwrap();
        assert_eq!(settings.get("service.host").string(""), "127.0.0.1");
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::new().with_file("/nonexistent/application.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));

        assert!(ConfigLoader::new()
            .with_optional_file("/nonexistent/application.yaml")
            .is_ok());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_file(".ini", "[service]\n");
        let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_invalid_content() {
        let err = ConfigLoader::new().with_string("service: [", "yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));

        let err = ConfigLoader::new().with_string("{", "json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));

        let err = ConfigLoader::new().with_string("= 1", "toml").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_empty_yaml_document() {
        let settings = ConfigLoader::new()
            .with_string("", "yaml")
            .unwrap()
            .load_with_vars(Vec::new())
            .unwrap();
        assert_eq!(settings.as_value(), &json!({}));
    }

    #[test]
    fn test_defaults_are_overridden_by_file() {
        let settings = ConfigLoader::new()
            .with_string("service:\n  port: 9000\n", "yaml")
            .unwrap()
            .with_defaults(json!({ "service": { "host": "0.0.0.0", "port": 8080 } }))
            .load_with_vars(Vec::new())
            .unwrap();

        assert_eq!(settings.get("service.port").int(0), 9000);
        assert_eq!(settings.get("service.host").string(""), "0.0.0.0");
    }

    #[test]
    fn test_with_value() {
        let settings = ConfigLoader::new()
            .with_value("service.name", "inline")
            .with_value("log-level", "WARN")
            .load_with_vars(Vec::new())
            .unwrap();
        assert_eq!(settings.get("service.name").string(""), "inline");
        assert_eq!(settings.get("log-level").string(""), "WARN");
    }

    #[test]
    fn test_env_overrides() {
        let settings = ConfigLoader::new()
            .with_string("service:\n  port: 8080\n  name: file\n", "yaml")
            .unwrap()
            .with_env_prefix("webstrap")
            .load_with_vars(vars(&[
                ("WEBSTRAP__SERVICE__PORT", "9999"),
                ("WEBSTRAP__SERVICE__WRITE_TIMEOUT_SECONDS", "30"),
                ("WEBSTRAP__LOG_LEVEL", "debug"),
                ("WEBSTRAP__FEATURE__RATIO", "0.25"),
                ("WEBSTRAP__FEATURE__ENABLED", "true"),
                ("OTHER__SERVICE__PORT", "1"),
                ("WEBSTRAPX__SERVICE__PORT", "2"),
            ]))
            .unwrap();

        assert_eq!(settings.get("service.port").value(), Some(&json!(9999)));
        assert_eq!(settings.get("service.name").string(""), "file");
        assert_eq!(settings.get("service.write-timeout-seconds").int(0), 30);
        assert_eq!(settings.get("log-level").string(""), "debug");
        assert_eq!(settings.get("feature.ratio").float(0.0), 0.25);
        assert!(settings.get("feature.enabled").bool(false));
    }

    #[test]
    fn test_env_empty_segment_is_rejected() {
        let err = ConfigLoader::new()
            .with_env_prefix("WEBSTRAP")
            .load_with_vars(vars(&[("WEBSTRAP__SERVICE____PORT", "1")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::EnvParseError { .. }));
    }

    #[test]
    fn test_env_without_prefix_is_ignored() {
        let settings = ConfigLoader::new()
            .load_with_vars(vars(&[("WEBSTRAP__SERVICE__PORT", "1")]))
            .unwrap();
        assert!(!settings.is_set("service.port"));
    }

    #[test]
    fn test_env_replaces_scalar_parent() {
        let settings = ConfigLoader::new()
            .with_value("service", "flat")
            .with_env_prefix("WEBSTRAP")
            .load_with_vars(vars(&[("WEBSTRAP__SERVICE__PORT", "1")]))
            .unwrap();
        assert_eq!(settings.get("service.port").int(0), 1);
    }

    #[test]
    fn test_typed_env_values() {
        assert_eq!(typed_env_value("42"), json!(42));
        assert_eq!(typed_env_value("-7"), json!(-7));
        assert_eq!(typed_env_value("1.5"), json!(1.5));
        assert_eq!(typed_env_value("false"), json!(false));
        assert_eq!(typed_env_value("inf"), json!("inf"));
        assert_eq!(typed_env_value("orders"), json!("orders"));
    }

    #[test]
    fn test_discovery_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("application.yaml"), "service:\n  name: second\n").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        assert_eq!(
            find_config_file(&dirs),
            Some(second.path().join("application.yaml"))
        );

        fs::write(first.path().join("application.json"), r#"{"service":{"name":"first"}}"#).unwrap();
        let settings = ConfigLoader::new()
            .discover_in(&dirs)
            .unwrap()
            .load_with_vars(Vec::new())
            .unwrap();
        assert_eq!(settings.get("service.name").string(""), "first");
    }

    #[test]
    fn test_discovery_prefers_yaml_within_a_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("application.toml"), "v = 1\n").unwrap();
        fs::write(dir.path().join("application.yaml"), "v: 2\n").unwrap();

        let found = find_config_file(&[dir.path().to_path_buf()]);
        assert_eq!(found, Some(dir.path().join("application.yaml")));
    }

    #[test]
    fn test_discovery_without_file() {
        let dir = TempDir::new().unwrap();
        let settings = ConfigLoader::new()
            .discover_in(&[dir.path().to_path_buf()])
            .unwrap()
            .load_with_vars(Vec::new())
            .unwrap();
        assert!(settings.source().is_none());
    }

    #[test]
    fn test_merge_is_deep() {
        let mut base = json!({ "a": { "x": 1, "y": 2 }, "b": 1 });
        merge(&mut base, json!({ "a": { "y": 3, "z": 4 }, "b": { "c": 5 } }));
        assert_eq!(base, json!({ "a": { "x": 1, "y": 3, "z": 4 }, "b": { "c": 5 } }));
    }
}
