use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use crate::builders::validator::{ConfigValidator, StandardValidator};

pub const CONFIG_FILE_NAME: &str = ".yuidoc-gen.toml";
pub const CONFIG_VERSION: &str = "1.0";

/// Language identifiers the declaration matchers are written for.
pub const KNOWN_LANGUAGES: &[&str] = &[
    "javascript",
    "javascriptreact",
    "typescript",
    "typescriptreact",
];

/// Placeholder text used when synthesizing new comments.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TemplateSettings {
    /// The description line of function comments.
    pub description: String,
    /// The type written into `@param {type}`.
    pub param_type: String,
    /// Trailing text of `@param` lines and of the class description.
    pub param_description: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            description: "Description".to_string(),
            param_type: "type".to_string(),
            param_description: "description".to_string(),
        }
    }
}

/// Controls what the engine scans and which edits it may emit.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ScanSettings {
    /// Languages the engine accepts. An empty list accepts every language.
    pub languages: Vec<String>,
    /// Re-indent existing `/** ... */` blocks in place.
    pub normalize_existing: bool,
    /// Skip any declaration whose previous line closes a comment, not only the
    /// first line of a selection.
    pub skip_documented: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            languages: KNOWN_LANGUAGES.iter().map(|l| l.to_string()).collect(),
            normalize_existing: true,
            skip_documented: true,
        }
    }
}

impl ScanSettings {
    /// Checks the language gate.
    ///
    /// # Arguments
    /// * `language_id`: The identifier reported by the text source.
    ///
    /// # Returns
    /// `true` when the list is empty or contains `language_id`.
    pub fn accepts_language(&self, language_id: &str) -> bool {
        self.languages.is_empty() || self.languages.iter().any(|l| l == language_id)
    }
}

/// The contents of `.yuidoc-gen.toml`. Every section and key is optional;
/// missing values take their defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Format version of the file, currently `1.0`.
    pub version: String,
    pub template: TemplateSettings,
    pub scan: ScanSettings,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            template: TemplateSettings::default(),
            scan: ScanSettings::default(),
        }
    }
}

/// Serialization formats supported by `export-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Toml,
    Json,
    Yaml,
}

impl ExportFormat {
    /// Unknown names fall back to TOML, the native config format.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "json" => ExportFormat::Json,
            "yaml" | "yml" => ExportFormat::Yaml,
            _ => ExportFormat::Toml,
        }
    }
}

/// Owns the location of the config file and implements [`ConfigProvider`]
/// on top of it.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Uses `.yuidoc-gen.toml` in the current working directory.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to read current directory")?;
        Ok(Self::new_at(current_dir))
    }

    /// Uses `.yuidoc-gen.toml` inside `root`.
    pub fn new_at(root: impl AsRef<Path>) -> Self {
        Self {
            config_path: root.as_ref().join(CONFIG_FILE_NAME),
        }
    }

    /// Uses an explicit config file path.
    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
        }
    }

    /// Writes the default configuration unless a config file already exists.
    /// Returns whether a file was written.
    pub fn initialize(&self) -> Result<bool> {
        if self.config_path.exists() {
            return Ok(false);
        }

        let default_config = GeneratorConfig::default();
        self.save_config(&default_config)?;
        Ok(true)
    }

    /// Loads the configuration and returns the list of problems found in it.
    pub fn validate_config(&self) -> Result<Vec<String>> {
        let config = self.load_config()?;
        let validator = StandardValidator::new();
        validator.validate_config(&config)
    }

    /// Serializes the current configuration into `file_path`.
    pub fn export_config(&self, file_path: &Path, format: ExportFormat) -> Result<()> {
        let config = self.load_config()?;

        let content = match format {
            ExportFormat::Json => {
                serde_json::to_string_pretty(&config).context("Failed to serialize to JSON")?
            }
            ExportFormat::Yaml => {
                serde_yaml::to_string(&config).context("Failed to serialize to YAML")?
            }
            ExportFormat::Toml => {
                toml::to_string_pretty(&config).context("Failed to serialize to TOML")?
            }
        };

        fs::write(file_path, content).context("Failed to write export file")?;

        Ok(())
    }
}

/// Loads and stores the generator configuration.
pub trait ConfigProvider {
    /// Reads the configuration.
    ///
    /// # Returns
    /// The parsed `GeneratorConfig`, or the defaults when no file exists. An
    /// error is returned if the file cannot be read or is not valid TOML.
    fn load_config(&self) -> Result<GeneratorConfig>;

    /// Writes `config` as TOML, replacing any existing file.
    ///
    /// # Arguments
    /// * `config`: The configuration to persist.
    fn save_config(&self, config: &GeneratorConfig) -> Result<()>;

    /// The path the configuration is read from and written to.
    fn get_config_path(&self) -> &Path;
}

impl ConfigProvider for ConfigManager {
    fn load_config(&self) -> Result<GeneratorConfig> {
        if !self.config_path.exists() {
            return Ok(GeneratorConfig::default());
        }

        let content =
            fs::read_to_string(&self.config_path).context("Failed to read config file")?;

        toml::from_str(&content).context("Failed to parse config file")
    }

    fn save_config(&self, config: &GeneratorConfig) -> Result<()> {
        let content = toml::to_string_pretty(config).context("Failed to serialize config")?;

        fs::write(&self.config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    fn get_config_path(&self) -> &Path {
        &self.config_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path());
        assert_eq!(manager.load_config().unwrap(), GeneratorConfig::default());
    }

    #[test]
    fn test_initialize_writes_once() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path());

        assert!(manager.initialize().unwrap());
        assert!(dir.path().join(CONFIG_FILE_NAME).exists());
        assert!(!manager.initialize().unwrap());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[template]\nparam_type = \"any\"\n").unwrap();

        let config = ConfigManager::with_path(&path).load_config().unwrap();
        assert_eq!(config.template.param_type, "any");
        assert_eq!(config.template.description, "Description");
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.scan.normalize_existing);
    }

    #[test]
    fn test_param_description_is_read_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, "[template]\nparam_description = \"TODO\"\n").unwrap();

        let config = ConfigManager::with_path(&path).load_config().unwrap();
        assert_eq!(config.template.param_description, "TODO");
        assert_eq!(config.template.param_type, "type");
    }

    #[test]
    fn test_language_gate() {
        let mut scan = ScanSettings::default();
        assert!(scan.accepts_language("javascript"));
        assert!(!scan.accepts_language("python"));

        scan.languages.clear();
        assert!(scan.accepts_language("python"));
    }

    #[test]
    fn test_export_formats() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::new_at(dir.path());

        let json_path = dir.path().join("config.json");
        manager.export_config(&json_path, ExportFormat::from_name("json")).unwrap();
        let exported: GeneratorConfig =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(exported, GeneratorConfig::default());

        let yaml_path = dir.path().join("config.yaml");
        manager.export_config(&yaml_path, ExportFormat::Yaml).unwrap();
        let yaml = fs::read_to_string(&yaml_path).unwrap();
        assert!(yaml.contains("param_type: type"));

        assert_eq!(ExportFormat::from_name("whatever"), ExportFormat::Toml);
    }
}
