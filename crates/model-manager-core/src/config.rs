use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::{CategoryClassifier, RuleConfigEntry, RuleStore};
use crate::error::{ModelManagerError, Result};
use crate::query::SortKey;

const CONFIG_FILE: &str = "config.toml";
const BASE_DIR_NAME: &str = ".model-manager";

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "MODEL_MANAGER_BASE";

/// Root scanned when no roots are configured
pub const DEFAULT_MODEL_DIRS: &[&str] = &["ckpts"];

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r##"# model-manager configuration file
# Location: ~/.model-manager/config.toml

[scan]
# Directories scanned recursively for model weights
# (.safetensors, .sft, .pth, .pt, .ckpt). Dot-directories are skipped.
# Default: [] (falls back to "ckpts" in the working directory)
# Example: roots = ["/data/ckpts", "~/ComfyUI/models"]
roots = []

[display]
# Default ordering: "size" (largest first), "name" or "date" (newest first)
sort = "size"

# Default view: "compact" or "detailed"
view = "compact"

# Extra classification rules, evaluated before the builtin ones.
# Patterns are case-insensitive globs.
#
# [[rules]]
# category = "ControlNet"
# color = "#14b8a6"
# icon = "🕹️"
# name_patterns = ["*controlnet*"]
"##;

/// List rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Selectable one-line choices
    #[default]
    Compact,
    /// Styled rows with path, category badge and date
    Detailed,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Detailed => "detailed",
        }
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "grid" => Ok(Self::Compact),
            "detailed" | "list" => Ok(Self::Detailed),
            _ => Err(format!("Unknown view mode: {} (expected compact or detailed)", s)),
        }
    }
}

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    /// User classification rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfigEntry>,
}

/// Scan-related configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScanConfig {
    /// Root directories; empty means [`DEFAULT_MODEL_DIRS`]
    #[serde(default)]
    pub roots: Vec<PathBuf>,
}

/// Display defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    #[serde(default)]
    pub sort: SortKey,

    #[serde(default)]
    pub view: ViewMode,
}

/// Default base directory (`~/.model-manager`)
pub fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(BASE_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(BASE_DIR_NAME))
}

/// Resolve the base directory: explicit value, then env var, then default
pub fn resolve_base_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(base) = explicit {
        return base;
    }

    if let Ok(base) = std::env::var(BASE_DIR_ENV) {
        if !base.is_empty() {
            return PathBuf::from(base);
        }
    }

    default_base_dir()
}

impl Config {
    /// Load config from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ModelManagerError::ConfigParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(config)
    }

    /// Save config to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(CONFIG_FILE)
    }

    /// Initialize config with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(CONFIG_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Configured roots, or the builtin default when none are set
    pub fn configured_roots(&self) -> Vec<PathBuf> {
        if self.scan.roots.is_empty() {
            DEFAULT_MODEL_DIRS.iter().map(PathBuf::from).collect()
        } else {
            self.scan
                .roots
                .iter()
                .map(|p| PathBuf::from(shellexpand::tilde(&p.to_string_lossy()).into_owned()))
                .collect()
        }
    }

    /// Roots to scan: configured roots that are existing directories
    pub fn model_dirs(&self) -> Vec<PathBuf> {
        self.configured_roots()
            .into_iter()
            .filter(|p| p.is_dir())
            .collect()
    }

    /// Classifier with the user rules placed before the builtin ones
    pub fn classifier(&self) -> Result<CategoryClassifier> {
        CategoryClassifier::new(RuleStore::builtin().with_config(&self.rules))
    }

    /// Get a config value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "scan.roots" => Some(format!("{:?}", self.scan.roots)),
            "display.sort" => Some(self.display.sort.to_string()),
            "display.view" => Some(self.display.view.to_string()),
            _ => None,
        }
    }

    /// Set a config value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |message: String| ModelManagerError::InvalidConfigValue {
            key: key.to_string(),
            message,
        };

        match key {
            "scan.roots" => {
                self.scan.roots = parse_string_list(value)
                    .into_iter()
                    .map(PathBuf::from)
                    .collect();
                Ok(())
            }
            "display.sort" => {
                self.display.sort = value.parse().map_err(invalid)?;
                Ok(())
            }
            "display.view" => {
                self.display.view = value.parse().map_err(invalid)?;
                Ok(())
            }
            _ => Err(ModelManagerError::ConfigKeyNotFound {
                key: key.to_string(),
            }),
        }
    }

    /// List all config keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        ["scan.roots", "display.sort", "display.view"]
            .into_iter()
            .filter_map(|key| self.get(key).map(|v| (key.to_string(), v)))
            .collect()
    }
}

/// Parse a JSON array or a comma-separated list string
///
/// A well-formed JSON array keeps commas inside its elements.
fn parse_string_list(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
        return items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    let inner = if trimmed.starts_with('[') && trimmed.ends_with(']') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    inner
        .split(',')
        .map(|s| s.trim().trim_matches('"').trim_matches('\'').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_string_list_comma() {
        let result = parse_string_list("/data/ckpts,/mnt/models");
        assert_eq!(result, vec!["/data/ckpts", "/mnt/models"]);
    }

    #[test]
    fn test_parse_string_list_json() {
        let result = parse_string_list(r#"["/data/ckpts", "models"]"#);
        assert_eq!(result, vec!["/data/ckpts", "models"]);
    }

    #[test]
    fn test_parse_string_list_json_keeps_commas_in_paths() {
        let result = parse_string_list(r#"["/data/a,b", "/mnt/models"]"#);
        assert_eq!(result, vec!["/data/a,b", "/mnt/models"]);
    }

    #[test]
    fn test_parse_string_list_single_quotes_fall_back_to_split() {
        let result = parse_string_list("['/data/ckpts', 'models']");
        assert_eq!(result, vec!["/data/ckpts", "models"]);
    }

    #[test]
    fn test_parse_string_list_empty() {
        assert!(parse_string_list("[]").is_empty());
        assert!(parse_string_list("").is_empty());
    }

    #[test]
    fn test_config_get_set() {
        let mut config = Config::default();

        config.set("scan.roots", "/a,/b").unwrap();
        assert_eq!(
            config.scan.roots,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );

        config.set("display.sort", "date").unwrap();
        assert_eq!(config.get("display.sort").unwrap(), "date");

        config.set("display.view", "detailed").unwrap();
        assert_eq!(config.display.view, ViewMode::Detailed);

        assert!(matches!(
            config.set("display.sort", "sideways"),
            Err(ModelManagerError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            config.set("nope", "x"),
            Err(ModelManagerError::ConfigKeyNotFound { .. })
        ));
        assert_eq!(config.list().len(), 3);
    }

    #[test]
    fn test_default_roots_fallback() {
        let config = Config::default();
        assert_eq!(config.configured_roots(), vec![PathBuf::from("ckpts")]);
    }

    #[test]
    fn test_configured_roots_expand_tilde() {
        let home = match dirs::home_dir() {
            Some(home) => home,
            None => return,
        };
        let mut config = Config::default();
        config.scan.roots = vec![PathBuf::from("~/models"), PathBuf::from("/data/ckpts")];

        let roots = config.configured_roots();
        assert!(roots[0].starts_with(&home));
        assert!(roots[0].ends_with("models"));
        assert_eq!(roots[1], PathBuf::from("/data/ckpts"));
    }

    #[test]
    fn test_model_dirs_drops_missing_roots() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.scan.roots = vec![tmp.path().to_path_buf(), tmp.path().join("missing")];
        assert_eq!(config.model_dirs(), vec![tmp.path().to_path_buf()]);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(tmp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.scan.roots = vec![PathBuf::from("/data/ckpts")];
        config.display.sort = SortKey::Name;
        config.rules.push(RuleConfigEntry {
            category: "ControlNet".to_string(),
            name_patterns: vec!["*controlnet*".to_string()],
            ..Default::default()
        });
        config.save(tmp.path()).unwrap();

        let loaded = Config::load(tmp.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_init_template_parses() {
        let tmp = TempDir::new().unwrap();
        let path = Config::init(tmp.path()).unwrap();
        assert!(path.exists());

        let config = Config::load(tmp.path()).unwrap();
        assert!(config.scan.roots.is_empty());
        assert_eq!(config.display.sort, SortKey::Size);
        assert_eq!(config.display.view, ViewMode::Compact);
    }

    #[test]
    fn test_invalid_toml_reports_path() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "scan = [").unwrap();
        let err = Config::load(tmp.path()).unwrap_err();
        assert!(matches!(err, ModelManagerError::ConfigParse { .. }));
    }

    #[test]
    fn test_config_rules_feed_classifier() {
        let toml_str = r#"
            [[rules]]
            category = "ControlNet"
            name_patterns = ["*controlnet*"]
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let classifier = config.classifier().unwrap();
        let cat = classifier.classify(
            "sdxl_controlnet.safetensors",
            Path::new("/m/sdxl_controlnet.safetensors"),
            1,
        );
        assert_eq!(cat.label, "ControlNet");
    }
}
