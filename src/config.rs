use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result};
use glob::Pattern;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = ".stachemig.json";

/// Maps a file-path fragment to an inventory category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
    pub path_contains: String,
    pub category: String,
}

impl CategoryRule {
    fn new(path_contains: &str, category: &str) -> Self {
        Self {
            path_contains: path_contains.to_string(),
            category: category.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_inventory")]
    pub inventory: String,
    #[serde(default = "default_template_roots")]
    pub template_roots: Vec<String>,
    #[serde(default = "default_template_extension")]
    pub template_extension: String,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_checked_attributes")]
    pub checked_attributes: Vec<String>,
    #[serde(default)]
    pub ignore_texts: Vec<String>,
    #[serde(default = "default_lang_root")]
    pub lang_root: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    #[serde(default = "default_category_rules")]
    pub category_rules: Vec<CategoryRule>,
    #[serde(default = "default_backup_root")]
    pub backup_root: String,
    #[serde(default = "default_report_path")]
    pub report_path: String,
    #[serde(default = "default_validation_report_path")]
    pub validation_report_path: String,
    #[serde(default = "default_pilot_size")]
    pub pilot_size: usize,
}

fn default_inventory() -> String {
    "i18n_strings_inventory.json".to_string()
}

fn default_template_roots() -> Vec<String> {
    ["resources/views", "modules"].map(String::from).to_vec()
}

fn default_template_extension() -> String {
    "mustache".to_string()
}

fn default_checked_attributes() -> Vec<String> {
    crate::core::replace::DEFAULT_ATTRIBUTES
        .iter()
        .map(|a| a.to_string())
        .collect()
}

fn default_lang_root() -> String {
    "resources/lang".to_string()
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_categories() -> Vec<String> {
    ["admin", "forms", "messages", "help", "uncategorized"]
        .map(String::from)
        .to_vec()
}

fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("admin", "admin"),
        CategoryRule::new("form", "forms"),
        CategoryRule::new("auth", "forms"),
        CategoryRule::new("message", "messages"),
        CategoryRule::new("alert", "messages"),
        CategoryRule::new("help", "help"),
    ]
}

fn default_backup_root() -> String {
    "backups".to_string()
}

fn default_report_path() -> String {
    "TEMPLATE_MIGRATION_REPORT.md".to_string()
}

fn default_validation_report_path() -> String {
    "I18N_VALIDATION_REPORT.md".to_string()
}

fn default_pilot_size() -> usize {
    8
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inventory: default_inventory(),
            template_roots: default_template_roots(),
            template_extension: default_template_extension(),
            ignores: Vec::new(),
            checked_attributes: default_checked_attributes(),
            ignore_texts: Vec::new(),
            lang_root: default_lang_root(),
            locale: default_locale(),
            categories: default_categories(),
            category_rules: default_category_rules(),
            backup_root: default_backup_root(),
            report_path: default_report_path(),
            validation_report_path: default_validation_report_path(),
            pilot_size: default_pilot_size(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Glob patterns in `ignores` must parse; attribute and category names must be non-empty.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if let Some(attr) = self.checked_attributes.iter().find(|a| a.trim().is_empty()) {
            anyhow::bail!("Invalid attribute name in 'checkedAttributes': \"{}\"", attr);
        }

        for category in self
            .categories
            .iter()
            .chain(self.category_rules.iter().map(|r| &r.category))
        {
            if category.is_empty() || category.contains('.') {
                anyhow::bail!("Invalid category name: \"{}\"", category);
            }
        }

        if self.pilot_size == 0 {
            anyhow::bail!("'pilotSize' must be at least 1");
        }

        Ok(())
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            tracing::debug!(path = %path.display(), "loaded config");
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
