use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};

use super::super::args::CommonArgs;
use crate::{
    config::{Config, load_config},
    core::{StringInventory, inventory::load_inventory},
};

/// Project root plus the effective configuration for one command.
///
/// Priority for every setting: CLI flag > config file > defaults.
pub struct ProjectContext {
    pub root: PathBuf,
    pub config: Config,
    pub verbose: bool,
}

impl ProjectContext {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let root = common.root.clone().unwrap_or_else(|| PathBuf::from("."));
        if !root.is_dir() {
            anyhow::bail!("Project root is not a directory: {}", root.display());
        }

        let loaded = load_config(&root)?;
        if !loaded.from_file {
            tracing::info!("no config file found, using default configuration");
        }

        Ok(Self {
            root,
            config: loaded.config,
            verbose: common.verbose,
        })
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let p = path.as_ref();
        if p.is_absolute() {
            return p.to_path_buf();
        }
        let is_cur_dir = self
            .root
            .components()
            .all(|c| matches!(c, Component::CurDir));
        if is_cur_dir {
            p.to_path_buf()
        } else {
            let rel = p.strip_prefix(Path::new(".")).unwrap_or(p);
            self.root.join(rel)
        }
    }

    /// Inventory path: `override_path` if given, else the configured one.
    pub fn inventory_path(&self, override_path: Option<&Path>) -> PathBuf {
        match override_path {
            Some(p) => self.resolve(p),
            None => self.resolve(&self.config.inventory),
        }
    }

    /// Load the inventory. Any failure is fatal for the run.
    pub fn load_inventory(&self, override_path: Option<&Path>) -> Result<StringInventory> {
        let path = self.inventory_path(override_path);
        let inventory = load_inventory(&path)
            .with_context(|| format!("Failed to load inventory: {}", path.display()))?;
        tracing::info!(path = %path.display(), entries = inventory.len(), "loaded inventory");
        Ok(inventory)
    }
}
