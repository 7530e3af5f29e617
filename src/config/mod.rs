//! Configuration management for `vasset.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [groups] [roots] [cache] [cdn] [build] [serve]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util           # config discovery, path expansion
//! └── mod.rs         # BundleConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section    | Purpose                                          |
//! |------------|--------------------------------------------------|
//! | `[groups]` | Group record storage, id prefix, endpoint route  |
//! | `[roots]`  | Web/theme/asset-manager roots and their URLs     |
//! | `[cache]`  | Cache backend and fingerprint reuse              |
//! | `[cdn]`    | Remote publishing                                |
//! | `[build]`  | Minification                                     |
//! | `[serve]`  | Endpoint server (interface, port)                |

pub mod section;
pub mod types;
mod util;

use util::{expand_path, find_config_file};

pub use section::{
    BuildConfig, CacheBackendKind, CacheConfig, CdnConfig, GroupsConfig, RootsConfig, ServeConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{Cli, Commands};
use crate::log;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing `vasset.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of the config file; relative paths resolve against it
    #[serde(skip)]
    pub root: PathBuf,

    pub groups: GroupsConfig,
    pub roots: RootsConfig,
    pub cache: CacheConfig,
    pub cdn: CdnConfig,
    pub build: BuildConfig,
    pub serve: ServeConfig,
}

impl BundleConfig {
    /// Load configuration for a CLI invocation.
    ///
    /// Searches upward from cwd for the config file, applies command-line
    /// overrides and validates the result.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&path)?;
        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string (paths stay as written).
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    ///
    /// Paths are resolved against the file's directory.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.config_path = crate::utils::path::normalize_path(path);
        config.finalize(&root);
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve every configured path against `root`.
    pub fn finalize(&mut self, root: &Path) {
        let root = crate::utils::path::normalize_path(root);

        self.groups.dir = expand_path(&self.groups.dir, &root);
        self.cache.dir = expand_path(&self.cache.dir, &root);
        self.roots.web = expand_path(&self.roots.web, &root);
        for path in [
            &mut self.roots.theme,
            &mut self.roots.assets,
            &mut self.cdn.dir,
        ]
        .into_iter()
        .flatten()
        {
            *path = expand_path(path, &root);
        }

        self.root = root;
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        Self::update_option(&mut self.build.minify, cli.minify.as_ref());

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate all sections, collecting every error before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.groups.validate(&mut diag);
        self.roots.validate(&mut diag);
        self.cdn.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Commented TOML template covering every section.
    pub fn template() -> String {
        [
            GroupsConfig::template_with_header(),
            RootsConfig::template_with_header(),
            CacheConfig::template_with_header(),
            CdnConfig::template_with_header(),
            BuildConfig::template_with_header(),
            ServeConfig::template_with_header(),
        ]
        .join("\n\n")
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config text. Panics on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BundleConfig {
    let (parsed, ignored) = BundleConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
