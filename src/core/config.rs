//! Rewrite configuration: built-in defaults, optional JSON file, CLI overrides.

use crate::error::{Error, Result};
use crate::local_files::{self, FileSystem};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const DEFAULT_ELEMENT: &str = "FooterCached";
pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_PATTERN: &str = "app/**/*.tsx";

// Same character set the tag scanner accepts for names.
static ELEMENT_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$.:\-]*$").unwrap());

/// Everything one run needs to know.
///
/// Every field has a default, so a config file may set any subset:
///
/// ```json
/// { "element": "Widget", "pattern": "src/**/*.jsx" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteConfig {
    /// Element name to normalize (exact match, case-sensitive).
    #[serde(default = "default_element")]
    pub element: String,

    /// Directory the glob pattern is resolved against.
    #[serde(default = "default_root")]
    pub root: String,

    /// Recursive glob relative to `root`.
    #[serde(default = "default_pattern")]
    pub pattern: String,

    /// Report what would change without writing.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_element() -> String {
    DEFAULT_ELEMENT.to_string()
}

fn default_root() -> String {
    DEFAULT_ROOT.to_string()
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            element: default_element(),
            root: default_root(),
            pattern: default_pattern(),
            dry_run: false,
        }
    }
}

/// Values supplied on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub element: Option<String>,
    pub root: Option<String>,
    pub pattern: Option<String>,
    pub dry_run: bool,
}

impl RewriteConfig {
    /// Load a config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = local_files::local().read(path)?;
        Self::from_json(&content, &path.display().to_string())
    }

    pub fn from_json(content: &str, source: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| Error::config_invalid_json(source, e))
    }

    /// Resolve the effective config: file (if any) or defaults, then overrides.
    pub fn resolve(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let base = match config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(element) = overrides.element {
            self.element = element;
        }
        if let Some(root) = overrides.root {
            self.root = root;
        }
        if let Some(pattern) = overrides.pattern {
            self.pattern = pattern;
        }
        self.dry_run = self.dry_run || overrides.dry_run;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !is_element_name(&self.element) {
            return Err(Error::validation_invalid_argument(
                "element",
                format!("'{}' is not a valid element name", self.element),
                Some(self.element.clone()),
            )
            .with_hint("Element names start with a letter, '_' or '$' (e.g. FooterCached)"));
        }

        if self.pattern.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "pattern",
                Some(self.pattern.clone()),
                "glob pattern must not be empty",
            ));
        }

        if self.root.trim().is_empty() {
            return Err(Error::config_invalid_value(
                "root",
                Some(self.root.clone()),
                "root directory must not be empty",
            ));
        }

        Ok(())
    }

    /// Root directory with `~` expanded.
    pub fn root_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.root).into_owned())
    }
}

fn is_element_name(name: &str) -> bool {
    ELEMENT_NAME_PATTERN.is_match(name)
}
