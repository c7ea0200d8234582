//! Server configuration loaded from TOML with environment overrides.
//!
//! Lookup order: `$DOCSEARCH_CONFIG`, then `<config dir>/docsearch/config.toml`,
//! then built-in defaults. `DOCSEARCH_CORPUS` and `DOCSEARCH_MAX_RESULTS` override
//! the corresponding file values.

use crate::error::ConfigError;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Default cap on results per category, matching rustdoc's search page.
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// Default number of memoized search responses.
pub const DEFAULT_MEMO_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Corpus file (entry list or rustdoc JSON). `~` is expanded.
    pub corpus: Option<PathBuf>,
    /// Directory for cached indices; `None` disables caching
    pub cache_dir: Option<PathBuf>,
    pub max_results: usize,
    pub memo_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            corpus: None,
            cache_dir: dirs::cache_dir().map(|dir| dir.join("docsearch")),
            max_results: DEFAULT_MAX_RESULTS,
            memo_size: DEFAULT_MEMO_SIZE,
        }
    }
}

impl Config {
    /// Load configuration from the usual locations and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os("DOCSEARCH_CONFIG").map(PathBuf::from);
        let default_path = dirs::config_dir().map(|dir| dir.join("docsearch/config.toml"));

        let mut config = match (explicit, default_path) {
            // An explicitly named file must exist
            (Some(path), _) => Self::from_file(&path)?,
            (None, Some(path)) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(text)?;
        config.corpus = config.corpus.map(|path| expand_path(&path));
        config.cache_dir = config.cache_dir.map(|path| expand_path(&path));
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in production).
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(corpus) = lookup("DOCSEARCH_CORPUS") {
            self.corpus = Some(expand_path(Path::new(&corpus)));
        }
        if let Some(value) = lookup("DOCSEARCH_MAX_RESULTS") {
            self.max_results = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: "DOCSEARCH_MAX_RESULTS",
                value,
            })?;
        }
        Ok(())
    }
}

fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(expand_tilde(&path.to_string_lossy()).as_ref())
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
///
/// Returns `Cow::Borrowed` if no expansion needed, `Cow::Owned` if expanded.
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}
