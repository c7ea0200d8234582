//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `std_index`: index built from `tests/data/std_corpus.json`
//! - `temp_workspace`: an empty temp directory for cache and corpus files
//!
//! Data files live in `tests/data/`; use [`data_path`] to locate them.

use docsearch::corpus::load_entries;
use docsearch::SearchIndex;
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns the project root directory (where Cargo.toml lives).
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Path of a file under `tests/data/`.
pub fn data_path(name: &str) -> PathBuf {
    project_root().join("tests/data").join(name)
}

/// A temporary directory for test isolation, removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Copies a file from `tests/data/` into this workspace.
    ///
    /// # Panics
    /// Panics if copying fails.
    pub fn copy_data(&self, name: &str) -> PathBuf {
        let dest = self.root.join(name);
        std::fs::copy(data_path(name), &dest)
            .unwrap_or_else(|e| panic!("Failed to copy '{}': {}", name, e));
        dest
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Index over the small std-like corpus in `tests/data/std_corpus.json`.
#[fixture]
pub fn std_index() -> SearchIndex {
    docsearch::tracing::init();
    let entries = load_entries(&data_path("std_corpus.json")).expect("Failed to load test corpus");
    SearchIndex::build(entries).expect("Test corpus should be valid")
}

#[fixture]
pub fn temp_workspace() -> TempWorkspace {
    TempWorkspace::new()
}
