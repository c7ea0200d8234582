//! Immutable search index over documentation entries, with an on-disk cache.

use crate::corpus;
use crate::error::{CorpusError, IndexError};
use postcard::{from_bytes, to_stdvec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

use super::rustdoc::ItemKind;

/// Bumped whenever the serialized layout of [`SearchIndex`] changes.
const CACHE_VERSION: u32 = 1;

/// Type names appearing in a function signature.
///
/// Names are bare (last path segment) with references, pointers, slices and
/// arrays unwrapped: `fn(&[u8]) -> Result<String, Utf8Error>` is summarized as
/// `inputs = ["u8"]`, `output = ["Result"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub inputs: Vec<String>,
    #[serde(default)]
    pub output: Vec<String>,
}

/// One documentable symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Namespace segments leading to the item, e.g. `["std", "string", "String"]`
    pub path: Vec<String>,
    /// Short name of the item, e.g. `from_utf8`
    pub name: String,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
}

impl Entry {
    pub fn new(path: &[&str], name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            path: path.iter().map(|s| (*s).to_string()).collect(),
            name: name.into(),
            kind,
            signature: None,
        }
    }

    #[must_use]
    pub fn with_signature(mut self, inputs: &[&str], output: &[&str]) -> Self {
        self.signature = Some(Signature {
            inputs: inputs.iter().map(|s| (*s).to_string()).collect(),
            output: output.iter().map(|s| (*s).to_string()).collect(),
        });
        self
    }

    /// The namespace path joined with `::` (empty for crate roots).
    pub fn path_str(&self) -> String {
        self.path.join("::")
    }

    /// The fully qualified name, e.g. `std::char::from_u32`.
    pub fn qualified_name(&self) -> String {
        if self.path.is_empty() {
            self.name.clone()
        } else {
            format!("{}::{}", self.path_str(), self.name)
        }
    }
}

/// An entry together with its precomputed normalized forms.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexedEntry<'a> {
    pub entry: &'a Entry,
    pub name: &'a str,
    pub path: &'a [String],
}

/// The searchable collection of entries.
///
/// Built once and never mutated afterwards, so a shared reference can be
/// queried from any number of threads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchIndex {
    entries: Vec<Entry>,
    /// Lowercased names, parallel to `entries`
    names: Vec<String>,
    /// Lowercased path segments, parallel to `entries`
    paths: Vec<Vec<String>>,
}

impl SearchIndex {
    /// Builds an index, rejecting entries with an empty name or path segment.
    pub fn build(entries: impl IntoIterator<Item = Entry>) -> Result<Self, IndexError> {
        let entries: Vec<Entry> = entries.into_iter().collect();
        let mut names = Vec::with_capacity(entries.len());
        let mut paths = Vec::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(IndexError::InvalidEntry {
                    position,
                    path: entry.path_str(),
                    reason: "empty name",
                });
            }
            if entry.path.iter().any(|segment| segment.trim().is_empty()) {
                return Err(IndexError::InvalidEntry {
                    position,
                    path: entry.path_str(),
                    reason: "empty path segment",
                });
            }

            names.push(entry.name.trim().to_lowercase());
            paths.push(
                entry
                    .path
                    .iter()
                    .map(|segment| segment.trim().to_lowercase())
                    .collect(),
            );
        }

        tracing::debug!("Built search index with {} entries", entries.len());

        Ok(Self {
            entries,
            names,
            paths,
        })
    }

    /// All entries in insertion order. The iterator can be cloned to restart a scan.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + Clone {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn indexed(&self) -> impl Iterator<Item = IndexedEntry<'_>> {
        self.entries
            .iter()
            .zip(&self.names)
            .zip(&self.paths)
            .map(|((entry, name), path)| IndexedEntry {
                entry,
                name: name.as_str(),
                path: path.as_slice(),
            })
    }

    /// Loads the corpus at `corpus_path`, reusing a cached index when possible.
    ///
    /// The cache lives at `<cache_dir>/<corpus stem>.index` and is keyed by an
    /// xxh3 fingerprint of the corpus bytes. A stale or unreadable cache is
    /// rebuilt; failing to write it only logs a warning.
    pub fn load_or_build(
        corpus_path: &Path,
        cache_dir: Option<&Path>,
    ) -> Result<Self, CorpusError> {
        let bytes = std::fs::read(corpus_path).map_err(|source| CorpusError::Io {
            path: corpus_path.to_path_buf(),
            source,
        })?;
        let fingerprint = xxh3_64(&bytes);
        let cache_path = cache_dir.map(|dir| cache_file_path(dir, corpus_path));

        if let Some(index) = cache_path
            .as_deref()
            .and_then(|path| Self::load_cached(path, fingerprint))
        {
            tracing::debug!(
                "Loaded cached search index for {} ({} entries)",
                corpus_path.display(),
                index.len()
            );
            return Ok(index);
        }

        let start = std::time::Instant::now();
        let entries = corpus::parse_entries(&bytes, corpus_path)?;
        let index = Self::build(entries)?;
        tracing::info!(
            "Built search index from {}: {} entries in {:?}",
            corpus_path.display(),
            index.len(),
            start.elapsed()
        );

        if let Some(path) = cache_path {
            index.store(&path, fingerprint);
        }

        Ok(index)
    }

    /// Load a cached index if its fingerprint matches.
    fn load_cached(path: &Path, fingerprint: u64) -> Option<Self> {
        let bytes = std::fs::read(path).ok()?;
        match from_bytes::<CachedIndex>(&bytes) {
            Ok(cached) if cached.version == CACHE_VERSION && cached.fingerprint == fingerprint => {
                Some(cached.index)
            }
            Ok(_) => {
                tracing::info!(
                    "Cache stale, will rebuild index (file: {})",
                    path.display()
                );
                None
            }
            Err(e) => {
                tracing::warn!("Failed to deserialize cached index at {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Store the index to disk, replacing any previous cache file.
    fn store(&self, path: &Path, fingerprint: u64) {
        let cached = CachedIndexRef {
            version: CACHE_VERSION,
            fingerprint,
            index: self,
        };

        let bytes = match to_stdvec(&cached) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to serialize search index: {}", e);
                return;
            }
        };

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("Failed to create cache directory {}: {}", parent.display(), e);
            return;
        }

        match std::fs::write(path, bytes) {
            Ok(()) => tracing::debug!("Cached search index to {}", path.display()),
            Err(e) => {
                tracing::warn!("Failed to write search index to {}: {}", path.display(), e);
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

#[derive(Deserialize)]
struct CachedIndex {
    version: u32,
    fingerprint: u64,
    index: SearchIndex,
}

#[derive(Serialize)]
struct CachedIndexRef<'a> {
    version: u32,
    fingerprint: u64,
    index: &'a SearchIndex,
}

/// Cache file location for a corpus file.
pub fn cache_file_path(cache_dir: &Path, corpus_path: &Path) -> PathBuf {
    let stem = corpus_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());
    cache_dir.join(format!("{}.index", stem))
}
