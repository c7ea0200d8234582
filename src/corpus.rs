//! Corpus loading: plain JSON entry lists or rustdoc JSON output.

use crate::error::CorpusError;
use crate::search::{Entry, entries_from_crate};
use rustdoc_types::Crate;
use serde_json::Value;
use std::path::Path;

/// Reads a corpus file and returns its entries.
pub fn load_entries(path: &Path) -> Result<Vec<Entry>, CorpusError> {
    let bytes = std::fs::read(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_entries(&bytes, path)
}

/// Parses corpus bytes, detecting the format.
///
/// - A JSON array is a list of [`Entry`] objects.
/// - A JSON object with an `index` field is rustdoc JSON.
///
/// `path` is only used for error messages.
pub fn parse_entries(bytes: &[u8], path: &Path) -> Result<Vec<Entry>, CorpusError> {
    let json_error = |source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    };

    let value: Value = serde_json::from_slice(bytes).map_err(json_error)?;
    let is_rustdoc = matches!(&value, Value::Object(object) if object.contains_key("index"));
    match value {
        Value::Array(_) => serde_json::from_value(value).map_err(json_error),
        Value::Object(_) if is_rustdoc => {
            let krate: Crate = serde_json::from_value(value).map_err(json_error)?;
            tracing::debug!(
                "Parsed rustdoc JSON (format version {}) from {}",
                krate.format_version,
                path.display()
            );
            Ok(entries_from_crate(&krate))
        }
        _ => Err(CorpusError::UnknownFormat {
            path: path.to_path_buf(),
        }),
    }
}
