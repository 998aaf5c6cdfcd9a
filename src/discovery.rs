//! Image discovery.
//!
//! Lists the image files directly inside one or more directories. Discovery
//! is deliberately flat: subdirectories are skipped, not descended into.
//!
//! ## Filtering
//!
//! An entry is kept when it is a regular file whose extension, uppercased,
//! is in the caller's [`ExtensionSet`]:
//!
//! ```text
//! photos/
//! ├── a.png        kept with {PNG}
//! ├── b.JPG        kept with {JPG}
//! ├── c            never kept (no extension)
//! ├── notes.txt    dropped
//! └── raw/         dropped (directory)
//! ```
//!
//! ## Ordering
//!
//! Within one directory, entries keep the order the filesystem lists them in
//! (not sorted). Directories are concatenated in the order given.
//! [`ordering`](crate::ordering) is responsible for the gallery order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted when no configuration overrides them.
pub const DEFAULT_EXTENSIONS: &[&str] = &["JPG", "JPEG", "PNG"];

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Cannot read directory {}: {source}", path.display())]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DiscoveryError {
    fn access(path: &Path, source: io::Error) -> Self {
        Self::DirectoryAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Set of accepted file extensions, stored uppercase without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    pub fn new<S: AsRef<str>>(extensions: impl IntoIterator<Item = S>) -> Self {
        Self(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_uppercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    /// Whether `extension` (any case, no dot) is accepted.
    pub fn accepts(&self, extension: &str) -> bool {
        !extension.is_empty() && self.0.contains(&extension.to_uppercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

impl From<Vec<String>> for ExtensionSet {
    fn from(v: Vec<String>) -> Self {
        Self::new(v)
    }
}

impl From<ExtensionSet> for Vec<String> {
    fn from(set: ExtensionSet) -> Self {
        set.0.into_iter().collect()
    }
}

/// Find image files directly inside each of `directories`.
///
/// Returns absolute paths. The files existed when they were listed; nothing
/// guarantees they still do when the caller reads them.
pub fn discover<P: AsRef<Path>>(
    directories: &[P],
    extensions: &ExtensionSet,
) -> Result<Vec<PathBuf>, DiscoveryError> {
    let mut images = Vec::new();
    for dir in directories {
        let found = discover_in(dir.as_ref(), extensions)?;
        tracing::debug!(dir = %dir.as_ref().display(), count = found.len(), "listed directory");
        images.extend(found);
    }
    Ok(images)
}

fn discover_in(dir: &Path, extensions: &ExtensionSet) -> Result<Vec<PathBuf>, DiscoveryError> {
    let dir = std::path::absolute(dir).map_err(|e| DiscoveryError::access(dir, e))?;
    let entries = fs::read_dir(&dir).map_err(|e| DiscoveryError::access(&dir, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DiscoveryError::access(&dir, e))?.path();
        if path.is_file() && has_accepted_extension(&path, extensions) {
            images.push(path);
        }
    }
    Ok(images)
}

fn has_accepted_extension(path: &Path, extensions: &ExtensionSet) -> bool {
    path.extension()
        .map(|e| extensions.accepts(&e.to_string_lossy()))
        .unwrap_or(false)
}
