//! Output filename derivation.
//!
//! Every rendition (full-size image, thumbnail) is written to a path derived
//! from its source path under an [`OutputNaming`] policy:
//!
//! - `target_dir`: directory outputs go into (default: the source's own)
//! - `prefix`: prepended to the filename (outermost)
//! - `suffix`: inserted right before the extension
//! - `overwrite`: write back onto the source itself
//!
//! ```text
//! /a/img.jpg  + prefix "thumb_"            → /a/thumb_img.jpg
//! /a/img.jpg  + suffix "_small"            → /a/img_small.jpg
//! /a/img.jpg  + both, target_dir "/out"    → /out/thumb_img_small.jpg
//! /a/img.jpg  + overwrite                  → /a/img.jpg
//! ```
//!
//! ## Validation
//!
//! Overwrite excludes every other option, and without overwrite at least one
//! option must be set. A derived path that lands on its own source, or on the
//! same output as another input, is rejected as well. Paths are compared after
//! resolving `..` and symlinks, so `/a/../a` counts as `/a`. All checks run
//! before anything is returned. Nothing here writes to the filesystem; it is
//! only read to resolve existing directories.

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NamingError {
    #[error("overwrite cannot be combined with a target directory, prefix or suffix")]
    OverwriteWithModifiers,
    #[error("no target directory, prefix or suffix set: outputs would replace their sources")]
    Indistinguishable,
    #[error("output path equals its source: {}", .0.display())]
    WouldOverwriteSource(PathBuf),
    #[error("{} and {} both map to {}", first.display(), second.display(), output.display())]
    Collision {
        first: PathBuf,
        second: PathBuf,
        output: PathBuf,
    },
    #[error("input has no file name: {}", .0.display())]
    NoFileName(PathBuf),
}

/// How output paths are derived from input paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputNaming {
    pub target_dir: Option<PathBuf>,
    pub overwrite: bool,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
}

impl OutputNaming {
    /// Write into `dir`, keeping filenames.
    pub fn into_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// Write back onto the sources.
    pub fn overwrite() -> Self {
        Self {
            overwrite: true,
            ..Self::default()
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn validate(&self) -> Result<(), NamingError> {
        let has_modifier =
            self.target_dir.is_some() || self.prefix.is_some() || self.suffix.is_some();
        match (self.overwrite, has_modifier) {
            (true, true) => Err(NamingError::OverwriteWithModifiers),
            (false, false) => Err(NamingError::Indistinguishable),
            _ => Ok(()),
        }
    }

    /// Derive the output path for a single input.
    ///
    /// Does not run [`validate`](Self::validate) or collision checks; use
    /// [`derive_output_paths`] for that.
    pub fn output_for(&self, input: &Path) -> Result<PathBuf, NamingError> {
        if self.overwrite {
            return Ok(input.to_path_buf());
        }

        let filename = self.filename_for(input)?;
        let dir = match &self.target_dir {
            Some(dir) => dir.as_path(),
            None => input.parent().unwrap_or(Path::new("")),
        };
        Ok(dir.join(filename))
    }

    /// `{prefix}{stem}{suffix}.{ext}`, built on `OsString` so non-UTF-8
    /// names survive.
    fn filename_for(&self, input: &Path) -> Result<OsString, NamingError> {
        let stem = input
            .file_stem()
            .ok_or_else(|| NamingError::NoFileName(input.to_path_buf()))?;

        let mut name = OsString::new();
        if let Some(prefix) = &self.prefix {
            name.push(prefix);
        }
        name.push(stem);
        if let Some(suffix) = &self.suffix {
            name.push(suffix);
        }
        if let Some(ext) = input.extension() {
            name.push(".");
            name.push(ext);
        }
        Ok(name)
    }
}

/// Derive one output path per input, in input order.
pub fn derive_output_paths<P: AsRef<Path>>(
    inputs: &[P],
    naming: &OutputNaming,
) -> Result<Vec<PathBuf>, NamingError> {
    naming.validate()?;

    let mut outputs = Vec::with_capacity(inputs.len());
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();

    for input in inputs {
        let input = input.as_ref();
        let output = naming.output_for(input)?;

        if !naming.overwrite {
            let key = comparable(&output);
            if key == comparable(input) {
                return Err(NamingError::WouldOverwriteSource(output));
            }
            if let Some(first) = seen.insert(key, input) {
                return Err(NamingError::Collision {
                    first: first.to_path_buf(),
                    second: input.to_path_buf(),
                    output,
                });
            }
        }

        outputs.push(output);
    }

    Ok(outputs)
}

/// Resolved form of `path` for equality checks.
///
/// The longest prefix that exists on disk is canonicalized, which resolves
/// symlinks and `..` through them. The remaining components, which do not
/// exist yet, have `.` and `..` folded lexically.
fn comparable(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let components: Vec<Component> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        if let Ok(mut resolved) = fs::canonicalize(&prefix) {
            push_normalized(&mut resolved, &components[split..]);
            return resolved;
        }
    }

    let mut resolved = PathBuf::new();
    push_normalized(&mut resolved, &components);
    resolved
}

fn push_normalized(base: &mut PathBuf, components: &[Component]) {
    for component in components {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                base.pop();
            }
            other => base.push(other.as_os_str()),
        }
    }
}
