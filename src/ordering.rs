//! Gallery ordering by aspect ratio.
//!
//! Alternating portrait and landscape images make a gallery grid look
//! ragged. Images are therefore grouped by their reduced aspect ratio
//! (`1920x1080` → `16:9`) before rendering.
//!
//! ## Two stable passes
//!
//! The order is produced by two stable sorts over the same list:
//!
//! 1. by the ratio's `x` (width) component, ascending;
//! 2. by the ratio's `y` (height) component, ascending.
//!
//! Because the second pass is stable, images sharing `y` keep the order the
//! first pass gave them, so the result is grouped by `y` with `x` ascending
//! inside each group, and ties on both components keep discovery order.
//! Keep these as two passes; do not fold them into one comparator.

use crate::imaging::{BackendError, Dimensions, ImageBackend, gcd};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderError {
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error("Image has a zero dimension ({width}x{height}): {}", path.display())]
    DegenerateDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

/// Width:height in lowest terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AspectRatio {
    pub x: u32,
    pub y: u32,
}

impl AspectRatio {
    /// Reduce `width:height` by their greatest common divisor.
    ///
    /// Returns `None` when either side is zero.
    pub fn reduce(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        let g = gcd(width, height);
        Some(Self {
            x: width / g,
            y: height / g,
        })
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.y)
    }
}

/// Per-image data used while sorting. Lives only for one sort call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub aspect_ratio: AspectRatio,
    pub width: u32,
    pub height: u32,
}

impl ImageRecord {
    pub fn new(path: &Path, dims: Dimensions) -> Result<Self, OrderError> {
        let aspect_ratio =
            AspectRatio::reduce(dims.width, dims.height).ok_or_else(|| {
                OrderError::DegenerateDimensions {
                    path: path.to_path_buf(),
                    width: dims.width,
                    height: dims.height,
                }
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            aspect_ratio,
            width: dims.width,
            height: dims.height,
        })
    }
}

/// Reorder records in place: stable by `x`, then stable by `y`.
pub fn order_records(records: &mut [ImageRecord]) {
    records.sort_by_key(|r| r.aspect_ratio.x);
    records.sort_by_key(|r| r.aspect_ratio.y);
}

/// Read every image's dimensions and return `paths` in gallery order.
///
/// The result is a permutation of the input: nothing is dropped, duplicated
/// or added. The first unreadable or zero-sized image aborts the sort.
pub fn sort_by_aspect_ratio<P: AsRef<Path>>(
    backend: &impl ImageBackend,
    paths: &[P],
) -> Result<Vec<PathBuf>, OrderError> {
    let mut records = read_records(backend, paths)?;
    order_records(&mut records);
    Ok(records.into_iter().map(|r| r.path).collect())
}

/// Build the sort records for `paths`, in input order.
pub fn read_records<P: AsRef<Path>>(
    backend: &impl ImageBackend,
    paths: &[P],
) -> Result<Vec<ImageRecord>, OrderError> {
    paths
        .iter()
        .map(|p| -> Result<ImageRecord, OrderError> {
            let path = p.as_ref();
            let dims = backend.identify(path)?;
            let record = ImageRecord::new(path, dims)?;
            tracing::trace!(path = %path.display(), ratio = %record.aspect_ratio, "aspect ratio");
            Ok(record)
        })
        .collect()
}
