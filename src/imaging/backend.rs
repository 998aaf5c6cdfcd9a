//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the gallery needs
//! from an imaging library: identify (dimensions only) and resize (decode,
//! scale to exact dimensions, encode).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` in this module's test
//! submodule so ordering and rescale logic can run without real files.

use super::params::ResizeParams;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The file could not be opened or decoded (missing, corrupt, truncated,
    /// unsupported variant).
    #[error("Failed to read image {}: {message}", path.display())]
    Read { path: PathBuf, message: String },
    /// The output could not be encoded or written (permissions, missing
    /// directory, unsupported output extension).
    #[error("Failed to write image {}: {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl BackendError {
    pub fn read(path: &Path, message: impl Into<String>) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub fn write(path: &Path, message: impl Into<String>) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero. Such images have no meaningful aspect
    /// ratio and cannot be resized.
    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Trait for image processing backends.
///
/// Each call opens and releases its own file handles; no state is held
/// between calls.
pub trait ImageBackend {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode `params.source`, resize to exactly `params.width` ×
    /// `params.height`, and write to `params.output`, replacing any existing
    /// file.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    ///
    /// Dimensions are looked up by path, so the order in which a caller
    /// identifies images does not matter.
    #[derive(Default)]
    pub struct MockBackend {
        pub dimensions: Mutex<HashMap<PathBuf, Dimensions>>,
        pub fail_writes_to: Mutex<Option<PathBuf>>,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Resize {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u8,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions<P: Into<PathBuf>>(
            entries: impl IntoIterator<Item = (P, (u32, u32))>,
        ) -> Self {
            let map = entries
                .into_iter()
                .map(|(p, (w, h))| (p.into(), Dimensions::new(w, h)))
                .collect();
            Self {
                dimensions: Mutex::new(map),
                ..Self::default()
            }
        }

        /// Make every resize that targets `output` fail with a write error.
        pub fn failing_writes_to(self, output: impl Into<PathBuf>) -> Self {
            *self.fail_writes_to.lock().unwrap() = Some(output.into());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn resize_outputs(&self) -> Vec<String> {
            self.get_operations()
                .into_iter()
                .filter_map(|op| match op {
                    RecordedOp::Resize { output, .. } => Some(output),
                    RecordedOp::Identify(_) => None,
                })
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.dimensions
                .lock()
                .unwrap()
                .get(path)
                .copied()
                .ok_or_else(|| BackendError::read(path, "No mock dimensions"))
        }

        fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
            if self.fail_writes_to.lock().unwrap().as_deref() == Some(params.output.as_path()) {
                return Err(BackendError::write(&params.output, "mock write failure"));
            }
            self.operations.lock().unwrap().push(RecordedOp::Resize {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            Ok(())
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions([("/test/image.jpg", (800, 600))]);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result, Dimensions::new(800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_identify_unknown_path_is_read_error() {
        let backend = MockBackend::new();
        let err = backend.identify(Path::new("/missing.jpg")).unwrap_err();
        assert!(matches!(err, BackendError::Read { path, .. } if path == Path::new("/missing.jpg")));
    }

    #[test]
    fn mock_records_resize() {
        let backend = MockBackend::new();

        backend
            .resize(&ResizeParams {
                source: "/source.jpg".into(),
                output: "/output.jpg".into(),
                width: 800,
                height: 600,
                quality: super::super::params::Quality::new(90),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Resize {
                width: 800,
                height: 600,
                quality: 90,
                ..
            }
        ));
    }

    #[test]
    fn degenerate_dimensions() {
        assert!(Dimensions::new(0, 10).is_degenerate());
        assert!(Dimensions::new(10, 0).is_degenerate());
        assert!(!Dimensions::new(1, 1).is_degenerate());
    }

    #[test]
    fn error_messages_name_the_path() {
        let err = BackendError::read(Path::new("/a/b.jpg"), "truncated");
        assert_eq!(err.to_string(), "Failed to read image /a/b.jpg: truncated");
        let err = BackendError::write(Path::new("/out/b.jpg"), "permission denied");
        assert_eq!(
            err.to_string(),
            "Failed to write image /out/b.jpg: permission denied"
        );
    }
}
