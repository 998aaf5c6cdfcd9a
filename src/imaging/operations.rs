//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::compute_scaled_size;
use super::params::{Quality, ResizeParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RescaleError {
    #[error("{inputs} input paths but {outputs} output paths")]
    LengthMismatch { inputs: usize, outputs: usize },
    #[error("Image has a zero dimension ({width}x{height}): {}", path.display())]
    DegenerateDimensions {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error(transparent)]
    Imaging(#[from] BackendError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, RescaleError>;

/// Size cap and encoding settings for one output class (full-size images or
/// thumbnails).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RescaleConfig {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: Quality,
}

impl RescaleConfig {
    pub fn new(max_width: u32, max_height: u32) -> Self {
        Self {
            max_width,
            max_height,
            quality: Quality::default(),
        }
    }
}

/// Plan a single rescale without executing it.
pub fn plan_rescale(
    source: &Path,
    output: &Path,
    original: Dimensions,
    config: &RescaleConfig,
) -> ResizeParams {
    let (width, height) = compute_scaled_size(
        original.width,
        original.height,
        config.max_width,
        config.max_height,
    );
    ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
        quality: config.quality,
    }
}

/// Resize every `inputs[i]` into `outputs[i]` under the configured cap.
///
/// Fails with [`RescaleError::LengthMismatch`] before touching any file when
/// the lists differ in length. Otherwise images are processed in order and
/// the batch stops at the first failure; files already written stay written.
pub fn rescale_and_save<I, O>(
    backend: &impl ImageBackend,
    inputs: &[I],
    outputs: &[O],
    config: &RescaleConfig,
) -> Result<()>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    rescale_each(backend, inputs, outputs, config, |_, _| {})
}

/// Like [`rescale_and_save`], calling `on_written(index, params)` after each
/// successful write.
pub fn rescale_each<I, O>(
    backend: &impl ImageBackend,
    inputs: &[I],
    outputs: &[O],
    config: &RescaleConfig,
    mut on_written: impl FnMut(usize, &ResizeParams),
) -> Result<()>
where
    I: AsRef<Path>,
    O: AsRef<Path>,
{
    if inputs.len() != outputs.len() {
        return Err(RescaleError::LengthMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }

    for (index, (input, output)) in inputs.iter().zip(outputs).enumerate() {
        let source = input.as_ref();
        let original = backend.identify(source)?;
        if original.is_degenerate() {
            return Err(RescaleError::DegenerateDimensions {
                path: source.to_path_buf(),
                width: original.width,
                height: original.height,
            });
        }

        let params = plan_rescale(source, output.as_ref(), original, config);
        tracing::debug!(
            source = %source.display(),
            output = %params.output.display(),
            from = %format!("{}x{}", original.width, original.height),
            to = %format!("{}x{}", params.width, params.height),
            "rescaling"
        );
        backend.resize(&params)?;
        on_written(index, &params);
    }

    Ok(())
}
