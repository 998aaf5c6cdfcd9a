//! The gallery build pipeline.
//!
//! Wires the stages together for one output directory:
//!
//! ```text
//! 1. Discover   input dirs   →  image paths          (flat, filtered by extension)
//! 2. Order      image paths  →  gallery order        (grouped by aspect ratio)
//! 3. Name       gallery order →  output paths        (img/…, thumbnails/thumb_…)
//! 4. Rescale    source → output, one class at a time (full-size, then thumbnails)
//! 5. Render     output paths →  index.html
//! ```
//!
//! Every output path is derived and checked before the first file is
//! written, so a naming clash never leaves a half-built gallery. After that
//! the build is fail-fast: the first unreadable image or failed write aborts
//! it, and files already written stay on disk.
//!
//! Progress is reported as [`BuildEvent`]s over an optional channel, so the
//! CLI can print while the build runs on the calling thread.

use crate::config::GalleryConfig;
use crate::discovery::{self, DiscoveryError};
use crate::imaging::{ImageBackend, RescaleError, rescale_each};
use crate::naming::{NamingError, derive_output_paths};
use crate::ordering::{self, OrderError};
use crate::render::{self, GalleryPage, RenderError, Rendition};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("Ordering failed: {0}")]
    Order(#[from] OrderError),
    #[error("Output naming failed: {0}")]
    Naming(#[from] NamingError),
    #[error("Rescaling failed: {0}")]
    Rescale(#[from] RescaleError),
    #[error("Page generation failed: {0}")]
    Render(#[from] RenderError),
    #[error("Cannot create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What to build and where.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Directories scanned for images, in this order.
    pub inputs: Vec<PathBuf>,
    /// Output root. Created if missing.
    pub output: PathBuf,
    pub config: GalleryConfig,
}

/// Which rendition an [`BuildEvent::ImageWritten`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageClass {
    Full,
    Thumbnail,
}

/// Progress events emitted by [`build`], in the order they happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Discovered {
        count: usize,
    },
    Ordered {
        count: usize,
    },
    ImageWritten {
        /// 0-based position in gallery order.
        index: usize,
        total: usize,
        class: ImageClass,
        source: PathBuf,
        output: PathBuf,
    },
    PageWritten {
        path: PathBuf,
    },
}

/// Outputs of a successful build, in gallery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub images: Vec<PathBuf>,
    /// Empty when thumbnails are disabled.
    pub thumbnails: Vec<PathBuf>,
    pub page: PathBuf,
}

/// Discover and order the input images without writing anything.
pub fn plan(
    request: &BuildRequest,
    backend: &impl ImageBackend,
) -> Result<Vec<PathBuf>, PipelineError> {
    let found = discovery::discover(&request.inputs, &request.config.discovery.extensions)?;
    tracing::debug!(count = found.len(), "discovered images");
    let ordered = ordering::sort_by_aspect_ratio(backend, &found)?;
    Ok(ordered)
}

/// Run the full build.
pub fn build(
    request: &BuildRequest,
    backend: &impl ImageBackend,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, PipelineError> {
    let config = &request.config;
    let emit = |event: BuildEvent| {
        if let Some(tx) = &events {
            // A closed receiver only means nobody is listening any more.
            tx.send(event).ok();
        }
    };

    let found = discovery::discover(&request.inputs, &config.discovery.extensions)?;
    tracing::debug!(count = found.len(), "discovered images");
    emit(BuildEvent::Discovered { count: found.len() });

    let ordered = ordering::sort_by_aspect_ratio(backend, &found)?;
    emit(BuildEvent::Ordered {
        count: ordered.len(),
    });

    let image_outputs = derive_output_paths(&ordered, &config.images.naming(&request.output))?;
    let thumb_outputs = if config.thumbnails.enabled {
        let thumbs = derive_output_paths(&ordered, &config.thumbnails.naming(&request.output))?;
        reject_cross_collisions(&image_outputs, &thumbs, &ordered)?;
        Some(thumbs)
    } else {
        None
    };

    create_dir(&request.output.join(&config.images.subdir))?;
    tracing::debug!(count = ordered.len(), "writing full-size images");
    rescale_class(
        backend,
        &ordered,
        &image_outputs,
        &config.images.rescale(),
        ImageClass::Full,
        &emit,
    )?;

    if let Some(thumbs) = &thumb_outputs {
        create_dir(&request.output.join(&config.thumbnails.subdir))?;
        tracing::debug!(count = ordered.len(), "writing thumbnails");
        rescale_class(
            backend,
            &ordered,
            thumbs,
            &config.thumbnails.rescale(config.images.quality),
            ImageClass::Thumbnail,
            &emit,
        )?;
    }

    let page_path = request.output.join(&config.page.filename);
    let page = GalleryPage {
        title: &config.page.title,
        images: Rendition {
            subdir: &config.images.subdir,
            files: &image_outputs,
        },
        thumbnails: thumb_outputs.as_deref().map(|files| Rendition {
            subdir: &config.thumbnails.subdir,
            files,
        }),
    };
    render::write_gallery(&page_path, &page)?;
    tracing::debug!(path = %page_path.display(), "wrote gallery page");
    emit(BuildEvent::PageWritten {
        path: page_path.clone(),
    });

    Ok(BuildReport {
        images: image_outputs,
        thumbnails: thumb_outputs.unwrap_or_default(),
        page: page_path,
    })
}

fn rescale_class(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    outputs: &[PathBuf],
    rescale: &crate::imaging::RescaleConfig,
    class: ImageClass,
    emit: &impl Fn(BuildEvent),
) -> Result<(), PipelineError> {
    let total = sources.len();
    rescale_each(backend, sources, outputs, rescale, |index, params| {
        emit(BuildEvent::ImageWritten {
            index,
            total,
            class,
            source: params.source.clone(),
            output: params.output.clone(),
        });
    })?;
    Ok(())
}

/// A thumbnail landing on a full-size output would silently replace it.
fn reject_cross_collisions(
    images: &[PathBuf],
    thumbnails: &[PathBuf],
    sources: &[PathBuf],
) -> Result<(), NamingError> {
    for (i, thumb) in thumbnails.iter().enumerate() {
        if let Some(j) = images.iter().position(|img| img == thumb) {
            return Err(NamingError::Collision {
                first: sources[j].clone(),
                second: sources[i].clone(),
                output: thumb.clone(),
            });
        }
    }
    Ok(())
}

fn create_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).map_err(|source| PipelineError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}
