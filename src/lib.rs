//! # Photo Webpage
//!
//! Turns directories of photos into a single static gallery page: resized
//! full-size images, optional thumbnails, and an `index.html` linking them.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! 1. Discover   dirs         →  image paths     (flat listing, extension filter)
//! 2. Order      image paths  →  gallery order   (grouped by reduced aspect ratio)
//! 3. Name       gallery order →  output paths   (checked for clashes up front)
//! 4. Rescale    sources      →  img/, thumbnails/
//! 5. Render     output paths →  index.html
//! ```
//!
//! Each stage is a plain function over paths, so unit tests can exercise the
//! ordering and naming logic with a mock imaging backend and no real files.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discovery`] | Flat directory listing filtered by case-insensitive extension |
//! | [`ordering`] | Two-pass stable sort by aspect ratio components |
//! | [`imaging`] | Size-capped rescaling behind the [`imaging::ImageBackend`] trait |
//! | [`naming`] | Output path derivation (target dir, prefix, suffix, overwrite) |
//! | [`render`] | The gallery HTML page, using Maud |
//! | [`pipeline`] | Runs the stages for one output directory, reporting progress events |
//! | [`config`] | `gallery.toml` loading, validation, and merging over stock defaults |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Aspect-Ratio Grouping
//!
//! A grid that alternates portrait and landscape images looks ragged. Sorting
//! by the reduced ratio puts like shapes next to each other, and because both
//! passes are stable, images of the same shape keep the order they were
//! found in.
//!
//! ## Orientation Picks the Axis
//!
//! Images already within both caps are re-encoded at their own size. Any
//! other image is fitted along the axis its orientation picks: landscape to
//! `max_width`, portrait and square to `max_height`, with the other side
//! following from the aspect ratio. Under the default square caps this never
//! enlarges an image. With unequal caps the derived side can exceed its own
//! cap, and the fitted side can be larger than the source (see
//! [`imaging::compute_scaled_size`]).
//!
//! ## Fail Fast
//!
//! Every error aborts the build: a missing directory, an unreadable image, a
//! failed write. Output names are derived and checked before anything is
//! written, so a naming clash costs nothing.

pub mod config;
pub mod discovery;
pub mod imaging;
pub mod naming;
pub mod ordering;
pub mod output;
pub mod pipeline;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;
