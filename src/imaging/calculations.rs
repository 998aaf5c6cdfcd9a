//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Greatest common divisor (Euclid). `gcd(0, n) == n`.
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Compute the size an image should be rendered at under a max-width /
/// max-height cap. Downscale only: an image already inside the cap keeps its
/// size.
///
/// When scaling is needed, the axis is picked by comparing the image's own
/// width and height, not by which cap is exceeded. A landscape image is always
/// fitted to `max_width`, a portrait or square one to `max_height`. The
/// derived side is floored, and never drops below 1px.
///
/// # Examples
/// ```
/// # use photo_webpage::imaging::compute_scaled_size;
/// assert_eq!(compute_scaled_size(800, 600, 900, 900), (800, 600));
/// assert_eq!(compute_scaled_size(1800, 1200, 900, 900), (900, 600));
/// assert_eq!(compute_scaled_size(1200, 1800, 900, 900), (600, 900));
/// ```
pub fn compute_scaled_size(
    current_width: u32,
    current_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if current_width <= max_width && current_height <= max_height {
        return (current_width, current_height);
    }

    if current_width > current_height {
        let h = scale_side(max_width, current_height, current_width);
        (max_width, h)
    } else {
        let w = scale_side(max_height, current_width, current_height);
        (w, max_height)
    }
}

/// floor(target * numerator / denominator), widened to avoid overflow.
fn scale_side(target: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = u64::from(target) * u64::from(numerator) / u64::from(denominator);
    (scaled as u32).max(1)
}
