//! End-to-end build with the real `image` backend on synthetic photos.

use image::{ImageBuffer, ImageFormat, Rgb};
use photo_webpage::config::GalleryConfig;
use photo_webpage::imaging::RustBackend;
use photo_webpage::pipeline::{self, BuildEvent, BuildRequest, ImageClass};
use std::fs;
use std::path::Path;
use std::sync::mpsc;
use tempfile::TempDir;

fn write_image(path: &Path, width: u32, height: u32, format: ImageFormat) {
    let img = ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 90])
    });
    img.save_with_format(path, format).unwrap();
}

fn dims(path: &Path) -> (u32, u32) {
    image::image_dimensions(path).unwrap()
}

fn fixture() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_image(&tmp.path().join("wide.jpg"), 1600, 900, ImageFormat::Jpeg);
    write_image(&tmp.path().join("tall.JPG"), 600, 1200, ImageFormat::Jpeg);
    write_image(&tmp.path().join("small.png"), 300, 300, ImageFormat::Png);
    fs::write(tmp.path().join("notes.txt"), "not an image").unwrap();
    fs::create_dir(tmp.path().join("nested")).unwrap();
    write_image(
        &tmp.path().join("nested").join("ignored.jpg"),
        50,
        50,
        ImageFormat::Jpeg,
    );
    tmp
}

#[test]
fn builds_complete_gallery() {
    let input = fixture();
    let output = TempDir::new().unwrap();
    let site = output.path().join("webpage");
    let request = BuildRequest {
        inputs: vec![input.path().to_path_buf()],
        output: site.clone(),
        config: GalleryConfig::default(),
    };

    let report = pipeline::build(&request, &RustBackend::new(), None).unwrap();

    // Grouped by the ratio's height component: 1:1, then 1:2, then 16:9.
    assert_eq!(
        report.images,
        vec![
            site.join("img/small.png"),
            site.join("img/tall.JPG"),
            site.join("img/wide.jpg"),
        ]
    );
    assert_eq!(dims(&site.join("img/small.png")), (300, 300));
    assert_eq!(dims(&site.join("img/wide.jpg")), (1000, 562));
    assert_eq!(dims(&site.join("img/tall.JPG")), (500, 1000));

    assert_eq!(dims(&site.join("thumbnails/thumb_small.png")), (300, 300));
    assert_eq!(dims(&site.join("thumbnails/thumb_wide.jpg")), (400, 225));
    assert_eq!(dims(&site.join("thumbnails/thumb_tall.JPG")), (200, 400));

    let html = fs::read_to_string(site.join("index.html")).unwrap();
    assert!(html.contains(r#"<a href="img/small.png"><img src="thumbnails/thumb_small.png""#));
    assert!(!html.contains("ignored.jpg"));
    assert!(!html.contains("notes.txt"));
    let small = html.find("img/small.png").unwrap();
    let tall = html.find("img/tall.JPG").unwrap();
    let wide = html.find("img/wide.jpg").unwrap();
    assert!(small < tall && tall < wide);
}

#[test]
fn sources_are_left_untouched() {
    let input = fixture();
    let output = TempDir::new().unwrap();
    let before = fs::read(input.path().join("wide.jpg")).unwrap();

    let request = BuildRequest {
        inputs: vec![input.path().to_path_buf()],
        output: output.path().to_path_buf(),
        config: GalleryConfig::default(),
    };
    pipeline::build(&request, &RustBackend::new(), None).unwrap();

    assert_eq!(fs::read(input.path().join("wide.jpg")).unwrap(), before);
    assert_eq!(dims(&input.path().join("wide.jpg")), (1600, 900));
}

#[test]
fn output_resolving_onto_source_dir_leaves_photo_intact() {
    let tmp = TempDir::new().unwrap();
    let photos = tmp.path().join("img");
    fs::create_dir(&photos).unwrap();
    let source = photos.join("big.jpg");
    write_image(&source, 2000, 1500, ImageFormat::Jpeg);

    // The output root `img/..` puts the full-size subdir `img` on top of the input.
    let request = BuildRequest {
        inputs: vec![photos.clone()],
        output: photos.join(".."),
        config: GalleryConfig::default(),
    };
    let err = pipeline::build(&request, &RustBackend::new(), None).unwrap_err();

    assert!(err.to_string().contains("output path equals its source"));
    assert_eq!(dims(&source), (2000, 1500));
    assert!(!tmp.path().join("thumbnails").exists());
}

#[test]
fn custom_caps_without_thumbnails() {
    let input = fixture();
    let output = TempDir::new().unwrap();
    let mut config = GalleryConfig::default();
    config.images.max_width = 800;
    config.images.max_height = 800;
    config.thumbnails.enabled = false;
    config.page.title = "Holiday".to_string();

    let request = BuildRequest {
        inputs: vec![input.path().to_path_buf()],
        output: output.path().to_path_buf(),
        config,
    };
    let (tx, rx) = mpsc::channel();
    let report = pipeline::build(&request, &RustBackend::new(), Some(tx)).unwrap();
    let events: Vec<BuildEvent> = rx.iter().collect();

    assert!(report.thumbnails.is_empty());
    assert!(!output.path().join("thumbnails").exists());
    assert_eq!(dims(&output.path().join("img/wide.jpg")), (800, 450));
    assert!(
        events
            .iter()
            .all(|e| !matches!(e, BuildEvent::ImageWritten { class: ImageClass::Thumbnail, .. }))
    );

    let html = fs::read_to_string(&report.page).unwrap();
    assert!(html.contains("<title>Holiday</title>"));
    assert!(html.contains(r#"<img src="img/wide.jpg""#));
}

#[test]
fn corrupt_image_fails_build() {
    let input = fixture();
    fs::write(input.path().join("broken.jpg"), b"not really a jpeg").unwrap();
    let output = TempDir::new().unwrap();

    let request = BuildRequest {
        inputs: vec![input.path().to_path_buf()],
        output: output.path().to_path_buf(),
        config: GalleryConfig::default(),
    };
    let err = pipeline::build(&request, &RustBackend::new(), None).unwrap_err();

    assert!(err.to_string().contains("broken.jpg"));
    assert!(!output.path().join("index.html").exists());
}

#[test]
fn plan_lists_gallery_order() {
    let input = fixture();
    let request = BuildRequest {
        inputs: vec![input.path().to_path_buf()],
        output: input.path().join("unused"),
        config: GalleryConfig::default(),
    };

    let ordered = pipeline::plan(&request, &RustBackend::new()).unwrap();

    let names: Vec<_> = ordered
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["small.png", "tall.JPG", "wide.jpg"]);
    assert!(!input.path().join("unused").exists());
}
