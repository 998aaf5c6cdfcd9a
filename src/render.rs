//! HTML page generation.
//!
//! Renders the single gallery page linking every written image, in gallery
//! order. Uses [maud](https://maud.lambda.xyz/) for compile-time HTML
//! templating, so titles and filenames are escaped automatically.
//!
//! ## Entries
//!
//! With thumbnails, each entry is a thumbnail linking to its full-size image:
//!
//! ```html
//! <a href="img/a.jpg"><img src="thumbnails/thumb_a.jpg" alt="a"></a>
//! ```
//!
//! Without thumbnails the full-size image is shown directly:
//!
//! ```html
//! <img src="img/a.jpg" alt="a">
//! ```
//!
//! All links are relative to the page, which lives at the output root.
//! Each path segment is percent-encoded, so `party #1.jpg` links as
//! `party%20%231.jpg`. Alt text uses the raw file stem.

use maud::{DOCTYPE, Markup, html};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("{images} images but {thumbnails} thumbnails")]
    LengthMismatch { images: usize, thumbnails: usize },
    #[error("Output has no file name: {}", .0.display())]
    NoFileName(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bytes that cannot appear literally in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

const CSS: &str = "\
body { margin: 0 auto; max-width: 1400px; padding: 1rem; font-family: sans-serif; }
h1 { font-weight: normal; }
.gallery { display: flex; flex-wrap: wrap; gap: 0.5rem; align-items: flex-start; }
.gallery img { display: block; max-width: 100%; height: auto; }
";

/// A set of written files sharing one directory under the output root.
#[derive(Debug, Clone, Copy)]
pub struct Rendition<'a> {
    /// Directory relative to the page, e.g. `img`.
    pub subdir: &'a str,
    pub files: &'a [PathBuf],
}

/// Everything the page needs. `thumbnails`, when present, must pair
/// one-to-one with `images`.
#[derive(Debug, Clone, Copy)]
pub struct GalleryPage<'a> {
    pub title: &'a str,
    pub images: Rendition<'a>,
    pub thumbnails: Option<Rendition<'a>>,
}

struct Entry {
    href: String,
    thumb: Option<String>,
    alt: String,
}

/// Render the gallery page.
pub fn render_gallery(page: &GalleryPage) -> Result<Markup, RenderError> {
    let entries = entries(page)?;

    let content = html! {
        h1 { (page.title) }
        main.gallery {
            @for entry in &entries {
                @match &entry.thumb {
                    Some(thumb) => {
                        a href=(entry.href) {
                            img src=(thumb) alt=(entry.alt) loading="lazy";
                        }
                    }
                    None => {
                        img src=(entry.href) alt=(entry.alt) loading="lazy";
                    }
                }
            }
        }
    };

    Ok(base_document(page.title, content))
}

/// Render the page and write it to `path`, replacing any existing file.
pub fn write_gallery(path: &Path, page: &GalleryPage) -> Result<(), RenderError> {
    let markup = render_gallery(page)?;
    fs::write(path, markup.into_string())?;
    tracing::debug!(path = %path.display(), "wrote page");
    Ok(())
}

fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn entries(page: &GalleryPage) -> Result<Vec<Entry>, RenderError> {
    let images = page.images.files;
    if let Some(thumbs) = &page.thumbnails {
        if thumbs.files.len() != images.len() {
            return Err(RenderError::LengthMismatch {
                images: images.len(),
                thumbnails: thumbs.files.len(),
            });
        }
    }

    images
        .iter()
        .enumerate()
        .map(|(i, image)| -> Result<Entry, RenderError> {
            let thumb = page
                .thumbnails
                .map(|t| relative_href(t.subdir, &t.files[i]))
                .transpose()?;
            Ok(Entry {
                href: relative_href(page.images.subdir, image)?,
                thumb,
                alt: alt_text(image),
            })
        })
        .collect()
}

/// `{subdir}/{filename}`, always joined with `/`, every segment encoded.
fn relative_href(subdir: &str, file: &Path) -> Result<String, RenderError> {
    let name = file
        .file_name()
        .ok_or_else(|| RenderError::NoFileName(file.to_path_buf()))?;
    let name = name.to_string_lossy();

    let mut segments: Vec<String> = subdir
        .split('/')
        .filter(|s| !s.is_empty())
        .map(encode_segment)
        .collect();
    segments.push(encode_segment(&name));
    Ok(segments.join("/"))
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn alt_text(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn page<'a>(images: &'a [PathBuf], thumbs: Option<&'a [PathBuf]>) -> GalleryPage<'a> {
        GalleryPage {
            title: "Web Gallery",
            images: Rendition {
                subdir: "img",
                files: images,
            },
            thumbnails: thumbs.map(|files| Rendition {
                subdir: "thumbnails",
                files,
            }),
        }
    }

    #[test]
    fn document_has_doctype_and_title() {
        let images = paths(&[]);
        let html = render_gallery(&page(&images, None)).unwrap().into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Web Gallery</title>"));
        assert!(html.contains("<h1>Web Gallery</h1>"));
    }

    #[test]
    fn thumbnails_link_to_full_images() {
        let images = paths(&["/out/img/a.jpg", "/out/img/b.png"]);
        let thumbs = paths(&["/out/thumbnails/thumb_a.jpg", "/out/thumbnails/thumb_b.png"]);

        let html = render_gallery(&page(&images, Some(&thumbs)))
            .unwrap()
            .into_string();

        assert!(html.contains(r#"<a href="img/a.jpg"><img src="thumbnails/thumb_a.jpg""#));
        assert!(html.contains(r#"<a href="img/b.png"><img src="thumbnails/thumb_b.png""#));
    }

    #[test]
    fn without_thumbnails_images_are_shown_directly() {
        let images = paths(&["/out/img/a.jpg"]);
        let html = render_gallery(&page(&images, None)).unwrap().into_string();
        assert!(html.contains(r#"<img src="img/a.jpg" alt="a""#));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn entries_follow_input_order() {
        let images = paths(&["/o/img/z.jpg", "/o/img/a.jpg", "/o/img/m.jpg"]);
        let html = render_gallery(&page(&images, None)).unwrap().into_string();

        let z = html.find("img/z.jpg").unwrap();
        let a = html.find("img/a.jpg").unwrap();
        let m = html.find("img/m.jpg").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn title_is_escaped() {
        let images = paths(&[]);
        let gallery = GalleryPage {
            title: "Tom & <Jerry>",
            ..page(&images, None)
        };
        let html = render_gallery(&gallery).unwrap().into_string();
        assert!(html.contains("Tom &amp; &lt;Jerry&gt;"));
    }

    #[test]
    fn filename_is_encoded_in_links_and_escaped_in_alt() {
        let images = paths(&["/o/img/a\"b.jpg"]);
        let html = render_gallery(&page(&images, None)).unwrap().into_string();
        assert!(html.contains(r#"src="img/a%22b.jpg""#));
        assert!(html.contains(r#"alt="a&quot;b""#));
    }

    #[test]
    fn url_special_characters_are_percent_encoded() {
        let images = paths(&["/o/img/party #1.jpg", "/o/img/50% off?.png"]);
        let thumbs = paths(&["/o/thumbnails/thumb_party #1.jpg", "/o/thumbnails/thumb_50% off?.png"]);

        let html = render_gallery(&page(&images, Some(&thumbs)))
            .unwrap()
            .into_string();

        assert!(html.contains(
            r#"<a href="img/party%20%231.jpg"><img src="thumbnails/thumb_party%20%231.jpg""#
        ));
        assert!(html.contains(r#"href="img/50%25%20off%3F.png""#));
        assert!(html.contains(r#"alt="party #1""#));
    }

    #[test]
    fn non_ascii_names_are_utf8_encoded() {
        assert_eq!(
            relative_href("img", Path::new("/x/café.jpg")).unwrap(),
            "img/caf%C3%A9.jpg"
        );
    }

    #[test]
    fn subdir_segments_are_encoded() {
        assert_eq!(
            relative_href("my photos/full", Path::new("/x/a.jpg")).unwrap(),
            "my%20photos/full/a.jpg"
        );
    }

    #[test]
    fn mismatched_thumbnail_count_is_error() {
        let images = paths(&["/o/img/a.jpg", "/o/img/b.jpg"]);
        let thumbs = paths(&["/o/thumbnails/thumb_a.jpg"]);
        let err = render_gallery(&page(&images, Some(&thumbs))).unwrap_err();
        assert!(matches!(
            err,
            RenderError::LengthMismatch {
                images: 2,
                thumbnails: 1
            }
        ));
    }

    #[test]
    fn relative_href_handles_trailing_slash_and_empty_subdir() {
        assert_eq!(
            relative_href("img/", Path::new("/x/a.jpg")).unwrap(),
            "img/a.jpg"
        );
        assert_eq!(relative_href("", Path::new("/x/a.jpg")).unwrap(), "a.jpg");
    }

    #[test]
    fn write_gallery_creates_file() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("index.html");
        let images = paths(&["/o/img/a.jpg"]);

        write_gallery(&out, &page(&images, None)).unwrap();

        let html = fs::read_to_string(&out).unwrap();
        assert!(html.contains("img/a.jpg"));
    }
}
