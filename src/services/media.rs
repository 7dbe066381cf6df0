use image::ImageFormat;
use regex::Regex;
use serde::Serialize;
use std::io::Cursor;
use std::sync::LazyLock;
use strum::Display;

static VIDEO_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(mp4|webm)(\?.*)?$").expect("valid regex"));

/// How a result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Video when the URL ends in `.mp4` or `.webm`, optionally followed by
    /// a query string. Case-insensitive.
    pub fn from_url(url: &str) -> Self {
        if VIDEO_URL.is_match(url) {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// Bytes fetched for a download.
#[derive(Debug, Clone)]
pub struct FetchedMedia {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// An image the presenter has finished loading.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Vec<u8>,
    pub natural_width: u32,
    pub natural_height: u32,
    pub complete: bool,
}

impl RenderedImage {
    pub fn is_ready(&self) -> bool {
        self.complete && self.natural_width > 0 && self.natural_height > 0
    }
}

/// File extension for a downloaded result: video (by type or URL) first,
/// then png, then webp, else jpg.
pub fn download_extension(content_type: Option<&str>, url: &str) -> &'static str {
    let content_type = content_type.unwrap_or_default().to_ascii_lowercase();
    let url = url.to_ascii_lowercase();

    if content_type.contains("video") || url.contains(".mp4") || url.contains(".webm") {
        "mp4"
    } else if content_type.contains("png") || url.contains(".png") {
        "png"
    } else if content_type.contains("webp") || url.contains(".webp") {
        "webp"
    } else {
        "jpg"
    }
}

/// Append a `t=<epoch millis>` query parameter so caches are bypassed.
pub fn cache_busted(url: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!(
        "{url}{separator}t={}",
        chrono::Utc::now().timestamp_millis()
    )
}

/// Decode a rendered image and re-encode it as PNG.
pub fn rasterize_png(image: &RenderedImage) -> Result<Vec<u8>, MediaError> {
    if !image.is_ready() {
        return Err(MediaError::NotRendered);
    }

    let decoded = image::load_from_memory(&image.bytes)?;
    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Failed to fetch file: {0}")]
    Status(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Image re-encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Result image is not loaded")]
    NotRendered,

    #[error("Failed to save file: {0}")]
    Io(#[from] std::io::Error),
}
