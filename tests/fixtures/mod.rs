//! Test fixtures: in-memory images and scripted job responses

use effect_studio::models::upload::SourceFile;
use image::{ImageBuffer, ImageFormat, Rgb};
use serde_json::{json, Value};
use std::io::Cursor;

/// JPEG start-of-image marker followed by padding, `size` bytes total.
pub fn jpeg_of_size(name: &str, size: usize) -> SourceFile {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.resize(size, 0x5A);
    SourceFile::new(name, "image/jpeg", bytes)
}

/// A real PNG, small enough to decode quickly.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x * 16) as u8, (y * 16) as u8, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("PNG encoding should succeed");
    out.into_inner()
}

pub fn processing() -> Value {
    json!({ "status": "processing" })
}

pub fn completed_image(url: &str) -> Value {
    json!({ "status": "completed", "result": { "image": url } })
}

pub fn completed_media_list(urls: &[&str]) -> Value {
    let items: Vec<Value> = urls.iter().map(|u| json!({ "mediaUrl": u })).collect();
    json!({ "status": "completed", "result": items })
}

pub fn errored_without_message() -> Value {
    json!({ "status": "error" })
}
