use base64::Engine;
use image::ImageFormat;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::path::Path;

/// Length of the random token used for uploaded object names.
pub const OBJECT_TOKEN_LEN: usize = 21;

/// Length of the random suffix on downloaded file names.
pub const DOWNLOAD_TOKEN_LEN: usize = 8;

const DEFAULT_EXTENSION: &str = "jpg";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A user-selected file, held in memory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. The media type comes from the extension, or
    /// from the leading bytes when the extension is unknown.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content_type = ImageFormat::from_path(path)
            .or_else(|_| image::guess_format(&bytes))
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| FALLBACK_CONTENT_TYPE.to_string());

        Ok(Self {
            name,
            content_type,
            bytes,
        })
    }

    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    /// Text after the last `.` of the name, or `jpg` when there is none.
    pub fn extension(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext,
            _ => DEFAULT_EXTENSION,
        }
    }

    /// `data:` URL used for the local preview shown while uploading.
    pub fn preview_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Random token over `[A-Za-z0-9]`.
pub fn random_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Storage object name for an upload: `<token>.<extension>`.
pub fn object_name(file: &SourceFile) -> String {
    format!("{}.{}", random_token(OBJECT_TOKEN_LEN), file.extension())
}
