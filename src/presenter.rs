use std::path::{Path, PathBuf};

use crate::models::session::{ResultMedia, StatusText};
use crate::services::media::RenderedImage;

/// Presentation capabilities the workflow drives. Implementations own the
/// actual rendering surface.
pub trait Presenter {
    fn show_loading(&mut self);

    fn hide_loading(&mut self);

    fn set_status(&mut self, status: &StatusText);

    /// Local preview of the file being uploaded.
    fn show_preview(&mut self, data_url: &str);

    fn render_result(&mut self, media: &ResultMedia);

    fn enable_download(&mut self, url: &str);

    /// Mark the download control busy (`true`) or restore it (`false`).
    fn set_download_busy(&mut self, busy: bool);

    /// Blocking error notification.
    fn show_error(&mut self, message: &str);

    /// Non-error notice to the user.
    fn prompt(&mut self, message: &str);

    /// Save downloaded bytes under `file_name`.
    fn save_file(&mut self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;

    /// Hand a URL to an external viewer.
    fn open_external(&mut self, url: &str);

    /// The currently rendered result image, if one is loaded.
    fn rendered_image(&self) -> Option<RenderedImage>;

    /// Drop preview, result, loading state and download target.
    fn clear(&mut self);
}

/// Presenter for the command-line binary. Notices go to stdout and
/// downloads to a directory.
pub struct TerminalPresenter {
    output_dir: PathBuf,
    download_url: Option<String>,
}

impl TerminalPresenter {
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            download_url: None,
        }
    }

    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }
}

impl Presenter for TerminalPresenter {
    fn show_loading(&mut self) {
        println!("⏳ Working...");
    }

    fn hide_loading(&mut self) {}

    fn set_status(&mut self, status: &StatusText) {
        println!("   [{status}]");
    }

    fn show_preview(&mut self, data_url: &str) {
        tracing::debug!(preview_len = data_url.len(), "Preview ready");
    }

    fn render_result(&mut self, media: &ResultMedia) {
        println!("✅ Result ({}): {}", media.kind, media.url);
    }

    fn enable_download(&mut self, url: &str) {
        self.download_url = Some(url.to_string());
    }

    fn set_download_busy(&mut self, busy: bool) {
        if busy {
            println!("⬇️  Downloading...");
        }
    }

    fn show_error(&mut self, message: &str) {
        eprintln!("❌ Error: {message}");
    }

    fn prompt(&mut self, message: &str) {
        println!("{message}");
    }

    fn save_file(&mut self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        std::fs::write(&path, bytes)?;
        println!("💾 Saved {}", path.display());
        Ok(path)
    }

    fn open_external(&mut self, url: &str) {
        println!("🔗 {url}");
    }

    fn rendered_image(&self) -> Option<RenderedImage> {
        None
    }

    fn clear(&mut self) {
        self.download_url = None;
    }
}
