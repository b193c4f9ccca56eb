use crate::error::{ServiceError, ServiceResult};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Renders a join URL into image bytes. Pure: same URL, same bytes.
pub trait QrRenderer: Send + Sync {
    fn render(&self, url: &str) -> ServiceResult<Vec<u8>>;
}

/// PNG renderer backed by the qrcode crate.
pub struct PngQrRenderer;

impl QrRenderer for PngQrRenderer {
    fn render(&self, url: &str) -> ServiceResult<Vec<u8>> {
        let code = QrCode::new(url).map_err(|e| ServiceError::Qr(e.to_string()))?;
        let image = code.render::<Luma<u8>>().min_dimensions(256, 256).build();

        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageLuma8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| ServiceError::Qr(e.to_string()))?;

        Ok(bytes.into_inner())
    }
}

/// Disk-backed cache of rendered QR images, keyed by queue id. Lazily
/// populated on first fetch, invalidated when the queue is deleted.
pub struct QrCache {
    dir: PathBuf,
    renderer: Box<dyn QrRenderer>,
    lock: Mutex<()>,
}

impl QrCache {
    pub fn new(dir: impl Into<PathBuf>, renderer: Box<dyn QrRenderer>) -> ServiceResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        Ok(QrCache {
            dir,
            renderer,
            lock: Mutex::new(()),
        })
    }

    fn image_path(&self, queue_id: &str) -> PathBuf {
        self.dir.join(format!("{queue_id}.png"))
    }

    /// Returns the cached image for the queue, rendering and persisting it on
    /// the first request.
    pub async fn fetch(&self, queue_id: &str, url: &str) -> ServiceResult<Vec<u8>> {
        let _guard = self.lock.lock().await;

        let path = self.image_path(queue_id);
        if path.exists() {
            return Ok(fs::read(&path)?);
        }

        let bytes = self.renderer.render(url)?;
        fs::write(&path, &bytes)?;

        log::debug!("rendered QR image for queue {queue_id}");
        Ok(bytes)
    }

    /// Drops the cached image, if any.
    pub async fn invalidate(&self, queue_id: &str) -> ServiceResult<()> {
        let _guard = self.lock.lock().await;

        match fs::remove_file(self.image_path(queue_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn is_cached(&self, queue_id: &str) -> bool {
        self.image_path(queue_id).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingRenderer {
        calls: Arc<AtomicUsize>,
    }

    impl QrRenderer for CountingRenderer {
        fn render(&self, url: &str) -> ServiceResult<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(url.as_bytes().to_vec())
        }
    }

    #[tokio::test]
    async fn test_fetch_renders_once_then_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = QrCache::new(
            dir.path().join("qr_cache"),
            Box::new(CountingRenderer { calls: calls.clone() }),
        )
        .unwrap();

        let first = cache.fetch("a1b2c3d4", "http://host/queue/a1b2c3d4").await.unwrap();
        let second = cache.fetch("a1b2c3d4", "http://host/queue/a1b2c3d4").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.is_cached("a1b2c3d4"));
    }

    #[tokio::test]
    async fn test_invalidate_removes_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = QrCache::new(
            dir.path().join("qr_cache"),
            Box::new(CountingRenderer { calls: calls.clone() }),
        )
        .unwrap();

        cache.fetch("a1b2c3d4", "http://host/queue/a1b2c3d4").await.unwrap();
        cache.invalidate("a1b2c3d4").await.unwrap();

        assert!(!cache.is_cached("a1b2c3d4"));
        // Invalidating an absent entry is fine.
        cache.invalidate("a1b2c3d4").await.unwrap();

        cache.fetch("a1b2c3d4", "http://host/queue/a1b2c3d4").await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_png_renderer_emits_png() {
        let bytes = PngQrRenderer.render("http://host/queue/a1b2c3d4").unwrap();

        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
