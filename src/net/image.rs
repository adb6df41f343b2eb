//! Background image fetcher.
//!
//! Downloads (or reads from disk) gallery images on the rayon pool and
//! decodes them into RGBA pixel buffers ready for egui texture creation.
//! A failed image stays failed: its slide keeps the loading placeholder.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc;

use url::Url;

use crate::error::ImageError;

/// Decoded image data (RGBA).
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Where a requested image is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unrequested,
    Pending,
    Loaded,
    Failed,
}

/// Manages background image fetching and decoding.
pub struct ImageLoader {
    pending: HashMap<String, mpsc::Receiver<Result<ImageData, ImageError>>>,
    loaded: HashMap<String, ImageData>,
    failed: HashSet<String>,
    max_width: u32,
}

impl ImageLoader {
    /// `max_width` caps decoded width; larger images are downscaled.
    pub fn new(max_width: u32) -> Self {
        Self {
            pending: HashMap::new(),
            loaded: HashMap::new(),
            failed: HashSet::new(),
            max_width: max_width.max(1),
        }
    }

    /// Request an image to be fetched in the background.
    pub fn request(&mut self, url: &str) {
        if self.state(url) != LoadState::Unrequested {
            return;
        }

        let (tx, rx) = mpsc::channel();
        let url_owned = url.to_string();
        let max_width = self.max_width;

        rayon::spawn(move || {
            let _ = tx.send(fetch_and_decode(&url_owned, max_width));
        });

        self.pending.insert(url.to_string(), rx);
    }

    /// Poll for completed downloads. Call every frame.
    /// Returns the number of images that finished this call.
    pub fn poll(&mut self) -> usize {
        let mut completed = Vec::new();
        for (url, rx) in &self.pending {
            match rx.try_recv() {
                Ok(Ok(data)) => {
                    log::debug!("image loaded {} ({}x{})", url, data.width, data.height);
                    self.loaded.insert(url.clone(), data);
                    completed.push(url.clone());
                }
                Ok(Err(e)) => {
                    log::warn!("image failed {}: {}", url, e);
                    self.failed.insert(url.clone());
                    completed.push(url.clone());
                }
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::warn!("image worker dropped {}", url);
                    self.failed.insert(url.clone());
                    completed.push(url.clone());
                }
                Err(mpsc::TryRecvError::Empty) => {}
            }
        }
        for url in &completed {
            self.pending.remove(url);
        }
        completed.len()
    }

    pub fn state(&self, url: &str) -> LoadState {
        if self.loaded.contains_key(url) {
            LoadState::Loaded
        } else if self.pending.contains_key(url) {
            LoadState::Pending
        } else if self.failed.contains(url) {
            LoadState::Failed
        } else {
            LoadState::Unrequested
        }
    }

    /// Get a loaded image's data.
    pub fn get(&self, url: &str) -> Option<&ImageData> {
        self.loaded.get(url)
    }

    /// Get all loaded image URLs.
    pub fn loaded_urls(&self) -> Vec<String> {
        self.loaded.keys().cloned().collect()
    }

    /// Number of successfully loaded images.
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Number of images still being fetched.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Forget everything, e.g. when a new page is loaded.
    /// In-flight workers finish into dropped channels.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.loaded.clear();
        self.failed.clear();
    }
}

fn fetch_and_decode(url: &str, max_width: u32) -> Result<ImageData, ImageError> {
    let bytes = read_bytes(url)?;
    let img = image::load_from_memory(&bytes)?;
    let rgba = img.to_rgba8();
    let (w, h) = rgba.dimensions();

    let (w, h, pixels) = if w > max_width {
        let ratio = max_width as f32 / w as f32;
        let new_h = ((h as f32 * ratio) as u32).max(1);
        let resized = image::imageops::resize(
            &rgba,
            max_width,
            new_h,
            image::imageops::FilterType::Triangle,
        );
        let (rw, rh) = resized.dimensions();
        (rw, rh, resized.into_raw())
    } else {
        (w, h, rgba.into_raw())
    };

    Ok(ImageData {
        width: w,
        height: h,
        rgba: pixels,
    })
}

fn read_bytes(url: &str) -> Result<Vec<u8>, ImageError> {
    let parsed = Url::parse(url).map_err(|_| ImageError::Unsupported(url.to_string()))?;
    match parsed.scheme() {
        "file" => {
            let path = parsed
                .to_file_path()
                .map_err(|_| ImageError::Unsupported(url.to_string()))?;
            std::fs::read(&path).map_err(|source| ImageError::Io { path, source })
        }
        "http" | "https" => {
            let resp = reqwest::blocking::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?
                .get(parsed.as_str())
                .send()?;

            if !resp.status().is_success() {
                return Err(ImageError::Status(resp.status().as_u16()));
            }
            Ok(resp.bytes()?.to_vec())
        }
        _ => Err(ImageError::Unsupported(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn wait_settled(loader: &mut ImageLoader) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while loader.pending_count() > 0 && Instant::now() < deadline {
            loader.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn loader_deduplicates() {
        let mut loader = ImageLoader::new(800);
        loader.request("file:///no/such/image.png");
        loader.request("file:///no/such/image.png");
        assert_eq!(loader.pending.len(), 1);
    }

    #[test]
    fn decodes_and_downscales_local_png() {
        let path = std::env::temp_dir().join(format!("scroll-ribbon-img-{}.png", std::process::id()));
        image::RgbaImage::from_pixel(64, 32, image::Rgba([200, 10, 10, 255]))
            .save(&path)
            .unwrap();
        let url = Url::from_file_path(&path).unwrap().to_string();

        let mut loader = ImageLoader::new(16);
        loader.request(&url);
        assert_eq!(loader.state(&url), LoadState::Pending);
        wait_settled(&mut loader);

        assert_eq!(loader.state(&url), LoadState::Loaded);
        let data = loader.get(&url).unwrap();
        assert_eq!((data.width, data.height), (16, 8));
        assert_eq!(data.rgba.len(), 16 * 8 * 4);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn failed_image_stays_failed() {
        let url = "file:///no/such/dir/missing.png";
        let mut loader = ImageLoader::new(800);
        loader.request(url);
        wait_settled(&mut loader);
        assert_eq!(loader.state(url), LoadState::Failed);

        // A failed source is never retried.
        loader.request(url);
        assert_eq!(loader.state(url), LoadState::Failed);
        assert_eq!(loader.failed_count(), 1);
    }

    #[test]
    fn unsupported_scheme_fails() {
        assert!(matches!(
            read_bytes("ftp://example.com/a.png"),
            Err(ImageError::Unsupported(_))
        ));
    }
}
