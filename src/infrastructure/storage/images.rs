//! Car image storage
//!
//! `disk` mode writes `<dir>/cars/car-<millis>-<random>.<ext>` and hands out
//! `/uploads/cars/<file>` references; `inline` mode turns the upload into a
//! `data:` URI kept on the car row.

use std::path::{Path, PathBuf};

use base64::Engine;
use rand::Rng;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{UploadMode, UploadsConfig};

/// URL prefix under which disk images are served
pub const PUBLIC_PREFIX: &str = "/uploads/cars/";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Please upload an image file")]
    NotAnImage,

    #[error("Image must be smaller than {max_mb} MB")]
    TooLarge { max_mb: usize },

    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),
}

/// An `image` multipart part, already read into memory
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    mode: UploadMode,
    root: PathBuf,
    max_bytes: usize,
}

impl ImageStore {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            mode: config.mode,
            root: config.dir.clone(),
            max_bytes: config.max_image_bytes,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn cars_dir(&self) -> PathBuf {
        self.root.join("cars")
    }

    /// Create the upload directory tree in disk mode.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        if self.mode == UploadMode::Disk {
            tokio::fs::create_dir_all(self.cars_dir()).await?;
        }
        Ok(())
    }

    /// Check type and size before anything is persisted.
    pub fn check(&self, image: &UploadedImage) -> Result<(), ImageError> {
        if !image.content_type.starts_with("image/") {
            return Err(ImageError::NotAnImage);
        }
        if image.bytes.len() > self.max_bytes {
            return Err(ImageError::TooLarge {
                max_mb: self.max_bytes.div_ceil(1024 * 1024),
            });
        }
        Ok(())
    }

    /// Persist the image and return the reference stored on the car.
    pub async fn store(&self, image: UploadedImage) -> Result<String, ImageError> {
        self.check(&image)?;

        match self.mode {
            UploadMode::Inline => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(&image.bytes);
                Ok(format!("data:{};base64,{}", image.content_type, encoded))
            }
            UploadMode::Disk => {
                let file_name = format!(
                    "car-{}-{}.{}",
                    chrono::Utc::now().timestamp_millis(),
                    rand::thread_rng().gen_range(0..1_000_000_000u32),
                    extension_for(&image)
                );
                tokio::fs::create_dir_all(self.cars_dir()).await?;
                tokio::fs::write(self.cars_dir().join(&file_name), &image.bytes).await?;
                debug!(file = %file_name, size = image.bytes.len(), "Stored car image");
                Ok(format!("{}{}", PUBLIC_PREFIX, file_name))
            }
        }
    }

    /// Delete a previously stored disk image. Inline images, external URLs
    /// and missing files are ignored; failures are only logged.
    pub async fn remove(&self, reference: &str) {
        let Some(file_name) = reference.strip_prefix(PUBLIC_PREFIX) else {
            return;
        };
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.contains("..") {
            warn!(reference, "Refusing to remove suspicious image path");
            return;
        }
        let path = self.cars_dir().join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed car image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove car image"),
        }
    }
}

fn extension_for(image: &UploadedImage) -> String {
    let from_name = image
        .file_name
        .as_deref()
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let from_mime = image
        .content_type
        .strip_prefix("image/")
        .map(|sub| match sub {
            "jpeg" | "pjpeg" => "jpg".to_string(),
            "svg+xml" => "svg".to_string(),
            other => other.to_string(),
        });

    from_name
        .into_iter()
        .chain(from_mime)
        .find(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "img".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root() -> PathBuf {
        std::env::temp_dir().join(format!("car-images-{}", uuid::Uuid::new_v4()))
    }

    fn store(mode: UploadMode, root: PathBuf) -> ImageStore {
        ImageStore::new(&UploadsConfig {
            dir: root,
            max_image_bytes: 16,
            mode,
        })
    }

    fn png(bytes: &[u8]) -> UploadedImage {
        UploadedImage {
            content_type: "image/png".into(),
            file_name: Some("photo.PNG".into()),
            bytes: bytes.to_vec(),
        }
    }

    #[tokio::test]
    async fn disk_mode_writes_and_removes_file() {
        let root = temp_root();
        let images = store(UploadMode::Disk, root.clone());

        let reference = images.store(png(b"abc")).await.unwrap();
        assert!(reference.starts_with("/uploads/cars/car-"));
        assert!(reference.ends_with(".png"));

        let path = root.join("cars").join(reference.trim_start_matches(PUBLIC_PREFIX));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"abc");

        images.remove(&reference).await;
        assert!(!path.exists());
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[tokio::test]
    async fn inline_mode_produces_data_uri() {
        let images = store(UploadMode::Inline, temp_root());
        let reference = images.store(png(b"abc")).await.unwrap();
        assert_eq!(reference, "data:image/png;base64,YWJj");
    }

    #[tokio::test]
    async fn rejects_non_images_and_oversized_files() {
        let images = store(UploadMode::Inline, temp_root());
        let text = UploadedImage {
            content_type: "text/plain".into(),
            file_name: None,
            bytes: b"hi".to_vec(),
        };
        assert!(matches!(images.store(text).await, Err(ImageError::NotAnImage)));
        assert!(matches!(
            images.store(png(&[0u8; 17])).await,
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn extension_falls_back_to_mime_type() {
        let image = UploadedImage {
            content_type: "image/jpeg".into(),
            file_name: None,
            bytes: vec![],
        };
        assert_eq!(extension_for(&image), "jpg");
    }
}
