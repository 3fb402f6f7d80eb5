//! File storage for uploaded car images

mod images;

pub use images::{ImageError, ImageStore, UploadedImage, PUBLIC_PREFIX};
