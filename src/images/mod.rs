use image::imageops::FilterType;
use log::{debug, warn};
use thiserror::Error;

use crate::networking::{self, FetchError, Transport};

pub const PLACEHOLDER_RGB: [u8; 3] = [50, 50, 50];

/// Fixed on-screen dimensions an image is resized to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const COVER: ImageSize = ImageSize::new(200, 300);
    pub const BANNER: ImageSize = ImageSize::new(600, 338);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("no image location")]
    Missing,

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("image decoding task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// RGBA pixels of exactly the requested size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedImage {
    pub size: ImageSize,
    pub rgba: Vec<u8>,
    pub placeholder: bool,
}

impl ResolvedImage {
    /// Solid dark tile used whenever the real image cannot be shown.
    pub fn placeholder(size: ImageSize) -> Self {
        let [r, g, b] = PLACEHOLDER_RGB;
        let rgba = [r, g, b, 255].repeat(size.pixel_count());
        Self {
            size,
            rgba,
            placeholder: true,
        }
    }
}

/// Fetch, decode and resize an image, degrading to a placeholder on any failure.
pub async fn resolve_image<T: Transport>(
    transport: &T,
    location: Option<&str>,
    size: ImageSize,
) -> ResolvedImage {
    match try_resolve(transport, location, size).await {
        Ok(image) => image,
        Err(ImageError::Missing) => ResolvedImage::placeholder(size),
        Err(err) => {
            warn!(
                "image {}: using placeholder ({err})",
                location.unwrap_or_default()
            );
            ResolvedImage::placeholder(size)
        }
    }
}

async fn try_resolve<T: Transport>(
    transport: &T,
    location: Option<&str>,
    size: ImageSize,
) -> Result<ResolvedImage, ImageError> {
    let location = location
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(ImageError::Missing)?;
    let bytes = networking::read_location(transport, location).await?;
    debug!("image {location}: {} bytes fetched", bytes.len());
    let image = tokio::task::spawn_blocking(move || decode_resized(&bytes, size)).await??;
    Ok(image)
}

fn decode_resized(bytes: &[u8], size: ImageSize) -> Result<ResolvedImage, ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let resized = decoded.resize_exact(size.width, size.height, FilterType::Triangle);
    Ok(ResolvedImage {
        size,
        rgba: resized.to_rgba8().into_raw(),
        placeholder: false,
    })
}
