use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::super::domain::{Photo, SelectedFile};

const MEGABYTE: usize = 1024 * 1024;
const DEFAULT_MAX_MB: u64 = 2;
const ALLOWED_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Pixel size reported by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("image could not be decoded: {0}")]
    Unreadable(String),
    #[error("decode worker failed: {0}")]
    Worker(String),
}

/// Host primitive turning raw file bytes into pixel dimensions.
#[async_trait]
pub trait ImageDecoder: Send + Sync {
    async fn dimensions(&self, bytes: Bytes) -> Result<ImageDimensions, DecodeError>;
}

/// Header reader backed by the `image` crate, run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

#[async_trait]
impl ImageDecoder for ImageCrateDecoder {
    async fn dimensions(&self, bytes: Bytes) -> Result<ImageDimensions, DecodeError> {
        tokio::task::spawn_blocking(move || decode_dimensions(&bytes))
            .await
            .map_err(|err| DecodeError::Worker(err.to_string()))?
    }
}

/// Reads only the image header; pixel data is never decoded.
fn decode_dimensions(bytes: &[u8]) -> Result<ImageDimensions, DecodeError> {
    let (width, height) = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| DecodeError::Unreadable(err.to_string()))?
        .into_dimensions()
        .map_err(|err| DecodeError::Unreadable(err.to_string()))?;
    Ok(ImageDimensions::new(width, height))
}

/// Accepted formats, size ceiling, and pixel bounds for uploaded photos.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPolicy {
    allowed_types: &'static [&'static str],
    max_megabytes: u64,
    min: ImageDimensions,
    max: ImageDimensions,
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        Self {
            allowed_types: ALLOWED_TYPES,
            max_megabytes: DEFAULT_MAX_MB,
            min: ImageDimensions::new(512, 512),
            max: ImageDimensions::new(1024, 1024),
        }
    }
}

impl PhotoPolicy {
    pub fn with_max_megabytes(mut self, max_megabytes: u64) -> Self {
        if max_megabytes > 0 {
            self.max_megabytes = max_megabytes;
        }
        self
    }

    pub fn max_bytes(&self) -> usize {
        usize::try_from(self.max_megabytes)
            .unwrap_or(usize::MAX)
            .saturating_mul(MEGABYTE)
    }

    pub fn min(&self) -> ImageDimensions {
        self.min
    }

    pub fn max(&self) -> ImageDimensions {
        self.max
    }

    /// Compare by MIME essence so parameters and casing do not matter.
    pub fn allows_type(&self, content_type: &str) -> bool {
        content_type
            .parse::<mime::Mime>()
            .map(|parsed| self.allowed_types.contains(&parsed.essence_str()))
            .unwrap_or(false)
    }

    /// Value for the file input's `accept` attribute.
    pub fn accept_attribute(&self) -> String {
        self.allowed_types.join(",")
    }

    pub fn hints(&self) -> Vec<String> {
        vec![
            "Akceptowane formaty: .jpg, .png, .webp".to_string(),
            format!(
                "Akceptowane rozmiary: {}-{} px",
                self.min.width, self.max.width
            ),
            format!("Maksymalny rozmiar pliku: {} MB", self.max_megabytes),
        ]
    }

    pub fn type_message(&self) -> String {
        "Tylko pliki JPG, PNG i WebP są dozwolone".to_string()
    }

    pub fn size_message(&self) -> String {
        format!("Plik nie może być większy niż {} MB", self.max_megabytes)
    }

    pub fn min_dimensions_message(&self) -> String {
        format!(
            "Minimalne wymiary zdjęcia to {}x{} px",
            self.min.width, self.min.height
        )
    }

    pub fn max_dimensions_message(&self) -> String {
        format!(
            "Maksymalne wymiary zdjęcia to {}x{} px",
            self.max.width, self.max.height
        )
    }

    pub fn unreadable_message(&self) -> String {
        "Nie można odczytać pliku obrazu".to_string()
    }
}

/// Turns a file selection into the photo state shown for its slot.
pub struct PhotoValidator<D> {
    decoder: Arc<D>,
    policy: PhotoPolicy,
}

impl<D> Clone for PhotoValidator<D> {
    fn clone(&self) -> Self {
        Self {
            decoder: Arc::clone(&self.decoder),
            policy: self.policy.clone(),
        }
    }
}

impl<D> PhotoValidator<D>
where
    D: ImageDecoder + 'static,
{
    pub fn new(decoder: Arc<D>, policy: PhotoPolicy) -> Self {
        Self { decoder, policy }
    }

    pub fn policy(&self) -> &PhotoPolicy {
        &self.policy
    }

    /// Cheap checks run first; only files that pass them are decoded.
    pub async fn validate(&self, file: Option<SelectedFile>) -> Photo {
        let Some(file) = file else {
            return Photo::empty();
        };

        if !self.policy.allows_type(&file.content_type) {
            debug!(name = %file.name, content_type = %file.content_type, "photo type rejected");
            return Photo::rejected(file, self.policy.type_message());
        }

        if file.size() > self.policy.max_bytes() {
            debug!(name = %file.name, size = file.size(), "photo exceeds size ceiling");
            return Photo::rejected(file, self.policy.size_message());
        }

        let dimensions = match self.decoder.dimensions(file.bytes.clone()).await {
            Ok(dimensions) => dimensions,
            Err(err) => {
                debug!(name = %file.name, error = %err, "photo could not be decoded");
                return Photo::rejected(file, self.policy.unreadable_message());
            }
        };

        let ImageDimensions { width, height } = dimensions;
        let min = self.policy.min();
        if width < min.width || height < min.height {
            return Photo::rejected(file, self.policy.min_dimensions_message());
        }

        let max = self.policy.max();
        if width > max.width || height > max.height {
            return Photo::rejected(file, self.policy.max_dimensions_message());
        }

        debug!(name = %file.name, width, height, "photo accepted");
        Photo::accepted(file)
    }
}
