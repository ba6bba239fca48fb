//! Image payloads accepted for profile pictures.
//!
//! An image arrives either as a base64 data URL
//! (`data:image/<type>;base64,<payload>`) or as raw bytes with a declared
//! content type (multipart upload, file picker). Both forms are checked the
//! same way: accepted type, at most [`MAX_IMAGE_BYTES`] once decoded, and
//! leading bytes that really are an image of the declared type.

use std::sync::LazyLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Largest accepted image, after base64 decoding (5 MiB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted MIME types.
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

static DATA_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^data:image/(jpeg|png|gif|webp);base64,").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Image kinds
// ---------------------------------------------------------------------------

/// The image encodings the platform accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    /// Identify the encoding from the leading magic bytes.
    fn sniff(bytes: &[u8]) -> Option<Self> {
        match image::guess_format(bytes).ok()? {
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::WebP => Some(Self::Webp),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("this field is required")]
    Empty,

    #[error("Only .jpg, .jpeg, .png, .gif and .webp formats are supported")]
    UnsupportedType,

    #[error("Invalid image format")]
    InvalidEncoding,

    #[error("Max file size is 5MB")]
    TooLarge { size: usize },
}

// ---------------------------------------------------------------------------
// ImageSource
// ---------------------------------------------------------------------------

/// A single image as submitted by a client.
///
/// Serializes to (and deserializes from) a plain string: binary images are
/// re-encoded as data URLs so JSON clients see one representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    DataUrl(String),
    Binary { content_type: String, bytes: Vec<u8> },
}

impl Default for ImageSource {
    fn default() -> Self {
        Self::DataUrl(String::new())
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        Self::DataUrl(value)
    }
}

impl From<ImageSource> for String {
    fn from(value: ImageSource) -> Self {
        value.to_data_url()
    }
}

impl ImageSource {
    pub fn binary(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Binary {
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Whether nothing was provided at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::DataUrl(url) => url.trim().is_empty(),
            Self::Binary { bytes, .. } => bytes.is_empty(),
        }
    }

    /// Render as a data URL. Data URLs are returned unchanged.
    pub fn to_data_url(&self) -> String {
        match self {
            Self::DataUrl(url) => url.clone(),
            Self::Binary {
                content_type,
                bytes,
            } => format!("data:{content_type};base64,{}", STANDARD.encode(bytes)),
        }
    }

    /// Check type, size and content, returning the detected kind.
    pub fn validate(&self) -> Result<ImageKind, ImageError> {
        self.decode().map(|(kind, _)| kind)
    }

    /// Decode to raw bytes, applying every acceptance rule.
    pub fn decode(&self) -> Result<(ImageKind, Vec<u8>), ImageError> {
        if self.is_empty() {
            return Err(ImageError::Empty);
        }

        let (declared, bytes) = match self {
            Self::DataUrl(url) => {
                let caps = DATA_URL_RE
                    .captures(url)
                    .ok_or(ImageError::InvalidEncoding)?;
                let declared = ImageKind::from_mime(&format!("image/{}", &caps[1]))
                    .ok_or(ImageError::UnsupportedType)?;
                let payload = &url[caps.get(0).map_or(0, |m| m.end())..];

                // Reject oversized payloads before paying for the decode.
                let estimated = payload.len() / 4 * 3;
                if estimated > MAX_IMAGE_BYTES + 3 {
                    return Err(ImageError::TooLarge { size: estimated });
                }
                let bytes = STANDARD
                    .decode(payload.trim_end())
                    .map_err(|_| ImageError::InvalidEncoding)?;
                (declared, bytes)
            }
            Self::Binary {
                content_type,
                bytes,
            } => {
                let declared =
                    ImageKind::from_mime(content_type).ok_or(ImageError::UnsupportedType)?;
                (declared, bytes.clone())
            }
        };

        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(ImageError::TooLarge { size: bytes.len() });
        }
        match ImageKind::sniff(&bytes) {
            Some(kind) if kind == declared => Ok((kind, bytes)),
            _ => Err(ImageError::InvalidEncoding),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    fn png_url() -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(PNG_MAGIC))
    }

    #[test]
    fn png_data_url_is_accepted() {
        let image = ImageSource::DataUrl(png_url());
        assert_eq!(image.validate(), Ok(ImageKind::Png));
    }

    #[test]
    fn binary_jpeg_is_accepted() {
        let image = ImageSource::binary("image/jpeg", JPEG_MAGIC.to_vec());
        assert_eq!(image.validate(), Ok(ImageKind::Jpeg));
    }

    #[test]
    fn empty_sources_report_required() {
        assert_eq!(ImageSource::default().validate(), Err(ImageError::Empty));
        assert_eq!(
            ImageSource::binary("image/png", vec![]).validate(),
            Err(ImageError::Empty)
        );
    }

    #[test]
    fn non_image_data_url_is_rejected() {
        let image = ImageSource::DataUrl("data:text/plain;base64,aGVsbG8=".into());
        assert_eq!(image.validate(), Err(ImageError::InvalidEncoding));
    }

    #[test]
    fn unsupported_binary_type_is_rejected() {
        let image = ImageSource::binary("image/bmp", PNG_MAGIC.to_vec());
        assert_eq!(image.validate(), Err(ImageError::UnsupportedType));
    }

    #[test]
    fn declared_type_must_match_content() {
        let url = format!("data:image/jpeg;base64,{}", STANDARD.encode(PNG_MAGIC));
        assert_eq!(
            ImageSource::DataUrl(url).validate(),
            Err(ImageError::InvalidEncoding)
        );
    }

    #[test]
    fn oversized_binary_is_rejected() {
        let mut bytes = PNG_MAGIC.to_vec();
        bytes.resize(MAX_IMAGE_BYTES + 1, 0);
        let image = ImageSource::binary("image/png", bytes);
        assert!(matches!(image.validate(), Err(ImageError::TooLarge { .. })));
    }

    #[test]
    fn binary_renders_as_data_url() {
        let image = ImageSource::binary("image/png", PNG_MAGIC.to_vec());
        assert_eq!(image.to_data_url(), png_url());
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(json, serde_json::Value::String(png_url()));
    }

    #[test]
    fn deserializes_from_string() {
        let image: ImageSource = serde_json::from_str(&format!("\"{}\"", png_url())).unwrap();
        assert_eq!(image, ImageSource::DataUrl(png_url()));
    }

    #[test]
    fn kind_extensions() {
        assert_eq!(ImageKind::Jpeg.extension(), "jpg");
        assert_eq!(ImageKind::from_mime("image/webp"), Some(ImageKind::Webp));
        assert_eq!(ImageKind::from_mime("image/jpg"), None);
    }
}
