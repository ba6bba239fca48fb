//! Signed uploads to a Cloudinary-compatible media host.
//!
//! Each upload is a `POST {base_url}/v1_1/{cloud_name}/image/upload`
//! multipart request. Request parameters are signed with the API secret
//! using SHA-256, so the secret itself never leaves the server.

use std::collections::BTreeMap;
use std::time::Duration;

use matcha_core::image::ImageSource;
use matcha_core::media::{MediaError, MediaUploader, UploadedMedia};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Default media host.
pub const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint for the media host.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Base URL without trailing slash.
    pub base_url: String,
    /// Optional destination folder, included in the signature.
    pub folder: Option<String>,
    pub timeout: Duration,
}

impl CloudinaryConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                  | Required | Default                        |
    /// |--------------------------|----------|--------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`  | **yes**  | --                             |
    /// | `CLOUDINARY_API_KEY`     | **yes**  | --                             |
    /// | `CLOUDINARY_API_SECRET`  | **yes**  | --                             |
    /// | `CLOUDINARY_BASE_URL`    | no       | `https://api.cloudinary.com`   |
    /// | `CLOUDINARY_FOLDER`      | no       | --                             |
    /// | `MEDIA_TIMEOUT_SECS`     | no       | `30`                           |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or empty.
    pub fn from_env() -> Self {
        let required = |name: &str| {
            let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
            assert!(!value.is_empty(), "{name} must not be empty");
            value
        };

        let timeout_secs: u64 = std::env::var("MEDIA_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("MEDIA_TIMEOUT_SECS must be a valid u64");

        Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME"),
            api_key: required("CLOUDINARY_API_KEY"),
            api_secret: required("CLOUDINARY_API_SECRET"),
            base_url: std::env::var("CLOUDINARY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
                .trim_end_matches('/')
                .to_string(),
            folder: std::env::var("CLOUDINARY_FOLDER")
                .ok()
                .filter(|f| !f.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name)
    }
}

/// Successful upload response (only the fields we use).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: Option<String>,
}

/// Compute the request signature.
///
/// Parameters are sorted by name, joined as `k=v` pairs with `&`, and the
/// secret is appended before hashing. The digest is lowercase hex.
pub fn sign(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// [`MediaUploader`] backed by a Cloudinary-compatible host.
#[derive(Clone)]
pub struct CloudinaryUploader {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn signed_form(&self, file: reqwest::multipart::Part) -> reqwest::multipart::Form {
        let mut params = BTreeMap::new();
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        if let Some(folder) = &self.config.folder {
            params.insert("folder", folder.clone());
        }
        let signature = sign(&params, &self.config.api_secret);

        let mut form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in params {
            form = form.text(name, value);
        }
        form
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

impl MediaUploader for CloudinaryUploader {
    async fn upload(&self, image: &ImageSource) -> Result<UploadedMedia, MediaError> {
        let (kind, bytes) = image.decode()?;
        let size = bytes.len();

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name(format!("upload.{}", kind.extension()))
            .mime_str(kind.mime())
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let response = self
            .client
            .post(self.config.upload_url())
            .multipart(self.signed_form(file))
            .send()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        let uploaded: UploadResponse = Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| MediaError::Request(e.to_string()))?;

        tracing::debug!(
            url = %uploaded.secure_url,
            size,
            mime = kind.mime(),
            "Image uploaded"
        );

        Ok(UploadedMedia {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        })
    }
}
