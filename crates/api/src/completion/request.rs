//! Body extractor for `POST /profile/complete`.
//!
//! Accepts either `application/json` (images as data URLs) or
//! `multipart/form-data` (images as file parts, repeated `pictures` and
//! `interests` fields). Both produce the same [`CompletionPayload`].

use std::net::{IpAddr, SocketAddr};

use axum::extract::connect_info::ConnectInfo;
use axum::extract::multipart::Field as MultipartField;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::Json;
use matcha_core::completion::CompletionPayload;
use matcha_core::image::ImageSource;

use crate::error::AppError;
use crate::state::AppState;

/// A parsed completion body plus the caller's address.
#[derive(Debug)]
pub struct CompletionRequest {
    pub payload: CompletionPayload,
    /// First `x-forwarded-for` hop, else the peer address when known.
    pub client_ip: Option<IpAddr>,
}

impl FromRequest<AppState> for CompletionRequest {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let client_ip = forwarded_ip(req.headers()).or_else(|| {
            req.extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        });

        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        let payload = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await?
        } else {
            let Json(payload) = Json::<CompletionPayload>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            payload
        };

        Ok(Self { payload, client_ip })
    }
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

async fn read_multipart(mut multipart: Multipart) -> Result<CompletionPayload, AppError> {
    let mut payload = CompletionPayload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().trim_end_matches("[]").to_string();
        match name.as_str() {
            "profile_picture" => payload.profile_picture = Some(read_image(field).await?),
            "pictures" => payload
                .pictures
                .get_or_insert_with(Vec::new)
                .push(read_image(field).await?),
            "interests" => payload
                .interests
                .get_or_insert_with(Vec::new)
                .push(read_text(field).await?),
            "biography" => payload.biography = Some(read_text(field).await?),
            "preferences" => payload.preferences = Some(read_text(field).await?),
            "city" => payload.city = Some(read_text(field).await?),
            "country" => payload.country = Some(read_text(field).await?),
            "latitude" => payload.latitude = read_number(field, "latitude").await?,
            "longitude" => payload.longitude = read_number(field, "longitude").await?,
            _ => {}
        }
    }

    Ok(payload)
}

async fn read_text(field: MultipartField<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))
}

async fn read_number(field: MultipartField<'_>, name: &str) -> Result<Option<f64>, AppError> {
    let text = read_text(field).await?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse()
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("{name} must be a number")))
}

/// A file part becomes a binary image; a plain text part is taken as a
/// data URL.
async fn read_image(field: MultipartField<'_>) -> Result<ImageSource, AppError> {
    let is_file = field.file_name().is_some();
    let content_type = match field.content_type() {
        Some(ct) if ct != "text/plain" => Some(ct.to_string()),
        None if is_file => Some("application/octet-stream".to_string()),
        _ => None,
    };

    match content_type {
        Some(content_type) => {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            Ok(ImageSource::binary(content_type, bytes.to_vec()))
        }
        None => Ok(ImageSource::DataUrl(read_text(field).await?)),
    }
}
