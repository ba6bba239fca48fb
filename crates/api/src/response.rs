//! Shared response envelope types for API handlers.
//!
//! Read endpoints use a `{ "data": ... }` envelope. Write endpoints answer
//! with `{ "success": true, "message": ... }`; failures from every endpoint
//! carry `"success": false` (see [`crate::error::AppError`]).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "success": true, "message": ... }` acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
