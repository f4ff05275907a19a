//! Unauthenticated guest wizard: one question per step, gated halfway.

pub mod handlers;
pub mod model;

use actix_web::HttpRequest;

use crate::error::ApiError;

pub const GUEST_ID_HEADER: &str = "X-Guest-Id";
const MAX_GUEST_ID_LEN: usize = 128;

/// Read the client-generated guest identifier.
pub fn guest_id(req: &HttpRequest) -> Result<String, ApiError> {
    req.headers()
        .get(GUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| is_valid_guest_id(id))
        .map(str::to_string)
        .ok_or(ApiError::MissingGuestId)
}

fn is_valid_guest_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_GUEST_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
