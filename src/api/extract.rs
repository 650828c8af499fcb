use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use super::error::AppError;

/// Integer id taken from the `:id` path segment. Anything that is not an
/// integer cannot name a row, so it is rejected as not found.
#[derive(Debug, Clone, Copy)]
pub(super) struct EntityId(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for EntityId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::not_found("resource", "?"))?;
        parse_id(&raw)
            .map(EntityId)
            .ok_or_else(|| AppError::not_found("resource", raw))
    }
}

/// Unsigned decimal digits only; `str::parse` alone would also take a sign.
fn parse_id(raw: &str) -> Option<i32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
