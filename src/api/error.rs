use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::views;
use crate::db;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error(transparent)]
    Db(#[from] db::Error),
}

impl AppError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound { kind, id } => {
                (StatusCode::NOT_FOUND, Html(views::not_found(kind, &id))).into_response()
            }
            AppError::Db(err) => {
                error!("database error: {err:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "500 Internal Server Error").into_response()
            }
        }
    }
}
