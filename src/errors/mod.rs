//! HTTP-facing error type for the lobby surface (§4.6/§7). Distinct from
//! [`crate::domain::room::RoomError`]: the two never leak into each other
//! directly, translation always happens at the boundary (`routes`).

mod error_code;

pub use error_code::ErrorCode;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::domain::room::RoomError;

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("room not found: {room_id}")]
    RoomNotFound { room_id: String },
    #[error("bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("engine error: {kind}")]
    Engine { kind: &'static str },
    #[error("internal error: {detail}")]
    Internal { detail: String },
    #[error("configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn room_not_found(room_id: impl Into<String>) -> Self {
        Self::RoomNotFound { room_id: room_id.into() }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest { code, detail: detail.into() }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal { detail: detail.into() }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config { detail: detail.into() }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::RoomNotFound { .. } => ErrorCode::RoomNotFound,
            AppError::BadRequest { code, .. } => *code,
            AppError::Engine { .. } => ErrorCode::EngineError,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RoomNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Engine { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RoomError> for AppError {
    fn from(err: RoomError) -> Self {
        AppError::Engine { kind: err.wire_kind() }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let details = ProblemDetails {
            type_: format!("https://bura.internal/errors/{code}"),
            title: humanize(code.as_str()),
            status: status.as_u16(),
            detail: self.to_string(),
            code: code.as_str().to_string(),
        };
        HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/problem+json"))
            .json(details)
    }
}

fn humanize(code: &str) -> String {
    code.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars.map(|c| c.to_ascii_lowercase())).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_error_maps_to_engine_error_with_wire_kind() {
        let app_err: AppError = RoomError::GameAlreadyStarted.into();
        assert_eq!(app_err.code(), ErrorCode::EngineError);
        assert!(app_err.to_string().contains("gameAlreadyStarted"));
    }

    #[test]
    fn humanize_title_cases_words() {
        assert_eq!(humanize("ROOM_NOT_FOUND"), "Room Not Found");
    }
}
