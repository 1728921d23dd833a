use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;

pub mod contact;
pub mod health;

pub fn internal_server_error(err: impl Into<anyhow::Error>) -> Response {
    let err = err.into();
    tracing::error!("internal server error: {err:#}");
    respond(StatusCode::INTERNAL_SERVER_ERROR, false, "Internal server error")
}

fn respond(code: StatusCode, success: bool, message: &'static str) -> Response {
    (code, Json(ApiResponse { success, message })).into_response()
}
