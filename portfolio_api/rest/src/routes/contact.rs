use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Response,
    routing, Extension, Json, Router,
};
use portfolio_core_contact_contracts::{ContactFeatureService, ContactSendMessageError};
use portfolio_models::client::ClientAddress;
use tracing::{debug, error};

use super::respond;
use crate::models::contact::ApiContactSubmission;

pub const MESSAGE_SENT: &str = "Message sent successfully! I'll get back to you soon.";
pub const MISSING_FIELDS: &str = "All fields are required";
pub const INVALID_EMAIL: &str = "Please provide a valid email address";
pub const TOO_MANY_REQUESTS: &str = "Too many requests. Please try again later.";
pub const SEND_FAILED: &str = "Failed to send message. Please try again later.";
pub const BODY_TOO_LARGE: &str = "Request body too large";

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    Extension(client): Extension<ClientAddress>,
    submission: Result<Json<ApiContactSubmission>, JsonRejection>,
) -> Response {
    let submission = match submission {
        Ok(Json(submission)) => submission,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return respond(StatusCode::PAYLOAD_TOO_LARGE, false, BODY_TOO_LARGE);
        }
        Err(rejection) => {
            // Unreadable bodies are handled like a submission without any fields.
            debug!("invalid contact request body: {rejection}");
            ApiContactSubmission::default()
        }
    };

    match service.send_message(&client, submission.into()).await {
        Ok(()) => respond(StatusCode::OK, true, MESSAGE_SENT),
        Err(ContactSendMessageError::RateLimited) => {
            respond(StatusCode::TOO_MANY_REQUESTS, false, TOO_MANY_REQUESTS)
        }
        Err(ContactSendMessageError::MissingFields) => {
            respond(StatusCode::BAD_REQUEST, false, MISSING_FIELDS)
        }
        Err(ContactSendMessageError::InvalidEmail) => {
            respond(StatusCode::BAD_REQUEST, false, INVALID_EMAIL)
        }
        Err(ContactSendMessageError::Send) => {
            respond(StatusCode::INTERNAL_SERVER_ERROR, false, SEND_FAILED)
        }
        Err(ContactSendMessageError::Other(err)) => {
            error!("Failed to process contact request: {err:#}");
            respond(StatusCode::INTERNAL_SERVER_ERROR, false, SEND_FAILED)
        }
    }
}
