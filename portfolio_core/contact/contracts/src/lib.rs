use std::future::Future;

use portfolio_models::{
    client::ClientAddress,
    contact::{ContactSubmission, ContactValidationError},
};
use thiserror::Error;

pub mod rate_limit;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Relay a contact form submission to the site owner's inbox.
    ///
    /// The submission is only sanitized and validated after the client has
    /// passed the rate limit, so rejected submissions count towards the limit
    /// as well.
    fn send_message(
        &self,
        client: &ClientAddress,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<(), ContactSendMessageError>> + Send;
}

#[derive(Debug, Error)]
pub enum ContactSendMessageError {
    #[error("The client has sent too many requests.")]
    RateLimited,
    #[error("At least one field is empty.")]
    MissingFields,
    #[error("The email address is invalid.")]
    InvalidEmail,
    #[error("Failed to send message.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ContactValidationError> for ContactSendMessageError {
    fn from(value: ContactValidationError) -> Self {
        match value {
            ContactValidationError::MissingFields => Self::MissingFields,
            ContactValidationError::InvalidEmail => Self::InvalidEmail,
        }
    }
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_send_message(
        mut self,
        client: ClientAddress,
        submission: ContactSubmission,
        result: Result<(), ContactSendMessageError>,
    ) -> Self {
        self.expect_send_message()
            .once()
            .with(
                mockall::predicate::eq(client),
                mockall::predicate::eq(submission),
            )
            .return_once(|_, _| Box::pin(std::future::ready(result)));
        self
    }
}
