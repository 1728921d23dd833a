use std::sync::Arc;

use portfolio_core_contact_contracts::{
    rate_limit::ContactRateLimitService, ContactFeatureService, ContactSendMessageError,
};
use portfolio_di::Build;
use portfolio_email_contracts::{Email, EmailBody, EmailService};
use portfolio_models::{
    client::ClientAddress,
    contact::{ContactMessage, ContactSubmission},
    email_address::EmailAddressWithName,
};
use portfolio_templates_contracts::{ContactTemplate, TemplateService};
use portfolio_utils::trace_instrument;
use tracing::{debug, error, info};

pub mod rate_limit;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Build)]
pub struct ContactFeatureServiceImpl<Templates, EmailS, RateLimit> {
    template: Templates,
    email: EmailS,
    rate_limit: RateLimit,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Inbox that receives all contact messages.
    pub recipient: Arc<EmailAddressWithName>,
    pub subject_prefix: Arc<str>,
}

impl<Templates, EmailS, RateLimit> ContactFeatureService
    for ContactFeatureServiceImpl<Templates, EmailS, RateLimit>
where
    Templates: TemplateService,
    EmailS: EmailService,
    RateLimit: ContactRateLimitService,
{
    #[trace_instrument(skip(self, submission))]
    async fn send_message(
        &self,
        client: &ClientAddress,
        submission: ContactSubmission,
    ) -> Result<(), ContactSendMessageError> {
        if !self.rate_limit.check_and_record(client).await? {
            debug!("rate limit exceeded");
            return Err(ContactSendMessageError::RateLimited);
        }

        let message = submission.into_message().inspect_err(|err| debug!("{err}"))?;
        let email = self.make_email(message)?;

        match self.email.send(email).await {
            Ok(true) => {
                info!("contact message sent");
                Ok(())
            }
            Ok(false) => {
                error!("The smtp server rejected the contact message");
                Err(ContactSendMessageError::Send)
            }
            Err(err) => {
                error!("Failed to send contact message: {err:#}");
                Err(ContactSendMessageError::Send)
            }
        }
    }
}

impl<Templates, EmailS, RateLimit> ContactFeatureServiceImpl<Templates, EmailS, RateLimit>
where
    Templates: TemplateService,
{
    fn make_email(&self, message: ContactMessage) -> anyhow::Result<Email> {
        let ContactMessage {
            author,
            subject,
            content,
        } = message;
        let subject = subject.into_inner();

        let rendered = self.template.render(&ContactTemplate {
            name: author.name.into_inner(),
            email: author.email.as_str().into(),
            subject: subject.clone(),
            message: content.into_inner(),
        })?;

        Ok(Email {
            recipient: (*self.config.recipient).clone(),
            subject: format!("{}{subject}", self.config.subject_prefix),
            body: EmailBody::Alternative {
                text: rendered.text,
                html: rendered.html,
            },
            reply_to: Some(author.email.into()),
        })
    }
}
