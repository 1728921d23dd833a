use std::time::Duration;

use anyhow::{anyhow, Context};
use lettre::{
    message::{header, MessageBuilder, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use portfolio_email_contracts::{Email, EmailBody, EmailService};
use portfolio_models::{email_address::EmailAddressWithName, Sensitive};
use portfolio_utils::{trace_instrument, Apply};

#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub smtp_url: String,
    pub credentials: Option<SmtpCredentials>,
    pub from: EmailAddressWithName,
    /// Upper bound for connecting to the smtp server and delivering a single
    /// message.
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: Sensitive<String>,
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::from_url(&config.smtp_url)
            .context("Invalid smtp url")?
            .apply_map(config.credentials, |builder, credentials| {
                builder.credentials(Credentials::new(
                    credentials.username,
                    credentials.password.0,
                ))
            })
            .timeout(Some(config.timeout))
            .build();

        Ok(Self {
            from: config.from,
            transport,
            timeout: config.timeout,
        })
    }

    fn build_message(&self, email: Email) -> anyhow::Result<Message> {
        let builder = Message::builder()
            .from(self.from.0.clone())
            .to(email.recipient.0)
            .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
            .subject(email.subject);

        match email.body {
            EmailBody::Text(body) => builder.header(header::ContentType::TEXT_PLAIN).body(body),
            EmailBody::Html(body) => builder.header(header::ContentType::TEXT_HTML).body(body),
            EmailBody::Alternative { text, html } => {
                builder.multipart(MultiPart::alternative_plain_html(text, html))
            }
        }
        .context("Failed to build email message")
    }
}

impl EmailService for EmailServiceImpl {
    #[trace_instrument(skip(self, email))]
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = self.build_message(email)?;

        tokio::time::timeout(self.timeout, self.transport.send(message))
            .await
            .map_err(|_| anyhow!("Timed out after {:?} while sending email", self.timeout))?
            .map(|response| response.is_positive())
            .map_err(Into::into)
    }

    #[trace_instrument(skip(self))]
    async fn ping(&self) -> anyhow::Result<()> {
        tokio::time::timeout(self.timeout, self.transport.test_connection())
            .await
            .map_err(|_| anyhow!("Timed out after {:?} while pinging smtp server", self.timeout))??
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}
