use anyhow::Context;
use portfolio_config::EmailConfig;
use portfolio_email_impl::{EmailServiceConfig, EmailServiceImpl, SmtpCredentials};
use tracing::warn;

/// Create the smtp transport. Connections are only established when needed.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let credentials = match (&config.smtp_username, &config.smtp_password) {
        (Some(username), Some(password)) => Some(SmtpCredentials {
            username: username.clone(),
            password: password.clone(),
        }),
        (None, None) => None,
        _ => {
            warn!("Ignoring incomplete smtp credentials");
            None
        }
    };

    EmailServiceImpl::new(EmailServiceConfig {
        smtp_url: config.smtp_url.clone(),
        credentials,
        from: config.from.clone(),
        timeout: config.timeout.into(),
    })
    .context("Failed to create smtp transport")
}
