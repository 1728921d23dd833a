use std::sync::Arc;

use portfolio_core_contact_contracts::{
    rate_limit::MockContactRateLimitService, ContactFeatureService, ContactSendMessageError,
};
use portfolio_email_contracts::{Email, EmailBody, MockEmailService};
use portfolio_models::{client::ClientAddress, contact::ContactSubmission};
use portfolio_templates_contracts::{ContactTemplate, MockTemplateService, RenderedTemplate};
use portfolio_utils::assert_matches;

use crate::{ContactFeatureConfig, ContactFeatureServiceImpl};

type Sut =
    ContactFeatureServiceImpl<MockTemplateService, MockEmailService, MockContactRateLimitService>;

fn make_sut(
    template: MockTemplateService,
    email: MockEmailService,
    rate_limit: MockContactRateLimitService,
) -> Sut {
    ContactFeatureServiceImpl {
        template,
        email,
        rate_limit,
        config: ContactFeatureConfig {
            recipient: Arc::new("Portfolio <me@example.com>".parse().unwrap()),
            subject_prefix: "Portfolio Contact: ".into(),
        },
    }
}

fn client() -> ClientAddress {
    ClientAddress::Ip("203.0.113.7".parse().unwrap())
}

fn submission() -> ContactSubmission {
    ContactSubmission {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        subject: "Hello".into(),
        message: "Hi there".into(),
    }
}

fn template() -> ContactTemplate {
    ContactTemplate {
        name: "Jane Doe".into(),
        email: "jane@example.com".into(),
        subject: "Hello".into(),
        message: "Hi there".into(),
    }
}

fn rendered() -> RenderedTemplate {
    RenderedTemplate {
        html: "<p>Hi there</p>".into(),
        text: "Hi there".into(),
    }
}

fn email() -> Email {
    Email {
        recipient: "Portfolio <me@example.com>".parse().unwrap(),
        subject: "Portfolio Contact: Hello".into(),
        body: EmailBody::Alternative {
            text: "Hi there".into(),
            html: "<p>Hi there</p>".into(),
        },
        reply_to: Some("jane@example.com".parse().unwrap()),
    }
}

#[tokio::test]
async fn ok() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), true);
    let template = MockTemplateService::new().with_render(template(), rendered());
    let email = MockEmailService::new().with_send(email(), true);

    let sut = make_sut(template, email, rate_limit);

    // Act
    let result = sut.send_message(&client(), submission()).await;

    // Assert
    result.unwrap();
}

#[tokio::test]
async fn ok_sanitized() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), true);
    let template = MockTemplateService::new().with_render(
        ContactTemplate {
            message: "Hi there,\n\n  see you".into(),
            ..template()
        },
        rendered(),
    );
    let email = MockEmailService::new().with_send(email(), true);

    let sut = make_sut(template, email, rate_limit);

    // Act
    let result = sut
        .send_message(
            &client(),
            ContactSubmission {
                name: "  Jane \t  Doe ".into(),
                email: " jane@example.com\r\n".into(),
                subject: "Hel\x00lo   ".into(),
                message: "Hi there,\n\n  see you".into(),
            },
        )
        .await;

    // Assert
    result.unwrap();
}

#[tokio::test]
async fn rate_limited() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), false);

    let sut = make_sut(MockTemplateService::new(), MockEmailService::new(), rate_limit);

    // Act
    let result = sut.send_message(&client(), submission()).await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::RateLimited));
}

#[tokio::test]
async fn rate_limited_before_validation() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), false);

    let sut = make_sut(MockTemplateService::new(), MockEmailService::new(), rate_limit);

    // Act
    let result = sut
        .send_message(&client(), ContactSubmission::default())
        .await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::RateLimited));
}

#[tokio::test]
async fn missing_fields() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), true);

    let sut = make_sut(MockTemplateService::new(), MockEmailService::new(), rate_limit);

    // Act
    let result = sut
        .send_message(
            &client(),
            ContactSubmission {
                name: "   ".into(),
                ..submission()
            },
        )
        .await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::MissingFields));
}

#[tokio::test]
async fn invalid_email() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), true);

    let sut = make_sut(MockTemplateService::new(), MockEmailService::new(), rate_limit);

    // Act
    let result = sut
        .send_message(
            &client(),
            ContactSubmission {
                email: "not-an-email".into(),
                ..submission()
            },
        )
        .await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::InvalidEmail));
}

#[tokio::test]
async fn rejected_by_smtp_server() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), true);
    let template = MockTemplateService::new().with_render(template(), rendered());
    let email = MockEmailService::new().with_send(email(), false);

    let sut = make_sut(template, email, rate_limit);

    // Act
    let result = sut.send_message(&client(), submission()).await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::Send));
}

#[tokio::test]
async fn transport_error() {
    // Arrange
    let rate_limit = MockContactRateLimitService::new().with_check_and_record(client(), true);
    let template = MockTemplateService::new().with_render(template(), rendered());
    let email = MockEmailService::new().with_send_error(email(), "connection reset");

    let sut = make_sut(template, email, rate_limit);

    // Act
    let result = sut.send_message(&client(), submission()).await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::Send));
}

#[tokio::test]
async fn rate_limit_error() {
    // Arrange
    let mut rate_limit = MockContactRateLimitService::new();
    rate_limit.expect_check_and_record().once().return_once(|_| {
        Box::pin(std::future::ready(Err(anyhow::anyhow!("store unavailable"))))
    });

    let sut = make_sut(MockTemplateService::new(), MockEmailService::new(), rate_limit);

    // Act
    let result = sut.send_message(&client(), submission()).await;

    // Assert
    assert_matches!(result, Err(ContactSendMessageError::Other(_)));
}
