use std::sync::LazyLock;

use nutype::nutype;
use regex::Regex;
use thiserror::Error;

use crate::email_address::EmailAddress;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 254;
pub const SUBJECT_MAX_LEN: usize = 150;
pub const MESSAGE_MAX_LEN: usize = 5000;

static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F]").unwrap());
static WHITESPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").unwrap());
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Normalize untrusted single line input.
///
/// ASCII control characters are removed, runs of two or more whitespace
/// characters are collapsed into a single space and leading and trailing
/// whitespace is trimmed.
pub fn sanitize(value: &str) -> String {
    let value = CONTROL_CHARS.replace_all(value, "");
    let value = WHITESPACE_RUNS.replace_all(&value, " ");
    value.trim().to_owned()
}

/// Cut `value` down to at most `max_chars` characters.
pub fn truncate(mut value: String, max_chars: usize) -> String {
    if let Some((idx, _)) = value.char_indices().nth(max_chars) {
        value.truncate(idx);
    }
    value
}

fn sanitize_line(value: &str, max_chars: usize) -> String {
    let mut value = truncate(sanitize(value), max_chars);
    value.truncate(value.trim_end().len());
    value
}

/// A contact form submission exactly as received from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("At least one field is empty.")]
    MissingFields,
    #[error("The email address is invalid.")]
    InvalidEmail,
}

impl ContactSubmission {
    /// Sanitize, cap and validate all fields.
    ///
    /// Empty fields are reported before a malformed email address.
    pub fn into_message(self) -> Result<ContactMessage, ContactValidationError> {
        let (Ok(name), Ok(email), Ok(subject), Ok(content)) = (
            ContactMessageAuthorName::try_new(self.name),
            ContactEmail::try_new(self.email),
            ContactMessageSubject::try_new(self.subject),
            ContactMessageContent::try_new(self.message),
        ) else {
            return Err(ContactValidationError::MissingFields);
        };

        let email = email
            .parse_address()
            .ok_or(ContactValidationError::InvalidEmail)?;

        Ok(ContactMessage {
            author: ContactMessageAuthor { name, email },
            subject,
            content,
        })
    }
}

/// A validated contact message, ready to be relayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub author: ContactMessageAuthor,
    pub subject: ContactMessageSubject,
    pub content: ContactMessageContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessageAuthor {
    pub name: ContactMessageAuthorName,
    pub email: EmailAddress,
}

#[nutype(
    sanitize(with = |s: String| sanitize_line(&s, NAME_MAX_LEN)),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageAuthorName(String);

#[nutype(
    sanitize(with = |s: String| sanitize_line(&s, EMAIL_MAX_LEN)),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactEmail(String);

#[nutype(
    sanitize(with = |s: String| sanitize_line(&s, SUBJECT_MAX_LEN)),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageSubject(String);

// Line breaks are part of the message, so it is only capped.
#[nutype(
    sanitize(with = |s: String| truncate(s, MESSAGE_MAX_LEN)),
    validate(not_empty),
    derive(Clone, PartialEq, Eq, TryFrom, Deref)
)]
pub struct ContactMessageContent(String);

impl std::fmt::Debug for ContactMessageContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContactMessageContent(<{} chars>)", self.chars().count())
    }
}

impl ContactEmail {
    /// Returns the address if it has the shape `local@domain.tld` and is a
    /// mailbox the transport is able to address.
    ///
    /// Some addresses of the right shape are still rejected because they
    /// cannot be used as `Reply-To`, e.g. `a(b)@example.com` or a domain
    /// containing `_`.
    pub fn parse_address(&self) -> Option<EmailAddress> {
        EMAIL_SHAPE
            .is_match(self)
            .then(|| self.parse::<EmailAddress>().ok())
            .flatten()
    }
}
