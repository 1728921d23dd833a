use portfolio_models::contact::ContactSubmission;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The body of a contact request. Only the fields of a JSON object are read.
/// Missing fields and values that are not strings are read as empty strings,
/// any other JSON value is read as an empty submission.
#[derive(Debug, Clone, Default)]
pub struct ApiContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl<'de> Deserialize<'de> for ApiContactSubmission {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(mut fields) = Value::deserialize(deserializer)? else {
            return Ok(Self::default());
        };

        let mut field = |key: &str| match fields.remove(key) {
            Some(Value::String(s)) => s,
            _ => String::new(),
        };

        Ok(Self {
            name: field("name"),
            email: field("email"),
            subject: field("subject"),
            message: field("message"),
        })
    }
}

impl From<ApiContactSubmission> for ContactSubmission {
    fn from(value: ApiContactSubmission) -> Self {
        Self {
            name: value.name,
            email: value.email,
            subject: value.subject,
            message: value.message,
        }
    }
}
