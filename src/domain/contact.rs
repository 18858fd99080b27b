use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Address, EntityId};
use crate::errors::ValidationError;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("valid email pattern"));

/// An entry in the address book, typically a client's invoicing contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: Option<EntityId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl Contact {
    /// Creates a contact, rejecting a malformed email up front.
    pub fn new(
        first_name: Option<String>,
        last_name: Option<String>,
        company: Option<String>,
        email: Option<String>,
    ) -> Result<Self, ValidationError> {
        if let Some(raw) = email.as_deref() {
            validate_email(raw)?;
        }
        Ok(Self {
            id: None,
            first_name,
            last_name,
            company,
            email,
            address: None,
        })
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), ValidationError> {
        let email = email.into();
        validate_email(&email)?;
        self.email = Some(email);
        Ok(())
    }

    /// Display name: first+last, else first, else last, else company, else empty.
    pub fn name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => self.company.clone().unwrap_or_default(),
        }
    }
}

fn validate_email(raw: &str) -> Result<(), ValidationError> {
    if EMAIL_PATTERN.is_match(raw) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(first: Option<&str>, last: Option<&str>, company: Option<&str>) -> Contact {
        Contact::new(
            first.map(String::from),
            last.map(String::from),
            company.map(String::from),
            None,
        )
        .unwrap()
    }

    #[test]
    fn name_prefers_first_and_last() {
        assert_eq!(
            contact(Some("Sam"), Some("Lowry"), Some("Central Services")).name(),
            "Sam Lowry"
        );
        assert_eq!(contact(Some("Sam"), None, None).name(), "Sam");
        assert_eq!(contact(None, Some("Lowry"), None).name(), "Lowry");
        assert_eq!(
            contact(None, None, Some("Central Services")).name(),
            "Central Services"
        );
        assert_eq!(contact(None, None, None).name(), "");
    }

    #[test]
    fn malformed_email_is_rejected_at_creation() {
        let err = Contact::new(None, None, None, Some("not-an-email".into()))
            .expect_err("email without domain must fail");
        assert_eq!(err, ValidationError::InvalidEmail("not-an-email".into()));
        assert!(Contact::new(None, None, None, Some("a@b".into())).is_err());
    }

    #[test]
    fn valid_email_is_accepted() {
        let contact = Contact::new(None, None, None, Some("info@centralservices.com".into()))
            .expect("valid address");
        assert_eq!(contact.email.as_deref(), Some("info@centralservices.com"));
    }
}
