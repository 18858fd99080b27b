use serde::{Deserialize, Serialize};

/// Postal address attached to a contact.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        number: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            number: number.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            country: country.into(),
        }
    }

    /// True iff every field is empty.
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.number.is_empty()
            && self.city.is_empty()
            && self.postal_code.is_empty()
            && self.country.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_address_is_empty() {
        assert!(Address::default().is_empty());
    }

    #[test]
    fn any_populated_field_makes_address_non_empty() {
        let address = Address::new("", "", "Berlin", "", "");
        assert!(!address.is_empty());
    }
}
