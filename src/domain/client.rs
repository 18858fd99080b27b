use serde::{Deserialize, Serialize};

use super::EntityId;

/// A client the freelancer has contracted with.
///
/// A client may exist without an invoicing contact transiently, but must
/// resolve one before it can be billed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Client {
    pub id: Option<EntityId>,
    pub name: String,
    pub invoicing_contact_id: Option<EntityId>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            invoicing_contact_id: None,
        }
    }

    pub fn with_invoicing_contact(mut self, contact_id: EntityId) -> Self {
        self.invoicing_contact_id = Some(contact_id);
        self
    }
}
