use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::EntityId;
use crate::errors::ValidationError;

static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\S+$").expect("valid tag pattern"));

/// A project groups contract work for a client; its tag correlates raw
/// time-tracking rows to the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Option<EntityId>,
    pub title: String,
    pub tag: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_completed: bool,
    pub contract_id: EntityId,
}

impl Project {
    pub fn new(
        title: impl Into<String>,
        tag: impl Into<String>,
        description: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        contract_id: EntityId,
    ) -> Result<Self, ValidationError> {
        let tag = tag.into();
        if !TAG_PATTERN.is_match(&tag) {
            return Err(ValidationError::InvalidTag(tag));
        }
        Ok(Self {
            id: None,
            title: title.into(),
            tag,
            description: description.into(),
            start_date,
            end_date,
            is_completed: false,
            contract_id,
        })
    }
}
