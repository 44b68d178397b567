//! Item Entity
//!
//! A showcase entry: an external project link with an optional title and
//! description, positioned in the public list by its `order` key.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::entity::{DomainError, DomainResult, Entity};

/// Store-assigned document identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A showcase item as materialized from a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier, assigned by the store
    pub id: ItemId,
    /// Linked resource
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Display position key; absent sorts last
    pub order: Option<i64>,
}

impl Item {
    pub fn from_fields(id: ItemId, fields: ItemFields) -> Self {
        Self {
            id,
            url: fields.url,
            title: fields.title,
            description: fields.description,
            order: fields.order,
        }
    }

    /// Label shown on the public page: the title, or the url when untitled
    pub fn display_label(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.url,
        }
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stored document shape, everything except the id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

/// Input of the "add project" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub url: String,
    pub title: String,
    pub description: String,
}

impl NewItem {
    pub fn new(url: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.url.trim().is_empty() {
            return Err(DomainError::Validation("url is required".to_string()));
        }
        Ok(())
    }

    /// Document fields for this input at the given order; blank text becomes absent
    pub fn into_fields(self, order: i64) -> ItemFields {
        ItemFields {
            url: self.url.trim().to_string(),
            title: non_blank(self.title),
            description: non_blank(self.description),
            order: Some(order),
        }
    }
}

fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// One entry of an atomic renumbering batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub id: ItemId,
    pub order: i64,
}

impl OrderUpdate {
    pub fn new(id: impl Into<ItemId>, order: i64) -> Self {
        Self { id: id.into(), order }
    }
}
