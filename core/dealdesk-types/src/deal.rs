//! Per-source payloads and the composite models built from them.

use crate::files::Files;
use serde::{Deserialize, Serialize};

/// Primary details of a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealDetails {
    pub id: String,
    pub name: String,
}

impl DealDetails {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A task attached to a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
}

impl Task {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A contact person on a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Contact {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }
}

/// A free-text note on a deal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub description: String,
}

impl Note {
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

/// Everything the deal-details screen shows, assembled from all five sources.
///
/// A model only exists once every source has succeeded; there is no
/// partially-populated variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealDetailsModel {
    pub details: DealDetails,
    pub tasks: Vec<Task>,
    pub contacts: Vec<Contact>,
    pub files: Files,
    pub notes: Vec<Note>,
}

/// Reduced model built from the details and files sources only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicDealDetailsModel {
    pub details: DealDetails,
    pub files: Files,
}

impl From<DealDetailsModel> for BasicDealDetailsModel {
    fn from(model: DealDetailsModel) -> Self {
        Self {
            details: model.details,
            files: model.files,
        }
    }
}
