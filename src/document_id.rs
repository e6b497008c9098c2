//! Store-assigned document identifiers.
//!
//! Ids are BSON ObjectIds, exposed only in their 24-character hex form.

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(ObjectId);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid document id: {0:?}")]
pub struct InvalidDocumentId(pub String);

impl DocumentId {
    pub fn generate() -> Self {
        DocumentId(ObjectId::new())
    }

    pub fn parse(s: &str) -> Result<Self, InvalidDocumentId> {
        ObjectId::parse_str(s)
            .map(DocumentId)
            .map_err(|_| InvalidDocumentId(s.to_string()))
    }

    /// Creation time embedded in the identifier, in milliseconds since the epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp().timestamp_millis()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = InvalidDocumentId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentId::parse(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = InvalidDocumentId;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        DocumentId::parse(&s)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.to_string()
    }
}
