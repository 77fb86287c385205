//! Memo model: routed proposals with attachments and review status.
//!
//! # Invariants
//! - `status` changes only through an explicit review action.
//! - Attachments carry metadata only; no binary content is kept.
//! - Comments are append-only.

use crate::model::ids::{AttachmentId, CommentId, MemoId, UserId};
use crate::model::validation::ModelValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Wire value addressing a memo to every user.
pub const MEMO_RECIPIENT_ALL: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoStatus {
    Draft,
    #[serde(rename = "Pending Review")]
    PendingReview,
    Approved,
    #[serde(rename = "Revision Requested")]
    RevisionRequested,
}

impl MemoStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::PendingReview => "Pending Review",
            Self::Approved => "Approved",
            Self::RevisionRequested => "Revision Requested",
        }
    }
}

/// Memo addressee: one user or everyone.
///
/// Serialized as the user id, or the literal `"ALL"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MemoRecipient {
    #[default]
    All,
    User(UserId),
}

impl MemoRecipient {
    /// Whether `user_id` is addressed, ignoring authorship.
    pub fn includes(&self, user_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::User(id) => id == user_id,
        }
    }
}

impl From<String> for MemoRecipient {
    fn from(value: String) -> Self {
        if value == MEMO_RECIPIENT_ALL {
            Self::All
        } else {
            Self::User(value)
        }
    }
}

impl From<MemoRecipient> for String {
    fn from(value: MemoRecipient) -> Self {
        match value {
            MemoRecipient::All => MEMO_RECIPIENT_ALL.to_string(),
            MemoRecipient::User(id) => id,
        }
    }
}

/// Metadata for a simulated upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoAttachment {
    pub id: AttachmentId,
    pub name: String,
    /// Human readable size, e.g. `2.40 MB`.
    pub size: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl MemoAttachment {
    /// Builds attachment metadata from an upload's byte size.
    pub fn from_upload(
        id: impl Into<AttachmentId>,
        name: impl Into<String>,
        size_bytes: u64,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size: format_size_mb(size_bytes),
            mime_type: mime_type.into(),
        }
    }
}

fn format_size_mb(size_bytes: u64) -> String {
    format!("{:.2} MB", size_bytes as f64 / 1024.0 / 1024.0)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoComment {
    pub id: CommentId,
    pub author_id: UserId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Memo {
    pub id: MemoId,
    pub from_id: UserId,
    pub to_id: MemoRecipient,
    pub date: NaiveDate,
    pub subject: String,
    pub status: MemoStatus,
    pub summary: String,
    #[serde(default)]
    pub attachments: Vec<MemoAttachment>,
    #[serde(default)]
    pub comments: Vec<MemoComment>,
}

impl Memo {
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.trim().is_empty() {
            return Err(ModelValidationError::EmptyId("memo"));
        }
        if self.from_id.trim().is_empty() {
            return Err(ModelValidationError::EmptyField("memo author"));
        }
        Ok(())
    }
}
