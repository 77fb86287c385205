//! Addressee-scoped notifications.
//!
//! # Invariants
//! - Created only by the overdue deriver or by user actions.
//! - After creation only `read` changes.

use crate::model::ids::{MemoId, NotificationId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Navigation target for memo-related notifications.
pub const ACTION_LINK_MEMOS: &str = "memos";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Alert,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    /// Addressee.
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_link: Option<String>,
    /// Memo this notification is about, when there is one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_memo_id: Option<MemoId>,
}

impl Notification {
    /// Whether this is the overdue-review alert for `memo_id`.
    pub fn is_alert_for_memo(&self, memo_id: &str) -> bool {
        self.kind == NotificationKind::Alert && self.source_memo_id.as_deref() == Some(memo_id)
    }
}
