//! Memo use-case service.
//!
//! # Responsibility
//! - Send memos from drafts and announce them to their recipients.
//! - Apply review outcomes after the access policy allows them.
//! - Append memo comments.
//!
//! # Invariants
//! - Sent memos start `PendingReview`, dated today, authored by the current
//!   user.
//! - Review transitions are enforced here, not only hidden in the UI.
//! - A memo addressed to everyone never notifies its own author.

use crate::model::clock::Clock;
use crate::model::ids::{IdGenerator, MemoId};
use crate::model::memo::{Memo, MemoAttachment, MemoComment, MemoRecipient, MemoStatus};
use crate::model::notification::{Notification, NotificationKind, ACTION_LINK_MEMOS};
use crate::model::user::User;
use crate::policy::access::{ensure_memo_transition, PolicyError};
use crate::repo::store::{EntityKind, Store, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const UNTITLED_MEMO_SUBJECT: &str = "Untitled Memo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoServiceError {
    TransitionDenied { memo_id: MemoId, reason: PolicyError },
    EmptyComment,
    Store(StoreError),
}

impl Display for MemoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransitionDenied { memo_id, reason } => {
                write!(f, "review of memo {memo_id} denied: {reason}")
            }
            Self::EmptyComment => write!(f, "comment text must not be empty"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TransitionDenied { reason, .. } => Some(reason),
            Self::Store(err) => Some(err),
            Self::EmptyComment => None,
        }
    }
}

impl From<StoreError> for MemoServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Memo being composed in the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoDraft {
    pub subject: String,
    pub to_id: MemoRecipient,
    pub summary: String,
    pub attachments: Vec<MemoAttachment>,
    /// Latest critique shown beside the editor.
    pub critique: Option<String>,
}

impl MemoDraft {
    /// Records a simulated upload.
    pub fn attach(&mut self, attachment: MemoAttachment) {
        self.attachments.push(attachment);
    }

    /// Drops the attachment with `id`; returns whether one was removed.
    pub fn remove_attachment(&mut self, id: &str) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a.id != id);
        self.attachments.len() != before
    }
}

/// Users a memo is addressed to, excluding its author for `All`.
///
/// Unknown single recipients resolve to an empty list.
pub fn memo_recipients<'u>(memo: &Memo, users: &'u [User]) -> Vec<&'u User> {
    match &memo.to_id {
        MemoRecipient::All => users.iter().filter(|u| u.id != memo.from_id).collect(),
        MemoRecipient::User(id) => users.iter().filter(|u| &u.id == id).collect(),
    }
}

pub struct MemoService<'a> {
    store: &'a mut Store,
    ids: &'a dyn IdGenerator,
    clock: &'a dyn Clock,
}

impl<'a> MemoService<'a> {
    pub fn new(store: &'a mut Store, ids: &'a dyn IdGenerator, clock: &'a dyn Clock) -> Self {
        Self { store, ids, clock }
    }

    /// Submits `draft` for review and notifies recipients.
    ///
    /// # Errors
    /// - `Store(NotFound)` when addressed to an unknown user.
    pub fn send_memo(&mut self, draft: &MemoDraft) -> Result<Memo, MemoServiceError> {
        if let MemoRecipient::User(id) = &draft.to_id {
            if self.store.user(id).is_none() {
                return Err(StoreError::NotFound {
                    kind: EntityKind::User,
                    id: id.clone(),
                }
                .into());
            }
        }

        let subject = match draft.subject.trim() {
            "" => UNTITLED_MEMO_SUBJECT.to_string(),
            subject => subject.to_string(),
        };
        let author = self.store.current_user().clone();
        let memo = Memo {
            id: self.ids.next_id(),
            from_id: author.id.clone(),
            to_id: draft.to_id.clone(),
            date: self.clock.today(),
            subject,
            status: MemoStatus::PendingReview,
            summary: draft.summary.clone(),
            attachments: draft.attachments.clone(),
            comments: Vec::new(),
        };
        self.store.add_memo(memo.clone())?;

        let recipient_ids: Vec<String> = memo_recipients(&memo, self.store.users())
            .into_iter()
            .map(|u| u.id.clone())
            .collect();
        for recipient_id in &recipient_ids {
            self.notify(
                recipient_id,
                "New memo for review",
                format!("{} sent \"{}\" for your review.", author.name, memo.subject),
                &memo.id,
            )?;
        }

        info!(
            "event=memo_send module=memos status=ok memo_id={} recipients={} attachments={}",
            memo.id,
            recipient_ids.len(),
            memo.attachments.len()
        );
        Ok(memo)
    }

    /// Moves a pending memo to `Approved` or `RevisionRequested`.
    pub fn review_memo(
        &mut self,
        memo_id: &str,
        new_status: MemoStatus,
    ) -> Result<Memo, MemoServiceError> {
        let memo = self.store.memo(memo_id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Memo,
            id: memo_id.to_string(),
        })?;
        let reviewer = self.store.current_user();
        if let Err(reason) = ensure_memo_transition(reviewer, memo, new_status) {
            info!(
                "event=memo_review module=memos status=denied memo_id={memo_id} requested={:?}",
                new_status
            );
            return Err(MemoServiceError::TransitionDenied {
                memo_id: memo_id.to_string(),
                reason,
            });
        }

        let message = format!(
            "{} marked \"{}\" as {}.",
            reviewer.name,
            memo.subject,
            new_status.label()
        );
        let mut updated = memo.clone();
        updated.status = new_status;
        self.store.update_memo(updated.clone())?;
        let title = match new_status {
            MemoStatus::Approved => "Memo approved",
            _ => "Revision requested",
        };
        self.notify(&updated.from_id, title, message, &updated.id)?;

        info!(
            "event=memo_review module=memos status=ok memo_id={memo_id} outcome={:?}",
            new_status
        );
        Ok(updated)
    }

    /// Appends a comment by the current user.
    pub fn add_comment(&mut self, memo_id: &str, text: &str) -> Result<MemoComment, MemoServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MemoServiceError::EmptyComment);
        }
        let memo = self.store.memo(memo_id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Memo,
            id: memo_id.to_string(),
        })?;

        let comment = MemoComment {
            id: self.ids.next_id(),
            author_id: self.store.current_user().id.clone(),
            text: text.to_string(),
            timestamp: self.clock.now(),
        };
        let mut updated = memo.clone();
        updated.comments.push(comment.clone());
        self.store.update_memo(updated)?;
        Ok(comment)
    }

    fn notify(
        &mut self,
        user_id: &str,
        title: &str,
        message: String,
        memo_id: &str,
    ) -> Result<(), StoreError> {
        self.store.add_notification(Notification {
            id: self.ids.next_id(),
            user_id: user_id.to_string(),
            title: title.to_string(),
            message,
            kind: NotificationKind::Info,
            read: false,
            timestamp: self.clock.now(),
            action_link: Some(ACTION_LINK_MEMOS.to_string()),
            source_memo_id: Some(memo_id.to_string()),
        })?;
        Ok(())
    }
}
