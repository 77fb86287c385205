//! Session store: owned collections plus the active user.
//!
//! # Responsibility
//! - Own every entity collection exclusively; callers get borrowed views.
//! - Apply copy-on-write replacement for goal and memo updates.
//! - Scope bulk read-marking to the current user.
//!
//! # Invariants
//! - `current_user` always indexes a user in `users`; users are never
//!   removed or reordered.
//! - A failed mutation leaves every collection byte-for-byte unchanged.
//! - `mark_all_notifications_read` never touches other users' notifications.

use crate::model::goal::Goal;
use crate::model::ids::{GoalId, MemoId, NotificationId, UserId};
use crate::model::memo::Memo;
use crate::model::notification::Notification;
use crate::model::user::User;
use crate::model::validation::ModelValidationError;
use log::debug;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Collection an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Goal,
    Memo,
    Notification,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Goal => "goal",
            Self::Memo => "memo",
            Self::Notification => "notification",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { kind: EntityKind, id: String },
    DuplicateId { kind: EntityKind, id: String },
    Validation(ModelValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.as_str()),
            Self::DuplicateId { kind, id } => {
                write!(f, "{} id already exists: {id}", kind.as_str())
            }
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for StoreError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Initial contents for a store.
#[derive(Debug, Clone, Default)]
pub struct StoreSeed {
    pub users: Vec<User>,
    pub goals: Vec<Goal>,
    pub memos: Vec<Memo>,
    pub notifications: Vec<Notification>,
    pub current_user_id: UserId,
}

/// Single owned state object for a dashboard session.
#[derive(Debug, Clone)]
pub struct Store {
    users: Vec<User>,
    goals: Vec<Goal>,
    memos: Vec<Memo>,
    notifications: Vec<Notification>,
    current_user: usize,
}

impl Store {
    /// Builds a store from seed collections.
    ///
    /// # Errors
    /// - `DuplicateId` when any collection repeats an id.
    /// - `NotFound` when `current_user_id` is not among `users`.
    pub fn new(seed: StoreSeed) -> StoreResult<Self> {
        ensure_unique(EntityKind::User, seed.users.iter().map(|u| u.id.as_str()))?;
        ensure_unique(EntityKind::Goal, seed.goals.iter().map(|g| g.id.as_str()))?;
        ensure_unique(EntityKind::Memo, seed.memos.iter().map(|m| m.id.as_str()))?;
        ensure_unique(
            EntityKind::Notification,
            seed.notifications.iter().map(|n| n.id.as_str()),
        )?;
        let current_user = seed
            .users
            .iter()
            .position(|u| u.id == seed.current_user_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: EntityKind::User,
                id: seed.current_user_id.clone(),
            })?;

        Ok(Self {
            users: seed.users,
            goals: seed.goals,
            memos: seed.memos,
            notifications: seed.notifications,
            current_user,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn memo(&self, id: &str) -> Option<&Memo> {
        self.memos.iter().find(|m| m.id == id)
    }

    /// The active user. Stands in for an authenticated principal.
    pub fn current_user(&self) -> &User {
        &self.users[self.current_user]
    }

    /// Notifications addressed to `user_id`, in insertion order.
    pub fn notifications_for<'a>(
        &'a self,
        user_id: &'a str,
    ) -> impl Iterator<Item = &'a Notification> + 'a {
        self.notifications.iter().filter(move |n| n.user_id == user_id)
    }

    pub fn unread_count(&self, user_id: &str) -> usize {
        self.notifications_for(user_id).filter(|n| !n.read).count()
    }

    /// Switches the active-user context.
    pub fn set_current_user(&mut self, user_id: &str) -> StoreResult<()> {
        let index = self
            .users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or_else(|| StoreError::NotFound {
                kind: EntityKind::User,
                id: user_id.to_string(),
            })?;
        self.current_user = index;
        debug!("event=current_user_switch module=store status=ok");
        Ok(())
    }

    /// Appends a goal.
    pub fn add_goal(&mut self, goal: Goal) -> StoreResult<GoalId> {
        goal.validate()?;
        if self.goal(&goal.id).is_some() {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Goal,
                id: goal.id,
            });
        }
        let id = goal.id.clone();
        self.goals.push(goal);
        Ok(id)
    }

    /// Replaces the goal with the same id.
    pub fn update_goal(&mut self, goal: Goal) -> StoreResult<()> {
        goal.validate()?;
        let slot = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal.id)
            .ok_or_else(|| StoreError::NotFound {
                kind: EntityKind::Goal,
                id: goal.id.clone(),
            })?;
        *slot = goal;
        Ok(())
    }

    pub fn add_memo(&mut self, memo: Memo) -> StoreResult<MemoId> {
        memo.validate()?;
        if self.memo(&memo.id).is_some() {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Memo,
                id: memo.id,
            });
        }
        let id = memo.id.clone();
        self.memos.push(memo);
        Ok(id)
    }

    /// Replaces the memo with the same id.
    pub fn update_memo(&mut self, memo: Memo) -> StoreResult<()> {
        memo.validate()?;
        let slot = self
            .memos
            .iter_mut()
            .find(|m| m.id == memo.id)
            .ok_or_else(|| StoreError::NotFound {
                kind: EntityKind::Memo,
                id: memo.id.clone(),
            })?;
        *slot = memo;
        Ok(())
    }

    pub fn add_notification(&mut self, notification: Notification) -> StoreResult<NotificationId> {
        if self.notifications.iter().any(|n| n.id == notification.id) {
            return Err(StoreError::DuplicateId {
                kind: EntityKind::Notification,
                id: notification.id,
            });
        }
        let id = notification.id.clone();
        self.notifications.push(notification);
        Ok(id)
    }

    pub fn mark_notification_read(&mut self, id: &str) -> StoreResult<()> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: EntityKind::Notification,
                id: id.to_string(),
            })?;
        notification.read = true;
        Ok(())
    }

    /// Marks every notification of the current user as read.
    ///
    /// Returns how many notifications flipped from unread to read.
    pub fn mark_all_notifications_read(&mut self) -> usize {
        let current_user_id = self.users[self.current_user].id.as_str();
        let mut changed = 0;
        for notification in self
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == current_user_id && !n.read)
        {
            notification.read = true;
            changed += 1;
        }
        changed
    }
}

fn ensure_unique<'a>(kind: EntityKind, ids: impl Iterator<Item = &'a str>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(StoreError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
