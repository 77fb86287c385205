//! Goal visibility and memo review rules.

use crate::model::goal::Goal;
use crate::model::memo::{Memo, MemoStatus};
use crate::model::user::{Role, User};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a memo review was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The user's role may not review memos at all.
    ReviewerRoleRequired { role: Role },
    /// The memo is not waiting for review.
    MemoNotPending { status: MemoStatus },
    /// The requested status is not a review outcome.
    InvalidReviewOutcome { requested: MemoStatus },
}

impl Display for PolicyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReviewerRoleRequired { role } => {
                write!(f, "role {role:?} may not review memos")
            }
            Self::MemoNotPending { status } => {
                write!(f, "memo is `{}`, only pending memos can be reviewed", status.label())
            }
            Self::InvalidReviewOutcome { requested } => write!(
                f,
                "`{}` is not a review outcome; expected Approved or Revision Requested",
                requested.label()
            ),
        }
    }
}

impl Error for PolicyError {}

/// Goals `user` may see: all of them for admins, otherwise only their own.
pub fn visible_goals<'a>(user: &User, goals: &'a [Goal]) -> Vec<&'a Goal> {
    match user.role {
        Role::Admin => goals.iter().collect(),
        Role::Employee | Role::Manager => goals.iter().filter(|g| g.owner_id == user.id).collect(),
    }
}

/// Whether `user` may change or comment on `goal`; mirrors visibility.
pub fn can_edit_goal(user: &User, goal: &Goal) -> bool {
    user.role == Role::Admin || goal.owner_id == user.id
}

pub fn can_review_memo(user: &User) -> bool {
    matches!(user.role, Role::Manager | Role::Admin)
}

pub fn can_transition_memo(user: &User, memo: &Memo, new_status: MemoStatus) -> bool {
    ensure_memo_transition(user, memo, new_status).is_ok()
}

/// Enforcing form of [`can_transition_memo`].
///
/// Checks run in order: reviewer role, pending status, review outcome.
pub fn ensure_memo_transition(
    user: &User,
    memo: &Memo,
    new_status: MemoStatus,
) -> Result<(), PolicyError> {
    if !can_review_memo(user) {
        return Err(PolicyError::ReviewerRoleRequired { role: user.role });
    }
    if memo.status != MemoStatus::PendingReview {
        return Err(PolicyError::MemoNotPending {
            status: memo.status,
        });
    }
    match new_status {
        MemoStatus::Approved | MemoStatus::RevisionRequested => Ok(()),
        requested => Err(PolicyError::InvalidReviewOutcome { requested }),
    }
}
