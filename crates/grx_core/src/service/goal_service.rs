//! Goal use-case service.
//!
//! # Responsibility
//! - Create goals from drafts with generated ids and owner defaults.
//! - Upsert edited goals and append comments.
//! - Scope reads and writes to what the current user may see.
//!
//! # Invariants
//! - New goals start `OnTrack`, owned by the current user.
//! - Only admins and owners can save or comment on a goal.
//! - Comments are appended to a copy of the goal, which then replaces it.

use crate::model::clock::Clock;
use crate::model::goal::{Goal, GoalComment, GoalStatus, GoalType};
use crate::model::ids::{GoalId, IdGenerator};
use crate::model::validation::ModelValidationError;
use crate::policy::access::{can_edit_goal, visible_goals};
use crate::repo::store::{EntityKind, Store, StoreError};
use chrono::NaiveDate;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalServiceError {
    InvalidGoal(ModelValidationError),
    /// Current user is neither admin nor owner.
    NotPermitted { goal_id: GoalId },
    EmptyComment,
    Store(StoreError),
}

impl Display for GoalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGoal(err) => write!(f, "invalid goal: {err}"),
            Self::NotPermitted { goal_id } => {
                write!(f, "current user may not modify goal {goal_id}")
            }
            Self::EmptyComment => write!(f, "comment text must not be empty"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GoalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidGoal(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for GoalServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Validation(err) => Self::InvalidGoal(err),
            other => Self::Store(other),
        }
    }
}

impl From<ModelValidationError> for GoalServiceError {
    fn from(value: ModelValidationError) -> Self {
        Self::InvalidGoal(value)
    }
}

/// Editable fields of a goal that is not yet committed.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub kind: GoalType,
    pub metric: String,
    pub baseline: f64,
    pub target: f64,
    /// Defaults to 0 when absent.
    pub current: Option<f64>,
    pub timeline: Option<NaiveDate>,
    /// Latest optimizer suggestion shown next to the form.
    pub ai_suggestion: Option<String>,
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            kind: GoalType::Quarterly,
            metric: String::new(),
            baseline: 0.0,
            target: 0.0,
            current: None,
            timeline: None,
            ai_suggestion: None,
        }
    }
}

/// Whether `save_goal` inserted or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

pub struct GoalService<'a> {
    store: &'a mut Store,
    ids: &'a dyn IdGenerator,
    clock: &'a dyn Clock,
}

impl<'a> GoalService<'a> {
    pub fn new(store: &'a mut Store, ids: &'a dyn IdGenerator, clock: &'a dyn Clock) -> Self {
        Self { store, ids, clock }
    }

    /// Goals visible to the current user.
    pub fn visible_goals(&self) -> Vec<&Goal> {
        visible_goals(self.store.current_user(), self.store.goals())
    }

    /// Commits a new goal owned by the current user.
    pub fn create_goal(&mut self, draft: &GoalDraft) -> Result<Goal, GoalServiceError> {
        let goal = Goal {
            id: self.ids.next_id(),
            owner_id: self.store.current_user().id.clone(),
            title: draft.title.trim().to_string(),
            kind: draft.kind,
            metric: draft.metric.trim().to_string(),
            baseline: draft.baseline,
            target: draft.target,
            current: draft.current.unwrap_or(0.0),
            timeline: draft.timeline,
            status: GoalStatus::OnTrack,
            score: None,
            manager_feedback: None,
            comments: Vec::new(),
        };
        self.store.add_goal(goal.clone())?;
        info!("event=goal_create module=goals status=ok goal_id={}", goal.id);
        Ok(goal)
    }

    /// Inserts `goal` or replaces the stored goal with the same id.
    pub fn save_goal(&mut self, goal: Goal) -> Result<SaveOutcome, GoalServiceError> {
        goal.validate()?;
        let user = self.store.current_user();
        if !can_edit_goal(user, &goal) {
            return Err(GoalServiceError::NotPermitted { goal_id: goal.id });
        }
        if let Some(existing) = self.store.goal(&goal.id) {
            if !can_edit_goal(user, existing) {
                return Err(GoalServiceError::NotPermitted { goal_id: goal.id });
            }
            let goal_id = goal.id.clone();
            self.store.update_goal(goal)?;
            info!("event=goal_update module=goals status=ok goal_id={goal_id}");
            Ok(SaveOutcome::Updated)
        } else {
            let goal_id = self.store.add_goal(goal)?;
            info!("event=goal_create module=goals status=ok goal_id={goal_id}");
            Ok(SaveOutcome::Created)
        }
    }

    /// Appends a comment by the current user.
    pub fn add_comment(
        &mut self,
        goal_id: &str,
        text: &str,
    ) -> Result<GoalComment, GoalServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GoalServiceError::EmptyComment);
        }
        let user = self.store.current_user();
        let goal = self.store.goal(goal_id).ok_or_else(|| StoreError::NotFound {
            kind: EntityKind::Goal,
            id: goal_id.to_string(),
        })?;
        if !can_edit_goal(user, goal) {
            return Err(GoalServiceError::NotPermitted {
                goal_id: goal_id.to_string(),
            });
        }

        let comment = GoalComment {
            id: self.ids.next_id(),
            author_id: user.id.clone(),
            text: text.to_string(),
            timestamp: self.clock.now(),
        };
        let mut updated = goal.clone();
        updated.comments.push(comment.clone());
        self.store.update_goal(updated)?;
        Ok(comment)
    }
}
