//! Goal (OKR) model and progress math.
//!
//! # Responsibility
//! - Define the quantified goal record and its append-only comment thread.
//! - Compute raw and display progress from baseline/current/target.
//!
//! # Invariants
//! - `display_progress()` is always within `[0, 100]`.
//! - `target == baseline` has no defined progress; display falls back to 0.
//! - Comments are only ever appended, never edited or removed.

use crate::model::ids::{CommentId, GoalId, UserId};
use crate::model::validation::ModelValidationError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalType {
    Annual,
    Quarterly,
}

/// Tracked health of a goal. Set by the owner, not derived from progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "Risk")]
    AtRisk,
    #[serde(rename = "Off Track")]
    OffTrack,
    Completed,
}

impl GoalStatus {
    /// All statuses in dashboard display order.
    pub const ALL: [GoalStatus; 4] = [
        GoalStatus::OnTrack,
        GoalStatus::AtRisk,
        GoalStatus::OffTrack,
        GoalStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::OffTrack => "Off Track",
            Self::Completed => "Completed",
        }
    }
}

/// Letter grade a manager may attach to a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalScore {
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalComment {
    pub id: CommentId,
    pub author_id: UserId,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub owner_id: UserId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    /// Unit label, e.g. `Installations/Month`.
    pub metric: String,
    pub baseline: f64,
    pub target: f64,
    pub current: f64,
    #[serde(default)]
    pub timeline: Option<NaiveDate>,
    pub status: GoalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<GoalScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager_feedback: Option<String>,
    #[serde(default)]
    pub comments: Vec<GoalComment>,
}

impl Goal {
    /// Creates an on-track quarterly goal starting at its baseline.
    pub fn new(
        id: impl Into<GoalId>,
        owner_id: impl Into<UserId>,
        title: impl Into<String>,
        baseline: f64,
        target: f64,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            title: title.into(),
            kind: GoalType::Quarterly,
            metric: String::new(),
            baseline,
            target,
            current: baseline,
            timeline: None,
            status: GoalStatus::OnTrack,
            score: None,
            manager_feedback: None,
            comments: Vec::new(),
        }
    }

    /// Progress in percent, unclamped.
    ///
    /// Returns `None` when `target == baseline` or the inputs are not finite.
    /// Works for decreasing targets (e.g. cost reduction) because numerator
    /// and denominator share the sign of the intended direction.
    pub fn raw_progress(&self) -> Option<f64> {
        let span = self.target - self.baseline;
        if span == 0.0 {
            return None;
        }
        let progress = (self.current - self.baseline) / span * 100.0;
        progress.is_finite().then_some(progress)
    }

    /// Progress clamped to `[0, 100]` for display; 0 when undefined.
    pub fn display_progress(&self) -> f64 {
        self.raw_progress()
            .map(|value| value.clamp(0.0, 100.0))
            .unwrap_or(0.0)
    }

    /// Checks fields required before a goal is committed to the store.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.id.trim().is_empty() {
            return Err(ModelValidationError::EmptyId("goal"));
        }
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::EmptyField("goal title"));
        }
        Ok(())
    }
}
