//! Executive dashboard figures derived from store state.

use crate::model::goal::GoalStatus;
use crate::model::memo::MemoStatus;
use crate::repo::store::Store;

/// One slice of the goal status distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSlice {
    pub status: GoalStatus,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_goals: usize,
    /// Share of goals completed or on track, rounded to whole percent.
    pub completion_rate: u32,
    /// Ordered On Track, At Risk, Off Track, Completed.
    pub distribution: Vec<StatusSlice>,
    pub pending_reviews: usize,
}

impl DashboardStats {
    pub fn count(&self, status: GoalStatus) -> usize {
        self.distribution
            .iter()
            .find(|slice| slice.status == status)
            .map_or(0, |slice| slice.count)
    }
}

pub struct DashboardService<'a> {
    store: &'a Store,
}

impl<'a> DashboardService<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Company-wide figures; not scoped to the current user.
    pub fn stats(&self) -> DashboardStats {
        let goals = self.store.goals();
        let distribution: Vec<StatusSlice> = GoalStatus::ALL
            .iter()
            .map(|status| StatusSlice {
                status: *status,
                label: status.label(),
                count: goals.iter().filter(|g| g.status == *status).count(),
            })
            .collect();

        let total_goals = goals.len();
        let healthy = distribution
            .iter()
            .filter(|s| matches!(s.status, GoalStatus::Completed | GoalStatus::OnTrack))
            .map(|s| s.count)
            .sum::<usize>();
        let completion_rate = if total_goals == 0 {
            0
        } else {
            (healthy as f64 / total_goals as f64 * 100.0).round() as u32
        };

        DashboardStats {
            total_goals,
            completion_rate,
            distribution,
            pending_reviews: self
                .store
                .memos()
                .iter()
                .filter(|m| m.status == MemoStatus::PendingReview)
                .count(),
        }
    }
}
