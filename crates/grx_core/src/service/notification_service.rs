//! Overdue-review alert derivation.
//!
//! # Responsibility
//! - Scan pending memos and raise one alert per recipient once a memo has
//!   waited longer than the configured threshold.
//! - Hand every new alert to the email dispatcher.
//!
//! # Invariants
//! - Dedup key is `(recipient id, memo id)` over existing alerts; re-running
//!   against the same store creates nothing new.
//! - Elapsed time is measured from 00:00 UTC of the memo date.
//! - The threshold is exclusive: exactly 48h is not yet overdue.

use crate::gateway::email::EmailDispatchService;
use crate::model::ids::{IdGenerator, MemoId, UserId};
use crate::model::memo::{Memo, MemoStatus};
use crate::model::notification::{Notification, NotificationKind, ACTION_LINK_MEMOS};
use crate::model::user::User;
use crate::repo::store::{Store, StoreResult};
use crate::service::memo_service::memo_recipients;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use log::{info, warn};
use std::collections::HashSet;

pub const OVERDUE_ALERT_TITLE: &str = "Overdue memo review";

pub struct NotificationDeriver<'a> {
    ids: &'a dyn IdGenerator,
    email: &'a dyn EmailDispatchService,
    threshold: Duration,
}

impl<'a> NotificationDeriver<'a> {
    /// `threshold_hours` below zero counts as zero; a value too large for a
    /// `Duration` means nothing is ever overdue.
    pub fn new(
        ids: &'a dyn IdGenerator,
        email: &'a dyn EmailDispatchService,
        threshold_hours: i64,
    ) -> Self {
        let threshold = Duration::try_hours(threshold_hours.max(0)).unwrap_or_else(|| {
            warn!(
                "event=overdue_scan module=notify status=clamped threshold_hours={threshold_hours}"
            );
            Duration::MAX
        });
        Self {
            ids,
            email,
            threshold,
        }
    }

    /// Adds overdue alerts to `store` and returns the ones created.
    pub fn derive_overdue(
        &self,
        store: &mut Store,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Notification>> {
        let mut notified: HashSet<(UserId, MemoId)> = store
            .notifications()
            .iter()
            .filter(|n| n.kind == NotificationKind::Alert)
            .filter_map(|n| {
                n.source_memo_id
                    .as_ref()
                    .map(|memo_id| (n.user_id.clone(), memo_id.clone()))
            })
            .collect();

        let mut due: Vec<(User, Memo, i64, Notification)> = Vec::new();
        for memo in store.memos().iter().filter(|m| m.status == MemoStatus::PendingReview) {
            let elapsed = now - memo_start(memo);
            if elapsed <= self.threshold {
                continue;
            }
            let recipients = memo_recipients(memo, store.users());
            if recipients.is_empty() {
                warn!(
                    "event=overdue_scan module=notify status=skipped memo_id={} reason=unknown_recipient",
                    memo.id
                );
                continue;
            }
            let author_name = store
                .user(&memo.from_id)
                .map(|u| u.name.as_str())
                .unwrap_or("A colleague");

            for recipient in recipients {
                if !notified.insert((recipient.id.clone(), memo.id.clone())) {
                    continue;
                }
                let hours = elapsed.num_hours();
                let alert = Notification {
                    id: self.ids.next_id(),
                    user_id: recipient.id.clone(),
                    title: OVERDUE_ALERT_TITLE.to_string(),
                    message: format!(
                        "\"{}\" from {author_name} has been pending your review for {hours} hours.",
                        memo.subject
                    ),
                    kind: NotificationKind::Alert,
                    read: false,
                    timestamp: now,
                    action_link: Some(ACTION_LINK_MEMOS.to_string()),
                    source_memo_id: Some(memo.id.clone()),
                };
                due.push((recipient.clone(), memo.clone(), hours, alert));
            }
        }

        // Stored before emailed: a rejected alert sends no email.
        let mut created = Vec::with_capacity(due.len());
        for (recipient, memo, hours, alert) in due {
            store.add_notification(alert.clone())?;
            self.dispatch_email(&recipient, &memo, hours);
            created.push(alert);
        }
        info!(
            "event=overdue_scan module=notify status=ok alerts_created={}",
            created.len()
        );
        Ok(created)
    }

    fn dispatch_email(&self, recipient: &User, memo: &Memo, hours: i64) {
        let subject = format!("Action required: \"{}\" is awaiting your review", memo.subject);
        let body = format!(
            "Hi {},\n\nThe memo \"{}\" sent on {} has been pending review for {hours} hours.\nPlease open the Memos section to approve it or request a revision.",
            recipient.name, memo.subject, memo.date
        );
        self.email.send(&recipient.email, &subject, &body);
    }
}

fn memo_start(memo: &Memo) -> DateTime<Utc> {
    Utc.from_utc_datetime(&memo.date.and_time(NaiveTime::MIN))
}
