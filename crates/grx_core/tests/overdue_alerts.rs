mod common;

use common::RecordingEmail;
use grx_core::{
    CoreConfig, DashboardSession, FixedClock, Memo, MemoRecipient, MemoStatus,
    NotificationDeriver, NotificationKind, SequentialIdGenerator, SessionDeps, Store, StoreError,
    UnavailableTextGenerator,
};
use std::sync::Arc;

fn store_with_memos(memos: Vec<Memo>) -> Store {
    let mut seed = common::seed("u3");
    seed.memos = memos;
    Store::new(seed).unwrap()
}

#[test]
fn pending_memo_three_days_old_alerts_its_recipient_once() {
    let mut store = store_with_memos(vec![common::memo(
        "m7",
        "u4",
        MemoRecipient::User("u3".to_string()),
        common::days_before_now(3),
        MemoStatus::PendingReview,
    )]);
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();
    let deriver = NotificationDeriver::new(&ids, &email, 48);

    let created = deriver.derive_overdue(&mut store, common::now()).unwrap();

    assert_eq!(created.len(), 1);
    let alert = &created[0];
    assert_eq!(alert.user_id, "u3");
    assert_eq!(alert.kind, NotificationKind::Alert);
    assert!(!alert.read);
    assert_eq!(alert.action_link.as_deref(), Some("memos"));
    assert_eq!(alert.source_memo_id.as_deref(), Some("m7"));
    for other in ["u1", "u2", "u4"] {
        assert_eq!(store.notifications_for(other).count(), 0);
    }
    assert_eq!(email.recipients(), vec!["arjun@grx10.com".to_string()]);

    let again = deriver.derive_overdue(&mut store, common::now()).unwrap();
    assert!(again.is_empty());
    assert_eq!(store.notifications().len(), 1);
    assert_eq!(email.recipients().len(), 1);
}

#[test]
fn memo_to_everyone_skips_its_author() {
    let mut store = store_with_memos(vec![common::memo(
        "m8",
        "u3",
        MemoRecipient::All,
        common::days_before_now(5),
        MemoStatus::PendingReview,
    )]);
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();

    let created = NotificationDeriver::new(&ids, &email, 48)
        .derive_overdue(&mut store, common::now())
        .unwrap();

    let mut addressees: Vec<&str> = created.iter().map(|n| n.user_id.as_str()).collect();
    addressees.sort_unstable();
    assert_eq!(addressees, vec!["u1", "u2", "u4"]);
    assert_eq!(email.recipients().len(), 3);
}

#[test]
fn recent_and_settled_memos_raise_nothing() {
    let mut store = store_with_memos(vec![
        common::memo(
            "fresh",
            "u4",
            MemoRecipient::User("u3".to_string()),
            common::days_before_now(1),
            MemoStatus::PendingReview,
        ),
        common::memo(
            "approved",
            "u4",
            MemoRecipient::User("u3".to_string()),
            common::days_before_now(30),
            MemoStatus::Approved,
        ),
        common::memo(
            "revising",
            "u4",
            MemoRecipient::All,
            common::days_before_now(30),
            MemoStatus::RevisionRequested,
        ),
    ]);
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();

    let created = NotificationDeriver::new(&ids, &email, 48)
        .derive_overdue(&mut store, common::now())
        .unwrap();

    assert!(created.is_empty());
    assert!(email.recipients().is_empty());
}

#[test]
fn exactly_threshold_is_not_overdue() {
    // Age counts from 00:00 UTC of the memo date.
    let date = common::days_before_now(2);
    let midnight = date
        .succ_opt()
        .and_then(|d| d.succ_opt())
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    let mut store = store_with_memos(vec![common::memo(
        "edge",
        "u4",
        MemoRecipient::User("u3".to_string()),
        date,
        MemoStatus::PendingReview,
    )]);
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();
    let deriver = NotificationDeriver::new(&ids, &email, 48);

    assert!(deriver.derive_overdue(&mut store, midnight).unwrap().is_empty());
    let one_hour_later = midnight + chrono::Duration::hours(1);
    assert_eq!(deriver.derive_overdue(&mut store, one_hour_later).unwrap().len(), 1);
}

#[test]
fn info_notification_about_memo_does_not_suppress_alert() {
    let mut seed = common::seed("u3");
    seed.memos = vec![common::memo(
        "m9",
        "u4",
        MemoRecipient::User("u3".to_string()),
        common::days_before_now(4),
        MemoStatus::PendingReview,
    )];
    let mut announcement = common::notification("n-info", "u3", false);
    announcement.source_memo_id = Some("m9".to_string());
    seed.notifications = vec![announcement];
    let mut store = Store::new(seed).unwrap();
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();

    let created = NotificationDeriver::new(&ids, &email, 48)
        .derive_overdue(&mut store, common::now())
        .unwrap();
    assert_eq!(created.len(), 1);
}

#[test]
fn session_start_derives_alerts_once() {
    let mut seed = common::seed("u3");
    seed.memos = vec![common::memo(
        "m7",
        "u4",
        MemoRecipient::User("u3".to_string()),
        common::days_before_now(3),
        MemoStatus::PendingReview,
    )];
    let email = Arc::new(RecordingEmail::default());
    let deps = SessionDeps {
        ids: Box::new(SequentialIdGenerator::new("id")),
        clock: Box::new(FixedClock(common::now())),
        email: email.clone(),
        text_generator: Arc::new(UnavailableTextGenerator),
    };

    let mut session = DashboardSession::start(CoreConfig::default(), seed, deps).unwrap();

    assert_eq!(session.startup_alerts(), 1);
    assert_eq!(session.my_notifications().len(), 1);
    assert_eq!(email.recipients(), vec!["arjun@grx10.com".to_string()]);

    session
        .memos()
        .add_comment("m7", "Looking at this today")
        .unwrap();
    assert_eq!(session.store().notifications().len(), 1);
    assert_eq!(email.recipients().len(), 1);
}

#[test]
fn rejected_alert_is_not_emailed_and_is_retried() {
    let mut seed = common::seed("u3");
    seed.memos = vec![common::memo(
        "m7",
        "u4",
        MemoRecipient::User("u3".to_string()),
        common::days_before_now(3),
        MemoStatus::PendingReview,
    )];
    seed.notifications = vec![common::notification("n-1", "u1", true)];
    let mut store = Store::new(seed).unwrap();
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();
    let deriver = NotificationDeriver::new(&ids, &email, 48);

    let err = deriver.derive_overdue(&mut store, common::now()).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { .. }));
    assert!(email.recipients().is_empty());
    assert_eq!(store.notifications_for("u3").count(), 0);

    let created = deriver.derive_overdue(&mut store, common::now()).unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].id, "n-2");
    assert_eq!(email.recipients(), vec!["arjun@grx10.com".to_string()]);
}

#[test]
fn extreme_thresholds_do_not_panic() {
    let tomorrow = common::now().date_naive().succ_opt().unwrap();
    let mut store = store_with_memos(vec![
        common::memo(
            "old",
            "u4",
            MemoRecipient::User("u3".to_string()),
            common::days_before_now(3000),
            MemoStatus::PendingReview,
        ),
        common::memo(
            "future",
            "u4",
            MemoRecipient::User("u3".to_string()),
            tomorrow,
            MemoStatus::PendingReview,
        ),
    ]);
    let ids = SequentialIdGenerator::new("n");
    let email = RecordingEmail::default();

    let created = NotificationDeriver::new(&ids, &email, i64::MAX)
        .derive_overdue(&mut store, common::now())
        .unwrap();
    assert!(created.is_empty());

    let created = NotificationDeriver::new(&ids, &email, -100)
        .derive_overdue(&mut store, common::now())
        .unwrap();
    let memo_ids: Vec<_> = created.iter().filter_map(|n| n.source_memo_id.as_deref()).collect();
    assert_eq!(memo_ids, vec!["old"]);
}

#[test]
fn session_start_survives_huge_threshold() {
    let mut seed = common::seed("u3");
    seed.memos = vec![common::memo(
        "m7",
        "u4",
        MemoRecipient::User("u3".to_string()),
        common::days_before_now(3),
        MemoStatus::PendingReview,
    )];
    let config = CoreConfig {
        overdue_threshold_hours: i64::MAX,
        ..CoreConfig::default()
    };
    let deps = SessionDeps {
        ids: Box::new(SequentialIdGenerator::new("id")),
        clock: Box::new(FixedClock(common::now())),
        email: Arc::new(RecordingEmail::default()),
        text_generator: Arc::new(UnavailableTextGenerator),
    };

    let session = DashboardSession::start(config, seed, deps).unwrap();
    assert_eq!(session.startup_alerts(), 0);
}
