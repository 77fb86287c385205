#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use grx_core::{
    CoreConfig, DashboardSession, EmailDispatchService, FixedClock, Goal, GoalStatus, Memo,
    MemoRecipient, MemoStatus, Notification, NotificationKind, Role, SequentialIdGenerator,
    SessionDeps, Store, StoreSeed, Team, TextGenerationService, UnavailableTextGenerator, User,
};
use std::sync::{Arc, Mutex};

pub fn users() -> Vec<User> {
    vec![
        User::new("u1", "Sriram (Founder)", "sriram@grx10.com", Role::Admin, Team::Leadership),
        User::new("u2", "Prem (Founder)", "prem@grx10.com", Role::Admin, Team::Leadership),
        User::new("u3", "Arjun (RevOps)", "arjun@grx10.com", Role::Manager, Team::RevOps),
        User::new("u4", "Sarah (Solar)", "sarah@grx10.com", Role::Employee, Team::SolarOps),
    ]
}

pub fn goals() -> Vec<Goal> {
    let mut installs = Goal::new("g1", "u4", "Increase Residential Solar Installs", 12.0, 20.0);
    installs.metric = "Installations/Month".to_string();
    installs.current = 15.0;

    let mut cac = Goal::new("g2", "u3", "Reduce CAC via LinkedIn Ads", 150.0, 90.0);
    cac.metric = "CAC ($)".to_string();
    cac.current = 110.0;
    cac.status = GoalStatus::AtRisk;

    vec![installs, cac]
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

pub fn days_before_now(days: i64) -> NaiveDate {
    (now() - chrono::Duration::days(days)).date_naive()
}

pub fn memo(id: &str, from: &str, to: MemoRecipient, date: NaiveDate, status: MemoStatus) -> Memo {
    Memo {
        id: id.to_string(),
        from_id: from.to_string(),
        to_id: to,
        date,
        subject: format!("Proposal {id}"),
        status,
        summary: "Problem, solution, ask.".to_string(),
        attachments: Vec::new(),
        comments: Vec::new(),
    }
}

pub fn notification(id: &str, user_id: &str, read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: "Heads up".to_string(),
        message: "Something happened".to_string(),
        kind: NotificationKind::Info,
        read,
        timestamp: now(),
        action_link: None,
        source_memo_id: None,
    }
}

pub fn seed(current_user_id: &str) -> StoreSeed {
    StoreSeed {
        users: users(),
        goals: goals(),
        memos: Vec::new(),
        notifications: Vec::new(),
        current_user_id: current_user_id.to_string(),
    }
}

pub fn store(current_user_id: &str) -> Store {
    Store::new(seed(current_user_id)).unwrap()
}

/// Session with deterministic ids, a fixed clock and no AI backend.
pub fn session(seed: StoreSeed) -> DashboardSession {
    session_with_generator(seed, Arc::new(UnavailableTextGenerator))
}

pub fn session_with_generator(
    seed: StoreSeed,
    text_generator: Arc<dyn TextGenerationService>,
) -> DashboardSession {
    let deps = SessionDeps {
        ids: Box::new(SequentialIdGenerator::new("id")),
        clock: Box::new(FixedClock(now())),
        email: Arc::new(RecordingEmail::default()),
        text_generator,
    };
    DashboardSession::start(CoreConfig::default(), seed, deps).unwrap()
}

/// Captures dispatched emails instead of logging them.
#[derive(Default)]
pub struct RecordingEmail {
    pub sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingEmail {
    pub fn recipients(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(to, _, _)| to.clone())
            .collect()
    }
}

impl EmailDispatchService for RecordingEmail {
    fn send(&self, recipient_email: &str, subject: &str, body: &str) {
        self.sent.lock().unwrap().push((
            recipient_email.to_string(),
            subject.to_string(),
            body.to_string(),
        ));
    }
}
