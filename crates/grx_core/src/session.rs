//! Session wiring: one owned store plus its collaborators.
//!
//! # Responsibility
//! - Own the `Store` and inject ids, clock and gateways into services.
//! - Run overdue derivation exactly once, when the session starts.
//!
//! # Invariants
//! - There is no global store; every caller goes through a session handle.
//! - Derivation is not re-run on mutations; its dedup only guards against
//!   accidental re-entry.

use crate::config::CoreConfig;
use crate::gateway::email::{EmailDispatchService, LogEmailDispatcher};
use crate::gateway::text_generation::{text_generator_from_config, TextGenerationService};
use crate::logging::{init_logging, LoggingError};
use crate::model::clock::{Clock, SystemClock};
use crate::model::ids::{IdGenerator, UuidIdGenerator};
use crate::model::notification::Notification;
use crate::repo::store::{Store, StoreError, StoreResult, StoreSeed};
use crate::service::assistant_service::{AssistantService, KnowledgeSnapshot};
use crate::service::dashboard_service::DashboardService;
use crate::service::goal_service::GoalService;
use crate::service::memo_service::MemoService;
use crate::service::notification_service::NotificationDeriver;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug)]
pub enum SessionError {
    Logging(LoggingError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logging(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Logging(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<LoggingError> for SessionError {
    fn from(value: LoggingError) -> Self {
        Self::Logging(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Collaborators a session depends on.
pub struct SessionDeps {
    pub ids: Box<dyn IdGenerator>,
    pub clock: Box<dyn Clock>,
    pub email: Arc<dyn EmailDispatchService>,
    pub text_generator: Arc<dyn TextGenerationService>,
}

impl SessionDeps {
    /// UUID ids, system clock, log email, Gemini when a key is configured.
    pub fn from_config(config: &CoreConfig) -> Self {
        Self {
            ids: Box::new(UuidIdGenerator),
            clock: Box::new(SystemClock),
            email: Arc::new(LogEmailDispatcher),
            text_generator: text_generator_from_config(config),
        }
    }
}

pub struct DashboardSession {
    config: CoreConfig,
    store: Store,
    deps: SessionDeps,
    startup_alerts: usize,
}

impl DashboardSession {
    /// Builds the store, then derives overdue alerts once.
    ///
    /// File logging starts first when `config.logging.log_dir` is set.
    pub fn start(
        config: CoreConfig,
        seed: StoreSeed,
        deps: SessionDeps,
    ) -> Result<Self, SessionError> {
        if let Some(log_dir) = config.logging.log_dir.as_deref() {
            init_logging(&config.logging.level, log_dir)?;
        }

        let mut store = Store::new(seed)?;
        let deriver = NotificationDeriver::new(
            deps.ids.as_ref(),
            deps.email.as_ref(),
            config.overdue_threshold_hours,
        );
        let alerts = deriver.derive_overdue(&mut store, deps.clock.now())?;

        info!(
            "event=session_start module=session status=ok users={} goals={} memos={} startup_alerts={}",
            store.users().len(),
            store.goals().len(),
            store.memos().len(),
            alerts.len()
        );
        Ok(Self {
            config,
            store,
            deps,
            startup_alerts: alerts.len(),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Alerts created by the startup scan.
    pub fn startup_alerts(&self) -> usize {
        self.startup_alerts
    }

    pub fn goals(&mut self) -> GoalService<'_> {
        GoalService::new(&mut self.store, self.deps.ids.as_ref(), self.deps.clock.as_ref())
    }

    pub fn memos(&mut self) -> MemoService<'_> {
        MemoService::new(&mut self.store, self.deps.ids.as_ref(), self.deps.clock.as_ref())
    }

    pub fn dashboard(&self) -> DashboardService<'_> {
        DashboardService::new(&self.store)
    }

    /// Assistant handle that can outlive this borrow (for spawned requests).
    pub fn assistant(&self) -> AssistantService {
        AssistantService::new(Arc::clone(&self.deps.text_generator))
    }

    pub fn knowledge_snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot::from_store(&self.store)
    }

    /// Switches the acting user (role-based view switching).
    pub fn switch_user(&mut self, user_id: &str) -> StoreResult<()> {
        self.store.set_current_user(user_id)
    }

    /// Notifications addressed to the current user.
    pub fn my_notifications(&self) -> Vec<&Notification> {
        let user_id = self.store.current_user().id.as_str();
        self.store.notifications_for(user_id).collect()
    }

    pub fn mark_notification_read(&mut self, id: &str) -> StoreResult<()> {
        self.store.mark_notification_read(id)
    }

    pub fn mark_all_notifications_read(&mut self) -> usize {
        self.store.mark_all_notifications_read()
    }
}
