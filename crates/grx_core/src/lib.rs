//! Core logic for the GRX10 goals and memos dashboard.
//! Holds session state, access rules and notification derivation; UI
//! layers drive it through `DashboardSession`.

pub mod config;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod policy;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{ConfigError, CoreConfig, LoggingConfig};
pub use gateway::email::{EmailDispatchService, LogEmailDispatcher};
pub use gateway::gemini::GeminiTextGenerator;
pub use gateway::text_generation::{
    text_generator_from_config, GenerationError, TextGenerationService, UnavailableTextGenerator,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::clock::{Clock, FixedClock, SystemClock};
pub use model::goal::{Goal, GoalComment, GoalScore, GoalStatus, GoalType};
pub use model::ids::{IdGenerator, SequentialIdGenerator, UuidIdGenerator};
pub use model::memo::{Memo, MemoAttachment, MemoComment, MemoRecipient, MemoStatus};
pub use model::notification::{Notification, NotificationKind};
pub use model::user::{Role, Team, User};
pub use model::validation::ModelValidationError;
pub use policy::access::{
    can_edit_goal, can_review_memo, can_transition_memo, ensure_memo_transition, visible_goals,
    PolicyError,
};
pub use repo::store::{EntityKind, Store, StoreError, StoreResult, StoreSeed};
pub use service::assistant_service::{critique_points, AssistantService, KnowledgeSnapshot};
pub use service::dashboard_service::{DashboardService, DashboardStats, StatusSlice};
pub use service::draft::{Draft, DraftTicket};
pub use service::goal_service::{GoalDraft, GoalService, GoalServiceError, SaveOutcome};
pub use service::memo_service::{memo_recipients, MemoDraft, MemoService, MemoServiceError};
pub use service::notification_service::NotificationDeriver;
pub use session::{DashboardSession, SessionDeps, SessionError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
