//! AI assistant use-cases over the text-generation boundary.
//!
//! # Responsibility
//! - Build prompts for memo critique, goal optimization and knowledge-base
//!   questions.
//! - Collapse every outcome into display text; callers never see an error.
//!
//! # Invariants
//! - Missing credentials map to a "service unavailable" sentinel.
//! - Other failures map to a fixed per-operation message and a warn log.
//! - Empty model output maps to a fixed per-operation message.

use crate::gateway::text_generation::{GenerationError, TextGenerationService};
use crate::logging::{sanitize_message, MAX_LOGGED_TEXT_CHARS};
use crate::model::goal::GoalStatus;
use crate::model::memo::MemoStatus;
use crate::model::user::{Role, Team};
use crate::repo::store::Store;
use crate::service::memo_service::MemoDraft;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::sync::Arc;

pub const CRITIQUE_UNAVAILABLE: &str = "AI Service Unavailable: Missing API Key";
pub const SERVICE_UNAVAILABLE: &str = "AI Service Unavailable";

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+(.+?)\s*$").expect("valid bullet regex"));

/// Fallback texts for one assistant operation.
struct Fallbacks {
    operation: &'static str,
    unavailable: &'static str,
    empty: &'static str,
    failed: &'static str,
}

const CRITIQUE: Fallbacks = Fallbacks {
    operation: "memo_critique",
    unavailable: CRITIQUE_UNAVAILABLE,
    empty: "No feedback generated.",
    failed: "Error generating critique.",
};

const OPTIMIZE: Fallbacks = Fallbacks {
    operation: "goal_optimize",
    unavailable: SERVICE_UNAVAILABLE,
    empty: "No suggestion generated.",
    failed: "Error generating goal suggestion.",
};

const KNOWLEDGE: Fallbacks = Fallbacks {
    operation: "knowledge_query",
    unavailable: SERVICE_UNAVAILABLE,
    empty: "I couldn't find an answer to that.",
    failed: "Sorry, I'm having trouble accessing the knowledge base right now.",
};

#[derive(Debug, Clone, Serialize)]
struct GoalFact {
    title: String,
    owner: String,
    status: GoalStatus,
    progress: String,
}

#[derive(Debug, Clone, Serialize)]
struct MemoFact {
    subject: String,
    author: String,
    date: String,
    status: MemoStatus,
    summary: String,
}

#[derive(Debug, Clone, Serialize)]
struct UserFact {
    id: String,
    name: String,
    role: Role,
    team: Team,
}

/// Owned copy of the store facts a knowledge-base question may draw on.
///
/// Taken before the request is awaited so the store is not borrowed across
/// the suspension point.
#[derive(Debug, Clone)]
pub struct KnowledgeSnapshot {
    goals: Vec<GoalFact>,
    memos: Vec<MemoFact>,
    users: Vec<UserFact>,
}

impl KnowledgeSnapshot {
    pub fn from_store(store: &Store) -> Self {
        Self {
            goals: store
                .goals()
                .iter()
                .map(|g| GoalFact {
                    title: g.title.clone(),
                    owner: g.owner_id.clone(),
                    status: g.status,
                    progress: format!("{}/{} {}", g.current, g.target, g.metric),
                })
                .collect(),
            memos: store
                .memos()
                .iter()
                .map(|m| MemoFact {
                    subject: m.subject.clone(),
                    author: m.from_id.clone(),
                    date: m.date.to_string(),
                    status: m.status,
                    summary: m.summary.clone(),
                })
                .collect(),
            users: store
                .users()
                .iter()
                .map(|u| UserFact {
                    id: u.id.clone(),
                    name: u.name.clone(),
                    role: u.role,
                    team: u.team,
                })
                .collect(),
        }
    }
}

#[derive(Clone)]
pub struct AssistantService {
    generator: Arc<dyn TextGenerationService>,
}

impl AssistantService {
    pub fn new(generator: Arc<dyn TextGenerationService>) -> Self {
        Self { generator }
    }

    /// Bulleted critique of a memo draft.
    pub async fn critique_memo(&self, draft: &MemoDraft) -> String {
        self.run(&CRITIQUE, &critique_prompt(draft)).await
    }

    /// SMART rewrite suggestion for a free-text goal.
    pub async fn optimize_goal(&self, goal_description: &str) -> String {
        self.run(&OPTIMIZE, &optimize_prompt(goal_description)).await
    }

    /// Answers `question` strictly from `snapshot`.
    pub async fn query_knowledge_base(&self, question: &str, snapshot: &KnowledgeSnapshot) -> String {
        self.run(&KNOWLEDGE, &knowledge_prompt(question, snapshot)).await
    }

    async fn run(&self, fallbacks: &Fallbacks, prompt: &str) -> String {
        match self.generator.generate(prompt).await {
            Ok(text) if text.trim().is_empty() => fallbacks.empty.to_string(),
            Ok(text) => text,
            Err(GenerationError::Unavailable) => fallbacks.unavailable.to_string(),
            Err(err) => {
                warn!(
                    "event=assistant_request module=assistant status=error operation={} error={}",
                    fallbacks.operation,
                    sanitize_message(&err.to_string(), MAX_LOGGED_TEXT_CHARS)
                );
                fallbacks.failed.to_string()
            }
        }
    }
}

fn critique_prompt(draft: &MemoDraft) -> String {
    let attachments = if draft.attachments.is_empty() {
        "None".to_string()
    } else {
        draft
            .attachments
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "You are a demanding operating executive reviewing an internal memo.\n\
         Judge it on clarity, brevity and return on investment. Filler is not acceptable.\n\n\
         Subject: {}\n\
         Summary & Content: {}\n\
         Attachments: {attachments}\n\n\
         Reply with a short bulleted critique explaining how to make the memo more quantitative and direct.",
        draft.subject, draft.summary
    )
}

fn optimize_prompt(goal_description: &str) -> String {
    format!(
        "Rewrite this goal so it is SMART (Specific, Measurable, Achievable, Relevant, Time-bound).\n\
         It needs a numeric baseline and a numeric target.\n\n\
         Current Draft: \"{goal_description}\"\n\n\
         Reply concisely with a suggested Title, Metric, Baseline (number) and Target (number)."
    )
}

fn knowledge_prompt(question: &str, snapshot: &KnowledgeSnapshot) -> String {
    let goals = serde_json::to_string(&snapshot.goals).unwrap_or_else(|_| "[]".to_string());
    let memos = serde_json::to_string(&snapshot.memos).unwrap_or_else(|_| "[]".to_string());
    let users = serde_json::to_string(&snapshot.users).unwrap_or_else(|_| "[]".to_string());
    format!(
        "You are the internal assistant for GRX10, a renewable energy and marketing company.\n\
         You can read the company's goals, memos and people directory below.\n\n\
         GOALS:\n{goals}\n\n\
         MEMOS:\n{memos}\n\n\
         PEOPLE:\n{users}\n\n\
         QUESTION: \"{question}\"\n\n\
         Answer only from the data above. If the data does not contain the answer, say so. Keep it short."
    )
}

/// Splits a bulleted critique into its items.
///
/// Lines that are not bullets are ignored; a reply without any bullets
/// yields its trimmed text as a single item.
pub fn critique_points(text: &str) -> Vec<String> {
    let points: Vec<String> = text
        .lines()
        .filter_map(|line| BULLET_RE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect();
    if points.is_empty() && !text.trim().is_empty() {
        return vec![text.trim().to_string()];
    }
    points
}
