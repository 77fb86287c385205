//! User and role model.
//!
//! # Invariants
//! - `id` never changes once a user exists.
//! - `role` is the only input to access decisions; `team` is display data.

use crate::model::ids::UserId;
use serde::{Deserialize, Serialize};

/// Role used by the access policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Employee,
    Manager,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Marketing,
    RevOps,
    Sales,
    #[serde(rename = "Solar Operations")]
    SolarOps,
    #[serde(rename = "Designers")]
    Design,
    #[serde(rename = "AI Engineering")]
    AiEngineering,
    Leadership,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub team: Team,
    /// Avatar image reference; rendering is left to the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        team: Team,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
            team,
            avatar_url: None,
        }
    }
}
