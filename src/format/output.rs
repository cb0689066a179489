use bugtrack_lib::model::BugRecord;
use bugtrack_lib::users::{Role, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Account as shown to other users.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Outcome of a command that writes the bug file.
#[derive(Debug, Clone, Serialize)]
pub struct MutationResult {
    pub action: &'static str,
    pub id: u32,
    /// The record as written; absent after a delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bug: Option<BugRecord>,
}
