//! Asynchronous provider actions (shutdown, snapshot, power on)

use serde::{Deserialize, Serialize};

pub type ActionId = u64;

/// An asynchronous operation started on a droplet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Provider-assigned action ID
    pub id: ActionId,

    /// Action kind as reported by the provider (e.g. "shutdown", "snapshot")
    pub kind: String,

    /// Normalized status
    pub status: ActionStatus,
}

impl Action {
    pub fn is_finished(&self) -> bool {
        !matches!(self.status, ActionStatus::Pending)
    }
}

/// Status of an action, decoded once at the adapter boundary
///
/// Providers report action progress in their own vocabulary; adapters map it
/// onto these three cases so the lifecycle code never sees raw payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "reason")]
pub enum ActionStatus {
    /// Still running
    Pending,
    /// Finished successfully
    Completed,
    /// Finished with an error
    Failed(String),
}

impl std::fmt::Display for ActionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionStatus::Pending => write!(f, "pending"),
            ActionStatus::Completed => write!(f, "completed"),
            ActionStatus::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}
