//! Task lifecycle status.
//!
//! Statuses are stored by name (`TEXT` column with a CHECK constraint), so the
//! string form returned by [`TaskStatus::as_str`] must stay in sync with the
//! migrations.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Overdue,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
        TaskStatus::Overdue,
        TaskStatus::Cancelled,
    ];

    /// Database / wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Overdue => "OVERDUE",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::validation(format!("Unknown task status '{s}'")))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_status_name() {
        for status in TaskStatus::ALL {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn rejects_unknown_name() {
        assert!("DONE".parse::<TaskStatus>().is_err());
        assert!("pending".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn serde_uses_database_names() {
        let json = serde_json::to_value(TaskStatus::InProgress).unwrap();
        assert_eq!(json, "IN_PROGRESS");
        let parsed: TaskStatus = serde_json::from_value("CANCELLED".into()).unwrap();
        assert_eq!(parsed, TaskStatus::Cancelled);
    }

    #[test]
    fn defaults_to_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }
}
