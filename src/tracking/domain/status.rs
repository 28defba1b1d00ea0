//! Lifecycle status shared by tasks and their operation records.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task or of a single operation record.
///
/// The same enum serves both granularities: a task carries the aggregate
/// status derived from its records, while each record carries the outcome of
/// one data operation. `Part` and `Timeout` are unusual at record granularity
/// but allowed for uniformity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created but not yet started.
    Wait,
    /// Work is in flight.
    Running,
    /// Every constituent operation succeeded.
    Success,
    /// Every constituent operation failed.
    Fail,
    /// Mixed success and failure.
    Part,
    /// Work never completed within its deadline.
    Timeout,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wait => "wait",
            Self::Running => "running",
            Self::Success => "success",
            Self::Fail => "fail",
            Self::Part => "part",
            Self::Timeout => "timeout",
        }
    }

    /// Returns whether this status permits no further transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Fail | Self::Part | Self::Timeout)
    }

    /// Returns whether a record with this status still counts as in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Wait | Self::Running)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "wait" => Ok(Self::Wait),
            "running" => Ok(Self::Running),
            "success" => Ok(Self::Success),
            "fail" => Ok(Self::Fail),
            "part" => Ok(Self::Part),
            "timeout" => Ok(Self::Timeout),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
