use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Category of a calendar event. Determines which temporal fields are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Holiday,
    Deadline,
    Session,
    Vanilla,
    Meeting,
    Schedule,
    Announcement,
}

impl EventType {
    pub const ALL: [Self; 7] = [
        Self::Holiday,
        Self::Deadline,
        Self::Session,
        Self::Vanilla,
        Self::Meeting,
        Self::Schedule,
        Self::Announcement,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Holiday => "holiday",
            Self::Deadline => "deadline",
            Self::Session => "session",
            Self::Vanilla => "vanilla",
            Self::Meeting => "meeting",
            Self::Schedule => "schedule",
            Self::Announcement => "announcement",
        }
    }

    /// Types that describe a block of time and therefore need both ends.
    #[must_use]
    pub const fn requires_time_span(self) -> bool {
        matches!(self, Self::Session | Self::Meeting | Self::Schedule)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::InvalidInput(format!("unknown event type: {s}")))
    }
}

/// Visibility class of an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventScope {
    #[default]
    Global,
    Cohort,
    Section,
    Personal,
}

impl EventScope {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Cohort => "cohort",
            Self::Section => "section",
            Self::Personal => "personal",
        }
    }
}

impl fmt::Display for EventScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Self::Global),
            "cohort" => Ok(Self::Cohort),
            "section" => Ok(Self::Section),
            "personal" => Ok(Self::Personal),
            other => Err(CoreError::InvalidInput(format!(
                "unknown event scope: {other}"
            ))),
        }
    }
}
