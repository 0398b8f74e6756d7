//! Text-backed database enums.
//!
//! Each enum maps to a `CHECK` constraint in the migrations and converts to and
//! from its counterpart in `almanac_core::types`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::io::Write;

use almanac_core::types as core_types;

/// Maps to the `event.event_type` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
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
}

impl ToSql<Text, Pg> for EventType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for EventType {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"holiday" => Ok(Self::Holiday),
            b"deadline" => Ok(Self::Deadline),
            b"session" => Ok(Self::Session),
            b"vanilla" => Ok(Self::Vanilla),
            b"meeting" => Ok(Self::Meeting),
            b"schedule" => Ok(Self::Schedule),
            b"announcement" => Ok(Self::Announcement),
            _ => Err("Unrecognized event_type".into()),
        }
    }
}

/// Maps to the `event.scope` CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum EventScope {
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

impl ToSql<Text, Pg> for EventScope {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for EventScope {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"global" => Ok(Self::Global),
            b"cohort" => Ok(Self::Cohort),
            b"section" => Ok(Self::Section),
            b"personal" => Ok(Self::Personal),
            _ => Err("Unrecognized scope".into()),
        }
    }
}

/// Maps to the `enrollment.status` CHECK constraint. Only `Active` enrollments
/// grant section visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub enum EnrollmentStatus {
    Active,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

impl ToSql<Text, Pg> for EnrollmentStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for EnrollmentStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"active" => Ok(Self::Active),
            b"completed" => Ok(Self::Completed),
            b"dropped" => Ok(Self::Dropped),
            _ => Err("Unrecognized enrollment status".into()),
        }
    }
}

impl From<core_types::EventType> for EventType {
    fn from(value: core_types::EventType) -> Self {
        match value {
            core_types::EventType::Holiday => Self::Holiday,
            core_types::EventType::Deadline => Self::Deadline,
            core_types::EventType::Session => Self::Session,
            core_types::EventType::Vanilla => Self::Vanilla,
            core_types::EventType::Meeting => Self::Meeting,
            core_types::EventType::Schedule => Self::Schedule,
            core_types::EventType::Announcement => Self::Announcement,
        }
    }
}

impl From<EventType> for core_types::EventType {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Holiday => Self::Holiday,
            EventType::Deadline => Self::Deadline,
            EventType::Session => Self::Session,
            EventType::Vanilla => Self::Vanilla,
            EventType::Meeting => Self::Meeting,
            EventType::Schedule => Self::Schedule,
            EventType::Announcement => Self::Announcement,
        }
    }
}

impl From<core_types::EventScope> for EventScope {
    fn from(value: core_types::EventScope) -> Self {
        match value {
            core_types::EventScope::Global => Self::Global,
            core_types::EventScope::Cohort => Self::Cohort,
            core_types::EventScope::Section => Self::Section,
            core_types::EventScope::Personal => Self::Personal,
        }
    }
}

impl From<EventScope> for core_types::EventScope {
    fn from(value: EventScope) -> Self {
        match value {
            EventScope::Global => Self::Global,
            EventScope::Cohort => Self::Cohort,
            EventScope::Section => Self::Section,
            EventScope::Personal => Self::Personal,
        }
    }
}
