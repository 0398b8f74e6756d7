//! Read-only rows of the tenancy and membership tables.

use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use uuid::Uuid;

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::section)]
#[diesel(check_for_backend(Pg))]
pub struct Section {
    pub id: Uuid,
    pub cohort_id: Uuid,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::cohort)]
#[diesel(check_for_backend(Pg))]
pub struct Cohort {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub deleted_at: Option<DateTime<Utc>>,
}
