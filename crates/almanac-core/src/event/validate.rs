//! Structural invariants checked before an event is persisted.

use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::event::Event;
use crate::types::{EventScope, EventType};

/// ## Summary
/// Validates an event against its structural invariants, in order:
/// organization, title, temporal shape for the event type, announcement image,
/// scope target, provenance pairing.
///
/// ## Errors
/// Returns `CoreError::ValidationError` carrying the reason for the first violation.
pub fn validate(event: &Event) -> CoreResult<()> {
    if event.organization_id.is_nil() {
        return Err(invalid("organization_id is required"));
    }
    if event.title.trim().is_empty() {
        return Err(invalid("event title cannot be empty"));
    }

    validate_temporal_shape(event)?;

    if event.event_type == EventType::Announcement
        && event.image_url.as_deref().is_some_and(|url| url.trim().is_empty())
    {
        return Err(invalid("announcement image_url cannot be empty"));
    }

    validate_scope_target(event)?;
    validate_provenance(event)
}

fn validate_temporal_shape(event: &Event) -> CoreResult<()> {
    if event.event_type.requires_time_span() {
        let (Some(start), Some(end)) = (event.start_at, event.end_at) else {
            return Err(invalid(format!(
                "{} events must have both a start and end time",
                event.event_type
            )));
        };
        if end < start {
            return Err(invalid("end time cannot be before start time"));
        }
    } else if event.event_type == EventType::Deadline && event.start_at.is_none() {
        return Err(invalid("deadline events must have a start_at (due date)"));
    }
    Ok(())
}

fn validate_scope_target(event: &Event) -> CoreResult<()> {
    let populated = |id: Option<Uuid>| id.is_some_and(|id| !id.is_nil());

    match event.scope {
        EventScope::Global => Ok(()),
        EventScope::Section if !populated(event.section_id) => {
            Err(invalid("section scope requires a valid section_id"))
        }
        EventScope::Cohort if !populated(event.cohort_id) => {
            Err(invalid("cohort scope requires a valid cohort_id"))
        }
        EventScope::Personal if !populated(event.user_id) => {
            Err(invalid("personal scope requires a valid user_id"))
        }
        EventScope::Section | EventScope::Cohort | EventScope::Personal => Ok(()),
    }
}

fn validate_provenance(event: &Event) -> CoreResult<()> {
    let has_type = event
        .source_type
        .as_deref()
        .is_some_and(|kind| !kind.trim().is_empty());

    match (event.source_id.is_some(), has_type) {
        (true, false) => Err(invalid("source_id is provided but source_type is missing")),
        (false, true) => Err(invalid("source_type is provided but source_id is missing")),
        _ => Ok(()),
    }
}

fn invalid(reason: impl Into<String>) -> CoreError {
    CoreError::ValidationError(reason.into())
}
