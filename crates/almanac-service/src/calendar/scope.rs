use std::collections::BTreeSet;

use uuid::Uuid;

use crate::calendar::ports::Lookups;
use crate::error::ServiceResult;

/// Everything that decides which events a viewer may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerScopes {
    pub organization_id: Uuid,
    /// Actively enrolled sections together with staffed sections.
    pub section_ids: BTreeSet<Uuid>,
    pub cohort_ids: BTreeSet<Uuid>,
}

/// ## Summary
/// Resolves the organization, sections and cohorts of a viewer.
///
/// The organization lookup runs first. The enrollment, staffing and cohort
/// lookups then run concurrently; a failure in any of them is logged and
/// treated as an empty result.
///
/// ## Errors
/// Returns `ServiceError::NotFound` when the viewer is unknown or deleted, or the
/// organization lookup's own error.
#[tracing::instrument(skip(lookups))]
pub async fn resolve_viewer_scopes(lookups: &Lookups, viewer_id: Uuid) -> ServiceResult<ViewerScopes> {
    let organization_id = lookups.organizations.get_id_for_user(viewer_id).await?;

    let (enrolled, staffed, cohorts) = tokio::join!(
        lookups.enrollments.get_active_section_ids(viewer_id),
        lookups.staffing.get_section_ids(viewer_id),
        lookups.cohorts.get_ids_for_user(viewer_id),
    );

    let mut section_ids = BTreeSet::new();
    section_ids.extend(or_empty("enrollment", viewer_id, enrolled));
    section_ids.extend(or_empty("section staffing", viewer_id, staffed));
    let cohort_ids = or_empty("cohort membership", viewer_id, cohorts)
        .into_iter()
        .collect();

    let scopes = ViewerScopes {
        organization_id,
        section_ids,
        cohort_ids,
    };

    tracing::debug!(
        sections = scopes.section_ids.len(),
        cohorts = scopes.cohort_ids.len(),
        "Viewer scopes resolved"
    );

    Ok(scopes)
}

fn or_empty(source: &'static str, viewer_id: Uuid, result: ServiceResult<Vec<Uuid>>) -> Vec<Uuid> {
    result.unwrap_or_else(|err| {
        tracing::warn!(
            %viewer_id,
            source,
            error = %err,
            "Membership lookup failed; continuing without it"
        );
        Vec::new()
    })
}
