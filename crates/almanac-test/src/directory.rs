use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use uuid::Uuid;

use almanac_service::calendar::{
    CohortLookup, CohortRef, EnrollmentLookup, OrganizationLookup, SectionRef,
    SectionStaffingLookup,
};
use almanac_service::error::{ServiceError, ServiceResult};

/// A lookup that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lookup {
    Organization,
    Enrollment,
    Staffing,
    Cohort,
}

#[derive(Default)]
struct State {
    users: HashMap<Uuid, Uuid>,
    cohorts: HashMap<Uuid, Uuid>,
    sections: HashMap<Uuid, Uuid>,
    enrollments: Vec<(Uuid, Uuid, bool)>,
    staffing: Vec<(Uuid, Uuid)>,
    cohort_members: Vec<(Uuid, Uuid)>,
    failing: HashSet<Lookup>,
}

/// Tenancy and membership data held in memory.
#[derive(Default)]
pub struct MemoryDirectory {
    state: Mutex<State>,
}

impl MemoryDirectory {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_user(&self, user_id: Uuid, organization_id: Uuid) {
        self.state().users.insert(user_id, organization_id);
    }

    pub fn remove_user(&self, user_id: Uuid) {
        self.state().users.remove(&user_id);
    }

    pub fn add_cohort(&self, cohort_id: Uuid, organization_id: Uuid) {
        self.state().cohorts.insert(cohort_id, organization_id);
    }

    pub fn add_section(&self, section_id: Uuid, cohort_id: Uuid) {
        self.state().sections.insert(section_id, cohort_id);
    }

    pub fn enroll(&self, user_id: Uuid, section_id: Uuid) {
        self.state().enrollments.push((user_id, section_id, true));
    }

    /// A completed or dropped enrollment, which grants no visibility.
    pub fn enroll_inactive(&self, user_id: Uuid, section_id: Uuid) {
        self.state().enrollments.push((user_id, section_id, false));
    }

    pub fn staff(&self, user_id: Uuid, section_id: Uuid) {
        self.state().staffing.push((user_id, section_id));
    }

    pub fn join_cohort(&self, user_id: Uuid, cohort_id: Uuid) {
        self.state().cohort_members.push((user_id, cohort_id));
    }

    pub fn fail(&self, lookup: Lookup) {
        self.state().failing.insert(lookup);
    }

    fn check(&self, lookup: Lookup) -> ServiceResult<()> {
        if self.state().failing.contains(&lookup) {
            return Err(ServiceError::StoreUnavailable(format!(
                "{lookup:?} lookup offline"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizationLookup for MemoryDirectory {
    async fn get_id_for_user(&self, user_id: Uuid) -> ServiceResult<Uuid> {
        self.check(Lookup::Organization)?;
        self.state()
            .users
            .get(&user_id)
            .copied()
            .ok_or_else(|| ServiceError::NotFound(format!("user {user_id}")))
    }
}

#[async_trait]
impl EnrollmentLookup for MemoryDirectory {
    async fn get_active_section_ids(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        self.check(Lookup::Enrollment)?;
        Ok(self
            .state()
            .enrollments
            .iter()
            .filter(|(user, _, active)| *user == user_id && *active)
            .map(|(_, section, _)| *section)
            .collect())
    }
}

#[async_trait]
impl SectionStaffingLookup for MemoryDirectory {
    async fn get_section_ids(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        self.check(Lookup::Staffing)?;
        Ok(self
            .state()
            .staffing
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, section)| *section)
            .collect())
    }

    async fn get_by_id(&self, section_id: Uuid) -> ServiceResult<SectionRef> {
        self.state()
            .sections
            .get(&section_id)
            .map(|cohort_id| SectionRef {
                id: section_id,
                cohort_id: *cohort_id,
            })
            .ok_or_else(|| ServiceError::NotFound(format!("section {section_id}")))
    }
}

#[async_trait]
impl CohortLookup for MemoryDirectory {
    async fn get_ids_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Uuid>> {
        self.check(Lookup::Cohort)?;
        Ok(self
            .state()
            .cohort_members
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, cohort)| *cohort)
            .collect())
    }

    async fn get_by_id(&self, cohort_id: Uuid) -> ServiceResult<CohortRef> {
        self.state()
            .cohorts
            .get(&cohort_id)
            .map(|organization_id| CohortRef {
                id: cohort_id,
                organization_id: *organization_id,
            })
            .ok_or_else(|| ServiceError::NotFound(format!("cohort {cohort_id}")))
    }
}
