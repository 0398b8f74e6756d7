use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use almanac_core::event::filter::sort_for_listing;
use almanac_core::event::{Event, EventFilter};
use almanac_service::calendar::EventStore;
use almanac_service::error::{ServiceError, ServiceResult};

/// Event store over a map, applying `EventFilter::matches` the way the
/// Postgres query applies its `WHERE` clause.
#[derive(Clone, Default)]
pub struct MemoryEventStore {
    events: Arc<Mutex<HashMap<Uuid, Event>>>,
    queries: Arc<AtomicUsize>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryEventStore {
    fn events(&self) -> MutexGuard<'_, HashMap<Uuid, Event>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of listing queries issued so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with `ServiceError::StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The stored record, deleted or not.
    #[must_use]
    pub fn raw(&self, id: Uuid) -> Option<Event> {
        self.events().get(&id).cloned()
    }

    fn check_available(&self) -> ServiceResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ServiceError::StoreUnavailable(
                "event store offline".to_string(),
            ));
        }
        Ok(())
    }
}

fn not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("event {id}"))
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create(&self, event: &Event) -> ServiceResult<Event> {
        self.check_available()?;
        self.events().insert(event.id, event.clone());
        Ok(event.clone())
    }

    async fn update(&self, event: &Event) -> ServiceResult<Event> {
        self.check_available()?;
        let mut events = self.events();
        match events.get_mut(&event.id) {
            Some(stored) if stored.is_active() => {
                *stored = Event {
                    organization_id: stored.organization_id,
                    created_at: stored.created_at,
                    ..event.clone()
                };
                Ok(stored.clone())
            }
            _ => Err(not_found(event.id)),
        }
    }

    async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> ServiceResult<()> {
        self.check_available()?;
        match self.events().get_mut(&id) {
            Some(stored) if stored.is_active() => {
                stored.deleted_at = Some(now);
                stored.updated_at = now;
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> ServiceResult<Event> {
        self.check_available()?;
        self.events()
            .get(&id)
            .filter(|event| event.is_active())
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn find(&self, filter: &EventFilter) -> ServiceResult<Vec<Event>> {
        self.check_available()?;
        if !filter.has_visibility() {
            return Ok(Vec::new());
        }
        self.queries.fetch_add(1, Ordering::SeqCst);

        let mut matching: Vec<Event> = self
            .events()
            .values()
            .filter(|event| filter.matches(event))
            .cloned()
            .collect();
        sort_for_listing(&mut matching);

        let offset = usize::try_from(filter.effective_offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.effective_limit()).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(offset).take(limit).collect())
    }
}
