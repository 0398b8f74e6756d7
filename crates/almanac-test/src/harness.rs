use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use salvo::{Router, Service};
use uuid::Uuid;

use almanac_app::calendar_handler::CalendarServiceHandler;
use almanac_app::config::ConfigHandler;
use almanac_core::config::{
    AuthConfig, AuthMethod, CacheBackend, CacheConfig, DatabaseConfig, LoggingConfig,
    ProxyAuthConfig, ServerConfig, Settings,
};
use almanac_core::event::TimeWindow;
use almanac_service::calendar::cache::calendar_key;
use almanac_service::calendar::{
    CacheError, CalendarCache, CalendarService, Lookups, MemoryCache,
};

use crate::directory::MemoryDirectory;
use crate::store::MemoryEventStore;

/// Midnight UTC on the given day of January 2025.
///
/// ## Panics
/// Panics for days January does not have.
#[must_use]
pub fn jan(day: u32) -> DateTime<Utc> {
    at(day, 0, 0)
}

/// The given time of day on a day of January 2025.
///
/// ## Panics
/// Panics for an out-of-range date or time.
#[expect(clippy::expect_used, reason = "test fixture dates are literals")]
#[must_use]
pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, minute, 0)
        .single()
        .expect("valid January 2025 timestamp")
}

#[must_use]
pub const fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> TimeWindow {
    TimeWindow::new(start, end)
}

/// Cache whose every operation fails, as an unreachable backend would.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCache;

#[async_trait]
impl CalendarCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }

    async fn scan_and_delete(&self, _pattern: &str) -> Result<u64, CacheError> {
        Err(CacheError::Unavailable("connection refused".to_string()))
    }
}

/// A calendar service over in-memory storage, with handles on each part.
pub struct Harness {
    pub organization_id: Uuid,
    pub store: MemoryEventStore,
    pub directory: Arc<MemoryDirectory>,
    pub cache: MemoryCache,
    pub service: Arc<CalendarService>,
}

impl Harness {
    /// One organization, an empty directory and a real in-memory cache.
    #[must_use]
    pub fn new() -> Self {
        let cache = MemoryCache::new(1_000);
        Self::with_cache(cache.clone(), Arc::new(cache))
    }

    /// Same as [`Harness::new`] but the service talks to `backend`; `cache`
    /// stays reachable for inspection.
    #[must_use]
    pub fn with_cache(cache: MemoryCache, backend: Arc<dyn CalendarCache>) -> Self {
        let store = MemoryEventStore::default();
        let directory = Arc::new(MemoryDirectory::default());
        let service = CalendarService::new(
            Arc::new(store.clone()),
            Lookups::from_directory(Arc::clone(&directory)),
            backend,
        );

        Self {
            organization_id: Uuid::now_v7(),
            store,
            directory,
            cache,
            service: Arc::new(service),
        }
    }

    /// Registers a user in the harness organization.
    #[must_use]
    pub fn user(&self) -> Uuid {
        let user = Uuid::now_v7();
        self.directory.add_user(user, self.organization_id);
        user
    }

    /// Registers a section under a fresh cohort of the harness organization.
    #[must_use]
    pub fn section(&self) -> Uuid {
        let cohort = self.cohort();
        let section = Uuid::now_v7();
        self.directory.add_section(section, cohort);
        section
    }

    #[must_use]
    pub fn cohort(&self) -> Uuid {
        let cohort = Uuid::now_v7();
        self.directory.add_cohort(cohort, self.organization_id);
        cohort
    }

    /// Waits for the detached cache fill of a calendar read to land.
    ///
    /// ## Panics
    /// Panics when nothing is cached within two seconds.
    pub async fn wait_until_cached(&self, viewer: Uuid, window: &TimeWindow) {
        let key = calendar_key(viewer, window);
        for _ in 0..200 {
            if matches!(self.cache.get(&key).await, Ok(Some(_))) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("calendar for {viewer} was never cached");
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

/// Settings for a proxy-authenticated server using the default header.
#[must_use]
pub fn proxy_settings() -> Settings {
    Settings {
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        auth: AuthConfig {
            method: AuthMethod::Proxy,
            proxy: Some(ProxyAuthConfig { user_header: None }),
            single_user: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 5,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        cache: CacheConfig {
            backend: CacheBackend::Memory,
            ttl_secs: 60,
            max_capacity: 1_000,
        },
    }
}

/// The HTTP service as the binary assembles it, over `service`.
#[must_use]
pub fn router(settings: Settings, service: Arc<CalendarService>) -> Service {
    let router = Router::new()
        .hoop(ConfigHandler {
            settings: Arc::new(settings),
        })
        .hoop(CalendarServiceHandler { service })
        .push(almanac_app::app::api::routes());
    Service::new(router)
}
