use std::time::Duration;

/// Route component constants shared across crates
pub const API_ROUTE_COMPONENT: &str = "api";
pub const API_ROUTE_PREFIX: &str = const_str::concat!("/", API_ROUTE_COMPONENT);

pub const EVENTS_ROUTE_COMPONENT: &str = "events";
pub const EVENTS_ROUTE_PREFIX: &str =
    const_str::concat!(API_ROUTE_PREFIX, "/", EVENTS_ROUTE_COMPONENT);

/// Namespace prefix for per-viewer calendar cache entries.
pub const CALENDAR_CACHE_NAMESPACE: &str = "events:cal";

/// Expiry applied to cached calendar reads.
pub const DEFAULT_CALENDAR_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/// Page size used when a caller asks for `limit = 0`.
pub const DEFAULT_EVENT_LIMIT: i64 = 50;
pub const DEFAULT_ANNOUNCEMENT_LIMIT: i64 = 10;
pub const DEFAULT_SECTION_SCHEDULE_LIMIT: i64 = 100;

/// Display color given to events created without one.
pub const DEFAULT_EVENT_COLOR: &str = "#3B82F6";

/// Header carrying the caller's user id when running behind an authenticating proxy.
pub const DEFAULT_PROXY_USER_HEADER: &str = "X-User-Id";
