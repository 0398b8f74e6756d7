use crate::error::DbResult;
use std::future::Future;
use std::pin::Pin;

pub mod connection;
pub mod enums;
pub mod migrate;
pub mod query;
pub mod schema;

/// Source of pooled connections. Implemented by the bb8 pool; the service layer
/// holds it as `Arc<dyn DbProvider>`.
pub trait DbProvider: Send + Sync {
    fn get_connection<'a>(
        &'a self,
    ) -> Pin<Box<dyn Future<Output = DbResult<connection::DbConnection<'a>>> + Send + 'a>>;
}
