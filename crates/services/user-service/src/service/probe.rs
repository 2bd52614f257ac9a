//! Store reachability checks for the health endpoint.

use async_trait::async_trait;

use common::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Pings each backing store.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StoreProbe: Send + Sync {
    /// Round-trip to the document store
    async fn ping_documents(&self) -> AppResult<()>;

    /// Round-trip to the relational store
    async fn ping_relational(&self) -> AppResult<()>;
}
