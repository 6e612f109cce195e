//! Port reporting whether backing dependencies can serve traffic.

use async_trait::async_trait;

/// Dependency check consulted by the readiness endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Return `true` when the dependency answered.
    async fn is_ready(&self) -> bool;
}
