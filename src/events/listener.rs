use async_trait::async_trait;

use super::AuthEvent;

/// Trait for handling authentication events asynchronously.
///
/// # Example
///
/// ```rust,ignore
/// use jwt_session::events::{AuthEvent, Listener};
/// use async_trait::async_trait;
///
/// struct FailedLoginCounter(std::sync::atomic::AtomicU64);
///
/// #[async_trait]
/// impl Listener for FailedLoginCounter {
///     async fn handle(&self, event: &AuthEvent) {
///         if let AuthEvent::LoginFailed { .. } = event {
///             self.0.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event; filter by matching on the variant.
    async fn handle(&self, event: &AuthEvent);
}
