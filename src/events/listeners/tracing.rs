use async_trait::async_trait;

use crate::events::{AuthEvent, Listener};

/// Emits authentication events as tracing events.
///
/// Requires the `tracing` feature.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &AuthEvent) {
        tracing::info!(
            target: "jwt_session::events",
            event_name = event.name(),
            at = %event.timestamp(),
            ?event,
            "auth event"
        );
    }
}
