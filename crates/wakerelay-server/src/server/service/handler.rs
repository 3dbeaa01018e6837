//! Register and claim operations backing the broker routes.
//!
//! [`BrokerService`] owns the process-wide [`RequestStore`]. It is cloned into
//! every request handler; clones share the same store.

use crate::server::telemetry::{increment_claims, increment_registrations};
use std::sync::Arc;
use wakerelay::{Ack, Claim, RequestStore};

#[derive(Clone, Debug, Default)]
pub struct BrokerService {
    store: Arc<RequestStore>,
}

impl BrokerService {
    pub fn new(store: Arc<RequestStore>) -> Self {
        Self { store }
    }

    /// Records a pending wake request for `id`.
    ///
    /// Always accepted. A request already pending for `id` is replaced.
    #[tracing::instrument(skip(self, payload))]
    pub fn register(&self, id: String, payload: String) -> Ack {
        if let Some(previous) = self.store.put(id, payload) {
            tracing::info!(%previous, "Replaced pending request");
        } else {
            tracing::info!("Registered pending request");
        }
        increment_registrations();
        Ack
    }

    /// Claims the pending request for `id`, removing it from the store.
    #[tracing::instrument(skip(self))]
    pub fn claim(&self, id: &str) -> Claim {
        let claim = Claim::from(self.store.take(id));
        if claim.is_found() {
            tracing::info!("Pending request claimed");
        } else {
            tracing::trace!("Nothing pending");
        }
        increment_claims(claim.is_found());
        claim
    }

    /// Number of requests waiting to be claimed.
    pub fn pending(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_then_claim_once() {
        let service = BrokerService::default();
        assert_eq!(
            service.register("A".to_string(), "DE:AD:BE:EF:00:01".to_string()),
            Ack
        );
        assert_eq!(service.pending(), 1);

        assert_eq!(
            service.claim("A"),
            Claim::Found("DE:AD:BE:EF:00:01".to_string())
        );
        assert_eq!(service.claim("A"), Claim::NotFound);
        assert_eq!(service.pending(), 0);
    }

    #[test]
    fn clones_share_the_store() {
        let service = BrokerService::default();
        let other = service.clone();
        service.register("A".to_string(), "payload".to_string());
        assert_eq!(other.claim("A"), Claim::Found("payload".to_string()));
        assert_eq!(service.claim("A"), Claim::NotFound);
    }

    #[test]
    fn duplicate_registration_keeps_latest() {
        let service = BrokerService::default();
        service.register("A".to_string(), "11:11:11:11:11:11".to_string());
        service.register("A".to_string(), "22:22:22:22:22:22".to_string());
        assert_eq!(service.pending(), 1);
        assert_eq!(
            service.claim("A"),
            Claim::Found("22:22:22:22:22:22".to_string())
        );
    }
}
