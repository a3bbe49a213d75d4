//! Push pipeline.

use std::sync::Arc;

use notify_core::{PushError, PushRequest, PushResponse};
use notify_provider::ProviderSource;

use crate::{RecipientLimit, assemble, build, dispatch, reconcile, validate};

/// Handles push requests.
#[trait_variant::make(Send)]
pub trait Push: Send + Sync {
    /// Deliver a request and report per-recipient results.
    async fn push(&self, request: &PushRequest) -> Result<PushResponse, PushError>;
}

/// Validates, dispatches and reconciles push requests against one provider source.
///
/// Requests share nothing but the provider source; every intermediate value
/// lives for a single call.
pub struct PushService<S> {
    source: Arc<S>,
    limit: RecipientLimit,
}

impl<S> Clone for PushService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            limit: self.limit,
        }
    }
}

impl<S: ProviderSource> PushService<S> {
    /// Create a new push service.
    pub fn new(source: S, limit: RecipientLimit) -> Self {
        Self {
            source: Arc::new(source),
            limit,
        }
    }

    /// The provider source requests are dispatched through.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The recipient cap applied to requests.
    pub fn limit(&self) -> RecipientLimit {
        self.limit
    }
}

impl<S: ProviderSource> Push for PushService<S> {
    async fn push(&self, request: &PushRequest) -> Result<PushResponse, PushError> {
        validate(request, self.limit)?;

        let units = build(request);
        let outcomes = dispatch(self.source.as_ref(), &units).await?;

        // Nothing below awaits: once outcomes arrive the response is always complete.
        let response = assemble(reconcile(&units, outcomes)?);

        tracing::info!(
            recipients = units.len(),
            delivered = response.notifications_count,
            failed = response.errors_count,
            "push batch reconciled"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use notify_core::{DeliveryOutcome, Message, NotificationError};

    use super::*;
    use crate::testing::{BrokenSource, ScriptedProvider};

    fn request(recipients: &[&str]) -> PushRequest {
        PushRequest {
            recipients: recipients.iter().map(|r| r.to_string()).collect(),
            data: Default::default(),
            message: Some(Message {
                title: "Hi".into(),
                body: "there".into(),
            }),
        }
    }

    #[tokio::test]
    async fn test_mixed_outcomes_with_duplicate_recipients() {
        let service = PushService::new(
            ScriptedProvider::new(vec![
                DeliveryOutcome::success("m1"),
                DeliveryOutcome::failure("invalid token"),
                DeliveryOutcome::success("m2"),
            ]),
            RecipientLimit::default(),
        );

        let response = service.push(&request(&["t1", "t2", "t1"])).await.unwrap();

        assert_eq!(response.notifications_count, 2);
        assert_eq!(response.errors_count, 1);
        let mut delivered: Vec<(&str, &str)> = response
            .notifications
            .iter()
            .map(|n| (n.id.as_str(), n.recipient.as_str()))
            .collect();
        delivered.sort();
        assert_eq!(delivered, [("m1", "t1"), ("m2", "t1")]);
        assert_eq!(
            response.errors,
            vec![NotificationError {
                recipient: "t2".into(),
                message: "invalid token".into(),
            }]
        );
    }

    #[tokio::test]
    async fn test_empty_request_makes_no_provider_call() {
        let service = PushService::new(ScriptedProvider::new(Vec::new()), RecipientLimit::default());

        let response = service.push(&request(&[])).await.unwrap();
        assert_eq!(response, PushResponse::default());
        assert_eq!(service.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_cap_rejects_before_provider_call() {
        let service = PushService::new(
            ScriptedProvider::new(vec![DeliveryOutcome::success("m1"); 3]),
            RecipientLimit::new(2, Some(500)),
        );

        let err = service.push(&request(&["a", "b", "c"])).await.unwrap_err();
        assert_eq!(err.status(), 403);
        assert_eq!(err.to_string(), "too many recipients (allowed: 2)");
        assert_eq!(service.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_outcome_list_fails_whole_request() {
        let service = PushService::new(
            ScriptedProvider::new(vec![DeliveryOutcome::success("m1")]),
            RecipientLimit::default(),
        );

        let err = service.push(&request(&["t1", "t2"])).await.unwrap_err();
        assert!(matches!(err, PushError::ProtocolViolation { .. }));
        assert_eq!(err.status(), 500);
    }

    #[tokio::test]
    async fn test_setup_failure_is_internal_error() {
        let service = PushService::new(BrokenSource, RecipientLimit::default());

        let err = service.push(&request(&["t1"])).await.unwrap_err();
        assert!(matches!(err, PushError::Setup(_)));
        assert_eq!(err.to_string(), "cannot load secret ocid1.vaultsecret.oc1..x");
    }
}
