//! Request validation.

use notify_core::{PushError, PushRequest};

/// Recipient cap for a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecipientLimit {
    /// Operator-configured cap, 0 meaning none.
    pub configured: usize,
    /// Hard ceiling imposed by the delivery provider, if any.
    pub provider_cap: Option<usize>,
}

impl RecipientLimit {
    pub fn new(configured: usize, provider_cap: Option<usize>) -> Self {
        Self {
            configured,
            provider_cap,
        }
    }

    /// Effective number of recipients allowed, 0 meaning unlimited.
    ///
    /// An unset configured cap still leaves the provider ceiling in force.
    pub fn allowed(&self) -> usize {
        match (self.configured, self.provider_cap) {
            (0, Some(cap)) => cap,
            (configured, Some(cap)) => configured.min(cap),
            (configured, None) => configured,
        }
    }
}

/// Check a request against the recipient cap.
pub fn validate(request: &PushRequest, limit: RecipientLimit) -> Result<(), PushError> {
    let allowed = limit.allowed();

    if allowed > 0 && request.recipients.len() > allowed {
        return Err(PushError::RecipientLimitExceeded { allowed });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(n: usize) -> PushRequest {
        PushRequest {
            recipients: (0..n).map(|i| format!("t{i}")).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_effective_cap() {
        assert_eq!(RecipientLimit::new(0, None).allowed(), 0);
        assert_eq!(RecipientLimit::new(0, Some(500)).allowed(), 500);
        assert_eq!(RecipientLimit::new(2, Some(500)).allowed(), 2);
        assert_eq!(RecipientLimit::new(900, Some(500)).allowed(), 500);
        assert_eq!(RecipientLimit::new(7, None).allowed(), 7);
    }

    #[test]
    fn test_rejects_over_cap() {
        let err = validate(&request(3), RecipientLimit::new(2, Some(500))).unwrap_err();
        assert!(matches!(err, PushError::RecipientLimitExceeded { allowed: 2 }));
    }

    #[test]
    fn test_accepts_at_cap_and_empty() {
        assert!(validate(&request(2), RecipientLimit::new(2, None)).is_ok());
        assert!(validate(&request(0), RecipientLimit::new(2, None)).is_ok());
    }

    #[test]
    fn test_unset_cap_is_unlimited_without_provider_ceiling() {
        assert!(validate(&request(10_000), RecipientLimit::default()).is_ok());
        assert!(validate(&request(501), RecipientLimit::new(0, Some(500))).is_err());
    }
}
