//! Push error taxonomy.

/// Every way a push request can fail.
///
/// Client-caused failures are never retried; the rest mean the whole batch is
/// considered undelivered.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("unsupported Content Type: {0}")]
    UnsupportedContentType(String),

    #[error("{0}")]
    MalformedBody(String),

    #[error("too many recipients (allowed: {allowed})")]
    RecipientLimitExceeded { allowed: usize },

    /// Credential loading or provider client construction failed.
    #[error("{0:#}")]
    Setup(color_eyre::eyre::Report),

    /// The batch call itself could not be completed.
    #[error("{0:#}")]
    Provider(color_eyre::eyre::Report),

    /// The provider returned a different number of outcomes than units submitted.
    #[error("provider returned {outcomes} outcomes for {units} notifications")]
    ProtocolViolation { units: usize, outcomes: usize },
}

impl PushError {
    /// HTTP status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::UnsupportedContentType(_) => 415,
            Self::MalformedBody(_) => 422,
            Self::RecipientLimitExceeded { .. } => 403,
            Self::Setup(_) | Self::Provider(_) | Self::ProtocolViolation { .. } => 500,
        }
    }

    /// Whether the caller caused the failure.
    pub fn is_client_error(&self) -> bool {
        self.status() < 500
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_limit_message() {
        let e = PushError::RecipientLimitExceeded { allowed: 2 };
        assert_eq!(e.to_string(), "too many recipients (allowed: 2)");
        assert_eq!(e.status(), 403);
        assert!(e.is_client_error());
    }

    #[test]
    fn test_setup_renders_report_chain() {
        use color_eyre::eyre::WrapErr as _;

        let report = Err::<(), _>(std::io::Error::other("no such secret"))
            .wrap_err("cannot load credentials")
            .unwrap_err();
        let e = PushError::Setup(report);
        assert_eq!(e.to_string(), "cannot load credentials: no such secret");
        assert_eq!(e.status(), 500);
        assert!(!e.is_client_error());
    }
}
