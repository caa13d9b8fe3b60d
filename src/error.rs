//! Error types for the job agent.
//!
//! Search and page-fetch failures never surface here; they degrade to less
//! evidence. These are the hard failures reported to API callers. No API
//! keys or passwords appear in messages.

/// Hard failures of the drafting and sending pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A service with no fallback has no credentials configured.
    #[error("{0} is not set.")]
    MissingCredential(&'static str),

    /// An upstream API call failed (transport error or non-2xx status).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// An upstream API answered with an unusable body.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Fact extraction never produced an acceptable founder.
    #[error("Could not confidently identify founder containing 'PR'.")]
    FounderNotFound,

    /// The generated draft kept failing validation.
    #[error("model did not produce a valid final response after {attempts} attempts")]
    InvalidDraft { attempts: u32 },

    /// SMTP delivery failed.
    #[error("mail error: {0}")]
    Mail(String),

    /// The caller supplied unusable input.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AgentError {
    /// Whether the caller, rather than the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

/// Convenience type alias for agent results.
pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_missing_credential() {
        let err = AgentError::MissingCredential("GEMINI_API_KEY");
        assert_eq!(err.to_string(), "GEMINI_API_KEY is not set.");
    }

    #[test]
    fn display_invalid_draft() {
        let err = AgentError::InvalidDraft { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "model did not produce a valid final response after 3 attempts"
        );
    }

    #[test]
    fn client_errors() {
        assert!(AgentError::InvalidRequest("to_email is required".into()).is_client_error());
        assert!(!AgentError::FounderNotFound.is_client_error());
        assert!(!AgentError::Mail("connection refused".into()).is_client_error());
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AgentError>();
    }
}
