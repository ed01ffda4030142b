use serde::{Deserialize, Serialize};

/// Why a locally synthesized result was returned instead of a model-produced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No API key configured; the provider was never called.
    ProviderDisabled,
    ServiceUnavailable,
    AuthFailure,
    QuotaExceeded,
    MalformedResponse,
    UnexpectedError,
    /// Resume or job description text was empty.
    MissingInput,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::ProviderDisabled => "provider_disabled",
            FallbackReason::ServiceUnavailable => "service_unavailable",
            FallbackReason::AuthFailure => "auth_failure",
            FallbackReason::QuotaExceeded => "quota_exceeded",
            FallbackReason::MalformedResponse => "malformed_response",
            FallbackReason::UnexpectedError => "unexpected_error",
            FallbackReason::MissingInput => "missing_input",
        }
    }
}

/// Where a result came from, so the UI can disclose demo mode:
/// `{"source": "llm"}` or `{"source": "fallback", "reason": "quota_exceeded"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    Llm,
    Fallback { reason: FallbackReason },
}

impl Provenance {
    pub fn fallback(reason: FallbackReason) -> Self {
        Provenance::Fallback { reason }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Provenance::Fallback { .. })
    }

    pub fn reason(&self) -> Option<FallbackReason> {
        match self {
            Provenance::Llm => None,
            Provenance::Fallback { reason } => Some(*reason),
        }
    }
}
