//! Provider/fallback dispatch.
//!
//! Every LLM-backed stage runs as two steps: try the remote call, and on any
//! `LlmError` hand the failure's reason code to a local fallback. The remote
//! failure is logged here and never reaches the caller.

use std::future::Future;

use tracing::{error, info, warn};

use crate::llm_client::LlmError;
use crate::models::provenance::FallbackReason;

impl From<&LlmError> for FallbackReason {
    fn from(err: &LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => FallbackReason::ProviderDisabled,
            LlmError::Unavailable(_) => FallbackReason::ServiceUnavailable,
            LlmError::Auth { .. } => FallbackReason::AuthFailure,
            LlmError::QuotaExceeded(_) => FallbackReason::QuotaExceeded,
            LlmError::Parse(_) | LlmError::EmptyContent => FallbackReason::MalformedResponse,
            LlmError::Api { .. } | LlmError::Unexpected(_) => FallbackReason::UnexpectedError,
        }
    }
}

/// Awaits `remote`; on failure logs it under `stage` and returns `fallback(reason)`.
pub async fn remote_or_fallback<T, Fut, F>(stage: &'static str, remote: Fut, fallback: F) -> T
where
    Fut: Future<Output = Result<T, LlmError>>,
    F: FnOnce(FallbackReason) -> T,
{
    match remote.await {
        Ok(value) => value,
        Err(err) => {
            let reason = FallbackReason::from(&err);
            match reason {
                FallbackReason::ProviderDisabled => {
                    info!(stage, reason = reason.as_str(), "LLM provider disabled, using fallback")
                }
                FallbackReason::UnexpectedError => {
                    error!(stage, reason = reason.as_str(), error = ?err, "Unexpected LLM failure, using fallback")
                }
                _ => warn!(stage, reason = reason.as_str(), "LLM call failed ({err}), using fallback"),
            }
            fallback(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_maps_to_one_reason() {
        let cases = vec![
            (LlmError::MissingApiKey, FallbackReason::ProviderDisabled),
            (
                LlmError::Unavailable("connection refused".into()),
                FallbackReason::ServiceUnavailable,
            ),
            (
                LlmError::Auth {
                    status: 401,
                    message: "bad key".into(),
                },
                FallbackReason::AuthFailure,
            ),
            (
                LlmError::QuotaExceeded("insufficient_quota".into()),
                FallbackReason::QuotaExceeded,
            ),
            (LlmError::EmptyContent, FallbackReason::MalformedResponse),
            (
                LlmError::Parse(serde_json::from_str::<serde_json::Value>("nope").unwrap_err()),
                FallbackReason::MalformedResponse,
            ),
            (
                LlmError::Api {
                    status: 400,
                    message: "bad".into(),
                },
                FallbackReason::UnexpectedError,
            ),
            (
                LlmError::Unexpected("boom".into()),
                FallbackReason::UnexpectedError,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(FallbackReason::from(&err), expected, "for {err:?}");
        }
    }

    #[tokio::test]
    async fn test_success_skips_fallback() {
        let value = remote_or_fallback("test", async { Ok::<_, LlmError>(7) }, |_| {
            panic!("fallback must not run")
        })
        .await;
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn test_failure_passes_reason_to_fallback() {
        let value = remote_or_fallback(
            "test",
            async { Err::<u32, _>(LlmError::QuotaExceeded("limit".into())) },
            |reason| {
                assert_eq!(reason, FallbackReason::QuotaExceeded);
                99
            },
        )
        .await;
        assert_eq!(value, 99);
    }
}
