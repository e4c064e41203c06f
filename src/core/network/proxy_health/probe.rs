//! Shared HTTP probe primitive
//!
//! Executes one request through a [`ProbeClient`] and folds the response (or
//! transport failure) into a [`ProbeResult`] using a stage-specific classifier.

use crate::core::network::proxy_health::classify::{body_preview, Verdict};
use crate::core::network::proxy_health::client::{ProbeClient, ProbeRequest, ProbeResponse};
use crate::core::network::types::ProbeResult;
use std::time::Instant;

/// Execute a probe and classify it
///
/// Never fails: transport errors become a negative result with status 0.
/// Elapsed time is the client-reported duration when a response arrives,
/// otherwise the wall-clock time until the failure.
pub async fn run_probe<F>(client: &dyn ProbeClient, request: ProbeRequest, classify: F) -> ProbeResult
where
    F: Fn(Result<&ProbeResponse, &str>) -> Verdict,
{
    let start = Instant::now();

    match client.execute(request).await {
        Ok(response) => {
            let verdict = classify(Ok(&response));
            ProbeResult {
                success: verdict.is_pass(),
                status_code: response.status_code,
                elapsed: response.duration,
                error: verdict.reason(),
                body_preview: body_preview(&response.body),
            }
        }
        Err(error) => {
            let verdict = classify(Err(&error));
            ProbeResult::transport_failure(
                verdict.reason().unwrap_or(error),
                start.elapsed(),
            )
        }
    }
}
