// src/providers/mod.rs

use crate::errors::Result;
use crate::models::EvaluationRequest;

pub mod gemini;
#[cfg(test)]
pub mod mock;

/// A single delivery attempt to a scoring backend.
///
/// Implementations perform exactly one request and report failures as-is;
/// retrying is layered on top by [`crate::retry::RetryingRequester`].
///
/// Note: We're not using async_trait here, so implementers must handle async directly.
pub trait LlmProvider: Send + Sync {
    /// Sends the evaluation and returns the decoded JSON body of a successful response.
    ///
    /// # Errors
    /// * `EvalError::Request` when the transport fails.
    /// * `EvalError::ApiError` for any non-success status.
    /// * `EvalError::InvalidBody` when a success response is not JSON.
    fn send(
        &self,
        request: &EvaluationRequest,
    ) -> impl std::future::Future<Output = Result<serde_json::Value>> + Send;
}
