//! Mock restlet gateway for testing
//!
//! Implements `RestletApi` without any network access so cache and service
//! logic can be tested in isolation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use super::{Action, CallContext, RestletApi, RestletRequest};
use crate::error::{ApiError, Result};

/// Mock restlet for testing.
///
/// # Example
/// ```ignore
/// let mock = MockRestlet::new()
///     .with_response(Action::Employees, r#"[{"id":"1"}]"#)
///     .await;
/// ```
pub struct MockRestlet {
    configured: bool,
    /// Response body per restlet action name
    responses: Arc<Mutex<HashMap<String, Bytes>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Artificial latency before answering
    delay: Duration,
    /// Every request received, in order
    captured: Arc<Mutex<Vec<RestletRequest>>>,
}

impl Default for MockRestlet {
    fn default() -> Self {
        Self {
            configured: true,
            responses: Arc::new(Mutex::new(HashMap::new())),
            error: Arc::new(Mutex::new(None)),
            delay: Duration::ZERO,
            captured: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockRestlet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that reports itself unconfigured and rejects every call.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::default()
        }
    }

    /// Configure the body returned for an action.
    pub async fn with_response(self, action: Action, body: impl Into<Bytes>) -> Self {
        self.set_response(action, body).await;
        self
    }

    /// Configure an error to return on the next call.
    pub async fn with_error(self, error: ApiError) -> Self {
        self.set_error(error).await;
        self
    }

    /// Delay every answer by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the body returned for an action.
    pub async fn set_response(&self, action: Action, body: impl Into<Bytes>) {
        self.responses
            .lock()
            .await
            .insert(action.restlet_name().to_string(), body.into());
    }

    /// Fail the next call with `error`.
    pub async fn set_error(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Number of calls received so far.
    pub async fn call_count(&self) -> usize {
        self.captured.lock().await.len()
    }

    /// Number of calls received for one action.
    pub async fn calls_for(&self, action: Action) -> usize {
        self.captured
            .lock()
            .await
            .iter()
            .filter(|r| r.action() == Some(action.restlet_name()))
            .count()
    }

    /// All captured requests.
    pub async fn captured(&self) -> Vec<RestletRequest> {
        self.captured.lock().await.clone()
    }
}

#[async_trait]
impl RestletApi for MockRestlet {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn invoke(&self, ctx: &CallContext, request: RestletRequest) -> Result<Bytes> {
        if !self.configured {
            return Err(ApiError::NotConfigured.into());
        }

        let action = request.action().unwrap_or_default().to_string();
        self.captured.lock().await.push(request);

        if !self.delay.is_zero() {
            tokio::select! {
                biased;
                _ = ctx.cancelled() => return Err(ApiError::Cancelled.into()),
                _ = tokio::time::sleep(self.delay) => {}
            }
        } else if ctx.is_cancelled() {
            return Err(ApiError::Cancelled.into());
        }

        if let Some(error) = self.error.lock().await.take() {
            return Err(error.into());
        }

        self.responses
            .lock()
            .await
            .get(&action)
            .cloned()
            .ok_or_else(|| {
                ApiError::Upstream {
                    status: 400,
                    body: format!("unsupported action: {}", action),
                }
                .into()
            })
    }
}
