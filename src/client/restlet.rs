//! NetSuite restlet gateway implementation

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info, warn};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client as HttpClient, RequestBuilder};
use url::Url;

use super::{CallContext, RestletApi, RestletRequest, oauth};
use crate::config::{Config, Credential};
use crate::error::{ApiError, Result};

/// Hard upper bound for one restlet call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Signed HTTP client for a single restlet endpoint.
///
/// Built once at startup and shared. The credential is read-only, so
/// concurrent calls need no locking; each call works on its own copy of the
/// endpoint URL.
pub struct RestletClient {
    http: HttpClient,
    credential: Option<Arc<Credential>>,
    timeout: Duration,
}

impl RestletClient {
    /// Create a client. `None` yields an explicitly unconfigured client.
    pub fn new(credential: Option<Credential>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Unavailable(e.to_string()))?;

        Ok(Self {
            http,
            credential: credential.map(Arc::new),
            timeout: REQUEST_TIMEOUT,
        })
    }

    /// Create a client from loaded configuration.
    ///
    /// Incomplete configuration is logged and produces an unconfigured
    /// client rather than an error.
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.credential() {
            Ok(credential) => {
                debug!("NetSuite client configured for account {}", credential.account_id);
                Self::new(Some(credential))
            }
            Err(e) => {
                warn!("NetSuite client not configured: {}", e);
                Self::new(None)
            }
        }
    }

    /// Sign and send, returning the raw body on 2xx.
    async fn execute(&self, builder: RequestBuilder) -> std::result::Result<Bytes, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.as_u16() >= 400 {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        Ok(body)
    }
}

/// Copy of `endpoint` with `params` set on its query string.
///
/// Keys in `params` replace any existing values for that key. Pairs are
/// ordered by key so the wire URL is stable.
pub(crate) fn merged_url(endpoint: &Url, params: &[(String, String)]) -> Url {
    let mut pairs: Vec<(String, String)> = endpoint
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    for (key, value) in params {
        pairs.retain(|(k, _)| k != key);
        pairs.push((key.clone(), value.clone()));
    }
    pairs.sort_by(|a, b| a.0.cmp(&b.0));

    let mut url = endpoint.clone();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
    url
}

#[async_trait]
impl RestletApi for RestletClient {
    fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn invoke(&self, ctx: &CallContext, request: RestletRequest) -> Result<Bytes> {
        let credential = self.credential.as_ref().ok_or(ApiError::NotConfigured)?;
        let action = request.action().unwrap_or("-").to_string();
        if ctx.is_cancelled() {
            warn!("NetSuite call cancelled before sending: action={}", action);
            return Err(ApiError::Cancelled.into());
        }

        let url = merged_url(&credential.endpoint, &request.params);
        let payload = match &request.body {
            Some(body) => serde_json::to_vec(body)?,
            None => Vec::new(),
        };
        let authorization = oauth::authorization_header(&request.method, &url, credential)?;

        let builder = self
            .http
            .request(request.method.clone(), url.clone())
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload);

        let deadline = ctx.effective_deadline(self.timeout);
        let outcome = tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(ApiError::Cancelled),
            result = tokio::time::timeout_at(deadline, self.execute(builder)) => match result {
                Ok(result) => result,
                Err(_) => Err(ApiError::Unavailable("request timed out".to_string())),
            },
        };

        match &outcome {
            Ok(body) => info!("NetSuite success: action={} bytes={}", action, body.len()),
            Err(ApiError::Upstream { status, body }) => warn!(
                "NetSuite error: action={} status={} url={} response={}",
                action, status, url, body
            ),
            Err(e) => warn!("NetSuite call failed: action={} error={}", action, e),
        }

        outcome.map_err(Into::into)
    }
}
