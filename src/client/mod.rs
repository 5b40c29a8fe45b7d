//! NetSuite restlet client

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ApiError, Result};

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod oauth;
pub mod restlet;

#[cfg(test)]
pub use mock::MockRestlet;
pub use restlet::RestletClient;

/// Restlet gateway trait.
///
/// One operation: send a signed call and hand back the raw response bytes.
/// The gateway does not interpret the payload.
#[async_trait]
pub trait RestletApi: Send + Sync {
    /// Whether a complete credential is present. An unconfigured gateway
    /// fails every call with `ApiError::NotConfigured`.
    fn is_configured(&self) -> bool;

    /// Invoke the restlet.
    async fn invoke(&self, ctx: &CallContext, request: RestletRequest) -> Result<Bytes>;
}

/// Per-call deadline and cancellation signal.
///
/// The gateway always applies its own fixed timeout; a caller deadline can
/// only shorten it.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl CallContext {
    /// No caller deadline and never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// A timeout too large to represent leaves only the gateway's own limit.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// The earlier of `now + limit` and the caller deadline.
    pub fn effective_deadline(&self, limit: Duration) -> Instant {
        let fixed = Instant::now() + limit;
        match self.deadline {
            Some(deadline) => deadline.min(fixed),
            None => fixed,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the call has been cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// One restlet call: method, query parameters and optional JSON body.
#[derive(Debug, Clone)]
pub struct RestletRequest {
    pub method: Method,
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl RestletRequest {
    /// GET for a read action
    pub fn get(action: Action) -> Self {
        Self {
            method: Method::GET,
            params: vec![("action".to_string(), action.restlet_name().to_string())],
            body: None,
        }
    }

    /// POST with a JSON body; the action travels inside the body
    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: Method::POST,
            params: Vec::new(),
            body: Some(body),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Action name for logging, from the query or the body
    pub fn action(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == "action")
            .map(|(_, v)| v.as_str())
            .or_else(|| {
                self.body
                    .as_ref()
                    .and_then(|b| b.get("action"))
                    .and_then(|a| a.as_str())
            })
    }
}

/// Restlet actions reachable from the inbound surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Employees,
    Locations,
    Items,
    Vendors,
    ItemVendors,
    Requests,
    CreateRequisition,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Employees,
        Action::Locations,
        Action::Items,
        Action::Vendors,
        Action::ItemVendors,
        Action::Requests,
        Action::CreateRequisition,
    ];

    /// Name the restlet script dispatches on
    pub fn restlet_name(&self) -> &'static str {
        match self {
            Action::Employees => "employees",
            Action::Locations => "locations",
            Action::Items => "items",
            Action::Vendors => "vendors",
            Action::ItemVendors => "itemVendors",
            Action::Requests => "requests",
            Action::CreateRequisition => "createRequisition",
        }
    }

    /// Path segment under `/api/`
    pub fn route(&self) -> &'static str {
        match self {
            Action::Employees => "employees",
            Action::Locations => "locations",
            Action::Items => "items",
            Action::Vendors => "vendors",
            Action::ItemVendors => "item-vendors",
            Action::Requests => "requests",
            Action::CreateRequisition => "requisitions",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.restlet_name())
    }
}

impl FromStr for Action {
    type Err = ApiError;

    /// Parse a route segment
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.route() == s)
            .ok_or_else(|| ApiError::UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_action_route_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.route().parse::<Action>().unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action() {
        let err = "widgets".parse::<Action>().unwrap_err();
        assert!(matches!(err, ApiError::UnknownAction(ref s) if s == "widgets"));

        // Restlet names are not route names
        assert!("itemVendors".parse::<Action>().is_err());
    }

    #[test]
    fn test_request_action_from_query() {
        let req = RestletRequest::get(Action::ItemVendors).param("itemId", "42");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.action(), Some("itemVendors"));
        assert_eq!(req.params[1], ("itemId".to_string(), "42".to_string()));
    }

    #[test]
    fn test_request_action_from_body() {
        let req = RestletRequest::post(json!({"action": "createRequisition"}));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.action(), Some("createRequisition"));
        assert!(req.params.is_empty());
    }

    #[tokio::test]
    async fn test_effective_deadline_is_earlier_of_two() {
        let ctx = CallContext::background();
        let limit = Duration::from_secs(20);
        let before = Instant::now();
        let effective = ctx.effective_deadline(limit);
        assert!(effective >= before + limit);

        let ctx = CallContext::background().with_timeout(Duration::from_millis(100));
        assert!(ctx.effective_deadline(limit) <= Instant::now() + Duration::from_millis(100));

        let ctx = CallContext::background().with_timeout(Duration::from_secs(60));
        assert!(ctx.effective_deadline(limit) <= Instant::now() + limit);
    }

    #[tokio::test]
    async fn test_huge_timeout_falls_back_to_gateway_limit() {
        let ctx = CallContext::background().with_timeout(Duration::from_secs(u64::MAX));
        assert_eq!(ctx.deadline, None);

        let limit = Duration::from_secs(20);
        assert!(ctx.effective_deadline(limit) <= Instant::now() + limit);
    }

    #[tokio::test]
    async fn test_with_deadline_keeps_earliest() {
        let soon = Instant::now() + Duration::from_millis(10);
        let later = Instant::now() + Duration::from_secs(10);
        let ctx = CallContext::background().with_deadline(soon).with_deadline(later);
        assert_eq!(ctx.deadline, Some(soon));
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_cancellation(token.clone());
        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
    }
}
