//! Requisition operations
//!
//! `RequisitionService` is built once at startup and shared (behind an
//! `Arc`) by every inbound request. Reference datasets go through the
//! cache; searches, history and submissions go straight to the restlet.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use log::warn;

use crate::cache::{Dataset, ReferenceCache};
use crate::client::models::{
    CreateRequisitionRequest, CreatedRequisition, RequisitionDraft, RequisitionLine,
};
use crate::client::{Action, CallContext, RestletApi, RestletClient, RestletRequest};
use crate::error::{ApiError, Result};

const EMPTY_LIST: &[u8] = b"[]";

/// Longest payload excerpt written to logs
const LOG_PREVIEW_BYTES: usize = 500;

pub struct RequisitionService<C: RestletApi = RestletClient> {
    restlet: Arc<C>,
    cache: ReferenceCache<C>,
}

impl<C: RestletApi> RequisitionService<C> {
    pub fn new(restlet: Arc<C>) -> Self {
        let cache = ReferenceCache::new(restlet.clone());
        Self { restlet, cache }
    }

    pub fn is_configured(&self) -> bool {
        self.restlet.is_configured()
    }

    /// Reference-data cache, for health reporting
    pub fn cache(&self) -> &ReferenceCache<C> {
        &self.cache
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.restlet.is_configured() {
            Ok(())
        } else {
            Err(ApiError::NotConfigured.into())
        }
    }

    pub async fn employees(&self, ctx: &CallContext) -> Result<Bytes> {
        self.ensure_configured()?;
        self.cache.get(ctx, Dataset::Employees).await
    }

    pub async fn locations(&self, ctx: &CallContext) -> Result<Bytes> {
        self.ensure_configured()?;
        self.cache.get(ctx, Dataset::Locations).await
    }

    /// Item search. A blank query yields an empty list without a call.
    pub async fn search_items(&self, ctx: &CallContext, query: &str) -> Result<Bytes> {
        self.search(ctx, Action::Items, query).await
    }

    /// Vendor search. A blank query yields an empty list without a call.
    pub async fn search_vendors(&self, ctx: &CallContext, query: &str) -> Result<Bytes> {
        self.search(ctx, Action::Vendors, query).await
    }

    async fn search(&self, ctx: &CallContext, action: Action, query: &str) -> Result<Bytes> {
        self.ensure_configured()?;
        let query = query.trim();
        if query.is_empty() {
            return Ok(Bytes::from_static(EMPTY_LIST));
        }
        self.restlet
            .invoke(ctx, RestletRequest::get(action).param("q", query))
            .await
    }

    /// Vendors that supply an item, with their purchase prices
    pub async fn item_vendors(&self, ctx: &CallContext, item_id: &str) -> Result<Bytes> {
        self.ensure_configured()?;
        let item_id = required(item_id, "itemId")?;
        self.restlet
            .invoke(
                ctx,
                RestletRequest::get(Action::ItemVendors).param("itemId", item_id),
            )
            .await
    }

    /// Requisition lines previously submitted by an employee
    pub async fn requisition_history(
        &self,
        ctx: &CallContext,
        employee_id: &str,
    ) -> Result<Vec<RequisitionLine>> {
        self.ensure_configured()?;
        let employee_id = required(employee_id, "employeeId")?;
        let payload = self
            .restlet
            .invoke(
                ctx,
                RestletRequest::get(Action::Requests).param("employeeId", employee_id),
            )
            .await?;

        serde_json::from_slice(&payload).map_err(|e| {
            warn!(
                "JSON unmarshal error: {}, payload: {}",
                e,
                preview(&payload)
            );
            ApiError::InvalidResponse("unexpected requisition history format".to_string()).into()
        })
    }

    /// Validate a draft and submit it as a new requisition.
    ///
    /// Succeeds only if the restlet answers with a record id.
    pub async fn create_requisition(
        &self,
        ctx: &CallContext,
        draft: RequisitionDraft,
    ) -> Result<CreatedRequisition> {
        self.ensure_configured()?;
        let draft = validate_draft(draft)?;

        let body = serde_json::to_value(CreateRequisitionRequest {
            action: Action::CreateRequisition.restlet_name(),
            draft,
        })?;
        let payload = self.restlet.invoke(ctx, RestletRequest::post(body)).await?;

        match serde_json::from_slice::<CreatedRequisition>(&payload) {
            Ok(created) if !created.id.is_empty() => Ok(created),
            Ok(_) => Err(ApiError::InvalidResponse(format!(
                "no requisition id in response: {}",
                preview(&payload)
            ))
            .into()),
            Err(e) => Err(ApiError::InvalidResponse(format!(
                "{}: {}",
                e,
                preview(&payload)
            ))
            .into()),
        }
    }

    /// Run a read action with loosely typed parameters.
    ///
    /// This is the entry point for the HTTP layer, which resolves the
    /// action from the route before calling in.
    pub async fn dispatch(
        &self,
        ctx: &CallContext,
        action: Action,
        params: &HashMap<String, String>,
    ) -> Result<Bytes> {
        let param = |key: &str| params.get(key).map(String::as_str).unwrap_or_default();

        match action {
            Action::Employees => self.employees(ctx).await,
            Action::Locations => self.locations(ctx).await,
            Action::Items => self.search_items(ctx, param("q")).await,
            Action::Vendors => self.search_vendors(ctx, param("q")).await,
            Action::ItemVendors => self.item_vendors(ctx, param("itemId")).await,
            Action::Requests => {
                let lines = self.requisition_history(ctx, param("employeeId")).await?;
                Ok(Bytes::from(serde_json::to_vec(&lines)?))
            }
            Action::CreateRequisition => Err(ApiError::InvalidArgument(
                "requisitions are created with POST".to_string(),
            )
            .into()),
        }
    }
}

fn required<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidArgument(format!("{} is required", name)).into());
    }
    Ok(value)
}

fn validate_draft(draft: RequisitionDraft) -> Result<RequisitionDraft> {
    let draft = draft.normalized();
    let problem = if draft.requestor_id.is_empty() {
        Some("select your name first")
    } else if draft.subsidiary.is_empty() {
        Some("subsidiary is required")
    } else if draft.items.is_empty() {
        Some("add at least one item")
    } else if draft.items.iter().any(|i| i.item_id.trim().is_empty()) {
        Some("every item needs an itemId")
    } else if draft.items.iter().any(|i| !i.quantity.is_finite() || i.quantity <= 0.0) {
        Some("item quantities must be greater than zero")
    } else {
        None
    };

    match problem {
        Some(msg) => Err(ApiError::InvalidArgument(msg.to_string()).into()),
        None => Ok(draft),
    }
}

fn preview(payload: &[u8]) -> String {
    let end = payload.len().min(LOG_PREVIEW_BYTES);
    String::from_utf8_lossy(&payload[..end]).into_owned()
}
