//! JSON HTTP surface over `RequisitionService`

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde_json::{Map, Value, json};
use tokio::net::TcpListener;

use crate::cache::Dataset;
use crate::client::models::RequisitionDraft;
use crate::client::{Action, CallContext, RestletApi};
use crate::error::{ApiError, Error, Result};
use crate::service::RequisitionService;

/// Build the router for a shared service
pub fn router<C>(service: Arc<RequisitionService<C>>) -> Router
where
    C: RestletApi + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler::<C>))
        .route("/api/requisitions", post(create_handler::<C>))
        .route("/api/{resource}", get(resource_handler::<C>))
        .with_state(service)
}

/// Serve until Ctrl+C
pub async fn serve<C>(service: Arc<RequisitionService<C>>, port: u16) -> Result<()>
where
    C: RestletApi + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("reqgate v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);
    if !service.is_configured() {
        warn!("NetSuite restlet is not configured; API calls will fail with 503");
    }

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn health_handler<C: RestletApi + 'static>(
    State(service): State<Arc<RequisitionService<C>>>,
) -> impl IntoResponse {
    let cache: Map<String, Value> = Dataset::ALL
        .into_iter()
        .map(|d| {
            let age = service.cache().age(d).map(|a| a.as_secs());
            (d.to_string(), json!(age))
        })
        .collect();

    Json(json!({
        "status": "ok",
        "configured": service.is_configured(),
        "cacheAgeSecs": cache,
    }))
}

/// GET /api/{resource} - pass the restlet's JSON straight through
///
/// Calls carry no token of their own: a client that disconnects drops this
/// future, which abandons the in-flight restlet call.
async fn resource_handler<C: RestletApi + 'static>(
    State(service): State<Arc<RequisitionService<C>>>,
    Path(resource): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let action = match resource.parse::<Action>() {
        Ok(action) => action,
        Err(err) => return Error::from(err).into_response(),
    };

    match service
        .dispatch(&CallContext::background(), action, &params)
        .await
    {
        Ok(payload) => json_bytes(payload),
        Err(err) => err.into_response(),
    }
}

/// POST /api/requisitions
async fn create_handler<C: RestletApi + 'static>(
    State(service): State<Arc<RequisitionService<C>>>,
    body: Bytes,
) -> Response {
    let draft: RequisitionDraft = match serde_json::from_slice(&body) {
        Ok(draft) => draft,
        Err(e) => {
            return Error::from(ApiError::InvalidArgument(format!(
                "invalid requisition: {}",
                e
            )))
            .into_response();
        }
    };

    match service
        .create_requisition(&CallContext::background(), draft)
        .await
    {
        Ok(created) => Json(json!({
            "id": created.id,
            "tranId": created.tran_id,
            "message": created.message(),
        }))
        .into_response(),
        Err(err) => err.into_response(),
    }
}

fn json_bytes(payload: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
}

/// HTTP status for an error
pub fn status_code(err: &Error) -> StatusCode {
    match err.as_api() {
        Some(ApiError::NotConfigured) | Some(ApiError::Cancelled) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        Some(ApiError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
        Some(ApiError::UnknownAction(_)) => StatusCode::NOT_FOUND,
        Some(ApiError::Unavailable(_))
        | Some(ApiError::Upstream { .. })
        | Some(ApiError::InvalidResponse(_)) => StatusCode::BAD_GATEWAY,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = status_code(&self);
        if status.is_server_error() {
            warn!("Request failed ({}): {}", status.as_u16(), self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
