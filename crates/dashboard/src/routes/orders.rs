//! Order API route handlers.
//!
//! Thin glue: every handler resolves the session email, delegates to the
//! orchestration service, and serializes the result. Classification and
//! sorting live in `parceldeck-core`, never here.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parceldeck_core::{Bucket, DisplayOrder, OrderNumber};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::services::orders as service;
use crate::services::orders::NewOrdersSummary;
use crate::state::AppState;

/// Query parameters for the order list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Active bucket; defaults to Ready for Pickup like the dashboard's
    /// initial filter.
    pub bucket: Option<Bucket>,
}

/// JSON body of the order list response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// The bucket these rows belong to.
    pub bucket: Bucket,
    /// When the underlying classification was reconciled.
    pub reconciled_at: DateTime<Utc>,
    /// Display-ready rows, already sorted for display priority.
    pub orders: Vec<DisplayOrder>,
}

fn parse_order_number(raw: &str) -> Result<OrderNumber> {
    OrderNumber::new(raw).ok_or_else(|| AppError::BadRequest("empty order number".to_string()))
}

/// List the display-ready orders of one bucket.
///
/// Loads the board from the scanner on the first call of a session.
///
/// # Route
///
/// `GET /api/orders?bucket=ready_for_pickup`
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let bucket = query.bucket.unwrap_or(Bucket::ReadyForPickup);
    let orders =
        service::bucket_view(state.scanner(), state.board(), &user.email, bucket).await?;
    let reconciled_at = state
        .board()
        .classification()
        .map(|c| c.reconciled_at())
        .ok_or_else(|| AppError::Internal("board empty after view".to_string()))?;

    Ok(Json(ListResponse {
        bucket,
        reconciled_at,
        orders,
    }))
}

/// Trigger a mailbox re-scan and merge newly discovered orders.
///
/// # Route
///
/// `POST /api/orders/check`
pub async fn check(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<NewOrdersSummary>> {
    let summary =
        service::check_new_orders(state.scanner(), state.board(), &user.email).await?;
    Ok(Json(summary))
}

/// Discard one order.
///
/// # Route
///
/// `POST /api/orders/{order_number}/discard`
pub async fn discard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_number): Path<String>,
) -> Result<StatusCode> {
    let order_number = parse_order_number(&order_number)?;
    service::discard_order(state.scanner(), state.board(), &user.email, &order_number).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark one order returned and refresh the whole board.
///
/// # Route
///
/// `POST /api/orders/{order_number}/mark-returned`
pub async fn mark_returned(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_number): Path<String>,
) -> Result<StatusCode> {
    let order_number = parse_order_number(&order_number)?;
    service::mark_returned(state.scanner(), state.board(), &user.email, &order_number).await?;
    Ok(StatusCode::NO_CONTENT)
}
