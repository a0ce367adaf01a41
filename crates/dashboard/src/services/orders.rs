//! Order orchestration: the only writer of the order board.
//!
//! Each operation here follows the same shape: take a refresh ticket,
//! perform the scanner call, run the engine, commit the result as a full
//! replacement. A scanner failure aborts before the commit, so the
//! previously displayed state always survives a failed refresh.
//!
//! Functions are generic over [`OrderSource`] so tests can substitute a
//! mock scanner.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument};

use parceldeck_core::{
    Bucket, Classification, DisplayOrder, Email, OrderNumber, Snapshot, reconcile, select_view,
};

use crate::board::{BoardState, OrderBoard};
use crate::error::{AppError, Result};
use crate::scanner::OrderSource;

/// User-facing summary of a check-new-orders run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NewOrdersSummary {
    /// Count of genuinely new orders merged into the board.
    pub new_orders: usize,
}

/// Fetch a full snapshot and replace the board's state with its
/// classification.
///
/// Returns the board's authoritative classification after the refresh -
/// which is the newer one if a refresh triggered later won the race.
///
/// # Errors
///
/// Backend and validation failures propagate without committing anything.
#[instrument(skip_all, fields(email = %email))]
pub async fn load_board(
    source: &(impl OrderSource + ?Sized),
    board: &OrderBoard,
    email: &Email,
) -> Result<Classification> {
    let ticket = board.begin_refresh();
    let snapshot = source.fetch_all_orders(email).await?;
    let classification = reconcile(&snapshot, Utc::now())?;

    if !board.commit(
        &ticket,
        BoardState {
            snapshot,
            classification,
        },
    ) {
        debug!("stale refresh response discarded");
    }

    board
        .classification()
        .ok_or_else(|| AppError::Internal("board empty after committed refresh".to_string()))
}

/// Trigger a mailbox re-scan and merge what it discovered into the board.
///
/// Discovered orders already present by identifier are ignored, never
/// overwritten; the returned count covers only genuinely new orders.
///
/// # Errors
///
/// Backend and validation failures propagate without committing anything.
#[instrument(skip_all, fields(email = %email))]
pub async fn check_new_orders(
    source: &(impl OrderSource + ?Sized),
    board: &OrderBoard,
    email: &Email,
) -> Result<NewOrdersSummary> {
    let ticket = board.begin_refresh();
    let fetched = source.fetch_new_orders(email).await?;

    let (snapshot, new_orders) = match board.current() {
        Some(state) => {
            // Merge into our snapshot of record, preserving in-flight state.
            let mut snapshot = state.snapshot;
            let outcome = snapshot.merge_discovered(&fetched.discovered);
            (snapshot, outcome.new_orders)
        }
        None => {
            // Nothing loaded yet: adopt the scanner's fresh full snapshot,
            // still counting the delta it reported.
            let mut empty = Snapshot::default();
            let outcome = empty.merge_discovered(&fetched.discovered);
            (fetched.all_orders, outcome.new_orders)
        }
    };

    let classification = reconcile(&snapshot, Utc::now())?;
    if !board.commit(
        &ticket,
        BoardState {
            snapshot,
            classification,
        },
    ) {
        debug!("stale re-scan response discarded");
    }

    info!(new_orders, "check-new-orders finished");
    Ok(NewOrdersSummary { new_orders })
}

/// The display list for one bucket, loading the board first if this is the
/// first request of the session.
///
/// # Errors
///
/// Propagates load failures when the board was empty.
pub async fn bucket_view(
    source: &(impl OrderSource + ?Sized),
    board: &OrderBoard,
    email: &Email,
    bucket: Bucket,
) -> Result<Vec<DisplayOrder>> {
    let classification = match board.classification() {
        Some(classification) => classification,
        None => load_board(source, board, email).await?,
    };
    Ok(select_view(&classification, bucket))
}

/// Discard an order: remove it server-side, then drop it from the board.
///
/// The engine must not silently no-op, so an order the board cannot see is
/// rejected before the scanner is asked to delete anything.
///
/// # Errors
///
/// `EngineError::NotFound` (as `AppError`) for an unknown order; backend
/// failures propagate with the board untouched.
#[instrument(skip_all, fields(order = %order_number))]
pub async fn discard_order(
    source: &(impl OrderSource + ?Sized),
    board: &OrderBoard,
    email: &Email,
    order_number: &OrderNumber,
) -> Result<()> {
    let known = board
        .classification()
        .is_some_and(|c| c.bucket_of(order_number).is_some());
    if !known {
        return Err(parceldeck_core::EngineError::NotFound(order_number.clone()).into());
    }

    source.discard_order(order_number, email).await?;
    board.discard(order_number)?;
    info!("order discarded");
    Ok(())
}

/// Mark an order returned server-side, then refresh the whole board.
///
/// The source of truth for "returned" lives in the scanner; the board never
/// guesses the new categorization locally.
///
/// # Errors
///
/// Backend failures propagate; so do failures of the follow-up refresh.
#[instrument(skip_all, fields(order = %order_number))]
pub async fn mark_returned(
    source: &(impl OrderSource + ?Sized),
    board: &OrderBoard,
    email: &Email,
    order_number: &OrderNumber,
) -> Result<Classification> {
    source.mark_returned(order_number).await?;
    info!("order marked returned, refreshing board");
    load_board(source, board, email).await
}
