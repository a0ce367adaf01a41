//! The authoritative order board.
//!
//! A single shared, mutable cell holding the latest raw snapshot and the
//! classification derived from it. Only the orchestration layer writes it,
//! and every write is a full replacement, so the view side can never
//! observe a torn state.
//!
//! Refreshes are sequenced: a refresh started later always wins over one
//! started earlier, even if their responses arrive out of order. A refresh
//! that fails or is cancelled simply never commits, leaving the previous
//! state intact.

use std::sync::Mutex;

use parceldeck_core::{Classification, EngineError, OrderNumber, Snapshot, apply_discard};

/// The board's committed state: the raw snapshot of record and the
/// classification reconciled from it.
#[derive(Debug, Clone)]
pub struct BoardState {
    /// The raw snapshot the classification was computed from.
    pub snapshot: Snapshot,
    /// The derived four-bucket classification.
    pub classification: Classification,
}

/// Ticket identifying one refresh attempt.
///
/// Tickets are handed out in monotonic order; only the newest outstanding
/// ticket can commit.
#[derive(Debug)]
pub struct RefreshTicket {
    seq: u64,
}

#[derive(Debug, Default)]
struct BoardInner {
    next_seq: u64,
    applied_seq: u64,
    current: Option<BoardState>,
}

/// Shared cell for the authoritative classification.
#[derive(Debug, Default)]
pub struct OrderBoard {
    inner: Mutex<BoardInner>,
}

impl OrderBoard {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Start a refresh, reserving the next sequence number.
    ///
    /// Call this *before* the backend fetch so that a refresh triggered
    /// later (with a newer ticket) outranks this one regardless of which
    /// response arrives first.
    pub fn begin_refresh(&self) -> RefreshTicket {
        let mut inner = self.lock();
        inner.next_seq += 1;
        RefreshTicket {
            seq: inner.next_seq,
        }
    }

    /// Commit a refresh result as the new authoritative state.
    ///
    /// Returns `false` (and changes nothing) when a newer refresh has
    /// already committed - the stale response is discarded.
    pub fn commit(&self, ticket: &RefreshTicket, state: BoardState) -> bool {
        let mut inner = self.lock();
        if ticket.seq <= inner.applied_seq {
            return false;
        }
        inner.applied_seq = ticket.seq;
        inner.current = Some(state);
        true
    }

    /// The current committed state, if any refresh has completed.
    #[must_use]
    pub fn current(&self) -> Option<BoardState> {
        self.lock().current.clone()
    }

    /// The current classification, if any refresh has completed.
    #[must_use]
    pub fn classification(&self) -> Option<Classification> {
        self.lock().current.as_ref().map(|s| s.classification.clone())
    }

    /// Remove one order locally after the backend accepted a discard.
    ///
    /// Removes the order from its bucket and from the raw snapshot of
    /// record (so a later merge cannot resurrect it), then writes the
    /// result back as a full replacement.
    ///
    /// # Errors
    ///
    /// `EngineError::NotFound` if the order is absent from every bucket or
    /// no state has been loaded yet; the board is left unchanged.
    pub fn discard(&self, order_number: &OrderNumber) -> Result<(), EngineError> {
        let mut inner = self.lock();
        let Some(state) = inner.current.as_ref() else {
            return Err(EngineError::NotFound(order_number.clone()));
        };

        let classification = apply_discard(&state.classification, order_number)?;
        let mut snapshot = state.snapshot.clone();
        snapshot.remove(order_number.as_str());

        inner.current = Some(BoardState {
            snapshot,
            classification,
        });
        Ok(())
    }

    /// Drop all state (logout).
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.current = None;
    }
}
