//! Application state shared across handlers.

use std::sync::Arc;

use crate::board::OrderBoard;
use crate::config::DashboardConfig;
use crate::scanner::ScannerClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds the configuration, the scanner
/// client, and the authoritative order board.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DashboardConfig,
    scanner: ScannerClient,
    board: OrderBoard,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        let scanner = ScannerClient::new(config.scanner_url.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                scanner,
                board: OrderBoard::new(),
            }),
        }
    }

    /// Get a reference to the dashboard configuration.
    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Get a reference to the scanner backend client.
    #[must_use]
    pub fn scanner(&self) -> &ScannerClient {
        &self.inner.scanner
    }

    /// Get a reference to the authoritative order board.
    #[must_use]
    pub fn board(&self) -> &OrderBoard {
        &self.inner.board
    }
}
