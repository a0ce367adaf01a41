//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use parceldeck_core::Email;

/// Session-stored user identity.
///
/// The verified email is the only identity the scanner backend needs; it
/// scopes every order query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// The authenticated user's email address.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
