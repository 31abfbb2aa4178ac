use serde::{Deserialize, Serialize};

/// Top-level keys a saved dataset must carry.
pub const REQUIRED_KEYS: [&str; 4] = ["notices", "events", "birthdays", "cctv"];

/// `POST /api/data` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable confirmation.
    pub message: String,
}

/// Error body for any failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong, for the editor to display.
    pub error: String,
}
