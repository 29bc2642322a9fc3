pub mod price_history;
pub mod product;

use serde::{Deserialize, Serialize};

/// Generic error response body shared by all handlers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}
