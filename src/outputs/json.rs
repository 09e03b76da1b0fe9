//! JSON rendering of a summary response.

use crate::models::SummaryResponse;

/// Pretty-printed JSON with `summary_text`, `source_info` and `query`.
pub fn to_json(response: &SummaryResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(response)
}
