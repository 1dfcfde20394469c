// Text rendering for in-band MCP responses.
//
// Errors never surface as protocol faults: they are returned as a JSON error
// document inside an ordinary resource or tool result.

use kobs::error::KobsError;

/// Pretty JSON error document for a failed request.
pub fn format_error(err: &KobsError) -> String {
    serde_json::to_string_pretty(&err.payload()).unwrap_or_else(|_| err.to_string())
}
