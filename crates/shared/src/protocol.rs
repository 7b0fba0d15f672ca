use serde::{Deserialize, Serialize};

/// Body of `POST /submit`. Field names are camelCase on the wire because the
/// backend collaborator expects them that way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub name: String,
    pub roll_number: String,
    pub email_id: String,
    pub utr_id: String,
    pub payee_vpa: String,
    pub has_rosemilk: bool,
}

/// Error payload the backend may attach to a non-2xx response. The `error`
/// string, when present, is surfaced to the student verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitErrorResponse {
    pub error: String,
}
