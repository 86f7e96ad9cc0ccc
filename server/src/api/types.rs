//! REST API types for the form page.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::convert::ConvertOutput;

/// Response sent to the form page after a conversion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready" or "error"
    pub status: String,

    /// The converted JSON document, as text
    pub json: String,

    /// Echo of the start of the submitted source, for the input textarea
    pub preview: String,

    /// Metadata about the conversion
    pub metadata: ResponseMetadata,
}

/// Metadata about the conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// Detected or assumed source encoding
    pub encoding: String,

    /// Resolved delimiter ("\t" for tab)
    pub delimiter: String,

    /// Number of records in the document
    pub record_count: usize,

    /// Final column names, including synthetic ones
    pub columns: Vec<String>,

    /// When the conversion finished (RFC 3339)
    pub converted_at: String,
}

impl ConvertResponse {
    /// Build a success response from the core's output.
    pub fn from_output(output: ConvertOutput, preview: String) -> Self {
        ConvertResponse {
            job_id: Uuid::new_v4().to_string(),
            status: "ready".to_string(),
            json: output.json,
            preview,
            metadata: ResponseMetadata {
                encoding: output.encoding,
                delimiter: output.delimiter.to_string(),
                record_count: output.record_count,
                columns: output.headers,
                converted_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }
}

/// Create an error response body. The result area stays empty on the client:
/// no partial JSON is ever sent.
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "json": "",
        "preview": "",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_from_output() {
        let output = ConvertOutput {
            json: "[{\"id\":1}]".to_string(),
            encoding: "utf-8".to_string(),
            delimiter: '\t',
            headers: vec!["id".to_string()],
            record_count: 1,
        };

        let response = ConvertResponse::from_output(output, "id\n1".to_string());

        assert_eq!(response.status, "ready");
        assert_eq!(response.metadata.delimiter, "\t");
        assert_eq!(response.metadata.record_count, 1);
        assert_eq!(response.metadata.columns, vec!["id"]);
        assert!(!response.job_id.is_empty());
    }

    #[test]
    fn test_error_response_has_no_partial_json() {
        let body = error_response("boom");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "boom");
        assert_eq!(body["json"], "");
    }
}
