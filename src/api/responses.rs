//! Response bodies of the endpoints used by the transfer core.

use serde::{Deserialize, Serialize};

// <upload-urls> response: one presigned URL per part plus the keys the
// complete-upload call has to echo back
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReservation {
    pub urls: Vec<String>,
    pub object_key: String,
    pub upload_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedUpload {
    // empty when the server does not echo it back
    #[serde(default)]
    pub object_key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedOutput {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateOutputsResult {
    #[serde(default)]
    pub outputs: Vec<CreatedOutput>,
}

// one entry of the outputs listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputSummary {
    pub id: String,
    #[serde(default, rename = "type")]
    pub output_type: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OutputsResult {
    #[serde(default)]
    pub results: Vec<OutputSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Download {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadsResult {
    #[serde(default)]
    pub results: Vec<Download>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_reservation() {
        let body = r#"{
            "urls": ["https://bucket/part1", "https://bucket/part2"],
            "objectKey": "urn:obj:1",
            "uploadKey": "upl-1"
        }"#;
        let rs: UploadReservation = serde_json::from_str(body).unwrap();
        assert_eq!(rs.urls.len(), 2);
        assert_eq!(rs.object_key, "urn:obj:1");
        assert_eq!(rs.upload_key, "upl-1");
    }

    #[test]
    fn test_completed_upload_ignores_extra_fields() {
        let body = r#"{"objectKey": "urn:obj:2", "fileSize": 10}"#;
        let rs: CompletedUpload = serde_json::from_str(body).unwrap();
        assert_eq!(rs.object_key, "urn:obj:2");
    }

    #[test]
    fn test_completed_upload_without_object_key() {
        let rs: CompletedUpload = serde_json::from_str(r#"{"fileSize": 10}"#).unwrap();
        assert!(rs.object_key.is_empty());
    }

    #[test]
    fn test_create_outputs_result() {
        let body = r#"{"outputs": [{"id": "o-1", "status": "PENDING"}]}"#;
        let rs: CreateOutputsResult = serde_json::from_str(body).unwrap();
        assert_eq!(rs.outputs[0].id, "o-1");
    }

    #[test]
    fn test_outputs_result() {
        let body = r#"{"results": [
            {"id": "o-1", "type": "RFA", "status": "SUCCESS", "variantId": "v-1"},
            {"id": "o-2"}
        ]}"#;
        let rs: OutputsResult = serde_json::from_str(body).unwrap();
        assert_eq!(rs.results.len(), 2);
        assert_eq!(rs.results[0].output_type, "RFA");
        assert_eq!(rs.results[0].status, "SUCCESS");
        assert!(rs.results[1].status.is_empty());
    }

    #[test]
    fn test_downloads_result_empty() {
        let rs: DownloadsResult = serde_json::from_str("{}").unwrap();
        assert!(rs.results.is_empty());
    }
}
