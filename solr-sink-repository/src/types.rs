//! Response types for index client operations.

use serde::Deserialize;

use crate::errors::SolrError;

/// The `responseHeader` block Solr puts at the top of every response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResponseHeader {
    /// Zero on success.
    pub status: i32,
    /// Server-side processing time in milliseconds.
    #[serde(rename = "QTime", default)]
    pub qtime: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ResponseEnvelope {
    #[serde(rename = "responseHeader")]
    response_header: ResponseHeader,
}

/// Response to an update request (add or commit).
///
/// Keeps the raw body so failures can be reported with the exact content the
/// server returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResponse {
    /// Status reported in the response header.
    pub status: i32,
    /// Server-side processing time in milliseconds, when reported.
    pub qtime: Option<i64>,
    /// The response body as received.
    pub raw: String,
}

impl UpdateResponse {
    /// Parse a response body.
    ///
    /// # Returns
    ///
    /// * `Ok(None)` - If the body is empty or whitespace only
    /// * `Ok(Some(UpdateResponse))` - If the body carries a response header
    /// * `Err(SolrError)` - If the body is not a Solr response
    pub fn parse(body: &str) -> Result<Option<Self>, SolrError> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        let envelope: ResponseEnvelope = serde_json::from_str(body)
            .map_err(|e| SolrError::parse(format!("{}: {}", e, body)))?;

        Ok(Some(Self {
            status: envelope.response_header.status,
            qtime: envelope.response_header.qtime,
            raw: body.to_string(),
        }))
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_response() {
        let body = r#"{"responseHeader":{"status":0,"QTime":3}}"#;

        let response = UpdateResponse::parse(body).unwrap().unwrap();

        assert_eq!(response.status, 0);
        assert_eq!(response.qtime, Some(3));
        assert_eq!(response.raw, body);
        assert!(response.is_success());
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"responseHeader":{"status":400,"QTime":1},"error":{"msg":"unknown field 'foo'","code":400}}"#;

        let response = UpdateResponse::parse(body).unwrap().unwrap();

        assert_eq!(response.status, 400);
        assert!(!response.is_success());
        assert!(response.raw.contains("unknown field"));
    }

    #[test]
    fn test_parse_without_qtime() {
        let response = UpdateResponse::parse(r#"{"responseHeader":{"status":0}}"#)
            .unwrap()
            .unwrap();

        assert_eq!(response.qtime, None);
    }

    #[test]
    fn test_parse_empty_body_is_null_response() {
        assert_eq!(UpdateResponse::parse("").unwrap(), None);
        assert_eq!(UpdateResponse::parse("  \n").unwrap(), None);
    }

    #[test]
    fn test_parse_non_solr_body() {
        let result = UpdateResponse::parse("<html>Bad Gateway</html>");

        assert!(matches!(result, Err(SolrError::ParseError(_))));
    }
}
