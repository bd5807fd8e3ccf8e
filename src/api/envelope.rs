//! Response envelopes of the smart-search service.
//!
//! The gateway wraps authentication and validation failures in an
//! `OpenAPI_ServiceResponse` document, while the service itself answers with
//! `response.header` / `response.body`. Both shapes are decoded in one pass
//! and classified into [`Envelope`].

use serde::Deserialize;

use super::deserializers::{items_or_empty, opt_string_or_number, string_or_number};
use super::types::ResultRecord;

/// Status code reported for a successful call
pub const SUCCESS_CODE: &str = "00";

/// Classified response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Gateway rejected the call (bad key, quota, invalid parameters)
    ServiceError { code: String, message: String },
    /// Service answered with a non-success result code
    DomainError { code: String, message: String },
    /// Service answered with results (possibly none)
    DomainSuccess {
        items: Vec<ResultRecord>,
        total_count: Option<u32>,
    },
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "OpenAPI_ServiceResponse")]
    service: Option<RawServiceResponse>,
    response: Option<RawDomainResponse>,
}

#[derive(Debug, Deserialize)]
struct RawServiceResponse {
    #[serde(rename = "cmmMsgHeader")]
    header: Option<RawServiceHeader>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServiceHeader {
    #[serde(rename = "errMsg")]
    err_msg: Option<String>,
    #[serde(rename = "returnAuthMsg")]
    return_auth_msg: Option<String>,
    #[serde(rename = "returnReasonCode", default, deserialize_with = "opt_string_or_number")]
    return_reason_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDomainResponse {
    header: Option<RawDomainHeader>,
    body: Option<RawBody>,
}

#[derive(Debug, Deserialize)]
struct RawDomainHeader {
    #[serde(rename = "resultCode", deserialize_with = "string_or_number")]
    result_code: String,
    #[serde(rename = "resultMsg")]
    result_msg: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBody {
    #[serde(default, deserialize_with = "items_or_empty")]
    items: Vec<RawItem>,
    #[serde(rename = "totalCount", default, deserialize_with = "opt_string_or_number")]
    total_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawItem {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    doc_id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    highlight_content: Option<String>,
    #[serde(default)]
    filepath: Option<String>,
}

impl From<RawItem> for ResultRecord {
    fn from(raw: RawItem) -> Self {
        ResultRecord {
            document_id: raw.doc_id.filter(|id| !id.trim().is_empty()),
            title: raw.title.unwrap_or_default(),
            highlighted_content: raw.highlight_content.unwrap_or_default(),
            source_link: raw.filepath.unwrap_or_default(),
        }
    }
}

/// Why a body could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeError(pub String);

impl std::fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Envelope {
    /// Decode and classify a response body
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        let raw: RawEnvelope =
            serde_json::from_str(body).map_err(|e| EnvelopeError(e.to_string()))?;

        if let Some(service) = raw.service {
            let header = service.header.unwrap_or_default();
            let code = header.return_reason_code.unwrap_or_default();
            if code != SUCCESS_CODE {
                let message = header
                    .return_auth_msg
                    .or(header.err_msg)
                    .unwrap_or_else(|| "unknown service error".to_string());
                return Ok(Self::ServiceError { code, message });
            }
        }

        let response = raw
            .response
            .ok_or_else(|| EnvelopeError("no 'response' envelope in body".to_string()))?;
        let header = response
            .header
            .ok_or_else(|| EnvelopeError("no 'response.header' in body".to_string()))?;

        if header.result_code != SUCCESS_CODE {
            return Ok(Self::DomainError {
                code: header.result_code,
                message: header.result_msg.unwrap_or_default(),
            });
        }

        let (items, total_count) = match response.body {
            Some(body) => (
                body.items.into_iter().map(ResultRecord::from).collect(),
                body.total_count.and_then(|count| count.trim().parse::<u32>().ok()),
            ),
            None => (Vec::new(), None),
        };

        Ok(Self::DomainSuccess { items, total_count })
    }
}
