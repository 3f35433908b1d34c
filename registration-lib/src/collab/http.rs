//! HTTP collaborators backed by `reqwest`.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use super::{PostcodeLookup, SubmissionTransport, SubmitReceipt};
use crate::config::{PostcodeLookupConfig, SubmissionConfig};
use crate::error::{LookupError, SubmissionError};
use crate::field::FormSnapshot;

/// Fallback message when the server rejects a registration without saying why.
pub const GENERIC_SERVER_ERROR: &str = "サーバーエラーが発生しました";

fn build_client(timeout: Option<std::time::Duration>) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

/// Postcode lookup against a zipaddress-style JSON service.
///
/// The service is queried as `GET {endpoint}?zipcode=1000001`. A postcode
/// exists if the body carries `"success": true`, or, for services that do not
/// send that flag, `"code": 200`. Only `"success": false` or `"code": 404`
/// mean the postcode is unknown. Any other status or code is an error.
#[derive(Debug, Clone)]
pub struct HttpPostcodeLookup {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct LookupBody {
    success: Option<bool>,
    code: Option<u16>,
}

impl HttpPostcodeLookup {
    /// Creates a lookup client from config.
    pub fn new(config: &PostcodeLookupConfig) -> Result<Self, LookupError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| LookupError::InvalidUrl(format!("{}: {e}", config.endpoint)))?;
        let client = build_client(config.timeout)?;
        Ok(Self { client, endpoint })
    }

    fn url_for(&self, postcode: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("zipcode", postcode);
        url
    }
}

#[async_trait]
impl PostcodeLookup for HttpPostcodeLookup {
    async fn exists(&self, postcode: &str) -> Result<bool, LookupError> {
        let response = self.client.get(self.url_for(postcode)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Response(format!("HTTP {status}")));
        }
        let text = response.text().await?;

        let body: LookupBody = serde_json::from_str(&text)
            .map_err(|e| LookupError::Response(format!("HTTP {status}: {e}")))?;

        match (body.success, body.code) {
            (Some(success), _) => Ok(success),
            (None, Some(200)) => Ok(true),
            (None, Some(404)) => Ok(false),
            (None, Some(code)) => Err(LookupError::Response(format!(
                "HTTP {status}: service code {code}"
            ))),
            (None, None) => Err(LookupError::Response(format!(
                "HTTP {status}: body has neither 'success' nor 'code'"
            ))),
        }
    }
}

/// Registration transport posting the snapshot as JSON.
#[derive(Debug, Clone)]
pub struct HttpSubmission {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpSubmission {
    /// Creates a transport from config.
    pub fn new(config: &SubmissionConfig) -> Result<Self, SubmissionError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| SubmissionError::Rejected(format!("invalid endpoint {}: {e}", config.endpoint)))?;
        let client = build_client(config.timeout)?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl SubmissionTransport for HttpSubmission {
    async fn submit(&self, snapshot: &FormSnapshot) -> Result<SubmitReceipt, SubmissionError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("X-Requested-With", "XMLHttpRequest")
            .json(snapshot)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());
            return Err(SubmissionError::server(status.as_u16(), message));
        }

        let body: serde_json::Value = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)
                .map_err(|e| SubmissionError::Rejected(format!("unreadable response: {e}")))?
        };
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string);

        Ok(SubmitReceipt { message, body })
    }
}
