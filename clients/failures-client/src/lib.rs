// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rust client to the MMT failure-tracking service
//!
//! A thin `reqwest` wrapper with one method per endpoint.  Error responses
//! are classified into the four cases callers care about: not-found,
//! structured API errors (a JSON body carrying `message` — or `detail`, the
//! shape produced by the legacy backend), unstructured non-2xx responses,
//! and request failures that never produced a response.

use failures_api::Alert;
use failures_api::AlertAcknowledge;
use failures_api::AlertCreate;
use failures_api::AlertListFilter;
use failures_api::EmailListEntry;
use failures_api::EmailListEntryCreate;
use failures_api::EmailListFilter;
use failures_api::FailureApproval;
use failures_api::FailureCreate;
use failures_api::FailureListFilter;
use failures_api::FailureRecord;
use failures_api::FailureUpdate;
use reqwest::StatusCode;
use serde::Deserialize;
use slog::debug;
use slog::Logger;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested object does not exist (HTTP 404).
    #[error("{message}")]
    NotFound { message: String },
    /// The server rejected the request with a structured error body.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    /// The server returned a non-2xx response without a parseable body.
    #[error("status {status}: {status_text}")]
    Status { status: StatusCode, status_text: String },
    /// The request could not be completed at all.
    #[error("request failed")]
    Request(#[source] reqwest::Error),
}

/// The subset of an error response body this client understands
///
/// Dropshot emits `message`; the original FastAPI backend emitted `detail`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

/// Classify a non-2xx response from its status and body text.
fn error_for(status: StatusCode, body: &str) -> Error {
    let parsed = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail.or(b.message));
    match parsed {
        Some(message) if status == StatusCode::NOT_FOUND => {
            Error::NotFound { message }
        }
        Some(message) => Error::Api { status, message },
        None if status == StatusCode::NOT_FOUND => Error::NotFound {
            message: String::from("not found"),
        },
        None => Error::Status {
            status,
            status_text: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
        },
    }
}

/// A `Client` to the failure-tracking service.
#[derive(Clone, Debug)]
pub struct Client {
    baseurl: String,
    client: reqwest::Client,
    log: Logger,
}

impl Client {
    /// Construct a new client of the service at `baseurl` (scheme and
    /// authority, no trailing slash).
    pub fn new(baseurl: &str, log: Logger) -> Self {
        Self {
            baseurl: baseurl.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            log,
        }
    }

    pub async fn failure_list(
        &self,
        filter: &FailureListFilter,
    ) -> Result<Vec<FailureRecord>, Error> {
        let response = self
            .client
            .get(format!("{}/failures", self.baseurl))
            .query(filter)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn failure_create(
        &self,
        params: &FailureCreate,
    ) -> Result<FailureRecord, Error> {
        let response = self
            .client
            .post(format!("{}/failures", self.baseurl))
            .json(params)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn failure_get(&self, id: u64) -> Result<FailureRecord, Error> {
        debug!(self.log, "fetching failure"; "failure_id" => id);
        let response = self
            .client
            .get(format!("{}/failures/{}", self.baseurl, id))
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn failure_update(
        &self,
        id: u64,
        update: &FailureUpdate,
    ) -> Result<FailureRecord, Error> {
        let response = self
            .client
            .put(format!("{}/failures/{}", self.baseurl, id))
            .json(update)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn failure_approve(
        &self,
        id: u64,
        approved_by: &str,
    ) -> Result<FailureRecord, Error> {
        debug!(self.log, "approving failure"; "failure_id" => id);
        let response = self
            .client
            .post(format!("{}/failures/{}/approve", self.baseurl, id))
            .json(&FailureApproval { approved_by: approved_by.to_string() })
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn failure_anp_submit(
        &self,
        id: u64,
    ) -> Result<FailureRecord, Error> {
        let response = self
            .client
            .put(format!("{}/failures/{}/anp-submit", self.baseurl, id))
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn email_list(
        &self,
        filter: &EmailListFilter,
    ) -> Result<Vec<EmailListEntry>, Error> {
        let response = self
            .client
            .get(format!("{}/failure-email-list", self.baseurl))
            .query(filter)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn email_add(
        &self,
        params: &EmailListEntryCreate,
    ) -> Result<EmailListEntry, Error> {
        let response = self
            .client
            .post(format!("{}/failure-email-list", self.baseurl))
            .json(params)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn alert_list(
        &self,
        filter: &AlertListFilter,
    ) -> Result<Vec<Alert>, Error> {
        let response = self
            .client
            .get(format!("{}/alerts", self.baseurl))
            .query(filter)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn alert_create(
        &self,
        params: &AlertCreate,
    ) -> Result<Alert, Error> {
        let response = self
            .client
            .post(format!("{}/alerts", self.baseurl))
            .json(params)
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    pub async fn alert_acknowledge(
        &self,
        id: u64,
        acknowledged_by: &str,
    ) -> Result<Alert, Error> {
        let response = self
            .client
            .put(format!("{}/alerts/{}/acknowledge", self.baseurl, id))
            .json(&AlertAcknowledge {
                acknowledged_by: acknowledged_by.to_string(),
            })
            .send()
            .await
            .map_err(Error::Request)?;
        decode(response).await
    }

    /// Number of unacknowledged alerts, for the unread badge.
    pub async fn alert_unread_count(&self) -> Result<usize, Error> {
        let unread = self
            .alert_list(&AlertListFilter {
                acknowledged: Some(false),
                ..Default::default()
            })
            .await?;
        Ok(unread.len())
    }
}

/// Police the response status, then decode the JSON body.
async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(error_for(status, &body));
    }
    response.json().await.map_err(Error::Request)
}

#[cfg(test)]
mod test {
    use super::error_for;
    use super::Error;
    use reqwest::StatusCode;

    #[test]
    fn test_legacy_detail_is_shown_verbatim() {
        let error = error_for(
            StatusCode::BAD_REQUEST,
            r#"{"detail": "Only approved notifications can be submitted"}"#,
        );
        match error {
            Error::Api { status, message } => {
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(
                    message,
                    "Only approved notifications can be submitted"
                );
            }
            other => panic!("expected structured error, got {:?}", other),
        }
    }

    #[test]
    fn test_dropshot_message_is_shown() {
        let error = error_for(
            StatusCode::BAD_REQUEST,
            r#"{"request_id": "x", "error_code": "InvalidRequest",
                "message": "only Draft notifications can be approved"}"#,
        );
        match error {
            Error::Api { message, .. } => {
                assert_eq!(
                    message,
                    "only Draft notifications can be approved"
                );
            }
            other => panic!("expected structured error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_falls_back_to_status_text() {
        let error =
            error_for(StatusCode::BAD_GATEWAY, "<html>nginx says no</html>");
        match error {
            Error::Status { status, status_text } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(status_text, "Bad Gateway");
            }
            other => panic!("expected unstructured error, got {:?}", other),
        }
    }

    #[test]
    fn test_404_is_not_found() {
        let error = error_for(
            StatusCode::NOT_FOUND,
            r#"{"message": "not found: failure notification with id \"9\""}"#,
        );
        assert!(matches!(error, Error::NotFound { .. }));

        // Even without a body, a 404 is still a not-found.
        let error = error_for(StatusCode::NOT_FOUND, "");
        assert!(matches!(error, Error::NotFound { .. }));
    }
}
