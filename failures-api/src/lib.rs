// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dropshot API for the MMT failure-tracking service
//!
//! Covers the failure-notification workflow (create / edit / approve / ANP
//! submission), the report distribution list, and operational alerts.

use chrono::DateTime;
use chrono::Utc;
use dropshot::HttpError;
use dropshot::HttpResponseCreated;
use dropshot::HttpResponseOk;
use dropshot::Path;
use dropshot::Query;
use dropshot::RequestContext;
use dropshot::TypedBody;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

pub mod classification;

pub use classification::AnpClassification;
pub use classification::AnpStatus;
pub use classification::FailureStatus;
pub use classification::Impact;

#[dropshot::api_description]
pub trait FailuresApi {
    type Context;

    /// List failure notifications, optionally filtered by workflow status or
    /// restricted to open (not yet submitted) failures.
    #[endpoint {
        method = GET,
        path = "/failures",
    }]
    async fn failure_list(
        rqctx: RequestContext<Self::Context>,
        query: Query<FailureListFilter>,
    ) -> Result<HttpResponseOk<Vec<FailureRecord>>, HttpError>;

    /// Create a new failure notification in Draft status.
    #[endpoint {
        method = POST,
        path = "/failures",
    }]
    async fn failure_create(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<FailureCreate>,
    ) -> Result<HttpResponseCreated<FailureRecord>, HttpError>;

    /// Fetch one failure notification by id.
    #[endpoint {
        method = GET,
        path = "/failures/{id}",
    }]
    async fn failure_get(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError>;

    /// Update the editable fields of a failure notification.
    #[endpoint {
        method = PUT,
        path = "/failures/{id}",
    }]
    async fn failure_update(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
        body: TypedBody<FailureUpdate>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError>;

    /// Approve a Draft failure notification, recording the approver and
    /// triggering report distribution to the FPSO email list.
    #[endpoint {
        method = POST,
        path = "/failures/{id}/approve",
    }]
    async fn failure_approve(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
        body: TypedBody<FailureApproval>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError>;

    /// Submit an Approved failure notification to the ANP, recording the
    /// submission date.
    #[endpoint {
        method = PUT,
        path = "/failures/{id}/anp-submit",
    }]
    async fn failure_anp_submit(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<FailurePathParam>,
    ) -> Result<HttpResponseOk<FailureRecord>, HttpError>;

    /// List report distribution email entries, optionally for one FPSO.
    #[endpoint {
        method = GET,
        path = "/failure-email-list",
    }]
    async fn email_list(
        rqctx: RequestContext<Self::Context>,
        query: Query<EmailListFilter>,
    ) -> Result<HttpResponseOk<Vec<EmailListEntry>>, HttpError>;

    /// Add an email entry to a FPSO's report distribution list.
    #[endpoint {
        method = POST,
        path = "/failure-email-list",
    }]
    async fn email_add(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<EmailListEntryCreate>,
    ) -> Result<HttpResponseCreated<EmailListEntry>, HttpError>;

    /// List alerts, optionally filtered by severity or acknowledged state.
    ///
    /// The unread-count badge is fed by `acknowledged=false` and the length
    /// of the returned list.
    #[endpoint {
        method = GET,
        path = "/alerts",
    }]
    async fn alert_list(
        rqctx: RequestContext<Self::Context>,
        query: Query<AlertListFilter>,
    ) -> Result<HttpResponseOk<Vec<Alert>>, HttpError>;

    /// Create a new alert.
    #[endpoint {
        method = POST,
        path = "/alerts",
    }]
    async fn alert_create(
        rqctx: RequestContext<Self::Context>,
        body: TypedBody<AlertCreate>,
    ) -> Result<HttpResponseCreated<Alert>, HttpError>;

    /// Acknowledge an alert, clearing it from the unread count.
    #[endpoint {
        method = PUT,
        path = "/alerts/{id}/acknowledge",
    }]
    async fn alert_acknowledge(
        rqctx: RequestContext<Self::Context>,
        path_params: Path<AlertPathParam>,
        body: TypedBody<AlertAcknowledge>,
    ) -> Result<HttpResponseOk<Alert>, HttpError>;
}

/// A failure notification, as stored and served by the service
///
/// The server owns the record; clients hold a transient editable copy while a
/// form is open.
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct FailureRecord {
    pub id: u64,
    /// FPSO the failed equipment belongs to (read-only after creation).
    pub fpso_name: String,
    /// Equipment tag (read-only after creation).
    pub tag: String,
    pub failure_date: DateTime<Utc>,
    pub restoration_date: Option<DateTime<Utc>>,
    pub description: String,
    pub corrective_action: String,
    pub impact: Option<Impact>,
    pub anp_classification: Option<AnpClassification>,
    /// Deadline for the initial ANP notification, computed at creation.
    pub anp_deadline: DateTime<Utc>,
    pub anp_submitted_date: Option<DateTime<Utc>>,
    pub anp_status: AnpStatus,
    pub status: FailureStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl FailureRecord {
    /// Whether this failure qualifies for the global critical-alert banner.
    pub fn is_critical(&self) -> bool {
        matches!(self.impact, Some(Impact::High))
            || matches!(
                self.anp_classification,
                Some(AnpClassification::Critica)
            )
    }
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct FailurePathParam {
    pub id: u64,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, Serialize)]
pub struct FailureListFilter {
    /// Exact workflow status to match.
    pub status: Option<FailureStatus>,
    /// When true, restrict to failures not yet submitted to the ANP.
    pub open: Option<bool>,
    /// Maximum number of records to return.
    pub limit: Option<u32>,
    /// Number of records to skip.
    pub skip: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct FailureCreate {
    pub fpso_name: String,
    pub tag: String,
    pub failure_date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub corrective_action: String,
    pub impact: Option<Impact>,
    pub anp_classification: Option<AnpClassification>,
    pub restoration_date: Option<DateTime<Utc>>,
}

/// Editable fields of a failure notification; absent fields are unchanged.
#[derive(Clone, Debug, Default, Deserialize, JsonSchema, Serialize)]
pub struct FailureUpdate {
    pub failure_date: Option<DateTime<Utc>>,
    pub restoration_date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub corrective_action: Option<String>,
    pub impact: Option<Impact>,
    pub anp_classification: Option<AnpClassification>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct FailureApproval {
    pub approved_by: String,
}

/// An entry in a FPSO's failure report distribution list
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct EmailListEntry {
    pub id: u64,
    pub fpso_name: String,
    pub email: String,
    pub is_active: bool,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct EmailListEntryCreate {
    pub fpso_name: String,
    pub email: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, Serialize)]
pub struct EmailListFilter {
    pub fpso_name: Option<String>,
}

/// An operational alert surfaced in the dashboard chrome
#[derive(Clone, Debug, Deserialize, JsonSchema, PartialEq, Serialize)]
pub struct Alert {
    pub id: u64,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub acknowledged: bool,
    pub acknowledged_by: Option<String>,
    pub acknowledged_at: Option<DateTime<Utc>>,
}

#[derive(
    Clone, Copy, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize,
)]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct AlertCreate {
    pub severity: AlertSeverity,
    pub title: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct AlertPathParam {
    pub id: u64,
}

#[derive(Clone, Debug, Default, Deserialize, JsonSchema, Serialize)]
pub struct AlertListFilter {
    pub severity: Option<AlertSeverity>,
    pub acknowledged: Option<bool>,
}

#[derive(Clone, Debug, Deserialize, JsonSchema, Serialize)]
pub struct AlertAcknowledge {
    pub acknowledged_by: String,
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn record(
        impact: Option<Impact>,
        classification: Option<AnpClassification>,
    ) -> FailureRecord {
        let failed = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        FailureRecord {
            id: 1,
            fpso_name: "SEPETIBA".to_string(),
            tag: "FT-101".to_string(),
            failure_date: failed,
            restoration_date: None,
            description: String::new(),
            corrective_action: String::new(),
            impact,
            anp_classification: classification,
            anp_deadline: classification::initial_notification_deadline(
                failed,
            ),
            anp_submitted_date: None,
            anp_status: AnpStatus::Pending,
            status: FailureStatus::Draft,
            approved_by: None,
            approved_at: None,
            created_at: failed,
        }
    }

    #[test]
    fn test_critical_filter() {
        assert!(record(Some(Impact::High), None).is_critical());
        assert!(record(None, Some(AnpClassification::Critica)).is_critical());
        assert!(!record(Some(Impact::Medium), None).is_critical());
        assert!(
            !record(Some(Impact::Low), Some(AnpClassification::Grave))
                .is_critical()
        );
        assert!(!record(None, None).is_critical());
    }
}
