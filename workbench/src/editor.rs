// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Failure-notification edit session
//!
//! A [`FailureEditor`] is the dashboard's edit page without the rendering:
//! it loads one failure record, holds the transient editable copy of its
//! fields, and exposes the save and approve actions.  Identifying fields
//! (`fpso_name`, `tag`) are read-only; `failure_date` is edited at minute
//! precision.

use chrono::DateTime;
use chrono::Timelike;
use chrono::Utc;
use failures_api::AnpClassification;
use failures_api::FailureRecord;
use failures_api::FailureStatus;
use failures_api::FailureUpdate;
use failures_client::Client;
use failures_client::Error;
use slog::info;
use slog::Logger;

/// Identity recorded as the approver on the approve action.
///
/// Sign-off identity is supplied by the surrounding application's session
/// layer; this is the fixed fallback it passes today.
pub const APPROVER_IDENTITY: &str = "Marcos G. (ME)";

/// Why a record could not be loaded into the editor
#[derive(Clone, Debug, PartialEq)]
pub struct LoadFailure {
    /// One-line notice to surface to the user.
    pub notice: String,
    /// Whether the caller should navigate back to the list view (the record
    /// does not exist).
    pub redirect_to_list: bool,
}

/// The transient editable copy of a failure record's fields
#[derive(Clone, Debug, PartialEq)]
pub struct FailureForm {
    pub failure_date: DateTime<Utc>,
    pub anp_classification: Option<AnpClassification>,
    pub description: String,
    pub corrective_action: String,
}

impl FailureForm {
    fn from_record(record: &FailureRecord) -> FailureForm {
        FailureForm {
            failure_date: minute_precision(record.failure_date),
            anp_classification: record.anp_classification,
            description: record.description.clone(),
            corrective_action: record.corrective_action.clone(),
        }
    }
}

/// An open edit session for one failure record
pub struct FailureEditor {
    client: Client,
    log: Logger,
    record: FailureRecord,
    form: FailureForm,
}

impl FailureEditor {
    /// Load the failure with the given id into a new edit session.
    pub async fn load(
        client: Client,
        log: Logger,
        id: u64,
    ) -> Result<FailureEditor, LoadFailure> {
        match client.failure_get(id).await {
            Ok(record) => {
                let form = FailureForm::from_record(&record);
                Ok(FailureEditor { client, log, record, form })
            }
            Err(Error::NotFound { .. }) => Err(LoadFailure {
                notice: String::from("Failure not found"),
                redirect_to_list: true,
            }),
            Err(Error::Api { message, .. }) => {
                Err(LoadFailure { notice: message, redirect_to_list: false })
            }
            Err(Error::Status { status_text, .. }) => Err(LoadFailure {
                notice: format!("API Error: {}", status_text),
                redirect_to_list: false,
            }),
            Err(Error::Request(_)) => Err(LoadFailure {
                notice: String::from("Error loading failure details"),
                redirect_to_list: false,
            }),
        }
    }

    pub fn id(&self) -> u64 {
        self.record.id
    }

    /// Read-only identifying field.
    pub fn fpso_name(&self) -> &str {
        &self.record.fpso_name
    }

    /// Read-only identifying field.
    pub fn tag(&self) -> &str {
        &self.record.tag
    }

    pub fn status(&self) -> FailureStatus {
        self.record.status
    }

    pub fn form(&self) -> &FailureForm {
        &self.form
    }

    pub fn set_failure_date(&mut self, failure_date: DateTime<Utc>) {
        self.form.failure_date = minute_precision(failure_date);
    }

    pub fn set_classification(
        &mut self,
        classification: AnpClassification,
    ) {
        self.form.anp_classification = Some(classification);
    }

    pub fn set_description(&mut self, description: String) {
        self.form.description = description;
    }

    pub fn set_corrective_action(&mut self, corrective_action: String) {
        self.form.corrective_action = corrective_action;
    }

    /// Whether the approve action is offered: Draft records only.
    pub fn can_approve(&self) -> bool {
        self.record.status == FailureStatus::Draft
    }

    /// Persist the edited fields.
    ///
    /// On success the session's server copy is replaced with the updated
    /// record.  On failure, returns the one-line notice to surface.
    pub async fn save(&mut self) -> Result<(), String> {
        let update = FailureUpdate {
            failure_date: Some(self.form.failure_date),
            anp_classification: self.form.anp_classification,
            description: Some(self.form.description.clone()),
            corrective_action: Some(self.form.corrective_action.clone()),
            ..Default::default()
        };
        match self.client.failure_update(self.record.id, &update).await {
            Ok(record) => {
                self.form = FailureForm::from_record(&record);
                self.record = record;
                Ok(())
            }
            Err(Error::Api { message, .. }) => Err(message),
            Err(Error::Status { status_text, .. }) => {
                Err(format!("API Error: {}", status_text))
            }
            Err(_) => Err(String::from("Error saving changes")),
        }
    }

    /// Approve this Draft record.
    ///
    /// On success the local status flips to Approved without re-fetching the
    /// record; on failure, returns the one-line notice.  No retry.
    pub async fn approve(&mut self) -> Result<(), String> {
        if !self.can_approve() {
            return Err(String::from(
                "only Draft notifications can be approved",
            ));
        }
        match self
            .client
            .failure_approve(self.record.id, APPROVER_IDENTITY)
            .await
        {
            Ok(_) => {
                // Optimistic local update, matching the page behavior: flip
                // the status and leave every other field as edited.
                self.record.status = FailureStatus::Approved;
                info!(
                    self.log,
                    "approved failure notification";
                    "failure_id" => self.record.id,
                );
                Ok(())
            }
            Err(_) => Err(String::from("Approval failed")),
        }
    }
}

/// Truncate a timestamp to minute precision for editing.
fn minute_precision(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_second(0).and_then(|dt| dt.with_nanosecond(0)).unwrap_or(dt)
}
