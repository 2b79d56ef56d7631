// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Failure classification constants
//!
//! Severity tiers, workflow statuses, and regulatory deadlines for failure
//! notifications reported to the ANP under Resolução 18/2014.  The wire
//! representation keeps the Portuguese tier labels used by the regulator.

use chrono::DateTime;
use chrono::TimeDelta;
use chrono::Utc;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// Hours after the failure event within which the initial ANP notification is
/// due.
pub const ANP_INITIAL_NOTIFICATION_HOURS: i64 = 24;

/// Days after the failure event within which the final ANP report is due.
pub const ANP_FINAL_REPORT_DAYS: i64 = 30;

/// Deadline for the initial regulatory notification of a failure.
pub fn initial_notification_deadline(
    failure_date: DateTime<Utc>,
) -> DateTime<Utc> {
    failure_date + TimeDelta::hours(ANP_INITIAL_NOTIFICATION_HOURS)
}

/// Deadline for the final regulatory report of a failure.
pub fn final_report_deadline(failure_date: DateTime<Utc>) -> DateTime<Utc> {
    failure_date + TimeDelta::days(ANP_FINAL_REPORT_DAYS)
}

/// ANP severity tier for a reported failure
///
/// Variants are ordered by increasing severity.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Eq,
    JsonSchema,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub enum AnpClassification {
    #[serde(rename = "Tolerável")]
    Toleravel,
    Grave,
    #[serde(rename = "Crítica")]
    Critica,
}

impl fmt::Display for AnpClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnpClassification::Toleravel => "Tolerável",
            AnpClassification::Grave => "Grave",
            AnpClassification::Critica => "Crítica",
        })
    }
}

/// Workflow status of a failure notification
///
/// Transitions are monotonic: `Draft → Approved → Submitted`.  ("Waiting
/// Approval" exists in the data model for records routed through a reviewer,
/// but no transition into it is exposed by this service.)
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize,
)]
pub enum FailureStatus {
    Draft,
    #[serde(rename = "Waiting Approval")]
    WaitingApproval,
    Approved,
    Submitted,
}

impl FailureStatus {
    /// Human-readable label, as displayed by the editor.
    pub fn label(&self) -> &'static str {
        match self {
            FailureStatus::Draft => "Draft",
            FailureStatus::WaitingApproval => "Waiting Approval",
            FailureStatus::Approved => "Approved",
            FailureStatus::Submitted => "Submitted",
        }
    }

    /// Whether a notification in this status still counts as an open failure.
    pub fn is_open(&self) -> bool {
        !matches!(self, FailureStatus::Submitted)
    }
}

impl fmt::Display for FailureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Operational impact of a failure, used by the critical-alert filter
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize,
)]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Regulatory submission state, tracked alongside the workflow status
#[derive(
    Clone, Copy, Debug, Deserialize, Eq, JsonSchema, PartialEq, Serialize,
)]
pub enum AnpStatus {
    Pending,
    Submitted,
}
