// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory store for failure notifications, alerts, and the report
//! distribution list
//!
//! Records live in plain maps behind one lock.  The store enforces the
//! workflow invariant the HTTP layer relies on: status transitions are
//! monotonic (`Draft → Approved → Submitted`), and each transition endpoint
//! rejects records that are not in the expected source state.

use chrono::Utc;
use failures_api::classification;
use failures_api::Alert;
use failures_api::AlertCreate;
use failures_api::AlertListFilter;
use failures_api::AnpStatus;
use failures_api::EmailListEntry;
use failures_api::EmailListEntryCreate;
use failures_api::EmailListFilter;
use failures_api::FailureCreate;
use failures_api::FailureListFilter;
use failures_api::FailureRecord;
use failures_api::FailureStatus;
use failures_api::FailureUpdate;
use mmt_common::Error;
use mmt_common::ResourceType;
use slog::info;
use slog::Logger;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

#[derive(Clone)]
pub struct Store {
    log: Logger,
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    next_failure_id: u64,
    next_alert_id: u64,
    next_email_id: u64,
    failures: BTreeMap<u64, FailureRecord>,
    alerts: BTreeMap<u64, Alert>,
    emails: BTreeMap<u64, EmailListEntry>,
}

impl Store {
    pub fn new(log: Logger) -> Store {
        Store { log, inner: Arc::new(Mutex::new(Inner::default())) }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock means another request handler panicked while
        // holding it.  There is no partial write to recover from (mutations
        // replace whole records), so keep going with the current state.
        self.inner.lock().unwrap_or_else(|err| err.into_inner())
    }

    pub fn failure_list(
        &self,
        filter: &FailureListFilter,
    ) -> Vec<FailureRecord> {
        let inner = self.lock();
        let skip = filter.skip.unwrap_or(0) as usize;
        let limit = filter.limit.unwrap_or(100) as usize;
        inner
            .failures
            .values()
            .filter(|f| match filter.status {
                Some(status) => f.status == status,
                None => true,
            })
            .filter(|f| match filter.open {
                Some(true) => f.status.is_open(),
                Some(false) => !f.status.is_open(),
                None => true,
            })
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn failure_create(&self, params: FailureCreate) -> FailureRecord {
        let mut inner = self.lock();
        inner.next_failure_id += 1;
        let id = inner.next_failure_id;
        let record = FailureRecord {
            id,
            fpso_name: params.fpso_name,
            tag: params.tag,
            failure_date: params.failure_date,
            restoration_date: params.restoration_date,
            description: params.description,
            corrective_action: params.corrective_action,
            impact: params.impact,
            anp_classification: params.anp_classification,
            anp_deadline: classification::initial_notification_deadline(
                params.failure_date,
            ),
            anp_submitted_date: None,
            anp_status: AnpStatus::Pending,
            status: FailureStatus::Draft,
            approved_by: None,
            approved_at: None,
            created_at: Utc::now(),
        };
        inner.failures.insert(id, record.clone());
        info!(
            self.log,
            "created failure notification";
            "failure_id" => id,
            "tag" => &record.tag,
        );
        record
    }

    pub fn failure_get(&self, id: u64) -> Result<FailureRecord, Error> {
        let inner = self.lock();
        inner.failures.get(&id).cloned().ok_or_else(|| {
            Error::not_found_by_id(ResourceType::FailureNotification, id)
        })
    }

    pub fn failure_update(
        &self,
        id: u64,
        update: FailureUpdate,
    ) -> Result<FailureRecord, Error> {
        let mut inner = self.lock();
        let record = inner.failures.get_mut(&id).ok_or_else(|| {
            Error::not_found_by_id(ResourceType::FailureNotification, id)
        })?;
        if let Some(failure_date) = update.failure_date {
            record.failure_date = failure_date;
            record.anp_deadline =
                classification::initial_notification_deadline(failure_date);
        }
        if let Some(restoration_date) = update.restoration_date {
            record.restoration_date = Some(restoration_date);
        }
        if let Some(description) = update.description {
            record.description = description;
        }
        if let Some(corrective_action) = update.corrective_action {
            record.corrective_action = corrective_action;
        }
        if let Some(impact) = update.impact {
            record.impact = Some(impact);
        }
        if let Some(classification) = update.anp_classification {
            record.anp_classification = Some(classification);
        }
        Ok(record.clone())
    }

    /// Approve a Draft failure notification.
    ///
    /// Also kicks off report distribution to the active email entries for
    /// the record's FPSO.  Distribution is log-only; actual mail delivery
    /// belongs to the surrounding infrastructure.
    pub fn failure_approve(
        &self,
        id: u64,
        approved_by: String,
    ) -> Result<FailureRecord, Error> {
        let mut inner = self.lock();
        let Inner { failures, emails, .. } = &mut *inner;
        let record = failures.get_mut(&id).ok_or_else(|| {
            Error::not_found_by_id(ResourceType::FailureNotification, id)
        })?;
        if record.status != FailureStatus::Draft {
            return Err(Error::invalid_request(
                "only Draft notifications can be approved",
            ));
        }
        record.status = FailureStatus::Approved;
        record.approved_by = Some(approved_by);
        record.approved_at = Some(Utc::now());

        let recipients = emails
            .values()
            .filter(|e| e.fpso_name == record.fpso_name && e.is_active);
        for recipient in recipients {
            info!(
                self.log,
                "distributing approved failure report";
                "failure_id" => id,
                "recipient" => &recipient.email,
            );
        }
        Ok(record.clone())
    }

    /// Submit an Approved failure notification to the ANP.
    pub fn failure_anp_submit(&self, id: u64) -> Result<FailureRecord, Error> {
        let mut inner = self.lock();
        let record = inner.failures.get_mut(&id).ok_or_else(|| {
            Error::not_found_by_id(ResourceType::FailureNotification, id)
        })?;
        if record.status != FailureStatus::Approved {
            return Err(Error::invalid_request(
                "only approved notifications can be submitted",
            ));
        }
        record.anp_submitted_date = Some(Utc::now());
        record.anp_status = AnpStatus::Submitted;
        record.status = FailureStatus::Submitted;
        info!(
            self.log,
            "submitted failure notification to ANP";
            "failure_id" => id,
        );
        Ok(record.clone())
    }

    pub fn email_list(&self, filter: &EmailListFilter) -> Vec<EmailListEntry> {
        let inner = self.lock();
        inner
            .emails
            .values()
            .filter(|e| match &filter.fpso_name {
                Some(fpso_name) => &e.fpso_name == fpso_name,
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn email_add(&self, params: EmailListEntryCreate) -> EmailListEntry {
        let mut inner = self.lock();
        inner.next_email_id += 1;
        let id = inner.next_email_id;
        let entry = EmailListEntry {
            id,
            fpso_name: params.fpso_name,
            email: params.email,
            is_active: params.is_active,
        };
        inner.emails.insert(id, entry.clone());
        entry
    }

    /// List alerts, newest first.
    pub fn alert_list(&self, filter: &AlertListFilter) -> Vec<Alert> {
        let inner = self.lock();
        let mut alerts: Vec<Alert> = inner
            .alerts
            .values()
            .filter(|a| match filter.severity {
                Some(severity) => a.severity == severity,
                None => true,
            })
            .filter(|a| match filter.acknowledged {
                Some(acknowledged) => a.acknowledged == acknowledged,
                None => true,
            })
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        alerts
    }

    pub fn alert_create(&self, params: AlertCreate) -> Alert {
        let mut inner = self.lock();
        inner.next_alert_id += 1;
        let id = inner.next_alert_id;
        let alert = Alert {
            id,
            severity: params.severity,
            title: params.title,
            message: params.message,
            created_at: Utc::now(),
            acknowledged: false,
            acknowledged_by: None,
            acknowledged_at: None,
        };
        inner.alerts.insert(id, alert.clone());
        alert
    }

    pub fn alert_acknowledge(
        &self,
        id: u64,
        acknowledged_by: String,
    ) -> Result<Alert, Error> {
        let mut inner = self.lock();
        let alert = inner
            .alerts
            .get_mut(&id)
            .ok_or_else(|| Error::not_found_by_id(ResourceType::Alert, id))?;
        alert.acknowledged = true;
        alert.acknowledged_by = Some(acknowledged_by);
        alert.acknowledged_at = Some(Utc::now());
        Ok(alert.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use failures_api::AlertSeverity;
    use failures_api::AnpClassification;
    use failures_api::Impact;

    fn test_store() -> Store {
        let log = slog::Logger::root(slog::Discard, slog::o!());
        Store::new(log)
    }

    fn create_params(tag: &str) -> FailureCreate {
        FailureCreate {
            fpso_name: "SEPETIBA".to_string(),
            tag: tag.to_string(),
            failure_date: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
            description: "flow meter drift".to_string(),
            corrective_action: String::new(),
            impact: None,
            anp_classification: None,
            restoration_date: None,
        }
    }

    #[test]
    fn test_create_assigns_id_and_deadline() {
        let store = test_store();
        let record = store.failure_create(create_params("FT-101"));
        assert_eq!(record.id, 1);
        assert_eq!(record.status, FailureStatus::Draft);
        assert_eq!(record.anp_status, AnpStatus::Pending);
        assert_eq!(
            record.anp_deadline,
            Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap()
        );

        let second = store.failure_create(create_params("FT-102"));
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let store = test_store();
        let error = store.failure_get(7).unwrap_err();
        assert!(matches!(error, Error::ObjectNotFound { .. }));
    }

    #[test]
    fn test_approve_requires_draft() {
        let store = test_store();
        let record = store.failure_create(create_params("FT-101"));

        let approved = store
            .failure_approve(record.id, "Marcos G. (ME)".to_string())
            .unwrap();
        assert_eq!(approved.status, FailureStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("Marcos G. (ME)"));
        assert!(approved.approved_at.is_some());

        // A second approve must be rejected: the transition is one-way.
        let error = store
            .failure_approve(record.id, "Marcos G. (ME)".to_string())
            .unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { .. }));
    }

    #[test]
    fn test_anp_submit_requires_approved() {
        let store = test_store();
        let record = store.failure_create(create_params("FT-101"));

        let error = store.failure_anp_submit(record.id).unwrap_err();
        assert!(matches!(error, Error::InvalidRequest { .. }));

        store
            .failure_approve(record.id, "Marcos G. (ME)".to_string())
            .unwrap();
        let submitted = store.failure_anp_submit(record.id).unwrap();
        assert_eq!(submitted.status, FailureStatus::Submitted);
        assert_eq!(submitted.anp_status, AnpStatus::Submitted);
        assert!(submitted.anp_submitted_date.is_some());
    }

    #[test]
    fn test_update_recomputes_deadline() {
        let store = test_store();
        let record = store.failure_create(create_params("FT-101"));
        let moved = Utc.with_ymd_and_hms(2024, 2, 1, 8, 30, 0).unwrap();
        let updated = store
            .failure_update(
                record.id,
                FailureUpdate {
                    failure_date: Some(moved),
                    description: Some("updated".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.failure_date, moved);
        assert_eq!(
            updated.anp_deadline,
            Utc.with_ymd_and_hms(2024, 2, 2, 8, 30, 0).unwrap()
        );
        assert_eq!(updated.description, "updated");
        // Untouched fields survive.
        assert_eq!(updated.tag, "FT-101");
    }

    #[test]
    fn test_list_filters() {
        let store = test_store();
        let first = store.failure_create(create_params("FT-101"));
        let _second = store.failure_create(create_params("FT-102"));
        store.failure_approve(first.id, "approver".to_string()).unwrap();
        store.failure_anp_submit(first.id).unwrap();

        let open = store.failure_list(&FailureListFilter {
            open: Some(true),
            ..Default::default()
        });
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].tag, "FT-102");

        let submitted = store.failure_list(&FailureListFilter {
            status: Some(FailureStatus::Submitted),
            ..Default::default()
        });
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].tag, "FT-101");

        let limited = store.failure_list(&FailureListFilter {
            limit: Some(1),
            ..Default::default()
        });
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_update_does_not_change_status() {
        let store = test_store();
        let record = store.failure_create(create_params("FT-101"));
        let updated = store
            .failure_update(
                record.id,
                FailureUpdate {
                    impact: Some(Impact::High),
                    anp_classification: Some(AnpClassification::Critica),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.status, FailureStatus::Draft);
        assert!(updated.is_critical());
    }

    #[test]
    fn test_alert_acknowledge_clears_unread() {
        let store = test_store();
        store.alert_create(AlertCreate {
            severity: AlertSeverity::Warning,
            title: "meter offline".to_string(),
            message: String::new(),
        });
        let alert = store.alert_create(AlertCreate {
            severity: AlertSeverity::Critical,
            title: "flow computer fault".to_string(),
            message: String::new(),
        });

        let unread = store.alert_list(&AlertListFilter {
            acknowledged: Some(false),
            ..Default::default()
        });
        assert_eq!(unread.len(), 2);

        store
            .alert_acknowledge(alert.id, "operator".to_string())
            .unwrap();
        let unread = store.alert_list(&AlertListFilter {
            acknowledged: Some(false),
            ..Default::default()
        });
        assert_eq!(unread.len(), 1);
    }
}
