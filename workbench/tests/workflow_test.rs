// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the dashboard workflow layer against a real server

use anyhow::Result;
use chrono::TimeZone;
use chrono::Utc;
use dropshot::test_util::LogContext;
use dropshot::ConfigLogging;
use dropshot::ConfigLoggingIfExists;
use dropshot::ConfigLoggingLevel;
use failures_api::AlertCreate;
use failures_api::AlertSeverity;
use failures_api::FailureCreate;
use failures_api::FailureStatus;
use failures_api::Impact;
use failures_client::Client;
use failures_server::TransientServer;
use mmt_workbench::background::BackgroundTask;
use mmt_workbench::background::CriticalFailureWatcher;
use mmt_workbench::background::UnreadCountWatcher;
use mmt_workbench::banner::AlertBanner;
use mmt_workbench::editor::FailureEditor;
use mmt_workbench::editor::APPROVER_IDENTITY;
use mmt_workbench::navigation::UnreadBadge;

fn test_setup_log(test_name: &str) -> LogContext {
    let log_config = ConfigLogging::File {
        level: ConfigLoggingLevel::Trace,
        path: "UNUSED".into(),
        if_exists: ConfigLoggingIfExists::Fail,
    };
    LogContext::new(test_name, &log_config)
}

async fn init_client_server(
    test_name: &str,
) -> Result<(LogContext, TransientServer, Client)> {
    let logctx = test_setup_log(test_name);
    let server = TransientServer::new(&logctx.log).await?;
    let client = Client::new(
        &format!("http://{}", server.local_addr()),
        logctx.log.clone(),
    );
    Ok((logctx, server, client))
}

fn create_params(tag: &str, impact: Option<Impact>) -> FailureCreate {
    FailureCreate {
        fpso_name: "SEPETIBA".to_string(),
        tag: tag.to_string(),
        failure_date: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
        description: "ultrasonic meter dropout".to_string(),
        corrective_action: String::new(),
        impact,
        anp_classification: None,
        restoration_date: None,
    }
}

#[tokio::test]
async fn editor_session() -> Result<()> {
    let (logctx, _server, client) =
        init_client_server("editor_session").await?;

    let record = client.failure_create(&create_params("FT-101", None)).await?;

    let mut editor =
        FailureEditor::load(client.clone(), logctx.log.clone(), record.id)
            .await
            .expect("loading an existing failure");
    assert_eq!(editor.tag(), "FT-101");
    assert_eq!(editor.fpso_name(), "SEPETIBA");
    assert_eq!(editor.status(), FailureStatus::Draft);
    assert!(editor.can_approve());

    // Edit, save, and confirm the server took the change.
    editor.set_description("ultrasonic meter dropout on run 2".to_string());
    editor
        .set_corrective_action("transducer pair replaced".to_string());
    editor.save().await.expect("saving edited fields");
    let fetched = client.failure_get(record.id).await?;
    assert_eq!(fetched.description, "ultrasonic meter dropout on run 2");
    assert_eq!(fetched.corrective_action, "transducer pair replaced");
    assert_eq!(fetched.status, FailureStatus::Draft);

    // Approve: local status flips without a re-fetch, and the server records
    // the approver.
    editor.approve().await.expect("approving a draft");
    assert_eq!(editor.status(), FailureStatus::Approved);
    assert!(!editor.can_approve());
    let fetched = client.failure_get(record.id).await?;
    assert_eq!(fetched.status, FailureStatus::Approved);
    assert_eq!(fetched.approved_by.as_deref(), Some(APPROVER_IDENTITY));

    // A second approve is refused locally.
    let error = editor.approve().await.unwrap_err();
    assert_eq!(error, "only Draft notifications can be approved");

    logctx.cleanup_successful();
    Ok(())
}

#[tokio::test]
async fn editor_load_missing() -> Result<()> {
    let (logctx, _server, client) =
        init_client_server("editor_load_missing").await?;

    let failure =
        match FailureEditor::load(client, logctx.log.clone(), 999).await {
            Ok(_) => panic!("expected loading a missing failure to fail"),
            Err(failure) => failure,
        };
    assert_eq!(failure.notice, "Failure not found");
    assert!(failure.redirect_to_list);

    logctx.cleanup_successful();
    Ok(())
}

#[tokio::test]
async fn banner_follows_polls() -> Result<()> {
    let (logctx, _server, client) =
        init_client_server("banner_follows_polls").await?;

    client
        .failure_create(&create_params("FT-101", Some(Impact::Medium)))
        .await?;
    let critical = client
        .failure_create(&create_params("FT-102", Some(Impact::High)))
        .await?;

    // Drive the watcher by hand rather than waiting on its timer.
    let mut watcher = CriticalFailureWatcher::new(client.clone());
    let mut banner = AlertBanner::new(watcher.watcher());

    // Nothing to show before the first poll.
    assert_eq!(banner.current(), None);

    watcher.activate(&logctx.log).await;
    let alert = banner.current().expect("banner after a matching poll");
    assert_eq!(alert.failure_id, critical.id);
    assert_eq!(alert.tag, "FT-102");

    // Dismissed stays hidden until the next successful poll.
    banner.dismiss();
    assert_eq!(banner.current(), None);
    watcher.activate(&logctx.log).await;
    assert!(banner.current().is_some());

    // Once the failure is submitted it is no longer open, so the banner
    // clears on the next poll.
    client.failure_approve(critical.id, APPROVER_IDENTITY).await?;
    client.failure_anp_submit(critical.id).await?;
    watcher.activate(&logctx.log).await;
    assert_eq!(banner.current(), None);

    logctx.cleanup_successful();
    Ok(())
}

#[tokio::test]
async fn polling_tasks_feed_widgets() -> Result<()> {
    let (logctx, _server, client) =
        init_client_server("polling_tasks_feed_widgets").await?;

    client
        .failure_create(&create_params("FT-102", Some(Impact::High)))
        .await?;
    client
        .alert_create(&AlertCreate {
            severity: AlertSeverity::Warning,
            title: "meter offline".to_string(),
            message: String::new(),
        })
        .await?;

    let tasks = mmt_workbench::background::init(&client, &logctx.log);
    let banner = AlertBanner::new(tasks.critical_failures.clone());
    let badge = UnreadBadge::new(tasks.unread_count.clone());

    // Both tasks poll once immediately on startup.
    tasks.driver.wait_for_first_activation(&tasks.task_critical_failures).await;
    tasks.driver.wait_for_first_activation(&tasks.task_unread_count).await;
    assert_eq!(banner.current().expect("banner visible").tag, "FT-102");
    assert_eq!(badge.count(), 1);

    // An explicit activation refreshes a widget without waiting on its
    // timer.
    client
        .alert_create(&AlertCreate {
            severity: AlertSeverity::Critical,
            title: "flow computer fault".to_string(),
            message: String::new(),
        })
        .await?;
    tasks.driver.activate(&tasks.task_unread_count).await;
    assert_eq!(badge.count(), 2);

    logctx.cleanup_successful();
    Ok(())
}

#[tokio::test]
async fn unread_badge_follows_polls() -> Result<()> {
    let (logctx, _server, client) =
        init_client_server("unread_badge_follows_polls").await?;

    let mut watcher = UnreadCountWatcher::new(client.clone());
    let badge = UnreadBadge::new(watcher.watcher());

    // Hidden before the first poll.
    assert!(!badge.is_visible());

    client
        .alert_create(&AlertCreate {
            severity: AlertSeverity::Warning,
            title: "meter offline".to_string(),
            message: String::new(),
        })
        .await?;
    let alert = client
        .alert_create(&AlertCreate {
            severity: AlertSeverity::Critical,
            title: "flow computer fault".to_string(),
            message: String::new(),
        })
        .await?;

    watcher.activate(&logctx.log).await;
    assert!(badge.is_visible());
    assert_eq!(badge.count(), 2);

    client.alert_acknowledge(alert.id, "operator").await?;
    watcher.activate(&logctx.log).await;
    assert_eq!(badge.count(), 1);

    logctx.cleanup_successful();
    Ok(())
}
