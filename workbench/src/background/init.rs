// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background task initialization

use super::critical_failures::CriticalFailureSnapshot;
use super::critical_failures::CriticalFailureWatcher;
use super::critical_failures::CRITICAL_FAILURE_POLL_PERIOD;
use super::driver::Driver;
use super::driver::TaskHandle;
use super::unread_count::UnreadCountWatcher;
use super::unread_count::UNREAD_COUNT_POLL_PERIOD;
use failures_client::Client;
use slog::Logger;
use tokio::sync::watch;

/// The running polling tasks and the channels they publish on
///
/// Widgets subscribe to the receivers; the handles exist so a caller can
/// force an immediate poll (`Driver::wakeup`) after an action that changes
/// what a widget should display, e.g. acknowledging an alert.
pub struct BackgroundTasks {
    /// Owns the tasks; dropping this aborts them.
    pub driver: Driver,
    pub task_critical_failures: TaskHandle,
    pub task_unread_count: TaskHandle,
    pub critical_failures: watch::Receiver<Option<CriticalFailureSnapshot>>,
    pub unread_count: watch::Receiver<Option<usize>>,
}

/// Kick off the dashboard's polling tasks.
pub fn init(client: &Client, log: &Logger) -> BackgroundTasks {
    let mut driver = Driver::new();

    let critical = CriticalFailureWatcher::new(client.clone());
    let critical_failures = critical.watcher();
    let task_critical_failures = driver.register(
        String::from("critical_failures"),
        CRITICAL_FAILURE_POLL_PERIOD,
        Box::new(critical),
        log,
    );

    let unread = UnreadCountWatcher::new(client.clone());
    let unread_count = unread.watcher();
    let task_unread_count = driver.register(
        String::from("unread_count"),
        UNREAD_COUNT_POLL_PERIOD,
        Box::new(unread),
        log,
    );

    BackgroundTasks {
        driver,
        task_critical_failures,
        task_unread_count,
        critical_failures,
        unread_count,
    }
}
