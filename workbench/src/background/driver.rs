// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Common facilities for background polling tasks
//!
//! A [`Driver`] owns a set of named tasks, each running on its own fixed
//! period.  Tasks can also be activated explicitly (`wakeup`), and each
//! activation reports a status value that the driver retains for
//! inspection.  All tasks are aborted when the driver is dropped.

use chrono::DateTime;
use chrono::Utc;
use futures::future::BoxFuture;
use slog::debug;
use slog::o;
use slog::Logger;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;
use tokio::sync::watch;
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

/// An operation driven on a fixed period by the [`Driver`]
pub trait BackgroundTask: Send + Sync {
    /// Run one iteration, returning a status value retained by the driver.
    fn activate<'a>(
        &'a mut self,
        log: &'a Logger,
    ) -> BoxFuture<'a, serde_json::Value>;
}

struct Task {
    status: watch::Receiver<TaskStatus>,
    tokio_task: tokio::task::JoinHandle<()>,
    notify: Arc<Notify>,
}

/// Drives a set of registered background tasks
pub struct Driver {
    tasks: BTreeMap<TaskHandle, Task>,
}

/// Identifies a task registered with a [`Driver`]
#[derive(Clone, Debug, Ord, PartialOrd, PartialEq, Eq)]
pub struct TaskHandle(String);

impl Driver {
    pub fn new() -> Driver {
        Driver { tasks: BTreeMap::new() }
    }

    /// Register a task to run every `period`, starting immediately.
    pub fn register(
        &mut self,
        name: String,
        period: Duration,
        imp: Box<dyn BackgroundTask>,
        log: &Logger,
    ) -> TaskHandle {
        let (status_tx, status_rx) =
            watch::channel(TaskStatus { current: None, last: None });
        let notify = Arc::new(Notify::new());
        let task_log = log.new(o!("background_task" => name.clone()));
        let task_exec = TaskExec {
            period,
            imp,
            notify: Arc::clone(&notify),
            log: task_log,
            status_tx,
            iteration: 0,
        };
        let tokio_task = tokio::task::spawn(task_exec.run());

        let task = Task { status: status_rx, tokio_task, notify };
        if self.tasks.insert(TaskHandle(name.clone()), task).is_some() {
            panic!("started two background tasks called {:?}", name);
        }

        TaskHandle(name)
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskHandle> {
        self.tasks.keys()
    }

    /// Activate the given task as soon as it is idle.
    pub fn wakeup(&self, task: &TaskHandle) {
        self.task(task).notify.notify_one();
    }

    pub fn status(&self, task: &TaskHandle) -> TaskStatus {
        self.task(task).status.borrow().clone()
    }

    /// Waits until the given task has completed at least one activation.
    ///
    /// Returns immediately if it already has.
    pub async fn wait_for_first_activation(&self, task: &TaskHandle) {
        let mut status = self.task(task).status.clone();
        while status.borrow().last.is_none() {
            if status.changed().await.is_err() {
                return;
            }
        }
    }

    /// Activates the given task and waits for an activation begun no
    /// earlier than this call to complete.
    ///
    /// The status snapshot is taken before the wakeup is sent, so this
    /// cannot miss the resulting completion.
    pub async fn activate(&self, task: &TaskHandle) {
        let mut status = self.task(task).status.clone();
        let seen = status.borrow().last.as_ref().map(|last| last.iteration);
        self.wakeup(task);
        while status.borrow().last.as_ref().map(|last| last.iteration) == seen
        {
            if status.changed().await.is_err() {
                return;
            }
        }
    }

    fn task(&self, task: &TaskHandle) -> &Task {
        // It should be hard to hit this in practice, since you'd have to
        // have gotten a TaskHandle from another Driver instance.
        self.tasks.get(task).unwrap_or_else(|| {
            panic!("no such background task: {:?}", task)
        })
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        for (_, t) in &self.tasks {
            t.tokio_task.abort();
        }
    }
}

struct TaskExec {
    period: Duration,
    imp: Box<dyn BackgroundTask>,
    notify: Arc<Notify>,
    log: Logger,
    status_tx: watch::Sender<TaskStatus>,
    iteration: u64,
}

impl TaskExec {
    async fn run(mut self) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.activate(ActivationReason::Timeout).await;
                },

                _ = self.notify.notified() => {
                    self.activate(ActivationReason::Signaled).await;
                }
            }
        }
    }

    async fn activate(&mut self, reason: ActivationReason) {
        self.iteration += 1;
        let iteration = self.iteration;
        let start_time = Utc::now();
        let start_instant = Instant::now();

        debug!(
            &self.log,
            "activating";
            "reason" => ?reason,
            "iteration" => iteration
        );

        self.status_tx.send_modify(|status| {
            status.current =
                Some(LastStart { start_time, reason, iteration });
        });

        let value = self.imp.activate(&self.log).await;
        let elapsed = start_instant.elapsed();

        self.status_tx.send_modify(|status| {
            status.current = None;
            status.last =
                Some(LastResult { iteration, start_time, elapsed, value });
        });

        debug!(
            &self.log,
            "activation complete";
            "elapsed" => ?elapsed,
            "iteration" => iteration,
        );
    }
}

#[derive(Debug, Clone, Copy)]
pub enum ActivationReason {
    Signaled,
    Timeout,
}

#[derive(Clone, Debug)]
pub struct TaskStatus {
    /// activation currently in progress, if any
    pub current: Option<LastStart>,
    /// most recently completed activation, if any
    pub last: Option<LastResult>,
}

#[derive(Clone, Debug)]
pub struct LastStart {
    pub start_time: DateTime<Utc>,
    pub reason: ActivationReason,
    pub iteration: u64,
}

#[derive(Clone, Debug)]
pub struct LastResult {
    pub iteration: u64,
    pub start_time: DateTime<Utc>,
    pub elapsed: Duration,
    pub value: serde_json::Value,
}

#[cfg(test)]
mod test {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    struct CountingTask {
        count: Arc<AtomicUsize>,
    }

    impl BackgroundTask for CountingTask {
        fn activate<'a>(
            &'a mut self,
            _log: &'a Logger,
        ) -> BoxFuture<'a, serde_json::Value> {
            async {
                let n = self.count.fetch_add(1, Ordering::SeqCst) + 1;
                serde_json::json!({ "count": n })
            }
            .boxed()
        }
    }

    #[tokio::test]
    async fn test_driver_periodic_and_signaled_activation() {
        let log = Logger::root(slog::Discard, o!());
        let count = Arc::new(AtomicUsize::new(0));
        let mut driver = Driver::new();
        let handle = driver.register(
            "counting".to_string(),
            // Long period: only the immediate first tick and explicit
            // wakeups should fire within this test.
            Duration::from_secs(3600),
            Box::new(CountingTask { count: Arc::clone(&count) }),
            &log,
        );

        // The interval fires immediately on startup.
        driver.wait_for_first_activation(&handle).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        driver.activate(&handle).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        let status = driver.status(&handle);
        let last = status.last.expect("completed activation");
        assert_eq!(last.iteration, 2);
        assert_eq!(last.value, serde_json::json!({ "count": 2 }));
    }
}
