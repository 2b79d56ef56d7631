// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background task watching for open critical failures

use super::driver::BackgroundTask;
use failures_api::FailureListFilter;
use failures_api::FailureRecord;
use failures_client::Client;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use serde_json::json;
use slog::warn;
use slog::Logger;
use std::time::Duration;
use tokio::sync::watch;

/// How often the open-failures poll runs.
pub const CRITICAL_FAILURE_POLL_PERIOD: Duration = Duration::from_secs(60);

/// One successful poll of the open failures list
///
/// `generation` increments on every successful poll, whether or not the
/// result changed; the banner uses it to tell "the same alert, re-fetched"
/// apart from "no news", which is what its dismiss semantics need.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CriticalFailureSnapshot {
    pub generation: u64,
    /// The first open failure that qualifies as critical, if any.
    pub failure: Option<FailureRecord>,
}

/// Background task publishing the latest critical open failure
pub struct CriticalFailureWatcher {
    client: Client,
    generation: u64,
    tx: watch::Sender<Option<CriticalFailureSnapshot>>,
    rx: watch::Receiver<Option<CriticalFailureSnapshot>>,
}

impl CriticalFailureWatcher {
    pub fn new(client: Client) -> CriticalFailureWatcher {
        let (tx, rx) = watch::channel(None);
        CriticalFailureWatcher { client, generation: 0, tx, rx }
    }

    /// Exposes the latest snapshot of the critical open failure
    ///
    /// You can use the returned [`watch::Receiver`] to look at the latest
    /// snapshot or to be notified when a poll completes.
    pub fn watcher(&self) -> watch::Receiver<Option<CriticalFailureSnapshot>> {
        self.rx.clone()
    }
}

impl BackgroundTask for CriticalFailureWatcher {
    fn activate<'a>(
        &'a mut self,
        log: &'a Logger,
    ) -> BoxFuture<'a, serde_json::Value> {
        async move {
            let result = self
                .client
                .failure_list(&FailureListFilter {
                    open: Some(true),
                    ..Default::default()
                })
                .await;

            let failures = match result {
                Ok(failures) => failures,
                Err(error) => {
                    // Silent degradation: the previous snapshot stays in
                    // place and subscribers see nothing new.
                    warn!(
                        log,
                        "failed to fetch open failures";
                        "error" => %error,
                    );
                    return json!({
                        "error":
                            format!("failed to fetch open failures: {}", error)
                    });
                }
            };

            self.generation += 1;
            let failure =
                failures.into_iter().find(FailureRecord::is_critical);
            let rv = json!({
                "generation": self.generation,
                "critical_failure_id": failure.as_ref().map(|f| f.id),
            });
            self.tx.send_replace(Some(CriticalFailureSnapshot {
                generation: self.generation,
                failure,
            }));
            rv
        }
        .boxed()
    }
}
