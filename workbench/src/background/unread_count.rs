// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background task watching the unacknowledged alert count

use super::driver::BackgroundTask;
use failures_client::Client;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde_json::json;
use slog::warn;
use slog::Logger;
use std::time::Duration;
use tokio::sync::watch;

/// How often the unread-count poll runs.
pub const UNREAD_COUNT_POLL_PERIOD: Duration = Duration::from_secs(30);

/// Background task publishing the number of unacknowledged alerts
pub struct UnreadCountWatcher {
    client: Client,
    tx: watch::Sender<Option<usize>>,
    rx: watch::Receiver<Option<usize>>,
}

impl UnreadCountWatcher {
    pub fn new(client: Client) -> UnreadCountWatcher {
        let (tx, rx) = watch::channel(None);
        UnreadCountWatcher { client, tx, rx }
    }

    /// Exposes the latest unread count (`None` until the first successful
    /// poll).
    pub fn watcher(&self) -> watch::Receiver<Option<usize>> {
        self.rx.clone()
    }
}

impl BackgroundTask for UnreadCountWatcher {
    fn activate<'a>(
        &'a mut self,
        log: &'a Logger,
    ) -> BoxFuture<'a, serde_json::Value> {
        async move {
            match self.client.alert_unread_count().await {
                Ok(count) => {
                    self.tx.send_replace(Some(count));
                    json!({ "unread_count": count })
                }
                Err(error) => {
                    warn!(
                        log,
                        "failed to fetch unread alert count";
                        "error" => %error,
                    );
                    json!({
                        "error": format!(
                            "failed to fetch unread alert count: {}",
                            error
                        )
                    })
                }
            }
        }
        .boxed()
    }
}
