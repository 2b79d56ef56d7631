// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Global critical-alert banner
//!
//! Subscribes to the snapshots published by
//! [`CriticalFailureWatcher`](crate::background::CriticalFailureWatcher) and
//! applies the banner's display rules: at most one alert at a time, and a
//! dismissed banner stays hidden until the next successful poll that carries
//! at least one qualifying failure.

use crate::background::CriticalFailureSnapshot;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::watch;

/// What the banner displays for one critical failure
#[derive(Clone, Debug, PartialEq)]
pub struct BannerAlert {
    /// Target for navigation to the failure editor.
    pub failure_id: u64,
    pub tag: String,
    pub failure_date: DateTime<Utc>,
}

/// The banner's view over the critical-failure snapshots
pub struct AlertBanner {
    rx: watch::Receiver<Option<CriticalFailureSnapshot>>,
    dismissed_generation: Option<u64>,
}

impl AlertBanner {
    pub fn new(
        rx: watch::Receiver<Option<CriticalFailureSnapshot>>,
    ) -> AlertBanner {
        AlertBanner { rx, dismissed_generation: None }
    }

    /// The alert to display, if any.
    pub fn current(&self) -> Option<BannerAlert> {
        let snapshot = self.rx.borrow();
        let snapshot = snapshot.as_ref()?;
        let failure = snapshot.failure.as_ref()?;
        if let Some(dismissed) = self.dismissed_generation {
            // Dismissal covers every poll up to and including the one that
            // was showing; a later successful poll shows the banner again.
            if snapshot.generation <= dismissed {
                return None;
            }
        }
        Some(BannerAlert {
            failure_id: failure.id,
            tag: failure.tag.clone(),
            failure_date: failure.failure_date,
        })
    }

    /// Hide the banner until the next successful poll with a qualifying
    /// failure.
    pub fn dismiss(&mut self) {
        let generation =
            self.rx.borrow().as_ref().map(|snapshot| snapshot.generation);
        if let Some(generation) = generation {
            self.dismissed_generation = Some(generation);
        }
    }
}
