// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Background tasks behind the dashboard's polling widgets

mod critical_failures;
mod driver;
mod init;
mod unread_count;

pub use critical_failures::CriticalFailureSnapshot;
pub use critical_failures::CriticalFailureWatcher;
pub use critical_failures::CRITICAL_FAILURE_POLL_PERIOD;
pub use driver::ActivationReason;
pub use driver::BackgroundTask;
pub use driver::Driver;
pub use driver::LastResult;
pub use init::init;
pub use init::BackgroundTasks;
pub use driver::TaskHandle;
pub use driver::TaskStatus;
pub use unread_count::UnreadCountWatcher;
pub use unread_count::UNREAD_COUNT_POLL_PERIOD;
