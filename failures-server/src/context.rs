// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::storage::Store;
use slog::o;
use slog::Logger;

/// Shared state available to all HTTP request handlers
pub struct ServerContext {
    store: Store,
    log: Logger,
}

impl ServerContext {
    pub fn new(log: &Logger) -> ServerContext {
        let store = Store::new(log.new(o!("component" => "store")));
        ServerContext { store, log: log.clone() }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn log(&self) -> &Logger {
        &self.log
    }
}
