// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP server for the MMT failure-tracking service
//!
//! This crate provides the dropshot server behind the Metrology Management
//! Tool's failure-notification workflow (M9): failure records with their
//! `Draft → Approved → Submitted` lifecycle and ANP deadlines, the report
//! distribution list, and the operational alerts feeding the dashboard
//! chrome.  State is held in an in-memory [`storage::Store`]; durable
//! persistence belongs to the surrounding deployment and is out of scope
//! here.

use dropshot::HttpServer;
use slog::o;
use std::io;
use std::sync::Arc;

mod config;
mod context;
mod http_entrypoints;
pub mod storage;

pub use config::Config;
pub use config::LoadError;
pub use context::ServerContext;

#[derive(Debug, thiserror::Error, slog_error_chain::SlogInlineError)]
pub enum StartError {
    #[error("failed to initialize logger")]
    InitializeLogger(#[source] io::Error),
    #[error("failed to initialize HTTP server")]
    InitializeHttpServer(#[source] dropshot::BuildError),
}

/// Start the dropshot server for the failure-tracking service.
pub async fn start_server(
    server_config: Config,
) -> Result<HttpServer<Arc<ServerContext>>, StartError> {
    let log = server_config
        .log
        .to_logger("failures-server")
        .map_err(StartError::InitializeLogger)?;

    let context = ServerContext::new(&log);
    dropshot::ServerBuilder::new(
        http_entrypoints::api(),
        Arc::new(context),
        log.new(o!("component" => "dropshot")),
    )
    .config(server_config.dropshot)
    .start()
    .map_err(StartError::InitializeHttpServer)
}

/// A failure-tracking server on localhost with an empty store.
///
/// Intended to be used for testing only.
pub struct TransientServer {
    /// Dropshot server
    pub server: HttpServer<Arc<ServerContext>>,
}

impl TransientServer {
    pub async fn new(log: &slog::Logger) -> Result<Self, anyhow::Error> {
        let context = ServerContext::new(log);
        let server = dropshot::ServerBuilder::new(
            http_entrypoints::api(),
            Arc::new(context),
            log.new(o!("component" => "dropshot")),
        )
        .config(dropshot::ConfigDropshot {
            bind_address: "[::1]:0".parse().unwrap(),
            ..Default::default()
        })
        .start()?;
        Ok(Self { server })
    }

    pub fn local_addr(&self) -> std::net::SocketAddr {
        self.server.local_addr()
    }
}
