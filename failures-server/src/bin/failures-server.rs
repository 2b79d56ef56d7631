// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Executable that starts the HTTP server for the MMT failure-tracking
//! service

use anyhow::anyhow;
use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use failures_server::Config;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[clap(name = "failures-server", about = "MMT failure-tracking service")]
struct Args {
    #[clap(long, action)]
    config_file: Utf8PathBuf,

    /// Override the bind address from the config file.
    #[clap(long, action)]
    http_address: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let mut config = Config::from_file(&args.config_file)
        .with_context(|| format!("read config file {:?}", args.config_file))?;
    if let Some(http_address) = args.http_address {
        config.dropshot.bind_address = http_address;
    }

    let server = failures_server::start_server(config)
        .await
        .context("starting server")?;
    server.await.map_err(|error| anyhow!("server exited: {}", error))
}
