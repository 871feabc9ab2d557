// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use clap::Parser;
use wallet_auth_server::{Cli, configure_logging, run};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    configure_logging(cli.verbose, cli.log_format);

    if let Err(e) = run(cli).await {
        tracing::error!(error = ?e, error_msg = %e, "Server terminated with an error");
        std::process::exit(1);
    }
}
