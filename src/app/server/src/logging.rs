// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::backtrace::Backtrace;
use std::panic;
use std::sync::Arc;

use crate::{BINARY_NAME, LogFormat};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const DEFAULT_LOGGING_CONFIG: &str = "info,tower_http=info,sqlx=warn";
const VERBOSE_LOGGING_CONFIG: &str = "debug,tower_http=trace,sqlx=info";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn configure_logging(verbosity_level: u8, log_format: LogFormat) {
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_log::LogTracer;
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::layer::SubscriberExt;

    // Logging may be already initialized when running under tests
    if tracing::dispatcher::has_been_set() {
        return;
    }

    // Use configuration from RUST_LOG env var if provided
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match verbosity_level {
            0 => EnvFilter::new(DEFAULT_LOGGING_CONFIG),
            _ => EnvFilter::new(VERBOSE_LOGGING_CONFIG),
        },
    };

    // Redirect all standard logging to tracing events
    if let Err(e) = LogTracer::init() {
        eprintln!("Failed to set LogTracer: {e}");
    }

    let result = match log_format {
        LogFormat::Text => {
            let subscriber = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_span_events(if verbosity_level > 1 {
                    FmtSpan::NEW | FmtSpan::CLOSE
                } else {
                    FmtSpan::NONE
                })
                .with_writer(std::io::stderr)
                .finish();

            tracing::subscriber::set_global_default(subscriber)
        }
        LogFormat::Json => {
            let subscriber = tracing_subscriber::registry()
                .with(env_filter)
                .with(JsonStorageLayer)
                .with(BunyanFormattingLayer::new(
                    BINARY_NAME.to_owned(),
                    std::io::stderr,
                ));

            tracing::subscriber::set_global_default(subscriber)
        }
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    set_hook_trace_panics(true);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Reports panics through `tracing` so they end up next to other log records
pub fn set_hook_trace_panics(propagate: bool) {
    let default_hook_maybe = if propagate {
        Some(Arc::new(panic::take_hook()))
    } else {
        None
    };

    panic::set_hook(Box::new(move |info| {
        if let Some(default_hook) = default_hook_maybe.as_ref() {
            default_hook(info);
        }

        let backtrace = Backtrace::force_capture();
        let payload = info.payload();
        let error_msg = if let Some(s) = payload.downcast_ref::<&str>() {
            *s
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.as_str()
        } else {
            "Unknown panic payload"
        };

        tracing::error!(error_msg, error_backtrace = %backtrace, "Unhandled panic caught");
    }));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
