// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tokio::sync::oneshot;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Abstracts the system time source
#[async_trait::async_trait]
pub trait SystemTimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[dill::component]
#[dill::interface(dyn SystemTimeSource)]
pub struct SystemTimeSourceDefault;

#[async_trait::async_trait]
impl SystemTimeSource for SystemTimeSourceDefault {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        // Negative durations are treated as "do not wait"
        let std_duration = duration.to_std().unwrap_or_default();

        tokio::time::sleep(std_duration).await;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Manually driven clock. Time only moves on [`SystemTimeSourceStub::set`] or
/// [`SystemTimeSourceStub::advance`], sleepers are woken once the stub time
/// reaches their deadline.
#[derive(Debug, Clone)]
pub struct SystemTimeSourceStub {
    state: Arc<Mutex<StubState>>,
}

#[derive(Debug)]
struct StubState {
    t: DateTime<Utc>,
    sleepers: Vec<Sleeper>,
}

#[derive(Debug)]
struct Sleeper {
    wake_up_at: DateTime<Utc>,
    waker_tx: oneshot::Sender<()>,
}

impl SystemTimeSourceStub {
    pub fn new() -> Self {
        Self::new_set(Utc::now())
    }

    pub fn new_set(t: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState {
                t,
                sleepers: Vec::new(),
            })),
        }
    }

    pub fn set(&self, t: DateTime<Utc>) {
        let ready = {
            let mut state = self.state.lock().unwrap();

            assert!(
                state.t <= t,
                "The previous time [{}] is more than new time [{t}]",
                state.t
            );
            state.t = t;

            let (ready, waiting): (Vec<_>, Vec<_>) = state
                .sleepers
                .drain(..)
                .partition(|sleeper| sleeper.wake_up_at <= t);
            state.sleepers = waiting;

            ready
        };

        for sleeper in ready {
            // A sleeper whose future was dropped has nobody to wake up
            let _ = sleeper.waker_tx.send(());
        }
    }

    pub fn advance(&self, time_quantum: Duration) {
        let new_t = self.now() + time_quantum;
        self.set(new_t);
    }

    pub fn sleepers_count(&self) -> usize {
        self.state.lock().unwrap().sleepers.len()
    }
}

#[async_trait::async_trait]
impl SystemTimeSource for SystemTimeSourceStub {
    fn now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap().t
    }

    async fn sleep(&self, duration: Duration) {
        let rx = {
            let mut state = self.state.lock().unwrap();
            let (tx, rx) = oneshot::channel();
            let wake_up_at = state.t + duration;

            if wake_up_at <= state.t {
                return;
            }

            state.sleepers.push(Sleeper {
                wake_up_at,
                waker_tx: tx,
            });
            rx
        };

        // The stub is never dropped while callers sleep on it
        let _ = rx.await;
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
