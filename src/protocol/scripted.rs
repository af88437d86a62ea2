// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport for session and poller tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;

use crate::decode::RawStatus;
use crate::error::{
    CommandError, DecodeError, ProtocolError, StatusError, TransportError,
};
use crate::protocol::{ApiEndpoint, Transport};

/// One scripted answer.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Status(Value),
    Unreachable,
    HttpStatus(u16),
    NotJson,
}

impl Reply {
    fn into_status(self) -> Result<RawStatus, StatusError> {
        match self {
            Self::Status(value) => Ok(RawStatus::from_value(value)),
            Self::Unreachable => Err(TransportError::ConnectionFailed("refused".into()).into()),
            Self::HttpStatus(status) => Err(ProtocolError::UnexpectedStatus {
                status,
                reason: "Scripted".into(),
            }
            .into()),
            Self::NotJson => Err(DecodeError::NotAnObject("status").into()),
        }
    }

    fn into_send(self) -> Result<(), CommandError> {
        match self.into_status() {
            Ok(_) => Ok(()),
            Err(StatusError::Transport(e)) => Err(CommandError::Unreachable(e)),
            Err(StatusError::Protocol(e)) => Err(CommandError::Rejected(e)),
            Err(StatusError::Decode(e)) => Err(CommandError::Malformed(e.to_string())),
        }
    }
}

/// Transport answering from a script.
///
/// Queued replies are consumed first; once the queue is empty every fetch
/// returns the fallback reply.
#[derive(Debug)]
pub(crate) struct ScriptedTransport {
    endpoint: Mutex<ApiEndpoint>,
    queue: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Reply>,
    send_reply: Mutex<Reply>,
    sent: Mutex<Vec<(String, String)>>,
    fetch_delay: Mutex<Duration>,
    fetches: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(status: Value) -> Self {
        Self {
            endpoint: Mutex::new(ApiEndpoint::new("192.0.2.10")),
            queue: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Reply::Status(status)),
            send_reply: Mutex::new(Reply::Status(Value::Null)),
            sent: Mutex::new(Vec::new()),
            fetch_delay: Mutex::new(Duration::ZERO),
            fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn push(&self, reply: Reply) {
        self.queue.lock().push_back(reply);
    }

    pub(crate) fn set_fallback(&self, reply: Reply) {
        *self.fallback.lock() = reply;
    }

    pub(crate) fn set_send_reply(&self, reply: Reply) {
        *self.send_reply.lock() = reply;
    }

    pub(crate) fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock() = delay;
    }

    pub(crate) fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    async fn fetch_status(&self) -> Result<RawStatus, StatusError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.fetch_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .queue
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.lock().clone());
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        reply.into_status()
    }

    async fn send(&self, field: &str, value: &str) -> Result<(), CommandError> {
        self.sent.lock().push((field.to_string(), value.to_string()));
        let reply = self.send_reply.lock().clone();
        reply.into_send()
    }

    fn rehome(&self, endpoint: ApiEndpoint) {
        *self.endpoint.lock() = endpoint;
    }

    fn endpoint(&self) -> ApiEndpoint {
        self.endpoint.lock().clone()
    }
}
