//! Scripted transport for unit tests.

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, StatusCode};

use crate::transport::{Transport, TransportError, TransportRequest, TransportResponse};

/// One scripted outcome; the script is consumed in request order.
#[derive(Clone, Copy)]
pub(crate) enum Step {
    /// Respond with this status and an `ok` body.
    Status(u16),
    /// Fail as a connect-level error.
    ConnectFail,
    /// Never complete; exercises per-attempt timeouts.
    Hang,
}

/// In-memory transport driven by a step script.
///
/// Requests to a host registered via [`fail_host`](Self::fail_host) always
/// fail with a connect error without consuming the script; everything else
/// pops the next step, defaulting to `200 OK` when the script runs dry.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    fail_hosts: Arc<Mutex<HashSet<String>>>,
    requests: Arc<Mutex<Vec<TransportRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn with_steps(steps: &[Step]) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.iter().copied().collect())),
            ..Self::default()
        }
    }

    pub(crate) fn fail_host(&self, host: &str) {
        self.fail_hosts.lock().unwrap().insert(host.to_string());
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);

        let host_down = self
            .fail_hosts
            .lock()
            .unwrap()
            .iter()
            .any(|host| url.contains(host.as_str()));
        if host_down {
            return Err(TransportError::Connect("connection refused".into()));
        }

        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Status(200));
        match step {
            Step::Status(code) => Ok(TransportResponse {
                status: StatusCode::from_u16(code).unwrap(),
                headers: HeaderMap::new(),
                body: Bytes::from_static(b"ok"),
            }),
            Step::ConnectFail => Err(TransportError::Connect("connection refused".into())),
            Step::Hang => std::future::pending().await,
        }
    }
}
