//! Scripted in-memory transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use super::transport::{ApiRequest, HttpTransport, RawResponse};
use crate::error::TransportError;

type Reply = Result<RawResponse, TransportError>;

/// Replies are queued per path and consumed in order. A path with no queued
/// reply fails like an unreachable server.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    inner: Arc<Mutex<Script>>,
}

#[derive(Default)]
struct Script {
    replies: HashMap<String, VecDeque<Reply>>,
    sent: Vec<ApiRequest>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, path: &str, status: u16, body: serde_json::Value) -> &Self {
        self.push(path, Ok(RawResponse { status, body: body.to_string() }))
    }

    pub(crate) fn respond_raw(&self, path: &str, status: u16, body: &str) -> &Self {
        self.push(path, Ok(RawResponse { status, body: body.to_owned() }))
    }

    pub(crate) fn fail(&self, path: &str) -> &Self {
        self.push(path, Err(TransportError::Request(format!("connection refused: {path}"))))
    }

    fn push(&self, path: &str, reply: Reply) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .replies
            .entry(path.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn sent(&self) -> Vec<ApiRequest> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub(crate) fn sent_to(&self, path: &str) -> Vec<ApiRequest> {
        self.sent().into_iter().filter(|r| r.path == path).collect()
    }
}

#[async_trait::async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut script = self.inner.lock().unwrap();
        script.sent.push(request.clone());
        script
            .replies
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::Request(format!("no scripted reply for {}", request.path))))
    }
}
