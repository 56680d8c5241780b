#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use http::header::CONTENT_TYPE;
use jwplatform_core::{Context, Error, HttpSend, Result};
use jwplatform_file_read_tokio::TokioFileRead;
use jwplatform_v1::{Client, Credential, Params, RequestSigner};

/// A request as seen by the transport.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: http::Method,
    pub uri: http::Uri,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl Captured {
    pub fn query(&self) -> &str {
        self.uri.query().unwrap_or_default()
    }

    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Transport that records every request and replays queued responses.
#[derive(Debug, Clone, Default)]
pub struct MockHttpSend {
    responses: Arc<Mutex<VecDeque<(u16, String)>>>,
    requests: Arc<Mutex<Vec<Captured>>>,
    delay: Option<Duration>,
}

impl MockHttpSend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(Captured {
            method: parts.method,
            uri: parts.uri,
            content_type: parts
                .headers
                .get(CONTENT_TYPE)
                .map(|v| v.to_str().unwrap().to_string()),
            body,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::unexpected("no response queued"))?;

        Ok(http::Response::builder()
            .status(status)
            .body(Bytes::from(body))
            .unwrap())
    }
}

pub const SHOW_OK: &str = r#"{"status": {"message": "Ok", "code": 200}}"#;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn fixed_signer() -> RequestSigner {
    RequestSigner::new()
        .with_nonce("80684843")
        .with_time(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

pub fn context(mock: &MockHttpSend) -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(mock.clone())
}

/// Client with the fixed test credential, nonce and timestamp.
pub fn test_client(mock: &MockHttpSend) -> Client {
    init_logger();

    let cred = Credential::new("testKey", "testSecret").unwrap();
    Client::new(context(mock), cred).with_signer(fixed_signer())
}

pub fn params(pairs: &[(&str, &str)]) -> Params {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
