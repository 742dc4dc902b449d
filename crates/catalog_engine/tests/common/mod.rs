#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use catalog_engine::{
    EngineEvent, EventSink, Transport, TransportError, TransportFailure, TransportResponse,
};
use tokio::time::Instant;
use url::Url;

#[derive(Debug, Clone)]
pub enum Scripted {
    Status(u16),
    Json(String),
    Fail(TransportFailure),
}

#[derive(Debug, Clone)]
pub struct Call {
    pub url: Url,
    pub at: Instant,
}

/// Transport that replays a script, then repeats `fallback` forever.
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    fallback: Scripted,
    latency: Duration,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Scripted>, fallback: Scripted) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn always(response: Scripted) -> Self {
        Self::new(Vec::new(), response)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &Url) -> Result<TransportResponse, TransportError> {
        self.calls.lock().unwrap().push(Call {
            url: url.clone(),
            at: Instant::now(),
        });
        let next = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match next {
            Scripted::Status(status) => Ok(TransportResponse {
                status,
                body: Vec::new(),
            }),
            Scripted::Json(body) => Ok(TransportResponse {
                status: 200,
                body: body.into_bytes(),
            }),
            Scripted::Fail(kind) => Err(TransportError::new(kind, "scripted failure")),
        }
    }
}

#[derive(Default)]
pub struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn listing_json(titles: &[&str], total: usize) -> String {
    let products: Vec<String> = titles
        .iter()
        .enumerate()
        .map(|(idx, title)| {
            format!(
                r#"{{"id":{},"title":"{}","category":"smartphones","price":549.0,"rating":4.69}}"#,
                idx + 1,
                title
            )
        })
        .collect();
    format!(
        r#"{{"products":[{}],"total":{},"skip":0,"limit":{}}}"#,
        products.join(","),
        total,
        titles.len()
    )
}

pub fn assert_close(actual: Duration, expected: Duration) {
    let slack = Duration::from_millis(5);
    assert!(
        actual >= expected && actual <= expected + slack,
        "expected ~{expected:?}, got {actual:?}"
    );
}
