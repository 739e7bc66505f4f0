//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use esi_core::{
    Client, ClientConfig, FixedClock, HttpRequest, HttpResponse, HttpTransport, TransportError,
};
use http::{HeaderMap, HeaderValue, StatusCode};
use parking_lot::Mutex;

pub const BASE_URL: &str = "http://esi.test/esi/";

pub fn static_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 1, 1, 18, 0, 0).unwrap()
}

pub fn response(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body: Ok(Bytes::from(body.to_string())),
    }
}

/// Status and headers arrive, then the connection drops mid-body.
pub fn truncated(status: u16) -> HttpResponse {
    HttpResponse {
        status: StatusCode::from_u16(status).unwrap(),
        headers: HeaderMap::new(),
        body: Err(TransportError::Connection(
            "connection closed before message completed".to_string(),
        )),
    }
}

pub fn with_header(mut response: HttpResponse, name: &'static str, value: &str) -> HttpResponse {
    response
        .headers
        .insert(name, HeaderValue::from_str(value).unwrap());
    response
}

pub fn rate_limited(status: u16, body: &str, remaining: i64, reset: i64) -> HttpResponse {
    let response = with_header(response(status, body), "x-esi-error-limit-remain", &remaining.to_string());
    with_header(response, "x-esi-error-limit-reset", &reset.to_string())
}

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: TransportError) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::from([Err(err)])),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }
}

impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("script exhausted".to_string())))
    }
}

/// Never answers.
pub struct PendingTransport;

impl HttpTransport for PendingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        std::future::pending().await
    }
}

pub fn client<T: HttpTransport>(transport: Arc<T>) -> Client<T> {
    Client::builder(transport)
        .config(ClientConfig::new(BASE_URL).unwrap())
        .clock(FixedClock(static_now()))
        .build()
        .unwrap()
}

/// Start the mock server on a random port and return its address.
pub fn start_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

pub fn mock_base_url(addr: SocketAddr) -> String {
    format!("http://{addr}{}/", mock_server::BASE_PATH)
}
