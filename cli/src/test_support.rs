//! Local listeners for tests that need a real HTTP or socket peer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use frames::AutocompleteRequest;
use tokio::net::TcpListener;
use tokio_tungstenite::WebSocketStream;

use crate::config::{ClientConfig, SessionTuning};
use crate::suggest::{SuggestError, SuggestionSource};

/// Serve `router` on an ephemeral port and return its `http://` base URL.
pub async fn serve_http(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind http listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

/// Bind a socket listener and return it with its `ws://` base URL.
pub async fn ws_listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ws listener");
    let addr = listener.local_addr().expect("local addr");
    (listener, format!("ws://{addr}"))
}

/// Accept one socket connection, returning the upgraded stream and the request path.
pub async fn accept_peer(listener: &TcpListener) -> (WebSocketStream<tokio::net::TcpStream>, String) {
    use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

    let (tcp, _) = listener.accept().await.expect("accept tcp");
    let mut path = String::new();
    let stream = tokio_tungstenite::accept_hdr_async(tcp, |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
        path = req.uri().path().to_owned();
        Ok(resp)
    })
    .await
    .expect("accept websocket");
    (stream, path)
}

/// An address nothing listens on.
pub const DEAD_HTTP: &str = "http://127.0.0.1:9";
pub const DEAD_WS: &str = "ws://127.0.0.1:9";

pub fn config(api: &str, ws: &str) -> ClientConfig {
    ClientConfig::from_parts(Some(api.to_owned()), Some(ws.to_owned()), SessionTuning::default())
        .expect("test config should be valid")
}

/// Replies with scripted outcomes in order, after an optional delay.
pub struct ScriptedSource {
    replies: Mutex<Vec<Result<String, SuggestError>>>,
    pub requests: Mutex<Vec<AutocompleteRequest>>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedSource {
    pub fn new(replies: Vec<Result<String, SuggestError>>) -> Arc<Self> {
        Self::with_delay(replies, Duration::ZERO)
    }

    pub fn with_delay(replies: Vec<Result<String, SuggestError>>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            delay,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SuggestionSource for ScriptedSource {
    async fn suggest(&self, request: &AutocompleteRequest) -> Result<String, SuggestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests lock").push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let mut replies = self.replies.lock().expect("replies lock");
        if replies.is_empty() { Ok(String::new()) } else { replies.remove(0) }
    }
}
