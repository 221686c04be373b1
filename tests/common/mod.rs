#![allow(dead_code)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use multimodal_live::types::{ConnectionState, LiveEvent, SessionConfig, SessionConfigurator};
use multimodal_live::{Client, Config, EventRx};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

pub const WAIT: Duration = Duration::from_secs(3);
pub const RETRY: Duration = Duration::from_millis(100);
pub const RECONNECT: Duration = Duration::from_millis(200);
pub const API_KEY: &str = "test-key";

pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

/// A local endpoint that hands every accepted WebSocket to the test.
pub struct MockServer {
    pub url: String,
    connections: mpsc::UnboundedReceiver<MockConnection>,
    accept_task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, connections) = mpsc::unbounded_channel();

        let accept_task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(connection) = MockConnection::handshake(stream).await {
                        let _ = tx.send(connection);
                    }
                });
            }
        });

        Self {
            url: format!("ws://{}", addr),
            connections,
            accept_task,
        }
    }

    pub async fn accept(&mut self) -> MockConnection {
        timeout(WAIT, self.connections.recv())
            .await
            .expect("timed out waiting for a connection")
            .expect("server stopped")
    }

    /// True when no client connects within `window`.
    pub async fn quiet_for(&mut self, window: Duration) -> bool {
        timeout(window, self.connections.recv()).await.is_err()
    }

    pub fn stop(&self) {
        self.accept_task.abort();
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.accept_task.abort();
    }
}

pub struct MockConnection {
    pub uri: String,
    ws: WebSocketStream<TcpStream>,
}

impl MockConnection {
    pub async fn handshake(stream: TcpStream) -> Option<Self> {
        let (uri_tx, uri_rx) = oneshot::channel();
        let callback = move |request: &Request, response: Response| -> Result<Response, ErrorResponse> {
            let _ = uri_tx.send(request.uri().to_string());
            Ok(response)
        };
        let ws = tokio_tungstenite::accept_hdr_async(stream, callback).await.ok()?;
        let uri = uri_rx.await.unwrap_or_default();
        Some(Self { uri, ws })
    }

    /// Next JSON text frame, or `None` once the client has closed.
    pub async fn recv_json(&mut self) -> Option<Value> {
        loop {
            let frame = timeout(WAIT, self.ws.next())
                .await
                .expect("timed out waiting for a frame")?;
            match frame {
                Ok(Message::Text(text)) => {
                    return Some(serde_json::from_str(&text).expect("client sent invalid JSON"));
                }
                Ok(Message::Close(_)) | Err(_) => return None,
                Ok(_) => continue,
            }
        }
    }

    /// Like `recv_json`, but `Err(())` when nothing arrives within `window`.
    pub async fn recv_json_within(&mut self, window: Duration) -> Result<Option<Value>, ()> {
        loop {
            let frame = match timeout(window, self.ws.next()).await {
                Ok(frame) => frame,
                Err(_) => return Err(()),
            };
            match frame {
                Some(Ok(Message::Text(text))) => {
                    return Ok(Some(serde_json::from_str(&text).expect("client sent invalid JSON")));
                }
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return Ok(None),
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn expect_setup(&mut self) -> Value {
        let frame = self.recv_json().await.expect("connection closed before setup");
        assert!(frame.get("setup").is_some(), "expected a setup frame, got {}", frame);
        frame
    }

    /// First frame that is not a (possibly retried) setup frame.
    pub async fn next_non_setup(&mut self) -> Value {
        loop {
            let frame = self.recv_json().await.expect("connection closed");
            if frame.get("setup").is_none() {
                return frame;
            }
        }
    }

    /// Reads until the client closes, returning every JSON frame seen.
    pub async fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Some(frame) = self.recv_json().await {
            frames.push(frame);
        }
        frames
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.ws.send(Message::Text(text.to_string())).await.unwrap();
    }

    pub async fn send_binary(&mut self, bytes: &[u8]) {
        self.ws.send(Message::Binary(bytes.to_vec())).await.unwrap();
    }

    pub async fn acknowledge_setup(&mut self) {
        self.send_json(serde_json::json!({ "setupResponse": {} })).await;
    }

    pub async fn close(mut self) {
        self.ws.close(None).await.ok();
        while let Ok(Some(Ok(_))) = timeout(WAIT, self.ws.next()).await {}
    }
}

pub fn session(model: &str) -> SessionConfig {
    SessionConfigurator::new(model)
        .with_text_only()
        .with_temperature(0.5)
        .build()
}

pub fn client_for(url: &str, retry: Duration) -> Client {
    Client::new(
        Config::builder()
            .with_base_url(url)
            .with_api_key(API_KEY)
            .with_setup_retry_interval(retry)
            .with_reconnect_delay(RECONNECT)
            .build(),
    )
}

pub async fn wait_for_state(client: &Client, state: ConnectionState) {
    let mut rx = client.watch_state();
    let reached = timeout(WAIT, rx.wait_for(|current| *current == state))
        .await
        .map(|result| result.is_ok())
        .unwrap_or(false);
    assert!(reached, "timed out waiting for {}, still {}", state, client.state());
}

pub async fn next_event(events: &mut EventRx, matches: impl Fn(&LiveEvent) -> bool) -> LiveEvent {
    timeout(WAIT, async {
        loop {
            match events.recv().await {
                Ok(event) if matches(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event stream closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

pub fn is_log(category: &'static str) -> impl Fn(&LiveEvent) -> bool {
    move |event: &LiveEvent| matches!(event, LiveEvent::Log(entry) if entry.category() == category)
}

/// Drains whatever is already buffered without waiting.
pub fn buffered_events(events: &mut EventRx) -> Vec<LiveEvent> {
    let mut buffered = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => buffered.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => return buffered,
        }
    }
}
