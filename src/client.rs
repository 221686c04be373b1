use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use multimodal_live_types::audio::{MediaChunk, PCM_INPUT_MIME_TYPE};
use multimodal_live_types::{
    ClientMessage, ConnectionState, LiveEvent, LogEntry, Part, ServerMessage, SessionConfig,
};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

mod config;
mod consts;
mod error;
mod stats;
mod utils;

pub use config::{Config, ConfigBuilder, ConfigError};
pub use error::{ClientError, Result};
pub use stats::Stats;

type EventTx = broadcast::Sender<LiveEvent>;
pub type EventRx = broadcast::Receiver<LiveEvent>;
pub type StateRx = watch::Receiver<ConnectionState>;
type OutboundTx = mpsc::UnboundedSender<ClientMessage>;
type OutboundRx = mpsc::UnboundedReceiver<ClientMessage>;
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsWriter = SplitSink<WsStream, Message>;

// Everything a connection attempt, its driver and its reconnect timer touch.
// Each attempt is stamped with `generation`; anything holding an older stamp
// is stale and must not act.
struct Shared {
    session: Option<SessionConfig>,
    outbound: Option<OutboundTx>,
    shutdown: Option<oneshot::Sender<()>>,
    reconnect: Option<JoinHandle<()>>,
    intentional_disconnect: bool,
    generation: u64,
}

struct Inner {
    config: Config,
    events: EventTx,
    state: watch::Sender<ConnectionState>,
    shared: Mutex<Shared>,
    stats: Mutex<Stats>,
}

/// Handle to one streaming session. Clones share the same socket, state and
/// event stream.
#[derive(Clone)]
pub struct Client {
    inner: Arc<Inner>,
}

// Why the driver loop stopped.
enum Closure {
    Requested,
    Remote(Option<String>),
}

impl Client {
    pub fn new(config: Config) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity());
        let (state, _) = watch::channel(ConnectionState::Idle);
        Self {
            inner: Arc::new(Inner {
                config,
                events,
                state,
                shared: Mutex::new(Shared {
                    session: None,
                    outbound: None,
                    shutdown: None,
                    reconnect: None,
                    intentional_disconnect: false,
                    generation: 0,
                }),
                stats: Mutex::new(Stats::new()),
            }),
        }
    }

    /// Opens the socket and starts the setup handshake.
    ///
    /// Resolves with `true` as soon as the socket is open, before the server
    /// has acknowledged setup; watch the state for `Ready` before sending.
    /// Resolves with `false` when `disconnect` was called while the
    /// transport handshake was still in flight.
    pub async fn connect(&self, session: SessionConfig) -> Result<bool> {
        self.open(session, None).await
    }

    // `resume` carries the generation a reconnect was scheduled for; the
    // attempt is abandoned if anything superseded it in the meantime.
    async fn open(&self, session: SessionConfig, resume: Option<u64>) -> Result<bool> {
        let generation = {
            let mut shared = self.lock();
            if let Some(expected) = resume {
                if shared.generation != expected || shared.intentional_disconnect {
                    return Ok(false);
                }
            }
            let state = self.state();
            if state.is_active() {
                return Err(ClientError::AlreadyConnected(state));
            }
            if let Some(pending) = shared.reconnect.take() {
                pending.abort();
            }
            shared.intentional_disconnect = false;
            shared.generation += 1;
            shared.session = Some(session.clone());
            self.set_state(ConnectionState::Connecting);
            shared.generation
        };

        let url = self.inner.config.base_url().to_string();
        tracing::info!("connecting to {}", url);

        let request = match utils::build_request(&self.inner.config) {
            Ok(request) => request,
            Err(source) => return Err(self.connect_failed(generation, url, source)),
        };
        let mut ws_stream = match tokio_tungstenite::connect_async(request).await {
            Ok((ws_stream, _)) => ws_stream,
            Err(source) => return Err(self.connect_failed(generation, url, source)),
        };

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let superseded = {
            let mut shared = self.lock();
            if shared.generation != generation {
                true
            } else {
                shared.outbound = Some(outbound_tx);
                shared.shutdown = Some(shutdown_tx);
                self.set_state(ConnectionState::AwaitingSetupAck);
                false
            }
        };
        if superseded {
            tracing::info!("connection to {} was cancelled before it opened", url);
            if let Err(e) = ws_stream.close(None).await {
                tracing::debug!("failed to close cancelled socket: {}", e);
            }
            return Ok(false);
        }

        tracing::info!("connected to {}", url);
        self.emit(LiveEvent::Open);
        self.log("client.open", json!({ "url": url, "model": session.model() }));

        tokio::spawn(run_session(
            self.clone(),
            generation,
            session,
            ws_stream,
            outbound_rx,
            shutdown_rx,
        ));
        Ok(true)
    }

    /// Closes the socket and cancels every pending setup retry and reconnect.
    /// Returns `true` if an open socket was actually closed.
    pub fn disconnect(&self) -> bool {
        let (shutdown, pending) = {
            let mut shared = self.lock();
            shared.intentional_disconnect = true;
            shared.generation += 1;
            shared.outbound = None;
            if self.state() != ConnectionState::Idle {
                self.set_state(ConnectionState::Closed);
            }
            (shared.shutdown.take(), shared.reconnect.take())
        };

        if let Some(pending) = pending {
            pending.abort();
        }
        let closed = shutdown.is_some_and(|tx| tx.send(()).is_ok());
        if closed {
            tracing::info!("disconnecting");
        }
        closed
    }

    /// Disconnects, then connects again with a new session config.
    pub async fn reconfigure(&self, session: SessionConfig) -> Result<bool> {
        self.disconnect();
        self.connect(session).await
    }

    /// Sends one user turn. Dropped with a warning unless the session is `Ready`.
    pub fn send(&self, parts: impl Into<Vec<Part>>, turn_complete: bool) {
        self.dispatch(ClientMessage::user_content(parts.into(), turn_complete));
    }

    pub fn send_text(&self, text: &str) {
        self.send(Part::text(text), true);
    }

    /// Sends audio chunks as one `realtimeInput` frame. Every chunk is tagged
    /// as 16 bit, 16 kHz PCM.
    pub fn send_realtime_input(&self, chunks: Vec<MediaChunk>) {
        let chunks = chunks
            .into_iter()
            .map(|chunk| chunk.with_mime_type(PCM_INPUT_MIME_TYPE))
            .collect();
        self.dispatch(ClientMessage::realtime_input(chunks));
    }

    pub fn subscribe(&self) -> EventRx {
        self.inner.events.subscribe()
    }

    pub fn watch_state(&self) -> StateRx {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.borrow()
    }

    /// Whether a socket is currently open; the flag a UI would display.
    pub fn is_connected(&self) -> bool {
        self.state().is_open()
    }

    /// The session config of the current or most recent connection.
    pub fn session(&self) -> Option<SessionConfig> {
        self.lock().session.clone()
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn stats(&self) -> Stats {
        self.inner
            .stats
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn dispatch(&self, message: ClientMessage) {
        let (state, outbound) = {
            let shared = self.lock();
            let state = self.state();
            let outbound = match state {
                ConnectionState::Ready => shared.outbound.clone(),
                _ => None,
            };
            (state, outbound)
        };

        let Some(outbound) = outbound else {
            tracing::warn!("not ready ({}), dropping {} frame", state, message.kind());
            self.log(
                "client.warn",
                json!({ "dropped": message.kind(), "state": state.to_string() }),
            );
            return;
        };

        let (category, payload) = match &message {
            ClientMessage::RealtimeInput(input) => (
                "client.realtimeInput",
                json!({ "mediaChunks": input.media_chunks().len() }),
            ),
            _ => ("client.send", serde_json::to_value(&message).unwrap_or_default()),
        };
        if outbound.send(message).is_err() {
            tracing::warn!("session driver has stopped, dropping frame");
            return;
        }
        self.log(category, payload);
    }

    fn connect_failed(
        &self,
        generation: u64,
        url: String,
        source: tokio_tungstenite::tungstenite::Error,
    ) -> ClientError {
        {
            let shared = self.lock();
            if shared.generation == generation {
                self.set_state(ConnectionState::Closed);
            }
        }
        tracing::error!("failed to connect to {}: {}", url, source);
        self.log(
            "client.error",
            json!({ "error": format!("failed to connect to {}: {}", url, source) }),
        );
        ClientError::Connect { url, source }
    }

    // Returns true when this frame acknowledged setup.
    fn handle_text(&self, generation: u64, text: &str) -> bool {
        self.with_stats(Stats::record_received);

        let message = match ServerMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                tracing::error!("failed to parse frame: {}, text=> {:?}", e, text);
                self.log(
                    "client.error",
                    json!({ "error": format!("failed to parse frame: {}", e) }),
                );
                return false;
            }
        };
        tracing::debug!("received message: {}", message.kind());

        let mut acknowledged = false;
        if let Some(response) = message.setup_response() {
            {
                let shared = self.lock();
                if shared.generation == generation
                    && self.state() == ConnectionState::AwaitingSetupAck
                {
                    self.set_state(ConnectionState::Ready);
                    acknowledged = true;
                }
            }
            if acknowledged {
                tracing::info!("setup acknowledged, session ready");
                self.log("server.setupResponse", response.clone());
            }
        }

        if let Some(usage) = message.usage_metadata() {
            self.with_stats(|stats| stats.update_usage(usage));
            tracing::debug!(
                "total_tokens: {}, input_tokens: {}, output_tokens: {}",
                usage.total_tokens,
                usage.prompt_tokens,
                usage.response_tokens
            );
        }

        let content = message.server_content().cloned();
        match &content {
            Some(content) => self.log("server.content", content.clone()),
            None => self.log("server.message", json!({ "kind": message.kind() })),
        }
        self.emit(LiveEvent::Message {
            message: message.into_value(),
        });
        if let Some(content) = content {
            self.emit(LiveEvent::Content { content });
        }
        acknowledged
    }

    fn session_closed(&self, generation: u64, closure: Closure, session: SessionConfig) {
        let (reason, requested) = match closure {
            Closure::Requested => (None, true),
            Closure::Remote(reason) => (reason, false),
        };
        let reconnect = {
            let mut shared = self.lock();
            let current = shared.generation == generation;
            if current {
                shared.outbound = None;
                shared.shutdown = None;
                self.set_state(ConnectionState::Closed);
            }
            current && !requested && !shared.intentional_disconnect
        };

        tracing::info!("connection closed: {:?}", reason);
        self.emit(LiveEvent::Close {
            reason: reason.clone(),
        });
        self.log("client.close", json!({ "reason": reason }));

        if reconnect {
            self.schedule_reconnect(generation, session);
        }
    }

    // One delayed reconnect per unexpected closure. A failed reconnect is a
    // closure of its own and schedules the next one.
    fn schedule_reconnect(&self, generation: u64, session: SessionConfig) {
        let delay = self.inner.config.reconnect_delay();
        let mut shared = self.lock();
        if shared.generation != generation || shared.intentional_disconnect {
            return;
        }

        tracing::info!("reconnecting in {:?}", delay);
        self.log(
            "client.reconnect",
            json!({ "delayMs": delay.as_millis() as u64, "model": session.model() }),
        );

        let client = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut shared = client.lock();
                if shared.generation != generation || shared.intentional_disconnect {
                    return;
                }
                // Detach rather than abort; this task is the one running.
                shared.reconnect.take();
            }

            client.with_stats(Stats::record_reconnect);
            match client.open(session.clone(), Some(generation)).await {
                Ok(_) => {}
                Err(ClientError::Connect { url, source }) => {
                    tracing::error!("reconnect to {} failed: {}", url, source);
                    // The failed attempt was stamped one past the scheduled one.
                    client.schedule_reconnect(generation + 1, session);
                }
                Err(e) => {
                    tracing::error!("reconnect skipped: {}", e);
                    client.log("client.error", json!({ "error": e.to_string() }));
                }
            }
        });
        if let Some(previous) = shared.reconnect.replace(handle) {
            previous.abort();
        }
    }

    async fn write_frame(&self, write: &mut WsWriter, message: &ClientMessage) -> bool {
        let text = match serde_json::to_string(message) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("failed to serialize {} frame: {}", message.kind(), e);
                return false;
            }
        };
        if let Err(e) = write.send(Message::Text(text)).await {
            tracing::error!("failed to send {} frame: {}", message.kind(), e);
            self.log(
                "client.error",
                json!({ "error": format!("failed to send {} frame: {}", message.kind(), e) }),
            );
            return false;
        }
        self.with_stats(|stats| {
            stats.record_sent();
            if matches!(message, ClientMessage::Setup(_)) {
                stats.record_setup_attempt();
            }
        });
        true
    }

    async fn send_setup(&self, write: &mut WsWriter, setup: &ClientMessage, model: &str) {
        if self.write_frame(write, setup).await {
            tracing::debug!("sent setup for {}", model);
            self.log("client.setup", json!({ "model": model }));
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Callers hold the `shared` lock so the transition is atomic with the
    // bookkeeping around it.
    fn set_state(&self, state: ConnectionState) {
        let previous = self.inner.state.send_replace(state);
        if previous != state {
            tracing::debug!("state: {} -> {}", previous, state);
        }
    }

    fn with_stats(&self, update: impl FnOnce(&mut Stats)) {
        if let Ok(mut stats_guard) = self.inner.stats.lock() {
            update(&mut stats_guard);
        } else {
            tracing::error!("failed to update stats");
        }
    }

    fn emit(&self, event: LiveEvent) {
        // No subscribers is not an error.
        let _ = self.inner.events.send(event);
    }

    fn log(&self, category: &str, payload: serde_json::Value) {
        self.emit(LiveEvent::Log(LogEntry::new(category, payload)));
    }
}

// Drives one open socket: sends setup and retries it until acknowledged,
// writes queued frames in order, classifies inbound frames, and reports the
// closure.
async fn run_session(
    client: Client,
    generation: u64,
    session: SessionConfig,
    ws_stream: WsStream,
    mut outbound: OutboundRx,
    mut shutdown: oneshot::Receiver<()>,
) {
    let (mut write, mut read) = ws_stream.split();

    // Disconnected before the driver got to run.
    if shutdown.try_recv().is_ok() {
        if let Err(e) = write.close().await {
            tracing::debug!("failed to close socket: {}", e);
        }
        client.session_closed(generation, Closure::Requested, session);
        return;
    }

    let setup = ClientMessage::setup(&session);
    let retry_interval = client.inner.config.setup_retry_interval();
    let mut setup_timer = Some(setup_retry_timer(retry_interval));
    client.send_setup(&mut write, &setup, session.model()).await;

    let closure = loop {
        tokio::select! {
            _ = &mut shutdown => {
                if let Err(e) = write.close().await {
                    tracing::debug!("failed to close socket: {}", e);
                }
                break Closure::Requested;
            }
            Some(message) = outbound.recv() => {
                client.write_frame(&mut write, &message).await;
            }
            _ = next_retry(&mut setup_timer) => {
                if !client.is_current(generation) {
                    setup_timer = None;
                    continue;
                }
                tracing::warn!("setup not acknowledged after {:?}, resending", retry_interval);
                client.send_setup(&mut write, &setup, session.model()).await;
            }
            frame = read.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Binary(bin))) => match String::from_utf8(bin) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("binary frame is not UTF-8: {}", e);
                            client.log("client.error", json!({ "error": "binary frame is not UTF-8" }));
                            continue;
                        }
                    },
                    Some(Ok(Message::Close(frame))) => {
                        let reason = frame
                            .map(|frame| frame.reason.to_string())
                            .filter(|reason| !reason.is_empty());
                        break Closure::Remote(reason);
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        tracing::error!("failed to read message: {}", e);
                        break Closure::Remote(Some(e.to_string()));
                    }
                    None => break Closure::Remote(None),
                };
                if client.handle_text(generation, &text) {
                    setup_timer = None;
                }
            }
        }
    };

    client.session_closed(generation, closure, session);
}

fn setup_retry_timer(period: std::time::Duration) -> Interval {
    let mut timer = tokio::time::interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

async fn next_retry(timer: &mut Option<Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

// Public function to create a client with a specific config and connect it.
pub async fn connect_with_config(config: Config, session: SessionConfig) -> Result<Client> {
    let client = Client::new(config);
    client.connect(session).await?;
    Ok(client)
}

// Public function to connect using the endpoint and key from the environment.
pub async fn connect(session: SessionConfig) -> Result<Client> {
    let config = Config::from_env()?;
    connect_with_config(config, session).await
}
