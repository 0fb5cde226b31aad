//! The single WebSocket connection to the prediction service.
//!
//! One connection for the process lifetime, no reconnect. The stream is
//! split into a writer loop fed by a fire-and-forget sender and a reader
//! loop that parses text frames into [`ServerPush`] values. Everything
//! past the initial handshake fails silently at the application layer;
//! transport-level noise goes to the `log` facade.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::payload::{PredictionRequest, ServerPush};

/// The predictor's well-known port.
pub const PREDICTOR_PORT: u16 = 46924;

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;
type WsSource = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Startup handshake failure. The only error this module ever surfaces.
#[derive(Debug)]
pub enum ChannelError {
    Connect(tokio_tungstenite::tungstenite::Error),
}

impl std::fmt::Display for ChannelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelError::Connect(err) => write!(f, "connection failed: {}", err),
        }
    }
}

impl std::error::Error for ChannelError {}

/// Handle to the open connection: a sender for outbound requests and a
/// receiver for inbound pushes.
pub struct Channel {
    outbound: mpsc::UnboundedSender<String>,
    inbound: Mutex<mpsc::UnboundedReceiver<ServerPush>>,
}

impl Channel {
    /// Open the connection to `ws://<host>:46924` and spawn the two
    /// transport loops.
    pub async fn connect(host: &str) -> Result<Self, ChannelError> {
        let url = format!("ws://{host}:{PREDICTOR_PORT}");
        let (stream, _) = connect_async(&url).await.map_err(ChannelError::Connect)?;
        log::info!("connected to {url}");

        let (sink, source) = stream.split();
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(sink, out_rx));
        tokio::spawn(read_loop(source, in_tx));

        Ok(Self {
            outbound: out_tx,
            inbound: Mutex::new(in_rx),
        })
    }

    /// Queue one request. Serialization trouble and a closed connection
    /// both drop the request on the floor.
    pub fn send(&self, request: &PredictionRequest) {
        let Ok(text) = serde_json::to_string(request) else {
            return;
        };
        if self.outbound.send(text).is_err() {
            log::debug!("dropping request, connection is closed");
        }
    }

    /// Next inbound push, or `None` once the connection is gone.
    pub async fn recv(&self) -> Option<ServerPush> {
        self.inbound.lock().await.recv().await
    }
}

async fn write_loop(mut sink: WsSink, mut requests: mpsc::UnboundedReceiver<String>) {
    while let Some(text) = requests.recv().await {
        log::debug!("sending {text}");
        if let Err(err) = sink.send(Message::Text(text.into())).await {
            log::warn!("send failed: {err}");
            break;
        }
    }
}

async fn read_loop(mut source: WsSource, pushes: mpsc::UnboundedSender<ServerPush>) {
    while let Some(frame) = source.next().await {
        match frame {
            Ok(message) if message.is_text() => {
                let Ok(text) = message.into_text() else {
                    continue;
                };
                match serde_json::from_str::<ServerPush>(text.as_str()) {
                    Ok(push) => {
                        if pushes.send(push).is_err() {
                            break;
                        }
                    }
                    Err(err) => log::debug!("ignoring unparseable message: {err}"),
                }
            }
            Ok(message) if message.is_close() => {
                log::info!("server closed the connection");
                break;
            }
            Ok(_) => {}
            Err(err) => {
                log::warn!("read failed: {err}");
                break;
            }
        }
    }
}
