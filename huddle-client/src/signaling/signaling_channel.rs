use std::sync::Arc;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use huddle_core::SignalEnvelope;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ChannelError;
use crate::signaling::{ChannelEvent, RetryPolicy, SignalingTransport};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Outbound = Arc<Mutex<Option<mpsc::UnboundedSender<Message>>>>;

/// One logical WebSocket connection to a room's signaling endpoint.
///
/// A background task owns the socket: it decodes inbound frames into
/// [`ChannelEvent`]s and reconnects on a fixed interval whenever the
/// connection drops, until [`SignalingTransport::close`] is called.
pub struct SignalingChannel {
    outbound: Outbound,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SignalingChannel {
    pub fn open(
        url: Url,
        retry: RetryPolicy,
        buffer: usize,
    ) -> (Self, mpsc::Receiver<ChannelEvent>) {
        let (event_tx, event_rx) = mpsc::channel(buffer);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let outbound: Outbound = Arc::new(Mutex::new(None));

        let task = tokio::spawn(Self::supervise(
            url,
            retry,
            outbound.clone(),
            event_tx,
            shutdown_rx,
        ));

        let channel = Self {
            outbound,
            shutdown,
            task: Mutex::new(Some(task)),
        };
        (channel, event_rx)
    }

    pub async fn is_connected(&self) -> bool {
        self.outbound.lock().await.is_some()
    }

    async fn supervise(
        url: Url,
        retry: RetryPolicy,
        outbound: Outbound,
        event_tx: mpsc::Sender<ChannelEvent>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let mut attempt: u32 = 0;

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            let connected = tokio::select! {
                res = connect_async(url.as_str()) => res,
                _ = shutdown_rx.changed() => break,
            };

            match connected {
                Ok((ws, _)) => {
                    attempt = 0;
                    info!("Signaling channel connected to {}", url);

                    let (tx, rx) = mpsc::unbounded_channel();
                    *outbound.lock().await = Some(tx);

                    if !Self::emit(&event_tx, &mut shutdown_rx, ChannelEvent::Connected).await {
                        *outbound.lock().await = None;
                        break;
                    }

                    Self::pump(ws, rx, &event_tx, &mut shutdown_rx).await;
                    *outbound.lock().await = None;

                    if *shutdown_rx.borrow() {
                        break;
                    }

                    warn!("Signaling channel to {} lost", url);
                    if !Self::emit(&event_tx, &mut shutdown_rx, ChannelEvent::ConnectionLost).await
                    {
                        break;
                    }
                }
                Err(source) => {
                    let err = ChannelError::Connect {
                        url: url.to_string(),
                        source,
                    };
                    warn!("{}", err);
                }
            }

            attempt += 1;
            let Some(delay) = retry.delay_for(attempt) else {
                warn!("Giving up on {} after {} attempts", url, attempt - 1);
                break;
            };
            debug!("Reconnecting to {} in {:?}", url, delay);

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.changed() => break,
            }
        }

        info!("Signaling channel to {} stopped", url);
    }

    /// Moves frames both ways until the socket ends or shutdown is requested.
    async fn pump(
        ws: WsStream,
        mut outbound_rx: mpsc::UnboundedReceiver<Message>,
        event_tx: &mpsc::Sender<ChannelEvent>,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) {
        let (mut sink, mut stream) = ws.split();

        loop {
            tokio::select! {
                out = outbound_rx.recv() => {
                    let Some(msg) = out else { break };
                    if let Err(e) = sink.send(msg).await {
                        warn!("Failed to write to signaling socket: {}", e);
                        break;
                    }
                }

                incoming = stream.next() => match incoming {
                    Some(Ok(Message::Text(text))) => match SignalEnvelope::decode(&text) {
                        Ok(envelope) => {
                            let event = ChannelEvent::Envelope(envelope);
                            if !Self::emit(event_tx, shutdown_rx, event).await {
                                let _ = sink.send(Message::Close(None)).await;
                                break;
                            }
                        }
                        Err(e) => warn!("Discarding signaling frame: {}", e),
                    },
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                },

                _ = shutdown_rx.changed() => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    }

    /// Hands an event to the owner. Gives up when the owner is gone or
    /// shutdown is requested while the queue is full.
    async fn emit(
        event_tx: &mpsc::Sender<ChannelEvent>,
        shutdown_rx: &mut watch::Receiver<bool>,
        event: ChannelEvent,
    ) -> bool {
        tokio::select! {
            sent = event_tx.send(event) => sent.is_ok(),
            _ = shutdown_rx.wait_for(|stop| *stop) => false,
        }
    }
}

#[async_trait]
impl SignalingTransport for SignalingChannel {
    async fn send(&self, envelope: SignalEnvelope) -> Result<(), ChannelError> {
        let text = envelope.encode()?;

        let outbound = self.outbound.lock().await;
        let Some(tx) = outbound.as_ref() else {
            return Err(ChannelError::Closed);
        };
        tx.send(Message::Text(text))
            .map_err(|_| ChannelError::Closed)
    }

    async fn close(&self) {
        self.shutdown.send_replace(true);

        let Some(task) = self.task.lock().await.take() else {
            return;
        };
        if let Err(e) = task.await {
            warn!("Signaling task ended abnormally: {}", e);
        }
        *self.outbound.lock().await = None;
        info!("Signaling channel closed");
    }
}
