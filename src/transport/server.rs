//! TCP listener serving framed calls.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{FrameCodec, MessageHandler, RequestPacket, ResponsePacket, RpcError};
use crate::database::HostProcess;

/// Pause after a failed `accept` so descriptor exhaustion does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(50);

/// Message-pattern server accepting framed JSON calls.
pub struct TcpServer<H: ?Sized> {
    listener: TcpListener,
    handler: Arc<H>,
    shutdown: CancellationToken,
}

impl<H> TcpServer<H>
where
    H: MessageHandler + ?Sized + 'static,
{
    /// Binds the listener.
    ///
    /// # Errors
    ///
    /// Returns the socket error when the address cannot be bound.
    pub async fn bind(addr: impl ToSocketAddrs, handler: Arc<H>) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            handler,
            shutdown: CancellationToken::new(),
        })
    }

    /// Returns the bound address.
    ///
    /// # Errors
    ///
    /// Returns the socket error when the address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Returns a handle that stops the accept loop.
    #[must_use]
    pub fn shutdown_handle(&self) -> ServerShutdown {
        ServerShutdown {
            token: self.shutdown.clone(),
        }
    }

    /// Accepts connections until shut down.
    ///
    /// Open connections are closed once the shutdown fires; replies still
    /// being computed are dropped.
    pub async fn serve(self) {
        let Self {
            listener,
            handler,
            shutdown,
        } = self;

        loop {
            let accepted = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                accepted = listener.accept() => accepted,
            };

            match accepted {
                Ok((socket, peer)) => {
                    debug!(%peer, "accepted connection");
                    tokio::spawn(serve_connection(
                        socket,
                        peer,
                        Arc::clone(&handler),
                        shutdown.clone(),
                    ));
                }
                Err(err) => {
                    warn!(error = %err, "failed to accept connection");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            }
        }

        info!("listener stopped");
    }
}

/// Stops a [`TcpServer`]. Registered as the host closed by the database
/// shutdown hook.
#[derive(Debug, Clone)]
pub struct ServerShutdown {
    token: CancellationToken,
}

impl ServerShutdown {
    /// Stops accepting connections.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Returns `true` once shutdown was requested.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[async_trait]
impl HostProcess for ServerShutdown {
    async fn close(&self) {
        info!("closing microservice listener");
        self.shutdown();
    }
}

async fn serve_connection<H>(
    socket: TcpStream,
    peer: SocketAddr,
    handler: Arc<H>,
    shutdown: CancellationToken,
) where
    H: MessageHandler + ?Sized,
{
    let mut framed = Framed::new(socket, FrameCodec::new());

    loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => break,
            next = framed.next() => next,
        };

        let frame = match next {
            None => break,
            Some(Ok(frame)) => frame,
            Some(Err(err)) => {
                warn!(%peer, error = %err, "closing connection after framing error");
                break;
            }
        };

        let Some(reply) = handle_frame(&*handler, &frame).await else {
            continue;
        };

        let bytes = match reply.to_frame() {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(%peer, error = %err, "failed to encode reply");
                continue;
            }
        };

        if let Err(err) = framed.send(bytes).await {
            warn!(%peer, error = %err, "failed to send reply");
            break;
        }
    }

    debug!(%peer, "connection closed");
}

/// Dispatches one frame and builds the reply, if any.
///
/// Events yield `None`. A malformed packet is answered with `VALIDATION`
/// when its id can still be read, and skipped otherwise.
pub(crate) async fn handle_frame<H>(handler: &H, frame: &[u8]) -> Option<ResponsePacket>
where
    H: MessageHandler + ?Sized,
{
    let packet = match RequestPacket::from_frame(frame) {
        Ok(packet) => packet,
        Err(err) => {
            let Some(id) = RequestPacket::recover_id(frame) else {
                warn!(error = %err, "skipping malformed packet");
                return None;
            };
            debug!(%id, error = %err, "rejecting malformed packet");
            return Some(ResponsePacket::failure(
                id,
                &RpcError::validation(format!("malformed packet: {err}")),
            ));
        }
    };

    let route = packet.route();
    let result = handler.handle(&route, packet.data).await;

    let Some(id) = packet.id else {
        if let Err(err) = result {
            debug!(pattern = %route, error = %err, "event handler failed");
        }
        return None;
    };

    Some(match result {
        Ok(response) => ResponsePacket::success(id, response),
        Err(err) => {
            debug!(pattern = %route, code = %err.code, "call rejected");
            ResponsePacket::failure(id, &err)
        }
    })
}
