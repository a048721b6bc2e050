//! Client for calling a message-pattern service.

use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io;
use thiserror::Error;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio_util::codec::Framed;
use tracing::debug;
use uuid::Uuid;

use super::{
    FrameCodec, FrameError, RequestPacket, ResponsePacket, RpcError, RpcErrorKind,
    UserPattern,
};
use crate::user::{
    domain::User,
    services::{GetUserRequest, SignUpRequest},
};

/// Client-side failures.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting failed.
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),

    /// The byte stream could not be framed.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A packet or payload was not valid JSON of the expected shape.
    #[error("invalid payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The server closed the connection before replying.
    #[error("connection closed before a reply arrived")]
    Closed,

    /// The server answered with an error body.
    #[error("call rejected: {0}")]
    Rejected(RpcError),
}

impl ClientError {
    /// Returns the rejection body, if the server rejected the call.
    #[must_use]
    pub const fn rejection(&self) -> Option<&RpcError> {
        match self {
            Self::Rejected(body) => Some(body),
            _ => None,
        }
    }
}

/// Connection to a message-pattern service.
///
/// Calls are issued one at a time; each waits for the reply carrying its id.
pub struct RpcClient {
    framed: Framed<TcpStream, FrameCodec>,
}

impl RpcClient {
    /// Connects to the service.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the connection cannot be opened.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let socket = TcpStream::connect(addr).await?;
        socket.set_nodelay(true)?;
        Ok(Self {
            framed: Framed::new(socket, FrameCodec::new()),
        })
    }

    /// Sends a call and waits for its reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Rejected`] when the service answers with an
    /// error body, or a transport error when no reply can be read.
    pub async fn send(&mut self, pattern: &str, data: Value) -> Result<Value, ClientError> {
        let id = Value::String(Uuid::new_v4().to_string());
        let packet = RequestPacket::request(pattern, data, id.clone());
        self.framed.send(packet.to_frame()?).await?;

        loop {
            let frame = self.framed.next().await.ok_or(ClientError::Closed)??;
            let reply = ResponsePacket::from_frame(&frame)?;
            if reply.id != id {
                debug!(expected = %id, received = %reply.id, "ignoring reply to another call");
                continue;
            }
            if let Some(err) = reply.err {
                return Err(ClientError::Rejected(rejection_body(&err)));
            }
            return Ok(reply.response.unwrap_or(Value::Null));
        }
    }

    /// Sends an event. No reply is expected.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the frame cannot be written.
    pub async fn emit(&mut self, pattern: &str, data: Value) -> Result<(), ClientError> {
        let packet = RequestPacket::event(pattern, data);
        self.framed.send(packet.to_frame()?).await?;
        Ok(())
    }

    /// Calls `SignUp`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::send`].
    pub async fn sign_up(&mut self, request: &SignUpRequest) -> Result<User, ClientError> {
        self.call(UserPattern::SignUp, serde_json::to_value(request)?)
            .await
    }

    /// Calls `GetUser`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::send`].
    pub async fn get_user(&mut self, request: &GetUserRequest) -> Result<User, ClientError> {
        self.call(UserPattern::GetUser, serde_json::to_value(request)?)
            .await
    }

    async fn call<T: DeserializeOwned>(
        &mut self,
        pattern: UserPattern,
        data: Value,
    ) -> Result<T, ClientError> {
        let response = self.send(pattern.as_str(), data).await?;
        Ok(serde_json::from_value(response)?)
    }
}

/// Non-structured error bodies are kept verbatim as `INTERNAL` messages.
fn rejection_body(err: &Value) -> RpcError {
    RpcError::deserialize(err)
        .unwrap_or_else(|_| RpcError::new(RpcErrorKind::Internal, err.to_string()))
}
