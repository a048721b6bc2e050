//! TCP message-pattern transport.
//!
//! Requests and replies travel as JSON packets framed as
//! `<byte length>#<json>`, the framing used by message-pattern TCP
//! microservices. A request names the call it addresses through its
//! `pattern` and carries an `id` that the reply echoes back.
//!
//! ```text
//! +-----------+    frames    +-----------+   pattern, data   +----------------+
//! | RpcClient | <----------> | TcpServer | ----------------> | MessageHandler |
//! +-----------+              +-----------+                   +----------------+
//!                                                            (UserController)
//! ```

mod client;
mod codec;
mod dispatcher;
mod error;
mod packet;
mod server;

pub use client::{ClientError, RpcClient};
pub use codec::{DEFAULT_MAX_FRAME_SIZE, FrameCodec, FrameError};
pub use dispatcher::{MessageHandler, UserController, UserPattern};
pub use error::{RpcError, RpcErrorKind};
pub use packet::{RequestPacket, ResponsePacket};
pub use server::{ServerShutdown, TcpServer};
