//! Wire frames and codec

use crate::Result;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio_util::codec::{Framed, LengthDelimitedCodec};

/// Largest accepted frame body (1 MiB)
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Length-delimited framed TCP stream
pub type Transport = Framed<TcpStream, LengthDelimitedCodec>;

/// Procedure invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Per-connection sequence number, echoed in the reply
    pub seq: u64,
    /// Procedure name, e.g. `LogService.LogInfo`
    pub method: String,
    /// bincode-encoded arguments
    pub body: Vec<u8>,
}

/// Procedure reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    /// Sequence number of the request being answered
    pub seq: u64,
    /// bincode-encoded reply, or the remote error message
    pub outcome: std::result::Result<Vec<u8>, String>,
}

/// Wrap a TCP stream in the length-delimited codec
pub fn transport(stream: TcpStream) -> Transport {
    LengthDelimitedCodec::builder()
        .max_frame_length(MAX_FRAME_LEN)
        .new_framed(stream)
}

/// Encode a value as a frame body
pub fn encode<T: Serialize>(value: &T) -> Result<Bytes> {
    Ok(Bytes::from(bincode::serialize(value)?))
}

/// Decode a frame body
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(bincode::deserialize(bytes)?)
}
