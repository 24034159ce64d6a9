//! RPC client

use crate::frame::{self, RpcRequest, RpcResponse, Transport};
use crate::{Result, RpcError};
use futures::{SinkExt, StreamExt};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::net::TcpStream;
use tracing::debug;

/// Client bound to one TCP connection.
///
/// The connection closes when the client is dropped.
pub struct RpcClient {
    transport: Transport,
    next_seq: u64,
}

impl RpcClient {
    /// Dial the remote address
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| RpcError::Connect {
                addr: addr.to_string(),
                source,
            })?;
        stream.set_nodelay(true)?;

        debug!("RPC connection open: {}", addr);

        Ok(Self {
            transport: frame::transport(stream),
            next_seq: 0,
        })
    }

    /// Invoke `method` and wait for its reply
    pub async fn call<A, R>(&mut self, method: &str, args: &A) -> Result<R>
    where
        A: Serialize,
        R: DeserializeOwned,
    {
        let seq = self.next_seq;
        self.next_seq += 1;

        let request = RpcRequest {
            seq,
            method: method.to_string(),
            body: bincode::serialize(args)?,
        };
        self.transport.send(frame::encode(&request)?).await?;

        let reply = self.transport.next().await.ok_or(RpcError::Closed)??;
        let response: RpcResponse = frame::decode(&reply)?;

        if response.seq != seq {
            return Err(RpcError::Protocol(format!(
                "reply sequence {} does not match request {}",
                response.seq, seq
            )));
        }

        match response.outcome {
            Ok(body) => frame::decode(&body),
            Err(message) => Err(RpcError::Remote(message)),
        }
    }
}

/// Connect, make a single call and close, all within `timeout`.
pub async fn call_once<A, R>(addr: &str, method: &str, args: &A, timeout: Duration) -> Result<R>
where
    A: Serialize + Sync,
    R: DeserializeOwned,
{
    let call = async {
        let mut client = RpcClient::connect(addr).await?;
        client.call(method, args).await
    };

    tokio::time::timeout(timeout, call)
        .await
        .map_err(|_| RpcError::Timeout(timeout))?
}
