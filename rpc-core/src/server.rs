//! RPC listener

use crate::frame::{self, RpcRequest, RpcResponse};
use crate::Result;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// Procedure dispatcher implemented by a backend
#[async_trait]
pub trait RpcService: Send + Sync + 'static {
    /// Handle one call. `Err` is sent back to the caller as the remote error.
    async fn handle(&self, method: &str, body: &[u8]) -> std::result::Result<Vec<u8>, String>;
}

/// Accept loop serving one task per connection
pub struct RpcServer<S> {
    service: Arc<S>,
}

impl<S: RpcService> RpcServer<S> {
    /// Create new server
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Serve until the process ends
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        self.serve_with_shutdown(listener, std::future::pending()).await
    }

    /// Serve until `shutdown` resolves. In-flight connections keep running.
    pub async fn serve_with_shutdown<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send,
    {
        info!("RPC server listening on {}", listener.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("RPC server shutting down");
                    return Ok(());
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let service = Arc::clone(&self.service);
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(stream, peer, service).await {
                                warn!("RPC connection {} ended with error: {}", peer, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                    }
                },
            }
        }
    }
}

async fn serve_connection<S: RpcService>(
    stream: TcpStream,
    peer: SocketAddr,
    service: Arc<S>,
) -> Result<()> {
    debug!("RPC connection accepted from {}", peer);
    stream.set_nodelay(true)?;
    let mut transport = frame::transport(stream);

    while let Some(received) = transport.next().await {
        let request: RpcRequest = frame::decode(&received?)?;
        debug!("RPC call {} (seq {}) from {}", request.method, request.seq, peer);

        let outcome = service.handle(&request.method, &request.body).await;
        let response = RpcResponse {
            seq: request.seq,
            outcome,
        };
        transport.send(frame::encode(&response)?).await?;
    }

    debug!("RPC connection closed by {}", peer);
    Ok(())
}
