// RPC procedures served by the log backend

use async_trait::async_trait;
use rpc_core::contract::{LogEntryArgs, LOG_INFO};
use rpc_core::{frame, RpcService};
use tracing::{error, info};

use crate::store::{LogEntry, LogStore};

pub struct LogRpcService<S> {
    store: S,
}

impl<S: LogStore> LogRpcService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    async fn log_info(&self, args: LogEntryArgs) -> Result<String, String> {
        let entry = LogEntry::new(args.name, args.data);

        self.store.insert(&entry).await.map_err(|e| {
            error!("Failed to store log entry {}: {}", entry.name, e);
            e.to_string()
        })?;

        info!("Stored log entry {}", entry.name);
        Ok(format!("Processed payload via RPC: {}", entry.name))
    }
}

#[async_trait]
impl<S: LogStore> RpcService for LogRpcService<S> {
    async fn handle(&self, method: &str, body: &[u8]) -> Result<Vec<u8>, String> {
        match method {
            LOG_INFO => {
                let args: LogEntryArgs = frame::decode(body).map_err(|e| e.to_string())?;
                let reply = self.log_info(args).await?;
                frame::encode(&reply)
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| e.to_string())
            }
            other => Err(format!("rpc: can't find method {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MockLogStore, StoreError};

    fn encoded(name: &str) -> Vec<u8> {
        frame::encode(&LogEntryArgs {
            name: name.to_string(),
            data: "payload".to_string(),
        })
        .unwrap()
        .to_vec()
    }

    #[tokio::test]
    async fn test_log_info_stores_and_acknowledges() {
        let mut store = MockLogStore::new();
        store
            .expect_insert()
            .withf(|entry| entry.name == "event" && entry.data == "payload")
            .times(1)
            .returning(|_| Ok(()));

        let service = LogRpcService::new(store);
        let reply = service.handle(LOG_INFO, &encoded("event")).await.unwrap();
        let reply: String = frame::decode(&reply).unwrap();

        assert_eq!(reply, "Processed payload via RPC: event");
    }

    #[tokio::test]
    async fn test_store_failure_is_returned_to_caller() {
        let mut store = MockLogStore::new();
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(StoreError::Database(sqlx::Error::PoolTimedOut)));

        let service = LogRpcService::new(store);
        let err = service.handle(LOG_INFO, &encoded("event")).await.unwrap_err();

        assert!(err.starts_with("Database error"));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let service = LogRpcService::new(MockLogStore::new());
        let err = service.handle("LogService.Drop", &[]).await.unwrap_err();
        assert_eq!(err, "rpc: can't find method LogService.Drop");
    }

    #[tokio::test]
    async fn test_garbage_body() {
        let service = LogRpcService::new(MockLogStore::new());
        assert!(service.handle(LOG_INFO, &[0xff]).await.is_err());
    }
}
