// src/transport.rs
//
// Connect-per-call JSON transport over the execution node's IPC socket.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::UnixStream;
use tokio::time::{sleep, timeout};

const READ_CHUNK_BYTES: usize = 8192;

/// Fixed retry schedule applied uniformly to every transport call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Seam for anything that can carry a JSON-RPC payload to the node.
///
/// The contract is deliberately total: a transport either hands back a
/// parsed JSON reply or `None`. Connection errors, timeouts and malformed
/// replies all collapse into `None` after the retry schedule is exhausted;
/// a clean close with no data is an absent reply right away, with no
/// further attempts. Callers decide what a missing reply means for them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, payload: &Value) -> Option<Value>;
}

/// Transport over a unix domain socket, one connection per call.
///
/// Each call connects fresh, writes the whole payload, half-closes the
/// write side to signal end-of-request, then reads until the node closes
/// the connection or an individual read exceeds the timeout. Connections
/// are never reused; the stream is closed on every exit path by drop.
pub struct IpcTransport {
    path: PathBuf,
    read_timeout: Duration,
    retry: RetryPolicy,
}

impl IpcTransport {
    pub fn new(path: impl AsRef<Path>, read_timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            read_timeout,
            retry,
        }
    }

    async fn attempt(&self, data: &[u8]) -> Result<Option<Value>> {
        let mut stream = timeout(self.read_timeout, UnixStream::connect(&self.path))
            .await
            .context("connect timed out")?
            .with_context(|| format!("connect to {} failed", self.path.display()))?;

        stream.write_all(data).await.context("write failed")?;
        // Half-close tells the node no further requests follow on this
        // connection; Erigon-style IPC replies only after seeing EOF.
        stream.shutdown().await.context("half-close failed")?;

        let mut raw: Vec<u8> = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_BYTES];
        loop {
            match timeout(self.read_timeout, stream.read(&mut chunk)).await {
                // A stalled read ends the response; whatever arrived counts.
                Err(_) => break,
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => raw.extend_from_slice(&chunk[..n]),
                Ok(Err(e)) => return Err(e).context("read failed"),
            }
        }

        let text = String::from_utf8_lossy(&raw);
        let trimmed = text.trim();
        // A clean close with nothing to say is an answer, not a failure.
        if trimmed.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_str(trimmed).context("reply is not valid JSON")?,
        ))
    }
}

#[async_trait]
impl Transport for IpcTransport {
    async fn send(&self, payload: &Value) -> Option<Value> {
        let data = payload.to_string().into_bytes();
        for attempt in 1..=self.retry.max_attempts {
            match self.attempt(&data).await {
                Ok(reply) => {
                    debug!(
                        "IPC call to {} completed on attempt {}",
                        self.path.display(),
                        attempt
                    );
                    return reply;
                }
                Err(e) => {
                    warn!(
                        "IPC attempt {}/{} to {} failed: {:#}",
                        attempt,
                        self.retry.max_attempts,
                        self.path.display(),
                        e
                    );
                    if attempt < self.retry.max_attempts {
                        sleep(self.retry.backoff).await;
                    }
                }
            }
        }
        None
    }
}
