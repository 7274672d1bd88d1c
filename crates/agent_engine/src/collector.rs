//! Concurrent draining of the worker's stdout and stderr.
use std::sync::{Arc, Mutex, PoisonError};

use agent_logging::{agent_debug, agent_trace};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

const CHUNK_SIZE: usize = 8192;

/// Bytes read so far from one stream. Shared with its drain task so that a
/// drain abandoned on timeout still leaves its partial output behind.
#[derive(Debug, Clone, Default)]
pub struct StreamBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl StreamBuffer {
    fn extend(&self, chunk: &[u8]) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(chunk);
    }

    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.bytes.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// One running drain task and the buffer it fills.
pub struct Drain {
    pub buffer: StreamBuffer,
    pub task: JoinHandle<()>,
}

impl Drain {
    /// Abort the drain and wait until it has stopped touching the buffer.
    pub async fn cancel(&mut self) {
        // A handle already polled to completion must not be awaited again.
        if self.task.is_finished() {
            return;
        }
        self.task.abort();
        let _ = (&mut self.task).await;
    }
}

/// Spawn a task that reads `reader` to end-of-stream. A missing pipe yields an
/// already finished drain with an empty buffer.
pub fn spawn_drain<R>(reader: Option<R>, label: &'static str) -> Drain
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let buffer = StreamBuffer::default();
    let sink = buffer.clone();
    let task = tokio::spawn(async move {
        let Some(mut reader) = reader else {
            return;
        };
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut total = 0usize;
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    total += n;
                    agent_trace!("{} read {} bytes", label, n);
                    sink.extend(&chunk[..n]);
                }
                Err(err) => {
                    // Whatever arrived before the error is kept.
                    agent_debug!("{} read error after {} bytes: {}", label, total, err);
                    break;
                }
            }
        }
        agent_debug!("{} drained {} bytes", label, total);
    });
    Drain { buffer, task }
}
