//! Cancellable line reading
//!
//! Wraps a buffered async reader so a pending line read can be aborted by a
//! shutdown signal. Cancellation yields a distinguishable error instead of a
//! line, so the read loop can terminate cleanly during process shutdown.

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("line read cancelled")]
    Cancelled,
    #[error("line read failed: {0}")]
    Io(#[from] std::io::Error),
}

pub struct LineReader<R> {
    lines: Lines<R>,
}

impl LineReader<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Read the next line, racing against the shutdown signal. `Ok(None)`
    /// is end of input; `Err(Cancelled)` means the signal fired first.
    pub async fn next_line(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Option<String>, ReadError> {
        tokio::select! {
            _ = shutdown.changed() => {
                tracing::info!("line read cancelled");
                Err(ReadError::Cancelled)
            }
            line = self.lines.next_line() => Ok(line?),
        }
    }
}
