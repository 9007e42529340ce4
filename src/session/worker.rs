//! Account Session Worker
//!
//! Each running account owns one worker task. The worker holds that account's
//! engine instance and executes submitted jobs strictly one at a time; the
//! interactive task suspends on a reply channel until the job has run. This is
//! the only path by which command logic reaches an engine.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::{mpsc, oneshot};

use crate::ports::BotEngine;

/// A type-erased job; the typed reply channel is captured inside.
type Job =
    Box<dyn for<'a> FnOnce(&'a mut dyn BotEngine) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> + Send>;

enum Request {
    Run(Job),
    Stop,
}

/// Handle to one account's worker task. Cheap to clone.
#[derive(Clone)]
pub struct AccountSession {
    tx: mpsc::Sender<Request>,
}

impl AccountSession {
    /// Spawn a worker owning `engine`. The worker runs until [`stop`] is
    /// called or every handle is dropped.
    ///
    /// [`stop`]: AccountSession::stop
    pub fn spawn(account: String, engine: Box<dyn BotEngine>) -> Self {
        let (tx, rx) = mpsc::channel(16);
        tokio::spawn(worker_loop(account, engine, rx));
        Self { tx }
    }

    /// Whether the worker task is still accepting jobs.
    pub fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Marshal a job onto the worker and wait for its result.
    ///
    /// Returns `None` when the worker is gone, in which case the job did not
    /// run at all.
    pub async fn run<R, F>(&self, job: F) -> Option<R>
    where
        R: Send + 'static,
        F: for<'a> FnOnce(&'a mut dyn BotEngine) -> Pin<Box<dyn Future<Output = R> + Send + 'a>>
            + Send
            + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let erased: Job = Box::new(move |engine: &mut dyn BotEngine| {
            Box::pin(async move {
                let value = job(engine).await;
                let _ = reply_tx.send(value);
            })
        });
        if self.tx.send(Request::Run(erased)).await.is_err() {
            return None;
        }
        reply_rx.await.ok()
    }

    /// Ask the worker to shut its engine down and exit. Jobs already queued
    /// ahead of the stop request still run.
    pub async fn stop(&self) -> bool {
        self.tx.send(Request::Stop).await.is_ok()
    }
}

async fn worker_loop(account: String, mut engine: Box<dyn BotEngine>, mut rx: mpsc::Receiver<Request>) {
    tracing::info!(account = %account, "session worker started");
    while let Some(request) = rx.recv().await {
        match request {
            Request::Run(job) => job(engine.as_mut()).await,
            Request::Stop => break,
        }
    }
    engine.shutdown().await;
    tracing::info!(account = %account, "session worker stopped");
}
