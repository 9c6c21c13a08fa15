use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::core::{Reply, Request, TasksService};

const SHUTDOWN_GRACE: Duration = Duration::from_millis(500);

/// Runs requests off the UI thread and queues their replies for the next tick.
pub(crate) struct Dispatcher {
    runtime: Runtime,
    service: TasksService,
    replies_tx: UnboundedSender<Reply>,
    replies_rx: UnboundedReceiver<Reply>,
}

impl Dispatcher {
    pub(crate) fn new(service: TasksService) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("taskboard-io")
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            service,
            replies_tx,
            replies_rx,
        })
    }

    pub(crate) fn send(&self, request: Request) {
        let service = self.service.clone();
        let replies = self.replies_tx.clone();
        self.runtime.spawn(async move {
            let reply = service.execute(request).await;
            if replies.send(reply).is_err() {
                debug!("interface closed before the reply arrived");
            }
        });
    }

    pub(crate) fn drain(&mut self) -> Vec<Reply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.replies_rx.try_recv() {
            replies.push(reply);
        }
        replies
    }

    pub(crate) fn shutdown(self) {
        self.runtime.shutdown_timeout(SHUTDOWN_GRACE);
    }
}
