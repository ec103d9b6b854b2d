use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracker_core::{Request, Response};
use tracker_logging::tracker_warn;

use crate::{handle_request, Messenger, SyncService};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Reply {
        request_id: RequestId,
        response: Response,
    },
}

enum EngineCommand {
    Dispatch { request_id: RequestId, request: Request },
}

/// Background context owning the sync service.
///
/// Requests are queued over a channel and each runs as its own task on a
/// dedicated tokio runtime; replies come back as [`EngineEvent`]s.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: Mutex<mpsc::Receiver<EngineEvent>>,
    next_id: AtomicU64,
}

impl EngineHandle {
    pub fn new(service: SyncService) -> io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new()?;
        let service = Arc::new(service);

        thread::Builder::new()
            .name("tracker-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let service = service.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(&service, command, event_tx).await;
                    });
                }
            })?;

        Ok(Self {
            cmd_tx,
            event_rx: Mutex::new(event_rx),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn send(&self, request: Request) -> RequestId {
        let request_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if self
            .cmd_tx
            .send(EngineCommand::Dispatch { request_id, request })
            .is_err()
        {
            tracker_warn!("Engine thread is gone; request {} dropped", request_id);
        }
        request_id
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Sends `request` and blocks until its reply arrives. Replies to other
    /// requests that arrive first are discarded.
    pub fn request_blocking(&self, request: Request) -> Response {
        let request_id = self.send(request);
        let Ok(rx) = self.event_rx.lock() else {
            return Response::failure("engine event channel poisoned");
        };
        loop {
            match rx.recv() {
                Ok(EngineEvent::Reply {
                    request_id: id,
                    response,
                }) if id == request_id => return response,
                Ok(EngineEvent::Reply { request_id: id, .. }) => {
                    tracker_warn!("Discarding reply to request {}", id);
                }
                Err(_) => return Response::failure("engine stopped before replying"),
            }
        }
    }
}

impl Messenger for EngineHandle {
    fn send_message(&self, request: Request) -> Response {
        self.request_blocking(request)
    }
}

async fn handle_command(
    service: &SyncService,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Dispatch { request_id, request } => {
            let response = handle_request(service, request).await;
            let _ = event_tx.send(EngineEvent::Reply {
                request_id,
                response,
            });
        }
    }
}
