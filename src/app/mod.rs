//! Application controller
//!
//! The dashboard follows a message/update loop:
//! - A selection message starts a fetch on its own task (Idle -> Fetching)
//! - The fetch reports back with a loaded message
//! - A successful load is reshaped, merged into the store and rendered
//!   (Fetching -> Applying -> Idle); a failed one is logged and dropped
//!
//! Only the controller task touches the store, so no locks are needed.

pub mod reshape;

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::api::{PhotoSource, RawPhoto};
use crate::error::FetchError;
use crate::state::{ApplicationState, RoverName, Store};
use crate::ui::{render, Mount};

pub use reshape::reshape;

/// Application messages (events)
#[derive(Debug)]
pub enum Message {
    /// User picked a rover in the selector
    RoverSelected {
        rover: RoverName,
        ack: Option<oneshot::Sender<Outcome>>,
    },
    /// Background fetch finished
    RoverLoaded {
        token: u64,
        rover: RoverName,
        result: Result<Vec<RawPhoto>, FetchError>,
        ack: Option<oneshot::Sender<Outcome>>,
    },
}

impl Message {
    pub fn select(rover: RoverName) -> Self {
        Message::RoverSelected { rover, ack: None }
    }
}

/// How a selection cycle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New state merged and rendered
    Applied,
    /// Fetch or reshape failed; state untouched
    Failed,
    /// A newer selection was issued while this one was in flight
    Stale,
}

/// Where the controller is in the selection cycle
///
/// Applying a loaded result (reshape, merge, render) runs synchronously
/// inside [`Dashboard::update`], so it is never observable as a phase of
/// its own: the controller goes straight from `Fetching` back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting on the fetch for the latest selection
    Fetching { rover: RoverName, token: u64 },
}

/// Background work returned by [`Dashboard::update`]
pub type Task = BoxFuture<'static, Message>;

/// The dashboard controller: owns the store, the mount and the photo source
pub struct Dashboard {
    store: Store,
    mount: Arc<dyn Mount>,
    source: Arc<dyn PhotoSource>,
    /// Token of the most recent selection; results carrying any other are stale
    latest_token: u64,
    in_flight: usize,
    phase: Phase,
}

impl Dashboard {
    /// Create a controller holding the initial state
    pub fn new(source: Arc<dyn PhotoSource>, mount: Arc<dyn Mount>) -> Self {
        Self {
            store: Store::new(),
            mount,
            source,
            latest_token: 0,
            in_flight: 0,
            phase: Phase::Idle,
        }
    }

    /// Current state snapshot
    pub fn state(&self) -> Arc<ApplicationState> {
        self.store.snapshot()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Render the current state into the mount
    pub fn render(&self) {
        if let Err(err) = render(self.mount.as_ref(), &self.store.snapshot()) {
            warn!(error = %err, "failed to write dashboard markup");
        }
    }

    /// Handle a message, returning background work to run if any
    pub fn update(&mut self, message: Message) -> Option<Task> {
        match message {
            Message::RoverSelected { rover, ack } => {
                self.latest_token += 1;
                let token = self.latest_token;
                self.phase = Phase::Fetching { rover, token };
                self.in_flight += 1;

                info!(%rover, token, "🔭 rover selected, fetching photos");

                let source = Arc::clone(&self.source);
                Some(Box::pin(async move {
                    // A panicking source still has to report back, or the
                    // cycle never ends and the requester is never answered
                    let result = AssertUnwindSafe(source.fetch_rover_photos(rover))
                        .catch_unwind()
                        .await
                        .unwrap_or_else(|panic| Err(FetchError::Panicked(panic_message(panic))));
                    Message::RoverLoaded {
                        token,
                        rover,
                        result,
                        ack,
                    }
                }))
            }
            Message::RoverLoaded {
                token,
                rover,
                result,
                ack,
            } => {
                self.in_flight = self.in_flight.saturating_sub(1);
                let outcome = self.apply_loaded(token, rover, result);
                if let Some(ack) = ack {
                    // The requester may have gone away; nothing to do then
                    let _ = ack.send(outcome);
                }
                None
            }
        }
    }

    fn apply_loaded(
        &mut self,
        token: u64,
        rover: RoverName,
        result: Result<Vec<RawPhoto>, FetchError>,
    ) -> Outcome {
        if token != self.latest_token {
            debug!(%rover, token, latest = self.latest_token, "discarding stale rover photos");
            return Outcome::Stale;
        }
        self.phase = Phase::Idle;

        match result.and_then(reshape) {
            Ok(update) => {
                let state = self.store.apply(update.selected_rover(Some(rover)));
                info!(%rover, photos = state.photos().len(), "✅ dashboard updated");
                self.render();
                Outcome::Applied
            }
            Err(err) => {
                warn!(%rover, error = %err, "could not load rover photos; keeping current state");
                Outcome::Failed
            }
        }
    }

    /// Run the controller until every handle is dropped and no fetch is left
    ///
    /// Renders the initial state first.
    pub async fn run(mut self, mut events: mpsc::Receiver<Message>) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Message>();
        let mut events_open = true;

        self.render();
        info!("🚀 dashboard controller started");

        loop {
            let message = tokio::select! {
                message = events.recv(), if events_open => match message {
                    Some(message) => message,
                    None => {
                        events_open = false;
                        if self.in_flight == 0 {
                            break;
                        }
                        continue;
                    }
                },
                Some(message) = done_rx.recv() => message,
            };

            if let Some(task) = self.update(message) {
                let done_tx = done_tx.clone();
                tokio::spawn(async move {
                    let _ = done_tx.send(task.await);
                });
            }

            if !events_open && self.in_flight == 0 {
                break;
            }
        }

        info!("dashboard controller stopped");
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Error returned when the controller task is no longer running
#[derive(Debug, thiserror::Error)]
#[error("dashboard controller is not running")]
pub struct ControllerGone;

/// Cloneable sender side of the controller's event channel
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    events: mpsc::Sender<Message>,
}

impl DashboardHandle {
    /// Create a handle and the receiver to pass to [`Dashboard::run`]
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (events, receiver) = mpsc::channel(capacity);
        (Self { events }, receiver)
    }

    /// Select `rover` and wait until the resulting cycle ends
    pub async fn select(&self, rover: RoverName) -> Result<Outcome, ControllerGone> {
        let (ack, done) = oneshot::channel();
        self.events
            .send(Message::RoverSelected {
                rover,
                ack: Some(ack),
            })
            .await
            .map_err(|_| ControllerGone)?;
        done.await.map_err(|_| ControllerGone)
    }
}
