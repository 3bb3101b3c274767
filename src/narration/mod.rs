//! Narration event channel.
//!
//! The playback controller publishes one [`NarrationEvent`] per cursor write.
//! Subscribers are registered and removed explicitly through
//! [`NarrationChannel`]; there is no global broadcast.
//!
//! Publishing is fire-and-forget:
//! - a subscriber that returns an error is logged and kept
//! - a subscriber that panics is logged and removed
//! - a channel subscriber whose receiver was dropped is removed
//!
//! None of these outcomes reaches the controller.

pub mod speech;

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::trace::Step;

pub use speech::{SpeechBackend, SpeechError, SpeechNarrator};

/// How the narration backend may pace this event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimingMode {
    /// Backend paces itself; speaking immediately is optional.
    #[default]
    Controlled,
    /// The call stack started from a direct user action. Backends that need
    /// a gesture before producing audio may speak now.
    UserGesture,
}

/// Payload published on every cursor write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrationEvent {
    /// Step title.
    pub title: String,
    /// Step description.
    pub description: String,
    /// Full text to speak.
    pub narration_text: String,
    /// Cursor position.
    pub step_index: usize,
    /// Trace length.
    pub total_steps: usize,
    /// Pacing hint.
    pub timing_mode: TimingMode,
}

impl NarrationEvent {
    /// Build the event for `step` at `step_index`.
    #[must_use]
    pub fn from_step(step: &Step, step_index: usize, total_steps: usize, timing_mode: TimingMode) -> Self {
        Self {
            title: step.title.clone(),
            description: step.description.clone(),
            narration_text: step.narration_text(),
            step_index,
            total_steps,
            timing_mode,
        }
    }
}

/// Failure reported by a subscriber.
#[derive(Debug, Error)]
pub enum NarrationError {
    /// The receiving end is gone; the subscriber should be dropped.
    #[error("subscriber disconnected")]
    Disconnected,

    /// Subscriber is already borrowed elsewhere.
    #[error("subscriber busy")]
    Busy,

    /// Speech backend failure.
    #[error("speech backend: {0}")]
    Speech(#[from] SpeechError),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Receives narration events.
pub trait NarrationSubscriber {
    /// Handle one event. Errors are logged by the channel and never
    /// propagate to the publisher.
    ///
    /// # Errors
    ///
    /// Returns [`NarrationError::Disconnected`] to ask for removal, any
    /// other variant to report a transient failure.
    fn on_narration(&mut self, event: &NarrationEvent) -> Result<(), NarrationError>;
}

/// Shared subscriber, so the owner can keep a handle (e.g. to pause speech).
impl<S: NarrationSubscriber + ?Sized> NarrationSubscriber for Rc<RefCell<S>> {
    fn on_narration(&mut self, event: &NarrationEvent) -> Result<(), NarrationError> {
        self.try_borrow_mut()
            .map_err(|_| NarrationError::Busy)?
            .on_narration(event)
    }
}

/// Adapts a closure into a subscriber.
pub struct FnSubscriber<F>(pub F);

impl<F> NarrationSubscriber for FnSubscriber<F>
where
    F: FnMut(&NarrationEvent) -> Result<(), NarrationError>,
{
    fn on_narration(&mut self, event: &NarrationEvent) -> Result<(), NarrationError> {
        (self.0)(event)
    }
}

/// Forwards events into an unbounded mpsc channel. Sending never blocks.
#[derive(Debug)]
pub struct ChannelSubscriber {
    sender: Sender<NarrationEvent>,
}

impl NarrationSubscriber for ChannelSubscriber {
    fn on_narration(&mut self, event: &NarrationEvent) -> Result<(), NarrationError> {
        self.sender
            .send(event.clone())
            .map_err(|_| NarrationError::Disconnected)
    }
}

/// Handle returned by [`NarrationChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Delivery summary for one publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Subscribers that accepted the event.
    pub delivered: usize,
    /// Subscribers that failed or panicked.
    pub failed: usize,
    /// Subscribers removed during this publish.
    pub removed: usize,
}

/// Explicit publish/subscribe channel owned by the playback controller.
#[derive(Default)]
pub struct NarrationChannel {
    subscribers: Vec<(SubscriptionId, Box<dyn NarrationSubscriber>)>,
    next_id: u64,
    published: u64,
}

impl std::fmt::Debug for NarrationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationChannel")
            .field("subscribers", &self.subscribers.len())
            .field("published", &self.published)
            .finish()
    }
}

impl NarrationChannel {
    /// Channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a subscriber.
    pub fn subscribe<S: NarrationSubscriber + 'static>(&mut self, subscriber: S) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        tracing::debug!(subscription = id.0, "narration subscriber attached");
        id
    }

    /// Attach a closure.
    pub fn subscribe_fn<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&NarrationEvent) -> Result<(), NarrationError> + 'static,
    {
        self.subscribe(FnSubscriber(f))
    }

    /// Attach an mpsc receiver. Dropping the receiver unsubscribes on the
    /// next publish.
    pub fn subscribe_channel(&mut self) -> (SubscriptionId, Receiver<NarrationEvent>) {
        let (sender, receiver) = mpsc::channel();
        (self.subscribe(ChannelSubscriber { sender }), receiver)
    }

    /// Detach a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        let removed = self.subscribers.len() != before;
        if removed {
            tracing::debug!(subscription = id.0, "narration subscriber detached");
        }
        removed
    }

    /// Number of attached subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// No subscribers attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Events published since creation.
    #[must_use]
    pub const fn published(&self) -> u64 {
        self.published
    }

    /// Deliver `event` to every subscriber in subscription order.
    pub fn publish(&mut self, event: &NarrationEvent) -> PublishReport {
        self.published += 1;
        let mut report = PublishReport::default();

        self.subscribers.retain_mut(|(id, subscriber)| {
            match catch_unwind(AssertUnwindSafe(|| subscriber.on_narration(event))) {
                Ok(Ok(())) => {
                    report.delivered += 1;
                    true
                }
                Ok(Err(NarrationError::Disconnected)) => {
                    tracing::debug!(subscription = id.0, "narration subscriber disconnected");
                    report.removed += 1;
                    false
                }
                Ok(Err(error)) => {
                    tracing::warn!(subscription = id.0, %error, step = event.step_index, "narration subscriber failed");
                    report.failed += 1;
                    true
                }
                Err(_) => {
                    tracing::warn!(subscription = id.0, step = event.step_index, "narration subscriber panicked; removed");
                    report.failed += 1;
                    report.removed += 1;
                    false
                }
            }
        });

        report
    }
}
