//! Playback controller.
//!
//! Owns the cursor over a loaded [`Trace`], the repeating step timer and
//! the narration channel. Every cursor write produces exactly one
//! notification: the renderer first, then one narration event.
//!
//! Time is explicit. Hosts call [`PlaybackController::advance`] with the
//! elapsed time (tests, UI frame loops) or hand the controller to a
//! [`RealtimeDriver`] which sleeps on the wall clock between ticks.
//!
//! ```text
//!            play()             tick (last index)
//!   Idle ───────────▶ Playing ───────────────────▶ Paused
//!    ▲                  │ pause/next/prev/seek       │
//!    │                  ▼                            │
//!    └──── reset() ── Paused ◀───────────────────────┘
//! ```

pub mod driver;
pub mod speed;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;
use crate::engine::{PlayTime, PlaybackClock, TimerHandle, TimerScheduler};
use crate::error::{ScopeError, ScopeResult};
use crate::narration::{
    NarrationChannel, NarrationError, NarrationEvent, NarrationSubscriber, SubscriptionId,
    TimingMode,
};
use crate::trace::{Step, Trace};

pub use driver::RealtimeDriver;
pub use speed::{Speed, SpeedPreset};

/// Draws a step. Must depend only on `step.data`.
pub trait Renderer {
    /// Draw `step`, the step at `index`.
    fn render(&mut self, step: &Step, index: usize);
}

impl<F: FnMut(&Step, usize)> Renderer for F {
    fn render(&mut self, step: &Step, index: usize) {
        self(step, index);
    }
}

/// Transport state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Cursor at the start, never played.
    #[default]
    Idle,
    /// Timer active, cursor advancing.
    Playing,
    /// Cursor frozen, timer inactive.
    Paused,
}

impl std::fmt::Display for PlaybackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Playing => f.write_str("playing"),
            Self::Paused => f.write_str("paused"),
        }
    }
}

/// Read-only snapshot for UI shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    /// Index of the active step.
    pub cursor: usize,
    /// Transport mode.
    pub mode: PlaybackMode,
    /// Steps in the loaded trace.
    pub total_steps: usize,
    /// Current delay between automatic steps.
    pub delay_ms: u64,
}

/// Cursor state machine over one trace at a time.
pub struct PlaybackController {
    trace: Option<Trace>,
    cursor: usize,
    mode: PlaybackMode,
    speed: Speed,
    settings: PlaybackConfig,
    clock: PlaybackClock,
    scheduler: TimerScheduler,
    timer: Option<TimerHandle>,
    renderer: Option<Box<dyn Renderer>>,
    narration: NarrationChannel,
    notifications: u64,
}

impl std::fmt::Debug for PlaybackController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("algorithm", &self.trace.as_ref().map(Trace::algorithm))
            .field("cursor", &self.cursor)
            .field("mode", &self.mode)
            .field("speed", &self.speed)
            .field("timer", &self.timer)
            .field("narration", &self.narration)
            .finish_non_exhaustive()
    }
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::with_settings(PlaybackConfig::default(), Speed::default())
    }
}

impl PlaybackController {
    /// Controller with default settings and no trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller following the `playback` config section.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidSpeed`] if the configured delay is out of
    /// bounds.
    pub fn from_config(settings: &PlaybackConfig) -> ScopeResult<Self> {
        let speed = settings.initial_speed()?;
        Ok(Self::with_settings(*settings, speed))
    }

    fn with_settings(settings: PlaybackConfig, speed: Speed) -> Self {
        Self {
            trace: None,
            cursor: 0,
            mode: PlaybackMode::Idle,
            speed,
            settings,
            clock: PlaybackClock::new(),
            scheduler: TimerScheduler::new(),
            timer: None,
            renderer: None,
            narration: NarrationChannel::new(),
            notifications: 0,
        }
    }

    // ===== Collaborators =====

    /// Install the renderer, replacing any previous one.
    pub fn set_renderer<R: Renderer + 'static>(&mut self, renderer: R) {
        self.renderer = Some(Box::new(renderer));
    }

    /// Remove the renderer.
    pub fn clear_renderer(&mut self) {
        self.renderer = None;
    }

    /// The narration channel.
    #[must_use]
    pub const fn narration(&self) -> &NarrationChannel {
        &self.narration
    }

    /// Mutable access to the narration channel.
    pub fn narration_mut(&mut self) -> &mut NarrationChannel {
        &mut self.narration
    }

    /// Shorthand for `narration_mut().subscribe(..)`.
    pub fn subscribe<S: NarrationSubscriber + 'static>(&mut self, subscriber: S) -> SubscriptionId {
        self.narration.subscribe(subscriber)
    }

    /// Shorthand for `narration_mut().subscribe_fn(..)`.
    pub fn subscribe_fn<F>(&mut self, f: F) -> SubscriptionId
    where
        F: FnMut(&NarrationEvent) -> Result<(), NarrationError> + 'static,
    {
        self.narration.subscribe_fn(f)
    }

    /// Shorthand for `narration_mut().unsubscribe(..)`.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.narration.unsubscribe(id)
    }

    // ===== Lifecycle =====

    /// Replace the active trace. Any running timer is cancelled first, then
    /// the cursor is reset to 0 and step 0 is rendered.
    pub fn load(&mut self, trace: Trace) {
        self.cancel_timer();
        tracing::info!(
            algorithm = trace.algorithm(),
            steps = trace.len(),
            "trace loaded"
        );
        self.trace = Some(trace);
        self.cursor = 0;
        self.mode = PlaybackMode::Idle;
        self.notify(TimingMode::Controlled);
    }

    /// Drop the active trace and cancel the timer. Nothing fires afterwards.
    pub fn unload(&mut self) -> Option<Trace> {
        self.cancel_timer();
        self.cursor = 0;
        self.mode = PlaybackMode::Idle;
        let trace = self.trace.take();
        if let Some(trace) = &trace {
            tracing::info!(algorithm = trace.algorithm(), "trace unloaded");
        }
        trace
    }

    // ===== Transport =====

    /// Start automatic stepping. Rewinds first when at the last step.
    ///
    /// Notifies the current step with [`TimingMode::UserGesture`]. A
    /// single-step trace has nowhere to go and ends in `Paused` at once.
    /// Calling `play` while already playing changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoSteps`] when no trace is loaded.
    pub fn play(&mut self) -> ScopeResult<()> {
        let last = self.last_index()?;
        if self.mode == PlaybackMode::Playing {
            tracing::debug!(op = "play", cursor = self.cursor, "already playing");
            return Ok(());
        }

        self.cancel_timer();
        if self.cursor >= last {
            self.cursor = 0;
        }
        self.notify(TimingMode::UserGesture);

        if self.cursor >= last {
            self.mode = PlaybackMode::Paused;
        } else {
            self.mode = PlaybackMode::Playing;
            self.timer = Some(self.scheduler.start(self.clock.now(), self.speed.delay()));
        }
        tracing::debug!(op = "play", cursor = self.cursor, mode = %self.mode, "transport");
        Ok(())
    }

    /// Stop automatic stepping; the cursor stays put. No-op unless playing.
    pub fn pause(&mut self) {
        if self.mode != PlaybackMode::Playing {
            return;
        }
        self.cancel_timer();
        self.mode = PlaybackMode::Paused;
        tracing::debug!(op = "pause", cursor = self.cursor, "transport");
    }

    /// Step forward, clamped at the last step.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoSteps`] when no trace is loaded.
    pub fn next(&mut self) -> ScopeResult<()> {
        let last = self.last_index()?;
        self.move_to("next", (self.cursor + 1).min(last))
    }

    /// Step back, clamped at the first step.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoSteps`] when no trace is loaded.
    pub fn previous(&mut self) -> ScopeResult<()> {
        self.last_index()?;
        self.move_to("previous", self.cursor.saturating_sub(1))
    }

    /// Jump to `index`, clamped to the trace bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::NoSteps`] when no trace is loaded.
    pub fn seek(&mut self, index: usize) -> ScopeResult<()> {
        let last = self.last_index()?;
        self.move_to("seek", index.min(last))
    }

    /// Stop, rewind to step 0 and return to `Idle`.
    pub fn reset(&mut self) {
        self.cancel_timer();
        self.cursor = 0;
        self.mode = PlaybackMode::Idle;
        tracing::debug!(op = "reset", "transport");
        if self.trace.is_some() {
            self.notify(TimingMode::Controlled);
        }
    }

    /// Change the inter-step delay. A running timer picks it up on its next
    /// tick.
    pub fn set_speed(&mut self, speed: Speed) {
        tracing::debug!(op = "set_speed", delay_ms = speed.millis(), "transport");
        self.speed = speed;
    }

    /// [`Self::set_speed`] with a delay checked against the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidSpeed`] outside the bounds.
    pub fn set_speed_millis(&mut self, millis: u64) -> ScopeResult<()> {
        let speed = self.settings.speed_from_millis(millis)?;
        self.set_speed(speed);
        Ok(())
    }

    fn move_to(&mut self, op: &'static str, index: usize) -> ScopeResult<()> {
        self.cancel_timer();
        self.cursor = index;
        self.mode = PlaybackMode::Paused;
        tracing::debug!(op, cursor = index, "transport");
        self.notify(TimingMode::Controlled);
        Ok(())
    }

    // ===== Time =====

    /// Move time forward by `elapsed`, firing every tick that falls due.
    /// Returns the number of steps advanced.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let now = self.clock.advance(elapsed);
        self.fire_due(now)
    }

    /// Jump from tick to tick until playback stops. Returns the number of
    /// steps advanced.
    pub fn run_to_end(&mut self) -> usize {
        let mut fired = 0;
        while self.mode == PlaybackMode::Playing {
            let Some(due) = self.scheduler.next_tick_time() else {
                break;
            };
            let now = self.clock.advance_to(due);
            fired += self.fire_due(now);
        }
        fired
    }

    /// Time until the next tick, if one is pending.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.as_ref()?;
        self.scheduler
            .next_tick_time()
            .map(|due| self.clock.time_until(due))
    }

    /// Current playback time.
    #[must_use]
    pub const fn now(&self) -> PlayTime {
        self.clock.now()
    }

    fn fire_due(&mut self, now: PlayTime) -> usize {
        let mut fired = 0;
        while let Some(tick) = self.scheduler.next_before(now) {
            let active = self.timer.as_ref().map(TimerHandle::id);
            if active != Some(tick.timer) {
                tracing::trace!(timer = tick.timer.get(), "stale tick dropped");
                continue;
            }
            self.on_tick(tick.time);
            fired += 1;
        }
        fired
    }

    fn on_tick(&mut self, fired_at: PlayTime) {
        let Some(last) = self.trace.as_ref().map(Trace::last_index) else {
            self.cancel_timer();
            return;
        };
        if self.cursor >= last {
            self.cancel_timer();
            self.mode = PlaybackMode::Paused;
            return;
        }

        self.cursor += 1;
        tracing::trace!(cursor = self.cursor, at = %fired_at, "tick");
        self.notify(TimingMode::Controlled);

        if self.cursor >= last {
            self.cancel_timer();
            self.mode = PlaybackMode::Paused;
            tracing::debug!(cursor = self.cursor, "playback reached last step");
        } else if let Some(handle) = &self.timer {
            let due = fired_at.saturating_add(self.speed.delay());
            self.scheduler.reschedule(handle, due);
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            tracing::trace!(timer = handle.id().get(), "timer cancelled");
            self.scheduler.cancel(handle);
        }
    }

    // ===== Notification =====

    fn notify(&mut self, timing_mode: TimingMode) {
        let Some(trace) = self.trace.as_ref() else {
            return;
        };
        let Some(step) = trace.get(self.cursor) else {
            return;
        };

        if let Some(renderer) = self.renderer.as_mut() {
            renderer.render(step, self.cursor);
        }
        let event = NarrationEvent::from_step(step, self.cursor, trace.len(), timing_mode);
        self.narration.publish(&event);
        self.notifications += 1;
    }

    // ===== Queries =====

    fn last_index(&self) -> ScopeResult<usize> {
        self.trace
            .as_ref()
            .filter(|t| !t.is_empty())
            .map(Trace::last_index)
            .ok_or(ScopeError::NoSteps)
    }

    /// Index of the active step.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current transport mode.
    #[must_use]
    pub const fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Whether the timer is advancing the cursor.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.mode == PlaybackMode::Playing
    }

    /// Delay used for the next scheduled tick.
    #[must_use]
    pub const fn speed(&self) -> Speed {
        self.speed
    }

    /// Number of steps in the loaded trace, 0 when none is loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.trace.as_ref().map_or(0, Trace::len)
    }

    /// Whether no trace is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The loaded trace.
    #[must_use]
    pub const fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// The step under the cursor.
    #[must_use]
    pub fn current_step(&self) -> Option<&Step> {
        self.trace.as_ref()?.get(self.cursor)
    }

    /// Render/narration notifications issued so far.
    #[must_use]
    pub const fn notification_count(&self) -> u64 {
        self.notifications
    }

    /// Whether a step timer is live.
    #[must_use]
    pub const fn has_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// Snapshot of cursor, mode, length and delay.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            cursor: self.cursor,
            mode: self.mode,
            total_steps: self.len(),
            delay_ms: self.speed.millis(),
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::algorithms::Algorithm;
    use crate::trace::{TraceInput, TraceOptions};
    use std::cell::RefCell;
    use std::rc::Rc;

    const TICK: Duration = Duration::from_millis(1000);

    fn bubble(values: Vec<i64>) -> Trace {
        Algorithm::BubbleSort
            .generate(&TraceInput::new(values), &TraceOptions::default())
            .unwrap()
    }

    type Log = Rc<RefCell<Vec<(usize, TimingMode)>>>;

    fn controller_with_log(trace: Trace) -> (PlaybackController, Log, Rc<RefCell<Vec<usize>>>) {
        let events: Log = Rc::new(RefCell::new(Vec::new()));
        let renders = Rc::new(RefCell::new(Vec::new()));

        let mut controller = PlaybackController::new();
        let sink = Rc::clone(&events);
        controller.subscribe_fn(move |e| {
            sink.borrow_mut().push((e.step_index, e.timing_mode));
            Ok(())
        });
        let sink = Rc::clone(&renders);
        controller.set_renderer(move |_: &Step, index: usize| sink.borrow_mut().push(index));
        controller.load(trace);
        (controller, events, renders)
    }

    #[test]
    fn test_load_renders_first_step() {
        let (controller, events, renders) = controller_with_log(bubble(vec![3, 1, 2]));
        assert_eq!(controller.mode(), PlaybackMode::Idle);
        assert_eq!(controller.cursor(), 0);
        assert_eq!(*renders.borrow(), vec![0]);
        assert_eq!(*events.borrow(), vec![(0, TimingMode::Controlled)]);
    }

    #[test]
    fn test_play_visits_every_index_once() {
        let trace = bubble(vec![4, 3, 2, 1]);
        let len = trace.len();
        let (mut controller, events, renders) = controller_with_log(trace);
        renders.borrow_mut().clear();
        events.borrow_mut().clear();

        controller.play().unwrap();
        assert_eq!(controller.mode(), PlaybackMode::Playing);
        let fired = controller.run_to_end();

        assert_eq!(fired, len - 1);
        assert_eq!(*renders.borrow(), (0..len).collect::<Vec<_>>());
        assert_eq!(controller.mode(), PlaybackMode::Paused);
        assert_eq!(controller.cursor(), len - 1);
        assert!(!controller.has_timer());

        let events = events.borrow();
        assert_eq!(events.first(), Some(&(0, TimingMode::UserGesture)));
        assert!(events[1..].iter().all(|(_, m)| *m == TimingMode::Controlled));
    }

    #[test]
    fn test_ticks_follow_speed() {
        let (mut controller, _, renders) = controller_with_log(bubble(vec![5, 4, 3, 2, 1]));
        controller.play().unwrap();

        assert_eq!(controller.advance(Duration::from_millis(999)), 0);
        assert_eq!(controller.advance(Duration::from_millis(1)), 1);
        assert_eq!(controller.cursor(), 1);

        controller.set_speed(Speed::from_preset(SpeedPreset::VeryFast));
        // Already-scheduled tick keeps its 1000ms period
        assert_eq!(controller.next_deadline(), Some(TICK));
        assert_eq!(controller.advance(TICK), 1);
        assert_eq!(controller.next_deadline(), Some(Duration::from_millis(200)));
        assert_eq!(controller.advance(Duration::from_millis(200)), 1);
        assert_eq!(controller.cursor(), 3);
        assert_eq!(renders.borrow().last(), Some(&3));
    }

    #[test]
    fn test_pause_freezes_cursor() {
        let (mut controller, _, _) = controller_with_log(bubble(vec![3, 2, 1]));
        controller.play().unwrap();
        controller.advance(TICK);
        controller.pause();

        assert_eq!(controller.mode(), PlaybackMode::Paused);
        assert_eq!(controller.cursor(), 1);
        assert_eq!(controller.advance(TICK * 10), 0);
        assert_eq!(controller.cursor(), 1);
        assert_eq!(controller.next_deadline(), None);
    }

    #[test]
    fn test_play_at_end_rewinds() {
        let trace = bubble(vec![2, 1]);
        let last = trace.last_index();
        let (mut controller, _, renders) = controller_with_log(trace);
        controller.seek(last).unwrap();
        renders.borrow_mut().clear();

        controller.play().unwrap();
        assert_eq!(controller.cursor(), 0);
        assert_eq!(*renders.borrow(), vec![0]);
    }

    #[test]
    fn test_play_twice_is_noop() {
        let (mut controller, events, _) = controller_with_log(bubble(vec![3, 2, 1]));
        controller.play().unwrap();
        let before = events.borrow().len();
        controller.play().unwrap();
        assert_eq!(events.borrow().len(), before);
        assert_eq!(controller.scheduler.active_timers(), 1);
    }

    #[test]
    fn test_next_previous_clamp() {
        let trace = bubble(vec![2, 1]);
        let last = trace.last_index();
        let (mut controller, _, renders) = controller_with_log(trace);

        controller.previous().unwrap();
        assert_eq!(controller.cursor(), 0);
        assert_eq!(controller.mode(), PlaybackMode::Paused);

        for _ in 0..last + 5 {
            controller.next().unwrap();
        }
        assert_eq!(controller.cursor(), last);
        // load + one notification per call, even when clamped
        assert_eq!(renders.borrow().len(), 1 + 1 + last + 5);
    }

    #[test]
    fn test_seek_clamps_and_notifies_once() {
        let trace = bubble(vec![3, 1, 2]);
        let last = trace.last_index();
        let (mut controller, events, renders) = controller_with_log(trace);

        controller.seek(2).unwrap();
        assert_eq!(controller.cursor(), 2);
        assert_eq!(renders.borrow().len(), 2);
        assert_eq!(events.borrow().last(), Some(&(2, TimingMode::Controlled)));

        controller.seek(usize::MAX).unwrap();
        assert_eq!(controller.cursor(), last);
    }

    #[test]
    fn test_seek_stops_timer() {
        let (mut controller, _, _) = controller_with_log(bubble(vec![4, 3, 2, 1]));
        controller.play().unwrap();
        controller.seek(1).unwrap();

        assert_eq!(controller.mode(), PlaybackMode::Paused);
        assert!(!controller.has_timer());
        assert!(controller.scheduler.is_empty());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let (mut controller, _, renders) = controller_with_log(bubble(vec![3, 2, 1]));
        controller.play().unwrap();
        controller.advance(TICK * 2);
        controller.reset();

        assert_eq!(controller.mode(), PlaybackMode::Idle);
        assert_eq!(controller.cursor(), 0);
        assert_eq!(renders.borrow().last(), Some(&0));
        assert!(controller.scheduler.is_empty());
    }

    #[test]
    fn test_load_while_playing_cancels_old_timer() {
        let (mut controller, events, _) = controller_with_log(bubble(vec![5, 4, 3, 2, 1]));
        controller.play().unwrap();
        controller.advance(TICK);

        let replacement = bubble(vec![1, 2, 3]);
        let new_len = replacement.len();
        controller.load(replacement);
        events.borrow_mut().clear();

        assert_eq!(controller.advance(TICK * 100), 0);
        assert!(events.borrow().is_empty());
        assert_eq!(controller.mode(), PlaybackMode::Idle);
        assert_eq!(controller.len(), new_len);
    }

    #[test]
    fn test_stale_tick_is_ignored() {
        let (mut controller, _, _) = controller_with_log(bubble(vec![3, 2, 1]));
        controller.play().unwrap();

        // Tick for a timer the controller does not own
        let foreign = controller.scheduler.start(PlayTime::ZERO, Duration::from_millis(10));
        assert_eq!(controller.advance(Duration::from_millis(10)), 0);
        assert_eq!(controller.cursor(), 0);
        controller.scheduler.cancel(foreign);
    }

    #[test]
    fn test_single_step_trace_play_pauses_immediately() {
        let trace = Trace::new(
            "manual",
            vec![],
            None,
            vec![Step {
                id: 0,
                kind: crate::trace::StepKind::Complete,
                title: "Done".to_string(),
                description: "Nothing to do.".to_string(),
                highlight: None,
                data: crate::trace::StepData::default(),
                complexity: None,
                code: None,
            }],
        )
        .unwrap();
        let (mut controller, events, _) = controller_with_log(trace);
        controller.play().unwrap();

        assert_eq!(controller.mode(), PlaybackMode::Paused);
        assert!(!controller.has_timer());
        assert_eq!(events.borrow().last(), Some(&(0, TimingMode::UserGesture)));
    }

    #[test]
    fn test_transport_without_trace() {
        let mut controller = PlaybackController::new();
        assert!(matches!(controller.play(), Err(ScopeError::NoSteps)));
        assert!(matches!(controller.next(), Err(ScopeError::NoSteps)));
        assert!(matches!(controller.previous(), Err(ScopeError::NoSteps)));
        assert!(matches!(controller.seek(3), Err(ScopeError::NoSteps)));
        assert_eq!(controller.mode(), PlaybackMode::Idle);
        controller.reset();
        controller.pause();
        assert_eq!(controller.notification_count(), 0);
        assert!(controller.current_step().is_none());
    }

    #[test]
    fn test_unload_silences_everything() {
        let (mut controller, events, _) = controller_with_log(bubble(vec![3, 2, 1]));
        controller.play().unwrap();
        let unloaded = controller.unload();
        events.borrow_mut().clear();

        assert!(unloaded.is_some());
        assert_eq!(controller.advance(TICK * 10), 0);
        assert!(events.borrow().is_empty());
        assert!(controller.is_empty());
    }

    #[test]
    fn test_failing_subscriber_does_not_stop_playback() {
        let mut controller = PlaybackController::new();
        controller.subscribe_fn(|_| Err(NarrationError::Other("offline".to_string())));
        controller.subscribe_fn(|_| panic!("broken narrator"));
        controller.load(bubble(vec![3, 2, 1]));

        controller.play().unwrap();
        controller.run_to_end();
        assert_eq!(controller.mode(), PlaybackMode::Paused);
        assert_eq!(controller.cursor(), controller.len() - 1);
        assert_eq!(controller.narration().len(), 1);
    }

    #[test]
    fn test_set_speed_millis_bounds() {
        let mut controller = PlaybackController::new();
        assert!(controller.set_speed_millis(750).is_ok());
        assert_eq!(controller.speed().millis(), 750);
        assert!(matches!(
            controller.set_speed_millis(100),
            Err(ScopeError::InvalidSpeed { .. })
        ));
        assert_eq!(controller.speed().millis(), 750);
    }

    #[test]
    fn test_from_config() {
        let settings = PlaybackConfig {
            custom_delay_ms: Some(300),
            ..PlaybackConfig::default()
        };
        let controller = PlaybackController::from_config(&settings).unwrap();
        assert_eq!(controller.state().delay_ms, 300);
    }

    #[test]
    fn test_from_config_rejects_zero_delay() {
        let settings = PlaybackConfig {
            custom_delay_ms: Some(0),
            min_delay_ms: 0,
            ..PlaybackConfig::default()
        };
        assert!(matches!(
            PlaybackController::from_config(&settings),
            Err(ScopeError::InvalidSpeed { millis: 0, min: 50, .. })
        ));

        // A zero lower bound still admits delays at the floor
        let settings = PlaybackConfig {
            custom_delay_ms: Some(50),
            min_delay_ms: 0,
            ..PlaybackConfig::default()
        };
        let mut controller = PlaybackController::from_config(&settings).unwrap();
        controller.load(bubble(vec![5, 4, 3, 2, 1]));
        controller.play().unwrap();
        assert_eq!(controller.advance(Duration::ZERO), 0);
        assert_eq!(controller.cursor(), 0);
        assert_eq!(controller.next_deadline(), Some(Duration::from_millis(50)));
    }

    #[test]
    fn test_state_snapshot() {
        let trace = bubble(vec![2, 1]);
        let len = trace.len();
        let (mut controller, _, _) = controller_with_log(trace);
        controller.next().unwrap();
        assert_eq!(
            controller.state(),
            PlaybackState {
                cursor: 1,
                mode: PlaybackMode::Paused,
                total_steps: len,
                delay_ms: 1000,
            }
        );
        assert_eq!(controller.current_step().map(|s| s.id), Some(1));
    }
}
