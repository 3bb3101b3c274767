//! Speech narration adapter.
//!
//! [`SpeechNarrator`] turns narration events into calls on a
//! [`SpeechBackend`]. Many audio platforms refuse to produce sound until the
//! user has interacted with the page or terminal, so the narrator starts
//! locked and unlocks on the first [`TimingMode::UserGesture`] event. Events
//! that arrive while locked or paused are held; only the latest is kept.

use thiserror::Error;

use super::{NarrationError, NarrationEvent, NarrationSubscriber, TimingMode};
use crate::config::NarrationConfig;

/// Speech backend failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    /// The platform refused to speak without a user gesture.
    #[error("speech not allowed before user interaction")]
    NotAllowed,

    /// Backend-specific failure.
    #[error("{0}")]
    Backend(String),
}

/// Text-to-speech primitive.
pub trait SpeechBackend {
    /// Start speaking `text`.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn speak(&mut self, text: &str) -> Result<(), SpeechError>;

    /// Stop the current utterance.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn stop(&mut self) -> Result<(), SpeechError>;

    /// Pause without discarding the current utterance.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn pause(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }

    /// Resume a paused utterance.
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn resume(&mut self) -> Result<(), SpeechError> {
        Ok(())
    }
}

/// Narration subscriber driving a speech backend.
#[derive(Debug)]
pub struct SpeechNarrator<B> {
    backend: B,
    enabled: bool,
    include_highlight: bool,
    unlocked: bool,
    paused: bool,
    pending: Option<String>,
    spoken: usize,
}

impl<B: SpeechBackend> SpeechNarrator<B> {
    /// Enabled narrator that speaks highlights.
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            enabled: true,
            include_highlight: true,
            unlocked: false,
            paused: false,
            pending: None,
            spoken: 0,
        }
    }

    /// Narrator following the `narration` config section.
    pub fn from_config(backend: B, config: &NarrationConfig) -> Self {
        let mut narrator = Self::new(backend);
        narrator.enabled = config.enabled;
        narrator.include_highlight = config.include_highlight;
        narrator
    }

    /// Whether a user gesture has been observed.
    pub const fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Whether speech is paused.
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether narration is switched on.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Text held while locked or paused.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Utterances handed to the backend.
    pub const fn spoken(&self) -> usize {
        self.spoken
    }

    /// The wrapped backend.
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the wrapped backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Unwrap the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Turn narration on or off. Disabling stops speech and drops pending text.
    ///
    /// # Errors
    ///
    /// Backend failure while stopping.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), SpeechError> {
        self.enabled = enabled;
        if !enabled {
            self.pending = None;
            self.backend.stop()?;
        }
        Ok(())
    }

    /// Pause speech. New events are held until [`Self::resume`].
    ///
    /// # Errors
    ///
    /// Backend failure.
    pub fn pause(&mut self) -> Result<(), SpeechError> {
        self.paused = true;
        self.backend.pause()
    }

    /// Resume speech and flush held text if unlocked.
    ///
    /// # Errors
    ///
    /// Backend failure.
    pub fn resume(&mut self) -> Result<(), SpeechError> {
        self.paused = false;
        self.backend.resume()?;
        if self.unlocked {
            if let Some(text) = self.pending.take() {
                self.say(&text)?;
            }
        }
        Ok(())
    }

    /// Stop speaking and drop held text.
    ///
    /// # Errors
    ///
    /// Backend failure.
    pub fn stop(&mut self) -> Result<(), SpeechError> {
        self.pending = None;
        self.backend.stop()
    }

    fn text_for(&self, event: &NarrationEvent) -> String {
        if self.include_highlight {
            event.narration_text.clone()
        } else {
            format!("{}. {}", event.title, event.description)
        }
    }

    // A new utterance always interrupts the previous one
    fn say(&mut self, text: &str) -> Result<(), SpeechError> {
        self.backend.stop()?;
        self.backend.speak(text)?;
        self.spoken += 1;
        Ok(())
    }
}

impl<B: SpeechBackend> NarrationSubscriber for SpeechNarrator<B> {
    fn on_narration(&mut self, event: &NarrationEvent) -> Result<(), NarrationError> {
        if !self.enabled {
            return Ok(());
        }

        let text = self.text_for(event);
        if event.timing_mode == TimingMode::UserGesture {
            self.unlocked = true;
        }

        if !self.unlocked || self.paused {
            tracing::trace!(step = event.step_index, "speech held");
            self.pending = Some(text);
            return Ok(());
        }

        self.pending = None;
        self.say(&text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Recorder {
        calls: Vec<String>,
        fail_speak: bool,
    }

    impl SpeechBackend for Recorder {
        fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
            if self.fail_speak {
                return Err(SpeechError::NotAllowed);
            }
            self.calls.push(format!("speak:{text}"));
            Ok(())
        }

        fn stop(&mut self) -> Result<(), SpeechError> {
            self.calls.push("stop".to_string());
            Ok(())
        }

        fn pause(&mut self) -> Result<(), SpeechError> {
            self.calls.push("pause".to_string());
            Ok(())
        }

        fn resume(&mut self) -> Result<(), SpeechError> {
            self.calls.push("resume".to_string());
            Ok(())
        }
    }

    fn event(index: usize, mode: TimingMode) -> NarrationEvent {
        NarrationEvent {
            title: format!("Check middle index {index}"),
            description: "Compare with the target.".to_string(),
            narration_text: format!("Check middle index {index}. Compare with the target. 9 > 7"),
            step_index: index,
            total_steps: 9,
            timing_mode: mode,
        }
    }

    fn speeches(narrator: &SpeechNarrator<Recorder>) -> Vec<&str> {
        narrator
            .backend()
            .calls
            .iter()
            .filter_map(|c| c.strip_prefix("speak:"))
            .collect()
    }

    #[test]
    fn test_locked_until_user_gesture() {
        let mut narrator = SpeechNarrator::new(Recorder::default());

        assert!(narrator.on_narration(&event(0, TimingMode::Controlled)).is_ok());
        assert!(!narrator.is_unlocked());
        assert!(speeches(&narrator).is_empty());
        assert!(narrator.pending().is_some());

        assert!(narrator.on_narration(&event(1, TimingMode::UserGesture)).is_ok());
        assert!(narrator.is_unlocked());
        assert!(narrator.pending().is_none());
        assert_eq!(speeches(&narrator).len(), 1);

        assert!(narrator.on_narration(&event(2, TimingMode::Controlled)).is_ok());
        assert_eq!(narrator.spoken(), 2);
    }

    #[test]
    fn test_new_utterance_interrupts() {
        let mut narrator = SpeechNarrator::new(Recorder::default());
        let _ = narrator.on_narration(&event(0, TimingMode::UserGesture));
        let calls = &narrator.backend().calls;
        assert_eq!(calls.first().map(String::as_str), Some("stop"));
    }

    #[test]
    fn test_pause_holds_latest_and_resume_flushes() {
        let mut narrator = SpeechNarrator::new(Recorder::default());
        let _ = narrator.on_narration(&event(0, TimingMode::UserGesture));
        assert!(narrator.pause().is_ok());

        let _ = narrator.on_narration(&event(1, TimingMode::Controlled));
        let _ = narrator.on_narration(&event(2, TimingMode::Controlled));
        assert_eq!(narrator.spoken(), 1);

        assert!(narrator.resume().is_ok());
        assert_eq!(narrator.spoken(), 2);
        let last = speeches(&narrator).last().map(|s| s.to_string());
        assert!(last.is_some_and(|s| s.starts_with("Check middle index 2")));
    }

    #[test]
    fn test_without_highlight() {
        let config = NarrationConfig {
            enabled: true,
            include_highlight: false,
        };
        let mut narrator = SpeechNarrator::from_config(Recorder::default(), &config);
        let _ = narrator.on_narration(&event(4, TimingMode::UserGesture));
        assert_eq!(
            speeches(&narrator),
            vec!["Check middle index 4. Compare with the target."]
        );
    }

    #[test]
    fn test_disabled_ignores_events() {
        let mut narrator = SpeechNarrator::new(Recorder::default());
        assert!(narrator.set_enabled(false).is_ok());
        let _ = narrator.on_narration(&event(0, TimingMode::UserGesture));
        assert_eq!(narrator.spoken(), 0);
        assert!(!narrator.is_unlocked());
    }

    #[test]
    fn test_backend_error_surfaces_as_narration_error() {
        let backend = Recorder {
            fail_speak: true,
            ..Recorder::default()
        };
        let mut narrator = SpeechNarrator::new(backend);
        let result = narrator.on_narration(&event(0, TimingMode::UserGesture));
        assert!(matches!(
            result,
            Err(NarrationError::Speech(SpeechError::NotAllowed))
        ));
    }
}
