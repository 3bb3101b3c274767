//! # algoscope
//!
//! Step-by-step algorithm traces with a replayable playback controller.
//!
//! A trace generator runs an algorithm to completion and returns an
//! immutable [`Trace`](trace::Trace): one self-contained snapshot per
//! decision point. The [`PlaybackController`](playback::PlaybackController)
//! walks a cursor over that trace and, for every cursor write, calls the
//! renderer once and publishes one narration event.
//!
//! ## Example
//!
//! ```rust
//! use algoscope::prelude::*;
//!
//! let input = TraceInput::new(vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19]).with_target(7);
//! let trace = Algorithm::BinarySearch
//!     .generate(&input, &TraceOptions::default())
//!     .expect("valid input");
//! assert_eq!(trace.outcome().and_then(|o| o.found_index()), Some(3));
//!
//! let mut controller = PlaybackController::new();
//! controller.load(trace);
//! controller.play().expect("trace loaded");
//! controller.run_to_end();
//! assert_eq!(controller.mode(), PlaybackMode::Paused);
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::too_many_lines,
    clippy::missing_const_for_fn,  // Many functions can't be const in stable Rust
    clippy::needless_range_loop,   // Index loops mirror the pseudocode shown to learners
    clippy::missing_errors_doc,
)]

pub mod algorithms;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod narration;
pub mod playback;
pub mod trace;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::algorithms::{Algorithm, TraceGenerator};
    pub use crate::config::{ScopeConfig, ScopeConfigBuilder};
    pub use crate::engine::PlayTime;
    pub use crate::error::{ScopeError, ScopeResult};
    pub use crate::narration::{
        NarrationChannel, NarrationError, NarrationEvent, NarrationSubscriber, SpeechBackend,
        SpeechNarrator, SubscriptionId, TimingMode,
    };
    pub use crate::playback::{
        PlaybackController, PlaybackMode, PlaybackState, RealtimeDriver, Renderer, Speed,
        SpeedPreset,
    };
    pub use crate::trace::{Outcome, Step, StepKind, Trace, TraceInput, TraceOptions};
}

/// Re-export for public API
pub use error::{ScopeError, ScopeResult};
