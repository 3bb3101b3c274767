//! Snapshot-on-append step recording.
//!
//! Generators run their algorithm on a mutable working buffer and call
//! [`StepBuilder::record`] at each decision point. The builder copies the
//! buffer and markers into the new step, so no step ever aliases the live
//! buffer or another step.

use crate::error::ScopeResult;
use crate::trace::{Complexity, Markers, Outcome, Step, StepData, StepKind, Trace, TraceOptions};

/// Narration metadata for a step about to be recorded.
#[derive(Debug, Clone)]
pub struct StepDraft {
    kind: StepKind,
    title: String,
    description: String,
    highlight: Option<String>,
    code: Option<&'static str>,
    outcome: Option<Outcome>,
}

impl StepDraft {
    /// Start a draft.
    #[must_use]
    pub fn new(kind: StepKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
            highlight: None,
            code: None,
            outcome: None,
        }
    }

    /// Attach an emphasis line.
    #[must_use]
    pub fn highlight(mut self, highlight: impl Into<String>) -> Self {
        self.highlight = Some(highlight.into());
        self
    }

    /// Attach the matching pseudocode line.
    #[must_use]
    pub const fn code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the run's result. Only meaningful on terminal kinds.
    #[must_use]
    pub const fn outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

/// Accumulates steps for one generator run.
#[derive(Debug)]
pub struct StepBuilder {
    algorithm: &'static str,
    target: Option<i64>,
    complexity: Option<Complexity>,
    attach_code: bool,
    steps: Vec<Step>,
}

impl StepBuilder {
    /// Builder for `algorithm`, honouring `options`.
    #[must_use]
    pub fn new(algorithm: &'static str, complexity: Complexity, options: &TraceOptions) -> Self {
        Self {
            algorithm,
            target: None,
            complexity: options.attach_complexity.then_some(complexity),
            attach_code: options.attach_code,
            steps: Vec::new(),
        }
    }

    /// Record the search target on every step.
    #[must_use]
    pub fn with_target(mut self, target: Option<i64>) -> Self {
        self.target = target;
        self
    }

    /// Snapshot `buffer` and `markers` into a new step.
    ///
    /// Returns the id of the recorded step.
    pub fn record(&mut self, draft: StepDraft, buffer: &[i64], markers: &Markers) -> u32 {
        let id = u32::try_from(self.steps.len()).unwrap_or(u32::MAX);

        tracing::trace!(
            algorithm = self.algorithm,
            id,
            kind = ?draft.kind,
            title = %draft.title,
            "record step"
        );

        let code = if self.attach_code {
            draft.code.map(str::to_string)
        } else {
            None
        };

        let step = Step {
            id,
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            highlight: draft.highlight,
            data: StepData {
                values: buffer.to_vec(),
                target: self.target,
                markers: markers.clone(),
                outcome: draft.outcome,
            },
            complexity: self.complexity.clone(),
            code,
        };
        self.steps.push(step);

        id
    }

    /// Number of steps recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// No steps recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps recorded so far.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Seal the recorded steps into a [`Trace`].
    ///
    /// # Errors
    ///
    /// Returns error if the sequence violates the trace contract
    /// (empty, or not ending in exactly one terminal step).
    pub fn finish(self, input: &[i64]) -> ScopeResult<Trace> {
        tracing::debug!(
            algorithm = self.algorithm,
            steps = self.steps.len(),
            "trace generated"
        );
        Trace::new(self.algorithm, input.to_vec(), self.target, self.steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScopeError;

    fn complexity() -> Complexity {
        Complexity::new("O(1)", "O(n)", "O(n)", "O(1)")
    }

    #[test]
    fn test_record_snapshots_buffer() {
        let mut builder = StepBuilder::new("test", complexity(), &TraceOptions::default());
        let mut buffer = vec![3, 1, 2];
        let markers = Markers::new();

        builder.record(StepDraft::new(StepKind::Initial, "Start", "Begin."), &buffer, &markers);
        buffer.swap(0, 1);
        builder.record(StepDraft::new(StepKind::Swap, "Swap", "Swapped."), &buffer, &markers);

        // Mutating the working buffer after recording changes nothing recorded
        buffer[2] = 99;

        let steps = builder.steps();
        assert_eq!(steps[0].data.values, vec![3, 1, 2]);
        assert_eq!(steps[1].data.values, vec![1, 3, 2]);
    }

    #[test]
    fn test_record_snapshots_markers() {
        let mut builder = StepBuilder::new("test", complexity(), &TraceOptions::default());
        let mut markers = Markers::new();
        markers.sorted.insert(0);

        builder.record(StepDraft::new(StepKind::Initial, "A", "a"), &[1, 2], &markers);
        markers.sorted.insert(1);
        builder.record(StepDraft::new(StepKind::Complete, "B", "b"), &[1, 2], &markers);

        assert_eq!(builder.steps()[0].data.markers.sorted.len(), 1);
        assert_eq!(builder.steps()[1].data.markers.sorted.len(), 2);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut builder = StepBuilder::new("test", complexity(), &TraceOptions::default());
        let a = builder.record(StepDraft::new(StepKind::Initial, "A", "a"), &[], &Markers::new());
        let b = builder.record(StepDraft::new(StepKind::Complete, "B", "b"), &[], &Markers::new());

        assert_eq!((a, b), (0, 1));
        assert_eq!(builder.len(), 2);
    }

    #[test]
    fn test_options_strip_code_and_complexity() {
        let options = TraceOptions {
            attach_code: false,
            attach_complexity: false,
            ..TraceOptions::default()
        };
        let mut builder = StepBuilder::new("test", complexity(), &options);
        builder.record(
            StepDraft::new(StepKind::Initial, "A", "a").code("i = 0"),
            &[],
            &Markers::new(),
        );

        assert!(builder.steps()[0].code.is_none());
        assert!(builder.steps()[0].complexity.is_none());
    }

    #[test]
    fn test_options_keep_code_and_complexity() {
        let mut builder = StepBuilder::new("test", complexity(), &TraceOptions::default());
        builder.record(
            StepDraft::new(StepKind::Initial, "A", "a").code("i = 0"),
            &[],
            &Markers::new(),
        );

        assert_eq!(builder.steps()[0].code.as_deref(), Some("i = 0"));
        assert_eq!(builder.steps()[0].complexity, Some(complexity()));
    }

    #[test]
    fn test_target_recorded_on_every_step() {
        let mut builder = StepBuilder::new("test", complexity(), &TraceOptions::default())
            .with_target(Some(7));
        builder.record(StepDraft::new(StepKind::Initial, "A", "a"), &[7], &Markers::new());
        builder.record(
            StepDraft::new(StepKind::Complete, "B", "b").outcome(Outcome::Found { index: 0 }),
            &[7],
            &Markers::new(),
        );

        assert!(builder.steps().iter().all(|s| s.data.target == Some(7)));
        let trace = builder.finish(&[7]);
        assert_eq!(trace.ok().and_then(|t| t.outcome()), Some(Outcome::Found { index: 0 }));
    }

    #[test]
    fn test_finish_empty_is_error() {
        let builder = StepBuilder::new("test", complexity(), &TraceOptions::default());
        assert!(builder.is_empty());
        assert!(matches!(builder.finish(&[]), Err(ScopeError::NoSteps)));
    }
}
