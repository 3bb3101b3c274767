//! Binary search over a sorted array.
//!
//! Each iteration records two steps: the midpoint comparison, then the range
//! update with the discarded half marked as eliminated. The search ends in a
//! single terminal step, found or not found; in the not-found case the step
//! before it shows the exhausted range (`left > right`).

use super::TraceGenerator;
use crate::error::{ScopeError, ScopeResult};
use crate::trace::{
    Complexity, IndexSpan, Markers, Outcome, SearchRange, StepBuilder, StepDraft, StepKind,
    TraceInput,
};

const CODE_INIT: &str = "left = 0; right = n - 1";
const CODE_MID: &str = "mid = (left + right) / 2; compare a[mid] with target";
const CODE_GO_RIGHT: &str = "if a[mid] < target: left = mid + 1";
const CODE_GO_LEFT: &str = "if a[mid] > target: right = mid - 1";
const CODE_FOUND: &str = "if a[mid] == target: return mid";
const CODE_NOT_FOUND: &str = "return -1";

/// Binary search generator. Requires ascending input.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinarySearch;

impl TraceGenerator for BinarySearch {
    fn name(&self) -> &'static str {
        "binary_search"
    }

    fn complexity(&self) -> Complexity {
        Complexity::new("O(1)", "O(log n)", "O(log n)", "O(1)")
    }

    fn needs_target(&self) -> bool {
        true
    }

    fn record(&self, input: &TraceInput, builder: &mut StepBuilder) -> ScopeResult<()> {
        let values = &input.values;
        let target = input
            .target
            .ok_or_else(|| ScopeError::missing_target(self.name()))?;

        if let Some(pos) = values.windows(2).position(|w| w[0] > w[1]) {
            return Err(ScopeError::invalid_input(format!(
                "binary search needs ascending values, but {} > {} at index {}",
                values[pos],
                values[pos + 1],
                pos
            )));
        }

        let mut left: i64 = 0;
        let mut right: i64 = values.len() as i64 - 1;
        let mut markers = Markers::new();
        markers.range = Some(SearchRange::new(left, right));

        builder.record(
            StepDraft::new(
                StepKind::Initial,
                "Start binary search",
                format!(
                    "Looking for {target} in {} sorted values. The search range is [{left}, {right}].",
                    values.len()
                ),
            )
            .code(CODE_INIT),
            values,
            &markers,
        );

        while left <= right {
            // left and right are valid indices inside the loop
            let mid = ((left + right) / 2) as usize;
            let value = values[mid];
            markers.range = Some(SearchRange {
                left,
                right,
                mid: Some(mid),
            });
            markers.current = Some(mid);

            let relation = match value.cmp(&target) {
                std::cmp::Ordering::Less => format!("{value} < {target}"),
                std::cmp::Ordering::Greater => format!("{value} > {target}"),
                std::cmp::Ordering::Equal => format!("{value} = {target}"),
            };
            builder.record(
                StepDraft::new(
                    StepKind::Compare,
                    format!("Check middle index {mid}"),
                    format!(
                        "mid = ({left} + {right}) / 2 = {mid}. Compare a[{mid}] = {value} with the target {target}."
                    ),
                )
                .highlight(relation)
                .code(CODE_MID),
                values,
                &markers,
            );

            if value == target {
                builder.record(
                    StepDraft::new(
                        StepKind::Complete,
                        format!("Found at index {mid}"),
                        format!("a[{mid}] equals {target}, so the search succeeds."),
                    )
                    .code(CODE_FOUND)
                    .outcome(Outcome::Found { index: mid }),
                    values,
                    &markers,
                );
                return Ok(());
            }

            let mid_i = mid as i64;
            let (title, description, code) = if value < target {
                markers.eliminated.push(IndexSpan::new(left as usize, mid));
                left = mid_i + 1;
                (
                    "Narrow right",
                    format!(
                        "{value} is smaller than {target}, so everything up to index {mid} is discarded. New range [{left}, {right}]."
                    ),
                    CODE_GO_RIGHT,
                )
            } else {
                markers.eliminated.push(IndexSpan::new(mid, right as usize));
                right = mid_i - 1;
                (
                    "Narrow left",
                    format!(
                        "{value} is larger than {target}, so everything from index {mid} on is discarded. New range [{left}, {right}]."
                    ),
                    CODE_GO_LEFT,
                )
            };

            markers.range = Some(SearchRange {
                left,
                right,
                mid: Some(mid),
            });
            builder.record(
                StepDraft::new(StepKind::RangeUpdate, title, description).code(code),
                values,
                &markers,
            );
        }

        markers.current = None;
        builder.record(
            StepDraft::new(
                StepKind::Complete,
                "Not found",
                format!("The range is empty (left {left} > right {right}), so {target} is not in the array."),
            )
            .code(CODE_NOT_FOUND)
            .outcome(Outcome::NotFound),
            values,
            &markers,
        );
        Ok(())
    }
}
