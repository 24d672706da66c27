//! Explicit accumulator pattern for sequential recurrences.
//!
//! Renko, Kagi, Heikin-Ashi and the other state machines depend on the
//! previous step's state, so they cannot be evaluated per index. Each one is
//! written as a step function threaded through [`fold`], which keeps the
//! recurrence testable in isolation and makes the final state available to
//! callers that need to flush it.

/// Runs `step` over every item, threading `state` and collecting outputs.
///
/// The step function may push zero or more outputs per input item.
/// Returns the final state together with all outputs in emission order.
pub fn fold<I, S, T, F>(items: &[I], init: S, mut step: F) -> (S, Vec<T>)
where
    F: FnMut(&mut S, &I, &mut Vec<T>),
{
    let mut state = init;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        step(&mut state, item, &mut out);
    }
    (state, out)
}
