//! Bounded draft/critique/revise loop.
//!
//! The same shape as the tool-use loop's turn counter, for workflows that
//! repeatedly improve a value instead of invoking tools: each iteration
//! either accepts the current value or produces a revised one, and the loop
//! returns the last revision when the iteration budget runs out.

use std::future::Future;

use anyhow::Result;

/// Outcome of one refinement iteration.
pub enum RefineStep<T> {
    /// The value passed review; stop and return it.
    Accept(T),
    /// Carry this revision into the next iteration.
    Revise(T),
}

/// Run `step` up to `max_iterations` times, threading the accumulator
/// through. Returns the accepted value, or the final revision if no
/// iteration accepted.
pub async fn refine<T, F, Fut>(initial: T, max_iterations: usize, mut step: F) -> Result<T>
where
    F: FnMut(T, usize) -> Fut,
    Fut: Future<Output = Result<RefineStep<T>>>,
{
    let mut current = initial;
    for iteration in 1..=max_iterations {
        match step(current, iteration).await? {
            RefineStep::Accept(value) => return Ok(value),
            RefineStep::Revise(value) => current = value,
        }
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refine_accepts_early() {
        let result = refine(0, 5, |value, iteration| async move {
            if iteration == 3 {
                Ok(RefineStep::Accept(value))
            } else {
                Ok(RefineStep::Revise(value + 1))
            }
        })
        .await
        .unwrap();

        assert_eq!(result, 2);
    }

    #[tokio::test]
    async fn test_refine_returns_last_revision_on_exhaustion() {
        let result = refine(0, 3, |value, _| async move { Ok(RefineStep::Revise(value + 1)) })
            .await
            .unwrap();

        assert_eq!(result, 3);
    }

    #[tokio::test]
    async fn test_refine_propagates_step_error() {
        let result: Result<i32> = refine(0, 3, |_, _| async move {
            anyhow::bail!("reviewer unavailable")
        })
        .await;

        assert!(result.is_err());
    }
}
