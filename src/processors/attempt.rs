use std::future::Future;

use crate::error::Result;

/// Outcome of one attempt in an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    Won,
    Empty,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub label: String,
    pub status: AttemptStatus,
}

/// Result of running an ordered attempt list: which attempt won (if any)
/// and what happened to each attempt that ran. Attempts after the winner
/// are never started.
#[derive(Debug)]
pub struct FirstSuccess<T> {
    pub winner: Option<(usize, T)>,
    pub attempts: Vec<AttemptRecord>,
}

impl<T> FirstSuccess<T> {
    pub fn value(&self) -> Option<&T> {
        self.winner.as_ref().map(|(_, v)| v)
    }

    pub fn winner_index(&self) -> Option<usize> {
        self.winner.as_ref().map(|(i, _)| *i)
    }

    pub fn winner_label(&self) -> Option<&str> {
        self.winner_index()
            .and_then(|i| self.attempts.get(i))
            .map(|a| a.label.as_str())
    }
}

/// Run labeled attempts in declared order, stopping at the first that
/// yields a value.
///
/// An attempt returning `Ok(None)` ran but produced nothing; a recoverable
/// error is recorded and the next attempt runs. Non-recoverable errors
/// (cancellation, persistence, configuration) propagate immediately.
pub async fn first_success<T, I, F, Fut>(attempts: I) -> Result<FirstSuccess<T>>
where
    I: IntoIterator<Item = (String, F)>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let mut records = Vec::new();
    let mut winner = None;

    for (index, (label, attempt)) in attempts.into_iter().enumerate() {
        match attempt().await {
            Ok(Some(value)) => {
                records.push(AttemptRecord {
                    label,
                    status: AttemptStatus::Won,
                });
                winner = Some((index, value));
                break;
            }
            Ok(None) => records.push(AttemptRecord {
                label,
                status: AttemptStatus::Empty,
            }),
            Err(e) if e.is_recoverable() => records.push(AttemptRecord {
                label,
                status: AttemptStatus::Failed(e.to_string()),
            }),
            Err(e) => return Err(e),
        }
    }

    Ok(FirstSuccess {
        winner,
        attempts: records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicBool, Ordering};

    type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = Result<Option<T>>> + 'a>>;
    type BoxedAttempt<'a, T> = Box<dyn FnOnce() -> BoxedFuture<'a, T> + 'a>;

    // Erase distinct async block types so attempts with different bodies
    // can share one list.
    fn attempt<'a, T, Fut>(label: &str, fut: Fut) -> (String, BoxedAttempt<'a, T>)
    where
        Fut: Future<Output = Result<Option<T>>> + 'a,
    {
        (
            label.to_string(),
            Box::new(move || Box::pin(fut) as BoxedFuture<'a, T>),
        )
    }

    #[tokio::test]
    async fn test_first_non_null_wins() {
        let attempts = vec![
            attempt("first", async { Ok(None) }),
            attempt("second", async { Ok(Some(42.0)) }),
        ];

        let outcome = first_success(attempts).await.unwrap();

        assert_eq!(outcome.winner_index(), Some(1));
        assert_eq!(outcome.winner_label(), Some("second"));
        assert_eq!(outcome.value(), Some(&42.0));
        assert_eq!(outcome.attempts[0].status, AttemptStatus::Empty);
        assert_eq!(outcome.attempts[1].status, AttemptStatus::Won);
    }

    #[tokio::test]
    async fn test_later_attempts_are_never_started() {
        let consulted = AtomicBool::new(false);

        let outcome = first_success(vec![
            attempt("first", async { Ok(Some(1.0)) }),
            attempt("second", async {
                consulted.store(true, Ordering::SeqCst);
                // A fault in the later candidate must not affect the outcome.
                Err(ExtractionError::Download {
                    job_id: "j2".to_string(),
                })
            }),
        ])
        .await
        .unwrap();

        assert_eq!(outcome.winner_index(), Some(0));
        assert_eq!(outcome.attempts.len(), 1);
        assert!(!consulted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_recoverable_errors_continue() {
        let attempts = vec![
            attempt("first", async {
                Err(ExtractionError::Submission {
                    collection_id: "C-1".to_string(),
                    message: "rejected".to_string(),
                })
            }),
            attempt("second", async { Ok(Some(7.0)) }),
        ];

        let outcome = first_success(attempts).await.unwrap();

        assert_eq!(outcome.winner_index(), Some(1));
        assert!(matches!(
            outcome.attempts[0].status,
            AttemptStatus::Failed(_)
        ));
    }

    #[tokio::test]
    async fn test_cancellation_propagates() {
        let attempts = vec![attempt::<f64, _>("first", async {
            Err(ExtractionError::Cancelled)
        })];

        let result = first_success(attempts).await;
        assert!(matches!(result, Err(ExtractionError::Cancelled)));
    }

    #[tokio::test]
    async fn test_all_empty_has_no_winner() {
        let attempts = vec![
            attempt("first", async { Ok(None::<f64>) }),
            attempt("second", async { Ok(None::<f64>) }),
        ];

        let outcome = first_success(attempts).await.unwrap();

        assert!(outcome.winner.is_none());
        assert_eq!(outcome.attempts.len(), 2);
    }
}
