//! Single-resolution result envelope.
//!
//! A call hands out a [`Resolver`] (cloneable, one clone per continuation)
//! and keeps the matching [`Pending`] future. The first completion wins;
//! later ones are ignored and reported as such.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::RecognitionFailure;

/// What a caller eventually observes.
pub type Outcome<T> = Result<T, RecognitionFailure>;

/// Create a linked resolver/pending pair for one call.
pub fn channel<T>() -> (Resolver<T>, Pending<T>) {
    let (tx, rx) = oneshot::channel();
    let resolver = Resolver {
        slot: Arc::new(Mutex::new(Some(tx))),
    };
    (resolver, Pending { rx })
}

/// Completion side of the envelope.
pub struct Resolver<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<Outcome<T>>>>>,
}

impl<T> Clone for Resolver<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Resolver<T> {
    /// Deliver a success payload. Returns `false` if already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.complete(Ok(value))
    }

    /// Deliver a failure. Returns `false` if already settled.
    pub fn reject(&self, failure: RecognitionFailure) -> bool {
        self.complete(Err(failure))
    }

    /// Deliver an outcome, once.
    pub fn complete(&self, outcome: Outcome<T>) -> bool {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match sender {
            Some(tx) => {
                if tx.send(outcome).is_err() {
                    debug!("Caller stopped waiting before the call settled");
                }
                true
            }
            None => {
                debug!("Ignoring completion for an already settled call");
                false
            }
        }
    }

    /// Check whether an outcome was already delivered.
    pub fn is_settled(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}

/// Waiting side of the envelope.
///
/// Resolves with a failure if every resolver is dropped without completing.
pub struct Pending<T> {
    rx: oneshot::Receiver<Outcome<T>>,
}

impl<T> Future for Pending<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(RecognitionFailure::new(
                    "recognition call was dropped before completing",
                ))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_ERROR_CODE;

    #[tokio::test]
    async fn test_first_resolution_wins() {
        let (resolver, pending) = channel::<u32>();
        assert!(resolver.resolve(1));
        assert!(!resolver.resolve(2));
        assert!(!resolver.reject(RecognitionFailure::new("late")));
        assert_eq!(pending.await, Ok(1));
    }

    #[tokio::test]
    async fn test_reject_then_resolve_is_ignored() {
        let (resolver, pending) = channel::<u32>();
        let on_failure = resolver.clone();
        let on_success = resolver;

        assert!(on_failure.reject(RecognitionFailure::new("boom")));
        assert!(on_success.is_settled());
        assert!(!on_success.resolve(7));

        let failure = pending.await.unwrap_err();
        assert_eq!(failure.code, GENERIC_ERROR_CODE);
        assert_eq!(failure.message, "boom");
    }

    #[tokio::test]
    async fn test_dropped_resolver_does_not_hang() {
        let (resolver, pending) = channel::<u32>();
        drop(resolver);
        let failure = pending.await.unwrap_err();
        assert_eq!(failure.code, GENERIC_ERROR_CODE);
    }

    #[test]
    fn test_completion_after_caller_left() {
        let (resolver, pending) = channel::<u32>();
        drop(pending);
        assert!(resolver.resolve(3));
        assert!(resolver.is_settled());
    }
}
