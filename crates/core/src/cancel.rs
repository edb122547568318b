//! Cancellation support for client operations

use std::future::Future;

use samplify_domain::{Result, SamplifyError};
use tokio_util::sync::CancellationToken;

/// Run `fut` until it completes or `cancel` fires.
///
/// A token that is already cancelled wins before the future is polled, so no
/// request is started. Dropping the future on cancellation aborts any
/// in-flight transport call and releases locks it held.
///
/// # Errors
///
/// [`SamplifyError::Cancelled`] when the token fires first, otherwise the
/// error of `fut`.
pub async fn with_cancellation<F, T>(cancel: Option<&CancellationToken>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match cancel {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(SamplifyError::Cancelled),
            result = fut => result,
        },
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn completes_without_token() {
        let value = with_cancellation(None, async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let polled = AtomicBool::new(false);
        let result = with_cancellation(Some(&token), async {
            polled.store(true, Ordering::SeqCst);
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(SamplifyError::Cancelled)));
        assert!(!polled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn cancellation_interrupts_pending_work() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let result: Result<()> = with_cancellation(Some(&token), async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(SamplifyError::Cancelled)));
    }
}
