//! Bounded fan-out of chat calls
//!
//! `ChatModel::chat` is synchronous, so each call runs on tokio's blocking
//! pool. At most `max_concurrency` calls are in flight at once, and replies
//! are collected in submission order whatever order they complete in.

use lexcard_domain::{ChatModel, ChatRequest};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Run every request against `model`, returning one reply per request
///
/// `replies[i]` answers `requests[i]`. A call whose task panicked yields
/// `None`; callers treat it the same as an empty reply.
///
/// # Examples
///
/// ```
/// use lexcard_llm::{chat_all, MockProvider};
/// use lexcard_domain::ChatRequest;
/// use std::sync::Arc;
///
/// # tokio_test_block_on(async {
/// let model = Arc::new(MockProvider::new("ok"));
/// let requests = vec![ChatRequest::new("s", "a", "m", 0.0); 3];
/// let replies = chat_all(model, requests, 2).await;
/// assert_eq!(replies, vec![Some("ok".to_string()); 3]);
/// # });
/// # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
pub async fn chat_all<M>(
    model: Arc<M>,
    requests: Vec<ChatRequest>,
    max_concurrency: usize,
) -> Vec<Option<String>>
where
    M: ChatModel + ?Sized + 'static,
{
    let total = requests.len();
    let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
    let mut handles = Vec::with_capacity(total);

    for request in requests {
        // Waiting here keeps at most `max_concurrency` blocking tasks alive.
        let permit = match Arc::clone(&semaphore).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                warn!("Chat permit unavailable: {}", e);
                handles.push(None);
                continue;
            }
        };
        let model = Arc::clone(&model);
        handles.push(Some(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            model.chat(&request)
        })));
    }

    let mut replies = Vec::with_capacity(total);
    for (idx, handle) in handles.into_iter().enumerate() {
        let reply = match handle {
            Some(handle) => match handle.await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!("Chat task {}/{} failed: {}", idx + 1, total, e);
                    None
                }
            },
            None => None,
        };
        replies.push(reply);
    }

    debug!("Completed {} chat calls", total);
    replies
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockProvider;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Replies with the user text after a delay that shrinks with position,
    /// so later requests finish first.
    struct SlowEcho {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    impl ChatModel for SlowEcho {
        fn chat(&self, request: &ChatRequest) -> String {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            let position: u64 = request.user_content().parse().unwrap_or(0);
            std::thread::sleep(Duration::from_millis(40 - position * 8));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            request.user_content().to_string()
        }
    }

    struct Panicky;

    impl ChatModel for Panicky {
        fn chat(&self, request: &ChatRequest) -> String {
            if request.user_content() == "boom" {
                panic!("model exploded");
            }
            request.user_content().to_string()
        }
    }

    #[tokio::test]
    async fn test_replies_follow_submission_order() {
        let model = Arc::new(SlowEcho {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let requests: Vec<_> = (0..5)
            .map(|i| ChatRequest::new("s", i.to_string(), "m", 0.0))
            .collect();

        let replies = chat_all(Arc::clone(&model), requests, 2).await;

        let expected: Vec<_> = (0..5).map(|i| Some(i.to_string())).collect();
        assert_eq!(replies, expected);
        assert!(model.peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_panicking_call_yields_none() {
        let requests = vec![
            ChatRequest::new("s", "a", "m", 0.0),
            ChatRequest::new("s", "boom", "m", 0.0),
            ChatRequest::new("s", "c", "m", 0.0),
        ];

        let replies = chat_all(Arc::new(Panicky), requests, 3).await;

        assert_eq!(replies, vec![Some("a".to_string()), None, Some("c".to_string())]);
    }

    #[tokio::test]
    async fn test_zero_concurrency_still_runs() {
        let model = Arc::new(MockProvider::new("ok"));
        let replies = chat_all(Arc::clone(&model), vec![ChatRequest::new("s", "u", "m", 0.0)], 0).await;
        assert_eq!(replies, vec![Some("ok".to_string())]);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let replies = chat_all(Arc::new(MockProvider::default()), Vec::new(), 4).await;
        assert!(replies.is_empty());
    }
}
