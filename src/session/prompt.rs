//! Display-name prompts.
//!
//! Each `ask_user_name` call queues its own oneshot channel. Answers settle the
//! oldest pending request first, so concurrent prompts never overwrite each
//! other. There is no timeout: a request waits until it is answered, cancelled,
//! or the queue is dropped.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use tokio::sync::oneshot;

pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Default)]
pub struct NamePrompts {
    pending: Mutex<VecDeque<oneshot::Sender<Option<String>>>>,
}

impl NamePrompts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request. The future yields the submitted name, or `None` when
    /// the request is cancelled or abandoned.
    pub fn ask_user_name(&self) -> impl Future<Output = Option<String>> {
        let (tx, rx) = oneshot::channel();
        self.queue().push_back(tx);
        async move { rx.await.ok().flatten() }
    }

    /// Answer the oldest pending request. Returns false when nothing is pending.
    pub fn submit(&self, name: &str) -> bool {
        self.settle(Some(name.trim().to_string()))
    }

    /// Dismiss the oldest pending request.
    pub fn cancel(&self) -> bool {
        self.settle(None)
    }

    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    fn settle(&self, answer: Option<String>) -> bool {
        // Skip requests whose caller already went away.
        while let Some(tx) = self.queue().pop_front() {
            if tx.send(answer.clone()).is_ok() {
                return true;
            }
        }
        false
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, VecDeque<oneshot::Sender<Option<String>>>> {
        // A poisoned queue still holds valid senders.
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Fall back to the anonymous name for cancelled or blank answers.
pub fn display_name_or_anonymous(answer: Option<String>) -> String {
    match answer {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => ANONYMOUS.to_string(),
    }
}
