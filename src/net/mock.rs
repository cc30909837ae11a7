//! net::mock
//!
//! Fixed-answer connectivity probe for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::probe::ConnectivityProbe;

/// Probe whose answer is set by the test. Clones share state.
///
/// Answers queued with [`StaticProbe::answer_next`] are given first, one per
/// call; after that the probe falls back to the fixed answer.
#[derive(Debug, Clone, Default)]
pub struct StaticProbe {
    online: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
    scripted: Arc<Mutex<VecDeque<bool>>>,
}

impl StaticProbe {
    pub fn online() -> Self {
        let probe = Self::default();
        probe.set_online(true);
        probe
    }

    pub fn offline() -> Self {
        Self::default()
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Queue one-shot answers for the next calls, in order.
    pub fn answer_next(&self, answers: &[bool]) {
        self.scripted.lock().unwrap().extend(answers.iter().copied());
    }

    /// How many times the probe was asked.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for StaticProbe {
    async fn is_online(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.scripted.lock().unwrap().pop_front() {
            Some(answer) => answer,
            None => self.online.load(Ordering::SeqCst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn answer_can_change() {
        let probe = StaticProbe::offline();
        assert!(!probe.is_online().await);

        probe.set_online(true);
        assert!(probe.is_online().await);
        assert_eq!(probe.calls(), 2);
    }

    #[tokio::test]
    async fn scripted_answers_come_first() {
        let probe = StaticProbe::online();
        probe.answer_next(&[false, true, false]);

        assert!(!probe.is_online().await);
        assert!(probe.is_online().await);
        assert!(!probe.is_online().await);
        assert!(probe.is_online().await);
        assert_eq!(probe.calls(), 4);
    }
}
