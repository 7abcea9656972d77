//! Shared fixtures for the integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use appscout_agents::IntentRouter;
use appscout_ml::{ClassifierError, ClassifierStack, CompletionBackend};
use appscout_observability::AppMetrics;
use async_trait::async_trait;

/// Backend that replays one canned answer or failure and counts calls.
pub struct FakeBackend {
    answer: Result<String, u16>,
    calls: AtomicUsize,
}

impl FakeBackend {
    pub fn answering(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing_with(status: u16) -> Arc<Self> {
        Arc::new(Self {
            answer: Err(status),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for FakeBackend {
    fn model_name(&self) -> &str {
        "fake"
    }

    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(status) => Err(ClassifierError::from_status(*status, "fake failure")),
        }
    }
}

pub fn router_with(backend: Arc<FakeBackend>) -> IntentRouter {
    IntentRouter::new(ClassifierStack::with_backend(backend), AppMetrics::shared())
}

pub fn offline_router() -> IntentRouter {
    IntentRouter::new(ClassifierStack::fallback_only(), AppMetrics::shared())
}
